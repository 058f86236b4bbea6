use serde::{Deserialize, Serialize};

/// A saved post as persisted in the store file. All six fields are strings;
/// `date` is set once at save time and never changes afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SavedPost {
    pub date: String,
    pub platform: String,
    pub topic: String,
    pub keywords: String,
    pub content: String,
    pub model_used: String,
}

/// A freshly generated draft. Lives in memory only until the user saves it,
/// at which point the current form state and a timestamp are attached.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedPost {
    pub content: String,
    pub model_used: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GenerationStatus {
    #[default]
    Idle,
    Generating,
    Done,
    NoApiKey,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Platform {
    #[default]
    LinkedIn,
    X,
    Instagram,
    Facebook,
}

impl Platform {
    pub const ALL: [Platform; 4] = [
        Platform::LinkedIn,
        Platform::X,
        Platform::Instagram,
        Platform::Facebook,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Platform::LinkedIn => "LinkedIn (Professional)",
            Platform::X => "X (Twitter)",
            Platform::Instagram => "Instagram Caption",
            Platform::Facebook => "Facebook (Community)",
        }
    }

    pub fn cycle(&self) -> Platform {
        let idx = Self::ALL.iter().position(|p| p == self).unwrap_or(0);
        Self::ALL[(idx + 1) % Self::ALL.len()]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Tone {
    #[default]
    Informative,
    Witty,
    Inspirational,
    DataDriven,
    Motivational,
    Friendly,
    Bold,
    Luxury,
}

impl Tone {
    pub const ALL: [Tone; 8] = [
        Tone::Informative,
        Tone::Witty,
        Tone::Inspirational,
        Tone::DataDriven,
        Tone::Motivational,
        Tone::Friendly,
        Tone::Bold,
        Tone::Luxury,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Tone::Informative => "Informative",
            Tone::Witty => "Witty",
            Tone::Inspirational => "Inspirational",
            Tone::DataDriven => "Data-Driven",
            Tone::Motivational => "Motivational",
            Tone::Friendly => "Friendly",
            Tone::Bold => "Bold",
            Tone::Luxury => "Luxury",
        }
    }

    pub fn cycle(&self) -> Tone {
        let idx = Self::ALL.iter().position(|t| t == self).unwrap_or(0);
        Self::ALL[(idx + 1) % Self::ALL.len()]
    }
}
