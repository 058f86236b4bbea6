mod post;

pub use post::{GeneratedPost, GenerationStatus, Platform, SavedPost, Tone};
