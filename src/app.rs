use std::sync::Arc;

use tokio::sync::mpsc;

use crate::ai::Generator;
use crate::config::Config;
use crate::error::Result;
use crate::models::{GeneratedPost, GenerationStatus, Platform, SavedPost, Tone};
use crate::services::SheetsExporter;
use crate::store::PostStore;
use crate::tui::AppAction;

const MIN_BATCH_COUNT: u32 = 1;
const MAX_BATCH_COUNT: u32 = 10;
const MAX_EMOJI_COUNT: u32 = 50;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tab {
    Generate,
    Saved,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputTarget {
    Topic,
    Keywords,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Info,
    Success,
    Error,
}

/// Current state of the generation form.
#[derive(Debug, Clone)]
pub struct PostForm {
    pub platform: Platform,
    pub tone: Tone,
    pub topic: String,
    pub keywords: String,
    pub batch_count: u32,
    pub emoji_count: u32,
}

pub fn build_prompt(form: &PostForm) -> String {
    format!(
        "Generate a social media post for {} on '{}'. \
         Include keywords/hashtags: {}. Tone: {}. \
         Use exactly {} emojis. \
         Highlight important points with <b style='color:#FF5733'>bold colored text</b> and make it engaging.",
        form.platform.label(),
        form.topic,
        form.keywords,
        form.tone.label(),
        form.emoji_count
    )
}

// Message for a completed generation batch
pub struct GenerationResult {
    pub posts: Vec<GeneratedPost>,
}

// Message for a completed export
pub struct ExportResult {
    pub ok: bool,
}

pub struct App {
    // Data
    pub form: PostForm,
    pub generated: Vec<GeneratedPost>,
    pub saved: Vec<SavedPost>,

    // UI State
    pub tab: Tab,
    pub selected_generated: usize,
    pub selected_saved: usize,
    pub show_help: bool,
    pub input_active: bool,
    pub input_target: InputTarget,
    pub input_buffer: String,
    pub notice: Option<(NoticeKind, String)>,

    // Async state
    pub generation_status: GenerationStatus,
    pub is_exporting: bool,
    generation_rx: mpsc::Receiver<GenerationResult>,
    generation_tx: mpsc::Sender<GenerationResult>,
    export_rx: mpsc::Receiver<ExportResult>,
    export_tx: mpsc::Sender<ExportResult>,

    // Services
    pub store: PostStore,
    generator: Arc<Generator>,
    exporter: Option<Arc<SheetsExporter>>,
}

impl App {
    pub fn new(config: &Config) -> Self {
        let store = PostStore::new(config.store_path.clone());
        let saved = store.load();

        let generator = Arc::new(Generator::new(config.openrouter_api_key.clone()));

        let exporter = match (&config.sheet_id, &config.sheets_access_token) {
            (Some(sheet_id), Some(token)) => Some(Arc::new(SheetsExporter::new(
                token.clone(),
                sheet_id.clone(),
            ))),
            _ => None,
        };

        let generation_status = if config.openrouter_api_key.is_some() {
            GenerationStatus::Idle
        } else {
            GenerationStatus::NoApiKey
        };

        let (generation_tx, generation_rx) = mpsc::channel(1);
        let (export_tx, export_rx) = mpsc::channel(4);

        Self {
            form: PostForm {
                platform: Platform::default(),
                tone: Tone::default(),
                topic: String::new(),
                keywords: String::new(),
                batch_count: MIN_BATCH_COUNT,
                emoji_count: config.emoji_density.min(MAX_EMOJI_COUNT),
            },
            generated: Vec::new(),
            saved,
            tab: Tab::Generate,
            selected_generated: 0,
            selected_saved: 0,
            show_help: false,
            input_active: false,
            input_target: InputTarget::Topic,
            input_buffer: String::new(),
            notice: None,
            generation_status,
            is_exporting: false,
            generation_rx,
            generation_tx,
            export_rx,
            export_tx,
            store,
            generator,
            exporter,
        }
    }

    pub fn selected_generated_post(&self) -> Option<&GeneratedPost> {
        self.generated.get(self.selected_generated)
    }

    pub fn selected_saved_post(&self) -> Option<&SavedPost> {
        self.saved.get(self.selected_saved)
    }

    pub async fn handle_action(&mut self, action: AppAction) -> Result<bool> {
        match action {
            AppAction::Quit => return Ok(true),

            AppAction::SwitchTab => {
                self.tab = match self.tab {
                    Tab::Generate => Tab::Saved,
                    Tab::Saved => Tab::Generate,
                };
            }

            AppAction::MoveUp => match self.tab {
                Tab::Generate => {
                    if self.selected_generated > 0 {
                        self.selected_generated -= 1;
                    }
                }
                Tab::Saved => {
                    if self.selected_saved > 0 {
                        self.selected_saved -= 1;
                    }
                }
            },

            AppAction::MoveDown => match self.tab {
                Tab::Generate => {
                    if self.selected_generated + 1 < self.generated.len() {
                        self.selected_generated += 1;
                    }
                }
                Tab::Saved => {
                    if self.selected_saved + 1 < self.saved.len() {
                        self.selected_saved += 1;
                    }
                }
            },

            AppAction::CyclePlatform => {
                self.form.platform = self.form.platform.cycle();
            }

            AppAction::CycleTone => {
                self.form.tone = self.form.tone.cycle();
            }

            AppAction::IncBatchCount => {
                if self.form.batch_count < MAX_BATCH_COUNT {
                    self.form.batch_count += 1;
                }
            }

            AppAction::DecBatchCount => {
                if self.form.batch_count > MIN_BATCH_COUNT {
                    self.form.batch_count -= 1;
                }
            }

            AppAction::IncEmojiCount => {
                if self.form.emoji_count < MAX_EMOJI_COUNT {
                    self.form.emoji_count += 1;
                }
            }

            AppAction::DecEmojiCount => {
                self.form.emoji_count = self.form.emoji_count.saturating_sub(1);
            }

            AppAction::EditTopic => {
                self.input_active = true;
                self.input_target = InputTarget::Topic;
                self.input_buffer = self.form.topic.clone();
            }

            AppAction::EditKeywords => {
                self.input_active = true;
                self.input_target = InputTarget::Keywords;
                self.input_buffer = self.form.keywords.clone();
            }

            AppAction::Generate => {
                self.generate();
            }

            AppAction::SavePost => {
                self.save_selected_post()?;
            }

            AppAction::ExportPost => {
                self.export_selected_post();
            }

            AppAction::DeleteSaved => {
                self.delete_selected_saved()?;
            }

            AppAction::ClearAllSaved => {
                self.clear_saved()?;
            }

            AppAction::ShowHelp => {
                self.show_help = true;
            }

            AppAction::HideHelp => {
                self.show_help = false;
            }

            AppAction::InputChar(c) => {
                self.input_buffer.push(c);
            }

            AppAction::InputBackspace => {
                self.input_buffer.pop();
            }

            AppAction::InputConfirm => {
                match self.input_target {
                    InputTarget::Topic => self.form.topic = self.input_buffer.clone(),
                    InputTarget::Keywords => self.form.keywords = self.input_buffer.clone(),
                }
                self.input_active = false;
                self.input_buffer.clear();
            }

            AppAction::InputCancel => {
                self.input_active = false;
                self.input_buffer.clear();
            }
        }

        Ok(false)
    }

    /// Kick off a generation batch in the background. Posts within one batch
    /// are produced sequentially with a 1 second pause between requests, the
    /// same informal rate-limiting the tool has always done.
    fn generate(&mut self) {
        if self.generation_status == GenerationStatus::Generating {
            return;
        }

        if self.form.topic.trim().is_empty() {
            self.notice = Some((NoticeKind::Error, "Please enter a topic.".to_string()));
            return;
        }

        self.generated.clear();
        self.selected_generated = 0;
        self.generation_status = GenerationStatus::Generating;
        self.notice = None;

        let prompt = build_prompt(&self.form);
        let batch_count = self.form.batch_count;
        let generator = Arc::clone(&self.generator);
        let tx = self.generation_tx.clone();

        tokio::spawn(async move {
            let mut posts = Vec::with_capacity(batch_count as usize);
            for i in 0..batch_count {
                if i > 0 {
                    tokio::time::sleep(std::time::Duration::from_secs(1)).await;
                }
                posts.push(generator.generate(&prompt).await);
            }
            let _ = tx.send(GenerationResult { posts }).await;
        });
    }

    /// Poll for a completed generation batch (non-blocking)
    pub fn poll_generation_result(&mut self) {
        if let Ok(result) = self.generation_rx.try_recv() {
            let count = result.posts.len();
            self.generated = result.posts;
            self.selected_generated = 0;
            self.generation_status = GenerationStatus::Done;
            self.notice = Some((
                NoticeKind::Success,
                format!("Generated {} post(s).", count),
            ));
        }
    }

    /// Poll for a completed export (non-blocking)
    pub fn poll_export_result(&mut self) {
        if let Ok(result) = self.export_rx.try_recv() {
            self.is_exporting = false;
            self.notice = Some(if result.ok {
                (
                    NoticeKind::Success,
                    "Post exported to Google Sheets!".to_string(),
                )
            } else {
                (
                    NoticeKind::Error,
                    "Error exporting to Google Sheets".to_string(),
                )
            });
        }
    }

    /// Attach the current form state and a timestamp to a generated draft.
    fn snapshot(&self, post: &GeneratedPost) -> SavedPost {
        SavedPost {
            date: now_timestamp(),
            platform: self.form.platform.label().to_string(),
            topic: self.form.topic.clone(),
            keywords: self.form.keywords.clone(),
            content: post.content.clone(),
            model_used: post.model_used.clone(),
        }
    }

    fn save_selected_post(&mut self) -> Result<()> {
        let Some(post) = self.selected_generated_post() else {
            return Ok(());
        };

        // Newest first: new saves go to the front of the list, and the whole
        // list is rewritten.
        let record = self.snapshot(post);
        self.saved.insert(0, record);
        self.store.save(&self.saved)?;
        self.notice = Some((NoticeKind::Success, "Post saved to history!".to_string()));

        Ok(())
    }

    fn export_selected_post(&mut self) {
        let Some(post) = self.selected_generated_post().cloned() else {
            return;
        };

        let exporter = match &self.exporter {
            Some(exporter) => Arc::clone(exporter),
            None => {
                self.notice = Some((
                    NoticeKind::Error,
                    "Google Sheets config missing".to_string(),
                ));
                return;
            }
        };

        let record = self.snapshot(&post);
        let tx = self.export_tx.clone();

        self.is_exporting = true;
        self.notice = Some((NoticeKind::Info, "Exporting to Google Sheets...".to_string()));

        tokio::spawn(async move {
            let ok = exporter.export(&record).await;
            let _ = tx.send(ExportResult { ok }).await;
        });
    }

    fn delete_selected_saved(&mut self) -> Result<()> {
        if self.tab != Tab::Saved || self.saved.is_empty() {
            return Ok(());
        }

        self.saved.remove(self.selected_saved);
        self.store.save(&self.saved)?;

        if self.selected_saved >= self.saved.len() && self.selected_saved > 0 {
            self.selected_saved -= 1;
        }
        self.notice = Some((NoticeKind::Success, "Post deleted.".to_string()));

        Ok(())
    }

    fn clear_saved(&mut self) -> Result<()> {
        if self.tab != Tab::Saved {
            return Ok(());
        }

        self.saved.clear();
        self.selected_saved = 0;
        self.store.save(&self.saved)?;
        self.notice = Some((
            NoticeKind::Success,
            "All saved posts cleared!".to_string(),
        ));

        Ok(())
    }
}

fn now_timestamp() -> String {
    chrono::Local::now().format("%Y-%m-%d %H:%M:%S").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_app() -> (App, tempfile::TempDir) {
        let dir = tempfile::tempdir().unwrap();
        let config = Config {
            store_path: dir
                .path()
                .join("saved_posts.json")
                .to_string_lossy()
                .to_string(),
            openrouter_api_key: None,
            sheet_id: None,
            sheets_access_token: None,
            emoji_density: 5,
        };
        (App::new(&config), dir)
    }

    fn draft(content: &str) -> GeneratedPost {
        GeneratedPost {
            content: content.to_string(),
            model_used: "google/gemini-2.5-flash".to_string(),
        }
    }

    #[test]
    fn prompt_includes_every_form_field() {
        let form = PostForm {
            platform: Platform::LinkedIn,
            tone: Tone::DataDriven,
            topic: "Future of Remote Work".to_string(),
            keywords: "productivity, #remotefirst".to_string(),
            batch_count: 1,
            emoji_count: 3,
        };

        let prompt = build_prompt(&form);

        assert_eq!(
            prompt,
            "Generate a social media post for LinkedIn (Professional) on \
             'Future of Remote Work'. Include keywords/hashtags: productivity, \
             #remotefirst. Tone: Data-Driven. Use exactly 3 emojis. Highlight \
             important points with <b style='color:#FF5733'>bold colored text</b> \
             and make it engaging."
        );
    }

    #[tokio::test]
    async fn saving_prepends_newest_first_and_persists() {
        let (mut app, _dir) = test_app();
        app.form.topic = "topic".to_string();

        app.generated = vec![draft("first")];
        app.handle_action(AppAction::SavePost).await.unwrap();
        app.generated = vec![draft("second")];
        app.handle_action(AppAction::SavePost).await.unwrap();

        assert_eq!(app.saved.len(), 2);
        assert_eq!(app.saved[0].content, "second");
        assert_eq!(app.saved[1].content, "first");

        let persisted = app.store.load();
        assert_eq!(persisted, app.saved);
    }

    #[tokio::test]
    async fn saving_attaches_form_state_and_model() {
        let (mut app, _dir) = test_app();
        app.form.platform = Platform::Instagram;
        app.form.topic = "Coffee".to_string();
        app.form.keywords = "#coffee".to_string();
        app.generated = vec![draft("a post")];

        app.handle_action(AppAction::SavePost).await.unwrap();

        let record = &app.saved[0];
        assert_eq!(record.platform, "Instagram Caption");
        assert_eq!(record.topic, "Coffee");
        assert_eq!(record.keywords, "#coffee");
        assert_eq!(record.content, "a post");
        assert_eq!(record.model_used, "google/gemini-2.5-flash");
        assert!(!record.date.is_empty());
    }

    #[tokio::test]
    async fn deleting_keeps_remaining_posts_in_order() {
        let (mut app, _dir) = test_app();
        app.form.topic = "topic".to_string();
        for content in ["c", "b", "a"] {
            app.generated = vec![draft(content)];
            app.handle_action(AppAction::SavePost).await.unwrap();
        }
        // saved is now [a, b, c]
        app.tab = Tab::Saved;
        app.selected_saved = 1;

        app.handle_action(AppAction::DeleteSaved).await.unwrap();

        let contents: Vec<_> = app.saved.iter().map(|p| p.content.as_str()).collect();
        assert_eq!(contents, vec!["a", "c"]);
        assert_eq!(app.store.load(), app.saved);
    }

    #[tokio::test]
    async fn clear_all_empties_and_persists() {
        let (mut app, _dir) = test_app();
        app.form.topic = "topic".to_string();
        app.generated = vec![draft("a")];
        app.handle_action(AppAction::SavePost).await.unwrap();
        app.tab = Tab::Saved;

        app.handle_action(AppAction::ClearAllSaved).await.unwrap();

        assert!(app.saved.is_empty());
        assert!(app.store.load().is_empty());
    }

    #[tokio::test]
    async fn generate_without_topic_shows_error_and_does_nothing() {
        let (mut app, _dir) = test_app();

        app.handle_action(AppAction::Generate).await.unwrap();

        assert!(matches!(app.notice, Some((NoticeKind::Error, _))));
        assert_ne!(app.generation_status, GenerationStatus::Generating);
    }

    #[tokio::test]
    async fn export_without_sheets_config_shows_error() {
        let (mut app, _dir) = test_app();
        app.form.topic = "topic".to_string();
        app.generated = vec![draft("a")];

        app.handle_action(AppAction::ExportPost).await.unwrap();

        assert!(matches!(app.notice, Some((NoticeKind::Error, _))));
        assert!(!app.is_exporting);
    }

    #[tokio::test]
    async fn topic_popup_confirm_updates_form() {
        let (mut app, _dir) = test_app();

        app.handle_action(AppAction::EditTopic).await.unwrap();
        for c in "AI".chars() {
            app.handle_action(AppAction::InputChar(c)).await.unwrap();
        }
        app.handle_action(AppAction::InputConfirm).await.unwrap();

        assert_eq!(app.form.topic, "AI");
        assert!(!app.input_active);
    }
}
