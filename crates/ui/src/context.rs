use std::sync::Arc;

use quiz_core::model::ChapterId;
use services::{ProgressStore, QuestionStore, QuizService};

pub trait UiApp: Send + Sync {
    fn default_chapter(&self) -> ChapterId;
    fn chapters(&self) -> Vec<ChapterId>;

    fn questions(&self) -> Arc<QuestionStore>;
    fn progress(&self) -> Arc<ProgressStore>;
    fn quiz(&self) -> Arc<QuizService>;
}

#[derive(Clone)]
pub struct AppContext {
    default_chapter: ChapterId,
    chapters: Vec<ChapterId>,

    questions: Arc<QuestionStore>,
    progress: Arc<ProgressStore>,
    quiz: Arc<QuizService>,
}

impl AppContext {
    #[must_use]
    pub fn new(app: &Arc<dyn UiApp>) -> Self {
        let default_chapter = app.default_chapter();
        let mut chapters = app.chapters();
        if chapters.is_empty() {
            chapters.push(default_chapter.clone());
        }

        Self {
            default_chapter,
            chapters,
            questions: app.questions(),
            progress: app.progress(),
            quiz: app.quiz(),
        }
    }

    #[must_use]
    pub fn default_chapter(&self) -> ChapterId {
        self.default_chapter.clone()
    }

    /// Chapters offered in the chapter selects.
    #[must_use]
    pub fn chapters(&self) -> &[ChapterId] {
        &self.chapters
    }

    #[must_use]
    pub fn questions(&self) -> Arc<QuestionStore> {
        Arc::clone(&self.questions)
    }

    #[must_use]
    pub fn progress(&self) -> Arc<ProgressStore> {
        Arc::clone(&self.progress)
    }

    #[must_use]
    pub fn quiz(&self) -> Arc<QuizService> {
        Arc::clone(&self.quiz)
    }
}

// This context is provided by the application composition root (e.g. `crates/app`).

/// Build an `AppContext` from a UI-facing app implementation.
#[must_use]
pub fn build_app_context(app: &Arc<dyn UiApp>) -> AppContext {
    AppContext::new(app)
}
