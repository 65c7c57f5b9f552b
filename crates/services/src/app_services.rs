use std::path::PathBuf;
use std::sync::Arc;

use quiz_core::model::ChapterId;
use storage::repository::Storage;

use crate::Clock;
use crate::error::AppServicesError;
use crate::images::ImageResolver;
use crate::progress_store::ProgressStore;
use crate::question_store::QuestionStore;
use crate::quiz::QuizService;
use crate::settings::StoreSettings;

/// Assembles app-facing services over a storage backend.
#[derive(Clone)]
pub struct AppServices {
    default_chapter: ChapterId,
    chapters: Vec<ChapterId>,
    questions: Arc<QuestionStore>,
    progress: Arc<ProgressStore>,
    quiz: Arc<QuizService>,
}

impl AppServices {
    #[must_use]
    pub fn new(storage: &Storage, clock: Clock, settings: StoreSettings) -> Self {
        let images = ImageResolver::new(
            &settings.asset_base,
            &settings.placeholder_image,
            settings.image_map,
        );
        let mut questions = QuestionStore::new(Arc::clone(&storage.questions), images);
        if settings.use_fixtures {
            questions = questions.with_fixtures();
        }
        let questions = Arc::new(questions);
        let progress = Arc::new(ProgressStore::with_key(
            clock,
            Arc::clone(&storage.kv),
            settings.profile_key,
        ));
        let quiz = Arc::new(QuizService::new(
            Arc::clone(&questions),
            Arc::clone(&progress),
        ));

        let mut chapters = settings.chapters;
        if !chapters.contains(&settings.default_chapter) {
            chapters.insert(0, settings.default_chapter.clone());
        }

        Self {
            default_chapter: settings.default_chapter,
            chapters,
            questions,
            progress,
            quiz,
        }
    }

    /// Build services with progress in `SQLite` and questions under `data_root`.
    ///
    /// # Errors
    ///
    /// Returns `AppServicesError` if storage initialization fails.
    pub async fn new_sqlite(
        db_url: &str,
        data_root: impl Into<PathBuf>,
        clock: Clock,
        settings: StoreSettings,
    ) -> Result<Self, AppServicesError> {
        let storage = Storage::sqlite(db_url, data_root).await?;
        Ok(Self::new(&storage, clock, settings))
    }

    #[must_use]
    pub fn default_chapter(&self) -> &ChapterId {
        &self.default_chapter
    }

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
