use std::sync::Arc;

use quiz_core::Clock;
use quiz_core::model::{
    Category, ChapterId, ChapterProgress, ProgressBucket, QuizResults, QuizScore, UserProfile,
};
use storage::repository::KeyValueStore;
use tokio::sync::Mutex;

use crate::error::ProgressStoreError;

/// Key under which the serialized profile is stored.
pub const DEFAULT_PROFILE_KEY: &str = "user_data";

/// Aggregate numbers for the progress page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProgressOverview {
    pub total_correct: u32,
    pub total_attempted: u32,
    pub percentage: u32,
    pub quizzes_taken: usize,
    pub last_score: Option<QuizScore>,
    pub categories: Vec<(Category, ProgressBucket)>,
    pub chapters: Vec<(ChapterId, ChapterProgress)>,
}

impl ProgressOverview {
    fn from_profile(profile: &UserProfile) -> Self {
        Self {
            total_correct: profile.total_correct(),
            total_attempted: profile.total_questions_attempted(),
            percentage: profile.overall_percentage(),
            quizzes_taken: profile.quiz_scores().len(),
            last_score: profile.last_score().cloned(),
            categories: profile
                .categories_progress()
                .iter()
                .map(|(category, bucket)| (category.clone(), *bucket))
                .collect(),
            chapters: profile
                .chapter_buckets()
                .iter()
                .map(|(chapter, bucket)| (chapter.clone(), ChapterProgress::from(*bucket)))
                .collect(),
        }
    }
}

/// Persists the single learner profile as JSON in a key-value store.
///
/// Read helpers are lenient and fall back to a fresh profile; `try_*`
/// variants surface the typed error.
pub struct ProgressStore {
    clock: Clock,
    store: Arc<dyn KeyValueStore>,
    key: String,
    write_lock: Mutex<()>,
}

impl ProgressStore {
    #[must_use]
    pub fn new(clock: Clock, store: Arc<dyn KeyValueStore>) -> Self {
        Self::with_key(clock, store, DEFAULT_PROFILE_KEY)
    }

    #[must_use]
    pub fn with_key(clock: Clock, store: Arc<dyn KeyValueStore>, key: impl Into<String>) -> Self {
        Self {
            clock,
            store,
            key: key.into(),
            write_lock: Mutex::new(()),
        }
    }

    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }

    /// The stored profile, creating and persisting one when absent.
    ///
    /// Corrupt data or a failing backend yields a fresh, unsaved profile.
    pub async fn current_user(&self) -> UserProfile {
        match self.try_current_user().await {
            Ok(profile) => profile,
            Err(err) => {
                tracing::warn!(key = %self.key, error = %err, "using a fresh profile");
                UserProfile::new(self.clock.now())
            }
        }
    }

    /// Strict form of [`Self::current_user`].
    ///
    /// # Errors
    ///
    /// Returns `ProgressStoreError` if the stored value cannot be read,
    /// parsed or validated, or a new profile cannot be persisted.
    pub async fn try_current_user(&self) -> Result<UserProfile, ProgressStoreError> {
        if let Some(profile) = self.load().await? {
            return Ok(profile);
        }

        let _guard = self.write_lock.lock().await;
        // Another writer may have created it while we waited.
        if let Some(profile) = self.load().await? {
            return Ok(profile);
        }
        let profile = UserProfile::new(self.clock.now());
        self.persist(&profile).await?;
        tracing::info!(user = profile.id(), "created learner profile");
        Ok(profile)
    }

    /// Fold a finished quiz into the stored profile. Returns `false` on failure.
    pub async fn save_quiz_results(&self, results: &QuizResults) -> bool {
        match self.try_save_quiz_results(results).await {
            Ok(_) => true,
            Err(err) => {
                tracing::error!(key = %self.key, error = %err, "failed to save quiz results");
                false
            }
        }
    }

    /// Read-modify-write of the profile for one completed quiz.
    ///
    /// # Errors
    ///
    /// Returns `ProgressStoreError` if the stored profile is unreadable or
    /// corrupt, or the update cannot be persisted.
    pub async fn try_save_quiz_results(
        &self,
        results: &QuizResults,
    ) -> Result<UserProfile, ProgressStoreError> {
        let _guard = self.write_lock.lock().await;
        let mut profile = match self.load().await? {
            Some(profile) => profile,
            None => UserProfile::new(self.clock.now()),
        };
        profile.record_quiz(results, self.clock.now());
        profile.validate()?;
        self.persist(&profile).await?;
        tracing::info!(
            chapter = %results.chapter(),
            correct = results.correct(),
            total = results.total(),
            "saved quiz results"
        );
        Ok(profile)
    }

    pub async fn chapter_history(&self, chapter: &ChapterId) -> Vec<QuizScore> {
        self.current_user().await.chapter_history(chapter)
    }

    pub async fn chapter_progress(&self, chapter: &ChapterId) -> ChapterProgress {
        self.current_user().await.chapter_progress(chapter)
    }

    pub async fn overview(&self) -> ProgressOverview {
        ProgressOverview::from_profile(&self.current_user().await)
    }

    /// Zero every counter and clear history. Returns `false` on failure.
    pub async fn reset_progress(&self) -> bool {
        match self.try_reset_progress().await {
            Ok(_) => true,
            Err(err) => {
                tracing::error!(key = %self.key, error = %err, "failed to reset progress");
                false
            }
        }
    }

    /// Reset the profile, replacing it outright when the stored value is corrupt.
    ///
    /// # Errors
    ///
    /// Returns `ProgressStoreError::Storage` if the backend cannot be read
    /// or written.
    pub async fn try_reset_progress(&self) -> Result<UserProfile, ProgressStoreError> {
        let _guard = self.write_lock.lock().await;
        let mut profile = match self.load().await {
            Ok(Some(profile)) => profile,
            Ok(None) | Err(ProgressStoreError::Corrupt(_) | ProgressStoreError::Progress(_)) => {
                UserProfile::new(self.clock.now())
            }
            Err(err) => return Err(err),
        };
        profile.reset();
        self.persist(&profile).await?;
        tracing::info!(user = profile.id(), "reset progress");
        Ok(profile)
    }

    async fn load(&self) -> Result<Option<UserProfile>, ProgressStoreError> {
        let Some(raw) = self.store.get(&self.key).await? else {
            return Ok(None);
        };
        let profile: UserProfile = serde_json::from_str(&raw)
            .map_err(|err| ProgressStoreError::Corrupt(err.to_string()))?;
        profile.validate()?;
        Ok(Some(profile))
    }

    async fn persist(&self, profile: &UserProfile) -> Result<(), ProgressStoreError> {
        let raw = serde_json::to_string(profile)
            .map_err(|err| ProgressStoreError::Corrupt(err.to_string()))?;
        self.store.put(&self.key, &raw).await?;
        Ok(())
    }
}
