use async_trait::async_trait;
use quiz_core::model::{ChapterId, Question};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use thiserror::Error;

/// Errors surfaced by storage adapters.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StorageError {
    #[error("not found")]
    NotFound,

    #[error("io error: {0}")]
    Io(String),

    #[error("connection error: {0}")]
    Connection(String),

    #[error("serialization error: {0}")]
    Serialization(String),
}

/// Read-only access to question resources.
#[async_trait]
pub trait QuestionSource: Send + Sync {
    /// Load the structured resource for one chapter.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::NotFound` if the chapter has no structured
    /// resource, or other storage errors if it cannot be read or parsed.
    async fn chapter_questions(&self, chapter: &ChapterId) -> Result<Vec<Question>, StorageError>;

    /// Load the flat tabular resource holding every chapter.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::NotFound` if there is no tabular resource, or
    /// other storage errors if it cannot be read or parsed.
    async fn all_questions(&self) -> Result<Vec<Question>, StorageError>;
}

/// String key-value persistence, replacing browser local storage.
///
/// Values are replaced wholesale on every `put`.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Fetch the value stored under `key`.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the backend cannot be read.
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Store `value` under `key`, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the backend cannot be written.
    async fn put(&self, key: &str, value: &str) -> Result<(), StorageError>;
}

/// Simple in-memory repository implementation for testing and prototyping.
///
/// Chapters and the flat list start out missing, so both loads report
/// `StorageError::NotFound` until data is installed.
#[derive(Clone, Default)]
pub struct InMemoryRepository {
    chapters: Arc<Mutex<HashMap<ChapterId, Vec<Question>>>>,
    flat: Arc<Mutex<Option<Vec<Question>>>>,
    entries: Arc<Mutex<HashMap<String, String>>>,
}

impl InMemoryRepository {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Install the structured resource for a chapter.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Connection` if the lock is poisoned.
    pub fn set_chapter(
        &self,
        chapter: ChapterId,
        questions: Vec<Question>,
    ) -> Result<(), StorageError> {
        let mut guard = self
            .chapters
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        guard.insert(chapter, questions);
        Ok(())
    }

    /// Install the flat tabular resource.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Connection` if the lock is poisoned.
    pub fn set_all(&self, questions: Vec<Question>) -> Result<(), StorageError> {
        let mut guard = self
            .flat
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        *guard = Some(questions);
        Ok(())
    }
}

#[async_trait]
impl QuestionSource for InMemoryRepository {
    async fn chapter_questions(&self, chapter: &ChapterId) -> Result<Vec<Question>, StorageError> {
        let guard = self
            .chapters
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        guard.get(chapter).cloned().ok_or(StorageError::NotFound)
    }

    async fn all_questions(&self) -> Result<Vec<Question>, StorageError> {
        let guard = self
            .flat
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        guard.clone().ok_or(StorageError::NotFound)
    }
}

#[async_trait]
impl KeyValueStore for InMemoryRepository {
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let guard = self
            .entries
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        Ok(guard.get(key).cloned())
    }

    async fn put(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let mut guard = self
            .entries
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        guard.insert(key.to_owned(), value.to_owned());
        Ok(())
    }
}

/// Aggregates question and key-value backends behind trait objects for easy swapping.
#[derive(Clone)]
pub struct Storage {
    pub questions: Arc<dyn QuestionSource>,
    pub kv: Arc<dyn KeyValueStore>,
}

impl Storage {
    #[must_use]
    pub fn in_memory() -> Self {
        Self::from_repository(InMemoryRepository::new())
    }

    /// Storage backed by a shared in-memory repository, so tests can keep a
    /// handle for seeding data.
    #[must_use]
    pub fn from_repository(repo: InMemoryRepository) -> Self {
        let questions: Arc<dyn QuestionSource> = Arc::new(repo.clone());
        let kv: Arc<dyn KeyValueStore> = Arc::new(repo);
        Self { questions, kv }
    }
}
