//! Shared error types for the services crate.

use thiserror::Error;

use quiz_core::model::ProgressError;
use storage::repository::StorageError;
use storage::sqlite::SqliteInitError;

/// Errors emitted by `ProgressStore`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ProgressStoreError {
    #[error("stored profile is corrupt: {0}")]
    Corrupt(String),
    #[error(transparent)]
    Progress(#[from] ProgressError),
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Errors emitted by quiz state transitions.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum QuizFlowError {
    #[error("questions are still loading")]
    NotReady,
    #[error("no questions match the current filter")]
    Empty,
    #[error("no option selected")]
    NoSelection,
    #[error("answer already revealed")]
    Locked,
    #[error("answer not revealed yet")]
    NotRevealed,
    #[error("already at the first question")]
    AtStart,
    #[error("quiz already completed")]
    Completed,
    #[error("quiz produced inconsistent results")]
    InvalidResults,
}

/// Errors emitted while bootstrapping app services.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AppServicesError {
    #[error(transparent)]
    Sqlite(#[from] SqliteInitError),
}
