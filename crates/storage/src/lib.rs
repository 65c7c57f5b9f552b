#![forbid(unsafe_code)]

pub mod files;
pub mod records;
pub mod repository;
pub mod sqlite;

pub use files::{FsQuestionSource, load_image_map};
pub use repository::{InMemoryRepository, KeyValueStore, QuestionSource, Storage, StorageError};
