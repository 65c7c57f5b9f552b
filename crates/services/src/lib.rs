#![forbid(unsafe_code)]

pub mod app_services;
pub mod error;
pub mod fixtures;
pub mod images;
pub mod progress_store;
pub mod question_store;
pub mod quiz;
pub mod settings;
pub mod study;

pub use quiz_core::Clock;

pub use app_services::AppServices;
pub use error::{AppServicesError, ProgressStoreError, QuizFlowError};
pub use images::{ImageResolver, ImageSource};
pub use progress_store::{DEFAULT_PROFILE_KEY, ProgressOverview, ProgressStore};
pub use question_store::QuestionStore;
pub use quiz::{
    AnswerFeedback, CategoryFilter, OptionState, QuizAdvance, QuizFlow, QuizPhase, QuizService,
    QuizStep, Score, SortOrder,
};
pub use settings::{DEFAULT_ASSET_BASE, DEFAULT_PLACEHOLDER_IMAGE, StoreSettings};
pub use study::{StudyFlow, ZoomLevel};
