pub mod flow;
pub mod order;
pub mod service;

pub use flow::{AnswerFeedback, OptionState, QuizFlow, QuizPhase, QuizStep, RecordedAnswer, Score};
pub use order::{CategoryFilter, SortOrder, pick_random, sort_by_figure};
pub use service::{QuizAdvance, QuizService};
