mod figure;
mod ids;
mod image_map;
mod progress;
mod question;

pub use figure::FigureNumber;
pub use ids::{Category, ChapterId, DEFAULT_CATEGORIES, IdError, QuestionId};
pub use image_map::ImageMap;
pub use progress::{
    CategoryResult, ChapterProgress, ProgressBucket, ProgressError, QuizResults, QuizScore,
    UserProfile, percentage,
};
pub use question::{AnswerOption, Difficulty, Question, QuestionDraft, QuestionError};
