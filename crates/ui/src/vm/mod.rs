mod format;
mod progress_vm;
mod quiz_vm;
mod study_vm;

pub use format::{difficulty_label, figure_label, format_date, format_datetime, tone_class};
pub use progress_vm::{
    ChapterHistoryVm, ChapterRowVm, HistoryEntryVm, LastQuizVm, ProgressVm, map_chapter_history,
    map_progress,
};
pub use quiz_vm::{
    CategoryRowVm, FeedbackVm, OptionVm, QuestionVm, QuizScreenVm, ResultsVm, map_quiz_screen,
};
pub use study_vm::{StudyFigureVm, map_study_figure};
