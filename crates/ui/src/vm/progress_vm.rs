use quiz_core::model::{ChapterId, QuizScore};
use services::ProgressOverview;

use crate::vm::format::{format_date, tone_class};
use crate::vm::quiz_vm::CategoryRowVm;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LastQuizVm {
    pub date: String,
    pub chapter: String,
    pub score: u32,
    pub correct: u32,
    pub total: u32,
    pub tone: &'static str,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ChapterRowVm {
    pub label: String,
    pub correct: u32,
    pub total: u32,
    pub percentage: u32,
    pub tone: &'static str,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ProgressVm {
    pub percentage: u32,
    pub tone: &'static str,
    pub total_correct: u32,
    pub total_attempted: u32,
    pub quizzes_taken: usize,
    pub last_quiz: Option<LastQuizVm>,
    pub categories: Vec<CategoryRowVm>,
    pub chapters: Vec<ChapterRowVm>,
}

impl ProgressVm {
    #[must_use]
    pub fn has_history(&self) -> bool {
        self.quizzes_taken > 0
    }
}

/// One completed quiz in a chapter's history.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HistoryEntryVm {
    pub date: String,
    pub score: u32,
    pub correct: u32,
    pub total: u32,
    pub tone: &'static str,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ChapterHistoryVm {
    pub chapter_label: String,
    pub entries: Vec<HistoryEntryVm>,
}

/// History rows in the order the quizzes were taken.
#[must_use]
pub fn map_chapter_history(chapter: &ChapterId, scores: &[QuizScore]) -> ChapterHistoryVm {
    ChapterHistoryVm {
        chapter_label: format!("Chapter {chapter}"),
        entries: scores
            .iter()
            .map(|score| HistoryEntryVm {
                date: format_date(score.date),
                score: score.score,
                correct: score.correct,
                total: score.total_questions,
                tone: tone_class(score.score),
            })
            .collect(),
    }
}

#[must_use]
pub fn map_progress(overview: &ProgressOverview) -> ProgressVm {
    ProgressVm {
        percentage: overview.percentage,
        tone: tone_class(overview.percentage),
        total_correct: overview.total_correct,
        total_attempted: overview.total_attempted,
        quizzes_taken: overview.quizzes_taken,
        last_quiz: overview.last_score.as_ref().map(|score| LastQuizVm {
            date: format_date(score.date),
            chapter: format!("Chapter {}", score.chapter),
            score: score.score,
            correct: score.correct,
            total: score.total_questions,
            tone: tone_class(score.score),
        }),
        categories: overview
            .categories
            .iter()
            .map(|(category, bucket)| CategoryRowVm::new(category, bucket.correct, bucket.total))
            .collect(),
        chapters: overview
            .chapters
            .iter()
            .map(|(chapter, progress)| ChapterRowVm {
                label: format!("Chapter {chapter}"),
                correct: progress.correct,
                total: progress.total,
                percentage: progress.percentage,
                tone: tone_class(progress.percentage),
            })
            .collect(),
    }
}
