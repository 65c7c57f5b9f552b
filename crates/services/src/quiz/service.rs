use std::sync::Arc;

use quiz_core::model::{ChapterId, QuizResults};

use crate::error::QuizFlowError;
use crate::progress_store::ProgressStore;
use crate::question_store::QuestionStore;
use crate::quiz::flow::{QuizFlow, QuizStep};

/// Outcome of [`QuizService::advance`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QuizAdvance {
    Next,
    Completed { results: QuizResults, saved: bool },
}

/// Connects a [`QuizFlow`] to the question and progress stores.
#[derive(Clone)]
pub struct QuizService {
    questions: Arc<QuestionStore>,
    progress: Arc<ProgressStore>,
}

impl QuizService {
    #[must_use]
    pub fn new(questions: Arc<QuestionStore>, progress: Arc<ProgressStore>) -> Self {
        Self {
            questions,
            progress,
        }
    }

    /// Load `chapter` into a fresh flow, leaving it `Ready`.
    pub async fn start(&self, chapter: ChapterId) -> QuizFlow {
        let mut flow = QuizFlow::loading(chapter.clone());
        self.reload(&mut flow, chapter).await;
        flow
    }

    /// Reload `flow` for `chapter`. Returns `false` if a newer load won.
    pub async fn reload(&self, flow: &mut QuizFlow, chapter: ChapterId) -> bool {
        let generation = flow.begin_load(chapter.clone());
        let questions = self.questions.by_chapter(&chapter).await;
        tracing::debug!(%chapter, count = questions.len(), "quiz questions loaded");
        flow.finish_load(generation, questions, &mut rand::rng())
    }

    /// Advance the flow and persist results when the quiz completes.
    ///
    /// # Errors
    ///
    /// Propagates the flow's transition errors.
    pub async fn advance(&self, flow: &mut QuizFlow) -> Result<QuizAdvance, QuizFlowError> {
        match flow.advance()? {
            QuizStep::Next => Ok(QuizAdvance::Next),
            QuizStep::Completed(results) => {
                let saved = self.save_results(&results).await;
                Ok(QuizAdvance::Completed { results, saved })
            }
        }
    }

    /// Persist the results a completed flow yielded.
    ///
    /// Callers that hold the flow behind shared state advance it first and
    /// save afterwards, so the flow is `Completed` before anything awaits.
    pub async fn save_results(&self, results: &QuizResults) -> bool {
        self.progress.save_quiz_results(results).await
    }

    #[must_use]
    pub fn questions(&self) -> &QuestionStore {
        &self.questions
    }

    #[must_use]
    pub fn progress(&self) -> &ProgressStore {
        &self.progress
    }
}
