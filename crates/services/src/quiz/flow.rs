use std::collections::BTreeMap;

use quiz_core::model::{
    AnswerOption, Category, CategoryResult, ChapterId, Question, QuestionId, QuizResults,
    percentage,
};
use rand::Rng;

use crate::error::QuizFlowError;
use crate::quiz::order::{CategoryFilter, SortOrder};

//
// ─── STATE ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuizPhase {
    Loading,
    Ready,
    Answering,
    Revealed,
    Completed,
}

/// An answer the learner committed to, keyed by question id in the flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecordedAnswer {
    pub selected: AnswerOption,
    pub is_correct: bool,
}

/// What the view shows after an answer is submitted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnswerFeedback {
    pub selected: AnswerOption,
    pub correct_answer: AnswerOption,
    pub is_correct: bool,
    pub explanation: String,
}

/// Display state of a single option.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OptionState {
    Neutral,
    Selected,
    Correct,
    Incorrect,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Score {
    pub correct: u32,
    pub answered: u32,
    pub percentage: u32,
}

/// Result of moving past a revealed answer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QuizStep {
    Next,
    Completed(QuizResults),
}

//
// ─── FLOW ─────────────────────────────────────────────────────────────────────
//

/// Answering state machine for one chapter's quiz.
///
/// The ordered view is rebuilt from the loaded questions whenever the
/// filter or sort changes. Answers survive those rebuilds and are only
/// cleared by a reload or [`QuizFlow::restart`].
#[derive(Debug, Clone)]
pub struct QuizFlow {
    chapter: ChapterId,
    phase: QuizPhase,
    generation: u64,
    questions: Vec<Question>,
    view: Vec<Question>,
    filter: CategoryFilter,
    sort: SortOrder,
    index: usize,
    selected: Option<AnswerOption>,
    answers: BTreeMap<QuestionId, RecordedAnswer>,
}

impl QuizFlow {
    /// A flow waiting for its first load.
    #[must_use]
    pub fn loading(chapter: ChapterId) -> Self {
        Self {
            chapter,
            phase: QuizPhase::Loading,
            generation: 0,
            questions: Vec::new(),
            view: Vec::new(),
            filter: CategoryFilter::All,
            sort: SortOrder::Default,
            index: 0,
            selected: None,
            answers: BTreeMap::new(),
        }
    }

    /// Switch to `chapter` and return the token the matching load must present.
    pub fn begin_load(&mut self, chapter: ChapterId) -> u64 {
        self.generation += 1;
        self.chapter = chapter;
        self.phase = QuizPhase::Loading;
        self.questions.clear();
        self.view.clear();
        self.answers.clear();
        self.index = 0;
        self.selected = None;
        self.generation
    }

    /// Install loaded questions. Returns `false` for a superseded load.
    pub fn finish_load<R: Rng + ?Sized>(
        &mut self,
        generation: u64,
        questions: Vec<Question>,
        rng: &mut R,
    ) -> bool {
        if generation != self.generation || self.phase != QuizPhase::Loading {
            tracing::debug!(generation, current = self.generation, "dropping stale load");
            return false;
        }
        self.questions = questions;
        self.rebuild(rng);
        true
    }

    pub fn set_filter<R: Rng + ?Sized>(&mut self, filter: CategoryFilter, rng: &mut R) {
        self.filter = filter;
        if self.phase != QuizPhase::Loading {
            self.rebuild(rng);
        }
    }

    pub fn set_sort<R: Rng + ?Sized>(&mut self, sort: SortOrder, rng: &mut R) {
        self.sort = sort;
        if self.phase != QuizPhase::Loading {
            self.rebuild(rng);
        }
    }

    fn rebuild<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        let mut view = self.filter.apply(&self.questions);
        self.sort.apply(&mut view, rng);
        self.view = view;
        self.index = 0;
        self.selected = None;
        self.phase = QuizPhase::Ready;
    }

    /// # Errors
    ///
    /// Returns `QuizFlowError::Empty` if no question matches the filter.
    pub fn start(&mut self) -> Result<(), QuizFlowError> {
        match self.phase {
            QuizPhase::Loading => Err(QuizFlowError::NotReady),
            QuizPhase::Completed => Err(QuizFlowError::Completed),
            QuizPhase::Answering | QuizPhase::Revealed => Ok(()),
            QuizPhase::Ready if self.view.is_empty() => Err(QuizFlowError::Empty),
            QuizPhase::Ready => {
                self.phase = QuizPhase::Answering;
                Ok(())
            }
        }
    }

    /// # Errors
    ///
    /// Returns `QuizFlowError::Locked` once the answer has been revealed.
    pub fn select(&mut self, option: AnswerOption) -> Result<(), QuizFlowError> {
        self.expect_answering()?;
        self.selected = Some(option);
        Ok(())
    }

    /// Record the selection for the current question and reveal the answer.
    ///
    /// # Errors
    ///
    /// Returns `QuizFlowError::NoSelection` if nothing is selected.
    pub fn submit(&mut self) -> Result<AnswerFeedback, QuizFlowError> {
        self.expect_answering()?;
        let selected = self.selected.ok_or(QuizFlowError::NoSelection)?;
        let question = self.view.get(self.index).ok_or(QuizFlowError::Empty)?;
        let is_correct = question.is_correct(selected);
        let feedback = AnswerFeedback {
            selected,
            correct_answer: question.correct_answer(),
            is_correct,
            explanation: question.explanation().to_owned(),
        };
        self.answers.insert(
            question.id().clone(),
            RecordedAnswer {
                selected,
                is_correct,
            },
        );
        self.phase = QuizPhase::Revealed;
        Ok(feedback)
    }

    fn expect_answering(&self) -> Result<(), QuizFlowError> {
        match self.phase {
            QuizPhase::Answering => Ok(()),
            QuizPhase::Revealed => Err(QuizFlowError::Locked),
            QuizPhase::Completed => Err(QuizFlowError::Completed),
            QuizPhase::Loading | QuizPhase::Ready => Err(QuizFlowError::NotReady),
        }
    }

    /// Per-option display state for the current question.
    #[must_use]
    pub fn option_states(&self) -> Vec<(AnswerOption, OptionState)> {
        let Some(question) = self.current() else {
            return Vec::new();
        };
        AnswerOption::ALL
            .into_iter()
            .map(|option| {
                let state = match self.phase {
                    QuizPhase::Revealed if question.is_correct(option) => OptionState::Correct,
                    QuizPhase::Revealed if self.selected == Some(option) => OptionState::Incorrect,
                    QuizPhase::Answering if self.selected == Some(option) => OptionState::Selected,
                    _ => OptionState::Neutral,
                };
                (option, state)
            })
            .collect()
    }

    /// Move past a revealed answer, completing the quiz on the last question.
    ///
    /// # Errors
    ///
    /// Returns `QuizFlowError::NotRevealed` before the answer is submitted.
    pub fn advance(&mut self) -> Result<QuizStep, QuizFlowError> {
        match self.phase {
            QuizPhase::Revealed => {}
            QuizPhase::Completed => return Err(QuizFlowError::Completed),
            QuizPhase::Loading => return Err(QuizFlowError::NotReady),
            QuizPhase::Ready | QuizPhase::Answering => return Err(QuizFlowError::NotRevealed),
        }

        if self.index + 1 < self.view.len() {
            self.index += 1;
            self.selected = None;
            self.phase = QuizPhase::Answering;
            return Ok(QuizStep::Next);
        }

        let results = self.results()?;
        self.phase = QuizPhase::Completed;
        tracing::debug!(
            chapter = %self.chapter,
            correct = results.correct(),
            total = results.total(),
            "quiz completed"
        );
        Ok(QuizStep::Completed(results))
    }

    /// # Errors
    ///
    /// Returns `QuizFlowError::AtStart` on the first question.
    pub fn previous(&mut self) -> Result<(), QuizFlowError> {
        match self.phase {
            QuizPhase::Answering | QuizPhase::Revealed => {}
            QuizPhase::Completed => return Err(QuizFlowError::Completed),
            QuizPhase::Loading | QuizPhase::Ready => return Err(QuizFlowError::NotReady),
        }
        if self.index == 0 {
            return Err(QuizFlowError::AtStart);
        }
        self.index -= 1;
        self.selected = None;
        self.phase = QuizPhase::Answering;
        Ok(())
    }

    /// Forget every answer and go back to the first question.
    pub fn restart(&mut self) {
        if self.phase == QuizPhase::Loading {
            return;
        }
        self.answers.clear();
        self.index = 0;
        self.selected = None;
        self.phase = QuizPhase::Ready;
    }

    #[must_use]
    pub fn score(&self) -> Score {
        let answered = u32::try_from(self.answers.len()).unwrap_or(u32::MAX);
        let correct = u32::try_from(self.answers.values().filter(|a| a.is_correct).count())
            .unwrap_or(u32::MAX);
        Score {
            correct,
            answered,
            percentage: percentage(correct, answered),
        }
    }

    /// Tally of recorded answers, grouped by each question's category.
    ///
    /// # Errors
    ///
    /// Returns `QuizFlowError::InvalidResults` if the tally is inconsistent.
    pub fn results(&self) -> Result<QuizResults, QuizFlowError> {
        let mut by_category: BTreeMap<Category, (u32, u32)> = BTreeMap::new();
        for question in &self.questions {
            let Some(answer) = self.answers.get(question.id()) else {
                continue;
            };
            let entry = by_category.entry(question.category().clone()).or_default();
            entry.1 += 1;
            if answer.is_correct {
                entry.0 += 1;
            }
        }
        let category_results = by_category
            .into_iter()
            .map(|(category, (correct, total))| CategoryResult {
                category,
                correct,
                total,
            })
            .collect();

        let score = self.score();
        QuizResults::new(
            self.chapter.clone(),
            score.correct,
            score.answered,
            category_results,
        )
        .map_err(|_| QuizFlowError::InvalidResults)
    }

    //
    // ─── ACCESSORS ────────────────────────────────────────────────────────────
    //

    #[must_use]
    pub fn chapter(&self) -> &ChapterId {
        &self.chapter
    }

    #[must_use]
    pub fn phase(&self) -> QuizPhase {
        self.phase
    }

    #[must_use]
    pub fn generation(&self) -> u64 {
        self.generation
    }

    #[must_use]
    pub fn filter(&self) -> &CategoryFilter {
        &self.filter
    }

    #[must_use]
    pub fn sort(&self) -> SortOrder {
        self.sort
    }

    /// Categories present in the loaded questions, for the filter select.
    #[must_use]
    pub fn categories(&self) -> Vec<Category> {
        let mut categories: Vec<Category> =
            self.questions.iter().map(|q| q.category().clone()).collect();
        categories.sort();
        categories.dedup();
        categories
    }

    #[must_use]
    pub fn loaded_count(&self) -> usize {
        self.questions.len()
    }

    #[must_use]
    pub fn questions(&self) -> &[Question] {
        &self.view
    }

    #[must_use]
    pub fn current(&self) -> Option<&Question> {
        self.view.get(self.index)
    }

    #[must_use]
    pub fn index(&self) -> usize {
        self.index
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.view.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.view.is_empty()
    }

    #[must_use]
    pub fn selected(&self) -> Option<AnswerOption> {
        self.selected
    }

    #[must_use]
    pub fn answer_for(&self, id: &QuestionId) -> Option<RecordedAnswer> {
        self.answers.get(id).copied()
    }

    #[must_use]
    pub fn is_last(&self) -> bool {
        self.index + 1 >= self.view.len()
    }

    /// Completed fraction of the view, as a whole percentage.
    #[must_use]
    pub fn progress_percent(&self) -> u32 {
        let position = u32::try_from(self.index + 1).unwrap_or(u32::MAX);
        let total = u32::try_from(self.view.len()).unwrap_or(u32::MAX);
        percentage(position.min(total), total)
    }
}
