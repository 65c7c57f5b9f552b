use quiz_core::model::{AnswerOption, Category, QuizResults};
use services::{ImageResolver, OptionState, QuizFlow, QuizPhase};

use crate::vm::format::{difficulty_label, figure_label, tone_class};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OptionVm {
    pub option: AnswerOption,
    pub letter: &'static str,
    pub text: String,
    pub class: &'static str,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FeedbackVm {
    pub is_correct: bool,
    pub headline: String,
    pub explanation: String,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct QuestionVm {
    pub position_label: String,
    pub progress_percent: u32,
    pub figure_label: Option<String>,
    pub category_label: String,
    pub difficulty_label: Option<&'static str>,
    pub text: String,
    pub image_url: String,
    pub options: Vec<OptionVm>,
    pub revealed: bool,
    pub can_submit: bool,
    pub can_go_back: bool,
    pub next_label: &'static str,
    pub feedback: Option<FeedbackVm>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CategoryRowVm {
    pub name: String,
    pub correct: u32,
    pub total: u32,
    pub percentage: u32,
    pub tone: &'static str,
}

impl CategoryRowVm {
    #[must_use]
    pub fn new(category: &Category, correct: u32, total: u32) -> Self {
        let percentage = quiz_core::model::percentage(correct, total);
        Self {
            name: category.display_name(),
            correct,
            total,
            percentage,
            tone: tone_class(percentage),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ResultsVm {
    pub correct: u32,
    pub total: u32,
    pub percentage: u32,
    pub tone: &'static str,
    pub categories: Vec<CategoryRowVm>,
}

impl From<&QuizResults> for ResultsVm {
    fn from(results: &QuizResults) -> Self {
        Self {
            correct: results.correct(),
            total: results.total(),
            percentage: results.percentage(),
            tone: tone_class(results.percentage()),
            categories: results
                .category_results()
                .iter()
                .map(|row| CategoryRowVm::new(&row.category, row.correct, row.total))
                .collect(),
        }
    }
}

/// Everything the quiz page renders, derived from the flow.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum QuizScreenVm {
    Loading,
    /// Nothing loaded for the chapter, or nothing matches the filter.
    Empty { filtered: bool },
    Ready { count: usize },
    Question(QuestionVm),
    Completed(ResultsVm),
}

fn option_class(state: OptionState) -> &'static str {
    match state {
        OptionState::Neutral => "quiz-option",
        OptionState::Selected => "quiz-option quiz-option--selected",
        OptionState::Correct => "quiz-option quiz-option--correct",
        OptionState::Incorrect => "quiz-option quiz-option--incorrect",
    }
}

#[must_use]
pub fn map_quiz_screen(flow: &QuizFlow, images: &ImageResolver) -> QuizScreenVm {
    match flow.phase() {
        QuizPhase::Loading => QuizScreenVm::Loading,
        QuizPhase::Ready if flow.is_empty() => QuizScreenVm::Empty {
            filtered: flow.loaded_count() > 0,
        },
        QuizPhase::Ready => QuizScreenVm::Ready { count: flow.len() },
        QuizPhase::Completed => match flow.results() {
            Ok(results) => QuizScreenVm::Completed(ResultsVm::from(&results)),
            Err(_) => QuizScreenVm::Empty { filtered: false },
        },
        QuizPhase::Answering | QuizPhase::Revealed => map_question(flow, images),
    }
}

fn map_question(flow: &QuizFlow, images: &ImageResolver) -> QuizScreenVm {
    let Some(question) = flow.current() else {
        return QuizScreenVm::Empty { filtered: false };
    };
    let revealed = flow.phase() == QuizPhase::Revealed;

    let options = flow
        .option_states()
        .into_iter()
        .map(|(option, state)| OptionVm {
            option,
            letter: option.letter(),
            text: question.option(option).to_owned(),
            class: option_class(state),
        })
        .collect();

    let feedback = revealed
        .then(|| flow.answer_for(question.id()))
        .flatten()
        .map(|answer| FeedbackVm {
            is_correct: answer.is_correct,
            headline: if answer.is_correct {
                "Correct!".to_owned()
            } else {
                format!("Incorrect. The answer is {}.", question.correct_answer())
            },
            explanation: question.explanation().to_owned(),
        });

    QuizScreenVm::Question(QuestionVm {
        position_label: format!("Question {} of {}", flow.index() + 1, flow.len()),
        progress_percent: flow.progress_percent(),
        figure_label: figure_label(question.figure_number()),
        category_label: question.category().display_name(),
        difficulty_label: question.difficulty().map(difficulty_label),
        text: question.question_text().to_owned(),
        image_url: images.resolve(question),
        options,
        revealed,
        can_submit: !revealed && flow.selected().is_some(),
        can_go_back: flow.index() > 0,
        next_label: if flow.is_last() { "Finish Quiz" } else { "Next Question" },
        feedback,
    })
}
