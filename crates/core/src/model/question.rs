use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use crate::model::figure::FigureNumber;
use crate::model::ids::{Category, ChapterId, IdError, QuestionId};

//
// ─── ERRORS ───────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum QuestionError {
    #[error(transparent)]
    InvalidId(#[from] IdError),
    #[error("question text cannot be empty")]
    EmptyText,
    #[error("invalid correct answer: {0:?}")]
    InvalidAnswer(String),
    #[error("invalid difficulty: {0:?}")]
    InvalidDifficulty(String),
}

//
// ─── ANSWER OPTION ────────────────────────────────────────────────────────────
//

/// One of the four multiple-choice slots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum AnswerOption {
    A,
    B,
    C,
    D,
}

impl AnswerOption {
    pub const ALL: [AnswerOption; 4] = [Self::A, Self::B, Self::C, Self::D];

    #[must_use]
    pub fn letter(self) -> &'static str {
        match self {
            Self::A => "A",
            Self::B => "B",
            Self::C => "C",
            Self::D => "D",
        }
    }

    fn index(self) -> usize {
        match self {
            Self::A => 0,
            Self::B => 1,
            Self::C => 2,
            Self::D => 3,
        }
    }
}

impl FromStr for AnswerOption {
    type Err = QuestionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "A" => Ok(Self::A),
            "B" => Ok(Self::B),
            "C" => Ok(Self::C),
            "D" => Ok(Self::D),
            _ => Err(QuestionError::InvalidAnswer(s.to_owned())),
        }
    }
}

impl fmt::Display for AnswerOption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.letter())
    }
}

//
// ─── DIFFICULTY ───────────────────────────────────────────────────────────────
//

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    /// Ordering rank; questions without a difficulty rank as `Medium`.
    #[must_use]
    pub fn rank(difficulty: Option<Self>) -> u8 {
        match difficulty.unwrap_or(Self::Medium) {
            Self::Easy => 1,
            Self::Medium => 2,
            Self::Hard => 3,
        }
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Easy => "easy",
            Self::Medium => "medium",
            Self::Hard => "hard",
        }
    }
}

impl FromStr for Difficulty {
    type Err = QuestionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "easy" => Ok(Self::Easy),
            "medium" => Ok(Self::Medium),
            "hard" => Ok(Self::Hard),
            _ => Err(QuestionError::InvalidDifficulty(s.to_owned())),
        }
    }
}

//
// ─── QUESTION ─────────────────────────────────────────────────────────────────
//

/// Unvalidated question fields, as read from a data file or fixture.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QuestionDraft {
    pub id: String,
    pub figure_number: Option<String>,
    pub question_text: String,
    pub image_url: Option<String>,
    pub option_a: String,
    pub option_b: String,
    pub option_c: String,
    pub option_d: String,
    pub correct_answer: String,
    pub explanation: String,
    pub chapter: String,
    pub category: Option<String>,
    pub difficulty: Option<String>,
    pub is_sample: bool,
}

/// A validated multiple-choice question. Immutable once loaded.
#[derive(Debug, Clone, PartialEq)]
pub struct Question {
    id: QuestionId,
    figure_number: Option<FigureNumber>,
    question_text: String,
    image_url: Option<String>,
    options: [String; 4],
    correct_answer: AnswerOption,
    explanation: String,
    chapter: ChapterId,
    category: Category,
    difficulty: Option<Difficulty>,
    is_sample: bool,
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_owned())
        .filter(|v| !v.is_empty())
}

impl Question {
    /// Validates a draft into a `Question`.
    ///
    /// # Errors
    ///
    /// Returns `QuestionError` when the id or chapter is blank, the text is
    /// empty, or the answer/difficulty cannot be parsed.
    pub fn new(draft: QuestionDraft) -> Result<Self, QuestionError> {
        let id = QuestionId::new(draft.id)?;
        let chapter = ChapterId::new(draft.chapter)?;
        let question_text = draft.question_text.trim().to_owned();
        if question_text.is_empty() {
            return Err(QuestionError::EmptyText);
        }
        let correct_answer = draft.correct_answer.parse::<AnswerOption>()?;
        let difficulty = non_blank(draft.difficulty)
            .map(|d| d.parse::<Difficulty>())
            .transpose()?;
        let category = match non_blank(draft.category) {
            Some(name) => Category::new(name)?,
            None => Category::uncategorized(),
        };

        Ok(Self {
            id,
            figure_number: non_blank(draft.figure_number).map(FigureNumber::new),
            question_text,
            image_url: non_blank(draft.image_url),
            options: [
                draft.option_a.trim().to_owned(),
                draft.option_b.trim().to_owned(),
                draft.option_c.trim().to_owned(),
                draft.option_d.trim().to_owned(),
            ],
            correct_answer,
            explanation: draft.explanation.trim().to_owned(),
            chapter,
            category,
            difficulty,
            is_sample: draft.is_sample,
        })
    }

    #[must_use]
    pub fn id(&self) -> &QuestionId {
        &self.id
    }

    #[must_use]
    pub fn figure_number(&self) -> Option<&FigureNumber> {
        self.figure_number.as_ref()
    }

    #[must_use]
    pub fn question_text(&self) -> &str {
        &self.question_text
    }

    #[must_use]
    pub fn image_url(&self) -> Option<&str> {
        self.image_url.as_deref()
    }

    #[must_use]
    pub fn option(&self, option: AnswerOption) -> &str {
        &self.options[option.index()]
    }

    /// All four options paired with their letter, in A–D order.
    pub fn options(&self) -> impl Iterator<Item = (AnswerOption, &str)> {
        AnswerOption::ALL
            .into_iter()
            .map(move |opt| (opt, self.option(opt)))
    }

    #[must_use]
    pub fn correct_answer(&self) -> AnswerOption {
        self.correct_answer
    }

    #[must_use]
    pub fn is_correct(&self, answer: AnswerOption) -> bool {
        self.correct_answer == answer
    }

    #[must_use]
    pub fn explanation(&self) -> &str {
        &self.explanation
    }

    #[must_use]
    pub fn chapter(&self) -> &ChapterId {
        &self.chapter
    }

    #[must_use]
    pub fn category(&self) -> &Category {
        &self.category
    }

    #[must_use]
    pub fn difficulty(&self) -> Option<Difficulty> {
        self.difficulty
    }

    /// Numeric figure ordering key; questions without a figure sort as `0.0`.
    #[must_use]
    pub fn figure_sort_key(&self) -> f64 {
        self.figure_number
            .as_ref()
            .map_or(0.0, FigureNumber::sort_key)
    }

    #[must_use]
    pub fn is_sample(&self) -> bool {
        self.is_sample
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
