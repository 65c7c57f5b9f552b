use std::fmt;
use std::str::FromStr;

use quiz_core::model::{Category, Difficulty, Question};
use rand::Rng;
use rand::seq::SliceRandom;

/// Which questions a quiz or study view shows.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum CategoryFilter {
    #[default]
    All,
    Only(Category),
}

impl CategoryFilter {
    #[must_use]
    pub fn matches(&self, question: &Question) -> bool {
        match self {
            Self::All => true,
            Self::Only(category) => question.category() == category,
        }
    }

    /// Parses the select value used by the views: `"all"` or a category name.
    #[must_use]
    pub fn from_value(value: &str) -> Self {
        match value.trim() {
            "" | "all" => Self::All,
            other => Category::new(other).map_or(Self::All, Self::Only),
        }
    }

    #[must_use]
    pub fn value(&self) -> &str {
        match self {
            Self::All => "all",
            Self::Only(category) => category.as_str(),
        }
    }

    #[must_use]
    pub fn apply(&self, questions: &[Question]) -> Vec<Question> {
        questions
            .iter()
            .filter(|q| self.matches(q))
            .cloned()
            .collect()
    }
}

/// Presentation order for quiz questions.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortOrder {
    #[default]
    Default,
    FigureAscending,
    DifficultyAscending,
    DifficultyDescending,
    Random,
}

impl SortOrder {
    pub const ALL: [SortOrder; 5] = [
        Self::Default,
        Self::FigureAscending,
        Self::DifficultyAscending,
        Self::DifficultyDescending,
        Self::Random,
    ];

    #[must_use]
    pub fn value(self) -> &'static str {
        match self {
            Self::Default => "default",
            Self::FigureAscending => "figure_asc",
            Self::DifficultyAscending => "difficulty_asc",
            Self::DifficultyDescending => "difficulty_desc",
            Self::Random => "random",
        }
    }

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Default => "Default Order",
            Self::FigureAscending => "By Figure Number",
            Self::DifficultyAscending => "Easy to Hard",
            Self::DifficultyDescending => "Hard to Easy",
            Self::Random => "Random",
        }
    }

    /// Reorders `questions` in place. Every order except `Random` is stable.
    pub fn apply<R: Rng + ?Sized>(self, questions: &mut [Question], rng: &mut R) {
        match self {
            Self::Default => {}
            Self::FigureAscending => sort_by_figure(questions),
            Self::DifficultyAscending => {
                questions.sort_by_key(|q| Difficulty::rank(q.difficulty()));
            }
            Self::DifficultyDescending => {
                questions.sort_by_key(|q| std::cmp::Reverse(Difficulty::rank(q.difficulty())));
            }
            Self::Random => questions.shuffle(rng),
        }
    }
}

impl FromStr for SortOrder {
    type Err = UnknownSortOrder;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|order| order.value() == s.trim())
            .ok_or_else(|| UnknownSortOrder(s.to_owned()))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownSortOrder(String);

impl fmt::Display for UnknownSortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown sort order: {}", self.0)
    }
}

impl std::error::Error for UnknownSortOrder {}

/// Stable numeric figure sort; ties keep their original order.
pub fn sort_by_figure(questions: &mut [Question]) {
    questions.sort_by(|a, b| a.figure_sort_key().total_cmp(&b.figure_sort_key()));
}

/// Uniform shuffle truncated to `min(count, len)`. Never repeats an item.
pub fn pick_random<R: Rng + ?Sized>(
    mut questions: Vec<Question>,
    count: usize,
    rng: &mut R,
) -> Vec<Question> {
    questions.shuffle(rng);
    questions.truncate(count);
    questions
}
