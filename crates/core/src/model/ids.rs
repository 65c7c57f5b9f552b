use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Error returned when an identifier is blank after trimming.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("{kind} cannot be empty")]
pub struct IdError {
    kind: &'static str,
}

impl IdError {
    #[must_use]
    pub fn kind(&self) -> &'static str {
        self.kind
    }
}

fn normalized(kind: &'static str, raw: impl Into<String>) -> Result<String, IdError> {
    let raw = raw.into();
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(IdError { kind });
    }
    if trimmed.len() == raw.len() {
        Ok(raw)
    } else {
        Ok(trimmed.to_owned())
    }
}

/// Unique identifier for a Question, as it appears in the source data.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct QuestionId(String);

impl QuestionId {
    /// Creates a new `QuestionId` from a non-blank string.
    ///
    /// # Errors
    ///
    /// Returns `IdError` if the value is blank.
    pub fn new(id: impl Into<String>) -> Result<Self, IdError> {
        normalized("QuestionId", id).map(Self)
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// A textbook chapter, the unit of content partitioning.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ChapterId(String);

impl ChapterId {
    /// Creates a new `ChapterId` from a non-blank string.
    ///
    /// # Errors
    ///
    /// Returns `IdError` if the value is blank.
    pub fn new(id: impl Into<String>) -> Result<Self, IdError> {
        normalized("ChapterId", id).map(Self)
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Categories every fresh profile starts with.
pub const DEFAULT_CATEGORIES: [&str; 4] = [
    "developmental_anomaly",
    "inflammation",
    "dystrophy_and_degeneration",
    "neoplasia",
];

const UNCATEGORIZED: &str = "uncategorized";

/// Pathology classification tag such as `inflammation` or `neoplasia`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Category(String);

impl Category {
    /// Creates a new `Category` from a non-blank string.
    ///
    /// # Errors
    ///
    /// Returns `IdError` if the value is blank.
    pub fn new(name: impl Into<String>) -> Result<Self, IdError> {
        normalized("Category", name).map(Self)
    }

    /// Bucket for questions without a category.
    #[must_use]
    pub fn uncategorized() -> Self {
        Self(UNCATEGORIZED.to_owned())
    }

    /// The default category set, in display order.
    #[must_use]
    pub fn defaults() -> Vec<Self> {
        DEFAULT_CATEGORIES
            .iter()
            .map(|name| Self((*name).to_owned()))
            .collect()
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Human-readable label: underscores become spaces, words are capitalized.
    #[must_use]
    pub fn display_name(&self) -> String {
        self.0
            .split('_')
            .filter(|word| !word.is_empty())
            .map(|word| {
                let mut chars = word.chars();
                match chars.next() {
                    Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                    None => String::new(),
                }
            })
            .collect::<Vec<_>>()
            .join(" ")
    }
}

// ─── Conversions ───────────────────────────────────────────────────────────────

impl TryFrom<String> for QuestionId {
    type Error = IdError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl TryFrom<String> for ChapterId {
    type Error = IdError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl TryFrom<String> for Category {
    type Error = IdError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<QuestionId> for String {
    fn from(value: QuestionId) -> Self {
        value.0
    }
}

impl From<ChapterId> for String {
    fn from(value: ChapterId) -> Self {
        value.0
    }
}

impl From<Category> for String {
    fn from(value: Category) -> Self {
        value.0
    }
}

impl FromStr for QuestionId {
    type Err = IdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl FromStr for ChapterId {
    type Err = IdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl FromStr for Category {
    type Err = IdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl fmt::Display for QuestionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Display for ChapterId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_are_trimmed_and_reject_blank() {
        assert_eq!(ChapterId::new(" 1 ").unwrap().as_str(), "1");
        assert_eq!(QuestionId::new("q7").unwrap().as_str(), "q7");

        let err = Category::new("   ").unwrap_err();
        assert_eq!(err.kind(), "Category");
        assert!(QuestionId::new("").is_err());
    }

    #[test]
    fn category_display_name_capitalizes_words() {
        let cat = Category::new("dystrophy_and_degeneration").unwrap();
        assert_eq!(cat.display_name(), "Dystrophy And Degeneration");
        assert_eq!(Category::uncategorized().display_name(), "Uncategorized");
    }

    #[test]
    fn defaults_cover_the_four_pathology_groups() {
        let names: Vec<String> = Category::defaults().into_iter().map(String::from).collect();
        assert_eq!(names, DEFAULT_CATEGORIES.to_vec());
    }

    #[test]
    fn serde_rejects_blank_ids() {
        let ok: ChapterId = serde_json::from_str("\"2\"").unwrap();
        assert_eq!(ok.as_str(), "2");
        assert!(serde_json::from_str::<ChapterId>("\"  \"").is_err());
    }
}
