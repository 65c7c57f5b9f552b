//! Persisted shapes for question data files and their parsers.
//!
//! The tabular (`questions.csv`) and structured (`chapters/chapterN/questions.json`)
//! resources share one record type. Individual rows that fail validation are
//! skipped with a warning; only a document that cannot be read as a whole is
//! an error.

use quiz_core::model::{ChapterId, Question, QuestionDraft, QuestionError};
use serde::Deserialize;
use serde_json::value::RawValue;

use crate::repository::StorageError;

/// Identifier-like field whose text must survive parsing unchanged.
///
/// CSV cells are taken as written. JSON values may be strings or bare
/// numbers; numbers keep their literal digits, so `1.10` and `007`-style
/// ids never collapse into one another.
pub trait LiteralText {
    fn into_text(self) -> String;
}

impl LiteralText for String {
    fn into_text(self) -> String {
        self
    }
}

/// A JSON value kept as its source text.
#[derive(Debug, Deserialize)]
#[serde(transparent)]
pub struct JsonLiteral(Box<RawValue>);

impl LiteralText for JsonLiteral {
    fn into_text(self) -> String {
        let raw = self.0.get();
        serde_json::from_str::<String>(raw).unwrap_or_else(|_| raw.to_owned())
    }
}

/// Boolean that may arrive as text, a number, or a boolean depending on the format.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
enum Flag {
    Bool(bool),
    Integer(i64),
    Text(String),
}

impl Flag {
    fn is_set(self) -> bool {
        match self {
            Flag::Bool(b) => b,
            Flag::Integer(n) => n != 0,
            Flag::Text(s) => s.trim().eq_ignore_ascii_case("true"),
        }
    }
}

/// One question row as it appears in a data file.
///
/// `S` carries the `id` and `chapter` fields: `String` for CSV rows,
/// [`JsonLiteral`] for JSON objects.
#[derive(Debug, Deserialize)]
#[serde(bound(deserialize = "S: Deserialize<'de>"))]
pub struct QuestionRecord<S = String> {
    #[serde(default)]
    id: Option<S>,
    #[serde(default)]
    figure_number: Option<String>,
    #[serde(default)]
    question_text: Option<String>,
    #[serde(default)]
    image_url: Option<String>,
    #[serde(default)]
    option_a: Option<String>,
    #[serde(default)]
    option_b: Option<String>,
    #[serde(default)]
    option_c: Option<String>,
    #[serde(default)]
    option_d: Option<String>,
    #[serde(default)]
    correct_answer: Option<String>,
    #[serde(default)]
    explanation: Option<String>,
    #[serde(default)]
    chapter: Option<S>,
    #[serde(default)]
    category: Option<String>,
    #[serde(default)]
    difficulty: Option<String>,
    #[serde(default)]
    is_sample: Option<Flag>,
}

impl<S: LiteralText> QuestionRecord<S> {
    /// Convert the record into a domain `Question`.
    ///
    /// A missing chapter is taken from `chapter_hint` (the chapter whose file
    /// the record came from).
    ///
    /// # Errors
    ///
    /// Returns `QuestionError` if the record fails validation.
    pub fn into_question(self, chapter_hint: Option<&ChapterId>) -> Result<Question, QuestionError> {
        let chapter = self
            .chapter
            .map(LiteralText::into_text)
            .filter(|c| !c.trim().is_empty())
            .or_else(|| chapter_hint.map(ToString::to_string))
            .unwrap_or_default();

        Question::new(QuestionDraft {
            id: self.id.map(LiteralText::into_text).unwrap_or_default(),
            figure_number: self.figure_number,
            question_text: self.question_text.unwrap_or_default(),
            image_url: self.image_url,
            option_a: self.option_a.unwrap_or_default(),
            option_b: self.option_b.unwrap_or_default(),
            option_c: self.option_c.unwrap_or_default(),
            option_d: self.option_d.unwrap_or_default(),
            correct_answer: self.correct_answer.unwrap_or_default(),
            explanation: self.explanation.unwrap_or_default(),
            chapter,
            category: self.category,
            difficulty: self.difficulty,
            is_sample: self.is_sample.is_some_and(Flag::is_set),
        })
    }
}

fn collect_valid<S: LiteralText>(
    source: &str,
    rows: impl IntoIterator<Item = (usize, QuestionRecord<S>)>,
    chapter_hint: Option<&ChapterId>,
) -> Vec<Question> {
    rows.into_iter()
        .filter_map(|(row, record)| match record.into_question(chapter_hint) {
            Ok(question) => Some(question),
            Err(err) => {
                tracing::warn!(source, row, error = %err, "skipping invalid question");
                None
            }
        })
        .collect()
}

/// Parse a structured chapter resource: a JSON array of question objects.
///
/// # Errors
///
/// Returns `StorageError::Serialization` if the document is not a JSON array
/// of objects.
pub fn parse_questions_json(
    text: &str,
    chapter_hint: Option<&ChapterId>,
) -> Result<Vec<Question>, StorageError> {
    let records: Vec<QuestionRecord<JsonLiteral>> =
        serde_json::from_str(text).map_err(|err| StorageError::Serialization(err.to_string()))?;
    Ok(collect_valid(
        "json",
        records.into_iter().enumerate(),
        chapter_hint,
    ))
}

/// Parse the flat tabular resource: CSV with a header row.
///
/// # Errors
///
/// Returns `StorageError::Serialization` if the header row cannot be read.
pub fn parse_questions_csv(text: &str) -> Result<Vec<Question>, StorageError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(text.as_bytes());

    reader
        .headers()
        .map_err(|err| StorageError::Serialization(err.to_string()))?;

    let mut rows = Vec::new();
    for (row, result) in reader.deserialize::<QuestionRecord<String>>().enumerate() {
        match result {
            Ok(record) => rows.push((row, record)),
            Err(err) => tracing::warn!(source = "csv", row, error = %err, "skipping malformed row"),
        }
    }
    Ok(collect_valid("csv", rows, None))
}

#[cfg(test)]
mod tests {
    use super::*;
    use quiz_core::model::{AnswerOption, Difficulty};

    const CSV: &str = "\
id,figure_number,question_text,image_url,option_a,option_b,option_c,option_d,correct_answer,explanation,chapter,category,difficulty,is_sample
1,1.1,What anomaly is shown?,,Coloboma,Aniridia,Cyclopia,Anophthalmos,C,Single median eye.,1,developmental_anomaly,easy,true
2,1.2,Which cell dominates?,,Neutrophil,Lymphocyte,Eosinophil,Mast cell,a,Acute inflammation.,1,inflammation,,false
3,2.1,Broken row,,x,y,z,w,Z,bad answer,2,neoplasia,hard,false
";

    #[test]
    fn csv_rows_parse_and_invalid_rows_are_skipped() {
        let questions = parse_questions_csv(CSV).unwrap();
        assert_eq!(questions.len(), 2);

        let first = &questions[0];
        assert_eq!(first.id().as_str(), "1");
        assert_eq!(first.chapter().as_str(), "1");
        assert_eq!(first.correct_answer(), AnswerOption::C);
        assert_eq!(first.difficulty(), Some(Difficulty::Easy));
        assert_eq!(first.figure_number().map(|f| f.as_str()), Some("1.1"));
        assert!(first.is_sample());

        let second = &questions[1];
        assert_eq!(second.correct_answer(), AnswerOption::A);
        assert_eq!(second.difficulty(), None);
        assert!(!second.is_sample());
    }

    #[test]
    fn csv_with_only_headers_is_empty() {
        let questions = parse_questions_csv("id,question_text\n").unwrap();
        assert!(questions.is_empty());
    }

    #[test]
    fn json_accepts_numeric_ids_and_inherits_chapter() {
        let json = r#"[
            {"id": 7, "figure_number": "1.4", "question_text": "Q?", "option_a": "a",
             "option_b": "b", "option_c": "c", "option_d": "d", "correct_answer": "D",
             "explanation": "because", "category": "neoplasia", "is_sample": false},
            {"id": "x", "question_text": "", "correct_answer": "A"}
        ]"#;
        let hint = ChapterId::new("1").unwrap();
        let questions = parse_questions_json(json, Some(&hint)).unwrap();
        assert_eq!(questions.len(), 1);
        assert_eq!(questions[0].id().as_str(), "7");
        assert_eq!(questions[0].chapter(), &hint);
    }

    #[test]
    fn csv_ids_and_chapters_keep_their_text() {
        let csv = "\
id,question_text,option_a,option_b,correct_answer,chapter
1.10,First?,a,b,A,01
1.1,Second?,a,b,B,01
007,Third?,a,b,A,01
";
        let questions = parse_questions_csv(csv).unwrap();
        let ids: Vec<(&str, &str)> = questions
            .iter()
            .map(|q| (q.id().as_str(), q.chapter().as_str()))
            .collect();
        assert_eq!(ids, [("1.10", "01"), ("1.1", "01"), ("007", "01")]);
    }

    #[test]
    fn json_numeric_ids_keep_their_digits() {
        let json = r#"[
            {"id": 1.10, "question_text": "A?", "option_a": "a", "option_b": "b",
             "correct_answer": "A", "chapter": 2},
            {"id": 1.1, "question_text": "B?", "option_a": "a", "option_b": "b",
             "correct_answer": "A", "chapter": "2"},
            {"id": "007", "question_text": "C?", "option_a": "a", "option_b": "b",
             "correct_answer": "A", "is_sample": true}
        ]"#;
        let hint = ChapterId::new("2").unwrap();
        let questions = parse_questions_json(json, Some(&hint)).unwrap();
        let ids: Vec<&str> = questions.iter().map(|q| q.id().as_str()).collect();
        assert_eq!(ids, ["1.10", "1.1", "007"]);
        assert!(questions.iter().all(|q| q.chapter() == &hint));
        assert!(questions[2].is_sample());
    }

    #[test]
    fn json_that_is_not_an_array_is_an_error() {
        let err = parse_questions_json(r#"{"questions": []}"#, None).unwrap_err();
        assert!(matches!(err, StorageError::Serialization(_)));
    }
}
