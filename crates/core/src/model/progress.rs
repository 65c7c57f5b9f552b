use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;
use uuid::Uuid;

use crate::model::ids::{Category, ChapterId};

//
// ─── ERRORS ───────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ProgressError {
    #[error("correct answers ({correct}) exceed total ({total})")]
    CorrectExceedsTotal { correct: u32, total: u32 },
    #[error("category {category} has {correct} correct out of {total}")]
    InvalidCategoryBucket {
        category: String,
        correct: u32,
        total: u32,
    },
    #[error("chapter {chapter} has {correct} correct out of {total}")]
    InvalidChapterBucket {
        chapter: String,
        correct: u32,
        total: u32,
    },
}

//
// ─── PERCENTAGE ───────────────────────────────────────────────────────────────
//

/// `round(correct / total * 100)` with halves rounding up; `0` when `total == 0`.
#[must_use]
pub fn percentage(correct: u32, total: u32) -> u32 {
    if total == 0 {
        return 0;
    }
    let correct = u64::from(correct);
    let total = u64::from(total);
    let rounded = (correct * 200 + total) / (total * 2);
    u32::try_from(rounded).unwrap_or(u32::MAX)
}

//
// ─── BUCKETS ──────────────────────────────────────────────────────────────────
//

/// Running `{correct, total}` counter for a category or chapter.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgressBucket {
    pub correct: u32,
    pub total: u32,
}

impl ProgressBucket {
    #[must_use]
    pub fn new(correct: u32, total: u32) -> Self {
        Self { correct, total }
    }

    pub fn add(&mut self, correct: u32, total: u32) {
        self.correct = self.correct.saturating_add(correct);
        self.total = self.total.saturating_add(total);
    }

    #[must_use]
    pub fn percentage(&self) -> u32 {
        percentage(self.correct, self.total)
    }

    #[must_use]
    pub fn is_consistent(&self) -> bool {
        self.correct <= self.total
    }
}

/// Chapter-level progress with the derived percentage.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ChapterProgress {
    pub correct: u32,
    pub total: u32,
    pub percentage: u32,
}

impl From<ProgressBucket> for ChapterProgress {
    fn from(bucket: ProgressBucket) -> Self {
        Self {
            correct: bucket.correct,
            total: bucket.total,
            percentage: bucket.percentage(),
        }
    }
}

//
// ─── QUIZ RESULTS ─────────────────────────────────────────────────────────────
//

/// Per-category tally within one quiz.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryResult {
    pub category: Category,
    pub correct: u32,
    pub total: u32,
}

/// Outcome of one completed quiz, ready to be recorded on a profile.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuizResults {
    chapter: ChapterId,
    correct: u32,
    total: u32,
    percentage: u32,
    category_results: Vec<CategoryResult>,
}

impl QuizResults {
    /// # Errors
    ///
    /// Returns `ProgressError` if `correct > total` overall or in any category.
    pub fn new(
        chapter: ChapterId,
        correct: u32,
        total: u32,
        category_results: Vec<CategoryResult>,
    ) -> Result<Self, ProgressError> {
        if correct > total {
            return Err(ProgressError::CorrectExceedsTotal { correct, total });
        }
        if let Some(bad) = category_results.iter().find(|c| c.correct > c.total) {
            return Err(ProgressError::InvalidCategoryBucket {
                category: bad.category.to_string(),
                correct: bad.correct,
                total: bad.total,
            });
        }
        Ok(Self {
            chapter,
            correct,
            total,
            percentage: percentage(correct, total),
            category_results,
        })
    }

    #[must_use]
    pub fn chapter(&self) -> &ChapterId {
        &self.chapter
    }

    #[must_use]
    pub fn correct(&self) -> u32 {
        self.correct
    }

    #[must_use]
    pub fn total(&self) -> u32 {
        self.total
    }

    #[must_use]
    pub fn percentage(&self) -> u32 {
        self.percentage
    }

    #[must_use]
    pub fn category_results(&self) -> &[CategoryResult] {
        &self.category_results
    }
}

//
// ─── QUIZ SCORE ───────────────────────────────────────────────────────────────
//

/// Summary of one completed quiz attempt. Append-only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuizScore {
    pub date: DateTime<Utc>,
    pub score: u32,
    pub total_questions: u32,
    pub correct: u32,
    pub chapter: ChapterId,
}

//
// ─── USER PROFILE ─────────────────────────────────────────────────────────────
//

/// A learner's accumulated quiz history and correctness counters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    id: String,
    #[serde(default)]
    quiz_scores: Vec<QuizScore>,
    #[serde(default)]
    categories_progress: BTreeMap<Category, ProgressBucket>,
    #[serde(default)]
    chapter_progress: BTreeMap<ChapterId, ProgressBucket>,
    #[serde(default)]
    total_questions_attempted: u32,
    #[serde(default)]
    total_correct: u32,
    created_at: DateTime<Utc>,
}

fn default_category_buckets() -> BTreeMap<Category, ProgressBucket> {
    Category::defaults()
        .into_iter()
        .map(|category| (category, ProgressBucket::default()))
        .collect()
}

impl UserProfile {
    /// Fresh profile with zeroed default category buckets.
    #[must_use]
    pub fn new(created_at: DateTime<Utc>) -> Self {
        Self {
            id: format!("user_{}", Uuid::new_v4().simple()),
            quiz_scores: Vec::new(),
            categories_progress: default_category_buckets(),
            chapter_progress: BTreeMap::new(),
            total_questions_attempted: 0,
            total_correct: 0,
            created_at,
        }
    }

    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    #[must_use]
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    #[must_use]
    pub fn quiz_scores(&self) -> &[QuizScore] {
        &self.quiz_scores
    }

    #[must_use]
    pub fn last_score(&self) -> Option<&QuizScore> {
        self.quiz_scores.last()
    }

    #[must_use]
    pub fn categories_progress(&self) -> &BTreeMap<Category, ProgressBucket> {
        &self.categories_progress
    }

    #[must_use]
    pub fn chapter_buckets(&self) -> &BTreeMap<ChapterId, ProgressBucket> {
        &self.chapter_progress
    }

    #[must_use]
    pub fn total_questions_attempted(&self) -> u32 {
        self.total_questions_attempted
    }

    #[must_use]
    pub fn total_correct(&self) -> u32 {
        self.total_correct
    }

    #[must_use]
    pub fn overall_percentage(&self) -> u32 {
        percentage(self.total_correct, self.total_questions_attempted)
    }

    #[must_use]
    pub fn category_progress(&self, category: &Category) -> ProgressBucket {
        self.categories_progress
            .get(category)
            .copied()
            .unwrap_or_default()
    }

    /// Progress for a chapter; `{0, 0, 0}` when the chapter was never quizzed.
    #[must_use]
    pub fn chapter_progress(&self, chapter: &ChapterId) -> ChapterProgress {
        self.chapter_progress
            .get(chapter)
            .copied()
            .unwrap_or_default()
            .into()
    }

    /// Quiz attempts for one chapter, oldest first.
    #[must_use]
    pub fn chapter_history(&self, chapter: &ChapterId) -> Vec<QuizScore> {
        self.quiz_scores
            .iter()
            .filter(|score| &score.chapter == chapter)
            .cloned()
            .collect()
    }

    /// Appends a score and bumps every matching counter.
    ///
    /// Repeated attempts of the same question are counted each time.
    pub fn record_quiz(&mut self, results: &QuizResults, at: DateTime<Utc>) {
        self.quiz_scores.push(QuizScore {
            date: at,
            score: results.percentage(),
            total_questions: results.total(),
            correct: results.correct(),
            chapter: results.chapter().clone(),
        });

        for cat in results.category_results() {
            self.categories_progress
                .entry(cat.category.clone())
                .or_default()
                .add(cat.correct, cat.total);
        }

        self.chapter_progress
            .entry(results.chapter().clone())
            .or_default()
            .add(results.correct(), results.total());

        self.total_questions_attempted = self
            .total_questions_attempted
            .saturating_add(results.total());
        self.total_correct = self.total_correct.saturating_add(results.correct());
    }

    /// Clears history and zeroes every counter. Id and creation time are kept.
    pub fn reset(&mut self) {
        self.quiz_scores.clear();
        self.categories_progress = default_category_buckets();
        self.chapter_progress.clear();
        self.total_questions_attempted = 0;
        self.total_correct = 0;
    }

    /// Checks the `correct <= total` invariants on totals and every bucket.
    ///
    /// # Errors
    ///
    /// Returns the first violated invariant.
    pub fn validate(&self) -> Result<(), ProgressError> {
        if self.total_correct > self.total_questions_attempted {
            return Err(ProgressError::CorrectExceedsTotal {
                correct: self.total_correct,
                total: self.total_questions_attempted,
            });
        }
        if let Some((category, bucket)) = self
            .categories_progress
            .iter()
            .find(|(_, b)| !b.is_consistent())
        {
            return Err(ProgressError::InvalidCategoryBucket {
                category: category.to_string(),
                correct: bucket.correct,
                total: bucket.total,
            });
        }
        if let Some((chapter, bucket)) = self
            .chapter_progress
            .iter()
            .find(|(_, b)| !b.is_consistent())
        {
            return Err(ProgressError::InvalidChapterBucket {
                chapter: chapter.to_string(),
                correct: bucket.correct,
                total: bucket.total,
            });
        }
        Ok(())
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;
    use crate::time::fixed_now;

    fn ch(id: &str) -> ChapterId {
        ChapterId::new(id).unwrap()
    }

    fn cat(name: &str) -> Category {
        Category::new(name).unwrap()
    }

    fn results(correct: u32, total: u32) -> QuizResults {
        QuizResults::new(
            ch("1"),
            correct,
            total,
            vec![CategoryResult {
                category: cat("inflammation"),
                correct,
                total,
            }],
        )
        .unwrap()
    }

    #[test]
    fn percentage_rounds_and_handles_zero_total() {
        assert_eq!(percentage(7, 10), 70);
        assert_eq!(percentage(0, 0), 0);
        assert_eq!(percentage(3, 4), 75);
        assert_eq!(percentage(2, 3), 67);
        assert_eq!(percentage(1, 3), 33);
        assert_eq!(percentage(1, 8), 13);
        assert_eq!(percentage(5, 5), 100);
    }

    #[test]
    fn quiz_results_reject_impossible_counts() {
        let err = QuizResults::new(ch("1"), 5, 4, Vec::new()).unwrap_err();
        assert_eq!(err, ProgressError::CorrectExceedsTotal { correct: 5, total: 4 });

        let err = QuizResults::new(
            ch("1"),
            1,
            4,
            vec![CategoryResult {
                category: cat("neoplasia"),
                correct: 2,
                total: 1,
            }],
        )
        .unwrap_err();
        assert!(matches!(err, ProgressError::InvalidCategoryBucket { .. }));
    }

    #[test]
    fn new_profile_seeds_default_categories() {
        let profile = UserProfile::new(fixed_now());
        assert!(profile.id().starts_with("user_"));
        assert_eq!(profile.categories_progress().len(), 4);
        assert!(profile.chapter_buckets().is_empty());
        assert_eq!(profile.chapter_progress(&ch("1")), ChapterProgress::default());
    }

    #[test]
    fn record_quiz_updates_all_counters() {
        let mut profile = UserProfile::new(fixed_now());
        profile.record_quiz(&results(3, 4), fixed_now());
        profile.record_quiz(&results(4, 6), fixed_now());

        assert_eq!(profile.total_questions_attempted(), 10);
        assert_eq!(profile.total_correct(), 7);
        assert_eq!(
            profile.chapter_progress(&ch("1")),
            ChapterProgress {
                correct: 7,
                total: 10,
                percentage: 70
            }
        );
        assert_eq!(
            profile.category_progress(&cat("inflammation")),
            ProgressBucket::new(7, 10)
        );
        assert_eq!(profile.chapter_history(&ch("1")).len(), 2);
        assert!(profile.chapter_history(&ch("2")).is_empty());
        assert_eq!(profile.last_score().map(|s| s.score), Some(67));
        assert!(profile.validate().is_ok());
    }

    #[test]
    fn record_quiz_creates_unknown_category_buckets() {
        let mut profile = UserProfile::new(fixed_now());
        let results = QuizResults::new(
            ch("3"),
            1,
            1,
            vec![CategoryResult {
                category: Category::uncategorized(),
                correct: 1,
                total: 1,
            }],
        )
        .unwrap();
        profile.record_quiz(&results, fixed_now());
        assert_eq!(
            profile.category_progress(&Category::uncategorized()),
            ProgressBucket::new(1, 1)
        );
        assert_eq!(profile.categories_progress().len(), 5);
    }

    #[test]
    fn reset_zeroes_everything() {
        let mut profile = UserProfile::new(fixed_now());
        let id = profile.id().to_owned();
        profile.record_quiz(&results(3, 4), fixed_now());
        profile.reset();

        assert_eq!(profile.id(), id);
        assert!(profile.quiz_scores().is_empty());
        assert_eq!(profile.total_questions_attempted(), 0);
        assert_eq!(profile.total_correct(), 0);
        assert_eq!(profile.chapter_progress(&ch("1")), ChapterProgress::default());
        assert!(
            profile
                .categories_progress()
                .values()
                .all(|b| *b == ProgressBucket::default())
        );
    }

    #[test]
    fn validate_flags_corrupt_buckets() {
        let json = r#"{
            "id": "user_1",
            "quiz_scores": [],
            "categories_progress": { "inflammation": { "correct": 5, "total": 2 } },
            "chapter_progress": {},
            "total_questions_attempted": 2,
            "total_correct": 1,
            "created_at": "2023-11-14T22:13:20Z"
        }"#;
        let profile: UserProfile = serde_json::from_str(json).unwrap();
        assert!(matches!(
            profile.validate(),
            Err(ProgressError::InvalidCategoryBucket { .. })
        ));
    }

    #[test]
    fn profile_round_trips_through_json() {
        let mut profile = UserProfile::new(fixed_now());
        profile.record_quiz(&results(1, 2), fixed_now());
        let json = serde_json::to_string(&profile).unwrap();
        let back: UserProfile = serde_json::from_str(&json).unwrap();
        assert_eq!(back, profile);
    }
}
