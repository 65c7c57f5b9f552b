use std::sync::Arc;

use quiz_core::model::{Category, ChapterId, Question, QuestionId};
use storage::repository::{QuestionSource, StorageError};

use crate::fixtures::fixture_questions;
use crate::images::ImageResolver;
use crate::quiz::order::pick_random;

/// Read access to the question bank with fallbacks.
///
/// Loader methods never fail: errors are logged and the next source in the
/// chain is tried, ending in an empty list.
#[derive(Clone)]
pub struct QuestionStore {
    source: Arc<dyn QuestionSource>,
    images: ImageResolver,
    fixtures: Vec<Question>,
}

impl QuestionStore {
    #[must_use]
    pub fn new(source: Arc<dyn QuestionSource>, images: ImageResolver) -> Self {
        Self {
            source,
            images,
            fixtures: Vec::new(),
        }
    }

    /// Enable the built-in fixture set as the last fallback before empty.
    #[must_use]
    pub fn with_fixtures(mut self) -> Self {
        self.fixtures = fixture_questions();
        self
    }

    #[must_use]
    pub fn images(&self) -> &ImageResolver {
        &self.images
    }

    #[must_use]
    pub fn image_url(&self, question: &Question) -> String {
        self.images.resolve(question)
    }

    /// Every question from the flat resource.
    pub async fn list(&self) -> Vec<Question> {
        match self.source.all_questions().await {
            Ok(questions) => questions,
            Err(err) => {
                log_fallback("questions", &err);
                self.fixtures.clone()
            }
        }
    }

    /// Questions for one chapter, preferring the structured resource.
    pub async fn by_chapter(&self, chapter: &ChapterId) -> Vec<Question> {
        match self.source.chapter_questions(chapter).await {
            Ok(questions) => return questions,
            Err(err) => log_fallback("chapter", &err),
        }

        let in_chapter = |q: &Question| q.chapter() == chapter;
        match self.source.all_questions().await {
            Ok(questions) => questions.into_iter().filter(in_chapter).collect(),
            Err(err) => {
                log_fallback("questions", &err);
                self.fixtures.iter().filter(|q| in_chapter(q)).cloned().collect()
            }
        }
    }

    pub async fn by_category(&self, category: &Category) -> Vec<Question> {
        self.list()
            .await
            .into_iter()
            .filter(|q| q.category() == category)
            .collect()
    }

    pub async fn by_id(&self, id: &QuestionId) -> Option<Question> {
        self.list().await.into_iter().find(|q| q.id() == id)
    }

    /// Up to `count` distinct questions in uniformly random order.
    pub async fn random(
        &self,
        count: usize,
        chapter: Option<&ChapterId>,
        category: Option<&Category>,
    ) -> Vec<Question> {
        let pool = match chapter {
            Some(chapter) => self.by_chapter(chapter).await,
            None => self.list().await,
        };
        let pool: Vec<Question> = pool
            .into_iter()
            .filter(|q| category.is_none_or(|c| q.category() == c))
            .collect();
        pick_random(pool, count, &mut rand::rng())
    }
}

fn log_fallback(resource: &'static str, err: &StorageError) {
    match err {
        StorageError::NotFound => tracing::debug!(resource, "resource missing, falling back"),
        other => tracing::warn!(resource, error = %other, "failed to load questions, falling back"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quiz_core::model::QuestionDraft;
    use std::collections::HashSet;
    use storage::repository::InMemoryRepository;

    fn question(id: &str, chapter: &str, category: &str) -> Question {
        Question::new(QuestionDraft {
            id: id.into(),
            question_text: format!("Question {id}"),
            correct_answer: "A".into(),
            chapter: chapter.into(),
            category: Some(category.into()),
            ..QuestionDraft::default()
        })
        .unwrap()
    }

    fn chapter(id: &str) -> ChapterId {
        ChapterId::new(id).unwrap()
    }

    fn store(repo: &InMemoryRepository) -> QuestionStore {
        QuestionStore::new(Arc::new(repo.clone()), ImageResolver::default())
    }

    fn ids(questions: &[Question]) -> Vec<&str> {
        questions.iter().map(|q| q.id().as_str()).collect()
    }

    #[tokio::test]
    async fn structured_chapter_resource_wins() {
        let repo = InMemoryRepository::new();
        repo.set_chapter(chapter("1"), vec![question("s1", "1", "neoplasia")])
            .unwrap();
        repo.set_all(vec![question("t1", "1", "neoplasia")]).unwrap();

        assert_eq!(ids(&store(&repo).by_chapter(&chapter("1")).await), ["s1"]);
    }

    #[tokio::test]
    async fn falls_back_to_filtered_tabular_resource() {
        let repo = InMemoryRepository::new();
        repo.set_all(vec![
            question("a", "1", "neoplasia"),
            question("b", "2", "neoplasia"),
            question("c", "1", "inflammation"),
        ])
        .unwrap();

        let store = store(&repo);
        assert_eq!(ids(&store.by_chapter(&chapter("1")).await), ["a", "c"]);
        assert_eq!(ids(&store.by_chapter(&chapter("2")).await), ["b"]);
        assert!(store.by_chapter(&chapter("9")).await.is_empty());
    }

    #[tokio::test]
    async fn empty_structured_resource_is_not_a_failure() {
        let repo = InMemoryRepository::new();
        repo.set_chapter(chapter("1"), Vec::new()).unwrap();
        repo.set_all(vec![question("a", "1", "neoplasia")]).unwrap();

        assert!(store(&repo).by_chapter(&chapter("1")).await.is_empty());
    }

    #[tokio::test]
    async fn missing_everything_yields_empty_or_fixtures() {
        let repo = InMemoryRepository::new();
        assert!(store(&repo).list().await.is_empty());
        assert!(store(&repo).by_chapter(&chapter("1")).await.is_empty());

        let with_fixtures = store(&repo).with_fixtures();
        assert_eq!(with_fixtures.by_chapter(&chapter("1")).await.len(), 4);
        assert!(with_fixtures.by_chapter(&chapter("2")).await.is_empty());
        assert_eq!(with_fixtures.list().await.len(), 4);
    }

    #[tokio::test]
    async fn lookups_search_the_full_list() {
        let repo = InMemoryRepository::new();
        repo.set_all(vec![
            question("a", "1", "neoplasia"),
            question("b", "2", "inflammation"),
        ])
        .unwrap();
        let store = store(&repo);

        let neoplasia = Category::new("neoplasia").unwrap();
        assert_eq!(ids(&store.by_category(&neoplasia).await), ["a"]);

        let found = store.by_id(&QuestionId::new("b").unwrap()).await.unwrap();
        assert_eq!(found.chapter(), &chapter("2"));
        assert!(store.by_id(&QuestionId::new("zz").unwrap()).await.is_none());
    }

    #[tokio::test]
    async fn random_respects_scope_and_count() {
        let repo = InMemoryRepository::new();
        let mut all: Vec<Question> = (0..6)
            .map(|i| question(&format!("n{i}"), "1", "neoplasia"))
            .collect();
        all.extend((0..4).map(|i| question(&format!("i{i}"), "1", "inflammation")));
        all.push(question("other", "2", "neoplasia"));
        repo.set_all(all).unwrap();
        let store = store(&repo);

        let neoplasia = Category::new("neoplasia").unwrap();
        let picked = store.random(3, Some(&chapter("1")), Some(&neoplasia)).await;
        assert_eq!(picked.len(), 3);
        assert!(picked.iter().all(|q| q.category() == &neoplasia));
        assert!(picked.iter().all(|q| q.chapter() == &chapter("1")));

        let everything = store.random(100, None, None).await;
        assert_eq!(everything.len(), 11);
        let unique: HashSet<_> = everything.iter().map(|q| q.id().clone()).collect();
        assert_eq!(unique.len(), 11);
    }
}
