use quiz_core::model::{Category, CategoryResult, ChapterId, Question, QuestionDraft, QuizResults};
use storage::repository::{InMemoryRepository, KeyValueStore};

use super::test_harness::{ViewKind, setup_view_harness};

fn question(id: &str, figure: &str, text: &str) -> Question {
    Question::new(QuestionDraft {
        id: id.into(),
        figure_number: Some(figure.into()),
        question_text: text.into(),
        option_a: "Coloboma".into(),
        option_b: "Aniridia".into(),
        correct_answer: "A".into(),
        chapter: "1".into(),
        category: Some("developmental_anomaly".into()),
        ..QuestionDraft::default()
    })
    .unwrap()
}

fn seeded_repo() -> InMemoryRepository {
    let repo = InMemoryRepository::new();
    repo.set_chapter(
        ChapterId::new("1").unwrap(),
        vec![
            question("b", "1.2", "Second figure question"),
            question("a", "1.1", "First figure question"),
        ],
    )
    .unwrap();
    repo
}

#[tokio::test(flavor = "current_thread")]
async fn home_view_smoke_renders_features() {
    let repo = InMemoryRepository::new();
    let mut harness = setup_view_harness(ViewKind::Home, &repo);
    harness.settle().await;
    let html = harness.render();
    assert!(html.contains("Ocular Pathology Quiz"), "missing title in {html}");
    assert!(html.contains("Start Quiz"), "missing quiz link in {html}");
    assert!(html.contains("No quizzes taken yet."), "missing empty stats in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn quiz_view_smoke_renders_ready_state() {
    let repo = seeded_repo();
    let mut harness = setup_view_harness(ViewKind::Quiz, &repo);
    harness.settle().await;
    let html = harness.render();
    assert!(html.contains("2 questions ready."), "missing ready text in {html}");
    assert!(html.contains("Developmental Anomaly"), "missing category option in {html}");
    assert!(html.contains("Easy to Hard"), "missing sort option in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn quiz_view_smoke_renders_empty_chapter() {
    let repo = InMemoryRepository::new();
    let mut harness = setup_view_harness(ViewKind::Quiz, &repo);
    harness.settle().await;
    let html = harness.render();
    assert!(
        html.contains("No questions are available for this chapter yet."),
        "missing empty text in {html}"
    );
}

#[tokio::test(flavor = "current_thread")]
async fn study_view_smoke_renders_first_figure() {
    let repo = seeded_repo();
    let mut harness = setup_view_harness(ViewKind::Study, &repo);
    harness.settle().await;
    let html = harness.render();
    assert!(html.contains("Figure 1 of 2"), "missing position in {html}");
    assert!(html.contains("First figure question"), "missing text in {html}");
    assert!(html.contains("100%"), "missing zoom label in {html}");
    assert!(
        html.contains("/data/chapters/chapter1/images/figure_1_1.jpg"),
        "missing image url in {html}"
    );
}

#[tokio::test(flavor = "current_thread")]
async fn progress_view_smoke_renders_empty_and_filled() {
    let repo = InMemoryRepository::new();
    let mut harness = setup_view_harness(ViewKind::Progress, &repo);
    harness.settle().await;
    let html = harness.render();
    assert!(
        html.contains("You haven't taken any quizzes yet."),
        "missing empty text in {html}"
    );

    let results = QuizResults::new(
        ChapterId::new("1").unwrap(),
        3,
        4,
        vec![CategoryResult {
            category: Category::new("neoplasia").unwrap(),
            correct: 3,
            total: 4,
        }],
    )
    .unwrap();
    assert!(harness.progress.save_quiz_results(&results).await);

    let mut harness = setup_view_harness(ViewKind::Progress, &repo);
    harness.settle().await;
    let html = harness.render();
    assert!(html.contains("Overall Score"), "missing stats in {html}");
    assert!(html.contains("75%"), "missing percentage in {html}");
    assert!(html.contains("Neoplasia"), "missing category in {html}");
    assert!(html.contains("Chapter 1"), "missing chapter row in {html}");
    assert!(html.contains("Quiz History"), "missing history section in {html}");
    assert!(
        html.contains("3 correct out of 4 questions"),
        "missing history entry in {html}"
    );
    assert!(html.contains("Nov 14, 2023"), "missing history date in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn progress_view_smoke_history_is_per_chapter() {
    let repo = InMemoryRepository::new();
    let harness = setup_view_harness(ViewKind::Progress, &repo);
    let results = QuizResults::new(ChapterId::new("2").unwrap(), 1, 2, Vec::new()).unwrap();
    assert!(harness.progress.save_quiz_results(&results).await);

    let mut harness = setup_view_harness(ViewKind::Progress, &repo);
    harness.settle().await;
    let html = harness.render();
    assert!(html.contains("Quiz History"), "missing history section in {html}");
    assert!(
        html.contains("No quiz history available for Chapter 1."),
        "missing empty history text in {html}"
    );
    assert!(
        !html.contains("1 correct out of 2 questions"),
        "other chapter leaked into history in {html}"
    );
}

#[tokio::test(flavor = "current_thread")]
async fn progress_view_smoke_survives_corrupt_profile() {
    let repo = InMemoryRepository::new();
    repo.put("user_data", "not json").await.unwrap();
    let mut harness = setup_view_harness(ViewKind::Progress, &repo);
    harness.settle().await;
    let html = harness.render();
    assert!(
        html.contains("You haven't taken any quizzes yet."),
        "missing fallback text in {html}"
    );
    assert!(html.contains("Reset Progress"), "missing reset button in {html}");
}
