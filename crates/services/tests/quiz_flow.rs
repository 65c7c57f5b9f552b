use quiz_core::model::{AnswerOption, ChapterId, Question, QuestionDraft};
use quiz_core::time::fixed_now;
use services::{
    AppServices, Clock, QuizAdvance, QuizFlowError, QuizPhase, QuizStep, StoreSettings,
};
use storage::repository::{InMemoryRepository, Storage};

fn question(id: &str, answer: &str, category: &str) -> Question {
    Question::new(QuestionDraft {
        id: id.into(),
        figure_number: Some(format!("1.{id}")),
        question_text: format!("Question {id}"),
        option_a: "a".into(),
        option_b: "b".into(),
        option_c: "c".into(),
        option_d: "d".into(),
        correct_answer: answer.into(),
        chapter: "1".into(),
        category: Some(category.into()),
        ..QuestionDraft::default()
    })
    .unwrap()
}

fn chapter_one() -> ChapterId {
    ChapterId::new("1").unwrap()
}

#[tokio::test]
async fn completed_quiz_is_saved_once() {
    let repo = InMemoryRepository::new();
    repo.set_chapter(
        chapter_one(),
        vec![
            question("1", "A", "neoplasia"),
            question("2", "B", "neoplasia"),
            question("3", "C", "inflammation"),
            question("4", "D", "inflammation"),
        ],
    )
    .unwrap();
    let storage = Storage::from_repository(repo);
    let app = AppServices::new(
        &storage,
        Clock::fixed(fixed_now()),
        StoreSettings::new(chapter_one()),
    );
    let quiz = app.quiz();

    let mut flow = quiz.start(chapter_one()).await;
    assert_eq!(flow.phase(), QuizPhase::Ready);
    flow.start().unwrap();

    let picks = [AnswerOption::A, AnswerOption::B, AnswerOption::C, AnswerOption::A];
    let mut completion = None;
    for pick in picks {
        flow.select(pick).unwrap();
        flow.submit().unwrap();
        if let QuizAdvance::Completed { results, saved } = quiz.advance(&mut flow).await.unwrap() {
            assert!(saved);
            completion = Some(results);
        }
    }

    let results = completion.expect("quiz completed");
    assert_eq!((results.correct(), results.total(), results.percentage()), (3, 4, 75));
    assert!(quiz.advance(&mut flow).await.is_err());

    let progress = app.progress().chapter_progress(&chapter_one()).await;
    assert_eq!((progress.correct, progress.total, progress.percentage), (3, 4, 75));
    assert_eq!(app.progress().chapter_history(&chapter_one()).await.len(), 1);

    let overview = app.progress().overview().await;
    let inflammation = overview
        .categories
        .iter()
        .find(|(category, _)| category.as_str() == "inflammation")
        .map(|(_, bucket)| *bucket)
        .unwrap();
    assert_eq!((inflammation.correct, inflammation.total), (1, 2));
}

#[tokio::test]
async fn fixtures_fill_in_for_missing_data() {
    let storage = Storage::in_memory();
    let mut settings = StoreSettings::new(chapter_one());
    settings.use_fixtures = true;
    let app = AppServices::new(&storage, Clock::fixed(fixed_now()), settings);

    let flow = app.quiz().start(chapter_one()).await;
    assert_eq!(flow.len(), 4);
    assert!(flow.questions().iter().all(Question::is_sample));

    let without = AppServices::new(
        &storage,
        Clock::fixed(fixed_now()),
        StoreSettings::new(chapter_one()),
    );
    let mut empty = without.quiz().start(chapter_one()).await;
    assert!(empty.is_empty());
    assert!(empty.start().is_err());
}

#[tokio::test]
async fn sqlite_progress_survives_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let db_url = format!("sqlite://{}?mode=rwc", dir.path().join("quiz.sqlite3").display());
    let data_root = dir.path().join("data");
    std::fs::create_dir_all(data_root.join("chapters/chapter1")).unwrap();
    std::fs::write(
        data_root.join("chapters/chapter1/questions.json"),
        r#"[{"id":"q1","figure_number":"1.1","question_text":"Q1","option_a":"a",
             "option_b":"b","option_c":"c","option_d":"d","correct_answer":"A",
             "category":"neoplasia"}]"#,
    )
    .unwrap();

    {
        let app = AppServices::new_sqlite(
            &db_url,
            data_root.clone(),
            Clock::fixed(fixed_now()),
            StoreSettings::new(chapter_one()),
        )
        .await
        .unwrap();
        let quiz = app.quiz();
        let mut flow = quiz.start(chapter_one()).await;
        flow.start().unwrap();
        flow.select(AnswerOption::A).unwrap();
        flow.submit().unwrap();
        let step = quiz.advance(&mut flow).await.unwrap();
        assert!(matches!(step, QuizAdvance::Completed { saved: true, .. }));
    }

    let reopened = AppServices::new_sqlite(
        &db_url,
        data_root.clone(),
        Clock::fixed(fixed_now()),
        StoreSettings::new(chapter_one()),
    )
    .await
    .unwrap();
    let progress = reopened.progress().chapter_progress(&chapter_one()).await;
    assert_eq!((progress.correct, progress.total, progress.percentage), (1, 1, 100));

    assert!(reopened.progress().reset_progress().await);
    let progress = reopened.progress().chapter_progress(&chapter_one()).await;
    assert_eq!((progress.correct, progress.total), (0, 0));
}

#[tokio::test]
async fn repeated_next_on_last_question_saves_once() {
    let repo = InMemoryRepository::new();
    repo.set_chapter(
        chapter_one(),
        vec![question("1", "A", "neoplasia"), question("2", "B", "neoplasia")],
    )
    .unwrap();
    let storage = Storage::from_repository(repo);
    let app = AppServices::new(
        &storage,
        Clock::fixed(fixed_now()),
        StoreSettings::new(chapter_one()),
    );
    let quiz = app.quiz();

    let mut flow = quiz.start(chapter_one()).await;
    flow.start().unwrap();
    flow.select(AnswerOption::A).unwrap();
    flow.submit().unwrap();
    assert_eq!(flow.advance().unwrap(), QuizStep::Next);
    flow.select(AnswerOption::A).unwrap();
    flow.submit().unwrap();

    // Two clicks on Next: the first completes the flow before any save runs.
    let first = flow.advance();
    let second = flow.advance();
    assert_eq!(flow.phase(), QuizPhase::Completed);
    assert_eq!(second, Err(QuizFlowError::Completed));

    let QuizStep::Completed(results) = first.unwrap() else {
        panic!("last question should complete the quiz");
    };
    assert!(quiz.save_results(&results).await);
    assert!(flow.advance().is_err());

    let overview = app.progress().overview().await;
    assert_eq!(overview.quizzes_taken, 1);
    assert_eq!((overview.total_correct, overview.total_attempted), (1, 2));
}
