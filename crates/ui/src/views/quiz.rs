use dioxus::prelude::*;
use dioxus_router::Link;
use quiz_core::model::{AnswerOption, ChapterId};
use services::{CategoryFilter, QuizFlow, QuizFlowError, QuizStep, SortOrder};

use crate::context::AppContext;
use crate::routes::Route;
use crate::views::ViewError;
use crate::vm::{QuestionVm, QuizScreenVm, ResultsVm, map_quiz_screen};

#[component]
pub fn QuizView() -> Element {
    let ctx = use_context::<AppContext>();
    let default_chapter = ctx.default_chapter();
    let mut chapter = use_signal(|| default_chapter.clone());
    let mut flow = use_signal(|| QuizFlow::loading(default_chapter.clone()));
    let mut save_error = use_signal(|| None::<ViewError>);

    let questions = ctx.questions();
    let loader = use_resource(move || {
        let questions = questions.clone();
        let chapter = chapter();
        let mut flow = flow;
        async move {
            let generation = flow.write().begin_load(chapter.clone());
            let loaded = questions.by_chapter(&chapter).await;
            if !flow.write().finish_load(generation, loaded, &mut rand::rng()) {
                tracing::debug!(%chapter, "quiz load superseded");
            }
            Ok::<_, ViewError>(())
        }
    });

    let store = ctx.questions();
    let (screen, categories, filter_value, sort_value) = {
        let current = flow.read();
        (
            map_quiz_screen(&current, store.images()),
            current.categories(),
            current.filter().value().to_owned(),
            current.sort().value(),
        )
    };
    let chapters = ctx.chapters().to_vec();
    let current_chapter = chapter().to_string();

    let quiz = ctx.quiz();
    let on_next = move |_: MouseEvent| {
        let mut flow = flow;
        let mut save_error = save_error;
        let step = flow.write().advance();
        match step {
            Ok(QuizStep::Next) => save_error.set(None),
            Ok(QuizStep::Completed(results)) => {
                let quiz = quiz.clone();
                spawn(async move {
                    if quiz.save_results(&results).await {
                        save_error.set(None);
                    } else {
                        save_error.set(Some(ViewError::SaveFailed));
                    }
                });
            }
            Err(err) => tracing::debug!(error = %err, "quiz advance rejected"),
        }
    };

    rsx! {
        div { class: "page quiz-page",
            header { class: "view-header",
                h2 { class: "view-title", "Take Quiz" }
                div { class: "quiz-controls",
                    label { class: "control",
                        span { "Chapter" }
                        select {
                            value: "{current_chapter}",
                            onchange: move |evt: FormEvent| {
                                if let Ok(id) = ChapterId::new(evt.value()) {
                                    chapter.set(id);
                                }
                            },
                            for id in chapters {
                                option { key: "{id}", value: "{id}", "Chapter {id}" }
                            }
                        }
                    }
                    label { class: "control",
                        span { "Category" }
                        select {
                            value: "{filter_value}",
                            onchange: move |evt: FormEvent| {
                                flow.write().set_filter(CategoryFilter::from_value(&evt.value()), &mut rand::rng());
                            },
                            option { value: "all", "All Categories" }
                            for category in categories {
                                option {
                                    key: "{category}",
                                    value: "{category}",
                                    "{category.display_name()}"
                                }
                            }
                        }
                    }
                    label { class: "control",
                        span { "Order" }
                        select {
                            value: "{sort_value}",
                            onchange: move |evt: FormEvent| {
                                if let Ok(order) = evt.value().parse::<SortOrder>() {
                                    flow.write().set_sort(order, &mut rand::rng());
                                }
                            },
                            for order in SortOrder::ALL {
                                option { key: "{order.value()}", value: "{order.value()}", "{order.label()}" }
                            }
                        }
                    }
                }
            }
            div { class: "view-divider" }

            if let Some(err) = save_error() {
                p { class: "banner banner--error", "{err.message()}" }
            }

            match screen {
                QuizScreenVm::Loading => rsx! {
                    p { "Loading questions..." }
                },
                QuizScreenVm::Empty { filtered: true } => rsx! {
                    div { class: "empty-state",
                        p { "No questions match this category." }
                        button {
                            class: "btn btn-secondary",
                            r#type: "button",
                            onclick: move |_| {
                                flow.write().set_filter(CategoryFilter::All, &mut rand::rng());
                            },
                            "Show All Categories"
                        }
                    }
                },
                QuizScreenVm::Empty { filtered: false } => rsx! {
                    div { class: "empty-state",
                        p { "No questions are available for this chapter yet." }
                        button {
                            class: "btn btn-secondary",
                            r#type: "button",
                            onclick: move |_| {
                                let mut loader = loader;
                                loader.restart();
                            },
                            "Retry"
                        }
                    }
                },
                QuizScreenVm::Ready { count } => rsx! {
                    div { class: "quiz-start",
                        p { "{count} questions ready." }
                        button {
                            class: "btn btn-primary",
                            r#type: "button",
                            onclick: move |_| {
                                let started = flow.write().start();
                                log_rejected("start", started);
                            },
                            "Start Quiz"
                        }
                    }
                },
                QuizScreenVm::Question(question) => rsx! {
                    QuestionCard {
                        question,
                        on_select: move |option: AnswerOption| {
                            let selected = flow.write().select(option);
                            log_rejected("select", selected);
                        },
                        on_submit: move |()| {
                            let submitted = flow.write().submit().map(|_| ());
                            log_rejected("submit", submitted);
                        },
                        on_previous: move |()| {
                            let moved = flow.write().previous();
                            log_rejected("previous", moved);
                        },
                        on_next,
                    }
                },
                QuizScreenVm::Completed(results) => rsx! {
                    ResultsCard {
                        results,
                        on_restart: move |()| {
                            save_error.set(None);
                            flow.write().restart();
                        },
                    }
                },
            }
        }
    }
}

#[component]
fn QuestionCard(
    question: QuestionVm,
    on_select: EventHandler<AnswerOption>,
    on_submit: EventHandler<()>,
    on_previous: EventHandler<()>,
    on_next: EventHandler<MouseEvent>,
) -> Element {
    let revealed = question.revealed;
    rsx! {
        div { class: "quiz-card",
            div { class: "quiz-meta",
                span { class: "quiz-position", "{question.position_label}" }
                if let Some(figure) = question.figure_label.as_ref() {
                    span { class: "pill", "{figure}" }
                }
                span { class: "pill", "{question.category_label}" }
                if let Some(difficulty) = question.difficulty_label {
                    span { class: "pill pill--muted", "{difficulty}" }
                }
            }
            div { class: "progress-bar",
                div { class: "progress-bar-fill", style: "width: {question.progress_percent}%" }
            }

            div { class: "figure-frame",
                img { class: "figure-image", src: "{question.image_url}", alt: "Question figure" }
            }

            p { class: "quiz-question", "{question.text}" }

            div { class: "quiz-options",
                for opt in question.options.clone() {
                    button {
                        key: "{opt.letter}",
                        class: "{opt.class}",
                        r#type: "button",
                        disabled: revealed,
                        onclick: move |_| on_select.call(opt.option),
                        span { class: "quiz-option-letter", "{opt.letter}" }
                        span { class: "quiz-option-text", "{opt.text}" }
                    }
                }
            }

            if let Some(feedback) = question.feedback.as_ref() {
                div { class: feedback_class(feedback.is_correct),
                    p { class: "feedback-headline", "{feedback.headline}" }
                    if !feedback.explanation.is_empty() {
                        p { class: "feedback-explanation", "{feedback.explanation}" }
                    }
                }
            }

            div { class: "quiz-actions",
                button {
                    class: "btn btn-secondary",
                    r#type: "button",
                    disabled: !question.can_go_back,
                    onclick: move |_| on_previous.call(()),
                    "Previous"
                }
                if revealed {
                    button {
                        class: "btn btn-primary",
                        r#type: "button",
                        onclick: move |evt| on_next.call(evt),
                        "{question.next_label}"
                    }
                } else {
                    button {
                        class: "btn btn-primary",
                        r#type: "button",
                        disabled: !question.can_submit,
                        onclick: move |_| on_submit.call(()),
                        "Submit Answer"
                    }
                }
            }
        }
    }
}

fn log_rejected(action: &'static str, outcome: Result<(), QuizFlowError>) {
    if let Err(err) = outcome {
        tracing::debug!(action, error = %err, "quiz action rejected");
    }
}

fn feedback_class(is_correct: bool) -> &'static str {
    if is_correct {
        "feedback feedback--correct"
    } else {
        "feedback feedback--incorrect"
    }
}

#[component]
fn ResultsCard(results: ResultsVm, on_restart: EventHandler<()>) -> Element {
    rsx! {
        div { class: "quiz-results",
            h3 { "Quiz Completed!" }
            p { class: "results-score {results.tone}", "{results.percentage}%" }
            p { "You answered {results.correct} out of {results.total} questions correctly." }

            if !results.categories.is_empty() {
                h4 { "Results by Category" }
                ul { class: "category-list",
                    for row in results.categories.clone() {
                        li { key: "{row.name}", class: "category-row",
                            span { class: "category-name", "{row.name}" }
                            span { class: "category-score {row.tone}",
                                "{row.correct}/{row.total} ({row.percentage}%)"
                            }
                        }
                    }
                }
            }

            div { class: "quiz-actions",
                button {
                    class: "btn btn-primary",
                    r#type: "button",
                    onclick: move |_| on_restart.call(()),
                    "Try Again"
                }
                Link { class: "btn btn-secondary", to: Route::Progress {}, "View Progress" }
            }
        }
    }
}
