use std::time::Duration;

use dioxus::prelude::*;
use dioxus_router::Link;
use quiz_core::model::ChapterId;

use crate::context::AppContext;
use crate::routes::Route;
use crate::views::{ViewError, ViewState, view_state_from_resource};
use crate::vm::{CategoryRowVm, ChapterRowVm, ProgressVm, map_chapter_history, map_progress};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum ResetState {
    Idle,
    Confirming,
    Resetting,
    Done,
    Error(ViewError),
}

#[component]
pub fn ProgressView() -> Element {
    let ctx = use_context::<AppContext>();
    let progress = ctx.progress();
    let mut reset_state = use_signal(|| ResetState::Idle);

    let progress_for_resource = progress.clone();
    let resource = use_resource(move || {
        let progress = progress_for_resource.clone();
        async move { Ok::<_, ViewError>(map_progress(&progress.overview().await)) }
    });

    let state = view_state_from_resource(&resource);

    let on_confirm_reset = move |_: MouseEvent| {
        let progress = progress.clone();
        let mut reset_state = reset_state;
        let mut resource = resource;
        reset_state.set(ResetState::Resetting);
        spawn(async move {
            if progress.reset_progress().await {
                reset_state.set(ResetState::Done);
                resource.restart();
                spawn(async move {
                    tokio::time::sleep(Duration::from_secs(2)).await;
                    if reset_state() == ResetState::Done {
                        reset_state.set(ResetState::Idle);
                    }
                });
            } else {
                reset_state.set(ResetState::Error(ViewError::SaveFailed));
            }
        });
    };

    rsx! {
        div { class: "page progress-page",
            header { class: "view-header",
                h2 { class: "view-title", "Your Progress" }
            }
            div { class: "view-divider" }

            match state {
                ViewState::Idle | ViewState::Loading => rsx! {
                    p { "Loading..." }
                },
                ViewState::Error(err) => rsx! {
                    p { "{err.message()}" }
                    button {
                        class: "btn btn-secondary",
                        r#type: "button",
                        onclick: move |_| {
                            let mut resource = resource;
                            resource.restart();
                        },
                        "Retry"
                    }
                },
                ViewState::Ready(data) if !data.has_history() => rsx! {
                    div { class: "empty-state",
                        p { "You haven't taken any quizzes yet." }
                        Link { class: "btn btn-primary", to: Route::Quiz {}, "Take Your First Quiz" }
                    }
                },
                ViewState::Ready(data) => rsx! {
                    ProgressDetails { data }
                    ChapterHistory {}
                },
            }

            div { class: "danger-zone",
                match reset_state() {
                    ResetState::Idle => rsx! {
                        button {
                            class: "btn btn-danger",
                            r#type: "button",
                            onclick: move |_| reset_state.set(ResetState::Confirming),
                            "Reset Progress"
                        }
                    },
                    ResetState::Confirming => rsx! {
                        p { "This clears every quiz result. Continue?" }
                        button {
                            class: "btn btn-danger",
                            r#type: "button",
                            onclick: on_confirm_reset,
                            "Yes, Reset"
                        }
                        button {
                            class: "btn btn-secondary",
                            r#type: "button",
                            onclick: move |_| reset_state.set(ResetState::Idle),
                            "Cancel"
                        }
                    },
                    ResetState::Resetting => rsx! {
                        p { "Resetting..." }
                    },
                    ResetState::Done => rsx! {
                        p { class: "banner banner--success", "Progress reset." }
                    },
                    ResetState::Error(err) => rsx! {
                        p { "{err.message()}" }
                        button {
                            class: "btn btn-secondary",
                            r#type: "button",
                            onclick: move |_| reset_state.set(ResetState::Idle),
                            "Dismiss"
                        }
                    },
                }
            }
        }
    }
}

#[component]
fn ProgressDetails(data: ProgressVm) -> Element {
    rsx! {
        section { class: "stat-grid",
            div { class: "stat-card",
                span { class: "stat-label", "Overall Score" }
                span { class: "stat-value {data.tone}", "{data.percentage}%" }
            }
            div { class: "stat-card",
                span { class: "stat-label", "Questions Answered" }
                span { class: "stat-value", "{data.total_correct} / {data.total_attempted}" }
            }
            div { class: "stat-card",
                span { class: "stat-label", "Quizzes Taken" }
                span { class: "stat-value", "{data.quizzes_taken}" }
            }
        }

        if let Some(last) = data.last_quiz.as_ref() {
            section { class: "last-quiz",
                h3 { "Last Quiz" }
                p {
                    "{last.chapter} on {last.date}: "
                    span { class: "{last.tone}", "{last.score}%" }
                    " ({last.correct}/{last.total})"
                }
            }
        }

        section {
            h3 { "By Category" }
            ul { class: "category-list",
                for row in data.categories.clone() {
                    CategoryBar { key: "{row.name}", row }
                }
            }
        }

        if !data.chapters.is_empty() {
            section {
                h3 { "By Chapter" }
                ul { class: "category-list",
                    for row in data.chapters.clone() {
                        ChapterBar { key: "{row.label}", row }
                    }
                }
            }
        }
    }
}

#[component]
fn CategoryBar(row: CategoryRowVm) -> Element {
    rsx! {
        li { class: "category-row",
            span { class: "category-name", "{row.name}" }
            div { class: "progress-bar",
                div { class: "progress-bar-fill {row.tone}", style: "width: {row.percentage}%" }
            }
            span { class: "category-score {row.tone}",
                "{row.correct}/{row.total} ({row.percentage}%)"
            }
        }
    }
}

#[component]
fn ChapterBar(row: ChapterRowVm) -> Element {
    rsx! {
        li { class: "category-row",
            span { class: "category-name", "{row.label}" }
            div { class: "progress-bar",
                div { class: "progress-bar-fill {row.tone}", style: "width: {row.percentage}%" }
            }
            span { class: "category-score {row.tone}",
                "{row.correct}/{row.total} ({row.percentage}%)"
            }
        }
    }
}

#[component]
fn ChapterHistory() -> Element {
    let ctx = use_context::<AppContext>();
    let mut chapter = use_signal(|| ctx.default_chapter());
    let chapters = ctx.chapters().to_vec();
    let current_chapter = chapter().to_string();

    let progress = ctx.progress();
    let resource = use_resource(move || {
        let progress = progress.clone();
        let chapter = chapter();
        async move {
            let scores = progress.chapter_history(&chapter).await;
            Ok::<_, ViewError>(map_chapter_history(&chapter, &scores))
        }
    });

    rsx! {
        section { class: "quiz-history",
            header { class: "view-header",
                h3 { "Quiz History" }
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
            }

            match view_state_from_resource(&resource) {
                ViewState::Idle | ViewState::Loading => rsx! {
                    p { "Loading..." }
                },
                ViewState::Error(err) => rsx! {
                    p { "{err.message()}" }
                },
                ViewState::Ready(history) if history.entries.is_empty() => rsx! {
                    p { class: "muted",
                        "No quiz history available for {history.chapter_label}. Take a quiz to see your progress."
                    }
                },
                ViewState::Ready(history) => rsx! {
                    ul { class: "history-list",
                        for (index, entry) in history.entries.into_iter().enumerate() {
                            li { key: "{index}", class: "history-row",
                                div { class: "history-head",
                                    span { "{entry.date}" }
                                    span { class: "{entry.tone}", "{entry.score}%" }
                                }
                                div { class: "progress-bar",
                                    div {
                                        class: "progress-bar-fill {entry.tone}",
                                        style: "width: {entry.score}%",
                                    }
                                }
                                p { class: "muted",
                                    "{entry.correct} correct out of {entry.total} questions"
                                }
                            }
                        }
                    }
                },
            }
        }
    }
}
