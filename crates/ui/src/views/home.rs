use dioxus::prelude::*;
use dioxus_router::Link;

use crate::context::AppContext;
use crate::routes::Route;
use crate::views::{ViewError, ViewState, view_state_from_resource};
use crate::vm::{format_datetime, tone_class};

#[derive(Clone, Debug, PartialEq, Eq)]
struct HomeData {
    attempted: u32,
    percentage: u32,
    last_quiz_at: Option<String>,
}

#[component]
pub fn HomeView() -> Element {
    let ctx = use_context::<AppContext>();
    let progress = ctx.progress();

    let resource = use_resource(move || {
        let progress = progress.clone();
        async move {
            let overview = progress.overview().await;
            Ok::<_, ViewError>(HomeData {
                attempted: overview.total_attempted,
                percentage: overview.percentage,
                last_quiz_at: overview.last_score.map(|score| format_datetime(score.date)),
            })
        }
    });

    let state = view_state_from_resource(&resource);

    rsx! {
        div { class: "page home-page",
            header { class: "view-header",
                h2 { class: "view-title", "Ocular Pathology Quiz" }
                p { class: "view-subtitle",
                    "Test your knowledge of ocular pathology with figure-based questions from the textbook."
                }
            }

            div { class: "feature-grid",
                FeatureCard {
                    title: "Take a Quiz",
                    body: "Answer multiple-choice questions about each figure and get instant feedback.",
                    to: Route::Quiz {},
                    cta: "Start Quiz",
                }
                FeatureCard {
                    title: "Study Mode",
                    body: "Browse figures in order, zoom in on details and reveal answers at your own pace.",
                    to: Route::Study {},
                    cta: "Study Images",
                }
                FeatureCard {
                    title: "Track Progress",
                    body: "See how you are doing overall, per chapter and per category.",
                    to: Route::Progress {},
                    cta: "View Progress",
                }
            }

            match state {
                ViewState::Ready(data) if data.attempted > 0 => {
                    let tone = tone_class(data.percentage);
                    rsx! {
                        section { class: "home-stats",
                            p {
                                "You have answered {data.attempted} questions with "
                                span { class: "{tone}", "{data.percentage}%" }
                                " accuracy."
                            }
                            if let Some(at) = data.last_quiz_at {
                                p { class: "muted", "Last quiz: {at}" }
                            }
                        }
                    }
                }
                ViewState::Ready(_) => rsx! {
                    section { class: "home-stats",
                        p { class: "muted", "No quizzes taken yet." }
                    }
                },
                ViewState::Error(err) => rsx! {
                    p { "{err.message()}" }
                },
                ViewState::Idle | ViewState::Loading => rsx! {},
            }

            section { class: "about",
                h3 { "About this quiz" }
                p {
                    "Questions are organised by chapter and grouped into categories such as "
                    "developmental anomalies, inflammation, dystrophy and degeneration, and neoplasia."
                }
            }
        }
    }
}

#[component]
fn FeatureCard(title: &'static str, body: &'static str, to: Route, cta: &'static str) -> Element {
    rsx! {
        div { class: "feature-card",
            h3 { "{title}" }
            p { "{body}" }
            Link { class: "btn btn-primary", to, "{cta}" }
        }
    }
}
