use dioxus::prelude::*;
use quiz_core::model::ChapterId;
use services::{CategoryFilter, StudyFlow};

use crate::context::AppContext;
use crate::views::{ViewError, ViewState, view_state_from_resource};
use crate::vm::{StudyFigureVm, map_study_figure};

#[component]
pub fn StudyView() -> Element {
    let ctx = use_context::<AppContext>();
    let mut chapter = use_signal(|| ctx.default_chapter());
    let mut study = use_signal(StudyFlow::default);

    let questions = ctx.questions();
    let resource = use_resource(move || {
        let questions = questions.clone();
        let chapter = chapter();
        let mut study = study;
        async move {
            let loaded = questions.by_chapter(&chapter).await;
            tracing::debug!(%chapter, count = loaded.len(), "study figures loaded");
            study.set(StudyFlow::new(loaded));
            Ok::<_, ViewError>(())
        }
    });

    let state = view_state_from_resource(&resource);
    let store = ctx.questions();
    let (figure, categories, filter_value) = {
        let current = study.read();
        (
            map_study_figure(&current, store.images()),
            current.categories(),
            current.filter().value().to_owned(),
        )
    };
    let chapters = ctx.chapters().to_vec();
    let current_chapter = chapter().to_string();

    rsx! {
        div { class: "page study-page",
            header { class: "view-header",
                h2 { class: "view-title", "Study Mode" }
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
                                study.write().set_filter(CategoryFilter::from_value(&evt.value()));
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
                }
            }
            div { class: "view-divider" }

            match (state, figure) {
                (ViewState::Idle | ViewState::Loading, _) => rsx! {
                    p { "Loading figures..." }
                },
                (ViewState::Error(err), _) => rsx! {
                    p { "{err.message()}" }
                },
                (ViewState::Ready(()), None) => rsx! {
                    div { class: "empty-state",
                        p { "No figures to study for this selection." }
                        button {
                            class: "btn btn-secondary",
                            r#type: "button",
                            onclick: move |_| {
                                let mut resource = resource;
                                resource.restart();
                            },
                            "Retry"
                        }
                    }
                },
                (ViewState::Ready(()), Some(figure)) => rsx! {
                    FigurePanel {
                        figure,
                        on_previous: move |()| {
                            study.write().previous();
                        },
                        on_next: move |()| {
                            study.write().next();
                        },
                        on_zoom_in: move |()| study.write().zoom_in(),
                        on_zoom_out: move |()| study.write().zoom_out(),
                        on_zoom_reset: move |()| study.write().reset_zoom(),
                        on_toggle: move |()| study.write().toggle_answer(),
                    }
                },
            }
        }
    }
}

#[component]
fn FigurePanel(
    figure: StudyFigureVm,
    on_previous: EventHandler<()>,
    on_next: EventHandler<()>,
    on_zoom_in: EventHandler<()>,
    on_zoom_out: EventHandler<()>,
    on_zoom_reset: EventHandler<()>,
    on_toggle: EventHandler<()>,
) -> Element {
    rsx! {
        div { class: "study-card",
            div { class: "study-toolbar",
                span { class: "quiz-position", "{figure.position_label}" }
                div { class: "zoom-controls",
                    button {
                        class: "btn btn-icon",
                        r#type: "button",
                        disabled: !figure.can_zoom_out,
                        onclick: move |_| on_zoom_out.call(()),
                        "−"
                    }
                    button {
                        class: "btn btn-secondary",
                        r#type: "button",
                        onclick: move |_| on_zoom_reset.call(()),
                        "{figure.zoom_label}"
                    }
                    button {
                        class: "btn btn-icon",
                        r#type: "button",
                        disabled: !figure.can_zoom_in,
                        onclick: move |_| on_zoom_in.call(()),
                        "+"
                    }
                }
            }

            div { class: "figure-frame figure-frame--zoomable",
                img {
                    class: "figure-image",
                    src: "{figure.image_url}",
                    alt: "Study figure",
                    style: "transform: scale({figure.scale}); transform-origin: center;",
                }
            }

            div { class: "quiz-meta",
                if let Some(label) = figure.figure_label.as_ref() {
                    span { class: "pill", "{label}" }
                }
                span { class: "pill", "{figure.category_label}" }
            }
            p { class: "quiz-question", "{figure.text}" }

            button {
                class: "btn btn-secondary",
                r#type: "button",
                onclick: move |_| on_toggle.call(()),
                if figure.revealed { "Hide Answer" } else { "Show Answer" }
            }
            if figure.revealed {
                div { class: "feedback feedback--correct",
                    p { class: "feedback-headline", "{figure.answer}" }
                    if !figure.explanation.is_empty() {
                        p { class: "feedback-explanation", "{figure.explanation}" }
                    }
                }
            }

            div { class: "quiz-actions",
                button {
                    class: "btn btn-secondary",
                    r#type: "button",
                    disabled: !figure.has_previous,
                    onclick: move |_| on_previous.call(()),
                    "Previous"
                }
                button {
                    class: "btn btn-primary",
                    r#type: "button",
                    disabled: !figure.has_next,
                    onclick: move |_| on_next.call(()),
                    "Next"
                }
            }
        }
    }
}
