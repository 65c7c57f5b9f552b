use dioxus::prelude::*;
use dioxus_router::{Link, Outlet, Routable, use_navigator, use_route};

use crate::views::{HomeView, ProgressView, QuizView, StudyView};

#[derive(Clone, Routable, PartialEq)]
#[rustfmt::skip]
pub enum Route {
    #[layout(Layout)]
        #[route("/", HomeView)] Home {},
        #[route("/home", HomeView)] HomeAlias {},
        #[route("/quiz", QuizView)] Quiz {},
        #[route("/study", StudyView)] Study {},
        #[route("/progress", ProgressView)] Progress {},
        #[route("/:..segments", RedirectHome)] NotFound { segments: Vec<String> },
}

#[component]
fn Layout() -> Element {
    rsx! {
        div { class: "app",
            Sidebar {}
            main { class: "content",
                Outlet::<Route> {}
            }
        }
    }
}

#[component]
fn Sidebar() -> Element {
    let route = use_route::<Route>();
    let item = |target: Route, label: &'static str| {
        let active = match (&route, &target) {
            (Route::Home {} | Route::HomeAlias {}, Route::Home {}) => true,
            (current, target) => current == target,
        };
        let class = if active { "nav-link nav-link--active" } else { "nav-link" };
        rsx! {
            li { Link { class: "{class}", to: target, "{label}" } }
        }
    };

    rsx! {
        nav { class: "sidebar",
            h1 { "Ocular Pathology Quiz" }
            ul {
                {item(Route::Home {}, "Home")}
                {item(Route::Quiz {}, "Take Quiz")}
                {item(Route::Progress {}, "Progress")}
                {item(Route::Study {}, "Study Mode")}
            }
            p { class: "sidebar-footer", "Ocular pathology figure review" }
        }
    }
}

/// Unknown paths land on the home page.
#[component]
fn RedirectHome(segments: Vec<String>) -> Element {
    let navigator = use_navigator();
    let path = segments.join("/");
    use_effect(move || {
        tracing::debug!(%path, "unknown route, redirecting home");
        let _ = navigator.replace(Route::Home {});
    });

    rsx! {
        p { class: "redirect", "Redirecting..." }
    }
}
