use dioxus::prelude::*;
use dioxus_router::{Link, Outlet, Routable};

use crate::context::AppContext;
use crate::views::{NotesOverviewView, QuizListView, QuizView};

#[derive(Clone, Routable, PartialEq)]
#[rustfmt::skip]
pub enum Route {
    #[layout(Layout)]
        #[route("/", NotesOverviewView)] Home {},
        #[route("/note/:note_id", QuizListView)] Note { note_id: u64 },
        #[route("/quiz/:quiz_id", QuizView)] Quiz { quiz_id: u64 },
}

#[component]
fn Layout() -> Element {
    let ctx = use_context::<AppContext>();
    let note_id = ctx.current_note_id().value();

    rsx! {
        div { class: "app",
            nav { class: "topbar",
                h1 { "Study" }
                Link { to: Route::Home {}, "Quizzes" }
                Link { to: Route::Note { note_id }, "Note #{note_id}" }
            }
            main { class: "content",
                Outlet::<Route> {}
            }
        }
    }
}
