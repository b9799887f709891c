use dioxus::prelude::*;
use dioxus_router::Link;

use crate::context::AppContext;
use crate::routes::Route;
use crate::views::{ViewError, ViewState, view_state_from_resource};
use crate::vm::{NoteCardVm, map_note_cards};

#[component]
pub fn NotesOverviewView() -> Element {
    let ctx = use_context::<AppContext>();
    let catalog = ctx.quiz_catalog();

    let resource = use_resource(move || {
        let catalog = catalog.clone();
        async move {
            let overview = catalog.overview().await?;
            Ok::<_, ViewError>(map_note_cards(&overview))
        }
    });

    let state = view_state_from_resource(&resource);

    rsx! {
        div { class: "page",
            h2 { "Quizzes Overview" }

            match state {
                ViewState::Idle => rsx! {
                    p { "Idle" }
                },
                ViewState::Loading => rsx! {
                    p { "Loading..." }
                },
                ViewState::Ready(cards) => rsx! {
                    if cards.is_empty() {
                        p { "No quizzes generated yet." }
                    } else {
                        ul { class: "note-cards",
                            for card in cards {
                                NoteCard { key: "{card.note_id}", card }
                            }
                        }
                    }
                },
                ViewState::Error(err) => rsx! {
                    p { class: "error", "{err.message()}" }
                },
            }
        }
    }
}

#[component]
fn NoteCard(card: NoteCardVm) -> Element {
    rsx! {
        li { class: "note-card",
            h3 { "{card.title}" }
            if let Some(subtitle) = card.subtitle.clone() {
                p { class: "note-notebook", "{subtitle}" }
            }
            p { class: "note-quizzes", "{card.quizzes_label}" }
            Link { class: "note-open", to: Route::Note { note_id: card.note_id }, "View Quizzes" }
        }
    }
}
