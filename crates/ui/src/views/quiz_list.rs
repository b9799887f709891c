use dioxus::prelude::*;
use dioxus_router::Link;
use study_core::model::{NoteId, QuizId};

use crate::context::AppContext;
use crate::routes::Route;
use crate::views::{ViewError, ViewState, view_state_from_resource};
use crate::vm::{QuizCardVm, map_quiz_cards, stats_label};

#[cfg(test)]
use std::cell::RefCell;
#[cfg(test)]
use std::rc::Rc;

#[derive(Clone, Debug, PartialEq)]
struct QuizListData {
    cards: Vec<QuizCardVm>,
}

#[component]
pub fn QuizListView(note_id: u64) -> Element {
    let ctx = use_context::<AppContext>();
    let catalog = ctx.quiz_catalog();
    let note_id = NoteId::new(note_id);
    let generating = use_signal(|| false);
    let notice = use_signal(|| None::<String>);

    let catalog_for_resource = catalog.clone();
    let resource = use_resource(move || {
        let catalog = catalog_for_resource.clone();
        async move {
            let quizzes = catalog.list_quizzes(note_id).await?;
            Ok::<_, ViewError>(QuizListData {
                cards: map_quiz_cards(&quizzes),
            })
        }
    });

    let state = view_state_from_resource(&resource);

    let on_generate = use_callback(move |()| {
        let mut generating = generating;
        if generating() {
            return;
        }
        generating.set(true);
        let catalog = catalog.clone();
        let mut notice = notice;
        let mut resource = resource;
        spawn(async move {
            match catalog.generate_quiz(note_id).await {
                Ok(message) => {
                    notice.set(Some(message));
                    resource.restart();
                }
                Err(err) => {
                    tracing::warn!(error = %err, "quiz generation failed");
                    notice.set(Some(ViewError::GenerateFailed.message()));
                }
            }
            generating.set(false);
        });
    });

    #[cfg(test)]
    {
        let mut registered = use_signal(|| false);
        if !registered() {
            registered.set(true);
            if let Some(handles) = try_consume_context::<QuizListTestHandles>() {
                handles.register(on_generate, generating);
            }
        }
    }

    rsx! {
        div { class: "page",
            h2 { "Quizzes for note {note_id}" }
            Link { to: Route::Home {}, "All notes" }

            div { class: "quiz-actions",
                button {
                    id: "quiz-generate",
                    r#type: "button",
                    disabled: generating(),
                    onclick: move |_| on_generate.call(()),
                    if generating() { "Generating..." } else { "Generate Quiz" }
                }
                if let Some(message) = notice() {
                    p { class: "notice", "{message}" }
                }
            }

            match state {
                ViewState::Idle => rsx! {
                    p { "Idle" }
                },
                ViewState::Loading => rsx! {
                    p { "Loading..." }
                },
                ViewState::Ready(data) => rsx! {
                    if data.cards.is_empty() {
                        p { "No quizzes for this note yet." }
                    } else {
                        ul { class: "quiz-cards",
                            for card in data.cards {
                                QuizCard { key: "{card.quiz_id}", card }
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
fn QuizCard(card: QuizCardVm) -> Element {
    let ctx = use_context::<AppContext>();
    let catalog = ctx.quiz_catalog();
    let quiz_id = card.quiz_id;

    let stats = use_resource(move || {
        let catalog = catalog.clone();
        async move {
            let stats = catalog.quiz_stats(QuizId::new(quiz_id)).await?;
            Ok::<_, ViewError>(stats_label(&stats))
        }
    });
    let stats_state = view_state_from_resource(&stats);

    rsx! {
        li { class: "quiz-card",
            h3 { "{card.title}" }
            p { "{card.questions_label}" }
            if let Some(created) = card.created_label.clone() {
                p { class: "quiz-created", "{created}" }
            }
            if let ViewState::Ready(label) = stats_state {
                p { class: "quiz-stats", "{label}" }
            }
            Link { class: "quiz-take", to: Route::Quiz { quiz_id }, "Take Quiz" }
        }
    }
}

#[cfg(test)]
#[derive(Clone, Default)]
pub(crate) struct QuizListTestHandles {
    generate: Rc<RefCell<Option<Callback<()>>>>,
    generating: Rc<RefCell<Option<Signal<bool>>>>,
}

#[cfg(test)]
impl QuizListTestHandles {
    pub(crate) fn register(&self, generate: Callback<()>, generating: Signal<bool>) {
        *self.generate.borrow_mut() = Some(generate);
        *self.generating.borrow_mut() = Some(generating);
    }

    pub(crate) fn generate(&self) -> Callback<()> {
        (*self.generate.borrow()).expect("generate registered")
    }

    pub(crate) fn generating(&self) -> Signal<bool> {
        (*self.generating.borrow()).expect("generating registered")
    }
}
