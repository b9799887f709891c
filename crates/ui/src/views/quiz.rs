use dioxus::prelude::*;
use dioxus_router::{Link, use_navigator};
use study_core::model::QuizId;

use crate::context::AppContext;
use crate::routes::Route;
use crate::views::{ViewError, ViewState, view_state_from_resource};
use crate::vm::{QuestionVm, QuizResultVm, QuizVm, start_quiz};

#[cfg(test)]
use std::cell::RefCell;
#[cfg(test)]
use std::rc::Rc;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum QuizIntent {
    Select(usize),
    Next,
    Previous,
    Submit,
    Exit,
}

#[component]
pub fn QuizView(quiz_id: u64) -> Element {
    let ctx = use_context::<AppContext>();
    let navigator = use_navigator();
    let sessions = ctx.quiz_sessions();
    let vm = use_signal(|| None::<QuizVm>);
    let error = use_signal(|| None::<ViewError>);
    let submitting = use_signal(|| false);
    // Last question shown before the quiz left `vm` for an in-flight submit.
    let pending_question = use_signal(|| None::<QuestionVm>);

    let sessions_for_resource = sessions.clone();
    let resource = use_resource(move || {
        let sessions = sessions_for_resource.clone();
        let mut vm = vm;
        let mut error = error;
        async move {
            let started = start_quiz(&sessions, QuizId::new(quiz_id)).await?;
            vm.set(Some(started));
            error.set(None);
            Ok::<_, ViewError>(())
        }
    });

    let state = view_state_from_resource(&resource);

    let dispatch_intent = use_callback(move |intent: QuizIntent| {
        let mut vm = vm;
        let mut error = error;
        let mut submitting = submitting;
        let mut pending_question = pending_question;

        match intent {
            QuizIntent::Select(index) => {
                if let Some(vm) = vm.write().as_mut() {
                    match vm.select(index) {
                        Ok(()) => error.set(None),
                        Err(err) => error.set(Some(err)),
                    }
                }
            }
            QuizIntent::Next => {
                if let Some(vm) = vm.write().as_mut() {
                    vm.next();
                }
            }
            QuizIntent::Previous => {
                if let Some(vm) = vm.write().as_mut() {
                    vm.previous();
                }
            }
            QuizIntent::Submit => {
                if submitting() {
                    return;
                }
                submitting.set(true);
                pending_question.set(vm.read().as_ref().map(QuizVm::question));
                let sessions = sessions.clone();
                spawn(async move {
                    let taken = vm.write().take();
                    let Some(mut vm_value) = taken else {
                        error.set(Some(ViewError::Unknown));
                        pending_question.set(None);
                        submitting.set(false);
                        return;
                    };

                    let result = vm_value.submit(&sessions).await;

                    // Put the quiz back even on failure so answers survive a retry.
                    vm.set(Some(vm_value));
                    pending_question.set(None);
                    match result {
                        Ok(()) => error.set(None),
                        Err(err) => error.set(Some(err)),
                    }
                    submitting.set(false);
                });
            }
            QuizIntent::Exit => {
                if submitting() {
                    return;
                }
                if let Some(vm_value) = vm.write().take() {
                    vm_value.exit(&sessions);
                }
                let _ = navigator.push(Route::Home {});
            }
        }
    });

    #[cfg(test)]
    {
        let mut registered = use_signal(|| false);
        if !registered() {
            registered.set(true);
            if let Some(handles) = try_consume_context::<QuizTestHandles>() {
                handles.register(dispatch_intent, vm);
            }
        }
    }

    let snapshot = vm
        .read()
        .as_ref()
        .map(|vm| (vm.question(), vm.result()))
        .or_else(|| pending_question().map(|question| (question, None)));
    let is_submitting = submitting();

    rsx! {
        div { class: "page quiz-page",
            header { class: "quiz-header",
                h2 { "Quiz #{quiz_id}" }
                button {
                    id: "quiz-exit",
                    r#type: "button",
                    disabled: is_submitting,
                    onclick: move |_| dispatch_intent.call(QuizIntent::Exit),
                    "Exit Quiz"
                }
            }

            match state {
                ViewState::Idle => rsx! {
                    p { "Idle" }
                },
                ViewState::Loading => rsx! {
                    p { "Loading..." }
                },
                ViewState::Error(err) => rsx! {
                    p { class: "error", "{err.message()}" }
                    Link { to: Route::Home {}, "Back to quizzes" }
                },
                ViewState::Ready(()) => rsx! {
                    match snapshot {
                        None => rsx! {
                            p { "Loading..." }
                        },
                        Some((_, Some(result))) => rsx! {
                            ResultPanel { result }
                        },
                        Some((question, None)) => rsx! {
                            QuestionPanel { question, submitting: is_submitting, on_intent: dispatch_intent }
                        },
                    }
                },
            }

            if let Some(err) = error() {
                p { class: "error", id: "quiz-error", "{err.message()}" }
            }
        }
    }
}

#[component]
fn QuestionPanel(question: QuestionVm, submitting: bool, on_intent: EventHandler<QuizIntent>) -> Element {
    rsx! {
        section { class: "quiz-question",
            p { class: "quiz-progress", "{question.number_label}" }
            h3 { "{question.text}" }
            ul { class: "quiz-options",
                for option in question.options {
                    li { key: "{option.index}",
                        button {
                            class: if option.selected { "quiz-option selected" } else { "quiz-option" },
                            r#type: "button",
                            disabled: submitting,
                            onclick: move |_| on_intent.call(QuizIntent::Select(option.index)),
                            "{option.label}"
                        }
                    }
                }
            }
            p { class: "quiz-answered", "{question.answered_label}" }
            if !question.can_submit && !question.can_go_forward && !submitting {
                p { class: "quiz-hint", "Answer every question to submit." }
            }
            div { class: "quiz-nav",
                button {
                    id: "quiz-previous",
                    r#type: "button",
                    disabled: !question.can_go_back,
                    onclick: move |_| on_intent.call(QuizIntent::Previous),
                    "Previous"
                }
                span { class: "quiz-position", "{question.progress_label}" }
                if question.can_go_forward {
                    button {
                        id: "quiz-next",
                        r#type: "button",
                        onclick: move |_| on_intent.call(QuizIntent::Next),
                        "Next"
                    }
                } else {
                    button {
                        id: "quiz-submit",
                        r#type: "button",
                        disabled: submitting,
                        onclick: move |_| on_intent.call(QuizIntent::Submit),
                        if submitting { "Submitting..." } else { "Submit" }
                    }
                }
            }
        }
    }
}

#[component]
fn ResultPanel(result: QuizResultVm) -> Element {
    rsx! {
        section { class: "quiz-result",
            h3 { "Your score: {result.score_label}" }
            p {
                class: if result.passed { "verdict passed" } else { "verdict failed" },
                "{result.verdict}"
            }
            p { class: "quiz-local", "{result.local_label}" }
            if let Some(note) = result.score_note {
                p { class: "quiz-score-note", "{note}" }
            }
        }
        ol { class: "quiz-review",
            for row in result.rows {
                li { class: "review-row",
                    p { class: "review-title", "{row.number_label}: {row.text}" }
                    ul {
                        for option in row.options {
                            li { class: option.mark.class(),
                                "{option.label}"
                                if option.selected {
                                    span { class: "review-selected", " (your answer)" }
                                }
                            }
                        }
                    }
                }
            }
        }
        Link { to: Route::Home {}, "Back to quizzes" }
    }
}

#[cfg(test)]
#[derive(Clone, Default)]
pub(crate) struct QuizTestHandles {
    dispatch: Rc<RefCell<Option<Callback<QuizIntent>>>>,
    vm: Rc<RefCell<Option<Signal<Option<QuizVm>>>>>,
}

#[cfg(test)]
impl QuizTestHandles {
    pub(crate) fn register(&self, dispatch: Callback<QuizIntent>, vm: Signal<Option<QuizVm>>) {
        *self.dispatch.borrow_mut() = Some(dispatch);
        *self.vm.borrow_mut() = Some(vm);
    }

    pub(crate) fn dispatch(&self) -> Callback<QuizIntent> {
        (*self.dispatch.borrow()).expect("quiz dispatch registered")
    }

    pub(crate) fn vm(&self) -> Signal<Option<QuizVm>> {
        (*self.vm.borrow()).expect("quiz vm registered")
    }
}
