use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use client::{
    Backend, ClientError, InMemoryBackend, Submission, SubmissionReceipt, SubmissionSink,
};
use dioxus::core::NoOpMutations;
use dioxus::prelude::*;
use dioxus_router::{Routable, Router};
use services::{Clock, QuizCatalogService, QuizSessionService};
use study_core::model::{NoteId, Question, QuizId};
use study_core::time::fixed_now;
use tokio::sync::Notify;

use crate::context::{UiApp, build_app_context};
use crate::views::quiz::QuizTestHandles;
use crate::views::quiz_list::QuizListTestHandles;
use crate::views::{NotesOverviewView, QuizListView, QuizView};

pub const NOTE_ID: NoteId = NoteId::new(1);
pub const QUIZ_ID: QuizId = QuizId::new(7);

#[derive(Clone)]
struct TestApp {
    note_id: NoteId,
    quiz_sessions: Arc<QuizSessionService>,
    quiz_catalog: Arc<QuizCatalogService>,
}

impl UiApp for TestApp {
    fn current_note_id(&self) -> NoteId {
        self.note_id
    }

    fn quiz_sessions(&self) -> Arc<QuizSessionService> {
        Arc::clone(&self.quiz_sessions)
    }

    fn quiz_catalog(&self) -> Arc<QuizCatalogService> {
        Arc::clone(&self.quiz_catalog)
    }
}

#[derive(Clone, Copy, PartialEq, Eq)]
pub enum ViewKind {
    Overview,
    QuizList(u64),
    Quiz(u64),
}

#[derive(Props, Clone)]
struct ViewHarnessProps {
    app: Arc<TestApp>,
    view: ViewKind,
    quiz_handles: QuizTestHandles,
    quiz_list_handles: QuizListTestHandles,
}

impl PartialEq for ViewHarnessProps {
    fn eq(&self, _other: &Self) -> bool {
        true
    }
}

#[component]
fn ViewRouterHarness(props: ViewHarnessProps) -> Element {
    let app: Arc<dyn UiApp> = props.app.clone();
    use_context_provider(|| build_app_context(&app));
    use_context_provider(|| props.view);
    use_context_provider(|| props.quiz_handles.clone());
    use_context_provider(|| props.quiz_list_handles.clone());
    rsx! { Router::<TestRoute> {} }
}

#[derive(Clone, Routable, PartialEq)]
#[rustfmt::skip]
enum TestRoute {
    #[route("/")]
    Root {},
}

#[component]
fn Root() -> Element {
    let view = use_context::<ViewKind>();
    match view {
        ViewKind::Overview => rsx! { NotesOverviewView {} },
        ViewKind::QuizList(note_id) => rsx! { QuizListView { note_id } },
        ViewKind::Quiz(quiz_id) => rsx! { QuizView { quiz_id } },
    }
}

pub struct ViewHarness {
    pub dom: VirtualDom,
    pub backend: InMemoryBackend,
    pub quiz_handles: QuizTestHandles,
    pub quiz_list_handles: QuizListTestHandles,
}

impl ViewHarness {
    pub fn rebuild(&mut self) {
        self.dom.rebuild_in_place();
        drive_dom(&mut self.dom);
    }

    pub async fn drive_async(&mut self) {
        let _ = tokio::time::timeout(
            std::time::Duration::from_millis(50),
            self.dom.wait_for_work(),
        )
        .await;
        self.dom.render_immediate(&mut NoOpMutations);
        self.dom.process_events();
    }

    /// Drive until pending resources and spawned tasks settle.
    pub async fn settle(&mut self) {
        for _ in 0..4 {
            self.drive_async().await;
        }
    }

    pub fn render(&self) -> String {
        dioxus_ssr::render(&self.dom)
    }
}

pub fn drive_dom(dom: &mut VirtualDom) {
    dom.process_events();
    dom.render_immediate(&mut NoOpMutations);
    dom.process_events();
}

fn question(text: &str, correct: &str) -> Question {
    Question::from_raw(
        text,
        vec!["Paris".into(), "London".into(), "Berlin".into(), "Rome".into()],
        correct,
    )
    .expect("valid question")
}

/// Submission sink that can hold attempts until released and fail the
/// first few before delegating to an [`InMemoryBackend`].
pub struct ScriptedSink {
    inner: InMemoryBackend,
    failures: AtomicUsize,
    calls: AtomicUsize,
    gate: Option<Arc<Notify>>,
}

impl ScriptedSink {
    pub fn failing(inner: InMemoryBackend, failures: usize) -> Self {
        Self {
            inner,
            failures: AtomicUsize::new(failures),
            calls: AtomicUsize::new(0),
            gate: None,
        }
    }

    /// Each attempt waits for one `notify_one` on `gate`.
    pub fn gated(inner: InMemoryBackend, gate: Arc<Notify>) -> Self {
        Self {
            gate: Some(gate),
            ..Self::failing(inner, 0)
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl SubmissionSink for ScriptedSink {
    async fn submit_answers(
        &self,
        submission: &Submission,
    ) -> Result<SubmissionReceipt, ClientError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(gate) = &self.gate {
            gate.notified().await;
        }
        let failing = self
            .failures
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |left| left.checked_sub(1))
            .is_ok();
        if failing {
            return Err(ClientError::Unavailable("offline".into()));
        }
        self.inner.submit_answers(submission).await
    }
}

/// Seeds two notes and two quizzes under [`NOTE_ID`]: [`QUIZ_ID`] with two
/// questions and an empty one with id 8. Note 2 has no quizzes.
pub fn seeded_backend() -> InMemoryBackend {
    let backend = InMemoryBackend::new();
    backend
        .insert_note(NOTE_ID, "Capitals", Some("Geography".into()))
        .expect("insert note");
    backend
        .insert_note(NoteId::new(2), "Rivers", Some("Geography".into()))
        .expect("insert note");
    backend
        .insert_quiz(
            QUIZ_ID,
            NOTE_ID,
            Some(fixed_now()),
            vec![
                question("Capital of France?", "A"),
                question("Capital of Germany?", "C. Berlin"),
            ],
        )
        .expect("insert quiz");
    backend
        .insert_quiz(QuizId::new(8), NOTE_ID, None, Vec::new())
        .expect("insert empty quiz");
    backend
}

pub fn setup_view_harness(view: ViewKind) -> ViewHarness {
    setup_view_harness_with_backend(view, seeded_backend())
}

pub fn setup_view_harness_with_backend(view: ViewKind, backend: InMemoryBackend) -> ViewHarness {
    let sink: Arc<dyn SubmissionSink> = Arc::new(backend.clone());
    setup_view_harness_with_sink(view, backend, sink)
}

pub fn setup_view_harness_with_sink(
    view: ViewKind,
    backend: InMemoryBackend,
    sink: Arc<dyn SubmissionSink>,
) -> ViewHarness {
    let clock = Clock::fixed(fixed_now());
    let wired = Backend::from_in_memory(backend.clone());
    let quiz_sessions = Arc::new(QuizSessionService::new(
        clock,
        Arc::clone(&wired.quizzes),
        sink,
    ));
    let quiz_catalog = Arc::new(QuizCatalogService::new(Arc::clone(&wired.catalog)));

    let app = Arc::new(TestApp {
        note_id: NOTE_ID,
        quiz_sessions,
        quiz_catalog,
    });
    let quiz_handles = QuizTestHandles::default();
    let quiz_list_handles = QuizListTestHandles::default();

    let dom = VirtualDom::new_with_props(
        ViewRouterHarness,
        ViewHarnessProps {
            app,
            view,
            quiz_handles: quiz_handles.clone(),
            quiz_list_handles: quiz_list_handles.clone(),
        },
    );

    ViewHarness {
        dom,
        backend,
        quiz_handles,
        quiz_list_handles,
    }
}
