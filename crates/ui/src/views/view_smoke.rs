use std::sync::Arc;

use tokio::sync::Notify;

use super::QuizIntent;
use super::test_harness::{
    NOTE_ID, QUIZ_ID, ScriptedSink, ViewHarness, ViewKind, seeded_backend, setup_view_harness,
    setup_view_harness_with_sink,
};

fn answer_both(harness: &ViewHarness) {
    let dispatch = harness.quiz_handles.dispatch();
    dispatch.call(QuizIntent::Select(0));
    dispatch.call(QuizIntent::Next);
    dispatch.call(QuizIntent::Select(1));
}

#[tokio::test(flavor = "current_thread")]
async fn overview_smoke_lists_notes_with_quizzes() {
    let mut harness = setup_view_harness(ViewKind::Overview);
    harness.rebuild();
    harness.settle().await;

    let html = harness.render();
    assert!(html.contains("Quizzes Overview"), "missing title in {html}");
    assert!(html.contains("Capitals"), "missing note in {html}");
    assert!(html.contains("Geography"), "missing notebook in {html}");
    assert!(html.contains("2 quizzes generated"), "missing count in {html}");
    assert!(html.contains("/note/1"), "missing note link in {html}");
    assert!(!html.contains("Rivers"), "note without quizzes listed in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn quiz_list_smoke_renders_cards() {
    let mut harness = setup_view_harness(ViewKind::QuizList(NOTE_ID.value()));
    harness.rebuild();
    harness.settle().await;

    let html = harness.render();
    assert!(html.contains("Quizzes for note 1"), "missing title in {html}");
    assert!(html.contains("Quiz #7"), "missing quiz 7 in {html}");
    assert!(html.contains("2 questions"), "missing count in {html}");
    assert!(html.contains("Take Quiz"), "missing link in {html}");
    assert!(html.contains("No attempts yet"), "missing stats in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn quiz_view_smoke_renders_first_question() {
    let mut harness = setup_view_harness(ViewKind::Quiz(QUIZ_ID.value()));
    harness.rebuild();
    harness.settle().await;

    let html = harness.render();
    assert!(html.contains("Question 1 of 2"), "missing position in {html}");
    assert!(html.contains("Capital of France?"), "missing question in {html}");
    assert!(html.contains("A. Paris"), "missing option in {html}");
    assert!(html.contains("D. Rome"), "missing option in {html}");
    assert!(html.contains("Exit Quiz"), "missing exit in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn quiz_view_smoke_reports_missing_quiz() {
    for quiz_id in [8, 99] {
        let mut harness = setup_view_harness(ViewKind::Quiz(quiz_id));
        harness.rebuild();
        harness.settle().await;

        let html = harness.render();
        assert!(html.contains("No quiz available."), "missing message in {html}");
        assert!(html.contains("Back to quizzes"), "missing link in {html}");
    }
}

#[tokio::test(flavor = "current_thread")]
async fn quiz_view_blocks_incomplete_submit() {
    let mut harness = setup_view_harness(ViewKind::Quiz(QUIZ_ID.value()));
    harness.rebuild();
    harness.settle().await;

    let dispatch = harness.quiz_handles.dispatch();
    dispatch.call(QuizIntent::Select(0));
    dispatch.call(QuizIntent::Submit);
    harness.settle().await;

    let html = harness.render();
    assert!(
        html.contains("Answer the remaining question before submitting."),
        "missing incomplete message in {html}"
    );
    assert!(harness.backend.attempts(QUIZ_ID).unwrap().is_empty());
    let vm = harness.quiz_handles.vm();
    assert!(vm.read().as_ref().is_some_and(|vm| !vm.is_submitted()));
}

#[tokio::test(flavor = "current_thread")]
async fn quiz_view_submits_and_shows_review() {
    let mut harness = setup_view_harness(ViewKind::Quiz(QUIZ_ID.value()));
    harness.rebuild();
    harness.settle().await;

    let dispatch = harness.quiz_handles.dispatch();
    dispatch.call(QuizIntent::Select(0));
    dispatch.call(QuizIntent::Next);
    dispatch.call(QuizIntent::Select(1));
    dispatch.call(QuizIntent::Submit);
    harness.settle().await;

    let html = harness.render();
    assert!(html.contains("Your score: 50%"), "missing score in {html}");
    assert!(html.contains("Keep practicing!"), "missing verdict in {html}");
    assert!(html.contains("1 of 2 correct"), "missing local score in {html}");
    assert!(html.contains("review-option wrong"), "missing wrong mark in {html}");
    assert_eq!(harness.backend.attempts(QUIZ_ID).unwrap(), vec![50]);

    dispatch.call(QuizIntent::Submit);
    harness.settle().await;
    assert_eq!(harness.backend.attempts(QUIZ_ID).unwrap().len(), 1);
}

#[tokio::test(flavor = "current_thread")]
async fn quiz_list_generate_ignores_repeat_clicks() {
    let mut harness = setup_view_harness(ViewKind::QuizList(NOTE_ID.value()));
    harness.rebuild();
    harness.settle().await;

    let generate = harness.quiz_list_handles.generate();
    let generating = harness.quiz_list_handles.generating();
    generate.call(());
    assert!(generating(), "flag must be set before the request runs");
    generate.call(());
    harness.settle().await;

    assert!(!generating());
    let html = harness.render();
    assert!(
        html.contains("Failed to generate quiz. Please try again."),
        "missing notice in {html}"
    );
}

#[tokio::test(flavor = "current_thread")]
async fn quiz_view_sends_one_attempt_for_back_to_back_submits() {
    let gate = Arc::new(Notify::new());
    let backend = seeded_backend();
    let sink = Arc::new(ScriptedSink::gated(backend.clone(), Arc::clone(&gate)));
    let mut harness =
        setup_view_harness_with_sink(ViewKind::Quiz(QUIZ_ID.value()), backend, sink.clone());
    harness.rebuild();
    harness.settle().await;

    answer_both(&harness);
    let dispatch = harness.quiz_handles.dispatch();
    dispatch.call(QuizIntent::Submit);
    dispatch.call(QuizIntent::Submit);
    harness.settle().await;

    let html = harness.render();
    assert!(html.contains("Submitting..."), "missing pending label in {html}");
    assert!(html.contains("Capital of Germany?"), "question hidden in {html}");
    assert_eq!(sink.calls(), 1);

    dispatch.call(QuizIntent::Submit);
    harness.settle().await;
    assert_eq!(sink.calls(), 1);

    gate.notify_one();
    harness.settle().await;

    let html = harness.render();
    assert!(html.contains("Your score: 50%"), "missing score in {html}");
    assert_eq!(harness.backend.attempts(QUIZ_ID).unwrap().len(), 1);
    assert_eq!(sink.calls(), 1);
}

#[tokio::test(flavor = "current_thread")]
async fn quiz_view_keeps_answers_after_failed_submit() {
    let backend = seeded_backend();
    let sink = Arc::new(ScriptedSink::failing(backend.clone(), 1));
    let mut harness =
        setup_view_harness_with_sink(ViewKind::Quiz(QUIZ_ID.value()), backend, sink.clone());
    harness.rebuild();
    harness.settle().await;

    answer_both(&harness);
    let dispatch = harness.quiz_handles.dispatch();
    dispatch.call(QuizIntent::Submit);
    harness.settle().await;

    let html = harness.render();
    assert!(
        html.contains("Could not submit your answers. Please try again."),
        "missing failure message in {html}"
    );
    assert!(html.contains("2 of 2 answered"), "answers lost in {html}");
    assert!(harness.backend.attempts(QUIZ_ID).unwrap().is_empty());

    dispatch.call(QuizIntent::Submit);
    harness.settle().await;

    let html = harness.render();
    assert!(html.contains("Your score: 50%"), "missing score in {html}");
    assert!(!html.contains("Could not submit"), "stale error in {html}");
    assert_eq!(harness.backend.attempts(QUIZ_ID).unwrap(), vec![50]);
    assert_eq!(sink.calls(), 2);
}

#[tokio::test(flavor = "current_thread")]
async fn quiz_view_exit_discards_attempt() {
    let mut harness = setup_view_harness(ViewKind::Quiz(QUIZ_ID.value()));
    harness.rebuild();
    harness.settle().await;

    let dispatch = harness.quiz_handles.dispatch();
    dispatch.call(QuizIntent::Select(0));
    dispatch.call(QuizIntent::Exit);
    harness.settle().await;

    let vm = harness.quiz_handles.vm();
    assert!(vm.read().is_none());
    assert!(harness.backend.attempts(QUIZ_ID).unwrap().is_empty());
}
