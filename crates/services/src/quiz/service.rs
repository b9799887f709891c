use std::sync::Arc;

use client::{ClientError, QuizSource, SubmissionSink};
use study_core::model::{QuizId, ScoreResult};
use tracing::{info, instrument, warn};

use super::session::QuizSession;
use crate::Clock;
use crate::error::QuizError;

/// Orchestrates loading, submitting and abandoning quiz attempts.
#[derive(Clone)]
pub struct QuizSessionService {
    clock: Clock,
    source: Arc<dyn QuizSource>,
    sink: Arc<dyn SubmissionSink>,
}

impl QuizSessionService {
    #[must_use]
    pub fn new(clock: Clock, source: Arc<dyn QuizSource>, sink: Arc<dyn SubmissionSink>) -> Self {
        Self {
            clock,
            source,
            sink,
        }
    }

    /// Load a quiz and open a session on its first question.
    ///
    /// # Errors
    ///
    /// Returns `QuizError::NoQuestions` when the quiz is missing or empty, and
    /// `QuizError::Load` when the source is unreachable or returns bad data.
    #[instrument(skip(self))]
    pub async fn start(&self, quiz_id: QuizId) -> Result<QuizSession, QuizError> {
        let questions = match self.source.fetch_questions(quiz_id).await {
            Ok(questions) => questions,
            Err(ClientError::NotFound) => return Err(QuizError::NoQuestions),
            Err(err) => {
                warn!(error = %err, "failed to load quiz");
                return Err(QuizError::Load(err));
            }
        };

        let session = QuizSession::new(quiz_id, questions, self.clock.now())?;
        info!(questions = session.question_count(), "quiz session started");
        Ok(session)
    }

    /// Send the answers and store the backend's score on the session.
    ///
    /// Nothing is sent when the session is incomplete, already submitted, or
    /// already has a submission in flight. When the backend cannot be reached
    /// the session stays in progress so the user may retry. When the backend
    /// stored the attempt but its reply is unreadable, the session is frozen
    /// with a local, non-authoritative score so the attempt is never resent.
    ///
    /// # Errors
    ///
    /// Returns the validation errors of [`QuizSession::begin_submission`] or
    /// `QuizError::Submission` when the sink fails.
    #[instrument(skip(self, session), fields(quiz_id = %session.quiz_id()))]
    pub async fn submit(&self, session: &mut QuizSession) -> Result<ScoreResult, QuizError> {
        let submission = session.begin_submission()?;

        let receipt = match self.sink.submit_answers(&submission).await {
            Ok(receipt) => receipt,
            Err(ClientError::UnreadableReceipt(detail)) => {
                warn!(%detail, "attempt recorded without a readable score; using local score");
                let result = session.complete_unscored(self.clock.now())?;
                info!(score = result.score, "quiz submitted");
                return Ok(result);
            }
            Err(err) => {
                session.abort_submission();
                warn!(error = %err, "quiz submission failed");
                return Err(QuizError::Submission(err));
            }
        };

        let result = session.complete_submission(receipt, self.clock.now())?;
        if !result.agrees() {
            warn!(
                server = result.score,
                local = result.local.percent,
                "backend score differs from local correctness"
            );
        }
        info!(score = result.score, "quiz submitted");
        Ok(result)
    }

    /// Exit a quiz without submitting. Answers are discarded.
    #[instrument(skip(self, session), fields(quiz_id = %session.quiz_id()))]
    pub fn abandon(&self, session: QuizSession) {
        info!(
            answered = session.answered_count(),
            submitted = session.is_submitted(),
            "quiz session abandoned"
        );
        drop(session);
    }
}
