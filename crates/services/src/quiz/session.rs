use chrono::{DateTime, Utc};
use std::fmt;

use client::{Submission, SubmissionReceipt};
use study_core::model::{LocalScore, OptionLetter, Question, QuestionReview, QuizId, ScoreResult};

use super::progress::QuizProgress;
use crate::error::QuizError;

/// Where a quiz attempt stands.
///
/// "Not started" is the absence of a session, and abandoning consumes it, so
/// neither needs a variant here.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuizState {
    InProgress,
    /// A submission has been sent and no answer has come back yet.
    Submitting,
    Submitted,
}

//
// ─── SESSION ───────────────────────────────────────────────────────────────────
//

/// In-memory attempt at one quiz.
///
/// Walks the questions with a cursor, keeps one answer slot per question and
/// freezes the answers once the backend has scored them.
pub struct QuizSession {
    quiz_id: QuizId,
    questions: Vec<Question>,
    current: usize,
    answers: Vec<Option<OptionLetter>>,
    state: QuizState,
    result: Option<ScoreResult>,
    started_at: DateTime<Utc>,
    submitted_at: Option<DateTime<Utc>>,
}

impl QuizSession {
    /// Create a session positioned on the first question with no answers.
    ///
    /// # Errors
    ///
    /// Returns `QuizError::NoQuestions` if `questions` is empty.
    pub fn new(
        quiz_id: QuizId,
        questions: Vec<Question>,
        started_at: DateTime<Utc>,
    ) -> Result<Self, QuizError> {
        if questions.is_empty() {
            return Err(QuizError::NoQuestions);
        }

        Ok(Self {
            quiz_id,
            answers: vec![None; questions.len()],
            questions,
            current: 0,
            state: QuizState::InProgress,
            result: None,
            started_at,
            submitted_at: None,
        })
    }

    #[must_use]
    pub fn quiz_id(&self) -> QuizId {
        self.quiz_id
    }

    #[must_use]
    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    #[must_use]
    pub fn question_count(&self) -> usize {
        self.questions.len()
    }

    #[must_use]
    pub fn current_index(&self) -> usize {
        self.current
    }

    #[must_use]
    pub fn current_question(&self) -> &Question {
        &self.questions[self.current]
    }

    /// Answer recorded for the question at `index`, if any.
    #[must_use]
    pub fn answer(&self, index: usize) -> Option<OptionLetter> {
        self.answers.get(index).copied().flatten()
    }

    #[must_use]
    pub fn current_answer(&self) -> Option<OptionLetter> {
        self.answer(self.current)
    }

    #[must_use]
    pub fn answers(&self) -> &[Option<OptionLetter>] {
        &self.answers
    }

    #[must_use]
    pub fn state(&self) -> QuizState {
        self.state
    }

    #[must_use]
    pub fn is_submitted(&self) -> bool {
        self.state == QuizState::Submitted
    }

    #[must_use]
    pub fn is_submitting(&self) -> bool {
        self.state == QuizState::Submitting
    }

    #[must_use]
    pub fn result(&self) -> Option<ScoreResult> {
        self.result
    }

    #[must_use]
    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    #[must_use]
    pub fn submitted_at(&self) -> Option<DateTime<Utc>> {
        self.submitted_at
    }

    #[must_use]
    pub fn is_first(&self) -> bool {
        self.current == 0
    }

    #[must_use]
    pub fn is_last(&self) -> bool {
        self.current + 1 == self.questions.len()
    }

    /// Indices of questions without an answer, in order.
    #[must_use]
    pub fn unanswered(&self) -> Vec<usize> {
        self.answers
            .iter()
            .enumerate()
            .filter_map(|(index, slot)| slot.is_none().then_some(index))
            .collect()
    }

    #[must_use]
    pub fn answered_count(&self) -> usize {
        self.answers.iter().filter(|slot| slot.is_some()).count()
    }

    #[must_use]
    pub fn progress(&self) -> QuizProgress {
        QuizProgress {
            total: self.question_count(),
            answered: self.answered_count(),
            current: self.current,
            is_complete: self.answered_count() == self.question_count(),
        }
    }

    /// Record `letter` for the current question, replacing any earlier answer.
    ///
    /// # Errors
    ///
    /// Returns `QuizError::AlreadySubmitted` after submission,
    /// `QuizError::SubmissionInFlight` while a submission is outstanding, and
    /// `QuizError::InvalidOption` if the question has no such option.
    pub fn select_answer(&mut self, letter: OptionLetter) -> Result<(), QuizError> {
        self.ensure_editable()?;
        if !self.current_question().has_option(letter) {
            return Err(QuizError::InvalidOption {
                index: letter.index(),
            });
        }
        self.answers[self.current] = Some(letter);
        Ok(())
    }

    /// Record the option at `index` (0 is `A`) for the current question.
    ///
    /// # Errors
    ///
    /// Same as [`QuizSession::select_answer`].
    pub fn select_option(&mut self, index: usize) -> Result<OptionLetter, QuizError> {
        let letter = OptionLetter::from_index(index).ok_or(QuizError::InvalidOption { index })?;
        self.select_answer(letter)?;
        Ok(letter)
    }

    /// Move to the next question. Returns `false` on the last question.
    pub fn next(&mut self) -> bool {
        if self.is_last() {
            return false;
        }
        self.current += 1;
        true
    }

    /// Move to the previous question. Returns `false` on the first question.
    pub fn previous(&mut self) -> bool {
        if self.is_first() {
            return false;
        }
        self.current -= 1;
        true
    }

    /// Jump to `index`, clamped to the last question. Returns the new position.
    pub fn go_to(&mut self, index: usize) -> usize {
        self.current = index.min(self.questions.len() - 1);
        self.current
    }

    fn ensure_editable(&self) -> Result<(), QuizError> {
        match self.state {
            QuizState::InProgress => Ok(()),
            QuizState::Submitting => Err(QuizError::SubmissionInFlight),
            QuizState::Submitted => Err(QuizError::AlreadySubmitted),
        }
    }

    /// Validate the attempt and mark it as in flight.
    ///
    /// The returned payload carries one answer per question in order. Until
    /// [`QuizSession::complete_submission`] or [`QuizSession::abort_submission`]
    /// is called, further submits and answer changes are rejected.
    ///
    /// # Errors
    ///
    /// Returns `QuizError::AlreadySubmitted`, `QuizError::SubmissionInFlight`,
    /// or `QuizError::Incomplete` listing the unanswered questions.
    pub fn begin_submission(&mut self) -> Result<Submission, QuizError> {
        self.ensure_editable()?;
        let unanswered = self.unanswered();
        if !unanswered.is_empty() {
            return Err(QuizError::Incomplete { unanswered });
        }

        self.state = QuizState::Submitting;
        Ok(Submission::from_slots(self.quiz_id, &self.answers))
    }

    /// Store the backend's score and freeze the session.
    ///
    /// # Errors
    ///
    /// Returns `QuizError::AlreadySubmitted` if the session was already
    /// finalized, or `QuizError::NotSubmitted` if no submission was begun.
    pub fn complete_submission(
        &mut self,
        receipt: SubmissionReceipt,
        submitted_at: DateTime<Utc>,
    ) -> Result<ScoreResult, QuizError> {
        let result = ScoreResult::new(receipt.score, self.local_score());
        self.finalize(result, submitted_at)
    }

    /// Freeze a session whose attempt was delivered but never scored by the
    /// backend. The result carries the local score and is not authoritative.
    ///
    /// # Errors
    ///
    /// Same as [`QuizSession::complete_submission`].
    pub fn complete_unscored(
        &mut self,
        submitted_at: DateTime<Utc>,
    ) -> Result<ScoreResult, QuizError> {
        let result = ScoreResult::local_only(self.local_score());
        self.finalize(result, submitted_at)
    }

    fn finalize(
        &mut self,
        result: ScoreResult,
        submitted_at: DateTime<Utc>,
    ) -> Result<ScoreResult, QuizError> {
        match self.state {
            QuizState::Submitting => {}
            QuizState::Submitted => return Err(QuizError::AlreadySubmitted),
            QuizState::InProgress => return Err(QuizError::NotSubmitted),
        }

        self.state = QuizState::Submitted;
        self.result = Some(result);
        self.submitted_at = Some(submitted_at);
        Ok(result)
    }

    /// Return to `InProgress` after a failed submission so the user can retry.
    pub fn abort_submission(&mut self) {
        if self.state == QuizState::Submitting {
            self.state = QuizState::InProgress;
        }
    }

    /// Correctness computed from the loaded questions, independent of the backend.
    #[must_use]
    pub fn local_score(&self) -> LocalScore {
        LocalScore::from_slots(&self.questions, &self.answers)
    }

    /// Per-question feedback.
    ///
    /// # Errors
    ///
    /// Returns `QuizError::NotSubmitted` before the quiz has been submitted.
    pub fn review(&self) -> Result<Vec<QuestionReview>, QuizError> {
        if !self.is_submitted() {
            return Err(QuizError::NotSubmitted);
        }
        Ok(self
            .questions
            .iter()
            .enumerate()
            .map(|(index, question)| QuestionReview::build(index, question, self.answer(index)))
            .collect())
    }
}

impl fmt::Debug for QuizSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QuizSession")
            .field("quiz_id", &self.quiz_id)
            .field("questions_len", &self.questions.len())
            .field("current", &self.current)
            .field("answered", &self.answered_count())
            .field("state", &self.state)
            .field("result", &self.result)
            .field("started_at", &self.started_at)
            .field("submitted_at", &self.submitted_at)
            .finish_non_exhaustive()
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
