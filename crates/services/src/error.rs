//! Shared error types for the services crate.

use thiserror::Error;

use client::ClientError;

/// Errors emitted by the quiz session engine.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum QuizError {
    #[error("could not load quiz: {0}")]
    Load(#[source] ClientError),
    #[error("no quiz available")]
    NoQuestions,
    #[error("option {index} does not exist for this question")]
    InvalidOption { index: usize },
    #[error("{} question(s) left unanswered", .unanswered.len())]
    Incomplete { unanswered: Vec<usize> },
    #[error("quiz already submitted")]
    AlreadySubmitted,
    #[error("a submission is already in progress")]
    SubmissionInFlight,
    #[error("quiz has not been submitted yet")]
    NotSubmitted,
    #[error("could not submit quiz: {0}")]
    Submission(#[source] ClientError),
}

/// Errors emitted by `QuizCatalogService`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum CatalogError {
    #[error(transparent)]
    Client(#[from] ClientError),
}

impl QuizError {
    /// True for failures that prevented a session from being created.
    ///
    /// `NoQuestions` is included; callers that tell it apart check it first.
    #[must_use]
    pub fn is_load_error(&self) -> bool {
        matches!(self, Self::Load(_) | Self::NoQuestions)
    }
}
