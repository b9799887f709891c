use dioxus::prelude::*;
use services::{CatalogError, QuizError};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ViewError {
    Unknown,
    /// The quiz is missing or has no questions.
    NoQuiz,
    /// The backend could not be reached or returned unusable data.
    LoadFailed,
    GenerateFailed,
    Incomplete { remaining: usize },
    /// A submission is already in flight.
    Submitting,
    SubmitFailed,
    AlreadySubmitted,
}

impl ViewError {
    #[must_use]
    pub fn message(&self) -> String {
        match self {
            Self::Unknown => "Something went wrong. Please try again.".to_string(),
            Self::NoQuiz => "No quiz available.".to_string(),
            Self::LoadFailed => "Failed to load quizzes. Please try again.".to_string(),
            Self::GenerateFailed => "Failed to generate quiz. Please try again.".to_string(),
            Self::Incomplete { remaining: 1 } => {
                "Answer the remaining question before submitting.".to_string()
            }
            Self::Incomplete { remaining } => {
                format!("Answer the remaining {remaining} questions before submitting.")
            }
            Self::Submitting => "Your answers are being submitted.".to_string(),
            Self::SubmitFailed => "Could not submit your answers. Please try again.".to_string(),
            Self::AlreadySubmitted => "This quiz has already been submitted.".to_string(),
        }
    }
}

impl From<&QuizError> for ViewError {
    fn from(err: &QuizError) -> Self {
        match err {
            QuizError::NoQuestions => Self::NoQuiz,
            QuizError::Incomplete { unanswered } => Self::Incomplete {
                remaining: unanswered.len(),
            },
            QuizError::Submission(_) => Self::SubmitFailed,
            QuizError::AlreadySubmitted => Self::AlreadySubmitted,
            QuizError::SubmissionInFlight => Self::Submitting,
            err if err.is_load_error() => Self::LoadFailed,
            _ => Self::Unknown,
        }
    }
}

impl From<QuizError> for ViewError {
    fn from(err: QuizError) -> Self {
        Self::from(&err)
    }
}

impl From<CatalogError> for ViewError {
    fn from(_err: CatalogError) -> Self {
        Self::LoadFailed
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum ViewState<T> {
    Idle,
    Loading,
    Ready(T),
    Error(ViewError),
}

#[must_use]
pub fn view_state_from_resource<T: Clone>(
    resource: &Resource<Result<T, ViewError>>,
) -> ViewState<T> {
    match resource.state().cloned() {
        UseResourceState::Pending => ViewState::Loading,
        UseResourceState::Ready => match resource.value().read().as_ref() {
            Some(Ok(data)) => ViewState::Ready(data.clone()),
            Some(Err(err)) => ViewState::Error(*err),
            None => ViewState::Error(ViewError::Unknown),
        },
        UseResourceState::Paused | UseResourceState::Stopped => ViewState::Idle,
    }
}
