use services::{QuizSession, QuizSessionService, QuizState};
use study_core::model::{OptionLetter, QuestionReview, QuizId, ScoreResult};

use crate::views::ViewError;

/// Scores at or above this percentage count as a pass.
pub const PASS_MARK: u8 = 70;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OptionVm {
    pub index: usize,
    pub letter: char,
    pub label: String,
    pub selected: bool,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct QuestionVm {
    pub number_label: String,
    pub progress_label: String,
    pub answered_label: String,
    pub text: String,
    pub options: Vec<OptionVm>,
    pub can_go_back: bool,
    pub can_go_forward: bool,
    pub can_submit: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ReviewMark {
    Correct,
    WrongSelection,
    Neutral,
}

impl ReviewMark {
    #[must_use]
    pub fn class(self) -> &'static str {
        match self {
            Self::Correct => "review-option correct",
            Self::WrongSelection => "review-option wrong",
            Self::Neutral => "review-option",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ReviewOptionVm {
    pub label: String,
    pub mark: ReviewMark,
    pub selected: bool,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ReviewRowVm {
    pub number_label: String,
    pub text: String,
    pub is_correct: bool,
    pub options: Vec<ReviewOptionVm>,
}

impl From<&QuestionReview> for ReviewRowVm {
    fn from(review: &QuestionReview) -> Self {
        let options = review
            .options
            .iter()
            .enumerate()
            .filter_map(|(index, label)| {
                let letter = OptionLetter::from_index(index)?;
                let mark = if letter == review.correct {
                    ReviewMark::Correct
                } else if review.is_wrong_selection(letter) {
                    ReviewMark::WrongSelection
                } else {
                    ReviewMark::Neutral
                };
                Some(ReviewOptionVm {
                    label: label.clone(),
                    mark,
                    selected: review.selected == Some(letter),
                })
            })
            .collect();

        Self {
            number_label: format!("Question {}", review.index + 1),
            text: review.question.clone(),
            is_correct: review.is_correct,
            options,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct QuizResultVm {
    pub score: u8,
    pub score_label: String,
    pub passed: bool,
    pub verdict: &'static str,
    pub local_label: String,
    /// Shown when the score was computed locally because the backend reply
    /// was unreadable.
    pub score_note: Option<&'static str>,
    pub rows: Vec<ReviewRowVm>,
}

impl QuizResultVm {
    fn build(result: ScoreResult, reviews: &[QuestionReview]) -> Self {
        let passed = result.score >= PASS_MARK;
        Self {
            score: result.score,
            score_label: format!("{}%", result.score),
            passed,
            verdict: if passed {
                "Great job!"
            } else {
                "Keep practicing!"
            },
            local_label: format!(
                "{} of {} correct",
                result.local.correct, result.local.total
            ),
            score_note: (!result.authoritative)
                .then_some("Your answers were saved, but the server score could not be read."),
            rows: reviews.iter().map(ReviewRowVm::from).collect(),
        }
    }
}

/// View model for one quiz attempt.
#[derive(Debug)]
pub struct QuizVm {
    session: QuizSession,
}

impl QuizVm {
    #[must_use]
    pub fn new(session: QuizSession) -> Self {
        Self { session }
    }

    #[must_use]
    pub fn quiz_id(&self) -> QuizId {
        self.session.quiz_id()
    }

    #[must_use]
    pub fn state(&self) -> QuizState {
        self.session.state()
    }

    #[must_use]
    pub fn is_submitted(&self) -> bool {
        self.session.is_submitted()
    }

    #[must_use]
    pub fn question(&self) -> QuestionVm {
        let progress = self.session.progress();
        let question = self.session.current_question();
        let selected = self.session.current_answer();
        let options = question
            .letters()
            .filter_map(|letter| {
                let label = question.display_option(letter.index())?;
                Some(OptionVm {
                    index: letter.index(),
                    letter: letter.as_char(),
                    label,
                    selected: selected == Some(letter),
                })
            })
            .collect();

        let editable = self.session.state() == QuizState::InProgress;
        QuestionVm {
            number_label: format!("Question {} of {}", progress.current + 1, progress.total),
            progress_label: format!("{} / {}", progress.current + 1, progress.total),
            answered_label: format!("{} of {} answered", progress.answered, progress.total),
            text: question.text().to_string(),
            options,
            can_go_back: !self.session.is_first(),
            can_go_forward: !self.session.is_last(),
            can_submit: editable && progress.is_complete,
        }
    }

    /// # Errors
    ///
    /// Returns `ViewError` when the quiz is no longer editable.
    pub fn select(&mut self, index: usize) -> Result<(), ViewError> {
        self.session.select_option(index)?;
        Ok(())
    }

    pub fn next(&mut self) -> bool {
        self.session.next()
    }

    pub fn previous(&mut self) -> bool {
        self.session.previous()
    }

    /// Submit through the service. A failed submit leaves the quiz editable.
    ///
    /// # Errors
    ///
    /// Returns `ViewError` for incomplete, duplicate or failed submissions.
    pub async fn submit(&mut self, service: &QuizSessionService) -> Result<(), ViewError> {
        service.submit(&mut self.session).await?;
        Ok(())
    }

    /// Score and per-question review, once submitted.
    #[must_use]
    pub fn result(&self) -> Option<QuizResultVm> {
        let result = self.session.result()?;
        let reviews = self.session.review().ok()?;
        Some(QuizResultVm::build(result, &reviews))
    }

    pub fn exit(self, service: &QuizSessionService) {
        service.abandon(self.session);
    }
}

/// Load a quiz and wrap it for display.
///
/// # Errors
///
/// Returns `ViewError::NoQuiz` if the quiz is missing or empty.
pub async fn start_quiz(service: &QuizSessionService, quiz_id: QuizId) -> Result<QuizVm, ViewError> {
    let session = service.start(quiz_id).await?;
    Ok(QuizVm::new(session))
}
