use crate::model::{OptionLetter, Question};

/// Percentage of `correct` out of `total`, rounded half up.
///
/// An empty quiz scores 0.
#[must_use]
pub fn percent_of(correct: usize, total: usize) -> u8 {
    if total == 0 {
        return 0;
    }
    let correct = correct.min(total);
    let rounded = (correct * 200 + total) / (total * 2);
    u8::try_from(rounded).unwrap_or(100)
}

/// Correctness computed on the client from the loaded questions.
///
/// Used to highlight answers in review. It is advisory: the score shown to the
/// user comes from the backend and may differ if the data drifted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LocalScore {
    pub correct: usize,
    pub total: usize,
    pub percent: u8,
}

impl LocalScore {
    /// Score answer slots aligned with `questions` by index.
    ///
    /// Missing trailing slots count as unanswered.
    #[must_use]
    pub fn from_slots(questions: &[Question], answers: &[Option<OptionLetter>]) -> Self {
        let correct = questions
            .iter()
            .enumerate()
            .filter(|(index, question)| question.is_correct(answers.get(*index).copied().flatten()))
            .count();
        let total = questions.len();
        Self {
            correct,
            total,
            percent: percent_of(correct, total),
        }
    }
}

/// Outcome of a successful submission.
///
/// `score` is the backend's authoritative percentage; `local` is recomputed on
/// the client. The two are kept apart and never assumed equal.
///
/// When the backend recorded the attempt but its reply could not be read,
/// `score` falls back to the local percentage and `authoritative` is false.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScoreResult {
    pub score: u8,
    pub local: LocalScore,
    pub authoritative: bool,
}

impl ScoreResult {
    #[must_use]
    pub fn new(score: u8, local: LocalScore) -> Self {
        Self {
            score: score.min(100),
            local,
            authoritative: true,
        }
    }

    /// A result scored on the client only.
    #[must_use]
    pub fn local_only(local: LocalScore) -> Self {
        Self {
            score: local.percent,
            local,
            authoritative: false,
        }
    }

    /// Whether the backend score matches the local recomputation.
    #[must_use]
    pub fn agrees(&self) -> bool {
        self.score == self.local.percent
    }
}
