use chrono::{DateTime, Utc};

use crate::model::{NoteId, QuizId};

/// A note that quizzes can be generated from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoteSummary {
    pub note_id: NoteId,
    pub title: String,
    pub notebook_title: Option<String>,
}

/// A quiz listed under a note, without its questions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuizSummary {
    pub quiz_id: QuizId,
    pub note_id: NoteId,
    pub created_at: Option<DateTime<Utc>>,
    pub question_count: usize,
}

/// Attempt statistics the backend keeps per quiz.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct QuizStats {
    pub attempts: u32,
    pub average_score: f64,
    pub best_score: f64,
    pub last_score: f64,
}

impl QuizStats {
    #[must_use]
    pub fn has_attempts(&self) -> bool {
        self.attempts > 0
    }
}
