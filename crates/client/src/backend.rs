use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use study_core::model::{
    NoteId, NoteSummary, OptionLetter, Question, QuestionError, QuizId, QuizStats, QuizSummary,
    percent_of,
};
use thiserror::Error;

/// Errors surfaced by backend adapters.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ClientError {
    #[error("not found")]
    NotFound,

    #[error("backend responded with status {0}")]
    HttpStatus(reqwest::StatusCode),

    #[error(transparent)]
    Http(#[from] reqwest::Error),

    #[error("could not decode response: {0}")]
    Decode(String),

    /// The backend accepted the attempt but its reply could not be read.
    /// Resending would record the attempt twice.
    #[error("attempt was recorded but the reply could not be read: {0}")]
    UnreadableReceipt(String),

    #[error("question {index} is malformed: {source}")]
    InvalidQuestion {
        index: usize,
        #[source]
        source: QuestionError,
    },

    #[error("backend unavailable: {0}")]
    Unavailable(String),
}

/// Ordered answers for one quiz attempt, as sent to the backend.
///
/// One entry per question in question order; unanswered slots are `""` so
/// positions never shift.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Submission {
    pub quiz_id: QuizId,
    pub answers: Vec<String>,
}

impl Submission {
    #[must_use]
    pub fn from_slots(quiz_id: QuizId, slots: &[Option<OptionLetter>]) -> Self {
        let answers = slots
            .iter()
            .map(|slot| slot.map(OptionLetter::as_str).unwrap_or_default().to_string())
            .collect();
        Self { quiz_id, answers }
    }
}

/// What the backend returns for an accepted attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubmissionReceipt {
    /// Authoritative percentage, 0–100.
    pub score: u8,
    /// Number of correct answers, when the backend reports it.
    pub correct: Option<u32>,
}

/// Supplies the questions of a quiz.
#[async_trait]
pub trait QuizSource: Send + Sync {
    /// Fetch the ordered questions of a quiz.
    ///
    /// # Errors
    ///
    /// Returns `ClientError::NotFound` if the quiz does not exist, or other
    /// client errors when the backend is unreachable or returns malformed data.
    async fn fetch_questions(&self, quiz_id: QuizId) -> Result<Vec<Question>, ClientError>;
}

/// Accepts finished attempts and scores them.
#[async_trait]
pub trait SubmissionSink: Send + Sync {
    /// Submit an attempt and return the backend's score.
    ///
    /// # Errors
    ///
    /// Returns `ClientError` if the attempt could not be delivered or scored.
    /// `ClientError::UnreadableReceipt` means it was delivered and must not be
    /// resent.
    async fn submit_answers(
        &self,
        submission: &Submission,
    ) -> Result<SubmissionReceipt, ClientError>;
}

/// Quizzes generated per note, plus attempt statistics.
#[async_trait]
pub trait QuizCatalog: Send + Sync {
    /// List the notes quizzes can be generated from.
    ///
    /// # Errors
    ///
    /// Returns `ClientError` on backend failures.
    async fn list_notes(&self) -> Result<Vec<NoteSummary>, ClientError>;

    /// List the quizzes generated for a note.
    ///
    /// # Errors
    ///
    /// Returns `ClientError` on backend failures.
    async fn list_quizzes(&self, note_id: NoteId) -> Result<Vec<QuizSummary>, ClientError>;

    /// Ask the backend to generate a new quiz from a note.
    ///
    /// # Errors
    ///
    /// Returns `ClientError` on backend failures.
    async fn generate_quiz(&self, note_id: NoteId) -> Result<String, ClientError>;

    /// Fetch attempt statistics for a quiz.
    ///
    /// # Errors
    ///
    /// Returns `ClientError::NotFound` if the quiz does not exist.
    async fn quiz_stats(&self, quiz_id: QuizId) -> Result<QuizStats, ClientError>;
}

#[derive(Debug, Clone)]
struct StoredQuiz {
    note_id: NoteId,
    created_at: Option<DateTime<Utc>>,
    questions: Vec<Question>,
}

/// In-memory backend for tests and offline prototyping.
///
/// Scores attempts the way the REST backend does: each answer is compared
/// against the stored correct letter.
#[derive(Clone, Default)]
pub struct InMemoryBackend {
    notes: Arc<Mutex<HashMap<NoteId, NoteSummary>>>,
    quizzes: Arc<Mutex<HashMap<QuizId, StoredQuiz>>>,
    attempts: Arc<Mutex<HashMap<QuizId, Vec<u8>>>>,
}

impl InMemoryBackend {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a note.
    ///
    /// # Errors
    ///
    /// Returns `ClientError::Unavailable` if the store lock is poisoned.
    pub fn insert_note(
        &self,
        note_id: NoteId,
        title: impl Into<String>,
        notebook_title: Option<String>,
    ) -> Result<(), ClientError> {
        let mut guard = self
            .notes
            .lock()
            .map_err(|e| ClientError::Unavailable(e.to_string()))?;
        guard.insert(
            note_id,
            NoteSummary {
                note_id,
                title: title.into(),
                notebook_title,
            },
        );
        Ok(())
    }

    /// Store a quiz under a note.
    ///
    /// # Errors
    ///
    /// Returns `ClientError::Unavailable` if the store lock is poisoned.
    pub fn insert_quiz(
        &self,
        quiz_id: QuizId,
        note_id: NoteId,
        created_at: Option<DateTime<Utc>>,
        questions: Vec<Question>,
    ) -> Result<(), ClientError> {
        let mut guard = self
            .quizzes
            .lock()
            .map_err(|e| ClientError::Unavailable(e.to_string()))?;
        guard.insert(
            quiz_id,
            StoredQuiz {
                note_id,
                created_at,
                questions,
            },
        );
        Ok(())
    }

    /// Scores recorded for a quiz, oldest first.
    ///
    /// # Errors
    ///
    /// Returns `ClientError::Unavailable` if the store lock is poisoned.
    pub fn attempts(&self, quiz_id: QuizId) -> Result<Vec<u8>, ClientError> {
        let guard = self
            .attempts
            .lock()
            .map_err(|e| ClientError::Unavailable(e.to_string()))?;
        Ok(guard.get(&quiz_id).cloned().unwrap_or_default())
    }
}

#[async_trait]
impl QuizSource for InMemoryBackend {
    async fn fetch_questions(&self, quiz_id: QuizId) -> Result<Vec<Question>, ClientError> {
        let guard = self
            .quizzes
            .lock()
            .map_err(|e| ClientError::Unavailable(e.to_string()))?;
        guard
            .get(&quiz_id)
            .map(|quiz| quiz.questions.clone())
            .ok_or(ClientError::NotFound)
    }
}

#[async_trait]
impl SubmissionSink for InMemoryBackend {
    async fn submit_answers(
        &self,
        submission: &Submission,
    ) -> Result<SubmissionReceipt, ClientError> {
        let questions = {
            let guard = self
                .quizzes
                .lock()
                .map_err(|e| ClientError::Unavailable(e.to_string()))?;
            guard
                .get(&submission.quiz_id)
                .map(|quiz| quiz.questions.clone())
                .ok_or(ClientError::NotFound)?
        };

        let correct = questions
            .iter()
            .zip(&submission.answers)
            .filter(|(question, answer)| question.matches_answer(answer))
            .count();
        let score = percent_of(correct, questions.len());

        let mut guard = self
            .attempts
            .lock()
            .map_err(|e| ClientError::Unavailable(e.to_string()))?;
        guard.entry(submission.quiz_id).or_default().push(score);

        Ok(SubmissionReceipt {
            score,
            correct: u32::try_from(correct).ok(),
        })
    }
}

#[async_trait]
impl QuizCatalog for InMemoryBackend {
    async fn list_notes(&self) -> Result<Vec<NoteSummary>, ClientError> {
        let guard = self
            .notes
            .lock()
            .map_err(|e| ClientError::Unavailable(e.to_string()))?;
        let mut notes: Vec<NoteSummary> = guard.values().cloned().collect();
        notes.sort_by_key(|note| note.note_id);
        Ok(notes)
    }

    async fn list_quizzes(&self, note_id: NoteId) -> Result<Vec<QuizSummary>, ClientError> {
        let guard = self
            .quizzes
            .lock()
            .map_err(|e| ClientError::Unavailable(e.to_string()))?;
        let mut found: Vec<QuizSummary> = guard
            .iter()
            .filter(|(_, quiz)| quiz.note_id == note_id)
            .map(|(quiz_id, quiz)| QuizSummary {
                quiz_id: *quiz_id,
                note_id,
                created_at: quiz.created_at,
                question_count: quiz.questions.len(),
            })
            .collect();
        found.sort_by(|left, right| right.quiz_id.cmp(&left.quiz_id));
        Ok(found)
    }

    async fn generate_quiz(&self, _note_id: NoteId) -> Result<String, ClientError> {
        Err(ClientError::Unavailable(
            "quiz generation needs the REST backend".into(),
        ))
    }

    async fn quiz_stats(&self, quiz_id: QuizId) -> Result<QuizStats, ClientError> {
        let known = self
            .quizzes
            .lock()
            .map_err(|e| ClientError::Unavailable(e.to_string()))?
            .contains_key(&quiz_id);
        if !known {
            return Err(ClientError::NotFound);
        }

        let scores = self.attempts(quiz_id)?;
        let attempts = u32::try_from(scores.len()).unwrap_or(u32::MAX);
        let total: f64 = scores.iter().copied().map(f64::from).sum();
        let average_score = if scores.is_empty() {
            0.0
        } else {
            total / f64::from(attempts)
        };
        Ok(QuizStats {
            attempts,
            average_score,
            best_score: scores.iter().copied().max().map_or(0.0, f64::from),
            last_score: scores.last().copied().map_or(0.0, f64::from),
        })
    }
}

/// Bundles the collaborator traits behind trait objects for easy backend swapping.
#[derive(Clone)]
pub struct Backend {
    pub quizzes: Arc<dyn QuizSource>,
    pub submissions: Arc<dyn SubmissionSink>,
    pub catalog: Arc<dyn QuizCatalog>,
}

impl Backend {
    #[must_use]
    pub fn in_memory() -> Self {
        Self::from_in_memory(InMemoryBackend::new())
    }

    #[must_use]
    pub fn from_in_memory(repo: InMemoryBackend) -> Self {
        let quizzes: Arc<dyn QuizSource> = Arc::new(repo.clone());
        let submissions: Arc<dyn SubmissionSink> = Arc::new(repo.clone());
        let catalog: Arc<dyn QuizCatalog> = Arc::new(repo);
        Self {
            quizzes,
            submissions,
            catalog,
        }
    }
}
