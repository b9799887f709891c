use std::sync::Arc;

use client::QuizCatalog;
use study_core::model::{NoteId, NoteSummary, QuizId, QuizStats, QuizSummary};
use tracing::{info, instrument, warn};

use crate::error::CatalogError;

/// A note together with how many quizzes were generated from it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoteOverview {
    pub note: NoteSummary,
    pub quiz_count: usize,
}

/// Browses the quizzes generated for a note.
#[derive(Clone)]
pub struct QuizCatalogService {
    catalog: Arc<dyn QuizCatalog>,
}

impl QuizCatalogService {
    #[must_use]
    pub fn new(catalog: Arc<dyn QuizCatalog>) -> Self {
        Self { catalog }
    }

    /// # Errors
    ///
    /// Returns `CatalogError` on backend failures.
    pub async fn list_notes(&self) -> Result<Vec<NoteSummary>, CatalogError> {
        Ok(self.catalog.list_notes().await?)
    }

    /// Notes that have at least one quiz, with their quiz counts.
    ///
    /// A note whose quizzes cannot be listed is counted as having none.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError` when the notes themselves cannot be listed.
    #[instrument(skip(self))]
    pub async fn overview(&self) -> Result<Vec<NoteOverview>, CatalogError> {
        let notes = self.catalog.list_notes().await?;
        let mut overview = Vec::with_capacity(notes.len());
        for note in notes {
            let quiz_count = match self.catalog.list_quizzes(note.note_id).await {
                Ok(quizzes) => quizzes.len(),
                Err(err) => {
                    warn!(note_id = %note.note_id, error = %err, "failed to count quizzes");
                    0
                }
            };
            if quiz_count > 0 {
                overview.push(NoteOverview { note, quiz_count });
            }
        }
        info!(notes = overview.len(), "quiz overview loaded");
        Ok(overview)
    }

    /// Quizzes for a note, in backend order.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError` on backend failures.
    pub async fn list_quizzes(&self, note_id: NoteId) -> Result<Vec<QuizSummary>, CatalogError> {
        Ok(self.catalog.list_quizzes(note_id).await?)
    }

    /// Ask the backend to generate another quiz from a note.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError` on backend failures.
    #[instrument(skip(self))]
    pub async fn generate_quiz(&self, note_id: NoteId) -> Result<String, CatalogError> {
        let message = self.catalog.generate_quiz(note_id).await?;
        info!(%message, "quiz generation requested");
        Ok(message)
    }

    /// # Errors
    ///
    /// Returns `CatalogError` on backend failures.
    pub async fn quiz_stats(&self, quiz_id: QuizId) -> Result<QuizStats, CatalogError> {
        Ok(self.catalog.quiz_stats(quiz_id).await?)
    }
}
