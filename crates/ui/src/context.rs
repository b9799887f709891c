use std::sync::Arc;

use services::{QuizCatalogService, QuizSessionService};
use study_core::model::NoteId;

pub trait UiApp: Send + Sync {
    /// Note opened from the top bar; the overview lists the rest.
    fn current_note_id(&self) -> NoteId;

    fn quiz_sessions(&self) -> Arc<QuizSessionService>;
    fn quiz_catalog(&self) -> Arc<QuizCatalogService>;
}

#[derive(Clone)]
pub struct AppContext {
    current_note_id: NoteId,
    quiz_sessions: Arc<QuizSessionService>,
    quiz_catalog: Arc<QuizCatalogService>,
}

impl AppContext {
    #[must_use]
    pub fn new(app: &Arc<dyn UiApp>) -> Self {
        Self {
            current_note_id: app.current_note_id(),
            quiz_sessions: app.quiz_sessions(),
            quiz_catalog: app.quiz_catalog(),
        }
    }

    #[must_use]
    pub fn current_note_id(&self) -> NoteId {
        self.current_note_id
    }

    #[must_use]
    pub fn quiz_sessions(&self) -> Arc<QuizSessionService> {
        Arc::clone(&self.quiz_sessions)
    }

    #[must_use]
    pub fn quiz_catalog(&self) -> Arc<QuizCatalogService> {
        Arc::clone(&self.quiz_catalog)
    }
}

// Provided by the composition root in `crates/app`.

#[must_use]
pub fn build_app_context(app: &Arc<dyn UiApp>) -> AppContext {
    AppContext::new(app)
}
