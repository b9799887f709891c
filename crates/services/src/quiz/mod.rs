mod progress;
mod service;
mod session;

// Public API of the quiz subsystem.
pub use crate::error::QuizError;
pub use progress::QuizProgress;
pub use service::QuizSessionService;
pub use session::{QuizSession, QuizState};
