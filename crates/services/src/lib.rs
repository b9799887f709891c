#![forbid(unsafe_code)]

pub mod catalog_service;
pub mod error;
pub mod quiz;

pub use study_core::Clock;

pub use catalog_service::{NoteOverview, QuizCatalogService};
pub use error::{CatalogError, QuizError};
pub use quiz::{QuizProgress, QuizSession, QuizSessionService, QuizState};
