mod ids;
mod question;
mod quiz;
mod review;
mod score;

pub use ids::{NoteId, ParseIdError, QuizId};

pub use question::{LetterError, MAX_OPTIONS, OptionLetter, Question, QuestionError};
pub use quiz::{NoteSummary, QuizStats, QuizSummary};
pub use review::QuestionReview;
pub use score::{LocalScore, ScoreResult, percent_of};
