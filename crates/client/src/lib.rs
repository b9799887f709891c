#![forbid(unsafe_code)]

pub mod backend;
pub mod http;

pub use backend::{
    Backend, ClientError, InMemoryBackend, QuizCatalog, QuizSource, Submission,
    SubmissionReceipt, SubmissionSink,
};
pub use http::{ApiConfig, HttpBackend, HttpInitError};
