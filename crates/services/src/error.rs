//! Shared error types for the services crate.

use thiserror::Error;

use quiz_core::model::TopicKey;
use quiz_core::session::SessionError;
use storage::question_store::QuestionStoreError;
use storage::sqlite::SqliteInitError;

/// Errors emitted by `QuizService` and `QuizFlow`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum QuizError {
    #[error("unknown topic `{0}`")]
    UnknownTopic(TopicKey),
    #[error("{command} is not available on the {screen} screen")]
    InvalidCommand {
        command: &'static str,
        screen: &'static str,
    },
    #[error(transparent)]
    Session(#[from] SessionError),
    #[error(transparent)]
    Questions(#[from] QuestionStoreError),
}

/// Errors emitted while bootstrapping app services.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AppServicesError {
    #[error(transparent)]
    Sqlite(#[from] SqliteInitError),
}
