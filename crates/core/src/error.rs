use thiserror::Error;

use crate::model::{QuestionError, ScoreSummaryError, TopicKeyError};
use crate::session::SessionError;

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Question(#[from] QuestionError),
    #[error(transparent)]
    TopicKey(#[from] TopicKeyError),
    #[error(transparent)]
    Summary(#[from] ScoreSummaryError),
    #[error(transparent)]
    Session(#[from] SessionError),
}
