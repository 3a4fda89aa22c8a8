use std::sync::Arc;

use quiz_core::model::{Question, TopicKey};
use thiserror::Error;

use crate::records::QuestionRecord;
use crate::repository::{QuestionSource, StorageError};

/// Errors emitted while loading a topic's questions.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum QuestionStoreError {
    #[error("no questions for topic `{0}`")]
    NotFound(TopicKey),

    #[error("malformed question source: {0}")]
    DataFormat(String),

    #[error(transparent)]
    Storage(StorageError),
}

/// Parse a topic's JSON text into questions, in source order.
///
/// # Errors
///
/// Returns `QuestionStoreError::DataFormat` if the text is not an array of
/// question objects or any record is invalid.
pub fn parse_questions(text: &str) -> Result<Vec<Question>, QuestionStoreError> {
    let records: Vec<QuestionRecord> =
        serde_json::from_str(text).map_err(|e| QuestionStoreError::DataFormat(e.to_string()))?;

    records
        .into_iter()
        .enumerate()
        .map(|(i, record)| {
            if record.option_count() < 2 {
                log::warn!("question record {i} has fewer than two options");
            }
            record
                .into_question()
                .map_err(|e| QuestionStoreError::DataFormat(format!("record {i}: {e}")))
        })
        .collect()
}

/// Loads ordered question lists for topics from a `QuestionSource`.
#[derive(Clone)]
pub struct QuestionStore {
    source: Arc<dyn QuestionSource>,
}

impl QuestionStore {
    #[must_use]
    pub fn new(source: Arc<dyn QuestionSource>) -> Self {
        Self { source }
    }

    /// Load the questions for a topic.
    ///
    /// # Errors
    ///
    /// Returns `QuestionStoreError::NotFound` if the topic has no source,
    /// `QuestionStoreError::DataFormat` if the source is malformed, or
    /// `QuestionStoreError::Storage` for other read failures.
    pub async fn load(&self, key: &TopicKey) -> Result<Vec<Question>, QuestionStoreError> {
        let text = match self.source.read_topic(key).await {
            Ok(text) => text,
            Err(StorageError::NotFound) => return Err(QuestionStoreError::NotFound(key.clone())),
            Err(err) => return Err(QuestionStoreError::Storage(err)),
        };
        let questions = parse_questions(&text)?;
        log::debug!("loaded {} questions for topic {key}", questions.len());
        Ok(questions)
    }
}
