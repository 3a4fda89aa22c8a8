use async_trait::async_trait;
use quiz_core::model::TopicKey;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use thiserror::Error;

/// Errors surfaced by storage adapters.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StorageError {
    #[error("not found")]
    NotFound,

    #[error("connection error: {0}")]
    Connection(String),

    #[error("serialization error: {0}")]
    Serialization(String),
}

/// Durable string values addressed by a name.
///
/// Rankings and the wrong-answer notebook each live under one key as JSON.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Read the value stored under `key`.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the backend cannot be read. A missing key is `Ok(None)`.
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Store `value` under `key`, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the value cannot be written.
    async fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Delete `key`. Deleting a missing key succeeds.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the backend cannot be written.
    async fn remove(&self, key: &str) -> Result<(), StorageError>;
}

/// Raw question text per topic.
#[async_trait]
pub trait QuestionSource: Send + Sync {
    /// Read the JSON text backing a topic.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::NotFound` if the topic has no backing source, or
    /// other storage errors.
    async fn read_topic(&self, key: &TopicKey) -> Result<String, StorageError>;
}

/// Simple in-memory repository implementation for testing and prototyping.
#[derive(Clone, Default)]
pub struct InMemoryRepository {
    values: Arc<Mutex<HashMap<String, String>>>,
    topics: Arc<Mutex<HashMap<TopicKey, String>>>,
}

impl InMemoryRepository {
    #[must_use]
    pub fn new() -> Self {
        Self {
            values: Arc::new(Mutex::new(HashMap::new())),
            topics: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Register the JSON text for a topic.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Connection` if the lock is poisoned.
    pub fn insert_topic(&self, key: TopicKey, json: impl Into<String>) -> Result<(), StorageError> {
        let mut guard = self
            .topics
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        guard.insert(key, json.into());
        Ok(())
    }
}

#[async_trait]
impl KeyValueStore for InMemoryRepository {
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let guard = self
            .values
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        Ok(guard.get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let mut guard = self
            .values
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        guard.insert(key.to_owned(), value.to_owned());
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<(), StorageError> {
        let mut guard = self
            .values
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        guard.remove(key);
        Ok(())
    }
}

#[async_trait]
impl QuestionSource for InMemoryRepository {
    async fn read_topic(&self, key: &TopicKey) -> Result<String, StorageError> {
        let guard = self
            .topics
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        guard.get(key).cloned().ok_or(StorageError::NotFound)
    }
}

/// Aggregates the storage seams behind trait objects for easy backend swapping.
#[derive(Clone)]
pub struct Storage {
    pub values: Arc<dyn KeyValueStore>,
    pub questions: Arc<dyn QuestionSource>,
}

impl Storage {
    #[must_use]
    pub fn in_memory() -> Self {
        Self::from_repository(InMemoryRepository::new())
    }

    /// Share one in-memory repository for both seams, keeping a handle for seeding.
    #[must_use]
    pub fn from_repository(repo: InMemoryRepository) -> Self {
        let values: Arc<dyn KeyValueStore> = Arc::new(repo.clone());
        let questions: Arc<dyn QuestionSource> = Arc::new(repo);
        Self { values, questions }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn values_round_trip_and_remove() {
        let repo = InMemoryRepository::new();
        assert_eq!(repo.get("ranking_list").await.unwrap(), None);

        repo.set("ranking_list", "[]").await.unwrap();
        repo.set("ranking_list", "[1]").await.unwrap();
        assert_eq!(repo.get("ranking_list").await.unwrap().as_deref(), Some("[1]"));

        repo.remove("ranking_list").await.unwrap();
        repo.remove("ranking_list").await.unwrap();
        assert_eq!(repo.get("ranking_list").await.unwrap(), None);
    }

    #[tokio::test]
    async fn unknown_topic_is_not_found() {
        let repo = InMemoryRepository::new();
        repo.insert_topic(TopicKey::new("capitals").unwrap(), "[]")
            .unwrap();

        let found = repo
            .read_topic(&TopicKey::new("capitals").unwrap())
            .await
            .unwrap();
        assert_eq!(found, "[]");

        let err = repo
            .read_topic(&TopicKey::new("idioms").unwrap())
            .await
            .unwrap_err();
        assert!(matches!(err, StorageError::NotFound));
    }

    #[test]
    fn storage_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Storage>();
    }
}
