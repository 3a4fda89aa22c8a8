use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use quiz_core::model::{TopicCatalog, TopicKey};

use crate::repository::{QuestionSource, StorageError};

/// Reads topic files from a directory, one JSON file per catalog topic.
#[derive(Debug, Clone)]
pub struct DirectoryQuestionSource {
    base_dir: PathBuf,
    catalog: TopicCatalog,
}

impl DirectoryQuestionSource {
    #[must_use]
    pub fn new(base_dir: impl Into<PathBuf>, catalog: TopicCatalog) -> Self {
        Self {
            base_dir: base_dir.into(),
            catalog,
        }
    }

    #[must_use]
    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    fn file_path(&self, key: &TopicKey) -> Option<PathBuf> {
        self.catalog
            .get(key)
            .map(|topic| self.base_dir.join(topic.file_name()))
    }
}

#[async_trait]
impl QuestionSource for DirectoryQuestionSource {
    async fn read_topic(&self, key: &TopicKey) -> Result<String, StorageError> {
        let path = self.file_path(key).ok_or(StorageError::NotFound)?;
        match tokio::fs::read_to_string(&path).await {
            Ok(text) => Ok(text),
            Err(err) if err.kind() == ErrorKind::NotFound => Err(StorageError::NotFound),
            Err(err) => Err(StorageError::Connection(format!(
                "{}: {err}",
                path.display()
            ))),
        }
    }
}
