//! Key-value stores that fail on demand.

use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use storage::repository::{InMemoryRepository, KeyValueStore, StorageError};

fn disk_gone() -> StorageError {
    StorageError::Connection("disk gone".into())
}

/// Delegates to an in-memory repository, failing the next `n` reads when asked.
#[derive(Default)]
pub(crate) struct FlakyReads {
    pub(crate) inner: InMemoryRepository,
    failing_reads: AtomicUsize,
}

impl FlakyReads {
    pub(crate) fn fail_next_reads(&self, n: usize) {
        self.failing_reads.store(n, Ordering::SeqCst);
    }
}

#[async_trait]
impl KeyValueStore for FlakyReads {
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let failing = self
            .failing_reads
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1));
        if failing.is_ok() {
            return Err(disk_gone());
        }
        self.inner.get(key).await
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.inner.set(key, value).await
    }

    async fn remove(&self, key: &str) -> Result<(), StorageError> {
        self.inner.remove(key).await
    }
}

/// Every operation fails.
pub(crate) struct BrokenStore;

#[async_trait]
impl KeyValueStore for BrokenStore {
    async fn get(&self, _key: &str) -> Result<Option<String>, StorageError> {
        Err(disk_gone())
    }

    async fn set(&self, _key: &str, _value: &str) -> Result<(), StorageError> {
        Err(disk_gone())
    }

    async fn remove(&self, _key: &str) -> Result<(), StorageError> {
        Err(disk_gone())
    }
}
