use std::sync::Arc;

use quiz_core::model::{RankingRecord, ScoreSummary, rank};
use storage::repository::{KeyValueStore, StorageError};

/// Key holding the JSON-encoded ranking list.
pub const RANKING_KEY: &str = "ranking_list";

/// Append-only leaderboard persisted under [`RANKING_KEY`].
///
/// Writers take `&mut self` so a single owner serializes appends.
#[derive(Clone)]
pub struct RankingService {
    values: Arc<dyn KeyValueStore>,
}

impl RankingService {
    #[must_use]
    pub fn new(values: Arc<dyn KeyValueStore>) -> Self {
        Self { values }
    }

    /// All records in insertion order.
    ///
    /// Missing, unreadable or corrupt storage yields an empty list.
    pub async fn list(&self) -> Vec<RankingRecord> {
        match self.values.get(RANKING_KEY).await {
            Ok(stored) => decode(stored.as_deref()),
            Err(err) => {
                log::warn!("ranking list could not be read, treating as empty: {err}");
                Vec::new()
            }
        }
    }

    /// Records in leaderboard order.
    pub async fn ranked(&self) -> Vec<RankingRecord> {
        rank(self.list().await)
    }

    /// Append a record for a finished session.
    ///
    /// Returns `Ok(false)` without writing when the session had no questions.
    /// A corrupt stored list is replaced; an unreadable one is left untouched.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the current list cannot be read, or the updated
    /// list cannot be encoded or written.
    pub async fn record(
        &mut self,
        summary: &ScoreSummary,
        nickname: Option<&str>,
        timestamp: i64,
    ) -> Result<bool, StorageError> {
        let Some(record) = RankingRecord::from_summary(summary, nickname, timestamp) else {
            log::debug!("skipping ranking record for empty session");
            return Ok(false);
        };

        let mut records = decode(self.values.get(RANKING_KEY).await?.as_deref());
        records.push(record);
        let text = serde_json::to_string(&records)
            .map_err(|e| StorageError::Serialization(e.to_string()))?;
        self.values.set(RANKING_KEY, &text).await?;
        Ok(true)
    }

    /// Delete every record.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the list cannot be removed.
    pub async fn clear(&mut self) -> Result<(), StorageError> {
        self.values.remove(RANKING_KEY).await
    }
}

/// Absent text is an empty list; so is text that does not parse.
fn decode(stored: Option<&str>) -> Vec<RankingRecord> {
    let Some(text) = stored else {
        return Vec::new();
    };
    serde_json::from_str(text).unwrap_or_else(|err| {
        log::warn!("ranking list is corrupt, treating as empty: {err}");
        Vec::new()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::FlakyReads;
    use storage::repository::InMemoryRepository;

    fn service() -> (InMemoryRepository, RankingService) {
        let repo = InMemoryRepository::new();
        let svc = RankingService::new(Arc::new(repo.clone()));
        (repo, svc)
    }

    fn summary(total: usize, correct: usize) -> ScoreSummary {
        ScoreSummary::from_counts("Capitals", total, correct).unwrap()
    }

    #[tokio::test]
    async fn records_append_and_rank() {
        let (_repo, mut svc) = service();
        assert!(svc.record(&summary(10, 9), Some("ana"), 100).await.unwrap());
        assert!(svc.record(&summary(10, 9), Some("bo"), 200).await.unwrap());
        assert!(svc.record(&summary(10, 10), None, 50).await.unwrap());

        let listed = svc.list().await;
        assert_eq!(listed.len(), 3);
        assert_eq!(listed[0].nickname.as_deref(), Some("ana"));

        let ranked = svc.ranked().await;
        let order: Vec<_> = ranked.iter().map(|r| r.timestamp).collect();
        assert_eq!(order, vec![50, 200, 100]);
    }

    #[tokio::test]
    async fn empty_sessions_are_not_recorded() {
        let (repo, mut svc) = service();
        assert!(!svc.record(&summary(0, 0), Some("ana"), 1).await.unwrap());
        assert_eq!(repo.get(RANKING_KEY).await.unwrap(), None);
    }

    #[tokio::test]
    async fn corrupt_storage_reads_as_empty() {
        let (repo, mut svc) = service();
        repo.set(RANKING_KEY, "{definitely not a list").await.unwrap();
        assert!(svc.list().await.is_empty());

        assert!(svc.record(&summary(3, 2), None, 7).await.unwrap());
        assert_eq!(svc.list().await.len(), 1);
    }

    #[tokio::test]
    async fn clear_removes_everything() {
        let (_repo, mut svc) = service();
        svc.record(&summary(3, 3), None, 1).await.unwrap();
        svc.clear().await.unwrap();
        assert!(svc.list().await.is_empty());
    }

    #[tokio::test]
    async fn persisted_json_uses_record_shape() {
        let (repo, mut svc) = service();
        svc.record(&summary(3, 2), Some("kim"), 42).await.unwrap();
        let text = repo.get(RANKING_KEY).await.unwrap().unwrap();
        let value: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(value[0]["nickname"], "kim");
        assert_eq!(value[0]["topic"], "Capitals");
        assert_eq!(value[0]["score"], 67);
        assert_eq!(value[0]["correctCount"], 2);
        assert_eq!(value[0]["totalQuestions"], 3);
        assert_eq!(value[0]["timestamp"], 42);
    }

    #[tokio::test]
    async fn unreadable_list_is_never_overwritten() {
        let store = Arc::new(FlakyReads::default());
        let mut svc = RankingService::new(store.clone());
        for ts in 1..=3 {
            svc.record(&summary(3, 2), None, ts).await.unwrap();
        }

        store.fail_next_reads(1);
        let err = svc.record(&summary(3, 3), None, 4).await.unwrap_err();
        assert!(matches!(err, StorageError::Connection(_)));
        assert_eq!(svc.list().await.len(), 3);

        assert!(svc.record(&summary(3, 3), None, 5).await.unwrap());
        assert_eq!(svc.list().await.len(), 4);
    }
}
