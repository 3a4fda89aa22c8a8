use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use super::ScoreSummary;

/// One leaderboard entry, written once per finished session.
///
/// Serialized with camelCase keys; the persisted ranking list is a JSON array
/// of these.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RankingRecord {
    #[serde(default)]
    pub nickname: Option<String>,
    pub topic: String,
    pub score: u32,
    pub correct_count: u32,
    pub total_questions: u32,
    /// Epoch milliseconds.
    pub timestamp: i64,
}

impl RankingRecord {
    /// Build a record for a finished session.
    ///
    /// Returns `None` for a session with no questions; those never rank.
    /// A blank nickname is stored as `None`.
    #[must_use]
    pub fn from_summary(
        summary: &ScoreSummary,
        nickname: Option<&str>,
        timestamp: i64,
    ) -> Option<Self> {
        if summary.total_questions() == 0 {
            return None;
        }
        let nickname = nickname
            .map(str::trim)
            .filter(|n| !n.is_empty())
            .map(str::to_owned);

        Some(Self {
            nickname,
            topic: summary.topic().to_owned(),
            score: summary.score(),
            correct_count: summary.correct_count(),
            total_questions: summary.total_questions(),
            timestamp,
        })
    }
}

/// Leaderboard order: higher score, then more correct answers, then most recent.
#[must_use]
pub fn ranking_order(a: &RankingRecord, b: &RankingRecord) -> Ordering {
    b.score
        .cmp(&a.score)
        .then_with(|| b.correct_count.cmp(&a.correct_count))
        .then_with(|| b.timestamp.cmp(&a.timestamp))
}

/// Sort records into leaderboard order. Full ties keep their input order.
#[must_use]
pub fn rank(records: impl IntoIterator<Item = RankingRecord>) -> Vec<RankingRecord> {
    let mut ranked: Vec<RankingRecord> = records.into_iter().collect();
    ranked.sort_by(ranking_order);
    ranked
}
