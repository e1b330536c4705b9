//! In-memory supply and stats store, for tests and embedding.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::NaiveDate;

use mockexam_core::model::{Question, QuestionBank, Subject};
use mockexam_core::scoring::PracticeResults;
use mockexam_core::stats::UserStats;
use mockexam_core::traits::{QuestionSupply, StatsStore, SupplyRequest};

use crate::error::StoreError;
use crate::pool::BankPool;

/// Question supply over banks held in memory.
pub struct InMemoryQuestionSupply {
    pool: BankPool,
}

impl InMemoryQuestionSupply {
    pub fn new(banks: Vec<QuestionBank>) -> Self {
        Self {
            pool: BankPool::new(banks),
        }
    }
}

#[async_trait]
impl QuestionSupply for InMemoryQuestionSupply {
    fn name(&self) -> &str {
        "memory"
    }

    async fn fetch(&self, request: &SupplyRequest) -> anyhow::Result<Vec<Question>> {
        Ok(self.pool.draw(request)?)
    }

    async fn subjects(&self) -> anyhow::Result<Vec<Subject>> {
        Ok(self.pool.subjects())
    }
}

/// Stats store backed by a map. Can be built to fail every merge.
pub struct InMemoryStatsStore {
    records: Mutex<HashMap<String, UserStats>>,
    fail_merges: bool,
    merge_count: AtomicU32,
}

impl InMemoryStatsStore {
    pub fn new() -> Self {
        Self {
            records: Mutex::new(HashMap::new()),
            fail_merges: false,
            merge_count: AtomicU32::new(0),
        }
    }

    /// A store whose `merge` always errors.
    pub fn failing() -> Self {
        Self {
            fail_merges: true,
            ..Self::new()
        }
    }

    /// Number of merge calls received, successful or not.
    pub fn merge_count(&self) -> u32 {
        self.merge_count.load(Ordering::Relaxed)
    }

    /// Synchronous snapshot of a user's record.
    pub fn load_now(&self, user: &str) -> UserStats {
        self.records
            .lock()
            .map(|records| records.get(user).cloned().unwrap_or_default())
            .unwrap_or_default()
    }
}

impl Default for InMemoryStatsStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl StatsStore for InMemoryStatsStore {
    async fn load(&self, user: &str) -> anyhow::Result<UserStats> {
        Ok(self.load_now(user))
    }

    async fn merge(
        &self,
        user: &str,
        results: &PracticeResults,
        today: NaiveDate,
    ) -> anyhow::Result<UserStats> {
        self.merge_count.fetch_add(1, Ordering::Relaxed);
        if self.fail_merges {
            return Err(StoreError::Unavailable("in-memory store set to fail".into()).into());
        }

        let mut records = self
            .records
            .lock()
            .map_err(|_| StoreError::Unavailable("stats lock poisoned".into()))?;
        let stats = records.entry(user.to_string()).or_default();
        stats.merge(results, today);
        Ok(stats.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn results(correct: u32, wrong: u32) -> PracticeResults {
        PracticeResults {
            total_questions: 10,
            attempted: correct + wrong,
            correct,
            wrong,
            unattempted: 10 - correct - wrong,
            score: 4 * i64::from(correct) - i64::from(wrong),
            time_taken_secs: 100,
        }
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 10).unwrap()
    }

    #[tokio::test]
    async fn merges_are_per_user() {
        let store = InMemoryStatsStore::new();
        store.merge("a", &results(3, 1), today()).await.unwrap();
        store.merge("a", &results(2, 0), today()).await.unwrap();
        store.merge("b", &results(1, 1), today()).await.unwrap();

        let a = store.load("a").await.unwrap();
        assert_eq!(a.solved, 5);
        assert_eq!(a.attempts, 6);
        assert_eq!(store.load("b").await.unwrap().solved, 1);
        assert_eq!(store.load("nobody").await.unwrap(), UserStats::default());
        assert_eq!(store.merge_count(), 3);
    }

    #[tokio::test]
    async fn failing_store_errors_and_keeps_nothing() {
        let store = InMemoryStatsStore::failing();
        assert!(store.merge("a", &results(3, 1), today()).await.is_err());
        assert_eq!(store.merge_count(), 1);
        assert_eq!(store.load_now("a"), UserStats::default());
    }
}
