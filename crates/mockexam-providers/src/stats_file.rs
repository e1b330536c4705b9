//! Stats store persisted as one JSON file holding every user's record.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use chrono::NaiveDate;
use tokio::sync::Mutex;

use mockexam_core::scoring::PracticeResults;
use mockexam_core::stats::UserStats;
use mockexam_core::traits::StatsStore;

use crate::error::StoreError;

/// JSON file store. A missing file reads as empty.
pub struct JsonStatsStore {
    path: PathBuf,
    // Serializes read-modify-write cycles within this process.
    lock: Mutex<()>,
}

impl JsonStatsStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn read_all(&self) -> Result<BTreeMap<String, UserStats>, StoreError> {
        let content = match tokio::fs::read_to_string(&self.path).await {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(BTreeMap::new()),
            Err(source) => {
                return Err(StoreError::Io {
                    path: self.path.clone(),
                    source,
                })
            }
        };
        serde_json::from_str(&content).map_err(|source| StoreError::Corrupt {
            path: self.path.clone(),
            source,
        })
    }

    async fn write_all(&self, records: &BTreeMap<String, UserStats>) -> Result<(), StoreError> {
        let io_err = |source| StoreError::Io {
            path: self.path.clone(),
            source,
        };
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await.map_err(io_err)?;
        }
        let json = serde_json::to_string_pretty(records).map_err(|source| StoreError::Corrupt {
            path: self.path.clone(),
            source,
        })?;

        // Replace atomically via a sibling temp file.
        let tmp = self.path.with_extension("json.tmp");
        tokio::fs::write(&tmp, json).await.map_err(io_err)?;
        tokio::fs::rename(&tmp, &self.path).await.map_err(io_err)?;
        Ok(())
    }
}

#[async_trait]
impl StatsStore for JsonStatsStore {
    async fn load(&self, user: &str) -> anyhow::Result<UserStats> {
        let records = self.read_all().await?;
        Ok(records.get(user).cloned().unwrap_or_default())
    }

    async fn merge(
        &self,
        user: &str,
        results: &PracticeResults,
        today: NaiveDate,
    ) -> anyhow::Result<UserStats> {
        let _guard = self.lock.lock().await;
        let mut records = self.read_all().await?;
        let stats = records.entry(user.to_string()).or_default();
        stats.merge(results, today);
        let updated = stats.clone();
        self.write_all(&records).await?;

        tracing::debug!(
            user,
            solved = updated.solved,
            attempts = updated.attempts,
            streak = updated.streak,
            "stats updated"
        );
        Ok(updated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn results(correct: u32) -> PracticeResults {
        PracticeResults {
            total_questions: 30,
            attempted: correct,
            correct,
            wrong: 0,
            unattempted: 30 - correct,
            score: 4 * i64::from(correct),
            time_taken_secs: 900,
        }
    }

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, d).unwrap()
    }

    #[tokio::test]
    async fn missing_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonStatsStore::new(dir.path().join("stats.json"));
        assert_eq!(store.load("anyone").await.unwrap(), UserStats::default());
    }

    #[tokio::test]
    async fn merge_persists_across_instances() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("stats.json");

        let store = JsonStatsStore::new(&path);
        store.merge("asha", &results(10), day(1)).await.unwrap();
        store.merge("asha", &results(5), day(2)).await.unwrap();
        store.merge("ravi", &results(1), day(2)).await.unwrap();

        let reopened = JsonStatsStore::new(&path);
        let asha = reopened.load("asha").await.unwrap();
        assert_eq!(asha.solved, 15);
        assert_eq!(asha.streak, 2);
        assert_eq!(asha.last_active, Some(day(2)));
        assert_eq!(reopened.load("ravi").await.unwrap().solved, 1);
        assert!(!path.with_extension("json.tmp").exists());
    }

    #[tokio::test]
    async fn corrupt_file_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("stats.json");
        std::fs::write(&path, "{not json").unwrap();

        let store = JsonStatsStore::new(&path);
        let err = store.merge("asha", &results(1), day(1)).await.unwrap_err();
        assert!(err.to_string().contains("corrupt"));
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "{not json");
    }
}
