//! JSON snapshot persistence.
//!
//! One file per day under the data directory:
//!
//! ```text
//! data/
//! └── company-news-2026-08-27.json
//! ```
//!
//! The next run for the same date overwrites the file; no history is kept
//! beyond whatever files are left on disk.

use crate::models::NewsSnapshot;
use chrono::{Local, NaiveDate};
use std::error::Error;
use tokio::fs;
use tracing::{info, instrument};

/// Path of the snapshot file for a given date.
pub fn snapshot_path(data_dir: &str, date: NaiveDate) -> String {
    format!("{}/company-news-{}.json", data_dir.trim_end_matches('/'), date)
}

/// Write a snapshot under the data directory, creating it if needed.
/// Returns the path written.
#[instrument(level = "info", skip_all, fields(data_dir = %data_dir))]
pub async fn write_snapshot(
    snapshot: &NewsSnapshot,
    data_dir: &str,
) -> Result<String, Box<dyn Error>> {
    fs::create_dir_all(data_dir).await?;

    let path = snapshot_path(data_dir, Local::now().date_naive());
    let json = serde_json::to_string_pretty(snapshot)?;
    fs::write(&path, json).await?;

    info!(path = %path, items = snapshot.news.len(), "Wrote snapshot");
    Ok(path)
}

/// Read the snapshot for a date (today when `date` is `None`).
#[instrument(level = "info", skip_all, fields(data_dir = %data_dir))]
pub async fn read_snapshot(
    data_dir: &str,
    date: Option<NaiveDate>,
) -> Result<NewsSnapshot, Box<dyn Error>> {
    let date = date.unwrap_or_else(|| Local::now().date_naive());
    let path = snapshot_path(data_dir, date);

    let raw = fs::read_to_string(&path)
        .await
        .map_err(|e| format!("cannot read snapshot {path}: {e}"))?;
    let snapshot: NewsSnapshot = serde_json::from_str(&raw)?;

    info!(path = %path, items = snapshot.news.len(), "Read snapshot");
    Ok(snapshot)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn empty_snapshot() -> NewsSnapshot {
        NewsSnapshot {
            date: "2026-08-27T09:00:00Z".to_string(),
            total_searched: 7,
            selected: 0,
            companies: vec!["GOOGL".to_string()],
            news: vec![],
        }
    }

    #[test]
    fn snapshot_path_shape() {
        let date = NaiveDate::from_ymd_opt(2026, 8, 27).unwrap();
        assert_eq!(
            snapshot_path("data", date),
            "data/company-news-2026-08-27.json"
        );
        assert_eq!(
            snapshot_path("data/", date),
            "data/company-news-2026-08-27.json"
        );
    }

    #[tokio::test]
    async fn write_then_read_round_trip() {
        let dir = std::env::temp_dir().join(format!("company_news_test_{}", std::process::id()));
        let dir = dir.to_str().unwrap().to_string();

        let path = write_snapshot(&empty_snapshot(), &dir).await.unwrap();
        assert!(path.ends_with(".json"));

        let read = read_snapshot(&dir, Some(Local::now().date_naive()))
            .await
            .unwrap();
        assert_eq!(read.total_searched, 7);
        assert_eq!(read.companies, vec!["GOOGL".to_string()]);

        let _ = tokio::fs::remove_dir_all(&dir).await;
    }

    #[tokio::test]
    async fn read_missing_snapshot_is_an_error() {
        let date = NaiveDate::from_ymd_opt(1999, 1, 1).unwrap();
        let result = read_snapshot("/nonexistent-dir", Some(date)).await;
        assert!(result.is_err());
    }
}
