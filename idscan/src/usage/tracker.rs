use std::sync::Arc;

use chrono::{DateTime, Datelike, NaiveDate, TimeZone, Utc};
use tokio::sync::Mutex;
use tracing::debug;

use crate::db::KeyValueStore;
use crate::error::Result;
use crate::models::UsageRecord;

pub const USAGE_KEY: &str = "idscan_vision_usage";
pub const RESET_KEY: &str = "idscan_vision_last_reset";

/// First instant (UTC) of the calendar month containing `now`.
pub fn month_start(now: DateTime<Utc>) -> DateTime<Utc> {
    NaiveDate::from_ymd_opt(now.year(), now.month(), 1)
        .and_then(|day| day.and_hms_opt(0, 0, 0))
        .map(|start| Utc.from_utc_datetime(&start))
        .unwrap_or(now)
}

pub struct UsageTracker {
    store: Arc<dyn KeyValueStore>,
    // Serializes read-modify-write cycles within this process.
    lock: Mutex<()>,
}

impl UsageTracker {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self {
            store,
            lock: Mutex::new(()),
        }
    }

    /// Usage for the current calendar month, resetting a stale counter first.
    pub async fn current_usage(&self) -> Result<u64> {
        self.current_usage_at(Utc::now()).await
    }

    pub async fn current_usage_at(&self, now: DateTime<Utc>) -> Result<u64> {
        let _guard = self.lock.lock().await;
        Ok(self.load(now).await?.count)
    }

    /// Count one successful online call. Returns the new count.
    pub async fn record_usage(&self) -> Result<u64> {
        self.record_usage_at(Utc::now()).await
    }

    pub async fn record_usage_at(&self, now: DateTime<Utc>) -> Result<u64> {
        let _guard = self.lock.lock().await;
        let record = self.load(now).await?;
        let count = record.count.saturating_add(1);
        self.store.set(USAGE_KEY, &count.to_string()).await?;
        debug!(count, "Recorded online OCR usage");
        Ok(count)
    }

    pub async fn snapshot(&self) -> Result<UsageRecord> {
        self.snapshot_at(Utc::now()).await
    }

    pub async fn snapshot_at(&self, now: DateTime<Utc>) -> Result<UsageRecord> {
        let _guard = self.lock.lock().await;
        self.load(now).await
    }

    /// Read the stored record, zeroing it when the stored period predates the
    /// month of `now`. Caller must hold `lock`.
    async fn load(&self, now: DateTime<Utc>) -> Result<UsageRecord> {
        let period_start = month_start(now);
        let period_start_ms = period_start.timestamp_millis();

        let last_reset = parse_or_zero::<i64>(self.store.get(RESET_KEY).await?);
        if last_reset < period_start_ms {
            self.store.set(USAGE_KEY, "0").await?;
            self.store
                .set(RESET_KEY, &period_start_ms.to_string())
                .await?;
            debug!(%period_start, "Reset monthly OCR usage counter");
            return Ok(UsageRecord {
                count: 0,
                period_start,
            });
        }

        let stored_start = Utc
            .timestamp_millis_opt(last_reset)
            .single()
            .unwrap_or(period_start);

        Ok(UsageRecord {
            count: parse_or_zero(self.store.get(USAGE_KEY).await?),
            period_start: stored_start,
        })
    }
}

fn parse_or_zero<T: std::str::FromStr + Default>(value: Option<String>) -> T {
    value
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::InMemoryBackend;

    fn at(year: i32, month: u32, day: u32, hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(year, month, day, hour, 0, 0).unwrap()
    }

    fn tracker_with(store: Arc<InMemoryBackend>) -> UsageTracker {
        UsageTracker::new(store)
    }

    #[test]
    fn test_month_start() {
        assert_eq!(month_start(at(2024, 2, 29, 23)), at(2024, 2, 1, 0));
        assert_eq!(month_start(at(2024, 12, 1, 0)), at(2024, 12, 1, 0));
    }

    #[tokio::test]
    async fn test_fresh_store_reads_zero_and_stamps_period() {
        let store = Arc::new(InMemoryBackend::new());
        let tracker = tracker_with(store.clone());

        let now = at(2024, 5, 17, 10);
        assert_eq!(tracker.current_usage_at(now).await.unwrap(), 0);
        assert_eq!(
            store.get(RESET_KEY).await.unwrap(),
            Some(at(2024, 5, 1, 0).timestamp_millis().to_string())
        );
        assert_eq!(store.get(USAGE_KEY).await.unwrap().as_deref(), Some("0"));
    }

    #[tokio::test]
    async fn test_record_usage_increments_within_month() {
        let store = Arc::new(InMemoryBackend::new());
        let tracker = tracker_with(store);

        let now = at(2024, 5, 17, 10);
        assert_eq!(tracker.record_usage_at(now).await.unwrap(), 1);
        assert_eq!(tracker.record_usage_at(now).await.unwrap(), 2);
        assert_eq!(tracker.current_usage_at(at(2024, 5, 31, 23)).await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_rollover_resets_on_read() {
        let store = Arc::new(InMemoryBackend::with_entries([
            (USAGE_KEY, "998".to_string()),
            (RESET_KEY, at(2024, 4, 1, 0).timestamp_millis().to_string()),
        ]));
        let tracker = tracker_with(store.clone());

        assert_eq!(tracker.current_usage_at(at(2024, 4, 30, 23)).await.unwrap(), 998);
        assert_eq!(tracker.current_usage_at(at(2024, 5, 1, 0)).await.unwrap(), 0);
        assert_eq!(
            store.get(RESET_KEY).await.unwrap(),
            Some(at(2024, 5, 1, 0).timestamp_millis().to_string())
        );
    }

    #[tokio::test]
    async fn test_rollover_resets_before_increment() {
        let store = Arc::new(InMemoryBackend::with_entries([
            (USAGE_KEY, "500".to_string()),
            (RESET_KEY, at(2024, 4, 1, 0).timestamp_millis().to_string()),
        ]));
        let tracker = tracker_with(store);

        assert_eq!(tracker.record_usage_at(at(2024, 5, 2, 8)).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_reset_happens_once_per_month() {
        let store = Arc::new(InMemoryBackend::with_entries([
            (USAGE_KEY, "7".to_string()),
            (RESET_KEY, at(2024, 4, 1, 0).timestamp_millis().to_string()),
        ]));
        let tracker = tracker_with(store);

        assert_eq!(tracker.current_usage_at(at(2024, 5, 3, 0)).await.unwrap(), 0);
        tracker.record_usage_at(at(2024, 5, 3, 1)).await.unwrap();
        tracker.record_usage_at(at(2024, 5, 20, 1)).await.unwrap();
        assert_eq!(tracker.current_usage_at(at(2024, 5, 31, 0)).await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_garbage_values_read_as_zero() {
        let store = Arc::new(InMemoryBackend::with_entries([
            (USAGE_KEY, "lots"),
            (RESET_KEY, "yesterday"),
        ]));
        let tracker = tracker_with(store);

        assert_eq!(tracker.current_usage_at(at(2024, 5, 3, 0)).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_snapshot_reports_period_start() {
        let store = Arc::new(InMemoryBackend::new());
        let tracker = tracker_with(store);

        tracker.record_usage_at(at(2024, 7, 9, 12)).await.unwrap();
        let record = tracker.snapshot_at(at(2024, 7, 10, 12)).await.unwrap();
        assert_eq!(
            record,
            UsageRecord {
                count: 1,
                period_start: at(2024, 7, 1, 0),
            }
        );
    }

    #[tokio::test]
    async fn test_concurrent_increments_are_not_lost() {
        let store = Arc::new(InMemoryBackend::new());
        let tracker = Arc::new(tracker_with(store));
        let now = at(2024, 6, 15, 9);

        let handles: Vec<_> = (0..20)
            .map(|_| {
                let tracker = Arc::clone(&tracker);
                tokio::spawn(async move { tracker.record_usage_at(now).await })
            })
            .collect();
        for handle in handles {
            handle.await.unwrap().unwrap();
        }

        assert_eq!(tracker.current_usage_at(now).await.unwrap(), 20);
    }
}
