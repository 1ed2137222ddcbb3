use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Online OCR usage for one calendar month.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct UsageRecord {
    pub count: u64,
    pub period_start: DateTime<Utc>,
}

/// Usage measured against the monthly online limit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuotaStatus {
    pub used: u64,
    pub limit: u64,
    pub remaining: u64,
    pub period_start: DateTime<Utc>,
}

impl QuotaStatus {
    pub fn new(record: UsageRecord, limit: u64) -> Self {
        Self {
            used: record.count,
            limit,
            remaining: limit.saturating_sub(record.count),
            period_start: record.period_start,
        }
    }

    pub fn is_exhausted(&self) -> bool {
        self.used >= self.limit
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_quota_status_remaining_saturates() {
        let period_start = Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap();
        let status = QuotaStatus::new(
            UsageRecord {
                count: 1200,
                period_start,
            },
            999,
        );
        assert_eq!(status.remaining, 0);
        assert!(status.is_exhausted());

        let status = QuotaStatus::new(
            UsageRecord {
                count: 10,
                period_start,
            },
            999,
        );
        assert_eq!(status.remaining, 989);
        assert!(!status.is_exhausted());
    }
}
