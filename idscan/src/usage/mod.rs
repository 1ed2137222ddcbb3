//! Monthly online OCR usage tracking.
//!
//! The counter lives in a [`KeyValueStore`](crate::db::KeyValueStore) under two
//! keys and is reset lazily: the first read or increment that observes a new
//! calendar month zeroes it. There is no background timer.

mod tracker;

pub use tracker::{month_start, UsageTracker, RESET_KEY, USAGE_KEY};
