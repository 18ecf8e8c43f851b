//! Trend normalisation: raw per-metric records and histogram buckets into
//! chart coordinates.
//!
//! Both normalisers are pure and order-preserving. A single bad record fails
//! the whole series; nothing is filtered, reordered or coerced to zero.

use chrono::{DateTime, NaiveDate, NaiveDateTime};

use crate::models::{HistogramBucket, HistogramPoint, TrendPoint, TrendRecord};

/// Separator between the bounds of a histogram range label.
pub const RANGE_SEPARATOR: char = '-';

/// Errors raised while normalising a series.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum TrendError {
    #[error("record {index}: unparseable date {value:?}")]
    InvalidDate { index: usize, value: String },

    #[error("bucket {index}: malformed range label {label:?}")]
    InvalidRange { index: usize, label: String },
}

/// Parse a backend date string into epoch milliseconds.
///
/// Accepts RFC 3339, RFC 2822 (`Mon, 01 Jan 2024 00:00:00 GMT`), ISO-8601
/// date-times without offset (with `T` or a space) and bare dates. Values
/// without an offset are read as UTC.
pub fn parse_timestamp_millis(raw: &str) -> Option<i64> {
    let s = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.timestamp_millis());
    }
    if let Ok(dt) = DateTime::parse_from_rfc2822(s) {
        return Some(dt.timestamp_millis());
    }
    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(s, format) {
            return Some(naive.and_utc().timestamp_millis());
        }
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc().timestamp_millis())
}

/// Map each record to `{x: epoch millis, y: value}`, keeping input order.
pub fn normalize_trend(records: &[TrendRecord]) -> Result<Vec<TrendPoint>, TrendError> {
    records
        .iter()
        .enumerate()
        .map(|(index, record)| {
            let x = parse_timestamp_millis(&record.date).ok_or_else(|| TrendError::InvalidDate {
                index,
                value: record.date.clone(),
            })?;
            Ok(TrendPoint { x, y: record.value })
        })
        .collect()
}

/// Lower bound of a `"<low>-<high>"` label.
///
/// The label must contain the separator and the text before it must be a
/// non-negative integer; a leading `-` therefore reads as an empty prefix.
pub fn parse_range_start(label: &str) -> Option<i64> {
    let (low, _) = label.split_once(RANGE_SEPARATOR)?;
    let low = low.trim();
    if low.is_empty() || !low.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    low.parse().ok()
}

/// Map each bucket to a bar at its lower bound, keeping input order.
pub fn normalize_histogram(buckets: &[HistogramBucket]) -> Result<Vec<HistogramPoint>, TrendError> {
    buckets
        .iter()
        .enumerate()
        .map(|(index, bucket)| {
            let x = parse_range_start(&bucket.range).ok_or_else(|| TrendError::InvalidRange {
                index,
                label: bucket.range.clone(),
            })?;
            Ok(HistogramPoint {
                x,
                y: bucket.total_energy,
                range: bucket.range.clone(),
                count: bucket.count,
                average_energy: bucket.average_energy(),
            })
        })
        .collect()
}
