//! Query-log analysis for the monitoring view.
//!
//! Logs are a JSON array of per-query records. Malformed entries never
//! abort the batch; they are collected alongside the parsed records and
//! reported separately.

use std::path::Path;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{RagError, Result};

/// One query observation, as produced by whatever ran the query.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueryRecord {
    pub query: String,

    /// End-to-end latency in seconds.
    pub latency: f64,

    /// Relevance score in [0, 1], as judged by the producer.
    pub relevance: f64,

    /// Token count of the exchange.
    pub tokens: u64,

    /// RFC 3339 timestamp. Kept as a string so one bad timestamp does not
    /// invalidate the record; parsing happens when building the series.
    pub timestamp: String,
}

/// A log entry that failed to parse, with its array position.
#[derive(Debug, Clone, Serialize)]
pub struct SkippedRecord {
    pub index: usize,
    pub reason: String,
}

/// Parsed log batch with aggregate statistics.
#[derive(Debug, Serialize)]
pub struct LogReport {
    pub records: Vec<QueryRecord>,
    pub skipped: Vec<SkippedRecord>,
}

impl LogReport {
    /// Load a log file, keeping malformed entries as [`SkippedRecord`]s.
    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path).map_err(|e| RagError::FileRead {
            path: path.to_path_buf(),
            source: e,
        })?;

        let values: Vec<serde_json::Value> = serde_json::from_str(&raw)
            .map_err(|e| RagError::Config(format!("log file must be a JSON array: {e}")))?;

        let mut records = Vec::new();
        let mut skipped = Vec::new();

        for (index, value) in values.into_iter().enumerate() {
            match serde_json::from_value::<QueryRecord>(value) {
                Ok(record) => records.push(record),
                Err(e) => skipped.push(SkippedRecord {
                    index,
                    reason: e.to_string(),
                }),
            }
        }

        Ok(Self { records, skipped })
    }

    pub fn total(&self) -> usize {
        self.records.len()
    }

    pub fn mean_latency(&self) -> Option<f64> {
        mean(self.records.iter().map(|r| r.latency))
    }

    pub fn mean_relevance(&self) -> Option<f64> {
        mean(self.records.iter().map(|r| r.relevance))
    }

    pub fn median_tokens(&self) -> Option<f64> {
        if self.records.is_empty() {
            return None;
        }

        let mut tokens: Vec<u64> = self.records.iter().map(|r| r.tokens).collect();
        tokens.sort_unstable();

        let mid = tokens.len() / 2;
        let median = if tokens.len() % 2 == 0 {
            (tokens[mid - 1] + tokens[mid]) as f64 / 2.0
        } else {
            tokens[mid] as f64
        };
        Some(median)
    }

    /// Relevance over time, ordered by timestamp. Records whose timestamp
    /// fails to parse are left out of the series (but still counted in the
    /// aggregates).
    pub fn relevance_series(&self) -> Vec<(DateTime<Utc>, f64)> {
        let mut series: Vec<(DateTime<Utc>, f64)> = self
            .records
            .iter()
            .filter_map(|r| {
                DateTime::parse_from_rfc3339(&r.timestamp)
                    .ok()
                    .map(|ts| (ts.with_timezone(&Utc), r.relevance))
            })
            .collect();

        series.sort_by_key(|(ts, _)| *ts);
        series
    }
}

fn mean(values: impl Iterator<Item = f64>) -> Option<f64> {
    let (sum, count) = values.fold((0.0, 0usize), |(s, c), v| (s + v, c + 1));
    if count == 0 {
        None
    } else {
        Some(sum / count as f64)
    }
}
