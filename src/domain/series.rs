//! Tabular price series representation.
//!
//! The series is column-oriented: a timestamp index plus named `f64`
//! columns, one per OHLCV field. Missing cells are `NaN`. Upstream feeds
//! occasionally emit the same field header twice, so columns are stored as
//! a list rather than a map and lookups distinguish "first column for a
//! field" from "all candidate values for a field in the last row".
//!
//! The series is produced by adapters and read-only to the core. It carries
//! whatever the feed delivered, malformed or not; judging it is the guard's
//! job.

use chrono::{DateTime, NaiveDateTime, Utc};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    Open,
    High,
    Low,
    Close,
    Volume,
}

impl Field {
    /// Case-insensitive header lookup. Unknown headers yield `None` and are
    /// ignored by adapters.
    pub fn parse(input: &str) -> Option<Field> {
        match input.trim().to_lowercase().as_str() {
            "open" => Some(Field::Open),
            "high" => Some(Field::High),
            "low" => Some(Field::Low),
            "close" => Some(Field::Close),
            "volume" => Some(Field::Volume),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Field::Open => "Open",
            Field::High => "High",
            Field::Low => "Low",
            Field::Close => "Close",
            Field::Volume => "Volume",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A bar timestamp, either timezone-naive or UTC-aware.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BarTime {
    Naive(NaiveDateTime),
    Utc(DateTime<Utc>),
}

impl BarTime {
    pub fn is_naive(&self) -> bool {
        matches!(self, BarTime::Naive(_))
    }

    /// Promote to UTC. Naive timestamps are taken as UTC wall time; whether
    /// that promotion is permitted at all is the guard's decision.
    pub fn to_utc(&self) -> DateTime<Utc> {
        match self {
            BarTime::Naive(naive) => naive.and_utc(),
            BarTime::Utc(utc) => *utc,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Column {
    pub field: Field,
    pub values: Vec<f64>,
}

#[derive(Debug, Clone)]
pub struct PriceSeries {
    index: Vec<BarTime>,
    columns: Vec<Column>,
}

impl PriceSeries {
    pub fn new(index: Vec<BarTime>, columns: Vec<Column>) -> Self {
        Self { index, columns }
    }

    pub fn empty() -> Self {
        Self {
            index: Vec::new(),
            columns: Vec::new(),
        }
    }

    /// Number of data rows: the longest column, or the bare index length
    /// when there are no columns at all.
    pub fn rows(&self) -> usize {
        self.columns
            .iter()
            .map(|c| c.values.len())
            .max()
            .unwrap_or(self.index.len())
    }

    pub fn is_empty(&self) -> bool {
        self.rows() == 0
    }

    pub fn index(&self) -> &[BarTime] {
        &self.index
    }

    pub fn has_field(&self, field: Field) -> bool {
        self.columns.iter().any(|c| c.field == field)
    }

    /// First column carrying `field`, if any.
    pub fn column(&self, field: Field) -> Option<&[f64]> {
        self.columns
            .iter()
            .find(|c| c.field == field)
            .map(|c| c.values.as_slice())
    }

    pub fn closes(&self) -> Option<&[f64]> {
        self.column(Field::Close)
    }

    /// Timestamp of the last row. `None` when the index does not cover the
    /// data rows (malformed feed) or the series is empty.
    pub fn last_time(&self) -> Option<BarTime> {
        let rows = self.rows();
        if rows == 0 || self.index.len() != rows {
            return None;
        }
        self.index.last().copied()
    }

    /// All candidate values for `field` in the last row, one per column
    /// carrying that field. A column too short to reach the last row
    /// contributes `NaN`.
    pub fn last_row_candidates(&self, field: Field) -> Vec<f64> {
        let rows = self.rows();
        if rows == 0 {
            return Vec::new();
        }
        self.columns
            .iter()
            .filter(|c| c.field == field)
            .map(|c| c.values.get(rows - 1).copied().unwrap_or(f64::NAN))
            .collect()
    }

    /// The last-row value for `field`: the first non-NaN candidate, or the
    /// first candidate if all are NaN. `None` when no column carries the
    /// field or the series is empty.
    pub fn last_value(&self, field: Field) -> Option<f64> {
        let candidates = self.last_row_candidates(field);
        candidates
            .iter()
            .copied()
            .find(|v| !v.is_nan())
            .or_else(|| candidates.first().copied())
    }

    /// Last close, when present and numeric.
    pub fn last_close(&self) -> Option<f64> {
        self.last_value(Field::Close).filter(|v| !v.is_nan())
    }
}
