//! CSV file data adapter.
//!
//! Reads `<base_path>/<ASSET>.csv` (asset name with spaces as underscores).
//! The first column is the bar timestamp; remaining columns are mapped to
//! OHLCV fields by header name, case-insensitively. Unknown headers are
//! ignored and duplicate field headers become duplicate columns.
//!
//! The adapter is deliberately lenient: unparseable numeric cells become
//! NaN and rows with an unparseable timestamp keep their data but lose
//! their index entry. Judging the damage is the guard's job; the adapter
//! only fails when the file itself cannot be read.

use crate::domain::asset::Asset;
use crate::domain::error::SentradeError;
use crate::domain::series::{BarTime, Column, Field, PriceSeries};
use crate::ports::data_port::DataPort;
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use std::path::PathBuf;

pub struct CsvAdapter {
    base_path: PathBuf,
}

impl CsvAdapter {
    pub fn new(base_path: PathBuf) -> Self {
        Self { base_path }
    }

    fn csv_path(&self, asset: &Asset) -> PathBuf {
        self.base_path.join(format!("{}.csv", asset.file_stem()))
    }

    /// RFC 3339 (aware), else `%Y-%m-%d %H:%M:%S` (naive), else `%Y-%m-%d`
    /// (naive midnight).
    fn parse_timestamp(value: &str) -> Option<BarTime> {
        let trimmed = value.trim();
        if let Ok(aware) = DateTime::parse_from_rfc3339(trimmed) {
            return Some(BarTime::Utc(aware.to_utc()));
        }
        if let Ok(naive) = NaiveDateTime::parse_from_str(trimmed, "%Y-%m-%d %H:%M:%S") {
            return Some(BarTime::Naive(naive));
        }
        if let Ok(date) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
            return Some(BarTime::Naive(date.and_hms_opt(0, 0, 0)?));
        }
        None
    }

    fn parse_cell(value: Option<&str>) -> f64 {
        value
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .and_then(|v| v.parse::<f64>().ok())
            .unwrap_or(f64::NAN)
    }

    fn read_series(&self, asset: &Asset) -> Result<PriceSeries, SentradeError> {
        let path = self.csv_path(asset);
        if !path.exists() {
            return Err(SentradeError::NoData {
                asset: asset.name().to_string(),
            });
        }

        let mut rdr = csv::Reader::from_path(&path).map_err(|e| SentradeError::Data {
            reason: format!("failed to open {}: {}", path.display(), e),
        })?;

        let headers = rdr.headers().map_err(|e| SentradeError::Data {
            reason: format!("failed to read headers in {}: {}", path.display(), e),
        })?;

        // maps column position to field, skipping the timestamp column
        let field_slots: Vec<(usize, Field)> = headers
            .iter()
            .enumerate()
            .skip(1)
            .filter_map(|(pos, header)| Field::parse(header).map(|f| (pos, f)))
            .collect();

        let mut index = Vec::new();
        let mut columns: Vec<Column> = field_slots
            .iter()
            .map(|&(_, field)| Column {
                field,
                values: Vec::new(),
            })
            .collect();

        for record in rdr.records() {
            let record = record.map_err(|e| SentradeError::Data {
                reason: format!("CSV parse error in {}: {}", path.display(), e),
            })?;

            if let Some(ts) = record.get(0).and_then(Self::parse_timestamp) {
                index.push(ts);
            }
            for (slot, &(pos, _)) in field_slots.iter().enumerate() {
                columns[slot].values.push(Self::parse_cell(record.get(pos)));
            }
        }

        Ok(PriceSeries::new(index, columns))
    }
}

impl DataPort for CsvAdapter {
    fn fetch_series(&self, asset: &Asset) -> Result<PriceSeries, SentradeError> {
        self.read_series(asset)
    }

    fn data_range(
        &self,
        asset: &Asset,
    ) -> Result<Option<(BarTime, BarTime, usize)>, SentradeError> {
        let series = self.read_series(asset)?;
        let index = series.index();
        match (index.first(), index.last()) {
            (Some(&first), Some(&last)) => Ok(Some((first, last, series.rows()))),
            _ => Ok(None),
        }
    }
}
