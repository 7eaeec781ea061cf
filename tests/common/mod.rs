#![allow(dead_code)]

use chrono::{DateTime, Duration, TimeZone, Utc};
use sentrade::domain::asset::Asset;
use sentrade::domain::error::SentradeError;
use sentrade::domain::series::{BarTime, Column, Field, PriceSeries};
use sentrade::ports::data_port::DataPort;
use std::collections::HashMap;

/// Fixed evaluation time for deterministic staleness checks.
pub fn fixed_now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap()
}

/// `rows` daily bars with full OHLCV columns, last bar at `last_bar`.
/// Closes follow `close_at(i)` over bar index 0..rows.
pub fn daily_series_with(
    rows: usize,
    last_bar: DateTime<Utc>,
    close_at: impl Fn(usize) -> f64,
) -> PriceSeries {
    let index: Vec<BarTime> = (0..rows)
        .map(|i| BarTime::Utc(last_bar - Duration::days((rows - 1 - i) as i64)))
        .collect();
    let closes: Vec<f64> = (0..rows).map(close_at).collect();
    let columns = vec![
        Column {
            field: Field::Open,
            values: closes.clone(),
        },
        Column {
            field: Field::High,
            values: closes.iter().map(|c| c * 1.01).collect(),
        },
        Column {
            field: Field::Low,
            values: closes.iter().map(|c| c * 0.99).collect(),
        },
        Column {
            field: Field::Close,
            values: closes,
        },
        Column {
            field: Field::Volume,
            values: vec![1_000.0; rows],
        },
    ];
    PriceSeries::new(index, columns)
}

/// Steadily rising daily history ending at `last_bar`; scores at the upper
/// clamp once long enough.
pub fn rising_series(rows: usize, last_bar: DateTime<Utc>) -> PriceSeries {
    daily_series_with(rows, last_bar, |i| 100.0 * 1.01f64.powi(i as i32))
}

/// Steadily falling daily history ending at `last_bar`.
pub fn falling_series(rows: usize, last_bar: DateTime<Utc>) -> PriceSeries {
    daily_series_with(rows, last_bar, |i| 100.0 * 0.99f64.powi(i as i32))
}

/// Flat daily history ending at `last_bar`; scores neutral.
pub fn flat_series(rows: usize, last_bar: DateTime<Utc>) -> PriceSeries {
    daily_series_with(rows, last_bar, |_| 250.0)
}

pub struct MockDataPort {
    pub series: HashMap<String, PriceSeries>,
    pub errors: HashMap<String, String>,
}

impl MockDataPort {
    pub fn new() -> Self {
        Self {
            series: HashMap::new(),
            errors: HashMap::new(),
        }
    }

    pub fn with_series(mut self, asset: &Asset, series: PriceSeries) -> Self {
        self.series.insert(asset.name().to_string(), series);
        self
    }

    pub fn with_error(mut self, asset: &Asset, reason: &str) -> Self {
        self.errors.insert(asset.name().to_string(), reason.to_string());
        self
    }
}

impl DataPort for MockDataPort {
    fn fetch_series(&self, asset: &Asset) -> Result<PriceSeries, SentradeError> {
        if let Some(reason) = self.errors.get(asset.name()) {
            return Err(SentradeError::Data {
                reason: reason.clone(),
            });
        }
        self.series
            .get(asset.name())
            .cloned()
            .ok_or_else(|| SentradeError::NoData {
                asset: asset.name().to_string(),
            })
    }

    fn data_range(
        &self,
        asset: &Asset,
    ) -> Result<Option<(BarTime, BarTime, usize)>, SentradeError> {
        let series = self.fetch_series(asset)?;
        let index = series.index();
        match (index.first(), index.last()) {
            (Some(&first), Some(&last)) => Ok(Some((first, last, series.rows()))),
            _ => Ok(None),
        }
    }
}
