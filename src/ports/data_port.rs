//! Price retrieval port trait.
//!
//! The pipeline consumes whatever series the adapter hands over; an `Err`
//! from `fetch_series` is an asset-scope failure that the orchestrator
//! isolates, while a malformed-but-present series is judged by the guard.

use crate::domain::asset::Asset;
use crate::domain::error::SentradeError;
use crate::domain::series::{BarTime, PriceSeries};

pub trait DataPort {
    fn fetch_series(&self, asset: &Asset) -> Result<PriceSeries, SentradeError>;

    /// (first bar, last bar, row count) of the stored history, if any.
    fn data_range(
        &self,
        asset: &Asset,
    ) -> Result<Option<(BarTime, BarTime, usize)>, SentradeError>;
}
