//! Report generation port trait.

use crate::domain::error::SentradeError;
use crate::domain::pipeline::AssetReport;
use chrono::{DateTime, Utc};

/// Port for rendering a batch of per-asset results.
pub trait ReportPort {
    fn write(
        &self,
        reports: &[AssetReport],
        generated_at: DateTime<Utc>,
        output_path: &str,
    ) -> Result<(), SentradeError>;
}
