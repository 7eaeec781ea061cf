//! Pipeline orchestrator.
//!
//! For each configured asset: fetch the price series, run the guard, and
//! only when the verdict is usable compute the score, the trend magnitudes
//! and the rule-table decision. An unusable verdict is an unconditional
//! override: the asset is blocked with the guard's reason and no signal is
//! computed. A fetch or processing failure is confined to its asset: the
//! batch always completes, with the failed asset carrying an error record.
//!
//! Assets are processed independently; with the same inputs and the same
//! `now` the output is identical.

use crate::domain::asset::Asset;
use crate::domain::decision::{decide, Action};
use crate::domain::guard::{self, GuardConfig, GuardVerdict};
use crate::domain::overlay::{overlay, MacroBias, OverlayCall};
use crate::domain::score::{score, ScoreParams};
use crate::domain::trend::{trend, MEDIUM_HORIZON, SHORT_HORIZON};
use crate::ports::data_port::DataPort;
use chrono::{DateTime, Utc};
use std::collections::BTreeMap;
use std::fmt;

/// The terminal state for one asset. Blocked and failed states are returned
/// variants, not exceptions, so the isolation guarantee is structural.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TerminalAction {
    Decided(Action),
    /// Guard refused the data; no signal was computed.
    BlockedData,
    /// Fetch or processing failed for this asset.
    Failed,
}

impl fmt::Display for TerminalAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TerminalAction::Decided(action) => action.fmt(f),
            TerminalAction::BlockedData => f.write_str("NO_TRADE(DATA)"),
            TerminalAction::Failed => f.write_str("NO_TRADE(ERROR)"),
        }
    }
}

/// Structured per-asset result record consumed by the reporting layer.
#[derive(Debug, Clone)]
pub struct AssetReport {
    pub asset: Asset,
    pub close: Option<f64>,
    pub score: f64,
    pub trend_short: f64,
    pub trend_medium: f64,
    pub action: TerminalAction,
    pub rationale: String,
    pub overlay: OverlayCall,
    pub verdict: GuardVerdict,
}

#[derive(Debug, Clone, Default)]
pub struct PipelineSettings {
    pub guard: GuardConfig,
    pub score: ScoreParams,
    /// Per-asset macro bias, keyed by canonical asset name. Missing keys
    /// default to a neutral bias.
    pub bias: BTreeMap<String, MacroBias>,
}

impl PipelineSettings {
    fn bias_for(&self, asset: &Asset) -> MacroBias {
        self.bias.get(asset.name()).copied().unwrap_or_default()
    }
}

/// Evaluate every asset. One report per asset, in input order.
pub fn run_pipeline(
    data_port: &dyn DataPort,
    assets: &[Asset],
    settings: &PipelineSettings,
    now: DateTime<Utc>,
) -> Vec<AssetReport> {
    assets
        .iter()
        .map(|asset| evaluate_asset(data_port, asset, settings, now))
        .collect()
}

fn evaluate_asset(
    data_port: &dyn DataPort,
    asset: &Asset,
    settings: &PipelineSettings,
    now: DateTime<Utc>,
) -> AssetReport {
    let call = overlay(settings.bias_for(asset));

    let series = match data_port.fetch_series(asset) {
        Ok(series) => series,
        Err(err) => return failed_report(asset, &err.to_string(), call),
    };

    let verdict = guard::evaluate(asset, &series, &settings.guard, now);
    let close = series.last_close();

    if !verdict.usable {
        return AssetReport {
            asset: asset.clone(),
            close,
            score: 0.0,
            trend_short: 0.0,
            trend_medium: 0.0,
            action: TerminalAction::BlockedData,
            rationale: verdict.reason.clone(),
            overlay: call,
            verdict,
        };
    }

    // A usable verdict certifies the critical fields, not every column the
    // model wants; a certified series without a close column is still an
    // asset-scope failure, not a panic.
    let Some(closes) = series.closes() else {
        return failed_report(asset, "no close column in certified series", call);
    };

    let score = score(closes, &settings.score);
    let trend_short = trend(closes, SHORT_HORIZON).unwrap_or(0.0);
    let trend_medium = trend(closes, MEDIUM_HORIZON).unwrap_or(0.0);
    let decision = decide(asset, score);

    AssetReport {
        asset: asset.clone(),
        close,
        score,
        trend_short,
        trend_medium,
        action: TerminalAction::Decided(decision.action),
        rationale: decision.rationale,
        overlay: call,
        verdict,
    }
}

fn failed_report(asset: &Asset, reason: &str, call: OverlayCall) -> AssetReport {
    AssetReport {
        asset: asset.clone(),
        close: None,
        score: 0.0,
        trend_short: 0.0,
        trend_medium: 0.0,
        action: TerminalAction::Failed,
        rationale: reason.to_string(),
        overlay: call,
        verdict: GuardVerdict::unavailable(asset, reason),
    }
}
