//! Momentum score model.
//!
//! Closed-form and replayable: two lookback returns are normalized by
//! realized volatility (Sharpe-style, scaled by the square root of each
//! lookback), combined with a tanh squash, mapped into the clamp range and
//! rounded. Identical input always yields an identical score, so every
//! decision can be audited after the fact. No model inference is involved.

#[derive(Debug, Clone)]
pub struct ScoreParams {
    pub long_lookback: usize,
    pub short_lookback: usize,
    /// Below this many closes the model returns the neutral midpoint.
    pub min_obs: usize,
    pub clamp_lo: f64,
    pub clamp_hi: f64,
    /// Weight on the long-lookback z-score; the short leg gets the rest.
    pub long_weight: f64,
    /// Floor on realized volatility.
    pub vol_floor: f64,
}

impl Default for ScoreParams {
    fn default() -> Self {
        Self {
            long_lookback: 20,
            short_lookback: 5,
            min_obs: 30,
            clamp_lo: 0.30,
            clamp_hi: 0.70,
            long_weight: 0.65,
            vol_floor: 1e-8,
        }
    }
}

impl ScoreParams {
    pub fn midpoint(&self) -> f64 {
        (self.clamp_lo + self.clamp_hi) / 2.0
    }
}

/// Score the closing-price history. Always finite and within
/// `[clamp_lo, clamp_hi]`; degrades to the neutral midpoint when the
/// history is too short for the lookbacks.
pub fn score(closes: &[f64], params: &ScoreParams) -> f64 {
    let n = closes.len();
    if n < params.min_obs || n <= params.long_lookback || n <= params.short_lookback {
        return round3(params.midpoint());
    }

    let r_long = lookback_return(closes, params.long_lookback);
    let r_short = lookback_return(closes, params.short_lookback);
    let vol = realized_volatility(closes, params.long_lookback).max(params.vol_floor);

    let z_long = r_long / (vol * (params.long_lookback as f64).sqrt());
    let z_short = r_short / (vol * (params.short_lookback as f64).sqrt());

    let combined =
        (params.long_weight * z_long + (1.0 - params.long_weight) * z_short).tanh();
    if !combined.is_finite() {
        return round3(params.midpoint());
    }

    let raw = params.midpoint() + combined * 0.25;
    round3(raw.clamp(params.clamp_lo, params.clamp_hi))
}

/// Relative price change over the last `lookback` bars.
fn lookback_return(closes: &[f64], lookback: usize) -> f64 {
    let last = closes[closes.len() - 1];
    let base = closes[closes.len() - 1 - lookback];
    if base == 0.0 {
        0.0
    } else {
        (last - base) / base
    }
}

/// Population standard deviation of the log-returns over the last
/// `window` intervals.
fn realized_volatility(closes: &[f64], window: usize) -> f64 {
    let start = closes.len() - window;
    let mut returns = Vec::with_capacity(window);
    for i in start..closes.len() {
        let prev = closes[i - 1];
        let curr = closes[i];
        if prev > 0.0 && curr > 0.0 {
            returns.push((curr / prev).ln());
        }
    }
    if returns.is_empty() {
        return 0.0;
    }

    let mean = returns.iter().sum::<f64>() / returns.len() as f64;
    let variance = returns
        .iter()
        .map(|r| {
            let diff = r - mean;
            diff * diff
        })
        .sum::<f64>()
        / returns.len() as f64;
    variance.sqrt()
}

fn round3(x: f64) -> f64 {
    (x * 1000.0).round() / 1000.0
}
