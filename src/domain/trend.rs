//! Trend magnitude: relative price displacement over a lookback horizon.
//!
//! trend(n)[last] = (C[last] - C[last-n]) / C[last-n]
//! Sign is direction, magnitude is unbounded. Informational in the
//! canonical decision path; the rule table consumes the score only.

/// Canonical short horizon (~one trading week).
pub const SHORT_HORIZON: usize = 5;
/// Canonical medium horizon (~three trading weeks).
pub const MEDIUM_HORIZON: usize = 15;

/// Relative change over the most recent `horizon` bars. `None` when the
/// series has fewer than `horizon + 1` closes; a zero base yields 0.0.
pub fn trend(closes: &[f64], horizon: usize) -> Option<f64> {
    if horizon == 0 || closes.len() < horizon + 1 {
        return None;
    }

    let last = closes[closes.len() - 1];
    let base = closes[closes.len() - 1 - horizon];
    if base == 0.0 {
        Some(0.0)
    } else {
        Some((last - base) / base)
    }
}
