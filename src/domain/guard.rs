//! Data-integrity guard for fetched price series.
//!
//! `evaluate` certifies one series for one asset: completeness (required
//! fields present), history depth, freshness of the last bar, and a NaN
//! check on the critical last-row fields. The result is always a
//! [`GuardVerdict`]: malformed input degrades to an unusable verdict with
//! a descriptive reason, never an error. Downstream stages must treat an
//! unusable verdict as an unconditional override: no signal is computed or
//! acted on when the guard says no.
//!
//! Wall-clock "now" is caller-supplied so every time-dependent check is
//! deterministic and replayable.

use crate::domain::asset::Asset;
use crate::domain::series::{BarTime, Field, PriceSeries};
use chrono::{DateTime, Utc};

/// Age reported when there is no last bar to age against.
pub const AGE_SENTINEL_SECS: i64 = 1_000_000_000;

const INTERVAL_FALLBACK_SECS: i64 = 86_400;
const INTERVAL_MIN_SECS: i64 = 1;
const INTERVAL_MAX_SECS: i64 = 7 * 86_400;
const INTERVAL_INFER_WINDOW: usize = 50;

#[derive(Debug, Clone)]
pub struct GuardConfig {
    /// Fields that must be present as columns.
    pub required_fields: Vec<Field>,
    /// Fields whose last-row value must be numeric.
    pub critical_last_fields: Vec<Field>,
    /// Minimum number of rows for a usable history.
    pub min_rows: usize,
    /// Declared bar interval in seconds; inferred from the index if absent.
    pub interval_seconds: Option<i64>,
    /// A series is stale when its age exceeds interval × this multiplier.
    pub stale_multiplier: f64,
    /// Whether timezone-naive timestamps may be taken as UTC. When false a
    /// naive index cannot be aged and is reported as BAD_INDEX.
    pub assume_naive_utc: bool,
}

impl Default for GuardConfig {
    fn default() -> Self {
        Self {
            required_fields: vec![Field::Open, Field::High, Field::Low, Field::Close],
            critical_last_fields: vec![Field::Close],
            min_rows: 30,
            interval_seconds: None,
            stale_multiplier: 2.0,
            assume_naive_utc: true,
        }
    }
}

/// Usability ruling for one (asset, series, now) evaluation.
///
/// `usable` is false iff at least one flag is set. `reason` concatenates the
/// triggered flags in a fixed order (missing columns, history short, stale,
/// NaN last); the structural short-circuits EMPTY and BAD_INDEX are reported
/// alone.
#[derive(Debug, Clone)]
pub struct GuardVerdict {
    pub asset: Asset,
    pub usable: bool,
    pub last_bar: Option<DateTime<Utc>>,
    pub age_secs: i64,
    pub rows: usize,
    pub interval_secs: i64,
    pub missing_fields: Vec<Field>,
    pub history_short: bool,
    pub stale: bool,
    pub nan_last: bool,
    pub reason: String,
}

impl GuardVerdict {
    /// Verdict for a series that could not be fetched or processed at all.
    /// Used by the orchestrator for per-asset failure records.
    pub fn unavailable(asset: &Asset, reason: &str) -> Self {
        Self {
            asset: asset.clone(),
            usable: false,
            last_bar: None,
            age_secs: AGE_SENTINEL_SECS,
            rows: 0,
            interval_secs: INTERVAL_FALLBACK_SECS,
            missing_fields: Vec::new(),
            history_short: false,
            stale: true,
            nan_last: true,
            reason: reason.to_string(),
        }
    }
}

/// Certify `series` for `asset` against `config`, aging the last bar
/// relative to `now`.
pub fn evaluate(
    asset: &Asset,
    series: &PriceSeries,
    config: &GuardConfig,
    now: DateTime<Utc>,
) -> GuardVerdict {
    let declared_interval = config.interval_seconds.filter(|&secs| secs > 0);

    let rows = series.rows();
    if rows == 0 {
        return GuardVerdict {
            asset: asset.clone(),
            usable: false,
            last_bar: None,
            age_secs: AGE_SENTINEL_SECS,
            rows: 0,
            interval_secs: declared_interval.unwrap_or(INTERVAL_FALLBACK_SECS),
            missing_fields: Vec::new(),
            history_short: true,
            stale: true,
            nan_last: true,
            reason: "EMPTY".into(),
        };
    }

    let missing_fields: Vec<Field> = config
        .required_fields
        .iter()
        .copied()
        .filter(|&f| !series.has_field(f))
        .collect();

    let history_short = rows < config.min_rows;

    let last = series.last_time();
    let usable_index = match last {
        Some(t) if t.is_naive() && !config.assume_naive_utc => None,
        other => other,
    };
    let Some(last) = usable_index else {
        return GuardVerdict {
            asset: asset.clone(),
            usable: false,
            last_bar: None,
            age_secs: AGE_SENTINEL_SECS,
            rows,
            interval_secs: declared_interval.unwrap_or(INTERVAL_FALLBACK_SECS),
            missing_fields,
            history_short,
            stale: true,
            nan_last: true,
            reason: "BAD_INDEX".into(),
        };
    };

    let last_utc = last.to_utc();
    let interval_secs = declared_interval.unwrap_or_else(|| infer_interval(series.index()));
    let age_secs = (now - last_utc).num_seconds();

    // age exactly at the threshold is fresh; negative age never flags
    let stale = age_secs as f64 > interval_secs as f64 * config.stale_multiplier;

    let nan_last = config
        .critical_last_fields
        .iter()
        .any(|&f| matches!(series.last_value(f), Some(v) if v.is_nan()));

    let mut reasons: Vec<String> = Vec::new();
    if !missing_fields.is_empty() {
        let names: Vec<&str> = missing_fields.iter().map(|f| f.name()).collect();
        reasons.push(format!("MISSING_COLS:{}", names.join(",")));
    }
    if history_short {
        reasons.push("HISTORY_SHORT".into());
    }
    if stale {
        reasons.push("STALE_DATA".into());
    }
    if nan_last {
        reasons.push("NAN_LAST_ROW".into());
    }

    let usable = reasons.is_empty();
    GuardVerdict {
        asset: asset.clone(),
        usable,
        last_bar: Some(last_utc),
        age_secs,
        rows,
        interval_secs,
        missing_fields,
        history_short,
        stale,
        nan_last,
        reason: if usable { "OK".into() } else { reasons.join(";") },
    }
}

/// Infer the bar interval from the index: median of the positive
/// consecutive deltas over the last up-to-50 entries, clamped to
/// [1 s, 7 d]. Falls back to one calendar day when fewer than 3 rows or no
/// positive delta exists.
fn infer_interval(index: &[BarTime]) -> i64 {
    if index.len() < 3 {
        return INTERVAL_FALLBACK_SECS;
    }

    let tail = &index[index.len().saturating_sub(INTERVAL_INFER_WINDOW)..];
    let mut deltas: Vec<i64> = tail
        .windows(2)
        .map(|w| (w[1].to_utc() - w[0].to_utc()).num_seconds())
        .filter(|&d| d > 0)
        .collect();

    if deltas.is_empty() {
        return INTERVAL_FALLBACK_SECS;
    }

    deltas.sort_unstable();
    let mid = deltas.len() / 2;
    let median = if deltas.len() % 2 == 0 {
        (deltas[mid - 1] + deltas[mid]) / 2
    } else {
        deltas[mid]
    };

    median.clamp(INTERVAL_MIN_SECS, INTERVAL_MAX_SECS)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::series::Column;
    use chrono::{Duration, TimeZone};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap()
    }

    /// `rows` daily bars with full OHLC columns, the last bar `last_age`
    /// before `now()`.
    fn daily_series(rows: usize, last_age: Duration) -> PriceSeries {
        let last = now() - last_age;
        let index: Vec<BarTime> = (0..rows)
            .map(|i| BarTime::Utc(last - Duration::days((rows - 1 - i) as i64)))
            .collect();
        let closes: Vec<f64> = (0..rows).map(|i| 100.0 + i as f64).collect();
        let columns = [Field::Open, Field::High, Field::Low, Field::Close]
            .iter()
            .map(|&field| Column {
                field,
                values: closes.clone(),
            })
            .collect();
        PriceSeries::new(index, columns)
    }

    #[test]
    fn empty_series_short_circuits() {
        let v = evaluate(&Asset::Gold, &PriceSeries::empty(), &GuardConfig::default(), now());
        assert!(!v.usable);
        assert_eq!(v.reason, "EMPTY");
        assert_eq!(v.rows, 0);
        assert_eq!(v.age_secs, AGE_SENTINEL_SECS);
        assert!(v.nan_last);
        assert!(v.stale);
        assert!(v.last_bar.is_none());
    }

    #[test]
    fn fresh_full_history_is_usable() {
        let v = evaluate(
            &Asset::Gold,
            &daily_series(60, Duration::zero()),
            &GuardConfig::default(),
            now(),
        );
        assert!(v.usable);
        assert_eq!(v.reason, "OK");
        assert_eq!(v.rows, 60);
        assert_eq!(v.age_secs, 0);
        assert_eq!(v.interval_secs, 86_400);
        assert!(!v.history_short);
        assert!(!v.stale);
        assert!(!v.nan_last);
    }

    #[test]
    fn missing_required_column_is_flagged() {
        let series = daily_series(60, Duration::zero());
        let stripped = PriceSeries::new(
            series.index().to_vec(),
            vec![Column {
                field: Field::Close,
                values: series.closes().unwrap().to_vec(),
            }],
        );
        let v = evaluate(&Asset::Gold, &stripped, &GuardConfig::default(), now());
        assert!(!v.usable);
        assert_eq!(v.reason, "MISSING_COLS:Open,High,Low");
        assert_eq!(v.missing_fields, vec![Field::Open, Field::High, Field::Low]);
    }

    #[test]
    fn short_history_is_flagged() {
        let v = evaluate(
            &Asset::Silver,
            &daily_series(10, Duration::zero()),
            &GuardConfig::default(),
            now(),
        );
        assert!(!v.usable);
        assert!(v.history_short);
        assert_eq!(v.reason, "HISTORY_SHORT");
    }

    #[test]
    fn stale_series_is_flagged() {
        let v = evaluate(
            &Asset::Silver,
            &daily_series(60, Duration::days(10)),
            &GuardConfig::default(),
            now(),
        );
        assert!(!v.usable);
        assert!(v.stale);
        assert_eq!(v.reason, "STALE_DATA");
    }

    #[test]
    fn age_exactly_at_threshold_is_fresh() {
        // daily interval, multiplier 2 → threshold 172800 s
        let v = evaluate(
            &Asset::Gold,
            &daily_series(60, Duration::seconds(172_800)),
            &GuardConfig::default(),
            now(),
        );
        assert!(v.usable);
        assert!(!v.stale);

        let v = evaluate(
            &Asset::Gold,
            &daily_series(60, Duration::seconds(172_801)),
            &GuardConfig::default(),
            now(),
        );
        assert!(v.stale);
    }

    #[test]
    fn negative_age_is_not_stale() {
        let v = evaluate(
            &Asset::Gold,
            &daily_series(60, Duration::days(-1)),
            &GuardConfig::default(),
            now(),
        );
        assert!(v.age_secs < 0);
        assert!(!v.stale);
        assert!(v.usable);
    }

    #[test]
    fn nan_in_critical_last_field_is_flagged() {
        let series = daily_series(60, Duration::zero());
        let mut closes = series.closes().unwrap().to_vec();
        *closes.last_mut().unwrap() = f64::NAN;
        let columns = vec![
            Column { field: Field::Open, values: series.column(Field::Open).unwrap().to_vec() },
            Column { field: Field::High, values: series.column(Field::High).unwrap().to_vec() },
            Column { field: Field::Low, values: series.column(Field::Low).unwrap().to_vec() },
            Column { field: Field::Close, values: closes },
        ];
        let tampered = PriceSeries::new(series.index().to_vec(), columns);
        let v = evaluate(&Asset::Copper, &tampered, &GuardConfig::default(), now());
        assert!(!v.usable);
        assert!(v.nan_last);
        assert_eq!(v.reason, "NAN_LAST_ROW");
    }

    #[test]
    fn duplicate_close_column_rescues_nan() {
        let series = daily_series(60, Duration::zero());
        let mut broken = series.closes().unwrap().to_vec();
        *broken.last_mut().unwrap() = f64::NAN;
        let mut columns: Vec<Column> = [Field::Open, Field::High, Field::Low]
            .iter()
            .map(|&field| Column {
                field,
                values: series.column(field).unwrap().to_vec(),
            })
            .collect();
        columns.push(Column { field: Field::Close, values: broken });
        columns.push(Column {
            field: Field::Close,
            values: series.closes().unwrap().to_vec(),
        });
        let v = evaluate(
            &Asset::Copper,
            &PriceSeries::new(series.index().to_vec(), columns),
            &GuardConfig::default(),
            now(),
        );
        // first non-NaN candidate wins
        assert!(!v.nan_last);
        assert!(v.usable);
    }

    #[test]
    fn flags_concatenate_in_fixed_order() {
        let index: Vec<BarTime> = (0..5)
            .map(|i| BarTime::Utc(now() - Duration::days(30 - i)))
            .collect();
        let series = PriceSeries::new(
            index,
            vec![Column {
                field: Field::Close,
                values: vec![1.0, 2.0, 3.0, 4.0, f64::NAN],
            }],
        );
        let v = evaluate(&Asset::Gold, &series, &GuardConfig::default(), now());
        assert!(!v.usable);
        assert_eq!(
            v.reason,
            "MISSING_COLS:Open,High,Low;HISTORY_SHORT;STALE_DATA;NAN_LAST_ROW"
        );
    }

    #[test]
    fn index_not_covering_rows_is_bad_index() {
        let series = PriceSeries::new(
            vec![BarTime::Utc(now())],
            vec![Column {
                field: Field::Close,
                values: vec![1.0, 2.0, 3.0],
            }],
        );
        let v = evaluate(&Asset::Gold, &series, &GuardConfig::default(), now());
        assert!(!v.usable);
        assert_eq!(v.reason, "BAD_INDEX");
        assert_eq!(v.rows, 3);
        assert_eq!(v.age_secs, AGE_SENTINEL_SECS);
        assert!(v.stale);
        assert!(v.nan_last);
    }

    #[test]
    fn naive_index_rejected_when_not_assumed_utc() {
        let series = daily_series(60, Duration::zero());
        let naive_index: Vec<BarTime> = series
            .index()
            .iter()
            .map(|t| BarTime::Naive(t.to_utc().naive_utc()))
            .collect();
        let naive_series = PriceSeries::new(
            naive_index,
            vec![Column {
                field: Field::Close,
                values: series.closes().unwrap().to_vec(),
            }],
        );

        let mut config = GuardConfig {
            required_fields: vec![Field::Close],
            ..GuardConfig::default()
        };
        let v = evaluate(&Asset::Gold, &naive_series, &config, now());
        assert!(v.usable, "naive index is taken as UTC by default");

        config.assume_naive_utc = false;
        let v = evaluate(&Asset::Gold, &naive_series, &config, now());
        assert!(!v.usable);
        assert_eq!(v.reason, "BAD_INDEX");
    }

    #[test]
    fn declared_interval_wins_over_inference() {
        let config = GuardConfig {
            interval_seconds: Some(3_600),
            ..GuardConfig::default()
        };
        let v = evaluate(
            &Asset::Gold,
            &daily_series(60, Duration::hours(3)),
            &config,
            now(),
        );
        assert_eq!(v.interval_secs, 3_600);
        // 3 h old against a 1 h interval × 2 → stale
        assert!(v.stale);
    }

    #[test]
    fn non_positive_declared_interval_falls_back_to_inference() {
        let config = GuardConfig {
            interval_seconds: Some(0),
            ..GuardConfig::default()
        };
        let v = evaluate(
            &Asset::Gold,
            &daily_series(60, Duration::zero()),
            &config,
            now(),
        );
        assert_eq!(v.interval_secs, 86_400);
    }

    #[test]
    fn infer_interval_median_of_deltas() {
        let base = now();
        let index: Vec<BarTime> = (0..10)
            .map(|i| BarTime::Utc(base + Duration::hours(i)))
            .collect();
        assert_eq!(infer_interval(&index), 3_600);
    }

    #[test]
    fn infer_interval_fallbacks() {
        // too few rows
        let index = vec![BarTime::Utc(now()), BarTime::Utc(now())];
        assert_eq!(infer_interval(&index), 86_400);

        // constant index: no positive delta
        let index = vec![BarTime::Utc(now()); 5];
        assert_eq!(infer_interval(&index), 86_400);
    }

    #[test]
    fn infer_interval_clamps_to_seven_days() {
        let base = now();
        let index: Vec<BarTime> = (0..5)
            .map(|i| BarTime::Utc(base + Duration::days(30 * i)))
            .collect();
        assert_eq!(infer_interval(&index), 7 * 86_400);
    }

    #[test]
    fn unavailable_verdict_carries_reason() {
        let v = GuardVerdict::unavailable(&Asset::Gold, "connection refused");
        assert!(!v.usable);
        assert_eq!(v.reason, "connection refused");
        assert_eq!(v.age_secs, AGE_SENTINEL_SECS);
    }
}
