//! CLI definition and dispatch.

use chrono::Utc;
use clap::{Parser, Subcommand};
use std::collections::BTreeMap;
use std::path::PathBuf;
use std::process::ExitCode;

use crate::adapters::csv_adapter::CsvAdapter;
use crate::adapters::file_config_adapter::FileConfigAdapter;
use crate::adapters::text_report_adapter::TextReportAdapter;
use crate::domain::asset::{parse_assets, Asset};
use crate::domain::config_validation::validate_config;
use crate::domain::error::SentradeError;
use crate::domain::guard::{self, GuardConfig};
use crate::domain::overlay::MacroBias;
use crate::domain::pipeline::{run_pipeline, PipelineSettings};
use crate::domain::score::ScoreParams;
use crate::domain::series::Field;
use crate::ports::config_port::ConfigPort;
use crate::ports::data_port::DataPort;
use crate::ports::report_port::ReportPort;

#[derive(Parser, Debug)]
#[command(name = "sentrade", about = "Commodity futures signal guard and forecaster")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run the full pipeline and print the forecast table
    Forecast {
        #[arg(short, long)]
        config: PathBuf,
        /// Write the summary to this file as well
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Evaluate a single asset instead of the configured list
        #[arg(long)]
        asset: Option<String>,
    },
    /// Run the data guard only and print the audit table
    Audit {
        #[arg(short, long)]
        config: PathBuf,
        #[arg(long)]
        asset: Option<String>,
    },
    /// Validate a configuration file
    Validate {
        #[arg(short, long)]
        config: PathBuf,
    },
    /// Show stored data range per asset
    Info {
        #[arg(short, long)]
        config: PathBuf,
        #[arg(long)]
        asset: Option<String>,
    },
}

pub fn run(cli: Cli) -> ExitCode {
    match cli.command {
        Command::Forecast {
            config,
            output,
            asset,
        } => run_forecast(&config, output.as_ref(), asset.as_deref()),
        Command::Audit { config, asset } => run_audit(&config, asset.as_deref()),
        Command::Validate { config } => run_validate(&config),
        Command::Info { config, asset } => run_info(&config, asset.as_deref()),
    }
}

pub fn load_config(path: &PathBuf) -> Result<FileConfigAdapter, ExitCode> {
    FileConfigAdapter::from_file(path).map_err(|e| {
        let err = SentradeError::ConfigParse {
            file: path.display().to_string(),
            reason: e.to_string(),
        };
        eprintln!("error: {err}");
        ExitCode::from(&err)
    })
}

/// Assets to evaluate: the CLI override when present, else `[assets] list`.
pub fn resolve_assets(
    config: &dyn ConfigPort,
    override_asset: Option<&str>,
) -> Result<Vec<Asset>, SentradeError> {
    if let Some(name) = override_asset {
        return Ok(vec![Asset::parse(name)]);
    }
    let list = config
        .get_string("assets", "list")
        .ok_or_else(|| SentradeError::ConfigMissing {
            section: "assets".to_string(),
            key: "list".to_string(),
        })?;
    parse_assets(&list).map_err(|e| SentradeError::ConfigInvalid {
        section: "assets".to_string(),
        key: "list".to_string(),
        reason: e.to_string(),
    })
}

pub fn build_guard_config(config: &dyn ConfigPort) -> Result<GuardConfig, SentradeError> {
    let defaults = GuardConfig::default();

    let parse_fields = |key: &str, fallback: &[Field]| -> Result<Vec<Field>, SentradeError> {
        match config.get_list("guard", key) {
            None => Ok(fallback.to_vec()),
            Some(tokens) => tokens
                .iter()
                .map(|token| {
                    Field::parse(token).ok_or_else(|| SentradeError::ConfigInvalid {
                        section: "guard".to_string(),
                        key: key.to_string(),
                        reason: format!("unknown field '{token}'"),
                    })
                })
                .collect(),
        }
    };

    let interval_seconds = config
        .get_string("guard", "interval_seconds")
        .map(|_| config.get_int("guard", "interval_seconds", 0));

    Ok(GuardConfig {
        required_fields: parse_fields("required_fields", &defaults.required_fields)?,
        critical_last_fields: parse_fields("critical_fields", &defaults.critical_last_fields)?,
        min_rows: config.get_int("guard", "min_rows", defaults.min_rows as i64) as usize,
        interval_seconds,
        stale_multiplier: config.get_double("guard", "stale_multiplier", defaults.stale_multiplier),
        assume_naive_utc: config.get_bool("guard", "assume_naive_utc", defaults.assume_naive_utc),
    })
}

pub fn build_score_params(config: &dyn ConfigPort) -> ScoreParams {
    let defaults = ScoreParams::default();
    ScoreParams {
        clamp_lo: config.get_double("score", "clamp_lo", defaults.clamp_lo),
        clamp_hi: config.get_double("score", "clamp_hi", defaults.clamp_hi),
        ..defaults
    }
}

pub fn build_bias_map(adapter: &FileConfigAdapter) -> BTreeMap<String, MacroBias> {
    adapter
        .section_keys("bias")
        .iter()
        .filter_map(|key| {
            adapter
                .get_string("bias", key)
                .map(|value| (Asset::parse(key).name().to_string(), MacroBias::parse(&value)))
        })
        .collect()
}

fn build_settings(adapter: &FileConfigAdapter) -> Result<PipelineSettings, SentradeError> {
    Ok(PipelineSettings {
        guard: build_guard_config(adapter)?,
        score: build_score_params(adapter),
        bias: build_bias_map(adapter),
    })
}

fn build_data_port(adapter: &FileConfigAdapter) -> Result<CsvAdapter, SentradeError> {
    let base_path = adapter
        .get_string("data", "base_path")
        .ok_or_else(|| SentradeError::ConfigMissing {
            section: "data".to_string(),
            key: "base_path".to_string(),
        })?;
    Ok(CsvAdapter::new(PathBuf::from(base_path)))
}

fn run_forecast(
    config_path: &PathBuf,
    output_path: Option<&PathBuf>,
    asset_override: Option<&str>,
) -> ExitCode {
    eprintln!("Loading config from {}", config_path.display());
    let adapter = match load_config(config_path) {
        Ok(a) => a,
        Err(code) => return code,
    };

    if let Err(e) = validate_config(&adapter) {
        eprintln!("error: {e}");
        return (&e).into();
    }

    let staged = (|| -> Result<(Vec<Asset>, PipelineSettings, CsvAdapter), SentradeError> {
        let assets = resolve_assets(&adapter, asset_override)?;
        let settings = build_settings(&adapter)?;
        let data_port = build_data_port(&adapter)?;
        Ok((assets, settings, data_port))
    })();
    let (assets, settings, data_port) = match staged {
        Ok(parts) => parts,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };

    let now = Utc::now();
    eprintln!("Evaluating {} asset(s)", assets.len());
    let reports = run_pipeline(&data_port, &assets, &settings, now);

    print!("{}", TextReportAdapter::render(&reports, now));

    let configured_output = adapter.get_string("report", "output_path").map(PathBuf::from);
    let output = output_path.cloned().or(configured_output);
    if let Some(path) = output {
        let report_port = TextReportAdapter::new();
        if let Err(e) = report_port.write(&reports, now, &path.display().to_string()) {
            eprintln!("error: {e}");
            return (&e).into();
        }
        eprintln!("Report written to {}", path.display());
    }

    ExitCode::SUCCESS
}

fn run_audit(config_path: &PathBuf, asset_override: Option<&str>) -> ExitCode {
    let adapter = match load_config(config_path) {
        Ok(a) => a,
        Err(code) => return code,
    };

    if let Err(e) = validate_config(&adapter) {
        eprintln!("error: {e}");
        return (&e).into();
    }

    let staged = (|| -> Result<(Vec<Asset>, GuardConfig, CsvAdapter), SentradeError> {
        let assets = resolve_assets(&adapter, asset_override)?;
        let guard_config = build_guard_config(&adapter)?;
        let data_port = build_data_port(&adapter)?;
        Ok((assets, guard_config, data_port))
    })();
    let (assets, guard_config, data_port) = match staged {
        Ok(parts) => parts,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };

    let now = Utc::now();
    println!(
        "{:<13}  {:<7}  {:<19}  {:>9}  {:>5}  {:>8}  {:>5}  REASON",
        "ASSET", "DATA_OK", "LAST_BAR", "AGE_s", "ROWS", "NAN_LAST", "STALE"
    );
    for asset in &assets {
        let verdict = match data_port.fetch_series(asset) {
            Ok(series) => guard::evaluate(asset, &series, &guard_config, now),
            Err(e) => guard::GuardVerdict::unavailable(asset, &e.to_string()),
        };
        let last_bar = verdict
            .last_bar
            .map(|ts| ts.format("%Y-%m-%d %H:%M:%S").to_string())
            .unwrap_or_else(|| "NA".to_string());
        println!(
            "{:<13}  {:<7}  {:<19}  {:>9}  {:>5}  {:>8}  {:>5}  {}",
            verdict.asset.name(),
            verdict.usable,
            last_bar,
            verdict.age_secs,
            verdict.rows,
            verdict.nan_last,
            verdict.stale,
            verdict.reason,
        );
    }

    ExitCode::SUCCESS
}

fn run_validate(config_path: &PathBuf) -> ExitCode {
    let adapter = match load_config(config_path) {
        Ok(a) => a,
        Err(code) => return code,
    };

    match validate_config(&adapter) {
        Ok(()) => {
            println!("Config OK: {}", config_path.display());
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("error: {e}");
            (&e).into()
        }
    }
}

fn run_info(config_path: &PathBuf, asset_override: Option<&str>) -> ExitCode {
    let adapter = match load_config(config_path) {
        Ok(a) => a,
        Err(code) => return code,
    };

    let staged = (|| -> Result<(Vec<Asset>, CsvAdapter), SentradeError> {
        let assets = resolve_assets(&adapter, asset_override)?;
        let data_port = build_data_port(&adapter)?;
        Ok((assets, data_port))
    })();
    let (assets, data_port) = match staged {
        Ok(parts) => parts,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };

    for asset in &assets {
        match data_port.data_range(asset) {
            Ok(Some((first, last, rows))) => println!(
                "{:<13}  {} .. {}  ({} rows)",
                asset.name(),
                first.to_utc().format("%Y-%m-%d %H:%M:%S"),
                last.to_utc().format("%Y-%m-%d %H:%M:%S"),
                rows
            ),
            Ok(None) => println!("{:<13}  no data", asset.name()),
            Err(e) => println!("{:<13}  unavailable ({e})", asset.name()),
        }
    }

    ExitCode::SUCCESS
}
