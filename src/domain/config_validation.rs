//! Configuration validation.
//!
//! Validates every knob up front so a bad config fails the command before
//! any data is touched.

use crate::domain::asset::parse_assets;
use crate::domain::error::SentradeError;
use crate::domain::series::Field;
use crate::ports::config_port::ConfigPort;

pub fn validate_config(config: &dyn ConfigPort) -> Result<(), SentradeError> {
    validate_assets(config)?;
    validate_base_path(config)?;
    validate_min_rows(config)?;
    validate_stale_multiplier(config)?;
    validate_interval_seconds(config)?;
    validate_field_list(config, "required_fields")?;
    validate_field_list(config, "critical_fields")?;
    validate_clamp_bounds(config)?;
    Ok(())
}

fn invalid(section: &str, key: &str, reason: &str) -> SentradeError {
    SentradeError::ConfigInvalid {
        section: section.to_string(),
        key: key.to_string(),
        reason: reason.to_string(),
    }
}

fn validate_assets(config: &dyn ConfigPort) -> Result<(), SentradeError> {
    let Some(list) = config.get_string("assets", "list") else {
        return Err(SentradeError::ConfigMissing {
            section: "assets".to_string(),
            key: "list".to_string(),
        });
    };
    parse_assets(&list).map_err(|e| invalid("assets", "list", &e.to_string()))?;
    Ok(())
}

fn validate_base_path(config: &dyn ConfigPort) -> Result<(), SentradeError> {
    match config.get_string("data", "base_path") {
        Some(path) if !path.trim().is_empty() => Ok(()),
        Some(_) => Err(invalid("data", "base_path", "must not be empty")),
        None => Err(SentradeError::ConfigMissing {
            section: "data".to_string(),
            key: "base_path".to_string(),
        }),
    }
}

fn validate_min_rows(config: &dyn ConfigPort) -> Result<(), SentradeError> {
    let value = config.get_int("guard", "min_rows", 30);
    if value <= 0 {
        return Err(invalid("guard", "min_rows", "must be positive"));
    }
    Ok(())
}

fn validate_stale_multiplier(config: &dyn ConfigPort) -> Result<(), SentradeError> {
    let value = config.get_double("guard", "stale_multiplier", 2.0);
    if value <= 0.0 {
        return Err(invalid("guard", "stale_multiplier", "must be positive"));
    }
    Ok(())
}

fn validate_interval_seconds(config: &dyn ConfigPort) -> Result<(), SentradeError> {
    if config.get_string("guard", "interval_seconds").is_none() {
        return Ok(());
    }
    let value = config.get_int("guard", "interval_seconds", 0);
    if value <= 0 {
        return Err(invalid(
            "guard",
            "interval_seconds",
            "must be positive when set",
        ));
    }
    Ok(())
}

fn validate_field_list(config: &dyn ConfigPort, key: &str) -> Result<(), SentradeError> {
    let Some(tokens) = config.get_list("guard", key) else {
        return Ok(());
    };
    if tokens.is_empty() {
        return Err(invalid("guard", key, "must name at least one field"));
    }
    for token in &tokens {
        if Field::parse(token).is_none() {
            return Err(invalid(
                "guard",
                key,
                &format!("unknown field '{token}'"),
            ));
        }
    }
    Ok(())
}

fn validate_clamp_bounds(config: &dyn ConfigPort) -> Result<(), SentradeError> {
    let lo = config.get_double("score", "clamp_lo", 0.30);
    let hi = config.get_double("score", "clamp_hi", 0.70);
    if lo <= 0.0 || lo >= 1.0 || hi <= 0.0 || hi >= 1.0 {
        return Err(invalid("score", "clamp_lo", "bounds must lie within (0, 1)"));
    }
    if lo >= hi {
        return Err(invalid(
            "score",
            "clamp_hi",
            "clamp_hi must exceed clamp_lo",
        ));
    }
    Ok(())
}
