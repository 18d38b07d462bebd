//! Configuration validation.
//!
//! Every key is optional; absent keys take the built-in defaults, present
//! keys must be in range.

use crate::domain::error::TrendSignalError;
use crate::domain::signal::SignalParams;
use crate::domain::simulator::BacktestConfig;
use crate::ports::config_port::ConfigPort;

pub const DEFAULT_STATUS_LOOKBACK: i64 = 120;

const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];
const LOG_FORMATS: [&str; 2] = ["text", "json"];

pub fn validate_config(config: &dyn ConfigPort) -> Result<(), TrendSignalError> {
    validate_general_config(config)?;
    validate_status_config(config)?;
    validate_signal_config(config)?;
    validate_backtest_config(config)?;
    Ok(())
}

pub fn validate_general_config(config: &dyn ConfigPort) -> Result<(), TrendSignalError> {
    if let Some(level) = config.get_string("general", "log_level") {
        if !LOG_LEVELS.contains(&level.trim().to_lowercase().as_str()) {
            return Err(invalid(
                "general",
                "log_level",
                "log_level must be one of trace, debug, info, warn, error",
            ));
        }
    }
    if let Some(format) = config.get_string("general", "log_format") {
        if !LOG_FORMATS.contains(&format.trim().to_lowercase().as_str()) {
            return Err(invalid(
                "general",
                "log_format",
                "log_format must be text or json",
            ));
        }
    }
    Ok(())
}

pub fn validate_status_config(config: &dyn ConfigPort) -> Result<(), TrendSignalError> {
    validate_lookback(config, "status", DEFAULT_STATUS_LOOKBACK)
}

pub fn validate_signal_config(config: &dyn ConfigPort) -> Result<(), TrendSignalError> {
    let defaults = SignalParams::default();

    let dip = read_number(config, "signal", "dip_threshold", defaults.dip_threshold)?;
    if dip <= 0.0 || dip >= 1.0 {
        return Err(invalid(
            "signal",
            "dip_threshold",
            "dip_threshold must be between 0 and 1",
        ));
    }

    let oversold = read_number(config, "signal", "rsi_oversold", defaults.rsi_oversold)?;
    let overbought = read_number(config, "signal", "rsi_overbought", defaults.rsi_overbought)?;
    if oversold < 0.0 || overbought > 100.0 {
        return Err(invalid(
            "signal",
            "rsi_oversold",
            "RSI thresholds must lie within 0..=100",
        ));
    }
    if oversold >= overbought {
        return Err(invalid(
            "signal",
            "rsi_overbought",
            "rsi_overbought must be greater than rsi_oversold",
        ));
    }

    let tolerance = read_number(config, "signal", "fib_tolerance", defaults.fib_tolerance)?;
    if tolerance <= 0.0 || tolerance >= 1.0 {
        return Err(invalid(
            "signal",
            "fib_tolerance",
            "fib_tolerance must be between 0 and 1",
        ));
    }
    Ok(())
}

pub fn validate_backtest_config(config: &dyn ConfigPort) -> Result<(), TrendSignalError> {
    let defaults = BacktestConfig::default();

    let capital = read_number(config, "backtest", "initial_capital", defaults.initial_capital)?;
    if capital <= 0.0 {
        return Err(invalid(
            "backtest",
            "initial_capital",
            "initial_capital must be positive",
        ));
    }

    let lot = read_number(config, "backtest", "lot_size", defaults.lot_size)?;
    if lot <= 0.0 {
        return Err(invalid("backtest", "lot_size", "lot_size must be positive"));
    }

    validate_lookback(config, "backtest", defaults.lookback as i64)
}

fn validate_lookback(
    config: &dyn ConfigPort,
    section: &str,
    default: i64,
) -> Result<(), TrendSignalError> {
    let raw = config.get_string(section, "lookback");
    let lookback = match raw.as_deref().map(str::trim) {
        Some(text) => text.parse::<i64>().map_err(|_| {
            invalid(section, "lookback", &format!("'{text}' is not a whole number"))
        })?,
        None => default,
    };
    if lookback < 1 {
        return Err(invalid(section, "lookback", "lookback must be at least 1"));
    }
    Ok(())
}

/// A present value must parse as a finite number; absent keys take `default`.
fn read_number(
    config: &dyn ConfigPort,
    section: &str,
    key: &str,
    default: f64,
) -> Result<f64, TrendSignalError> {
    let Some(raw) = config.get_string(section, key) else {
        return Ok(default);
    };
    let text = raw.trim();
    match text.parse::<f64>() {
        Ok(value) if value.is_finite() => Ok(value),
        Ok(_) => Err(invalid(section, key, &format!("{key} must be finite, got '{text}'"))),
        Err(_) => Err(invalid(section, key, &format!("'{text}' is not a number"))),
    }
}

fn invalid(section: &str, key: &str, reason: &str) -> TrendSignalError {
    TrendSignalError::ConfigInvalid {
        section: section.to_string(),
        key: key.to_string(),
        reason: reason.to_string(),
    }
}
