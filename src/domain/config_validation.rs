//! Configuration validation.
//!
//! Checks every config field eagerly, before any data is loaded.

use chrono::NaiveDate;

use crate::domain::backtest::{
    DEFAULT_INITIAL_CASH, DEFAULT_LONG_WINDOW, DEFAULT_SHORT_WINDOW,
};
use crate::domain::error::BacktestError;
use crate::domain::signal::validate_windows;
use crate::ports::config_port::ConfigPort;

pub fn validate_backtest_config(config: &dyn ConfigPort) -> Result<(), BacktestError> {
    validate_window_params(config)?;
    validate_initial_cash(config)?;
    validate_short_series_policy(config)?;
    validate_dates(config)?;
    validate_data_section(config)?;
    Ok(())
}

fn validate_window_params(config: &dyn ConfigPort) -> Result<(), BacktestError> {
    let short = config.get_int("backtest", "short_window", DEFAULT_SHORT_WINDOW as i64);
    let long = config.get_int("backtest", "long_window", DEFAULT_LONG_WINDOW as i64);

    if short < 0 || long < 0 {
        return Err(BacktestError::ConfigInvalid {
            section: "backtest".into(),
            key: "short_window".into(),
            reason: "windows must be non-negative".into(),
        });
    }
    validate_windows(short as usize, long as usize)
}

fn validate_initial_cash(config: &dyn ConfigPort) -> Result<(), BacktestError> {
    let value = config.get_double("backtest", "initial_cash", DEFAULT_INITIAL_CASH);
    if value <= 0.0 {
        return Err(BacktestError::ConfigInvalid {
            section: "backtest".into(),
            key: "initial_cash".into(),
            reason: "initial_cash must be positive".into(),
        });
    }
    Ok(())
}

fn validate_short_series_policy(config: &dyn ConfigPort) -> Result<(), BacktestError> {
    match config.get_string("backtest", "on_short_series") {
        None => Ok(()),
        Some(value) => match value.to_lowercase().as_str() {
            "error" | "flat" => Ok(()),
            other => Err(BacktestError::ConfigInvalid {
                section: "backtest".into(),
                key: "on_short_series".into(),
                reason: format!("expected 'error' or 'flat', got '{other}'"),
            }),
        },
    }
}

fn validate_dates(config: &dyn ConfigPort) -> Result<(), BacktestError> {
    let start = parse_date(config, "start_date")?;
    let end = parse_date(config, "end_date")?;

    if let (Some(start), Some(end)) = (start, end) {
        if end < start {
            return Err(BacktestError::ConfigInvalid {
                section: "backtest".into(),
                key: "end_date".into(),
                reason: "end_date must not precede start_date".into(),
            });
        }
    }
    Ok(())
}

fn parse_date(config: &dyn ConfigPort, key: &str) -> Result<Option<NaiveDate>, BacktestError> {
    match config.get_string("backtest", key) {
        None => Ok(None),
        Some(value) => NaiveDate::parse_from_str(&value, "%Y-%m-%d")
            .map(Some)
            .map_err(|_| BacktestError::ConfigInvalid {
                section: "backtest".into(),
                key: key.into(),
                reason: "invalid date format (expected YYYY-MM-DD)".into(),
            }),
    }
}

fn validate_data_section(config: &dyn ConfigPort) -> Result<(), BacktestError> {
    if config.get_string("data", "path").is_none() {
        return Err(BacktestError::ConfigMissing {
            section: "data".into(),
            key: "path".into(),
        });
    }
    if config
        .get_string("data", "symbol")
        .filter(|s| !s.trim().is_empty())
        .is_none()
    {
        return Err(BacktestError::ConfigMissing {
            section: "data".into(),
            key: "symbol".into(),
        });
    }
    Ok(())
}
