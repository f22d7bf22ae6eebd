//! Performance evaluation of a portfolio value series.

use super::error::BacktestError;

/// Final outcome of a backtest, in the same currency unit as the
/// initial cash. `max_drawdown` is always <= 0.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PerformanceReport {
    pub final_value: f64,
    pub profit_loss: f64,
    pub max_drawdown: f64,
}

/// Compute final value, profit/loss, and maximum drawdown.
///
/// Drawdown at index `i` is `values[i]` minus the running maximum up to
/// and including `i`; the report carries the most negative one. A
/// non-decreasing series yields zero.
pub fn evaluate(values: &[f64], initial_cash: f64) -> Result<PerformanceReport, BacktestError> {
    let final_value = *values.last().ok_or(BacktestError::EmptySeries)?;

    let mut running_max = f64::NEG_INFINITY;
    let mut max_drawdown = 0.0_f64;
    for &value in values {
        if value > running_max {
            running_max = value;
        }
        let drawdown = value - running_max;
        if drawdown < max_drawdown {
            max_drawdown = drawdown;
        }
    }

    Ok(PerformanceReport {
        final_value,
        profit_loss: final_value - initial_cash,
        max_drawdown,
    })
}
