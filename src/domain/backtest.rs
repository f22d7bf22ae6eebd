//! Backtest configuration and the end-to-end pipeline.
//!
//! One forward pass: prices → signals → simulation, plus one finalize
//! pass for the performance report. Each stage consumes immutable
//! inputs and produces a new derived series.

use super::average::AverageSeries;
use super::error::BacktestError;
use super::performance::{self, PerformanceReport};
use super::price::PriceSeries;
use super::signal::{self, Signal, SignalSeries, Transition};
use super::simulator::{self, HoldingState};

pub const DEFAULT_SHORT_WINDOW: usize = 50;
pub const DEFAULT_LONG_WINDOW: usize = 200;
pub const DEFAULT_INITIAL_CASH: f64 = 10_000.0;

/// What to do when the price series is shorter than the long window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ShortSeriesPolicy {
    /// Fail with `InsufficientData`.
    Error,
    /// Run to completion never invested: all-flat signal, value pinned
    /// at the initial cash. Matches a strategy that simply has no
    /// established long average to act on.
    #[default]
    RunFlat,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BacktestConfig {
    pub short_window: usize,
    pub long_window: usize,
    pub initial_cash: f64,
    pub short_series_policy: ShortSeriesPolicy,
}

impl Default for BacktestConfig {
    fn default() -> Self {
        BacktestConfig {
            short_window: DEFAULT_SHORT_WINDOW,
            long_window: DEFAULT_LONG_WINDOW,
            initial_cash: DEFAULT_INITIAL_CASH,
            short_series_policy: ShortSeriesPolicy::default(),
        }
    }
}

impl BacktestConfig {
    /// Eager parameter validation, shared by the library entry point
    /// and the config layer.
    pub fn validate(&self) -> Result<(), BacktestError> {
        signal::validate_windows(self.short_window, self.long_window)?;
        if self.initial_cash <= 0.0 {
            return Err(BacktestError::ConfigInvalid {
                section: "backtest".into(),
                key: "initial_cash".into(),
                reason: "initial_cash must be positive".into(),
            });
        }
        Ok(())
    }
}

/// Everything a report or renderer needs: the four aligned series,
/// the cross events, the final holding state, and the summary numbers.
#[derive(Debug, Clone, PartialEq)]
pub struct BacktestResult {
    pub prices: PriceSeries,
    pub short_avg: AverageSeries,
    pub long_avg: AverageSeries,
    pub signal: Vec<Signal>,
    pub transitions: Vec<Transition>,
    pub portfolio_values: Vec<f64>,
    pub final_state: HoldingState,
    pub report: PerformanceReport,
}

/// Run the whole pipeline over one price series.
///
/// Fails fast on invalid parameters, on a non-positive price reaching
/// the simulator, and on an empty series (nothing to evaluate). A
/// series shorter than the long window follows the configured policy.
pub fn run_backtest(
    prices: PriceSeries,
    config: &BacktestConfig,
) -> Result<BacktestResult, BacktestError> {
    config.validate()?;

    let signals = match signal::generate(&prices, config.short_window, config.long_window) {
        Ok(s) => s,
        Err(BacktestError::InsufficientData { bars, minimum })
            if config.short_series_policy == ShortSeriesPolicy::Error =>
        {
            return Err(BacktestError::InsufficientData { bars, minimum });
        }
        Err(BacktestError::InsufficientData { .. }) => {
            SignalSeries::all_flat(&prices, config.short_window, config.long_window)
        }
        Err(e) => return Err(e),
    };

    let simulation = simulator::simulate(&prices, &signals.transitions, config.initial_cash)?;
    let report = performance::evaluate(&simulation.values, config.initial_cash)?;

    Ok(BacktestResult {
        prices,
        short_avg: signals.short_avg,
        long_avg: signals.long_avg,
        signal: signals.signal,
        transitions: signals.transitions,
        portfolio_values: simulation.values,
        final_state: simulation.final_state,
        report,
    })
}
