//! Crossover signal generation.
//!
//! Compares a short and a long rolling average and derives a per-bar
//! position signal plus the cross events between consecutive bars.

use super::average::{rolling_mean, AverageSeries};
use super::error::BacktestError;
use super::price::PriceSeries;

/// Desired position at a bar: all-in long or fully in cash.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Signal {
    Flat,
    Long,
}

/// The discrete difference of consecutive signals.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    CrossUp,
    CrossDown,
    None,
}

/// All signal-stage outputs, each index-aligned with the price series.
#[derive(Debug, Clone, PartialEq)]
pub struct SignalSeries {
    pub short_avg: AverageSeries,
    pub long_avg: AverageSeries,
    pub signal: Vec<Signal>,
    pub transitions: Vec<Transition>,
}

impl SignalSeries {
    /// A series that never leaves cash, used when the input is too
    /// short for the long window to establish.
    pub fn all_flat(prices: &PriceSeries, short_window: usize, long_window: usize) -> Self {
        SignalSeries {
            short_avg: rolling_mean(prices, short_window),
            long_avg: rolling_mean(prices, long_window),
            signal: vec![Signal::Flat; prices.len()],
            transitions: vec![Transition::None; prices.len()],
        }
    }
}

/// Generate averages, signals, and transitions for a price series.
///
/// The signal at index `i` is `Long` only when `i >= long_window` and
/// the short average strictly exceeds the long one; equality stays
/// `Flat`. The index guard keeps the strategy from acting before the
/// longer window has a full warmup, even for inputs where the short
/// average is established much earlier.
///
/// Fails with `InvalidWindow` for a zero short window or a long window
/// not greater than the short one, and with `InsufficientData` when the
/// series is shorter than the long window. The caller decides whether
/// the latter is fatal (see `ShortSeriesPolicy`).
pub fn generate(
    prices: &PriceSeries,
    short_window: usize,
    long_window: usize,
) -> Result<SignalSeries, BacktestError> {
    validate_windows(short_window, long_window)?;

    if prices.len() < long_window {
        return Err(BacktestError::InsufficientData {
            bars: prices.len(),
            minimum: long_window,
        });
    }

    let short_avg = rolling_mean(prices, short_window);
    let long_avg = rolling_mean(prices, long_window);

    let mut signal = Vec::with_capacity(prices.len());
    for i in 0..prices.len() {
        let value = if i >= long_window {
            match (short_avg[i], long_avg[i]) {
                (Some(short), Some(long)) if short > long => Signal::Long,
                _ => Signal::Flat,
            }
        } else {
            Signal::Flat
        };
        signal.push(value);
    }

    let transitions = diff_signals(&signal);

    Ok(SignalSeries {
        short_avg,
        long_avg,
        signal,
        transitions,
    })
}

/// Window ordering and positivity checks, shared with config validation.
pub fn validate_windows(short_window: usize, long_window: usize) -> Result<(), BacktestError> {
    if short_window == 0 {
        return Err(BacktestError::InvalidWindow {
            short: short_window,
            long: long_window,
            reason: "short window must be positive".into(),
        });
    }
    if long_window <= short_window {
        return Err(BacktestError::InvalidWindow {
            short: short_window,
            long: long_window,
            reason: "long window must exceed short window".into(),
        });
    }
    Ok(())
}

fn diff_signals(signal: &[Signal]) -> Vec<Transition> {
    let mut transitions = Vec::with_capacity(signal.len());
    let mut prev = Signal::Flat;

    for (i, &current) in signal.iter().enumerate() {
        let transition = if i == 0 {
            Transition::None
        } else {
            match (prev, current) {
                (Signal::Flat, Signal::Long) => Transition::CrossUp,
                (Signal::Long, Signal::Flat) => Transition::CrossDown,
                _ => Transition::None,
            }
        };
        transitions.push(transition);
        prev = current;
    }

    transitions
}
