//! All-in/all-out portfolio simulation.
//!
//! A two-state machine folded over the price series: Flat (all cash)
//! and Long (all units). Trades execute at the closing price of the bar
//! whose cross triggered them, before that bar's value is recorded.

use super::error::BacktestError;
use super::price::{PricePoint, PriceSeries};
use super::signal::Transition;

/// Cash and holdings at one instant. Exactly one side is nonzero once
/// the first trade has fired; before that, cash holds the full initial
/// capital and units are zero.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HoldingState {
    pub cash: f64,
    pub units: f64,
}

impl HoldingState {
    pub fn with_cash(cash: f64) -> Self {
        HoldingState { cash, units: 0.0 }
    }

    pub fn is_flat(&self) -> bool {
        self.units == 0.0
    }

    pub fn is_long(&self) -> bool {
        self.units > 0.0
    }

    /// Mark-to-market value at the given price.
    pub fn value_at(&self, price: f64) -> f64 {
        self.cash + self.units * price
    }
}

/// Portfolio value series plus the state left after the final bar.
#[derive(Debug, Clone, PartialEq)]
pub struct SimulationResult {
    pub values: Vec<f64>,
    pub final_state: HoldingState,
}

/// Apply one bar: trade on the transition, then mark to market.
///
/// Cross-up converts all cash to units; cross-down converts all units
/// back to cash. Either is a no-op when the corresponding side is
/// already empty, which absorbs spurious repeated signals. A
/// non-positive price is a precondition violation and fails rather
/// than corrupting the state.
pub fn step(
    state: HoldingState,
    point: &PricePoint,
    transition: Transition,
) -> Result<(HoldingState, f64), BacktestError> {
    if point.close <= 0.0 {
        return Err(BacktestError::InvalidPrice {
            date: point.date,
            price: point.close,
        });
    }

    let next = match transition {
        Transition::CrossUp if state.cash > 0.0 => HoldingState {
            cash: 0.0,
            units: state.cash / point.close,
        },
        Transition::CrossDown if state.units > 0.0 => HoldingState {
            cash: state.units * point.close,
            units: 0.0,
        },
        _ => state,
    };

    Ok((next, next.value_at(point.close)))
}

/// Fold `step` over the whole series.
///
/// `transitions` must align index-for-index with `prices`; the signal
/// generator guarantees this.
pub fn simulate(
    prices: &PriceSeries,
    transitions: &[Transition],
    initial_cash: f64,
) -> Result<SimulationResult, BacktestError> {
    debug_assert_eq!(prices.len(), transitions.len());

    let mut state = HoldingState::with_cash(initial_cash);
    let mut values = Vec::with_capacity(prices.len());

    for (point, &transition) in prices.points().iter().zip(transitions) {
        let (next, value) = step(state, point, transition)?;
        state = next;
        values.push(value);
    }

    Ok(SimulationResult {
        values,
        final_state: state,
    })
}
