//! Dated closing-price observations.

use chrono::NaiveDate;

use super::error::BacktestError;

/// A single closing-price observation. Immutable once produced.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PricePoint {
    pub date: NaiveDate,
    pub close: f64,
}

/// An ordered sequence of price points, strictly ascending by date.
///
/// Every derived series (averages, signals, portfolio values) aligns
/// index-for-index with this one. Gaps between dates are fine; rolling
/// windows count observations, not calendar days.
#[derive(Debug, Clone, PartialEq)]
pub struct PriceSeries {
    points: Vec<PricePoint>,
}

impl PriceSeries {
    /// Build a series, rejecting out-of-order or duplicate dates.
    pub fn new(points: Vec<PricePoint>) -> Result<Self, BacktestError> {
        for (i, pair) in points.windows(2).enumerate() {
            if pair[1].date <= pair[0].date {
                return Err(BacktestError::UnorderedSeries { index: i + 1 });
            }
        }
        Ok(Self { points })
    }

    pub fn empty() -> Self {
        Self { points: Vec::new() }
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn points(&self) -> &[PricePoint] {
        &self.points
    }

    pub fn closes(&self) -> impl Iterator<Item = f64> + '_ {
        self.points.iter().map(|p| p.close)
    }
}
