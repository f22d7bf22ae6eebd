//! Simple moving average over closing prices.
//!
//! O(n) sliding-sum implementation. Warmup: the first (window - 1)
//! entries are `None`, so the boundary is type-checked rather than
//! carried by a sentinel value.

use super::price::PriceSeries;

/// Index-aligned with the price series; `None` until `window`
/// observations exist.
pub type AverageSeries = Vec<Option<f64>>;

/// Arithmetic mean of the closes at `[i - window + 1, i]`.
///
/// A zero window yields an all-`None` series of the same length;
/// window validation belongs to the signal generator.
pub fn rolling_mean(prices: &PriceSeries, window: usize) -> AverageSeries {
    if window == 0 {
        return vec![None; prices.len()];
    }

    let closes: Vec<f64> = prices.closes().collect();
    let mut values = Vec::with_capacity(closes.len());
    let mut window_sum = 0.0_f64;

    for (i, &close) in closes.iter().enumerate() {
        window_sum += close;
        if i >= window {
            window_sum -= closes[i - window];
        }

        if i >= window - 1 {
            values.push(Some(window_sum / window as f64));
        } else {
            values.push(None);
        }
    }

    values
}
