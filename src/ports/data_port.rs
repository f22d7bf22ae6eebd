//! Price data access port trait.
//!
//! Data acquisition lives outside the core: an adapter hands over an
//! already-retrieved, date-ascending sequence of closing prices.

use chrono::NaiveDate;

use crate::domain::error::BacktestError;
use crate::domain::price::PricePoint;

pub trait DataPort {
    /// Fetch closing prices for `symbol`, ascending by date, restricted
    /// to `[start, end]` when bounds are given.
    fn fetch_prices(
        &self,
        symbol: &str,
        start: Option<NaiveDate>,
        end: Option<NaiveDate>,
    ) -> Result<Vec<PricePoint>, BacktestError>;

    fn list_symbols(&self) -> Result<Vec<String>, BacktestError>;

    /// First date, last date, and observation count, or `None` when no
    /// data exists for the symbol.
    fn data_range(
        &self,
        symbol: &str,
    ) -> Result<Option<(NaiveDate, NaiveDate, usize)>, BacktestError>;
}
