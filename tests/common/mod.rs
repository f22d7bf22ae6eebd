#![allow(dead_code)]

use chrono::NaiveDate;
use goldencross::domain::error::BacktestError;
use goldencross::domain::price::{PricePoint, PriceSeries};
use goldencross::ports::data_port::DataPort;
use std::collections::HashMap;

pub fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap()
}

pub fn make_points(closes: &[f64]) -> Vec<PricePoint> {
    closes
        .iter()
        .enumerate()
        .map(|(i, &close)| PricePoint {
            date: date(2020, 1, 1) + chrono::Duration::days(i as i64),
            close,
        })
        .collect()
}

pub fn make_series(closes: &[f64]) -> PriceSeries {
    PriceSeries::new(make_points(closes)).unwrap()
}

/// `len` bars all at `close`.
pub fn constant_series(close: f64, len: usize) -> PriceSeries {
    make_series(&vec![close; len])
}

/// `len` bars rising by `step` from `start`.
pub fn ramp_series(start: f64, step: f64, len: usize) -> PriceSeries {
    let closes: Vec<f64> = (0..len).map(|i| start + step * i as f64).collect();
    make_series(&closes)
}

pub struct MockDataPort {
    pub data: HashMap<String, Vec<PricePoint>>,
    pub errors: HashMap<String, String>,
}

impl MockDataPort {
    pub fn new() -> Self {
        Self {
            data: HashMap::new(),
            errors: HashMap::new(),
        }
    }

    pub fn with_points(mut self, symbol: &str, points: Vec<PricePoint>) -> Self {
        self.data.insert(symbol.to_string(), points);
        self
    }

    pub fn with_error(mut self, symbol: &str, reason: &str) -> Self {
        self.errors.insert(symbol.to_string(), reason.to_string());
        self
    }
}

impl DataPort for MockDataPort {
    fn fetch_prices(
        &self,
        symbol: &str,
        start: Option<NaiveDate>,
        end: Option<NaiveDate>,
    ) -> Result<Vec<PricePoint>, BacktestError> {
        if let Some(reason) = self.errors.get(symbol) {
            return Err(BacktestError::Data {
                reason: reason.clone(),
            });
        }
        let mut points = self.data.get(symbol).cloned().unwrap_or_default();
        points.retain(|p| {
            start.is_none_or(|s| p.date >= s) && end.is_none_or(|e| p.date <= e)
        });
        Ok(points)
    }

    fn list_symbols(&self) -> Result<Vec<String>, BacktestError> {
        let mut symbols: Vec<String> = self.data.keys().cloned().collect();
        symbols.sort();
        Ok(symbols)
    }

    fn data_range(
        &self,
        symbol: &str,
    ) -> Result<Option<(NaiveDate, NaiveDate, usize)>, BacktestError> {
        let points = self.data.get(symbol).cloned().unwrap_or_default();
        Ok(match (points.first(), points.last()) {
            (Some(first), Some(last)) => Some((first.date, last.date, points.len())),
            _ => None,
        })
    }
}
