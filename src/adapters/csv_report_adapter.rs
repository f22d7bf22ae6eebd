//! CSV series export adapter.
//!
//! Writes the four aligned series (close, short average, long average,
//! portfolio value) row-per-date for an external renderer to plot.
//! Warm-up entries are left empty rather than filled with sentinels.

use std::fs::File;
use std::path::Path;

use crate::domain::backtest::BacktestResult;
use crate::domain::error::BacktestError;
use crate::ports::report_port::ReportPort;

pub struct CsvReportAdapter;

impl CsvReportAdapter {
    pub fn new() -> Self {
        Self
    }
}

impl Default for CsvReportAdapter {
    fn default() -> Self {
        Self::new()
    }
}

fn format_avg(value: Option<f64>) -> String {
    value.map(|v| format!("{:.4}", v)).unwrap_or_default()
}

impl ReportPort for CsvReportAdapter {
    fn write(&self, result: &BacktestResult, output_path: &Path) -> Result<(), BacktestError> {
        let file = File::create(output_path)?;
        let mut wtr = csv::Writer::from_writer(file);

        wtr.write_record(["date", "close", "sma_short", "sma_long", "portfolio"])
            .map_err(|e| BacktestError::Data {
                reason: format!("CSV write error: {}", e),
            })?;

        for (i, point) in result.prices.points().iter().enumerate() {
            wtr.write_record([
                point.date.to_string(),
                format!("{:.4}", point.close),
                format_avg(result.short_avg[i]),
                format_avg(result.long_avg[i]),
                format!("{:.4}", result.portfolio_values[i]),
            ])
            .map_err(|e| BacktestError::Data {
                reason: format!("CSV write error: {}", e),
            })?;
        }

        wtr.flush()?;
        Ok(())
    }
}
