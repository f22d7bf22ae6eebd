//! Report export port trait.

use std::path::Path;

use crate::domain::backtest::BacktestResult;
use crate::domain::error::BacktestError;

/// Port for exporting the computed series to an external renderer.
pub trait ReportPort {
    fn write(&self, result: &BacktestResult, output_path: &Path) -> Result<(), BacktestError>;
}
