//! CSV file data adapter.
//!
//! Reads `<symbol>.csv` files with `date,close` rows from a base
//! directory.

use chrono::NaiveDate;
use std::fs;
use std::path::PathBuf;

use crate::domain::error::BacktestError;
use crate::domain::price::PricePoint;
use crate::ports::data_port::DataPort;

pub struct CsvAdapter {
    base_path: PathBuf,
}

impl CsvAdapter {
    pub fn new(base_path: PathBuf) -> Self {
        Self { base_path }
    }

    fn csv_path(&self, symbol: &str) -> PathBuf {
        self.base_path.join(format!("{}.csv", symbol))
    }

    fn read_all(&self, symbol: &str) -> Result<Vec<PricePoint>, BacktestError> {
        let path = self.csv_path(symbol);
        let content = fs::read_to_string(&path).map_err(|e| BacktestError::Data {
            reason: format!("failed to read {}: {}", path.display(), e),
        })?;

        let mut rdr = csv::Reader::from_reader(content.as_bytes());
        let mut points = Vec::new();

        for result in rdr.records() {
            let record = result.map_err(|e| BacktestError::Data {
                reason: format!("CSV parse error: {}", e),
            })?;

            let date_str = record.get(0).ok_or_else(|| BacktestError::Data {
                reason: "missing date column".into(),
            })?;
            let date = NaiveDate::parse_from_str(date_str, "%Y-%m-%d").map_err(|e| {
                BacktestError::Data {
                    reason: format!("invalid date format: {}", e),
                }
            })?;

            let close: f64 = record
                .get(1)
                .ok_or_else(|| BacktestError::Data {
                    reason: "missing close column".into(),
                })?
                .parse()
                .map_err(|e| BacktestError::Data {
                    reason: format!("invalid close value: {}", e),
                })?;

            points.push(PricePoint { date, close });
        }

        points.sort_by_key(|p| p.date);
        Ok(points)
    }
}

impl DataPort for CsvAdapter {
    fn fetch_prices(
        &self,
        symbol: &str,
        start: Option<NaiveDate>,
        end: Option<NaiveDate>,
    ) -> Result<Vec<PricePoint>, BacktestError> {
        let mut points = self.read_all(symbol)?;
        points.retain(|p| {
            start.is_none_or(|s| p.date >= s) && end.is_none_or(|e| p.date <= e)
        });
        Ok(points)
    }

    fn list_symbols(&self) -> Result<Vec<String>, BacktestError> {
        let entries = fs::read_dir(&self.base_path).map_err(|e| BacktestError::Data {
            reason: format!(
                "failed to read directory {}: {}",
                self.base_path.display(),
                e
            ),
        })?;

        let mut symbols = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| BacktestError::Data {
                reason: format!("directory entry error: {}", e),
            })?;
            let name = entry.file_name();
            let name_str = name.to_string_lossy();
            if let Some(symbol) = name_str.strip_suffix(".csv") {
                symbols.push(symbol.to_string());
            }
        }

        symbols.sort();
        Ok(symbols)
    }

    fn data_range(
        &self,
        symbol: &str,
    ) -> Result<Option<(NaiveDate, NaiveDate, usize)>, BacktestError> {
        let points = self.read_all(symbol)?;
        match (points.first(), points.last()) {
            (Some(first), Some(last)) => Ok(Some((first.date, last.date, points.len()))),
            _ => Ok(None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn setup_test_data() -> (TempDir, PathBuf) {
        let dir = TempDir::new().unwrap();
        let path = dir.path().to_path_buf();

        let csv_content = "date,close\n\
            2024-01-15,105.0\n\
            2024-01-16,110.0\n\
            2024-01-17,115.0\n";

        fs::write(path.join("BTC-USD.csv"), csv_content).unwrap();
        fs::write(path.join("ETH-USD.csv"), "date,close\n").unwrap();

        (dir, path)
    }

    #[test]
    fn fetch_prices_returns_ordered_data() {
        let (_dir, path) = setup_test_data();
        let adapter = CsvAdapter::new(path);

        let points = adapter.fetch_prices("BTC-USD", None, None).unwrap();

        assert_eq!(points.len(), 3);
        assert_eq!(points[0].date, NaiveDate::from_ymd_opt(2024, 1, 15).unwrap());
        assert_eq!(points[0].close, 105.0);
        assert_eq!(points[2].close, 115.0);
    }

    #[test]
    fn fetch_prices_sorts_unordered_rows() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().to_path_buf();
        fs::write(
            path.join("X.csv"),
            "date,close\n2024-01-17,3.0\n2024-01-15,1.0\n2024-01-16,2.0\n",
        )
        .unwrap();

        let adapter = CsvAdapter::new(path);
        let points = adapter.fetch_prices("X", None, None).unwrap();
        let closes: Vec<f64> = points.iter().map(|p| p.close).collect();
        assert_eq!(closes, vec![1.0, 2.0, 3.0]);
    }

    #[test]
    fn fetch_prices_filters_by_date() {
        let (_dir, path) = setup_test_data();
        let adapter = CsvAdapter::new(path);

        let start = NaiveDate::from_ymd_opt(2024, 1, 16).unwrap();
        let points = adapter
            .fetch_prices("BTC-USD", Some(start), Some(start))
            .unwrap();

        assert_eq!(points.len(), 1);
        assert_eq!(points[0].close, 110.0);
    }

    #[test]
    fn fetch_prices_fails_for_missing_file() {
        let (_dir, path) = setup_test_data();
        let adapter = CsvAdapter::new(path);

        let result = adapter.fetch_prices("XYZ", None, None);
        assert!(matches!(result, Err(BacktestError::Data { .. })));
    }

    #[test]
    fn fetch_prices_fails_for_bad_close() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().to_path_buf();
        fs::write(path.join("BAD.csv"), "date,close\n2024-01-15,abc\n").unwrap();

        let adapter = CsvAdapter::new(path);
        assert!(adapter.fetch_prices("BAD", None, None).is_err());
    }

    #[test]
    fn list_symbols_returns_sorted_names() {
        let (_dir, path) = setup_test_data();
        let adapter = CsvAdapter::new(path);

        let symbols = adapter.list_symbols().unwrap();
        assert_eq!(symbols, vec!["BTC-USD", "ETH-USD"]);
    }

    #[test]
    fn data_range_reports_bounds_and_count() {
        let (_dir, path) = setup_test_data();
        let adapter = CsvAdapter::new(path);

        let range = adapter.data_range("BTC-USD").unwrap();
        assert_eq!(
            range,
            Some((
                NaiveDate::from_ymd_opt(2024, 1, 15).unwrap(),
                NaiveDate::from_ymd_opt(2024, 1, 17).unwrap(),
                3,
            ))
        );
    }

    #[test]
    fn data_range_is_none_for_empty_file() {
        let (_dir, path) = setup_test_data();
        let adapter = CsvAdapter::new(path);

        assert_eq!(adapter.data_range("ETH-USD").unwrap(), None);
    }
}
