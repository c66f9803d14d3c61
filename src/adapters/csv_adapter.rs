//! CSV trade history adapter.
//!
//! One file per symbol, `<base>/<SYMBOL>.csv`, with header
//! `timestamp,quantity,side,price` and RFC 3339 timestamps.

use crate::domain::error::MarketError;
use crate::domain::trade::{Side, TradeRecord};
use crate::ports::trade_port::TradePort;
use chrono::{DateTime, Utc};
use std::fs;
use std::io::ErrorKind;
use std::path::PathBuf;

pub struct CsvAdapter {
    base_path: PathBuf,
}

impl CsvAdapter {
    pub fn new(base_path: PathBuf) -> Self {
        Self { base_path }
    }

    pub fn csv_path(&self, symbol: &str) -> PathBuf {
        self.base_path.join(format!("{}.csv", symbol))
    }
}

fn column<'a>(
    record: &'a csv::StringRecord,
    index: usize,
    name: &str,
    line: u64,
) -> Result<&'a str, MarketError> {
    record
        .get(index)
        .map(str::trim)
        .ok_or_else(|| MarketError::Data {
            reason: format!("line {}: missing {} column", line, name),
        })
}

fn parse_row(record: &csv::StringRecord) -> Result<TradeRecord, MarketError> {
    let line = record.position().map(|p| p.line()).unwrap_or(0);

    let ts = column(record, 0, "timestamp", line)?;
    let occurred_at = DateTime::parse_from_rfc3339(ts)
        .map(|t| t.with_timezone(&Utc))
        .map_err(|e| MarketError::Data {
            reason: format!("line {}: invalid timestamp '{}': {}", line, ts, e),
        })?;

    let quantity: i64 = column(record, 1, "quantity", line)?
        .parse()
        .map_err(|e| MarketError::Data {
            reason: format!("line {}: invalid quantity: {}", line, e),
        })?;

    let side: Side = column(record, 2, "side", line)?.parse()?;

    let price: f64 = column(record, 3, "price", line)?
        .parse()
        .map_err(|e| MarketError::Data {
            reason: format!("line {}: invalid price: {}", line, e),
        })?;

    Ok(TradeRecord::new(occurred_at, quantity, side, price)?)
}

impl TradePort for CsvAdapter {
    fn fetch_trades(&self, symbol: &str) -> Result<Vec<TradeRecord>, MarketError> {
        let path = self.csv_path(symbol);
        let content = fs::read_to_string(&path).map_err(|e| match e.kind() {
            ErrorKind::NotFound => MarketError::TradesNotFound {
                path: path.display().to_string(),
            },
            _ => MarketError::Data {
                reason: format!("failed to read {}: {}", path.display(), e),
            },
        })?;

        let mut rdr = csv::Reader::from_reader(content.as_bytes());
        let mut trades = Vec::new();

        for result in rdr.records() {
            let record = result.map_err(|e| MarketError::Data {
                reason: format!("CSV parse error: {}", e),
            })?;
            trades.push(parse_row(&record)?);
        }

        tracing::debug!(symbol, path = %path.display(), trades = trades.len(), "trade file loaded");
        Ok(trades)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use tempfile::TempDir;

    fn setup_test_data() -> (TempDir, PathBuf) {
        let dir = TempDir::new().unwrap();
        let path = dir.path().to_path_buf();

        let csv_content = "timestamp,quantity,side,price\n\
            2024-03-01T11:54:00Z,50,buy,120\n\
            2024-03-01T11:53:00Z,30,sell,110.0\n\
            2024-03-01T13:50:00+02:00,20,BUY,130.5\n";

        fs::write(path.join("TEA.csv"), csv_content).unwrap();
        fs::write(path.join("POP.csv"), "timestamp,quantity,side,price\n").unwrap();

        (dir, path)
    }

    #[test]
    fn fetch_trades_returns_rows() {
        let (_dir, path) = setup_test_data();
        let adapter = CsvAdapter::new(path);

        let trades = adapter.fetch_trades("TEA").unwrap();
        assert_eq!(trades.len(), 3);
        assert_eq!(
            trades[0].occurred_at(),
            Utc.with_ymd_and_hms(2024, 3, 1, 11, 54, 0).unwrap()
        );
        assert_eq!(trades[0].quantity(), 50);
        assert_eq!(trades[0].side(), Side::Buy);
        assert_eq!(trades[1].side(), Side::Sell);
        assert_eq!(trades[0].price(), 120.0);
    }

    #[test]
    fn offsets_are_normalised_to_utc() {
        let (_dir, path) = setup_test_data();
        let adapter = CsvAdapter::new(path);

        let trades = adapter.fetch_trades("TEA").unwrap();
        assert_eq!(
            trades[2].occurred_at(),
            Utc.with_ymd_and_hms(2024, 3, 1, 11, 50, 0).unwrap()
        );
    }

    #[test]
    fn header_only_file_is_empty() {
        let (_dir, path) = setup_test_data();
        let adapter = CsvAdapter::new(path);
        assert!(adapter.fetch_trades("POP").unwrap().is_empty());
    }

    #[test]
    fn missing_file_is_not_found() {
        let (_dir, path) = setup_test_data();
        let adapter = CsvAdapter::new(path);
        let err = adapter.fetch_trades("XYZ").unwrap_err();
        assert!(matches!(err, MarketError::TradesNotFound { path } if path.ends_with("XYZ.csv")));
    }

    #[test]
    fn unreadable_path_is_data_error() {
        let (_dir, path) = setup_test_data();
        fs::create_dir(path.join("DIR.csv")).unwrap();
        let adapter = CsvAdapter::new(path);
        let err = adapter.fetch_trades("DIR").unwrap_err();
        assert!(matches!(err, MarketError::Data { .. }));
    }

    #[test]
    fn invalid_timestamp_is_data_error() {
        let (_dir, path) = setup_test_data();
        fs::write(
            path.join("ALE.csv"),
            "timestamp,quantity,side,price\nyesterday,10,buy,100\n",
        )
        .unwrap();
        let adapter = CsvAdapter::new(path);
        let err = adapter.fetch_trades("ALE").unwrap_err();
        assert!(matches!(err, MarketError::Data { reason } if reason.contains("invalid timestamp")));
    }

    #[test]
    fn invalid_trade_fields_are_validation_errors() {
        let (_dir, path) = setup_test_data();
        fs::write(
            path.join("JOE.csv"),
            "timestamp,quantity,side,price\n2024-03-01T11:54:00Z,0,buy,100\n",
        )
        .unwrap();
        fs::write(
            path.join("GIN.csv"),
            "timestamp,quantity,side,price\n2024-03-01T11:54:00Z,5,hold,100\n",
        )
        .unwrap();
        let adapter = CsvAdapter::new(path);
        assert!(matches!(
            adapter.fetch_trades("JOE").unwrap_err(),
            MarketError::Validation(e) if e.field == "quantity"
        ));
        assert!(matches!(
            adapter.fetch_trades("GIN").unwrap_err(),
            MarketError::Validation(e) if e.field == "side"
        ));
    }
}
