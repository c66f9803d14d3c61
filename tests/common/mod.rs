#![allow(dead_code)]

use chrono::{DateTime, TimeDelta, TimeZone, Utc};
use gbce::domain::error::MarketError;
use gbce::domain::instrument::{Instrument, InstrumentKind};
use gbce::domain::market::Market;
use gbce::domain::trade::{Side, TradeRecord};
use gbce::ports::trade_port::TradePort;
use std::collections::HashMap;

pub struct MockTradePort {
    pub trades: HashMap<String, Vec<TradeRecord>>,
    pub errors: HashMap<String, String>,
    pub missing: Vec<String>,
}

impl MockTradePort {
    pub fn new() -> Self {
        Self {
            trades: HashMap::new(),
            errors: HashMap::new(),
            missing: Vec::new(),
        }
    }

    pub fn with_trades(mut self, symbol: &str, trades: Vec<TradeRecord>) -> Self {
        self.trades.insert(symbol.to_string(), trades);
        self
    }

    pub fn with_error(mut self, symbol: &str, reason: &str) -> Self {
        self.errors.insert(symbol.to_string(), reason.to_string());
        self
    }

    pub fn with_missing(mut self, symbol: &str) -> Self {
        self.missing.push(symbol.to_string());
        self
    }
}

impl TradePort for MockTradePort {
    fn fetch_trades(&self, symbol: &str) -> Result<Vec<TradeRecord>, MarketError> {
        if self.missing.iter().any(|s| s == symbol) {
            return Err(MarketError::TradesNotFound {
                path: format!("{}.csv", symbol),
            });
        }
        if let Some(reason) = self.errors.get(symbol) {
            return Err(MarketError::Data {
                reason: reason.clone(),
            });
        }
        Ok(self.trades.get(symbol).cloned().unwrap_or_default())
    }
}

pub fn as_of() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap()
}

pub fn minutes_ago(minutes: i64) -> DateTime<Utc> {
    as_of() - TimeDelta::minutes(minutes)
}

pub fn trade(quantity: i64, side: Side, price: f64, minutes: i64) -> TradeRecord {
    TradeRecord::new(minutes_ago(minutes), quantity, side, price).unwrap()
}

pub fn common(symbol: &str, last_dividend: f64, par_value: f64) -> Instrument {
    Instrument::new(symbol, InstrumentKind::Common, last_dividend, par_value).unwrap()
}

pub fn preferred(symbol: &str, last_dividend: f64, fixed: f64, par_value: f64) -> Instrument {
    Instrument::new(
        symbol,
        InstrumentKind::Preferred {
            fixed_dividend_rate: fixed,
        },
        last_dividend,
        par_value,
    )
    .unwrap()
}

/// Sample trades per symbol: (quantity, side, price, minutes before `as_of`).
pub fn sample_trades() -> Vec<(&'static str, Vec<(i64, Side, f64, i64)>)> {
    vec![
        (
            "TEA",
            vec![
                (50, Side::Buy, 120.0, 6),
                (30, Side::Sell, 110.0, 7),
                (20, Side::Buy, 130.0, 10),
            ],
        ),
        (
            "POP",
            vec![
                (40, Side::Buy, 80.0, 2),
                (20, Side::Sell, 90.0, 8),
                (25, Side::Buy, 85.0, 15),
            ],
        ),
        (
            "ALE",
            vec![
                (60, Side::Buy, 150.0, 3),
                (1150, Side::Sell, 140.0, 16),
                (25, Side::Buy, 160.0, 6),
            ],
        ),
        (
            "GIN",
            vec![
                (25, Side::Buy, 120.0, 4),
                (344, Side::Sell, 130.0, 14),
                (10, Side::Buy, 125.0, 9),
            ],
        ),
        (
            "JOE",
            vec![
                (30, Side::Buy, 200.0, 7),
                (18, Side::Sell, 190.0, 16),
                (22, Side::Buy, 210.0, 13),
            ],
        ),
    ]
}

/// The five-stock sample exchange with its sample trades recorded.
pub fn sample_market() -> Market {
    let mut market = Market::new();
    market.register(common("TEA", 0.0, 100.0));
    market.register(common("POP", 8.0, 100.0));
    market.register(common("ALE", 23.0, 60.0));
    market.register(preferred("GIN", 8.0, 0.02, 100.0));
    market.register(common("JOE", 13.0, 250.0));

    for (symbol, trades) in sample_trades() {
        let instrument = market.get(symbol).unwrap();
        for (qty, side, price, minutes) in trades {
            instrument.record(minutes_ago(minutes), qty, side, price).unwrap();
        }
    }
    market
}

pub const SAMPLE_INI: &str = r#"
[market]
symbols = TEA,POP,ALE,GIN,JOE

[TEA]
kind = Common
last_dividend = 0
par_value = 100

[POP]
kind = Common
last_dividend = 8
par_value = 100

[ALE]
kind = Common
last_dividend = 23
par_value = 60

[GIN]
kind = Preferred
last_dividend = 8
fixed_dividend = 0.02
par_value = 100

[JOE]
kind = Common
last_dividend = 13
par_value = 250
"#;
