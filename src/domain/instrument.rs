//! Instruments and their valuation formulas.

use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use std::fmt;
use std::str::FromStr;

use crate::domain::error::{DomainError, MarketError, ValidationError};
use crate::domain::ledger::{TradeLedger, Window};
use crate::domain::trade::{Side, TradeRecord};

/// Fixed trailing window for [`Instrument::volume_weighted_price`].
pub const VWAP_WINDOW_MINUTES: u32 = 15;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InstrumentKind {
    Common,
    Preferred { fixed_dividend_rate: f64 },
}

impl InstrumentKind {
    pub fn name(&self) -> &'static str {
        match self {
            InstrumentKind::Common => "Common",
            InstrumentKind::Preferred { .. } => "Preferred",
        }
    }
}

impl fmt::Display for InstrumentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Kind name as written in configuration, before the fixed rate is attached.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KindName {
    Common,
    Preferred,
}

impl FromStr for KindName {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "common" => Ok(KindName::Common),
            "preferred" => Ok(KindName::Preferred),
            _ => Err(ValidationError::new(
                "kind",
                "kind must be 'Common' or 'Preferred'",
            )),
        }
    }
}

/// One traded symbol. The ledger is behind a read/write lock so trades can be
/// recorded through `&self` while window queries see a consistent snapshot.
#[derive(Debug)]
pub struct Instrument {
    symbol: String,
    kind: InstrumentKind,
    last_dividend: f64,
    par_value: f64,
    ledger: RwLock<TradeLedger>,
}

impl Instrument {
    pub fn new(
        symbol: impl Into<String>,
        kind: InstrumentKind,
        last_dividend: f64,
        par_value: f64,
    ) -> Result<Self, ValidationError> {
        if !last_dividend.is_finite() || last_dividend < 0.0 {
            return Err(ValidationError::new(
                "last_dividend",
                "last dividend must be a non-negative number",
            ));
        }
        if let InstrumentKind::Preferred { fixed_dividend_rate } = kind {
            if !(0.0..=1.0).contains(&fixed_dividend_rate) {
                return Err(ValidationError::new(
                    "fixed_dividend",
                    "fixed dividend for Preferred stock must be a number between 0 and 1",
                ));
            }
        }
        if !par_value.is_finite() || par_value <= 0.0 {
            return Err(ValidationError::new(
                "par_value",
                "par value must be a positive number",
            ));
        }
        Ok(Self {
            symbol: symbol.into(),
            kind,
            last_dividend,
            par_value,
            ledger: RwLock::new(TradeLedger::new()),
        })
    }

    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    pub fn kind(&self) -> InstrumentKind {
        self.kind
    }

    pub fn last_dividend(&self) -> f64 {
        self.last_dividend
    }

    pub fn par_value(&self) -> f64 {
        self.par_value
    }

    pub fn trade_count(&self) -> usize {
        self.ledger.read().len()
    }

    /// Common: last_dividend / price. Preferred: fixed_rate * par_value / price.
    ///
    /// Pure; use [`Instrument::update_last_dividend`] to store the result.
    pub fn dividend_yield(&self, price: f64) -> Result<f64, ValidationError> {
        validate_price(price)?;
        let yield_ = match self.kind {
            InstrumentKind::Common => self.last_dividend / price,
            InstrumentKind::Preferred {
                fixed_dividend_rate,
            } => fixed_dividend_rate * self.par_value / price,
        };
        Ok(yield_)
    }

    pub fn update_last_dividend(&mut self, value: f64) -> Result<(), ValidationError> {
        if !value.is_finite() || value < 0.0 {
            return Err(ValidationError::new(
                "last_dividend",
                "last dividend must be a non-negative number",
            ));
        }
        tracing::debug!(symbol = %self.symbol, old = self.last_dividend, new = value, "last dividend updated");
        self.last_dividend = value;
        Ok(())
    }

    /// price / dividend_yield(price). A zero yield has no ratio.
    pub fn price_earnings_ratio(&self, price: f64) -> Result<f64, MarketError> {
        let yield_ = self.dividend_yield(price)?;
        if yield_ == 0.0 {
            return Err(DomainError {
                reason: "cannot calculate P/E ratio when dividend yield is zero".into(),
            }
            .into());
        }
        Ok(price / yield_)
    }

    pub fn record(
        &self,
        occurred_at: DateTime<Utc>,
        quantity: i64,
        side: Side,
        price: f64,
    ) -> Result<(), ValidationError> {
        let trade = TradeRecord::new(occurred_at, quantity, side, price)?;
        self.record_trade(trade);
        Ok(())
    }

    pub fn record_trade(&self, trade: TradeRecord) {
        self.ledger.write().record_trade(trade);
    }

    /// Windowed VWAP over the trailing [`VWAP_WINDOW_MINUTES`].
    pub fn volume_weighted_price(&self, as_of: DateTime<Utc>) -> Option<f64> {
        self.ledger
            .read()
            .windowed_vwap(as_of, Window::minutes(VWAP_WINDOW_MINUTES))
    }

    /// Most recently executed trade, regardless of window.
    pub fn last_trade(&self) -> Option<TradeRecord> {
        self.ledger.read().latest().cloned()
    }
}

fn validate_price(price: f64) -> Result<(), ValidationError> {
    if !price.is_finite() || price <= 0.0 {
        return Err(ValidationError::new(
            "price",
            "price must be a positive number",
        ));
    }
    Ok(())
}
