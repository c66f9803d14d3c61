//! Trade execution records.

use chrono::{DateTime, Utc};
use std::fmt;
use std::str::FromStr;

use crate::domain::error::ValidationError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Side {
    Buy,
    Sell,
}

impl FromStr for Side {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "buy" => Ok(Side::Buy),
            "sell" => Ok(Side::Sell),
            _ => Err(ValidationError::new(
                "side",
                "side must be 'buy' or 'sell'",
            )),
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Buy => write!(f, "buy"),
            Side::Sell => write!(f, "sell"),
        }
    }
}

/// A single execution. Fields are private so an invalid record can never exist.
#[derive(Debug, Clone, PartialEq)]
pub struct TradeRecord {
    occurred_at: DateTime<Utc>,
    quantity: u64,
    side: Side,
    price: f64,
}

impl TradeRecord {
    /// Validates and builds a trade.
    ///
    /// Quantity is taken signed so that negative input is reported rather than
    /// wrapped by the caller.
    pub fn new(
        occurred_at: DateTime<Utc>,
        quantity: i64,
        side: Side,
        price: f64,
    ) -> Result<Self, ValidationError> {
        if quantity <= 0 {
            return Err(ValidationError::new(
                "quantity",
                "quantity must be a positive integer",
            ));
        }
        if !price.is_finite() || price <= 0.0 {
            return Err(ValidationError::new(
                "price",
                "price must be a positive number",
            ));
        }
        Ok(Self {
            occurred_at,
            quantity: quantity as u64,
            side,
            price,
        })
    }

    pub fn occurred_at(&self) -> DateTime<Utc> {
        self.occurred_at
    }

    pub fn quantity(&self) -> u64 {
        self.quantity
    }

    pub fn side(&self) -> Side {
        self.side
    }

    pub fn price(&self) -> f64 {
        self.price
    }

    /// price * quantity
    pub fn notional(&self) -> f64 {
        self.price * self.quantity as f64
    }
}
