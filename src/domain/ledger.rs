//! Time-ordered trade ledger and windowed VWAP.
//!
//! Trades are indexed by execution time in a `BTreeMap`, so a window query is a
//! descending range walk that touches only the in-window records and never
//! copies or consumes the stored history. Trades sharing a timestamp are kept
//! together in insertion order; their relative order carries no meaning.

use chrono::{DateTime, TimeDelta, Utc};
use std::collections::BTreeMap;

use crate::domain::error::ValidationError;
use crate::domain::trade::{Side, TradeRecord};

/// Trailing duration ending at a query's `as_of` instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Window(TimeDelta);

impl Window {
    pub fn minutes(minutes: u32) -> Self {
        Self(TimeDelta::minutes(i64::from(minutes)))
    }

    /// Earliest instant still inside the window ending at `as_of`.
    pub fn cutoff(&self, as_of: DateTime<Utc>) -> DateTime<Utc> {
        as_of
            .checked_sub_signed(self.0)
            .unwrap_or(DateTime::<Utc>::MIN_UTC)
    }
}

/// Append-only trade history for one instrument.
#[derive(Debug, Clone, Default)]
pub struct TradeLedger {
    trades: BTreeMap<DateTime<Utc>, Vec<TradeRecord>>,
    len: usize,
}

impl TradeLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Validates the fields and appends the resulting trade.
    pub fn record(
        &mut self,
        occurred_at: DateTime<Utc>,
        quantity: i64,
        side: Side,
        price: f64,
    ) -> Result<&TradeRecord, ValidationError> {
        let trade = TradeRecord::new(occurred_at, quantity, side, price)?;
        Ok(self.record_trade(trade))
    }

    /// Appends an already validated trade. No duplicate detection.
    pub fn record_trade(&mut self, trade: TradeRecord) -> &TradeRecord {
        tracing::trace!(
            occurred_at = %trade.occurred_at(),
            quantity = trade.quantity(),
            side = %trade.side(),
            price = trade.price(),
            "trade recorded"
        );
        self.len += 1;
        let bucket = self.trades.entry(trade.occurred_at()).or_default();
        bucket.push(trade);
        &bucket[bucket.len() - 1]
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Most recent trade, if any.
    pub fn latest(&self) -> Option<&TradeRecord> {
        self.trades
            .last_key_value()
            .and_then(|(_, bucket)| bucket.last())
    }

    /// Trades with `as_of - window <= occurred_at <= as_of`, most recent first.
    pub fn trades_in_window(
        &self,
        as_of: DateTime<Utc>,
        window: Window,
    ) -> impl Iterator<Item = &TradeRecord> {
        let cutoff = window.cutoff(as_of);
        self.trades
            .range(cutoff..=as_of)
            .rev()
            .flat_map(|(_, bucket)| bucket.iter())
    }

    /// sum(price * quantity) / sum(quantity) over the window, or `None` when
    /// no trade falls inside it.
    pub fn windowed_vwap(&self, as_of: DateTime<Utc>, window: Window) -> Option<f64> {
        let (notional, quantity, count) = self.trades_in_window(as_of, window).fold(
            (0.0_f64, 0_u128, 0_usize),
            |(notional, quantity, count), trade| {
                (
                    notional + trade.notional(),
                    quantity + u128::from(trade.quantity()),
                    count + 1,
                )
            },
        );

        tracing::trace!(%as_of, trades = count, "window evaluated");

        if quantity == 0 {
            None
        } else {
            Some(notional / quantity as f64)
        }
    }
}
