//! Market aggregate and the all-share composite index.

use chrono::{DateTime, Utc};
use rayon::prelude::*;

use crate::domain::instrument::Instrument;

/// Collection of instruments. Symbols are not deduplicated.
#[derive(Debug, Default)]
pub struct Market {
    instruments: Vec<Instrument>,
}

impl Market {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, instrument: Instrument) {
        tracing::debug!(symbol = instrument.symbol(), kind = %instrument.kind(), "instrument registered");
        self.instruments.push(instrument);
    }

    pub fn instruments(&self) -> &[Instrument] {
        &self.instruments
    }

    /// First instrument registered under `symbol`.
    pub fn get(&self, symbol: &str) -> Option<&Instrument> {
        self.instruments.iter().find(|i| i.symbol() == symbol)
    }

    pub fn get_mut(&mut self, symbol: &str) -> Option<&mut Instrument> {
        self.instruments.iter_mut().find(|i| i.symbol() == symbol)
    }

    pub fn len(&self) -> usize {
        self.instruments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instruments.is_empty()
    }

    /// Geometric mean of every instrument's windowed price at `as_of`.
    ///
    /// Instruments with no trades in the window are left out; 0.0 when none
    /// remain.
    pub fn composite_index(&self, as_of: DateTime<Utc>) -> f64 {
        let prices: Vec<f64> = self
            .instruments
            .par_iter()
            .filter_map(|instrument| instrument.volume_weighted_price(as_of))
            .collect();

        let excluded = self.instruments.len() - prices.len();
        if excluded > 0 {
            tracing::debug!(excluded, %as_of, "instruments without trades left out of index");
        }

        geometric_mean(&prices).unwrap_or(0.0)
    }
}

/// exp(mean(ln p)); `None` for an empty slice.
pub fn geometric_mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    let log_sum: f64 = values.iter().map(|v| v.ln()).sum();
    Some((log_sum / values.len() as f64).exp())
}
