//! Trade history source port trait.

use crate::domain::error::MarketError;
use crate::domain::trade::TradeRecord;

pub trait TradePort {
    /// All recorded executions for `symbol`, in any order.
    fn fetch_trades(&self, symbol: &str) -> Result<Vec<TradeRecord>, MarketError>;
}
