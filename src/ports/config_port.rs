//! Configuration access port trait.

use crate::domain::error::MarketError;

pub trait ConfigPort {
    /// Trimmed value; a blank value counts as absent.
    fn get_string(&self, section: &str, key: &str) -> Option<String>;

    /// `Ok(None)` when the key is absent; `ConfigInvalid` when the value is
    /// not a recognised boolean.
    fn get_bool(&self, section: &str, key: &str) -> Result<Option<bool>, MarketError>;

    /// Every section name present, lowercased.
    fn sections(&self) -> Vec<String>;
}
