//! Configuration validation.
//!
//! Checks the `[market]` section and every instrument section before a market
//! is built from them.

use crate::domain::error::MarketError;
use crate::domain::instrument::KindName;
use crate::domain::symbols::parse_symbols;
use crate::ports::config_port::ConfigPort;

pub const MARKET_SECTION: &str = "market";
pub const TRADES_SECTION: &str = "trades";

/// Validates the whole file and returns the configured symbols in order.
pub fn validate_market_config(config: &dyn ConfigPort) -> Result<Vec<String>, MarketError> {
    let symbols = configured_symbols(config)?;
    for symbol in &symbols {
        validate_instrument_section(config, symbol)?;
    }
    config.get_bool(TRADES_SECTION, "required")?;
    for section in unlisted_sections(config, &symbols) {
        tracing::warn!(section = %section, "section is not listed in [market] symbols; ignored");
    }
    Ok(symbols)
}

/// Sections that are neither reserved nor named in `symbols`.
pub fn unlisted_sections(config: &dyn ConfigPort, symbols: &[String]) -> Vec<String> {
    config
        .sections()
        .into_iter()
        .filter(|section| {
            section != MARKET_SECTION
                && section != TRADES_SECTION
                && section != "default"
                && !symbols.iter().any(|s| s.eq_ignore_ascii_case(section))
        })
        .collect()
}

pub fn configured_symbols(config: &dyn ConfigPort) -> Result<Vec<String>, MarketError> {
    let raw = match config.get_string(MARKET_SECTION, "symbols") {
        Some(s) if !s.trim().is_empty() => s,
        _ => {
            return Err(MarketError::ConfigMissing {
                section: MARKET_SECTION.to_string(),
                key: "symbols".to_string(),
            })
        }
    };
    parse_symbols(&raw).map_err(|e| MarketError::ConfigInvalid {
        section: MARKET_SECTION.to_string(),
        key: "symbols".to_string(),
        reason: e.to_string(),
    })
}

pub fn validate_instrument_section(
    config: &dyn ConfigPort,
    symbol: &str,
) -> Result<(), MarketError> {
    let kind = validate_kind(config, symbol)?;
    validate_last_dividend(config, symbol)?;
    validate_par_value(config, symbol)?;
    if kind == KindName::Preferred {
        validate_fixed_dividend(config, symbol)?;
    }
    Ok(())
}

/// Reads an optional numeric key, distinguishing absent from malformed.
pub fn get_number(
    config: &dyn ConfigPort,
    section: &str,
    key: &str,
) -> Result<Option<f64>, MarketError> {
    match config.get_string(section, key) {
        None => Ok(None),
        Some(s) if s.trim().is_empty() => Ok(None),
        Some(s) => match s.trim().parse::<f64>() {
            Ok(value) if value.is_finite() => Ok(Some(value)),
            _ => Err(MarketError::ConfigInvalid {
                section: section.to_string(),
                key: key.to_string(),
                reason: format!("expected a finite number, got '{}'", s.trim()),
            }),
        },
    }
}

pub fn require_number(
    config: &dyn ConfigPort,
    section: &str,
    key: &str,
) -> Result<f64, MarketError> {
    get_number(config, section, key)?.ok_or_else(|| MarketError::ConfigMissing {
        section: section.to_string(),
        key: key.to_string(),
    })
}

pub fn validate_kind(config: &dyn ConfigPort, symbol: &str) -> Result<KindName, MarketError> {
    let raw = config
        .get_string(symbol, "kind")
        .ok_or_else(|| MarketError::ConfigMissing {
            section: symbol.to_string(),
            key: "kind".to_string(),
        })?;
    raw.parse::<KindName>()
        .map_err(|e| MarketError::ConfigInvalid {
            section: symbol.to_string(),
            key: "kind".to_string(),
            reason: e.reason,
        })
}

fn validate_last_dividend(config: &dyn ConfigPort, symbol: &str) -> Result<(), MarketError> {
    let value = get_number(config, symbol, "last_dividend")?.unwrap_or(0.0);
    if value < 0.0 {
        return Err(MarketError::ConfigInvalid {
            section: symbol.to_string(),
            key: "last_dividend".to_string(),
            reason: "last_dividend must be non-negative".to_string(),
        });
    }
    Ok(())
}

fn validate_par_value(config: &dyn ConfigPort, symbol: &str) -> Result<(), MarketError> {
    let value = require_number(config, symbol, "par_value")?;
    if value <= 0.0 {
        return Err(MarketError::ConfigInvalid {
            section: symbol.to_string(),
            key: "par_value".to_string(),
            reason: "par_value must be positive".to_string(),
        });
    }
    Ok(())
}

fn validate_fixed_dividend(config: &dyn ConfigPort, symbol: &str) -> Result<(), MarketError> {
    let value = require_number(config, symbol, "fixed_dividend")?;
    if !(0.0..=1.0).contains(&value) {
        return Err(MarketError::ConfigInvalid {
            section: symbol.to_string(),
            key: "fixed_dividend".to_string(),
            reason: "fixed_dividend must be between 0 and 1".to_string(),
        });
    }
    Ok(())
}
