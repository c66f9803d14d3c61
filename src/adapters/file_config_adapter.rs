//! INI market configuration adapter.
//!
//! Section and key lookups are case-insensitive, so `[TEA]` and `[tea]` name
//! the same instrument.

use crate::domain::error::MarketError;
use crate::ports::config_port::ConfigPort;
use configparser::ini::Ini;
use std::path::Path;

#[derive(Debug)]
pub struct FileConfigAdapter {
    config: Ini,
}

impl FileConfigAdapter {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, MarketError> {
        let path = path.as_ref();
        let mut config = Ini::new();
        config
            .load(path)
            .map_err(|reason| MarketError::ConfigParse {
                file: path.display().to_string(),
                reason,
            })?;
        Ok(Self { config })
    }

    pub fn from_string(content: &str) -> Result<Self, MarketError> {
        let mut config = Ini::new();
        config
            .read(content.to_string())
            .map_err(|reason| MarketError::ConfigParse {
                file: "<inline>".to_string(),
                reason,
            })?;
        Ok(Self { config })
    }

    fn parse_bool(value: &str) -> Option<bool> {
        match value.to_lowercase().as_str() {
            "true" | "yes" | "on" | "1" => Some(true),
            "false" | "no" | "off" | "0" => Some(false),
            _ => None,
        }
    }
}

impl ConfigPort for FileConfigAdapter {
    fn get_string(&self, section: &str, key: &str) -> Option<String> {
        self.config
            .get(section, key)
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    }

    fn get_bool(&self, section: &str, key: &str) -> Result<Option<bool>, MarketError> {
        let Some(raw) = self.get_string(section, key) else {
            return Ok(None);
        };
        Self::parse_bool(&raw)
            .map(Some)
            .ok_or_else(|| MarketError::ConfigInvalid {
                section: section.to_string(),
                key: key.to_string(),
                reason: format!("expected true/false, got '{}'", raw),
            })
    }

    fn sections(&self) -> Vec<String> {
        self.config.sections()
    }
}
