//! Domain error types.

/// Malformed input to a constructor or query.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("invalid {field}: {reason}")]
pub struct ValidationError {
    pub field: &'static str,
    pub reason: String,
}

impl ValidationError {
    pub fn new(field: &'static str, reason: impl Into<String>) -> Self {
        Self {
            field,
            reason: reason.into(),
        }
    }
}

/// A mathematically undefined result for otherwise valid inputs.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("indeterminate result: {reason}")]
pub struct DomainError {
    pub reason: String,
}

/// Top-level error type for gbce.
#[derive(Debug, thiserror::Error)]
pub enum MarketError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error("config parse error in {file}: {reason}")]
    ConfigParse { file: String, reason: String },

    #[error("missing config key [{section}] {key}")]
    ConfigMissing { section: String, key: String },

    #[error("invalid config value [{section}] {key}: {reason}")]
    ConfigInvalid {
        section: String,
        key: String,
        reason: String,
    },

    #[error("unknown symbol: {symbol}")]
    UnknownSymbol { symbol: String },

    #[error("no trade history at {path}")]
    TradesNotFound { path: String },

    #[error("trade data error: {reason}")]
    Data { reason: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl MarketError {
    /// Process exit status reported by the CLI for this error.
    pub fn exit_status(&self) -> u8 {
        match self {
            MarketError::Io(_) => 1,
            MarketError::ConfigParse { .. }
            | MarketError::ConfigMissing { .. }
            | MarketError::ConfigInvalid { .. } => 2,
            MarketError::TradesNotFound { .. } | MarketError::Data { .. } => 3,
            MarketError::Validation(_) | MarketError::UnknownSymbol { .. } => 4,
            MarketError::Domain(_) => 5,
        }
    }
}

impl From<&MarketError> for std::process::ExitCode {
    fn from(err: &MarketError) -> Self {
        std::process::ExitCode::from(err.exit_status())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_error_names_field() {
        let err = ValidationError::new("price", "price must be a positive number");
        assert_eq!(
            err.to_string(),
            "invalid price: price must be a positive number"
        );
    }

    #[test]
    fn market_error_wraps_domain_error_transparently() {
        let err = MarketError::from(DomainError {
            reason: "dividend yield is zero".into(),
        });
        assert_eq!(err.to_string(), "indeterminate result: dividend yield is zero");
    }

    #[test]
    fn exit_status_by_category() {
        let cases = [
            (
                MarketError::ConfigMissing {
                    section: "market".into(),
                    key: "symbols".into(),
                },
                2,
            ),
            (
                MarketError::Data {
                    reason: "bad row".into(),
                },
                3,
            ),
            (
                MarketError::TradesNotFound {
                    path: "trades/TEA.csv".into(),
                },
                3,
            ),
            (
                MarketError::UnknownSymbol {
                    symbol: "XYZ".into(),
                },
                4,
            ),
            (
                MarketError::Domain(DomainError {
                    reason: "zero".into(),
                }),
                5,
            ),
        ];
        for (err, expected) in cases {
            assert_eq!(err.exit_status(), expected);
        }
    }
}
