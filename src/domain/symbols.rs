//! Symbol list parsing for market configuration.

use std::collections::HashSet;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SymbolListError {
    #[error("empty token in symbol list")]
    EmptyToken,

    #[error("duplicate symbol: {0}")]
    DuplicateSymbol(String),
}

/// Splits a comma-separated list into trimmed, uppercased symbols.
pub fn parse_symbols(input: &str) -> Result<Vec<String>, SymbolListError> {
    let mut symbols = Vec::new();
    let mut seen = HashSet::new();

    for token in input.split(',') {
        let trimmed = token.trim();
        if trimmed.is_empty() {
            return Err(SymbolListError::EmptyToken);
        }
        let symbol = trimmed.to_uppercase();
        if !seen.insert(symbol.clone()) {
            return Err(SymbolListError::DuplicateSymbol(symbol));
        }
        symbols.push(symbol);
    }

    Ok(symbols)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_basic_list() {
        let result = parse_symbols("TEA,POP,ALE,GIN,JOE").unwrap();
        assert_eq!(result, vec!["TEA", "POP", "ALE", "GIN", "JOE"]);
    }

    #[test]
    fn trims_and_uppercases() {
        let result = parse_symbols("  tea , Pop ,ale").unwrap();
        assert_eq!(result, vec!["TEA", "POP", "ALE"]);
    }

    #[test]
    fn single_symbol() {
        assert_eq!(parse_symbols("GIN").unwrap(), vec!["GIN"]);
    }

    #[test]
    fn empty_token_rejected() {
        assert_eq!(parse_symbols("TEA,,POP"), Err(SymbolListError::EmptyToken));
        assert_eq!(parse_symbols(""), Err(SymbolListError::EmptyToken));
    }

    #[test]
    fn duplicate_rejected_case_insensitively() {
        let result = parse_symbols("TEA,POP,tea");
        assert!(matches!(result, Err(SymbolListError::DuplicateSymbol(s)) if s == "TEA"));
    }
}
