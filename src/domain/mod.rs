//! Core domain types and logic.

pub mod trade;
pub mod ledger;
pub mod instrument;
pub mod market;
pub mod symbols;
pub mod config_validation;
pub mod error;
