//! Data models for transactions, the ledger and configuration.

pub mod config;
pub mod ledger;
pub mod transaction;
