//! Statutory configuration for the payroll engine.
//!
//! This module contains the strongly-typed table structures, the embedded
//! statutory data (progressive-tax tables, salary-credit tables,
//! retirement-rate tables, per-year contribution parameters) and the shared
//! bracket lookup.

mod tables;
mod types;

pub use tables::{BracketBound, SUPPORTED_PERIODS, TaxTables, lookup_bracket};
pub use types::{BracketRow, ContributionParameters, CreditRow, RateBracket, RiskClass};
