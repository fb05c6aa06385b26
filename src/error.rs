//! Error types for the payroll calculation engine.
//!
//! This module provides strongly-typed errors using the `thiserror` crate
//! for all error conditions that can occur during a payroll calculation.

use rust_decimal::Decimal;
use thiserror::Error;

/// The main error type for the payroll calculation engine.
///
/// All operations in the engine return this error type, making it easy
/// to handle errors consistently throughout the application.
///
/// # Example
///
/// ```
/// use nomina_engine::error::EngineError;
///
/// let error = EngineError::UnsupportedPeriod { days: 14 };
/// assert_eq!(
///     error.to_string(),
///     "Unsupported pay period: 14 days (supported: 1, 7, 10, 15, 30)"
/// );
/// ```
#[derive(Debug, Error)]
pub enum EngineError {
    /// The risk class code is not one of the statutory classes I through V.
    #[error("Invalid risk class '{value}': must be one of I, II, III, IV, V")]
    InvalidRiskClass {
        /// The risk class code that was rejected.
        value: String,
    },

    /// No tax or credit table exists for the requested pay-period length.
    #[error("Unsupported pay period: {days} days (supported: 1, 7, 10, 15, 30)")]
    UnsupportedPeriod {
        /// The pay-period length in days.
        days: u32,
    },

    /// No retirement-rate table exists for the requested year.
    #[error("Unsupported contribution year: {year} (supported: 2023-2030)")]
    UnsupportedYear {
        /// The requested contribution-table year.
        year: u16,
    },

    /// No bracket row applies to the amount. Well-formed tables cover
    /// `[0, +inf)`, so this is defensive and should be unreachable.
    #[error("No applicable bracket for amount {amount}")]
    NoApplicableBracket {
        /// The amount for which no bracket row was found.
        amount: Decimal,
    },

    /// A declared salary was zero or negative.
    #[error("Invalid salary {value}: must be greater than zero")]
    InvalidSalary {
        /// The salary that was rejected.
        value: Decimal,
    },

    /// A declared salary fell below the statutory minimum for the period
    /// while strict minimum-wage validation was requested.
    #[error("Salary {salary} is below the statutory minimum {minimum} for the period")]
    SalaryBelowMinimum {
        /// The declared period salary.
        salary: Decimal,
        /// The statutory minimum for the same period.
        minimum: Decimal,
    },

    /// Parallel batch input lists had mismatched lengths.
    #[error("Batch input '{field}' has {actual} entries, expected {expected}")]
    BatchShapeMismatch {
        /// The name of the mismatched input list.
        field: String,
        /// The number of entries expected (the salary list length).
        expected: usize,
        /// The number of entries actually supplied.
        actual: usize,
    },

    /// An embedded statutory table failed to parse. Defensive: the tables
    /// ship inside the binary and are covered by tests.
    #[error("Failed to parse statutory table '{table}': {message}")]
    TableParse {
        /// The name of the table that failed to parse.
        table: String,
        /// A description of the parse error.
        message: String,
    },
}

/// A type alias for Results that return EngineError.
pub type EngineResult<T> = Result<T, EngineError>;
