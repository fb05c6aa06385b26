//! Calculation logic for the payroll engine.
//!
//! This module contains the contribution engine (IMSS), the progressive
//! income-tax engine (ISR), the retirement/severance sub-calculation (RCV),
//! the traditional-vs-alternative scheme comparison, the per-salary pipeline
//! with batch processing, and the batch aggregator.

mod batch;
mod contribution;
mod income_tax;
mod retirement;
mod scheme_comparison;
mod totals;

pub use batch::{
    BatchInput, BatchOptions, BatchOutcome, CalculationInput, SchemeParams, SkippedRecord,
    calculate_record, process_batch,
};
pub use contribution::{ContributionBreakdown, ContributionEngine, WageBasis};
pub use income_tax::{IncomeTaxEngine, TaxAssessment};
pub use retirement::retirement_contribution;
pub use scheme_comparison::{
    CommissionBase, SchemeComparison, SchemeMode, SchemeOptions, SchemeOutcome,
};
pub use totals::{BatchTotals, aggregate_totals};
