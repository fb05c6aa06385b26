//! Statutory table loading and bracket lookup.
//!
//! This module provides the [`TaxTables`] type holding the embedded
//! progressive-tax, salary-credit and retirement-rate tables plus the
//! per-year contribution parameters, and the shared greatest-lower-limit
//! bracket lookup used by every table-driven calculation.

use rust_decimal::Decimal;
use serde::Deserialize;
use std::collections::HashMap;

use crate::error::{EngineError, EngineResult};

use super::types::{BracketRow, ContributionParameters, CreditRow, RateBracket};

/// The pay-period lengths (in days) with published tax and credit tables.
pub const SUPPORTED_PERIODS: [u32; 5] = [1, 7, 10, 15, 30];

const ISR_TABLES_YAML: &str = include_str!("data/isr_tables.yaml");
const SALARY_CREDIT_YAML: &str = include_str!("data/salary_credit.yaml");
const RCV_TABLES_YAML: &str = include_str!("data/rcv_tables.yaml");
const PARAMETERS_YAML: &str = include_str!("data/parameters.yaml");

/// A table row addressable by its lower limit.
pub trait BracketBound {
    /// The inclusive lower bound of the row's range.
    fn lower_limit(&self) -> Decimal;
}

impl BracketBound for BracketRow {
    fn lower_limit(&self) -> Decimal {
        self.lower_limit
    }
}

impl BracketBound for CreditRow {
    fn lower_limit(&self) -> Decimal {
        self.lower_limit
    }
}

impl BracketBound for RateBracket {
    fn lower_limit(&self) -> Decimal {
        self.lower_limit
    }
}

/// Finds the row with the greatest `lower_limit` that is `<= amount`.
///
/// Returns `None` when the amount is below every row's lower limit (for
/// well-formed tables this only happens below the smallest limit, 0.01).
/// If two rows tie on `lower_limit` the first encountered wins; well-formed
/// tables never tie.
pub fn lookup_bracket<R: BracketBound>(rows: &[R], amount: Decimal) -> Option<&R> {
    let mut best: Option<&R> = None;
    for row in rows {
        if row.lower_limit() <= amount
            && best.is_none_or(|current| row.lower_limit() > current.lower_limit())
        {
            best = Some(row);
        }
    }
    best
}

#[derive(Debug, Deserialize)]
struct IsrTablesFile {
    periods: HashMap<u32, Vec<BracketRow>>,
}

#[derive(Debug, Deserialize)]
struct CreditTablesFile {
    periods: HashMap<u32, Vec<CreditRow>>,
}

#[derive(Debug, Deserialize)]
struct RcvLimitRow {
    lower_limit: Decimal,
    #[serde(default)]
    upper_limit: Option<Decimal>,
}

#[derive(Debug, Deserialize)]
struct RcvTablesFile {
    limits: Vec<RcvLimitRow>,
    rates_by_year: HashMap<u16, Vec<Decimal>>,
}

#[derive(Debug, Deserialize)]
struct ParametersFile {
    years: HashMap<u16, ContributionParameters>,
}

/// The complete set of statutory tables and parameters.
///
/// Parsed once from the YAML files embedded in the binary and shared
/// read-only for the life of the process; calculations never mutate it.
///
/// # Example
///
/// ```
/// use nomina_engine::config::TaxTables;
/// use rust_decimal::Decimal;
/// use std::str::FromStr;
///
/// let tables = TaxTables::embedded().unwrap();
/// let table = tables.isr_table(15).unwrap();
/// assert_eq!(table[0].lower_limit, Decimal::from_str("0.01").unwrap());
/// ```
#[derive(Debug, Clone)]
pub struct TaxTables {
    isr: HashMap<u32, Vec<BracketRow>>,
    credit: HashMap<u32, Vec<CreditRow>>,
    rcv: HashMap<u16, Vec<RateBracket>>,
    parameters: HashMap<u16, ContributionParameters>,
}

impl TaxTables {
    /// Parses the embedded statutory tables.
    ///
    /// Fails with [`EngineError::TableParse`] if any embedded file is
    /// malformed; the files ship inside the binary, so this is defensive.
    pub fn embedded() -> EngineResult<Self> {
        let isr: IsrTablesFile = parse_yaml("isr_tables", ISR_TABLES_YAML)?;
        let credit: CreditTablesFile = parse_yaml("salary_credit", SALARY_CREDIT_YAML)?;
        let rcv_file: RcvTablesFile = parse_yaml("rcv_tables", RCV_TABLES_YAML)?;
        let parameters: ParametersFile = parse_yaml("parameters", PARAMETERS_YAML)?;

        let mut rcv = HashMap::new();
        for (year, rates) in rcv_file.rates_by_year {
            if rates.len() != rcv_file.limits.len() {
                return Err(EngineError::TableParse {
                    table: "rcv_tables".to_string(),
                    message: format!(
                        "year {} has {} rates for {} wage ranges",
                        year,
                        rates.len(),
                        rcv_file.limits.len()
                    ),
                });
            }
            let brackets = rcv_file
                .limits
                .iter()
                .zip(rates)
                .map(|(limit, rate)| RateBracket {
                    lower_limit: limit.lower_limit,
                    upper_limit: limit.upper_limit,
                    rate,
                })
                .collect();
            rcv.insert(year, brackets);
        }

        Ok(Self {
            isr: isr.periods,
            credit: credit.periods,
            rcv,
            parameters: parameters.years,
        })
    }

    /// Returns the progressive-tax table for a pay-period length.
    pub fn isr_table(&self, period_days: u32) -> EngineResult<&[BracketRow]> {
        self.isr
            .get(&period_days)
            .map(Vec::as_slice)
            .ok_or(EngineError::UnsupportedPeriod { days: period_days })
    }

    /// Returns the salary-credit table for a pay-period length.
    pub fn credit_table(&self, period_days: u32) -> EngineResult<&[CreditRow]> {
        self.credit
            .get(&period_days)
            .map(Vec::as_slice)
            .ok_or(EngineError::UnsupportedPeriod { days: period_days })
    }

    /// Returns the retirement-rate table for a contribution year.
    pub fn rcv_table(&self, year: u16) -> EngineResult<&[RateBracket]> {
        self.rcv
            .get(&year)
            .map(Vec::as_slice)
            .ok_or(EngineError::UnsupportedYear { year })
    }

    /// Returns the contribution parameters for a tax year.
    pub fn parameters(&self, year: u16) -> EngineResult<&ContributionParameters> {
        self.parameters
            .get(&year)
            .ok_or(EngineError::UnsupportedYear { year })
    }
}

fn parse_yaml<T: serde::de::DeserializeOwned>(table: &str, source: &str) -> EngineResult<T> {
    serde_yaml::from_str(source).map_err(|e| EngineError::TableParse {
        table: table.to_string(),
        message: e.to_string(),
    })
}
