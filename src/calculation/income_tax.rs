//! Progressive income-tax (ISR) calculation.
//!
//! This module provides the [`IncomeTaxEngine`], which assesses bracket-based
//! income tax for a pay period and offsets it with the salary credit. The
//! credit is always looked up by the declared salary, even when the assessed
//! amount is an override.

use rust_decimal::Decimal;

use crate::config::{BracketRow, CreditRow, TaxTables, lookup_bracket};
use crate::error::EngineResult;

/// The result of assessing one amount against the progressive-tax table.
#[derive(Debug, Clone, PartialEq)]
pub struct TaxAssessment {
    /// The matched bracket's lower limit (zero below the smallest bracket).
    pub lower_limit: Decimal,
    /// The taxable surplus over the lower limit.
    pub surplus: Decimal,
    /// The marginal rate applied to the surplus.
    pub rate: Decimal,
    /// Tax on the surplus.
    pub surplus_tax: Decimal,
    /// The bracket's fixed fee.
    pub fixed_fee: Decimal,
    /// Total tax: surplus tax plus fixed fee.
    pub total_tax: Decimal,
    /// The salary credit offsetting the tax.
    pub salary_credit: Decimal,
    /// Tax payable after the credit, never negative.
    pub tax_payable: Decimal,
    /// Tax in favor of the employee after the credit, never negative.
    pub tax_in_favor: Decimal,
}

/// Assesses progressive income tax for one declared salary and pay period.
///
/// # Example
///
/// ```
/// use nomina_engine::calculation::IncomeTaxEngine;
/// use nomina_engine::config::TaxTables;
/// use rust_decimal::Decimal;
/// use std::str::FromStr;
///
/// let tables = TaxTables::embedded().unwrap();
/// let engine = IncomeTaxEngine::new(Decimal::from_str("5710.64").unwrap(), 15, &tables).unwrap();
/// let assessment = engine.assess();
/// assert_eq!(assessment.lower_limit, Decimal::from_str("5490.76").unwrap());
/// assert_eq!(assessment.tax_payable.round_dp(2), Decimal::from_str("476.18").unwrap());
/// ```
#[derive(Debug, Clone)]
pub struct IncomeTaxEngine<'a> {
    declared_salary: Decimal,
    table: &'a [BracketRow],
    credit_table: &'a [CreditRow],
}

impl<'a> IncomeTaxEngine<'a> {
    /// Builds an engine for one declared salary.
    ///
    /// Fails with [`crate::error::EngineError::UnsupportedPeriod`] when no
    /// table exists for the pay-period length.
    pub fn new(
        declared_salary: Decimal,
        period_days: u32,
        tables: &'a TaxTables,
    ) -> EngineResult<Self> {
        Ok(Self {
            declared_salary,
            table: tables.isr_table(period_days)?,
            credit_table: tables.credit_table(period_days)?,
        })
    }

    /// The salary credit for the declared salary, zero when no range applies.
    pub fn salary_credit(&self) -> Decimal {
        lookup_bracket(self.credit_table, self.declared_salary)
            .map(|row| row.credit)
            .unwrap_or(Decimal::ZERO)
    }

    /// Assesses the declared salary.
    pub fn assess(&self) -> TaxAssessment {
        self.assess_amount(self.declared_salary)
    }

    /// Assesses an arbitrary amount, keeping the credit anchored to the
    /// declared salary.
    ///
    /// An amount below the smallest bracket's lower limit is treated as
    /// belonging to the smallest bracket with a lower limit of zero, so the
    /// whole amount is surplus.
    pub fn assess_amount(&self, amount: Decimal) -> TaxAssessment {
        let (lower_limit, rate, fixed_fee) = match lookup_bracket(self.table, amount) {
            Some(row) => (row.lower_limit, row.rate, row.fixed_fee),
            None => self
                .table
                .first()
                .map(|row| (Decimal::ZERO, row.rate, row.fixed_fee))
                .unwrap_or((Decimal::ZERO, Decimal::ZERO, Decimal::ZERO)),
        };

        let surplus = amount - lower_limit;
        let surplus_tax = surplus * rate;
        let total_tax = surplus_tax + fixed_fee;
        let salary_credit = self.salary_credit();

        let tax_payable = (total_tax - salary_credit).max(Decimal::ZERO);
        let tax_in_favor = (salary_credit - total_tax).max(Decimal::ZERO);

        TaxAssessment {
            lower_limit,
            surplus,
            rate,
            surplus_tax,
            fixed_fee,
            total_tax,
            salary_credit,
            tax_payable,
            tax_in_favor,
        }
    }
}
