//! Configuration types for the statutory payroll tables.
//!
//! This module contains the strongly-typed structures that are deserialized
//! from the embedded YAML table files: progressive-tax brackets, salary-credit
//! rows, retirement-rate brackets and the per-year contribution parameters.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use crate::error::EngineError;

/// One row of a progressive-tax (ISR) table.
///
/// Rows are ordered by `lower_limit` and cover `[0, +inf)`; the last row has
/// no upper limit. Tax for an amount inside the row is
/// `(amount - lower_limit) * rate + fixed_fee`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct BracketRow {
    /// The inclusive lower bound of the bracket.
    pub lower_limit: Decimal,
    /// The inclusive upper bound, `None` for the open-ended last row.
    #[serde(default)]
    pub upper_limit: Option<Decimal>,
    /// The fixed fee charged on top of the marginal tax.
    pub fixed_fee: Decimal,
    /// The marginal rate applied to the surplus over `lower_limit`.
    pub rate: Decimal,
}

/// One row of the salary-credit ("subsidio al empleo") table.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct CreditRow {
    /// The inclusive lower bound of the income range.
    pub lower_limit: Decimal,
    /// The inclusive upper bound, `None` for the open-ended last row.
    #[serde(default)]
    pub upper_limit: Option<Decimal>,
    /// The credit granted for incomes in this range.
    pub credit: Decimal,
}

/// One row of a year's retirement/severance (RCV) rate table.
#[derive(Debug, Clone, PartialEq)]
pub struct RateBracket {
    /// The inclusive lower bound of the wage range.
    pub lower_limit: Decimal,
    /// The inclusive upper bound, `None` for the open-ended last row.
    pub upper_limit: Option<Decimal>,
    /// The contribution rate for wages in this range.
    pub rate: Decimal,
}

/// The statutory occupational-risk class of an employer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RiskClass {
    /// Class I, lowest risk.
    I,
    /// Class II, ordinary risk.
    II,
    /// Class III, medium risk.
    III,
    /// Class IV, high risk.
    IV,
    /// Class V, maximum risk.
    V,
}

impl FromStr for RiskClass {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "I" => Ok(RiskClass::I),
            "II" => Ok(RiskClass::II),
            "III" => Ok(RiskClass::III),
            "IV" => Ok(RiskClass::IV),
            "V" => Ok(RiskClass::V),
            other => Err(EngineError::InvalidRiskClass {
                value: other.to_string(),
            }),
        }
    }
}

impl fmt::Display for RiskClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            RiskClass::I => "I",
            RiskClass::II => "II",
            RiskClass::III => "III",
            RiskClass::IV => "IV",
            RiskClass::V => "V",
        };
        write!(f, "{}", s)
    }
}

/// The constant contribution parameters for one tax year.
///
/// Loaded once from the embedded parameter file and never mutated during a
/// calculation. The two contribution ceilings are carried as distinct
/// configuration values even though every published parameter version sets
/// them equal; different downstream lines read different ceilings.
#[derive(Debug, Clone, Deserialize)]
pub struct ContributionParameters {
    /// Multiplier converting a nominal daily wage into the integrated wage base.
    pub integration_factor: Decimal,
    /// The reference daily economic index (UMA).
    pub uma: Decimal,
    /// Multiplier of UMA above which the sickness/maternity surplus applies.
    pub surplus_threshold_multiplier: Decimal,
    /// Multiplier of UMA for contribution ceiling A.
    pub ceiling_a_multiplier: Decimal,
    /// Multiplier of UMA for contribution ceiling B.
    pub ceiling_b_multiplier: Decimal,
    /// Employer fixed-fee rate for the sickness/maternity quota.
    pub fixed_fee_rate: Decimal,
    /// Employer rate on the wage surplus above the threshold.
    pub surplus_employer: Decimal,
    /// Employee rate on the wage surplus above the threshold.
    pub surplus_employee: Decimal,
    /// The legal minimum daily wage for the geographic area.
    pub minimum_daily_wage: Decimal,
    /// Employer cash-benefits rate.
    pub cash_benefits_employer: Decimal,
    /// Employee cash-benefits rate.
    pub cash_benefits_employee: Decimal,
    /// Employer benefits-in-kind (medical) rate.
    pub benefits_in_kind_employer: Decimal,
    /// Employee benefits-in-kind (medical) rate.
    pub benefits_in_kind_employee: Decimal,
    /// Employer invalidity-and-life rate.
    pub invalidity_employer: Decimal,
    /// Employee invalidity-and-life rate.
    pub invalidity_employee: Decimal,
    /// Childcare and social-benefits rate (employer only).
    pub childcare: Decimal,
    /// Employer retirement rate (fixed, distinct from the RCV table).
    pub retirement_employer: Decimal,
    /// Employer housing-fund (INFONAVIT) rate.
    pub housing_fund_employer: Decimal,
    /// State payroll-tax rate.
    pub state_payroll_tax: Decimal,
    /// Employee severance/old-age rate.
    pub severance_employee: Decimal,
    /// Increment applied to the suggested total social cost when enabled.
    pub suggested_increment: Decimal,
    /// Occupational-risk rate per risk class.
    pub risk_rates: HashMap<RiskClass, Decimal>,
}

impl ContributionParameters {
    /// The wage threshold above which the sickness/maternity surplus applies.
    pub fn surplus_threshold(&self) -> Decimal {
        self.uma * self.surplus_threshold_multiplier
    }

    /// Contribution ceiling A (caps the integrated daily wage).
    pub fn contribution_ceiling_a(&self) -> Decimal {
        self.uma * self.ceiling_a_multiplier
    }

    /// Contribution ceiling B (caps the integrated daily wage).
    pub fn contribution_ceiling_b(&self) -> Decimal {
        self.uma * self.ceiling_b_multiplier
    }

    /// The occupational-risk rate for a risk class.
    ///
    /// Fails with [`EngineError::InvalidRiskClass`] only if the parameter
    /// file omits the class, which well-formed files never do.
    pub fn risk_rate(&self, class: RiskClass) -> Result<Decimal, EngineError> {
        self.risk_rates
            .get(&class)
            .copied()
            .ok_or_else(|| EngineError::InvalidRiskClass {
                value: class.to_string(),
            })
    }

    /// The statutory minimum salary for a pay period of `days` days.
    pub fn minimum_period_salary(&self, days: u32) -> Decimal {
        self.minimum_daily_wage * Decimal::from(days)
    }

    /// The alternative-scheme base pay for a pay period: a multiple of the
    /// minimum daily wage scaled to the period length.
    pub fn alternative_base_salary(&self, smg_multiplier: Decimal, days: u32) -> Decimal {
        self.minimum_daily_wage * smg_multiplier * Decimal::from(days)
    }
}
