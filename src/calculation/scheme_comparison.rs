//! Traditional vs. alternative ("DSI") compensation scheme comparison.
//!
//! This module builds the two parallel compensation schedules for one
//! employee and derives the savings and net-pay increment between them.
//! The breakdown re-evaluation runs the whole contribution + comparison
//! pipeline a second time against a directly supplied daily salary on a
//! separate immutable engine; the primary evaluation is never touched.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::config::{RiskClass, TaxTables};
use crate::error::EngineResult;
use crate::models::Employee;

use super::contribution::{ContributionEngine, WageBasis};
use super::income_tax::{IncomeTaxEngine, TaxAssessment};

/// The amount a commission is computed on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CommissionBase {
    /// The declared period salary.
    #[default]
    DeclaredSalary,
    /// The configured net/schema salary, falling back to the productivity
    /// residual when none is supplied.
    NetSalary,
    /// Total income: declared salary plus other perceptions.
    TotalIncome,
    /// The alternative-scheme base pay.
    AlternativeBase,
}

/// The operating mode of the scheme comparison.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SchemeMode {
    /// Alternative base pay and productivity are taken as supplied.
    #[default]
    Default,
    /// Alternative base pay is derived from the active daily wage scaled to
    /// the period instead of taken verbatim.
    Percentage,
    /// The commission is added into the traditional schedule as well.
    Pure,
    /// Fee-only case: the traditional schedule is total income verbatim and
    /// the alternative schedule carries no fixed fee.
    WithoutSalary,
    /// Productivity is forced equal to the supplied other-perception value.
    KeepDeclaredSalary,
}

/// Configuration of the alternative scheme and comparison modes.
#[derive(Debug, Clone, PartialEq)]
pub struct SchemeOptions {
    /// The alternative-scheme base pay for the period.
    pub alternative_base_salary: Decimal,
    /// Commission rate in `[0, 1)`.
    pub commission_rate: Decimal,
    /// What the commission is computed on.
    pub commission_base: CommissionBase,
    /// The comparison operating mode.
    pub mode: SchemeMode,
    /// Externally supplied productivity, overriding the residual.
    pub productivity_override: Option<Decimal>,
    /// Other perceptions added to the period income.
    pub other_perception: Decimal,
    /// The net/schema salary used by [`CommissionBase::NetSalary`].
    pub net_salary: Option<Decimal>,
    /// Period minimum-wage threshold override; defaults to the statutory
    /// minimum daily wage scaled to the period.
    pub minimum_threshold_salary: Option<Decimal>,
    /// Applies the 2.5% increment when deriving suggested social costs.
    pub apply_increment: bool,
}

impl SchemeOptions {
    /// Creates options with the given base pay and commission rate and every
    /// other knob at its default.
    pub fn new(alternative_base_salary: Decimal, commission_rate: Decimal) -> Self {
        Self {
            alternative_base_salary,
            commission_rate,
            commission_base: CommissionBase::default(),
            mode: SchemeMode::default(),
            productivity_override: None,
            other_perception: Decimal::ZERO,
            net_salary: None,
            minimum_threshold_salary: None,
            apply_increment: false,
        }
    }
}

/// One full evaluation of both schedules and their delta.
#[derive(Debug, Clone, PartialEq)]
pub struct SchemeOutcome {
    /// Total income: period salary plus other perceptions.
    pub total_income: Decimal,
    /// The alternative-scheme base pay used by this evaluation.
    pub alternative_base_salary: Decimal,
    /// The productivity residual (assimilated pay).
    pub productivity: Decimal,
    /// The commission amount.
    pub commission: Decimal,
    /// The fixed fee of the alternative scheme.
    pub fixed_fee: Decimal,
    /// Traditional-scheme period total.
    pub traditional_total: Decimal,
    /// Alternative-scheme period total.
    pub alternative_total: Decimal,
    /// Savings: traditional minus alternative.
    pub saving_amount: Decimal,
    /// Savings as a fraction of the traditional total (zero when the
    /// traditional total is zero).
    pub saving_percentage: Decimal,
    /// The income-tax assessment for the evaluated salary.
    pub tax: TaxAssessment,
    /// Everything withheld from the employee under the traditional scheme.
    pub total_retentions: Decimal,
    /// Net perception under the traditional scheme.
    pub current_perception: Decimal,
    /// ISR withheld under the alternative scheme.
    pub alternative_isr_retention: Decimal,
    /// Net perception under the alternative scheme.
    pub alternative_perception: Decimal,
    /// Perception increment: alternative minus traditional.
    pub increment: Decimal,
    /// Increment as a fraction of the traditional perception (zero when the
    /// traditional perception is zero).
    pub increment_percentage: Decimal,
    /// Whether the period salary strictly exceeded the minimum threshold.
    pub above_minimum: bool,
}

/// Compares the traditional scheme against the alternative scheme for one
/// employee.
///
/// # Example
///
/// ```
/// use nomina_engine::calculation::{SchemeComparison, SchemeOptions};
/// use nomina_engine::config::{RiskClass, TaxTables};
/// use nomina_engine::models::Employee;
/// use rust_decimal::Decimal;
/// use std::str::FromStr;
///
/// let tables = TaxTables::embedded().unwrap();
/// let employee = Employee::new(Decimal::from_str("10000").unwrap(), 15);
/// let options = SchemeOptions::new(
///     Decimal::from_str("4182.00").unwrap(),
///     Decimal::from_str("0.02").unwrap(),
/// );
/// let comparison =
///     SchemeComparison::new(&employee, RiskClass::I, 2025, options, &tables).unwrap();
/// let outcome = comparison.evaluate().unwrap();
/// assert_eq!(outcome.saving_amount, outcome.traditional_total - outcome.alternative_total);
/// ```
#[derive(Debug, Clone)]
pub struct SchemeComparison<'a> {
    employee: Employee,
    risk_class: RiskClass,
    year: u16,
    options: SchemeOptions,
    tables: &'a TaxTables,
    contributions: ContributionEngine<'a>,
    minimum_threshold: Decimal,
    fixed_fee: Decimal,
}

impl<'a> SchemeComparison<'a> {
    /// Builds a comparison for one employee.
    ///
    /// The alternative scheme's fixed fee is derived here by running the
    /// suggested-total-social-cost formula on a second engine pinned to the
    /// minimum-wage baseline for the period.
    pub fn new(
        employee: &Employee,
        risk_class: RiskClass,
        year: u16,
        options: SchemeOptions,
        tables: &'a TaxTables,
    ) -> EngineResult<Self> {
        let contributions = ContributionEngine::new(
            employee,
            risk_class,
            WageBasis::PeriodDerived,
            year,
            tables,
        )?
        .with_increment(options.apply_increment);

        let params = tables.parameters(year)?;
        let minimum_threshold = options
            .minimum_threshold_salary
            .unwrap_or_else(|| params.minimum_period_salary(employee.pay_period_days));

        let floor_engine = ContributionEngine::new(
            employee,
            risk_class,
            WageBasis::MinimumWageFloor(minimum_threshold),
            year,
            tables,
        )?
        .with_increment(options.apply_increment);
        let fixed_fee = floor_engine.suggested_total_social_cost();

        Ok(Self {
            employee: employee.clone(),
            risk_class,
            year,
            options,
            tables,
            contributions,
            minimum_threshold,
            fixed_fee,
        })
    }

    /// The alternative scheme's fixed fee (the minimum-baseline floor cost).
    pub fn fixed_fee(&self) -> Decimal {
        self.fixed_fee
    }

    /// The contribution engine of the primary evaluation.
    pub fn contributions(&self) -> &ContributionEngine<'a> {
        &self.contributions
    }

    /// Evaluates both schedules on the period-derived wage.
    pub fn evaluate(&self) -> EngineResult<SchemeOutcome> {
        self.evaluate_with(self.employee.declared_salary, &self.contributions)
    }

    /// Re-evaluates the whole pipeline on a directly supplied daily salary.
    ///
    /// A second immutable contribution engine carries the substituted wage;
    /// the primary evaluation's engine and results are untouched. With
    /// `direct_daily` equal to the period-derived daily salary this
    /// reproduces [`SchemeComparison::evaluate`] exactly.
    pub fn evaluate_breakdown(&self, direct_daily: Decimal) -> EngineResult<SchemeOutcome> {
        let engine = ContributionEngine::new(
            &self.employee,
            self.risk_class,
            WageBasis::DirectDaily(direct_daily),
            self.year,
            self.tables,
        )?
        .with_increment(self.options.apply_increment);

        let period_salary = direct_daily * Decimal::from(self.employee.pay_period_days);
        self.evaluate_with(period_salary, &engine)
    }

    fn evaluate_with(
        &self,
        period_salary: Decimal,
        contributions: &ContributionEngine<'_>,
    ) -> EngineResult<SchemeOutcome> {
        let options = &self.options;
        let days = Decimal::from(self.employee.pay_period_days);
        let above_minimum = period_salary > self.minimum_threshold;

        let alternative_base = match options.mode {
            SchemeMode::Percentage => contributions.base_daily_wage() * days,
            _ => options.alternative_base_salary,
        };

        let total_income = period_salary + options.other_perception;

        let mut productivity = options
            .productivity_override
            .unwrap_or(period_salary - alternative_base);
        productivity += options.other_perception;
        if options.mode == SchemeMode::KeepDeclaredSalary {
            productivity = options.other_perception;
        }

        let commission_basis = match options.commission_base {
            CommissionBase::DeclaredSalary => period_salary,
            CommissionBase::NetSalary => options.net_salary.unwrap_or(productivity),
            CommissionBase::TotalIncome => total_income,
            CommissionBase::AlternativeBase => alternative_base,
        };
        let commission = commission_basis * options.commission_rate;

        // Below the period minimum the employer fronts the employee's own
        // IMSS and severance lines; the same withholding set is excluded
        // from the employee's retentions further down.
        let employee_withholding =
            contributions.employee_quota() + contributions.total_rcv_employee();
        let mut traditional_total = if options.mode == SchemeMode::WithoutSalary {
            total_income
        } else if above_minimum {
            total_income + contributions.total_employer()
        } else {
            total_income + contributions.total_employer() + employee_withholding
        };
        if options.mode == SchemeMode::Pure {
            traditional_total += commission;
        }

        let fixed_fee = if options.mode == SchemeMode::WithoutSalary {
            Decimal::ZERO
        } else {
            self.fixed_fee
        };
        let alternative_total = total_income + fixed_fee + commission;

        let saving_amount = traditional_total - alternative_total;
        let saving_percentage = if traditional_total == Decimal::ZERO {
            Decimal::ZERO
        } else {
            saving_amount / traditional_total
        };

        let isr = IncomeTaxEngine::new(period_salary, self.employee.pay_period_days, self.tables)?;
        let tax = isr.assess();

        let total_retentions = if above_minimum {
            tax.tax_payable + employee_withholding
        } else {
            tax.tax_payable
        };
        let current_perception = total_income - total_retentions;

        let alternative_isr_retention = if period_salary > alternative_base {
            isr.assess_amount(period_salary - alternative_base).tax_payable
        } else {
            Decimal::ZERO
        };
        let alternative_perception =
            (alternative_base + productivity) - alternative_isr_retention;

        let increment = alternative_perception - current_perception;
        let increment_percentage = if current_perception == Decimal::ZERO {
            Decimal::ZERO
        } else {
            increment / current_perception
        };

        Ok(SchemeOutcome {
            total_income,
            alternative_base_salary: alternative_base,
            productivity,
            commission,
            fixed_fee,
            traditional_total,
            alternative_total,
            saving_amount,
            saving_percentage,
            tax,
            total_retentions,
            current_perception,
            alternative_isr_retention,
            alternative_perception,
            increment,
            increment_percentage,
            above_minimum,
        })
    }
}
