//! Social-security (IMSS) contribution calculation.
//!
//! This module provides the [`ContributionEngine`], which computes every
//! employer and employee contribution line for one employee under one wage
//! basis. Engines are immutable: evaluating the same formulas against a
//! different wage source means building a second engine with a different
//! [`WageBasis`], never mutating an existing one.

use rust_decimal::Decimal;

use crate::config::{ContributionParameters, RiskClass, TaxTables};
use crate::error::EngineResult;
use crate::models::Employee;

use super::retirement::retirement_contribution;

/// The wage source a [`ContributionEngine`] evaluates against.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum WageBasis {
    /// Daily wage derived from the declared salary and the pay period;
    /// payroll tax on the employee's total compensation.
    PeriodDerived,
    /// A directly supplied daily salary; payroll tax on that salary scaled
    /// to the period. Used by the breakdown re-evaluation.
    DirectDaily(Decimal),
    /// A period amount standing in for the statutory minimum baseline;
    /// payroll tax on that amount. Used to derive the alternative-scheme
    /// fixed fee.
    MinimumWageFloor(Decimal),
}

/// Every contribution line computed for one employee under one wage basis.
///
/// Entirely derived from the engine's construction inputs; holds no
/// independent state.
#[derive(Debug, Clone, PartialEq)]
pub struct ContributionBreakdown {
    /// The integrated daily wage after the integration factor.
    pub integrated_daily_wage: Decimal,
    /// The integrated wage capped at contribution ceiling A.
    pub capped_wage_a: Decimal,
    /// The integrated wage capped at contribution ceiling B.
    pub capped_wage_b: Decimal,
    /// Employer sickness/maternity fixed quota.
    pub sickness_maternity_employer_quota: Decimal,
    /// Employer sickness/maternity surplus above the threshold.
    pub sickness_maternity_employer_surplus: Decimal,
    /// Employee sickness/maternity surplus above the threshold.
    pub sickness_maternity_employee_surplus: Decimal,
    /// Employer cash-benefits line.
    pub cash_benefits_employer: Decimal,
    /// Employee cash-benefits line (zero at or below the minimum wage).
    pub cash_benefits_employee: Decimal,
    /// Employer benefits-in-kind (medical) line.
    pub benefits_in_kind_employer: Decimal,
    /// Employee benefits-in-kind line (zero at or below the minimum wage).
    pub benefits_in_kind_employee: Decimal,
    /// Employer occupational-risk line.
    pub occupational_risk_employer: Decimal,
    /// Employer invalidity-and-life line.
    pub invalidity_employer: Decimal,
    /// Employee invalidity-and-life line (zero at or below the minimum wage).
    pub invalidity_employee: Decimal,
    /// Employer childcare line.
    pub childcare_employer: Decimal,
    /// Sum of all employer IMSS lines.
    pub employer_quota: Decimal,
    /// Sum of all employee IMSS lines.
    pub employee_quota: Decimal,
    /// Employer retirement line (fixed rate).
    pub retirement_employer: Decimal,
    /// Employer severance/old-age line (year-specific rate).
    pub severance_employer: Decimal,
    /// Employee severance/old-age line (zero at or below the minimum wage).
    pub severance_employee: Decimal,
    /// Employer housing-fund contribution.
    pub housing_fund_employer: Decimal,
    /// State payroll tax on the basis' compensation amount.
    pub payroll_tax: Decimal,
    /// Employer grand total: quota + retirement + severance + housing + payroll tax.
    pub total_employer: Decimal,
    /// Employee grand total: quota + severance.
    pub total_employee: Decimal,
    /// Employer and employee grand totals combined.
    pub total_social_cost: Decimal,
    /// Suggested total social cost, rounded up to the next peso.
    pub suggested_total_social_cost: Decimal,
}

/// Computes employer and employee social-security contributions.
///
/// Built once per (employee, risk class, year, wage basis); every getter is
/// a pure function of those construction inputs.
///
/// # Example
///
/// ```
/// use nomina_engine::calculation::{ContributionEngine, WageBasis};
/// use nomina_engine::config::{RiskClass, TaxTables};
/// use nomina_engine::models::Employee;
/// use rust_decimal::Decimal;
/// use std::str::FromStr;
///
/// let tables = TaxTables::embedded().unwrap();
/// let employee = Employee::new(Decimal::from_str("5710.64").unwrap(), 15);
/// let engine = ContributionEngine::new(
///     &employee,
///     RiskClass::I,
///     WageBasis::PeriodDerived,
///     2025,
///     &tables,
/// )
/// .unwrap();
/// assert_eq!(
///     engine.integrated_daily_wage().round_dp(2),
///     Decimal::from_str("399.48").unwrap()
/// );
/// ```
#[derive(Debug, Clone)]
pub struct ContributionEngine<'a> {
    employee: Employee,
    params: &'a ContributionParameters,
    basis: WageBasis,
    days: Decimal,
    risk_rate: Decimal,
    severance_employer: Decimal,
    apply_increment: bool,
}

impl<'a> ContributionEngine<'a> {
    /// Builds an engine for one employee under one wage basis.
    ///
    /// # Errors
    ///
    /// Fails with [`crate::error::EngineError::UnsupportedYear`] when no
    /// parameter set or retirement table exists for `year`, or
    /// [`crate::error::EngineError::InvalidRiskClass`] when the parameter
    /// file carries no rate for the risk class.
    pub fn new(
        employee: &Employee,
        risk_class: RiskClass,
        basis: WageBasis,
        year: u16,
        tables: &'a TaxTables,
    ) -> EngineResult<Self> {
        let params = tables.parameters(year)?;
        let risk_rate = params.risk_rate(risk_class)?;
        let days = Decimal::from(employee.pay_period_days);

        let base_daily = base_daily_wage(employee, basis, days);
        let integrated = base_daily * params.integration_factor;
        let severance_employer =
            retirement_contribution(integrated, employee.pay_period_days, year, tables)?;

        Ok(Self {
            employee: employee.clone(),
            params,
            basis,
            days,
            risk_rate,
            severance_employer,
            apply_increment: false,
        })
    }

    /// Enables the 2.5% increment on the suggested total social cost.
    pub fn with_increment(mut self, apply: bool) -> Self {
        self.apply_increment = apply;
        self
    }

    /// The daily wage of the active basis, before the integration factor.
    pub fn base_daily_wage(&self) -> Decimal {
        base_daily_wage(&self.employee, self.basis, self.days)
    }

    /// Whether the basis' daily wage strictly exceeds the minimum daily wage.
    ///
    /// Employee contribution lines are exempt at or below the minimum; the
    /// boundary is exclusive.
    pub fn above_minimum_wage(&self) -> bool {
        self.base_daily_wage() > self.params.minimum_daily_wage
    }

    /// The integrated daily wage: daily wage times the integration factor.
    pub fn integrated_daily_wage(&self) -> Decimal {
        self.base_daily_wage() * self.params.integration_factor
    }

    /// The integrated wage capped at contribution ceiling A.
    pub fn capped_wage_a(&self) -> Decimal {
        self.integrated_daily_wage()
            .min(self.params.contribution_ceiling_a())
    }

    /// The integrated wage capped at contribution ceiling B.
    pub fn capped_wage_b(&self) -> Decimal {
        self.integrated_daily_wage()
            .min(self.params.contribution_ceiling_b())
    }

    /// Employer sickness/maternity fixed quota: UMA-based, independent of
    /// the wage once it is positive.
    pub fn sickness_maternity_employer_quota(&self) -> Decimal {
        if self.integrated_daily_wage() > Decimal::ZERO {
            self.params.uma * self.days * self.params.fixed_fee_rate
        } else {
            Decimal::ZERO
        }
    }

    /// Employer sickness/maternity surplus on the capped wage above the
    /// threshold (three UMAs).
    pub fn sickness_maternity_employer_surplus(&self) -> Decimal {
        self.surplus_over_threshold(self.params.surplus_employer)
    }

    /// Employee sickness/maternity surplus on the capped wage above the
    /// threshold.
    pub fn sickness_maternity_employee_surplus(&self) -> Decimal {
        self.surplus_over_threshold(self.params.surplus_employee)
    }

    fn surplus_over_threshold(&self, rate: Decimal) -> Decimal {
        let capped = self.capped_wage_a();
        let threshold = self.params.surplus_threshold();
        if capped > threshold {
            (capped - threshold) * rate * self.days
        } else {
            Decimal::ZERO
        }
    }

    /// The shared split-benefit rule: above the minimum wage only the
    /// employer rate applies; at or below it the employee is exempt and the
    /// combined rate is charged to the employer line.
    fn split_benefit(&self, capped_wage: Decimal, employer_rate: Decimal, employee_rate: Decimal) -> Decimal {
        if self.above_minimum_wage() {
            capped_wage * employer_rate * self.days
        } else {
            capped_wage * (employer_rate + employee_rate) * self.days
        }
    }

    /// The employee share of a split benefit: zero at or below the minimum.
    fn employee_share(&self, capped_wage: Decimal, employee_rate: Decimal) -> Decimal {
        if self.above_minimum_wage() {
            capped_wage * employee_rate * self.days
        } else {
            Decimal::ZERO
        }
    }

    /// Employer cash-benefits line.
    pub fn cash_benefits_employer(&self) -> Decimal {
        self.split_benefit(
            self.capped_wage_a(),
            self.params.cash_benefits_employer,
            self.params.cash_benefits_employee,
        )
    }

    /// Employee cash-benefits line.
    pub fn cash_benefits_employee(&self) -> Decimal {
        self.employee_share(self.capped_wage_a(), self.params.cash_benefits_employee)
    }

    /// Employer benefits-in-kind (medical) line.
    pub fn benefits_in_kind_employer(&self) -> Decimal {
        self.split_benefit(
            self.capped_wage_a(),
            self.params.benefits_in_kind_employer,
            self.params.benefits_in_kind_employee,
        )
    }

    /// Employee benefits-in-kind (medical) line.
    pub fn benefits_in_kind_employee(&self) -> Decimal {
        self.employee_share(self.capped_wage_a(), self.params.benefits_in_kind_employee)
    }

    /// Employer occupational-risk line.
    pub fn occupational_risk_employer(&self) -> Decimal {
        self.days * self.capped_wage_a() * self.risk_rate
    }

    /// Employer invalidity-and-life line (uses ceiling B).
    pub fn invalidity_employer(&self) -> Decimal {
        self.split_benefit(
            self.capped_wage_b(),
            self.params.invalidity_employer,
            self.params.invalidity_employee,
        )
    }

    /// Employee invalidity-and-life line (uses ceiling B).
    pub fn invalidity_employee(&self) -> Decimal {
        self.employee_share(self.capped_wage_b(), self.params.invalidity_employee)
    }

    /// Employer childcare line.
    pub fn childcare_employer(&self) -> Decimal {
        self.params.childcare * self.capped_wage_a() * self.days
    }

    /// Sum of all employer IMSS lines.
    pub fn employer_quota(&self) -> Decimal {
        self.sickness_maternity_employer_quota()
            + self.sickness_maternity_employer_surplus()
            + self.cash_benefits_employer()
            + self.benefits_in_kind_employer()
            + self.occupational_risk_employer()
            + self.invalidity_employer()
            + self.childcare_employer()
    }

    /// Sum of all employee IMSS lines.
    pub fn employee_quota(&self) -> Decimal {
        self.sickness_maternity_employee_surplus()
            + self.cash_benefits_employee()
            + self.benefits_in_kind_employee()
            + self.invalidity_employee()
    }

    /// Employer and employee IMSS quotas combined.
    pub fn total_imss(&self) -> Decimal {
        self.employer_quota() + self.employee_quota()
    }

    /// Employer retirement line at the fixed retirement rate.
    pub fn retirement_employer(&self) -> Decimal {
        self.capped_wage_a() * self.days * self.params.retirement_employer
    }

    /// Employer severance/old-age line from the year's RCV table.
    pub fn severance_employer(&self) -> Decimal {
        self.severance_employer
    }

    /// Employer retirement + severance total.
    pub fn total_rcv_employer(&self) -> Decimal {
        self.retirement_employer() + self.severance_employer()
    }

    /// Employee severance/old-age line (uses ceiling B).
    pub fn severance_employee(&self) -> Decimal {
        self.employee_share(self.capped_wage_b(), self.params.severance_employee)
    }

    /// Employee severance total.
    pub fn total_rcv_employee(&self) -> Decimal {
        self.severance_employee()
    }

    /// Employer housing-fund contribution (uses ceiling B).
    pub fn housing_fund_employer(&self) -> Decimal {
        self.capped_wage_b() * self.days * self.params.housing_fund_employer
    }

    /// The compensation amount the state payroll tax is charged on.
    pub fn payroll_tax_base(&self) -> Decimal {
        match self.basis {
            WageBasis::PeriodDerived => self.employee.total_salary(),
            WageBasis::DirectDaily(daily) => daily * self.days,
            WageBasis::MinimumWageFloor(period_amount) => period_amount,
        }
    }

    /// State payroll tax.
    pub fn payroll_tax(&self) -> Decimal {
        self.payroll_tax_base() * self.params.state_payroll_tax
    }

    /// Employer grand total: IMSS quota + RCV + housing fund + payroll tax.
    pub fn total_employer(&self) -> Decimal {
        self.employer_quota()
            + self.total_rcv_employer()
            + self.housing_fund_employer()
            + self.payroll_tax()
    }

    /// Employee grand total: IMSS quota + severance.
    pub fn total_employee(&self) -> Decimal {
        self.employee_quota() + self.total_rcv_employee()
    }

    /// Employer and employee grand totals combined.
    pub fn total_social_cost(&self) -> Decimal {
        self.total_employer() + self.total_employee()
    }

    /// The increment on the total social cost, zero unless enabled.
    pub fn increment(&self) -> Decimal {
        if self.apply_increment {
            self.total_social_cost() * self.params.suggested_increment
        } else {
            Decimal::ZERO
        }
    }

    /// Suggested total social cost: total + increment, rounded up to the
    /// next whole peso.
    pub fn suggested_total_social_cost(&self) -> Decimal {
        (self.total_social_cost() + self.increment()).ceil()
    }

    /// Snapshots every line into a [`ContributionBreakdown`].
    pub fn breakdown(&self) -> ContributionBreakdown {
        ContributionBreakdown {
            integrated_daily_wage: self.integrated_daily_wage(),
            capped_wage_a: self.capped_wage_a(),
            capped_wage_b: self.capped_wage_b(),
            sickness_maternity_employer_quota: self.sickness_maternity_employer_quota(),
            sickness_maternity_employer_surplus: self.sickness_maternity_employer_surplus(),
            sickness_maternity_employee_surplus: self.sickness_maternity_employee_surplus(),
            cash_benefits_employer: self.cash_benefits_employer(),
            cash_benefits_employee: self.cash_benefits_employee(),
            benefits_in_kind_employer: self.benefits_in_kind_employer(),
            benefits_in_kind_employee: self.benefits_in_kind_employee(),
            occupational_risk_employer: self.occupational_risk_employer(),
            invalidity_employer: self.invalidity_employer(),
            invalidity_employee: self.invalidity_employee(),
            childcare_employer: self.childcare_employer(),
            employer_quota: self.employer_quota(),
            employee_quota: self.employee_quota(),
            retirement_employer: self.retirement_employer(),
            severance_employer: self.severance_employer(),
            severance_employee: self.severance_employee(),
            housing_fund_employer: self.housing_fund_employer(),
            payroll_tax: self.payroll_tax(),
            total_employer: self.total_employer(),
            total_employee: self.total_employee(),
            total_social_cost: self.total_social_cost(),
            suggested_total_social_cost: self.suggested_total_social_cost(),
        }
    }
}

fn base_daily_wage(employee: &Employee, basis: WageBasis, days: Decimal) -> Decimal {
    match basis {
        WageBasis::PeriodDerived => employee.daily_salary(),
        WageBasis::DirectDaily(daily) => daily,
        WageBasis::MinimumWageFloor(period_amount) => period_amount / days,
    }
}
