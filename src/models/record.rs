//! The flattened per-salary calculation record.
//!
//! This module contains the [`PayrollRecord`] type, the unit exchanged with
//! the batch aggregator and with external exporters. Field comments carry the
//! column letters of the reference worksheet each quantity reproduces.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use uuid::Uuid;

/// The complete computed record for one declared salary.
///
/// Every field corresponds 1:1 to one quantity of the contribution, tax or
/// scheme-comparison calculation. Values are plain numbers; all currency and
/// percentage formatting is the exporter's responsibility.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PayrollRecord {
    /// Unique identifier for this calculation.
    pub calculation_id: Uuid,
    /// When the calculation was performed.
    pub timestamp: DateTime<Utc>,

    /// The declared period salary (worksheet col. B).
    pub declared_salary: Decimal,
    /// The nominal daily salary (col. C).
    pub daily_salary: Decimal,
    /// The integrated daily wage after the integration factor (col. D/E).
    pub integrated_daily_wage: Decimal,
    /// Employer IMSS quota (col. V).
    pub imss_employer_quota: Decimal,
    /// Employee IMSS quota (col. W).
    pub imss_employee_quota: Decimal,
    /// Employer retirement + severance total (col. AC).
    pub rcv_employer: Decimal,
    /// Employee severance total (col. AD).
    pub rcv_employee: Decimal,
    /// Employer housing-fund contribution (col. AE).
    pub housing_fund_employer: Decimal,
    /// State payroll tax (col. AF).
    pub payroll_tax: Decimal,
    /// Suggested total social cost, rounded up (col. AP).
    pub suggested_total_social_cost: Decimal,
    /// The statutory minimum daily wage used for the thresholds.
    pub minimum_daily_wage: Decimal,

    /// ISR bracket lower limit (col. E).
    pub isr_lower_limit: Decimal,
    /// Taxable surplus over the lower limit (col. F).
    pub isr_surplus: Decimal,
    /// Marginal rate applied to the surplus (col. G).
    pub isr_rate: Decimal,
    /// Tax on the surplus (col. H).
    pub isr_surplus_tax: Decimal,
    /// Bracket fixed fee (col. I).
    pub isr_fixed_fee: Decimal,
    /// Total tax before the salary credit (col. J/L).
    pub isr_total_tax: Decimal,
    /// Salary credit looked up by declared salary (col. N).
    pub salary_credit: Decimal,
    /// Tax payable after the credit (col. O).
    pub isr_tax_payable: Decimal,
    /// Tax in favor after the credit (col. P).
    pub isr_tax_in_favor: Decimal,

    /// Alternative-scheme base pay (col. M).
    pub dsi_base_salary: Decimal,
    /// Productivity: the residual assimilated pay (col. N).
    pub productivity: Decimal,
    /// Commission charged under the alternative scheme (col. Q).
    pub dsi_commission: Decimal,
    /// Fixed administrative fee of the alternative scheme (col. P).
    pub dsi_fixed_fee: Decimal,
    /// Traditional-scheme period total (col. K).
    pub traditional_scheme_total: Decimal,
    /// Alternative-scheme period total (col. R).
    pub dsi_scheme_total: Decimal,
    /// Savings amount: traditional minus alternative (col. T/U).
    pub saving_amount: Decimal,
    /// Savings as a fraction of the traditional total (col. U/W).
    pub saving_percentage: Decimal,
    /// Net perception under the traditional scheme (col. AF).
    pub current_perception: Decimal,
    /// Net perception under the alternative scheme (col. AO).
    pub dsi_perception: Decimal,
    /// ISR withheld under the alternative scheme (col. AK).
    pub dsi_isr_retention: Decimal,
    /// Perception increment: alternative minus traditional (col. AQ).
    pub increment: Decimal,
    /// Increment as a fraction of the traditional perception (col. AR).
    pub increment_percentage: Decimal,
}

impl PayrollRecord {
    /// Flattens the record into a name → value mapping for exporters.
    ///
    /// The identity and timestamp fields are omitted; only numeric
    /// quantities appear.
    pub fn to_map(&self) -> BTreeMap<String, Decimal> {
        let mut map = BTreeMap::new();
        let mut put = |name: &str, value: Decimal| {
            map.insert(name.to_string(), value);
        };

        put("declared_salary", self.declared_salary);
        put("daily_salary", self.daily_salary);
        put("integrated_daily_wage", self.integrated_daily_wage);
        put("imss_employer_quota", self.imss_employer_quota);
        put("imss_employee_quota", self.imss_employee_quota);
        put("rcv_employer", self.rcv_employer);
        put("rcv_employee", self.rcv_employee);
        put("housing_fund_employer", self.housing_fund_employer);
        put("payroll_tax", self.payroll_tax);
        put(
            "suggested_total_social_cost",
            self.suggested_total_social_cost,
        );
        put("minimum_daily_wage", self.minimum_daily_wage);
        put("isr_lower_limit", self.isr_lower_limit);
        put("isr_surplus", self.isr_surplus);
        put("isr_rate", self.isr_rate);
        put("isr_surplus_tax", self.isr_surplus_tax);
        put("isr_fixed_fee", self.isr_fixed_fee);
        put("isr_total_tax", self.isr_total_tax);
        put("salary_credit", self.salary_credit);
        put("isr_tax_payable", self.isr_tax_payable);
        put("isr_tax_in_favor", self.isr_tax_in_favor);
        put("dsi_base_salary", self.dsi_base_salary);
        put("productivity", self.productivity);
        put("dsi_commission", self.dsi_commission);
        put("dsi_fixed_fee", self.dsi_fixed_fee);
        put("traditional_scheme_total", self.traditional_scheme_total);
        put("dsi_scheme_total", self.dsi_scheme_total);
        put("saving_amount", self.saving_amount);
        put("saving_percentage", self.saving_percentage);
        put("current_perception", self.current_perception);
        put("dsi_perception", self.dsi_perception);
        put("dsi_isr_retention", self.dsi_isr_retention);
        put("increment", self.increment);
        put("increment_percentage", self.increment_percentage);

        map
    }
}
