//! Batch aggregation of payroll records.
//!
//! This module folds a list of [`PayrollRecord`]s into summary totals. The
//! reference workbook mixed two statistics for percentage fields; both are
//! preserved here, documented per field: the `avg_*` fields are the simple
//! mean of the per-record percentages (the workbook's behavior), and the
//! `overall_*` fields are the ratio of the summed numerator over the summed
//! denominator.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::models::PayrollRecord;

/// Summary totals over a batch of payroll records.
///
/// An empty batch aggregates to all zeros; ratio fields never fail on an
/// empty or zero denominator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchTotals {
    /// Number of records aggregated.
    pub record_count: usize,
    /// Sum of declared salaries.
    pub total_salary: Decimal,
    /// Sum of employer IMSS quotas.
    pub total_imss_employer: Decimal,
    /// Sum of employee IMSS quotas.
    pub total_imss_employee: Decimal,
    /// Sum of employer retirement + severance lines.
    pub total_rcv_employer: Decimal,
    /// Sum of employee severance lines.
    pub total_rcv_employee: Decimal,
    /// Sum of employer housing-fund contributions.
    pub total_housing_fund: Decimal,
    /// Sum of state payroll taxes.
    pub total_payroll_tax: Decimal,
    /// Sum of suggested total social costs.
    pub total_suggested_social_cost: Decimal,
    /// Sum of total ISR before credits.
    pub total_isr: Decimal,
    /// Sum of salary credits.
    pub total_salary_credit: Decimal,
    /// Sum of ISR payable amounts.
    pub total_tax_payable: Decimal,
    /// Sum of ISR in-favor amounts.
    pub total_tax_in_favor: Decimal,
    /// Sum of alternative-scheme base salaries.
    pub total_dsi_base_salary: Decimal,
    /// Sum of productivity residuals.
    pub total_productivity: Decimal,
    /// Sum of commissions.
    pub total_commission: Decimal,
    /// Sum of alternative-scheme fixed fees.
    pub total_dsi_fixed_fee: Decimal,
    /// Sum of traditional-scheme totals.
    pub total_traditional_scheme: Decimal,
    /// Sum of alternative-scheme totals.
    pub total_dsi_scheme: Decimal,
    /// Sum of saving amounts.
    pub total_saving_amount: Decimal,
    /// Sum of traditional net perceptions.
    pub total_current_perception: Decimal,
    /// Sum of alternative net perceptions.
    pub total_dsi_perception: Decimal,
    /// Sum of alternative-scheme ISR retentions.
    pub total_dsi_isr_retention: Decimal,
    /// Sum of perception increments.
    pub total_increment: Decimal,
    /// Simple mean of the per-record saving percentages.
    pub avg_saving_percentage: Decimal,
    /// Simple mean of the per-record increment percentages.
    pub avg_increment_percentage: Decimal,
    /// Summed savings over summed traditional totals (weighted ratio).
    pub overall_saving_percentage: Decimal,
    /// Summed increments over summed traditional perceptions (weighted ratio).
    pub overall_increment_percentage: Decimal,
}

/// Folds a batch of records into [`BatchTotals`].
pub fn aggregate_totals(records: &[PayrollRecord]) -> BatchTotals {
    let sum = |field: fn(&PayrollRecord) -> Decimal| -> Decimal {
        records.iter().map(field).sum()
    };

    let count = records.len();
    let count_dec = Decimal::from(count);
    let mean = |total: Decimal| -> Decimal {
        if count == 0 {
            Decimal::ZERO
        } else {
            total / count_dec
        }
    };
    let ratio = |numerator: Decimal, denominator: Decimal| -> Decimal {
        if denominator == Decimal::ZERO {
            Decimal::ZERO
        } else {
            numerator / denominator
        }
    };

    let total_traditional_scheme = sum(|r| r.traditional_scheme_total);
    let total_saving_amount = sum(|r| r.saving_amount);
    let total_current_perception = sum(|r| r.current_perception);
    let total_increment = sum(|r| r.increment);

    BatchTotals {
        record_count: count,
        total_salary: sum(|r| r.declared_salary),
        total_imss_employer: sum(|r| r.imss_employer_quota),
        total_imss_employee: sum(|r| r.imss_employee_quota),
        total_rcv_employer: sum(|r| r.rcv_employer),
        total_rcv_employee: sum(|r| r.rcv_employee),
        total_housing_fund: sum(|r| r.housing_fund_employer),
        total_payroll_tax: sum(|r| r.payroll_tax),
        total_suggested_social_cost: sum(|r| r.suggested_total_social_cost),
        total_isr: sum(|r| r.isr_total_tax),
        total_salary_credit: sum(|r| r.salary_credit),
        total_tax_payable: sum(|r| r.isr_tax_payable),
        total_tax_in_favor: sum(|r| r.isr_tax_in_favor),
        total_dsi_base_salary: sum(|r| r.dsi_base_salary),
        total_productivity: sum(|r| r.productivity),
        total_commission: sum(|r| r.dsi_commission),
        total_dsi_fixed_fee: sum(|r| r.dsi_fixed_fee),
        total_traditional_scheme,
        total_dsi_scheme: sum(|r| r.dsi_scheme_total),
        total_saving_amount,
        total_current_perception,
        total_dsi_perception: sum(|r| r.dsi_perception),
        total_dsi_isr_retention: sum(|r| r.dsi_isr_retention),
        total_increment,
        avg_saving_percentage: mean(sum(|r| r.saving_percentage)),
        avg_increment_percentage: mean(sum(|r| r.increment_percentage)),
        overall_saving_percentage: ratio(total_saving_amount, total_traditional_scheme),
        overall_increment_percentage: ratio(total_increment, total_current_perception),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use std::str::FromStr;
    use uuid::Uuid;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn record(salary: &str, traditional: &str, saving: &str, saving_pct: &str) -> PayrollRecord {
        PayrollRecord {
            calculation_id: Uuid::new_v4(),
            timestamp: Utc::now(),
            declared_salary: dec(salary),
            daily_salary: Decimal::ZERO,
            integrated_daily_wage: Decimal::ZERO,
            imss_employer_quota: dec("100"),
            imss_employee_quota: dec("10"),
            rcv_employer: dec("50"),
            rcv_employee: dec("5"),
            housing_fund_employer: dec("40"),
            payroll_tax: dec("30"),
            suggested_total_social_cost: dec("235"),
            minimum_daily_wage: dec("278.80"),
            isr_lower_limit: Decimal::ZERO,
            isr_surplus: Decimal::ZERO,
            isr_rate: Decimal::ZERO,
            isr_surplus_tax: Decimal::ZERO,
            isr_fixed_fee: Decimal::ZERO,
            isr_total_tax: dec("20"),
            salary_credit: dec("2"),
            isr_tax_payable: dec("18"),
            isr_tax_in_favor: Decimal::ZERO,
            dsi_base_salary: dec("4182"),
            productivity: dec("800"),
            dsi_commission: dec("90"),
            dsi_fixed_fee: dec("1288"),
            traditional_scheme_total: dec(traditional),
            dsi_scheme_total: dec(traditional) - dec(saving),
            saving_amount: dec(saving),
            saving_percentage: dec(saving_pct),
            current_perception: dec("900"),
            dsi_perception: dec("950"),
            dsi_isr_retention: dec("12"),
            increment: dec("50"),
            increment_percentage: dec("0.0555"),
        }
    }

    #[test]
    fn test_sums_fields_exactly() {
        let records = vec![
            record("10000", "12000", "1000", "0.10"),
            record("15000", "18000", "1200", "0.20"),
            record("20000", "24000", "1400", "0.30"),
        ];
        let totals = aggregate_totals(&records);

        assert_eq!(totals.record_count, 3);
        assert_eq!(totals.total_salary, dec("45000"));
        assert_eq!(totals.total_imss_employer, dec("300"));
        assert_eq!(totals.total_traditional_scheme, dec("54000"));
        assert_eq!(totals.total_saving_amount, dec("3600"));
        assert_eq!(totals.total_suggested_social_cost, dec("705"));
    }

    #[test]
    fn test_avg_percentage_is_simple_mean() {
        let records = vec![
            record("10000", "12000", "1000", "0.10"),
            record("15000", "18000", "1200", "0.20"),
            record("20000", "24000", "1400", "0.30"),
        ];
        let totals = aggregate_totals(&records);

        assert_eq!(totals.avg_saving_percentage, dec("0.20"));
    }

    #[test]
    fn test_overall_percentage_is_weighted_ratio() {
        let records = vec![
            record("10000", "12000", "1000", "0.10"),
            record("15000", "18000", "1200", "0.20"),
            record("20000", "24000", "1400", "0.30"),
        ];
        let totals = aggregate_totals(&records);

        // 3600 / 54000, not the mean of the per-record percentages.
        assert_eq!(totals.overall_saving_percentage, dec("3600") / dec("54000"));
        assert_ne!(totals.overall_saving_percentage, totals.avg_saving_percentage);
    }

    #[test]
    fn test_empty_batch_is_all_zeros() {
        let totals = aggregate_totals(&[]);

        assert_eq!(totals.record_count, 0);
        assert_eq!(totals.total_salary, Decimal::ZERO);
        assert_eq!(totals.avg_saving_percentage, Decimal::ZERO);
        assert_eq!(totals.overall_saving_percentage, Decimal::ZERO);
        assert_eq!(totals.overall_increment_percentage, Decimal::ZERO);
    }

    #[test]
    fn test_zero_denominator_ratio_is_zero() {
        let records = vec![record("10000", "0", "0", "0")];
        let totals = aggregate_totals(&records);

        assert_eq!(totals.overall_saving_percentage, Decimal::ZERO);
    }

    #[test]
    fn test_serializes_for_export() {
        let totals = aggregate_totals(&[record("10000", "12000", "1000", "0.10")]);
        let json = serde_json::to_string(&totals).unwrap();
        assert!(json.contains("\"record_count\":1"));
        assert!(json.contains("\"total_salary\":\"10000\""));
    }
}
