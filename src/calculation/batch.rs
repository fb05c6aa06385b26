//! Per-salary pipeline and batch processing.
//!
//! This module wires the contribution, income-tax and scheme-comparison
//! engines into one [`PayrollRecord`] per declared salary, and runs whole
//! salary lists with per-record failure isolation.

use chrono::Utc;
use rust_decimal::Decimal;
use tracing::warn;
use uuid::Uuid;

use crate::config::{RiskClass, SUPPORTED_PERIODS, TaxTables};
use crate::error::{EngineError, EngineResult};
use crate::models::{Employee, PayrollRecord};

use super::scheme_comparison::{CommissionBase, SchemeComparison, SchemeMode, SchemeOptions};
use super::totals::{BatchTotals, aggregate_totals};

/// Alternative-scheme configuration shared by single and batch calculations.
///
/// The base pay is expressed as a multiple of the minimum daily wage scaled
/// to the pay period, the way the reference workbook parameterizes it.
#[derive(Debug, Clone, PartialEq)]
pub struct SchemeParams {
    /// Base-pay multiplier of the minimum wage (1.0, 1.05, 2.0, ...).
    pub smg_multiplier: Decimal,
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
    /// Period minimum-wage threshold override.
    pub minimum_threshold_salary: Option<Decimal>,
    /// Applies the 2.5% increment to suggested social costs.
    pub apply_increment: bool,
}

impl Default for SchemeParams {
    fn default() -> Self {
        Self {
            smg_multiplier: Decimal::ONE,
            commission_rate: Decimal::ZERO,
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

/// Input for one per-salary calculation.
#[derive(Debug, Clone, PartialEq)]
pub struct CalculationInput {
    /// The declared salary for the pay period.
    pub declared_salary: Decimal,
    /// The pay-period length in days.
    pub pay_period_days: u32,
    /// The employer's occupational-risk class.
    pub risk_class: RiskClass,
    /// The contribution-table year.
    pub contribution_year: u16,
    /// Alternative-scheme configuration.
    pub scheme: SchemeParams,
}

/// Input for a batch calculation: one shared configuration plus parallel
/// per-record lists.
#[derive(Debug, Clone, PartialEq)]
pub struct BatchInput {
    /// The declared salaries, one per record.
    pub salaries: Vec<Decimal>,
    /// The pay-period length in days, shared by every record.
    pub pay_period_days: u32,
    /// The employer's occupational-risk class.
    pub risk_class: RiskClass,
    /// The contribution-table year.
    pub contribution_year: u16,
    /// Alternative-scheme configuration shared by every record.
    pub scheme: SchemeParams,
    /// Optional per-record productivity overrides, parallel to `salaries`.
    pub productivity_overrides: Option<Vec<Decimal>>,
    /// Optional per-record other perceptions, parallel to `salaries`.
    pub other_perceptions: Option<Vec<Decimal>>,
}

/// Failure-handling options for batch processing.
#[derive(Debug, Clone, Copy, Default)]
pub struct BatchOptions {
    /// Abort on the first per-record failure instead of skipping it.
    pub strict: bool,
    /// Reject salaries below the statutory minimum for the period.
    pub enforce_minimum_wage: bool,
    /// Aggregate the computed records into [`BatchTotals`].
    pub include_totals: bool,
}

/// A record the batch skipped, with the reason.
#[derive(Debug, Clone)]
pub struct SkippedRecord {
    /// The index of the record in the input list.
    pub index: usize,
    /// The declared salary of the skipped record.
    pub salary: Decimal,
    /// Why the record was skipped.
    pub reason: String,
}

/// The outcome of a batch run: computed records, skipped records, and
/// optional aggregated totals.
#[derive(Debug, Clone)]
pub struct BatchOutcome {
    /// Successfully computed records, in input order.
    pub records: Vec<PayrollRecord>,
    /// Records that failed and were skipped (empty in strict mode).
    pub skipped: Vec<SkippedRecord>,
    /// Aggregated totals when requested.
    pub totals: Option<BatchTotals>,
}

/// Computes the full [`PayrollRecord`] for one declared salary.
///
/// # Errors
///
/// Fails with [`EngineError::InvalidSalary`] for a non-positive salary, and
/// propagates configuration errors (unsupported period or year, invalid risk
/// class) from the underlying engines.
pub fn calculate_record(input: &CalculationInput, tables: &TaxTables) -> EngineResult<PayrollRecord> {
    if input.declared_salary <= Decimal::ZERO {
        return Err(EngineError::InvalidSalary {
            value: input.declared_salary,
        });
    }
    if !SUPPORTED_PERIODS.contains(&input.pay_period_days) {
        return Err(EngineError::UnsupportedPeriod {
            days: input.pay_period_days,
        });
    }

    let params = tables.parameters(input.contribution_year)?;
    let employee = Employee::new(input.declared_salary, input.pay_period_days);

    let alternative_base =
        params.alternative_base_salary(input.scheme.smg_multiplier, input.pay_period_days);
    let options = SchemeOptions {
        alternative_base_salary: alternative_base,
        commission_rate: input.scheme.commission_rate,
        commission_base: input.scheme.commission_base,
        mode: input.scheme.mode,
        productivity_override: input.scheme.productivity_override,
        other_perception: input.scheme.other_perception,
        net_salary: input.scheme.net_salary,
        minimum_threshold_salary: input.scheme.minimum_threshold_salary,
        apply_increment: input.scheme.apply_increment,
    };

    let comparison = SchemeComparison::new(
        &employee,
        input.risk_class,
        input.contribution_year,
        options,
        tables,
    )?;
    let outcome = comparison.evaluate()?;
    let contributions = comparison.contributions();

    Ok(PayrollRecord {
        calculation_id: Uuid::new_v4(),
        timestamp: Utc::now(),
        declared_salary: input.declared_salary,
        daily_salary: employee.daily_salary(),
        integrated_daily_wage: contributions.integrated_daily_wage(),
        imss_employer_quota: contributions.employer_quota(),
        imss_employee_quota: contributions.employee_quota(),
        rcv_employer: contributions.total_rcv_employer(),
        rcv_employee: contributions.total_rcv_employee(),
        housing_fund_employer: contributions.housing_fund_employer(),
        payroll_tax: contributions.payroll_tax(),
        suggested_total_social_cost: contributions.suggested_total_social_cost(),
        minimum_daily_wage: params.minimum_daily_wage,
        isr_lower_limit: outcome.tax.lower_limit,
        isr_surplus: outcome.tax.surplus,
        isr_rate: outcome.tax.rate,
        isr_surplus_tax: outcome.tax.surplus_tax,
        isr_fixed_fee: outcome.tax.fixed_fee,
        isr_total_tax: outcome.tax.total_tax,
        salary_credit: outcome.tax.salary_credit,
        isr_tax_payable: outcome.tax.tax_payable,
        isr_tax_in_favor: outcome.tax.tax_in_favor,
        dsi_base_salary: outcome.alternative_base_salary,
        productivity: outcome.productivity,
        dsi_commission: outcome.commission,
        dsi_fixed_fee: outcome.fixed_fee,
        traditional_scheme_total: outcome.traditional_total,
        dsi_scheme_total: outcome.alternative_total,
        saving_amount: outcome.saving_amount,
        saving_percentage: outcome.saving_percentage,
        current_perception: outcome.current_perception,
        dsi_perception: outcome.alternative_perception,
        dsi_isr_retention: outcome.alternative_isr_retention,
        increment: outcome.increment,
        increment_percentage: outcome.increment_percentage,
    })
}

/// Processes a batch of salaries.
///
/// Each record is computed independently; a failed record is skipped with a
/// logged reason unless `options.strict` aborts the batch with the
/// originating error. Parallel input lists must match the salary list's
/// length.
pub fn process_batch(
    input: &BatchInput,
    options: BatchOptions,
    tables: &TaxTables,
) -> EngineResult<BatchOutcome> {
    let expected = input.salaries.len();
    check_parallel_len(
        "productivity_overrides",
        expected,
        input.productivity_overrides.as_ref(),
    )?;
    check_parallel_len("other_perceptions", expected, input.other_perceptions.as_ref())?;

    let minimum = tables
        .parameters(input.contribution_year)?
        .minimum_period_salary(input.pay_period_days);

    let mut records = Vec::with_capacity(expected);
    let mut skipped = Vec::new();

    for (index, &salary) in input.salaries.iter().enumerate() {
        let mut scheme = input.scheme.clone();
        if let Some(overrides) = &input.productivity_overrides {
            scheme.productivity_override = Some(overrides[index]);
        }
        if let Some(perceptions) = &input.other_perceptions {
            scheme.other_perception = perceptions[index];
        }

        let record_input = CalculationInput {
            declared_salary: salary,
            pay_period_days: input.pay_period_days,
            risk_class: input.risk_class,
            contribution_year: input.contribution_year,
            scheme,
        };

        let result = if options.enforce_minimum_wage && salary < minimum {
            Err(EngineError::SalaryBelowMinimum { salary, minimum })
        } else {
            calculate_record(&record_input, tables)
        };

        match result {
            Ok(record) => records.push(record),
            Err(error) if options.strict => return Err(error),
            Err(error) => {
                warn!(index, %salary, %error, "Skipping batch record");
                skipped.push(SkippedRecord {
                    index,
                    salary,
                    reason: error.to_string(),
                });
            }
        }
    }

    let totals = options.include_totals.then(|| aggregate_totals(&records));

    Ok(BatchOutcome {
        records,
        skipped,
        totals,
    })
}

fn check_parallel_len(
    field: &str,
    expected: usize,
    list: Option<&Vec<Decimal>>,
) -> EngineResult<()> {
    match list {
        Some(list) if list.len() != expected => Err(EngineError::BatchShapeMismatch {
            field: field.to_string(),
            expected,
            actual: list.len(),
        }),
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn tables() -> TaxTables {
        TaxTables::embedded().unwrap()
    }

    fn input(salary: &str) -> CalculationInput {
        CalculationInput {
            declared_salary: dec(salary),
            pay_period_days: 15,
            risk_class: RiskClass::I,
            contribution_year: 2025,
            scheme: SchemeParams {
                commission_rate: dec("0.02"),
                ..SchemeParams::default()
            },
        }
    }

    fn batch_input(salaries: &[&str]) -> BatchInput {
        BatchInput {
            salaries: salaries.iter().map(|s| dec(s)).collect(),
            pay_period_days: 15,
            risk_class: RiskClass::I,
            contribution_year: 2025,
            scheme: SchemeParams {
                commission_rate: dec("0.02"),
                ..SchemeParams::default()
            },
            productivity_overrides: None,
            other_perceptions: None,
        }
    }

    #[test]
    fn test_record_carries_every_pipeline_quantity() {
        let t = tables();
        let record = calculate_record(&input("5710.64"), &t).unwrap();

        assert_eq!(record.declared_salary, dec("5710.64"));
        assert_eq!(record.integrated_daily_wage.round_dp(2), dec("399.48"));
        assert_eq!(record.isr_lower_limit, dec("5490.76"));
        assert_eq!(record.suggested_total_social_cost, dec("1740"));
        assert_eq!(record.dsi_base_salary, dec("4182.00"));
        assert_eq!(record.minimum_daily_wage, dec("278.80"));
        assert_eq!(
            record.saving_amount,
            record.traditional_scheme_total - record.dsi_scheme_total
        );
    }

    #[test]
    fn test_non_positive_salary_is_rejected() {
        let t = tables();
        match calculate_record(&input("0"), &t) {
            Err(EngineError::InvalidSalary { value }) => assert_eq!(value, Decimal::ZERO),
            other => panic!("Expected InvalidSalary, got {:?}", other),
        }
        assert!(calculate_record(&input("-500"), &t).is_err());
    }

    #[test]
    fn test_unsupported_period_propagates() {
        let t = tables();
        let mut bad = input("5000");
        bad.pay_period_days = 14;
        assert!(matches!(
            calculate_record(&bad, &t),
            Err(EngineError::UnsupportedPeriod { days: 14 })
        ));
    }

    #[test]
    fn test_batch_totals_sum_salaries_exactly() {
        let t = tables();
        let outcome = process_batch(
            &batch_input(&["10000", "15000", "20000"]),
            BatchOptions {
                include_totals: true,
                ..BatchOptions::default()
            },
            &t,
        )
        .unwrap();

        assert_eq!(outcome.records.len(), 3);
        assert!(outcome.skipped.is_empty());
        let totals = outcome.totals.unwrap();
        assert_eq!(totals.total_salary, dec("45000"));

        for record in &outcome.records {
            assert!(
                record.isr_tax_payable == Decimal::ZERO
                    || record.isr_tax_in_favor == Decimal::ZERO
            );
        }
    }

    #[test]
    fn test_bad_record_is_skipped_with_reason() {
        let t = tables();
        let outcome = process_batch(
            &batch_input(&["10000", "-1", "20000"]),
            BatchOptions::default(),
            &t,
        )
        .unwrap();

        assert_eq!(outcome.records.len(), 2);
        assert_eq!(outcome.skipped.len(), 1);
        assert_eq!(outcome.skipped[0].index, 1);
        assert!(outcome.skipped[0].reason.contains("Invalid salary"));
    }

    #[test]
    fn test_strict_mode_aborts_on_first_failure() {
        let t = tables();
        let result = process_batch(
            &batch_input(&["10000", "-1", "20000"]),
            BatchOptions {
                strict: true,
                ..BatchOptions::default()
            },
            &t,
        );

        assert!(matches!(result, Err(EngineError::InvalidSalary { .. })));
    }

    #[test]
    fn test_minimum_wage_enforcement() {
        let t = tables();
        let lenient = process_batch(&batch_input(&["3000"]), BatchOptions::default(), &t).unwrap();
        assert_eq!(lenient.records.len(), 1);

        let enforced = process_batch(
            &batch_input(&["3000"]),
            BatchOptions {
                enforce_minimum_wage: true,
                ..BatchOptions::default()
            },
            &t,
        )
        .unwrap();
        assert!(enforced.records.is_empty());
        assert!(enforced.skipped[0].reason.contains("below the statutory minimum"));
    }

    #[test]
    fn test_parallel_list_length_mismatch_fails() {
        let t = tables();
        let mut input = batch_input(&["10000", "15000"]);
        input.other_perceptions = Some(vec![dec("100")]);

        match process_batch(&input, BatchOptions::default(), &t) {
            Err(EngineError::BatchShapeMismatch {
                field,
                expected,
                actual,
            }) => {
                assert_eq!(field, "other_perceptions");
                assert_eq!(expected, 2);
                assert_eq!(actual, 1);
            }
            other => panic!("Expected BatchShapeMismatch, got {:?}", other),
        }
    }

    #[test]
    fn test_parallel_lists_apply_per_record() {
        let t = tables();
        let mut input = batch_input(&["10000", "15000"]);
        input.other_perceptions = Some(vec![dec("100"), dec("200")]);
        input.productivity_overrides = Some(vec![dec("5000"), dec("6000")]);

        let outcome = process_batch(&input, BatchOptions::default(), &t).unwrap();
        // Productivity = override + other perception.
        assert_eq!(outcome.records[0].productivity, dec("5100"));
        assert_eq!(outcome.records[1].productivity, dec("6200"));
    }

    #[test]
    fn test_records_keep_input_order() {
        let t = tables();
        let outcome = process_batch(
            &batch_input(&["20000", "10000", "15000"]),
            BatchOptions::default(),
            &t,
        )
        .unwrap();

        let salaries: Vec<Decimal> = outcome.records.iter().map(|r| r.declared_salary).collect();
        assert_eq!(salaries, vec![dec("20000"), dec("10000"), dec("15000")]);
    }
}
