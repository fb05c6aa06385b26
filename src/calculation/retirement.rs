//! Retirement/severance/old-age (RCV) employer contribution.
//!
//! This module provides the focused sub-calculation for the employer's
//! severance and old-age line: a year-specific rate looked up by the
//! integrated daily wage, scaled by the pay-period length.

use rust_decimal::Decimal;

use crate::config::{TaxTables, lookup_bracket};
use crate::error::{EngineError, EngineResult};

/// Computes the employer severance/old-age contribution for one period.
///
/// The applicable rate is the row of the year's RCV table with the greatest
/// lower limit not exceeding the integrated daily wage. Non-positive wages
/// contribute nothing; the result is never negative.
///
/// # Arguments
///
/// * `integrated_daily_wage` - The daily wage after the integration factor
/// * `period_days` - The pay-period length in days
/// * `year` - The contribution-table year (2023-2030)
/// * `tables` - The statutory tables
///
/// # Errors
///
/// Returns [`EngineError::UnsupportedYear`] when no table exists for the
/// year, and [`EngineError::NoApplicableBracket`] if the table is empty
/// (defensive; shipped tables never are).
///
/// # Example
///
/// ```
/// use nomina_engine::calculation::retirement_contribution;
/// use nomina_engine::config::TaxTables;
/// use rust_decimal::Decimal;
/// use std::str::FromStr;
///
/// let tables = TaxTables::embedded().unwrap();
/// let wage = Decimal::from_str("399.48").unwrap();
/// let quota = retirement_contribution(wage, 15, 2025, &tables).unwrap();
/// assert_eq!(quota.round_dp(2), Decimal::from_str("344.37").unwrap());
/// ```
pub fn retirement_contribution(
    integrated_daily_wage: Decimal,
    period_days: u32,
    year: u16,
    tables: &TaxTables,
) -> EngineResult<Decimal> {
    if integrated_daily_wage <= Decimal::ZERO {
        return Ok(Decimal::ZERO);
    }

    let table = tables.rcv_table(year)?;
    // Wages inside (0, 0.01) fall below every published range; the smallest
    // range's rate applies rather than failing the lookup.
    let row = match lookup_bracket(table, integrated_daily_wage) {
        Some(row) => row,
        None => table.first().ok_or(EngineError::NoApplicableBracket {
            amount: integrated_daily_wage,
        })?,
    };

    Ok(integrated_daily_wage * row.rate * Decimal::from(period_days))
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

    #[test]
    fn test_quota_for_mid_range_wage() {
        // 399.48 falls in the 397.12+ range: rate 0.05747 for 2025.
        let quota = retirement_contribution(dec("399.478303"), 15, 2025, &tables()).unwrap();
        assert_eq!(quota.round_dp(2), dec("344.37"));
    }

    #[test]
    fn test_quota_for_minimum_floor_wage() {
        // 292.54 falls in the 283.98+ range: rate 0.05307 for 2025.
        let quota = retirement_contribution(dec("292.54484"), 15, 2025, &tables()).unwrap();
        assert_eq!(quota.round_dp(2), dec("232.88"));
    }

    #[test]
    fn test_zero_wage_contributes_nothing() {
        let quota = retirement_contribution(Decimal::ZERO, 15, 2025, &tables()).unwrap();
        assert_eq!(quota, Decimal::ZERO);
    }

    #[test]
    fn test_negative_wage_never_produces_negative_quota() {
        let quota = retirement_contribution(dec("-100"), 15, 2025, &tables()).unwrap();
        assert_eq!(quota, Decimal::ZERO);
    }

    #[test]
    fn test_wage_below_smallest_range_uses_smallest_rate() {
        let quota = retirement_contribution(dec("0.005"), 15, 2025, &tables()).unwrap();
        assert_eq!(quota, dec("0.005") * dec("0.03150") * dec("15"));
    }

    #[test]
    fn test_rate_depends_on_year() {
        let wage = dec("500.00");
        let quota_2023 = retirement_contribution(wage, 15, 2023, &tables()).unwrap();
        let quota_2030 = retirement_contribution(wage, 15, 2030, &tables()).unwrap();
        assert_eq!(quota_2023, wage * dec("0.04241") * dec("15"));
        assert_eq!(quota_2030, wage * dec("0.11875") * dec("15"));
        assert!(quota_2030 > quota_2023);
    }

    #[test]
    fn test_unsupported_year_fails() {
        let result = retirement_contribution(dec("300"), 15, 2022, &tables());
        match result {
            Err(EngineError::UnsupportedYear { year }) => assert_eq!(year, 2022),
            other => panic!("Expected UnsupportedYear, got {:?}", other),
        }
    }

    #[test]
    fn test_quota_scales_with_period_days() {
        let wage = dec("300.00");
        let weekly = retirement_contribution(wage, 7, 2025, &tables()).unwrap();
        let biweekly = retirement_contribution(wage, 15, 2025, &tables()).unwrap();
        assert_eq!(weekly / dec("7"), biweekly / dec("15"));
    }
}
