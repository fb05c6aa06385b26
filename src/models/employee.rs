//! Employee model.
//!
//! This module defines the [`Employee`] struct representing one worker's
//! declared compensation for a pay period.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// An employee's declared compensation for one pay period.
///
/// The declared salary is the period amount reported to the social-security
/// institute; the optional components are additional taxable income the
/// payroll-tax base includes. Immutable once constructed.
///
/// # Example
///
/// ```
/// use nomina_engine::models::Employee;
/// use rust_decimal::Decimal;
/// use std::str::FromStr;
///
/// let employee = Employee::new(Decimal::from_str("5710.64").unwrap(), 15);
/// assert_eq!(
///     employee.daily_salary().round_dp(2),
///     Decimal::from_str("380.71").unwrap()
/// );
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Employee {
    /// The declared salary for the pay period.
    pub declared_salary: Decimal,
    /// The pay-period length in days.
    pub pay_period_days: u32,
    /// Additional compensation paid in the period.
    #[serde(default)]
    pub compensation: Decimal,
    /// Double overtime paid in the period.
    #[serde(default)]
    pub double_overtime_pay: Decimal,
    /// Christmas bonus paid in the period.
    #[serde(default)]
    pub christmas_bonus: Decimal,
}

impl Employee {
    /// Creates an employee with no income components beyond the declared salary.
    pub fn new(declared_salary: Decimal, pay_period_days: u32) -> Self {
        Self {
            declared_salary,
            pay_period_days,
            compensation: Decimal::ZERO,
            double_overtime_pay: Decimal::ZERO,
            christmas_bonus: Decimal::ZERO,
        }
    }

    /// The nominal daily salary, before the integration factor.
    pub fn daily_salary(&self) -> Decimal {
        self.declared_salary / Decimal::from(self.pay_period_days)
    }

    /// The total period compensation: declared salary plus all components.
    pub fn total_salary(&self) -> Decimal {
        self.declared_salary + self.compensation + self.double_overtime_pay + self.christmas_bonus
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn test_daily_salary_divides_by_period() {
        let employee = Employee::new(dec("4182.00"), 15);
        assert_eq!(employee.daily_salary(), dec("278.80"));
    }

    #[test]
    fn test_total_salary_without_components() {
        let employee = Employee::new(dec("5710.64"), 15);
        assert_eq!(employee.total_salary(), dec("5710.64"));
    }

    #[test]
    fn test_total_salary_sums_components() {
        let employee = Employee {
            declared_salary: dec("10000"),
            pay_period_days: 15,
            compensation: dec("500"),
            double_overtime_pay: dec("250.50"),
            christmas_bonus: dec("1000"),
        };
        assert_eq!(employee.total_salary(), dec("11750.50"));
    }

    #[test]
    fn test_deserialize_defaults_components_to_zero() {
        let json = r#"{
            "declared_salary": "5710.64",
            "pay_period_days": 15
        }"#;

        let employee: Employee = serde_json::from_str(json).unwrap();
        assert_eq!(employee.declared_salary, dec("5710.64"));
        assert_eq!(employee.pay_period_days, 15);
        assert_eq!(employee.compensation, Decimal::ZERO);
        assert_eq!(employee.christmas_bonus, Decimal::ZERO);
    }

    #[test]
    fn test_serialize_round_trip() {
        let employee = Employee::new(dec("15000"), 30);
        let json = serde_json::to_string(&employee).unwrap();
        let deserialized: Employee = serde_json::from_str(&json).unwrap();
        assert_eq!(employee, deserialized);
    }
}
