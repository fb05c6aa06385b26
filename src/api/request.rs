//! Request types for the payroll engine API.
//!
//! This module defines the JSON request structures and their conversion
//! into the calculation-layer input types.

use rust_decimal::Decimal;
use serde::Deserialize;

use crate::calculation::{
    BatchInput, CalculationInput, CommissionBase, SchemeMode, SchemeParams,
};
use crate::config::RiskClass;
use crate::error::EngineResult;

fn default_pay_period_days() -> u32 {
    15
}

fn default_contribution_year() -> u16 {
    2025
}

fn default_risk_class() -> String {
    "I".to_string()
}

fn default_smg_multiplier() -> Decimal {
    Decimal::ONE
}

/// Alternative-scheme configuration as it appears on the wire.
#[derive(Debug, Clone, Deserialize)]
pub struct SchemeParamsRequest {
    /// Base-pay multiplier of the minimum wage.
    #[serde(default = "default_smg_multiplier")]
    pub smg_multiplier: Decimal,
    /// Commission rate in `[0, 1)`.
    #[serde(default)]
    pub commission_rate: Decimal,
    /// What the commission is computed on.
    #[serde(default)]
    pub commission_base: CommissionBase,
    /// The comparison operating mode.
    #[serde(default)]
    pub mode: SchemeMode,
    /// Externally supplied productivity, overriding the residual.
    #[serde(default)]
    pub productivity_override: Option<Decimal>,
    /// Other perceptions added to the period income.
    #[serde(default)]
    pub other_perception: Decimal,
    /// The net/schema salary for the net-salary commission base.
    #[serde(default)]
    pub net_salary: Option<Decimal>,
    /// Period minimum-wage threshold override.
    #[serde(default)]
    pub minimum_threshold_salary: Option<Decimal>,
    /// Applies the 2.5% increment to suggested social costs.
    #[serde(default)]
    pub apply_increment: bool,
}

impl Default for SchemeParamsRequest {
    fn default() -> Self {
        Self {
            smg_multiplier: default_smg_multiplier(),
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

impl From<SchemeParamsRequest> for SchemeParams {
    fn from(request: SchemeParamsRequest) -> Self {
        SchemeParams {
            smg_multiplier: request.smg_multiplier,
            commission_rate: request.commission_rate,
            commission_base: request.commission_base,
            mode: request.mode,
            productivity_override: request.productivity_override,
            other_perception: request.other_perception,
            net_salary: request.net_salary,
            minimum_threshold_salary: request.minimum_threshold_salary,
            apply_increment: request.apply_increment,
        }
    }
}

/// Request body for `POST /calculate`.
#[derive(Debug, Clone, Deserialize)]
pub struct CalculationRequest {
    /// The declared salary for the pay period.
    pub declared_salary: Decimal,
    /// The pay-period length in days.
    #[serde(default = "default_pay_period_days")]
    pub pay_period_days: u32,
    /// The employer's occupational-risk class code (I through V).
    #[serde(default = "default_risk_class")]
    pub risk_class: String,
    /// The contribution-table year.
    #[serde(default = "default_contribution_year")]
    pub contribution_year: u16,
    /// Alternative-scheme configuration.
    #[serde(default)]
    pub scheme: SchemeParamsRequest,
}

impl CalculationRequest {
    /// Converts the request into a calculation input, parsing the risk class.
    pub fn into_input(self) -> EngineResult<CalculationInput> {
        let risk_class: RiskClass = self.risk_class.parse()?;
        Ok(CalculationInput {
            declared_salary: self.declared_salary,
            pay_period_days: self.pay_period_days,
            risk_class,
            contribution_year: self.contribution_year,
            scheme: self.scheme.into(),
        })
    }
}

/// Request body for `POST /calculate/batch`.
#[derive(Debug, Clone, Deserialize)]
pub struct BatchCalculationRequest {
    /// The declared salaries, one per record.
    pub salaries: Vec<Decimal>,
    /// The pay-period length in days, shared by every record.
    #[serde(default = "default_pay_period_days")]
    pub pay_period_days: u32,
    /// The employer's occupational-risk class code (I through V).
    #[serde(default = "default_risk_class")]
    pub risk_class: String,
    /// The contribution-table year.
    #[serde(default = "default_contribution_year")]
    pub contribution_year: u16,
    /// Alternative-scheme configuration shared by every record.
    #[serde(default)]
    pub scheme: SchemeParamsRequest,
    /// Optional per-record productivity overrides, parallel to `salaries`.
    #[serde(default)]
    pub productivity_overrides: Option<Vec<Decimal>>,
    /// Optional per-record other perceptions, parallel to `salaries`.
    #[serde(default)]
    pub other_perceptions: Option<Vec<Decimal>>,
    /// Abort on the first per-record failure instead of skipping it.
    #[serde(default)]
    pub strict: bool,
    /// Reject salaries below the statutory minimum for the period.
    #[serde(default)]
    pub enforce_minimum_wage: bool,
    /// Include aggregated totals in the response.
    #[serde(default = "default_include_totals")]
    pub include_totals: bool,
}

fn default_include_totals() -> bool {
    true
}

impl BatchCalculationRequest {
    /// Converts the request into a batch input, parsing the risk class.
    pub fn into_input(self) -> EngineResult<BatchInput> {
        let risk_class: RiskClass = self.risk_class.parse()?;
        Ok(BatchInput {
            salaries: self.salaries,
            pay_period_days: self.pay_period_days,
            risk_class,
            contribution_year: self.contribution_year,
            scheme: self.scheme.into(),
            productivity_overrides: self.productivity_overrides,
            other_perceptions: self.other_perceptions,
        })
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
    fn test_minimal_request_uses_defaults() {
        let json = r#"{"declared_salary": "10000"}"#;
        let request: CalculationRequest = serde_json::from_str(json).unwrap();
        let input = request.into_input().unwrap();

        assert_eq!(input.declared_salary, dec("10000"));
        assert_eq!(input.pay_period_days, 15);
        assert_eq!(input.risk_class, RiskClass::I);
        assert_eq!(input.contribution_year, 2025);
        assert_eq!(input.scheme.smg_multiplier, Decimal::ONE);
        assert_eq!(input.scheme.mode, SchemeMode::Default);
    }

    #[test]
    fn test_full_request_deserializes() {
        let json = r#"{
            "declared_salary": "10000",
            "pay_period_days": 30,
            "risk_class": "iii",
            "contribution_year": 2024,
            "scheme": {
                "smg_multiplier": "1.05",
                "commission_rate": "0.03",
                "commission_base": "total_income",
                "mode": "pure",
                "other_perception": "500"
            }
        }"#;
        let request: CalculationRequest = serde_json::from_str(json).unwrap();
        let input = request.into_input().unwrap();

        assert_eq!(input.pay_period_days, 30);
        assert_eq!(input.risk_class, RiskClass::III);
        assert_eq!(input.contribution_year, 2024);
        assert_eq!(input.scheme.commission_base, CommissionBase::TotalIncome);
        assert_eq!(input.scheme.mode, SchemeMode::Pure);
        assert_eq!(input.scheme.other_perception, dec("500"));
    }

    #[test]
    fn test_invalid_risk_class_is_rejected_on_conversion() {
        let json = r#"{"declared_salary": "10000", "risk_class": "VI"}"#;
        let request: CalculationRequest = serde_json::from_str(json).unwrap();
        assert!(request.into_input().is_err());
    }

    #[test]
    fn test_batch_request_defaults() {
        let json = r#"{"salaries": ["10000", "15000"]}"#;
        let request: BatchCalculationRequest = serde_json::from_str(json).unwrap();

        assert!(request.include_totals);
        assert!(!request.strict);
        let input = request.into_input().unwrap();
        assert_eq!(input.salaries.len(), 2);
        assert!(input.productivity_overrides.is_none());
    }
}
