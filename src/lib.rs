//! Payroll Cost and Scheme Comparison Engine for Mexican statutory payroll.
//!
//! This crate computes employer/employee social-security contributions (IMSS),
//! progressive income tax (ISR) and the retirement/severance sub-calculation
//! (RCV) for declared salaries, and compares the traditional payroll scheme
//! against an assimilated/commission ("DSI") scheme to quantify savings and
//! net-pay increment.

#![warn(missing_docs)]

pub mod api;
pub mod calculation;
pub mod config;
pub mod error;
pub mod models;
