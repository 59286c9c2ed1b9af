//! UK take-home pay: income tax, dividend tax, employee National Insurance
//! and student loan repayment from an annual salary and dividends.

pub mod core;

pub use crate::core::{calculate, Inputs, StudentLoanPlan, TaxCalculation, TaxYearConfig, TaxYears};
