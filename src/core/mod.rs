pub mod config;
pub mod engine;
pub mod input;
pub mod money;
pub mod uk;

// Flat public surface for domain types and functions.
pub use config::{ConfigError, TaxYearConfig, TaxYearFile, TaxYears};
pub use engine::{
    calculate, personal_allowance, BandAmounts, DividendTaxBreakdown, IncomeTaxBreakdown, Inputs,
    NiBreakdown, StudentLoanPlan, StudentLoanRepayment, TaxCalculation, Totals,
};
pub use input::{parse_amount, validate_amount, InputError};
pub use money::{pounds, to_pence, Pence};
pub use uk::{TaxBand, TaxYear};
