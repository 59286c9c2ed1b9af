//! Take-home pay calculation for salary and dividend income (rUK).
//!
//! `calculate` is a pure function of its inputs and one tax year's
//! configuration. All arithmetic after the initial pound-to-pence conversion is
//! done on integer pence; rates are applied in basis points with half-up
//! rounding per band.

use super::config::{Rates, TaxYearConfig};
use super::input::InputError;
use super::money::{apply_rate, div_round, ratio_bps, to_pence, Pence};
use super::uk::TaxBand;
use rust_decimal::Decimal;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, JsonSchema)]
pub enum StudentLoanPlan {
    #[default]
    #[serde(rename = "none")]
    None,
    #[serde(rename = "plan_1")]
    Plan1,
    #[serde(rename = "plan_2")]
    Plan2,
}

impl StudentLoanPlan {
    pub fn key(&self) -> &'static str {
        match self {
            StudentLoanPlan::None => "none",
            StudentLoanPlan::Plan1 => "plan_1",
            StudentLoanPlan::Plan2 => "plan_2",
        }
    }
}

impl fmt::Display for StudentLoanPlan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.key())
    }
}

impl FromStr for StudentLoanPlan {
    type Err = InputError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('-', "_").as_str() {
            "" | "none" => Ok(StudentLoanPlan::None),
            "plan_1" | "plan1" | "1" => Ok(StudentLoanPlan::Plan1),
            "plan_2" | "plan2" | "2" => Ok(StudentLoanPlan::Plan2),
            _ => Err(InputError::UnknownPlan(s.to_string())),
        }
    }
}

/// Annual income in pounds, plus the student loan plan to repay.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Inputs {
    pub salary: Decimal,
    pub dividends: Decimal,
    pub student_loan: StudentLoanPlan,
}

impl Inputs {
    pub fn new(salary: Decimal, dividends: Decimal, student_loan: StudentLoanPlan) -> Self {
        Inputs {
            salary,
            dividends,
            student_loan,
        }
    }
}

/// Income allocated to each band of the scale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct BandAmounts {
    pub basic: Pence,
    pub higher: Pence,
    pub additional: Pence,
}

impl BandAmounts {
    /// Fill the basic band, then the higher band, then put the rest in additional.
    fn fill(amount: Pence, basic_width: Pence, higher_width: Pence) -> Self {
        let amount = amount.max(0);
        let basic = amount.min(basic_width.max(0));
        let higher = (amount - basic).min(higher_width.max(0));
        BandAmounts {
            basic,
            higher,
            additional: amount - basic - higher,
        }
    }

    pub fn get(&self, band: TaxBand) -> Pence {
        match band {
            TaxBand::Basic => self.basic,
            TaxBand::Higher => self.higher,
            TaxBand::Additional => self.additional,
        }
    }

    pub fn total(&self) -> Pence {
        self.basic + self.higher + self.additional
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct IncomeTaxBreakdown {
    /// Taxable salary in each band
    pub taxable: BandAmounts,
    pub basic: Pence,
    pub higher: Pence,
    pub additional: Pence,
    pub total: Pence,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct DividendTaxBreakdown {
    /// Dividends taxed at 0% under the dividend allowance
    pub allowance_applied: Pence,
    /// Taxable dividends in each band, after the dividend allowance
    pub taxable: BandAmounts,
    pub basic: Pence,
    pub higher: Pence,
    pub additional: Pence,
    pub total: Pence,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct NiBreakdown {
    pub main: Pence,
    pub upper: Pence,
    pub total: Pence,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct StudentLoanRepayment {
    pub plan: StudentLoanPlan,
    pub amount: Pence,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct MonthlyTotals {
    pub tax_only: Pence,
    pub tax_and_ni: Pence,
    pub net_income: Pence,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct Totals {
    /// Salary plus dividends
    pub gross: Pence,
    /// Income tax plus dividend tax
    pub tax_only: Pence,
    pub tax_and_ni: Pence,
    /// Gross less tax, NI and student loan
    pub net_income: Pence,
    pub monthly: MonthlyTotals,
}

/// Full breakdown of one calculation. All amounts in pence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TaxCalculation {
    pub tax_year: String,
    pub inputs: Inputs,
    /// Personal allowance after the taper
    pub personal_allowance: Pence,
    pub personal_allowance_used_on_salary: Pence,
    pub personal_allowance_used_on_dividends: Pence,
    pub income_tax: IncomeTaxBreakdown,
    pub dividend_tax: DividendTaxBreakdown,
    pub national_insurance: NiBreakdown,
    pub student_loan: StudentLoanRepayment,
    pub totals: Totals,
}

impl TaxCalculation {
    /// Tax, NI and student loan together
    pub fn total_deductions(&self) -> Pence {
        self.totals.tax_and_ni + self.student_loan.amount
    }

    /// Tax and NI as a share of gross income, in basis points
    pub fn effective_tax_rate_bps(&self) -> i64 {
        ratio_bps(self.totals.tax_and_ni, self.totals.gross)
    }

    /// Net income as a share of gross income, in basis points
    pub fn take_home_rate_bps(&self) -> i64 {
        ratio_bps(self.totals.net_income, self.totals.gross)
    }
}

/// Personal allowance after tapering: reduced by 1p for every 2p of adjusted
/// net income strictly above the taper threshold, never below zero.
pub fn personal_allowance(adjusted_net_income: Pence, config: &TaxYearConfig) -> Pence {
    let base = config.personal_allowance;
    if adjusted_net_income <= config.personal_allowance_taper_start {
        return base;
    }
    let excess = adjusted_net_income - config.personal_allowance_taper_start;
    let reduction = (excess / 2).min(base);
    (base - reduction).max(0)
}

/// Personal allowance split between the two income streams, salary first.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct AllowanceAllocation {
    to_salary: Pence,
    to_dividends: Pence,
    salary_taxable: Pence,
    dividends_taxable: Pence,
}

fn allocate_allowance(allowance: Pence, salary: Pence, dividends: Pence) -> AllowanceAllocation {
    let to_salary = allowance.min(salary);
    let remaining = allowance - to_salary;
    let to_dividends = remaining.min(dividends);
    AllowanceAllocation {
        to_salary,
        to_dividends,
        salary_taxable: salary - to_salary,
        dividends_taxable: dividends - to_dividends,
    }
}

fn income_tax(bands: BandAmounts, rates: &Rates) -> IncomeTaxBreakdown {
    let basic = apply_rate(bands.basic, rates.income_basic_bps);
    let higher = apply_rate(bands.higher, rates.income_higher_bps);
    let additional = apply_rate(bands.additional, rates.income_additional_bps);
    IncomeTaxBreakdown {
        taxable: bands,
        basic,
        higher,
        additional,
        total: basic + higher + additional,
    }
}

/// Band space left for dividends once salary has been banded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct BandCapacity {
    basic: Pence,
    higher: Pence,
}

impl BandCapacity {
    /// Use up capacity in band order, basic first. Whatever does not fit is in
    /// the unbounded additional band and consumes nothing.
    fn consume(&mut self, amount: Pence) {
        let from_basic = amount.min(self.basic);
        self.basic -= from_basic;
        let from_higher = (amount - from_basic).min(self.higher);
        self.higher -= from_higher;
    }
}

fn dividend_tax(
    dividends_taxable: Pence,
    mut capacity: BandCapacity,
    config: &TaxYearConfig,
) -> DividendTaxBreakdown {
    let allowance_applied = config.dividend_allowance.min(dividends_taxable);
    capacity.consume(allowance_applied);

    let bands = BandAmounts::fill(
        dividends_taxable - allowance_applied,
        capacity.basic,
        capacity.higher,
    );
    let rates = &config.rates;
    let basic = apply_rate(bands.basic, rates.div_basic_bps);
    let higher = apply_rate(bands.higher, rates.div_higher_bps);
    let additional = apply_rate(bands.additional, rates.div_additional_bps);
    DividendTaxBreakdown {
        allowance_applied,
        taxable: bands,
        basic,
        higher,
        additional,
        total: basic + higher + additional,
    }
}

/// Employee Class 1 National Insurance, on salary only.
fn national_insurance(salary: Pence, config: &TaxYearConfig) -> NiBreakdown {
    let ni = &config.ni;
    let main_band = (salary.min(ni.upper_earnings_limit) - ni.primary_threshold).max(0);
    let upper_band = (salary - ni.upper_earnings_limit).max(0);
    let main = apply_rate(main_band, config.rates.ni_main_bps);
    let upper = apply_rate(upper_band, config.rates.ni_upper_bps);
    NiBreakdown {
        main,
        upper,
        total: main + upper,
    }
}

/// Student loan repayment on combined salary and dividends.
fn student_loan(plan: StudentLoanPlan, income: Pence, config: &TaxYearConfig) -> StudentLoanRepayment {
    let threshold = match plan {
        StudentLoanPlan::None => None,
        StudentLoanPlan::Plan1 => Some(config.student_loans.plan_1.threshold),
        StudentLoanPlan::Plan2 => Some(config.student_loans.plan_2.threshold),
    };
    let amount = threshold.map_or(0, |threshold| {
        apply_rate((income - threshold).max(0), config.rates.sl_rate_bps)
    });
    StudentLoanRepayment { plan, amount }
}

/// Calculate income tax, dividend tax, National Insurance and student loan
/// repayment for one tax year.
pub fn calculate(inputs: &Inputs, config: &TaxYearConfig) -> TaxCalculation {
    let salary = to_pence(inputs.salary);
    let dividends = to_pence(inputs.dividends);
    let gross = salary + dividends;

    let allowance = personal_allowance(gross, config);
    let allocation = allocate_allowance(allowance, salary, dividends);
    log::debug!(
        "{}: salary={} dividends={} allowance={} (salary {}, dividends {})",
        config.year_label,
        salary,
        dividends,
        allowance,
        allocation.to_salary,
        allocation.to_dividends
    );

    // The higher band ends at the additional rate threshold measured in gross
    // income, so its width shrinks as the allowance grows.
    let higher_band_width =
        (config.additional_rate_threshold - allowance - config.basic_rate_band).max(0);
    let salary_bands = BandAmounts::fill(
        allocation.salary_taxable,
        config.basic_rate_band,
        higher_band_width,
    );
    let income_tax = income_tax(salary_bands, &config.rates);
    log::debug!("Salary bands {:?}, income tax {}", salary_bands, income_tax.total);

    let capacity = BandCapacity {
        basic: (config.basic_rate_band - salary_bands.basic).max(0),
        higher: (higher_band_width - salary_bands.higher).max(0),
    };
    let dividend_tax = dividend_tax(allocation.dividends_taxable, capacity, config);
    log::debug!(
        "Dividend bands {:?} after allowance {}, dividend tax {}",
        dividend_tax.taxable,
        dividend_tax.allowance_applied,
        dividend_tax.total
    );

    let national_insurance = national_insurance(salary, config);
    let student_loan = student_loan(inputs.student_loan, gross, config);
    log::debug!(
        "NI {}, student loan ({}) {}",
        national_insurance.total,
        student_loan.plan,
        student_loan.amount
    );

    let tax_only = income_tax.total + dividend_tax.total;
    let tax_and_ni = tax_only + national_insurance.total;
    let net_income = gross - tax_and_ni - student_loan.amount;

    TaxCalculation {
        tax_year: config.year_label.clone(),
        inputs: inputs.clone(),
        personal_allowance: allowance,
        personal_allowance_used_on_salary: allocation.to_salary,
        personal_allowance_used_on_dividends: allocation.to_dividends,
        income_tax,
        dividend_tax,
        national_insurance,
        student_loan,
        totals: Totals {
            gross,
            tax_only,
            tax_and_ni,
            net_income,
            monthly: MonthlyTotals {
                tax_only: div_round(tax_only, 12),
                tax_and_ni: div_round(tax_and_ni, 12),
                net_income: div_round(net_income, 12),
            },
        },
    }
}
