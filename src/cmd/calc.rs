//! Calc command - full breakdown for one salary/dividends scenario

use super::display::{format_gbp, format_percent};
use super::{StudentLoanArg, YearArgs};
use clap::Args;
use rust_decimal::Decimal;
use tabled::{
    settings::{object::Columns, Alignment, Modify, Style},
    Table, Tabled,
};
use takehome::core::{
    calculate, parse_amount, to_pence, Inputs, Pence, TaxBand, TaxCalculation, TaxYearConfig,
};

#[derive(Args, Debug)]
pub struct CalcCommand {
    /// Annual salary in pounds (e.g. 50000 or £52,000.50)
    #[arg(short, long, value_parser = parse_amount, default_value = "0")]
    salary: Decimal,

    /// Annual dividends in pounds
    #[arg(short, long, value_parser = parse_amount, default_value = "0")]
    dividends: Decimal,

    /// Student loan plan
    #[arg(short = 'l', long, value_enum, default_value_t = StudentLoanArg::None)]
    student_loan: StudentLoanArg,

    #[command(flatten)]
    year: YearArgs,

    /// Output as JSON instead of a formatted table
    #[arg(long)]
    json: bool,
}

impl CalcCommand {
    pub fn exec(&self) -> anyhow::Result<()> {
        let years = self.year.tax_years()?;
        let config = self.year.select(&years)?;
        let inputs = Inputs::new(self.salary, self.dividends, self.student_loan.into());
        let result = calculate(&inputs, config);

        if self.json {
            println!("{}", serde_json::to_string_pretty(&result)?);
        } else {
            print_breakdown(&result, config);
        }
        Ok(())
    }
}

/// Row of the breakdown table
#[derive(Debug, Clone, Tabled)]
struct BreakdownRow {
    #[tabled(rename = "Item")]
    item: String,
    #[tabled(rename = "Amount")]
    amount: String,
    #[tabled(rename = "Rate")]
    rate: String,
    #[tabled(rename = "Annual")]
    annual: String,
    #[tabled(rename = "Monthly")]
    monthly: String,
}

impl BreakdownRow {
    fn new(item: impl Into<String>, annual: Pence) -> Self {
        BreakdownRow {
            item: item.into(),
            amount: String::new(),
            rate: String::new(),
            annual: format_gbp(annual),
            monthly: String::new(),
        }
    }

    fn banded(item: impl Into<String>, amount: Pence, rate_bps: u32, tax: Pence) -> Self {
        BreakdownRow {
            amount: format_gbp(amount),
            rate: format_percent(i64::from(rate_bps)),
            ..Self::new(item, tax)
        }
    }

    fn monthly(mut self, monthly: Pence) -> Self {
        self.monthly = format_gbp(monthly);
        self
    }
}

fn breakdown_rows(r: &TaxCalculation, config: &TaxYearConfig) -> Vec<BreakdownRow> {
    let rates = &config.rates;
    let mut rows = vec![
        BreakdownRow::new("Gross income", r.totals.gross),
        BreakdownRow::new("Personal allowance", r.personal_allowance),
    ];

    let income_rates = [
        rates.income_basic_bps,
        rates.income_higher_bps,
        rates.income_additional_bps,
    ];
    let income_tax = [r.income_tax.basic, r.income_tax.higher, r.income_tax.additional];
    for (i, band) in TaxBand::ALL.iter().enumerate() {
        let amount = r.income_tax.taxable.get(*band);
        if amount > 0 {
            rows.push(BreakdownRow::banded(
                format!("Income tax ({})", band.name().to_lowercase()),
                amount,
                income_rates[i],
                income_tax[i],
            ));
        }
    }

    if r.dividend_tax.allowance_applied > 0 {
        rows.push(BreakdownRow::banded(
            "Dividend allowance",
            r.dividend_tax.allowance_applied,
            0,
            0,
        ));
    }
    let dividend_rates = [rates.div_basic_bps, rates.div_higher_bps, rates.div_additional_bps];
    let dividend_tax = [
        r.dividend_tax.basic,
        r.dividend_tax.higher,
        r.dividend_tax.additional,
    ];
    for (i, band) in TaxBand::ALL.iter().enumerate() {
        let amount = r.dividend_tax.taxable.get(*band);
        if amount > 0 {
            rows.push(BreakdownRow::banded(
                format!("Dividend tax ({})", band.name().to_lowercase()),
                amount,
                dividend_rates[i],
                dividend_tax[i],
            ));
        }
    }

    rows.push(BreakdownRow {
        rate: format_percent(i64::from(rates.ni_main_bps)),
        ..BreakdownRow::new("National Insurance (main)", r.national_insurance.main)
    });
    if r.national_insurance.upper > 0 {
        rows.push(BreakdownRow {
            rate: format_percent(i64::from(rates.ni_upper_bps)),
            ..BreakdownRow::new("National Insurance (upper)", r.national_insurance.upper)
        });
    }
    if r.student_loan.amount > 0 {
        rows.push(BreakdownRow {
            rate: format_percent(i64::from(rates.sl_rate_bps)),
            ..BreakdownRow::new(
                format!("Student loan ({})", r.student_loan.plan),
                r.student_loan.amount,
            )
        });
    }

    rows.push(BreakdownRow::new("Total tax", r.totals.tax_only).monthly(r.totals.monthly.tax_only));
    rows.push(
        BreakdownRow::new("Total tax and NI", r.totals.tax_and_ni)
            .monthly(r.totals.monthly.tax_and_ni),
    );
    rows.push(
        BreakdownRow::new("Net income", r.totals.net_income).monthly(r.totals.monthly.net_income),
    );
    rows
}

fn print_breakdown(r: &TaxCalculation, config: &TaxYearConfig) {
    println!();
    println!(
        "TAKE-HOME PAY ({}) - salary {}, dividends {}, student loan {}",
        r.tax_year,
        format_gbp(to_pence(r.inputs.salary)),
        format_gbp(to_pence(r.inputs.dividends)),
        r.student_loan.plan
    );
    println!();

    let table = Table::new(breakdown_rows(r, config))
        .with(Style::rounded())
        .with(Modify::new(Columns::new(1..)).with(Alignment::right()))
        .to_string();
    println!("{}", table);
    println!();
    println!(
        "Effective tax rate: {} | Take-home rate: {} | Total deductions: {}",
        format_percent(r.effective_tax_rate_bps()),
        format_percent(r.take_home_rate_bps()),
        format_gbp(r.total_deductions())
    );
    println!();
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use takehome::core::StudentLoanPlan;

    fn rows(salary: Decimal, dividends: Decimal, plan: StudentLoanPlan) -> Vec<BreakdownRow> {
        let config = TaxYearConfig::y2024_25();
        let result = calculate(&Inputs::new(salary, dividends, plan), &config);
        breakdown_rows(&result, &config)
    }

    fn find<'a>(rows: &'a [BreakdownRow], item: &str) -> Option<&'a BreakdownRow> {
        rows.iter().find(|r| r.item == item)
    }

    #[test]
    fn additional_rate_row_for_high_salary() {
        let rows = rows(dec!(130000), dec!(0), StudentLoanPlan::None);
        let row = find(&rows, "Income tax (additional)").unwrap();
        assert_eq!(row.amount, "£4,860.00");
        assert_eq!(row.rate, "45.00%");
        assert_eq!(row.annual, "£2,187.00");
        assert_eq!(find(&rows, "Personal allowance").unwrap().annual, "£0.00");
    }

    #[test]
    fn empty_bands_are_omitted() {
        let rows = rows(dec!(30000), dec!(0), StudentLoanPlan::None);
        assert!(find(&rows, "Income tax (basic)").is_some());
        assert!(find(&rows, "Income tax (higher)").is_none());
        assert!(find(&rows, "Dividend allowance").is_none());
        assert!(find(&rows, "National Insurance (upper)").is_none());
    }

    #[test]
    fn dividend_and_student_loan_rows() {
        let rows = rows(dec!(50000), dec!(10000), StudentLoanPlan::Plan1);
        let allowance = find(&rows, "Dividend allowance").unwrap();
        assert_eq!(allowance.amount, "£500.00");
        assert_eq!(allowance.rate, "0.00%");
        let higher = find(&rows, "Dividend tax (higher)").unwrap();
        assert_eq!(higher.annual, "£3,206.25");
        assert_eq!(higher.rate, "33.75%");
        assert!(find(&rows, "Student loan (plan_1)").is_some());
    }

    #[test]
    fn totals_carry_monthly_figures() {
        let rows = rows(dec!(50000), dec!(0), StudentLoanPlan::None);
        let net = rows.last().unwrap();
        assert_eq!(net.item, "Net income");
        assert_eq!(net.annual, "£39,519.60");
        assert_eq!(net.monthly, "£3,293.30");
        assert_eq!(find(&rows, "Total tax and NI").unwrap().monthly, "£873.37");
    }
}
