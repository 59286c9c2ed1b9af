//! Batch command - calculate many scenarios from a CSV file

use super::schema::CsvField;
use super::{read_input, YearArgs};
use crate::utils::write_csv;
use anyhow::Context;
use clap::Args;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::io;
use std::path::PathBuf;
use takehome::core::{
    calculate, parse_amount, pounds, Inputs, StudentLoanPlan, TaxCalculation, TaxYears,
};
use takehome_derive::CsvSchema;

#[derive(Args, Debug)]
pub struct BatchCommand {
    /// CSV file of scenarios, or "-" to read stdin
    #[arg(short, long)]
    input: PathBuf,

    /// JSON file with additional or replacement tax years
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Output as JSON instead of CSV
    #[arg(long)]
    json: bool,
}

/// One scenario to calculate
#[derive(Debug, Clone, Deserialize, CsvSchema)]
pub struct ScenarioRecord {
    /// Identifier copied to the output row
    #[serde(default)]
    pub id: Option<String>,
    /// Annual salary in pounds (up to 2 decimal places)
    pub salary: String,
    /// Annual dividends in pounds (up to 2 decimal places)
    #[serde(default)]
    pub dividends: Option<String>,
    /// none, plan_1 or plan_2
    #[serde(default)]
    pub student_loan: Option<String>,
    /// Tax year label such as 2024/25 (defaults to the active year)
    #[serde(default)]
    pub tax_year: Option<String>,
}

impl ScenarioRecord {
    fn inputs(&self) -> anyhow::Result<Inputs> {
        let salary = parse_amount(&self.salary)?;
        let dividends = match &self.dividends {
            Some(d) => parse_amount(d)?,
            None => Decimal::ZERO,
        };
        let student_loan = match &self.student_loan {
            Some(plan) => plan.parse::<StudentLoanPlan>()?,
            None => StudentLoanPlan::None,
        };
        Ok(Inputs::new(salary, dividends, student_loan))
    }
}

/// Result row, amounts in pounds
#[derive(Debug, Clone, Serialize)]
pub struct ScenarioResult {
    id: String,
    tax_year: String,
    salary: Decimal,
    dividends: Decimal,
    student_loan_plan: StudentLoanPlan,
    personal_allowance: Decimal,
    income_tax: Decimal,
    dividend_tax: Decimal,
    national_insurance: Decimal,
    student_loan: Decimal,
    tax_and_ni: Decimal,
    net_income: Decimal,
    monthly_net_income: Decimal,
}

impl ScenarioResult {
    fn new(id: String, r: &TaxCalculation) -> Self {
        ScenarioResult {
            id,
            tax_year: r.tax_year.clone(),
            salary: r.inputs.salary,
            dividends: r.inputs.dividends,
            student_loan_plan: r.student_loan.plan,
            personal_allowance: pounds(r.personal_allowance),
            income_tax: pounds(r.income_tax.total),
            dividend_tax: pounds(r.dividend_tax.total),
            national_insurance: pounds(r.national_insurance.total),
            student_loan: pounds(r.student_loan.amount),
            tax_and_ni: pounds(r.totals.tax_and_ni),
            net_income: pounds(r.totals.net_income),
            monthly_net_income: pounds(r.totals.monthly.net_income),
        }
    }
}

impl BatchCommand {
    pub fn exec(&self) -> anyhow::Result<()> {
        let years = YearArgs {
            config: self.config.clone(),
            ..YearArgs::default()
        }
        .tax_years()?;
        let data = read_input(&self.input)?;
        let results = calculate_scenarios(data.as_slice(), &years)?;
        log::info!("Calculated {} scenarios", results.len());

        if self.json {
            println!("{}", serde_json::to_string_pretty(&results)?);
            Ok(())
        } else {
            write_csv(results, io::stdout())
        }
    }
}

/// Read scenario rows and calculate each one. Fails on the first invalid row,
/// naming its line number.
pub fn calculate_scenarios<R: io::Read>(
    reader: R,
    years: &TaxYears,
) -> anyhow::Result<Vec<ScenarioResult>> {
    let mut rdr = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut results = Vec::new();
    for (i, record) in rdr.deserialize::<ScenarioRecord>().enumerate() {
        // header is line 1
        let line = i + 2;
        let record = record.with_context(|| format!("Invalid scenario on line {}", line))?;
        let inputs = record
            .inputs()
            .with_context(|| format!("Invalid scenario on line {}", line))?;
        let config = match record.tax_year.as_deref().filter(|y| !y.is_empty()) {
            Some(label) => years.get(label),
            None => years.active(),
        }
        .with_context(|| format!("Invalid scenario on line {}", line))?;

        let result = calculate(&inputs, config);
        let id = record.id.unwrap_or_else(|| (line - 1).to_string());
        results.push(ScenarioResult::new(id, &result));
    }
    Ok(results)
}
