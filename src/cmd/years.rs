//! Years command - list supported tax year configurations

use super::display::{format_gbp, format_percent};
use super::load_tax_years;
use clap::Args;
use std::path::PathBuf;
use tabled::{
    settings::{object::Columns, Alignment, Modify, Style},
    Table, Tabled,
};
use takehome::core::{TaxYear, TaxYearConfig, TaxYears};

#[derive(Args, Debug)]
pub struct YearsCommand {
    /// JSON file with additional or replacement tax years
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Print the years as a JSON config file (usable as a --config template)
    #[arg(long)]
    json: bool,
}

impl YearsCommand {
    pub fn exec(&self) -> anyhow::Result<()> {
        let years = load_tax_years(self.config.as_deref())?;
        if self.json {
            println!("{}", serde_json::to_string_pretty(&years.to_file())?);
        } else {
            self.print_table(&years)?;
        }
        Ok(())
    }

    fn print_table(&self, years: &TaxYears) -> anyhow::Result<()> {
        let active = years.active()?.year_label.clone();
        let thresholds: Vec<_> = years.iter().map(|c| ThresholdRow::new(c, &active)).collect();
        let rates: Vec<_> = years.iter().map(RateRow::new).collect();

        println!();
        println!("THRESHOLDS");
        println!(
            "{}",
            Table::new(thresholds)
                .with(Style::rounded())
                .with(Modify::new(Columns::new(1..)).with(Alignment::right()))
        );
        println!();
        println!("RATES");
        println!(
            "{}",
            Table::new(rates)
                .with(Style::rounded())
                .with(Modify::new(Columns::new(1..)).with(Alignment::right()))
        );
        println!();
        Ok(())
    }
}

#[derive(Debug, Clone, Tabled)]
struct ThresholdRow {
    #[tabled(rename = "Tax Year")]
    year: String,
    #[tabled(rename = "Period")]
    period: String,
    #[tabled(rename = "Personal Allowance")]
    personal_allowance: String,
    #[tabled(rename = "Taper From")]
    taper_start: String,
    #[tabled(rename = "Basic Band")]
    basic_rate_band: String,
    #[tabled(rename = "Additional From")]
    additional_rate_threshold: String,
    #[tabled(rename = "Dividend Allowance")]
    dividend_allowance: String,
    #[tabled(rename = "NI PT")]
    primary_threshold: String,
    #[tabled(rename = "NI UEL")]
    upper_earnings_limit: String,
    #[tabled(rename = "Plan 1")]
    plan_1: String,
    #[tabled(rename = "Plan 2")]
    plan_2: String,
}

impl ThresholdRow {
    fn new(c: &TaxYearConfig, active: &str) -> Self {
        let year = if c.year_label == active {
            format!("{} *", c.year_label)
        } else {
            c.year_label.clone()
        };
        ThresholdRow {
            year,
            period: period(&c.year_label),
            personal_allowance: format_gbp(c.personal_allowance),
            taper_start: format_gbp(c.personal_allowance_taper_start),
            basic_rate_band: format_gbp(c.basic_rate_band),
            additional_rate_threshold: format_gbp(c.additional_rate_threshold),
            dividend_allowance: format_gbp(c.dividend_allowance),
            primary_threshold: format_gbp(c.ni.primary_threshold),
            upper_earnings_limit: format_gbp(c.ni.upper_earnings_limit),
            plan_1: format_gbp(c.student_loans.plan_1.threshold),
            plan_2: format_gbp(c.student_loans.plan_2.threshold),
        }
    }
}

/// "06/04/2024 - 05/04/2025", or empty for labels that are not a tax year
fn period(label: &str) -> String {
    let Ok(year) = label.parse::<TaxYear>() else {
        return String::new();
    };
    match (year.start_date(), year.end_date()) {
        (Some(start), Some(end)) => {
            format!("{} - {}", start.format("%d/%m/%Y"), end.format("%d/%m/%Y"))
        }
        _ => String::new(),
    }
}

#[derive(Debug, Clone, Tabled)]
struct RateRow {
    #[tabled(rename = "Tax Year")]
    year: String,
    #[tabled(rename = "Income")]
    income: String,
    #[tabled(rename = "Dividends")]
    dividends: String,
    #[tabled(rename = "NI")]
    ni: String,
    #[tabled(rename = "Student Loan")]
    student_loan: String,
}

impl RateRow {
    fn new(c: &TaxYearConfig) -> Self {
        let r = &c.rates;
        let three = |basic: u32, higher: u32, additional: u32| {
            [basic, higher, additional]
                .map(|bps| format_percent(i64::from(bps)))
                .join(" / ")
        };
        RateRow {
            year: c.year_label.clone(),
            income: three(r.income_basic_bps, r.income_higher_bps, r.income_additional_bps),
            dividends: three(r.div_basic_bps, r.div_higher_bps, r.div_additional_bps),
            ni: format!(
                "{} / {}",
                format_percent(i64::from(r.ni_main_bps)),
                format_percent(i64::from(r.ni_upper_bps))
            ),
            student_loan: format_percent(i64::from(r.sl_rate_bps)),
        }
    }
}
