pub mod batch;
pub mod calc;
pub mod display;
pub mod schema;
pub mod years;

use anyhow::Context;
use chrono::NaiveDate;
use clap::{Args, ValueEnum};
use std::fs::File;
use std::io::{self, BufReader, Read};
use std::path::{Path, PathBuf};
use takehome::core::{StudentLoanPlan, TaxYearConfig, TaxYears};

/// Options selecting which tax year configuration to use
#[derive(Args, Debug, Clone, Default)]
pub struct YearArgs {
    /// Tax year (e.g. 2024/25); defaults to the active year
    #[arg(short, long, conflicts_with = "date")]
    pub year: Option<String>,

    /// Use the tax year containing this date (YYYY-MM-DD)
    #[arg(long)]
    pub date: Option<NaiveDate>,

    /// JSON file with additional or replacement tax years
    #[arg(short, long)]
    pub config: Option<PathBuf>,
}

impl YearArgs {
    pub fn tax_years(&self) -> anyhow::Result<TaxYears> {
        load_tax_years(self.config.as_deref())
    }

    /// Resolve the selected configuration from `years`
    pub fn select<'a>(&self, years: &'a TaxYears) -> anyhow::Result<&'a TaxYearConfig> {
        let config = match (&self.year, self.date) {
            (Some(label), _) => years.get(label)?,
            (None, Some(date)) => years.for_date(date)?,
            (None, None) => years.active()?,
        };
        log::info!("Using tax year {}", config.year_label);
        Ok(config)
    }
}

/// Built-in tax years, merged with the years of a JSON file if given
pub fn load_tax_years(path: Option<&Path>) -> anyhow::Result<TaxYears> {
    let mut years = TaxYears::builtin();
    if let Some(path) = path {
        let file = File::open(path)
            .with_context(|| format!("Failed to open config file {}", path.display()))?;
        years
            .load_json(BufReader::new(file))
            .with_context(|| format!("Failed to load config file {}", path.display()))?;
    }
    Ok(years)
}

/// Read a whole file, or stdin when the path is "-"
pub fn read_input(path: &Path) -> anyhow::Result<Vec<u8>> {
    let mut buffer = Vec::new();
    if path.as_os_str() == "-" {
        io::stdin().lock().read_to_end(&mut buffer)?;
        if buffer.is_empty() {
            anyhow::bail!("No input received. Provide a file or pipe data to stdin.");
        }
    } else {
        File::open(path)
            .with_context(|| format!("Failed to open {}", path.display()))?
            .read_to_end(&mut buffer)?;
    }
    Ok(buffer)
}

#[derive(Debug, Clone, Copy, Default, ValueEnum)]
pub enum StudentLoanArg {
    #[default]
    None,
    #[value(name = "plan_1", alias = "plan-1", alias = "plan1")]
    Plan1,
    #[value(name = "plan_2", alias = "plan-2", alias = "plan2")]
    Plan2,
}

impl From<StudentLoanArg> for StudentLoanPlan {
    fn from(arg: StudentLoanArg) -> Self {
        match arg {
            StudentLoanArg::None => StudentLoanPlan::None,
            StudentLoanArg::Plan1 => StudentLoanPlan::Plan1,
            StudentLoanArg::Plan2 => StudentLoanPlan::Plan2,
        }
    }
}
