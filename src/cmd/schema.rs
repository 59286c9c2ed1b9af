//! Schema command - print expected input formats

use super::batch::ScenarioRecord;
use clap::Args;
use schemars::schema_for;
use takehome::core::TaxYearFile;

/// Column of a CSV input format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CsvField {
    pub name: &'static str,
    pub required: bool,
    pub description: &'static str,
}

#[derive(Args, Debug)]
pub struct SchemaCommand {
    /// Output format
    #[arg(value_enum, default_value = "json-schema")]
    format: SchemaFormat,
}

#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub enum SchemaFormat {
    /// JSON Schema of the tax year configuration file
    JsonSchema,
    /// CSV header row of the batch scenario file
    CsvHeader,
    /// Column descriptions of the batch scenario file
    CsvFields,
}

impl SchemaCommand {
    pub fn exec(&self) -> anyhow::Result<()> {
        match self.format {
            SchemaFormat::JsonSchema => self.print_json_schema(),
            SchemaFormat::CsvHeader => self.print_csv_header(),
            SchemaFormat::CsvFields => self.print_csv_fields(),
        }
    }

    fn print_json_schema(&self) -> anyhow::Result<()> {
        let schema = schema_for!(TaxYearFile);
        println!("{}", serde_json::to_string_pretty(&schema)?);
        Ok(())
    }

    fn print_csv_header(&self) -> anyhow::Result<()> {
        println!("{}", csv_header(ScenarioRecord::csv_schema()));
        Ok(())
    }

    fn print_csv_fields(&self) -> anyhow::Result<()> {
        println!("Batch Scenario CSV Format");
        println!("=========================");
        println!();
        for field in ScenarioRecord::csv_schema() {
            let req = if field.required { "required" } else { "optional" };
            println!("{:14} ({:8})  {}", field.name, req, field.description);
        }
        println!();
        println!("Amounts are annual pounds; money in the config file is in pence and rates in basis points");
        Ok(())
    }
}

fn csv_header(fields: &[CsvField]) -> String {
    fields.iter().map(|f| f.name).collect::<Vec<_>>().join(",")
}
