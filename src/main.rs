use clap::{Parser, Subcommand};

mod cmd;
mod utils;

use cmd::{batch::BatchCommand, calc::CalcCommand, schema::SchemaCommand, years::YearsCommand};

#[derive(Parser, Debug)]
#[command(name = "takehome", version, author)]
#[command(about = "Calculate UK income tax, dividend tax, National Insurance and student loan")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Breakdown for one salary and dividends scenario
    Calc(CalcCommand),
    /// Calculate every scenario in a CSV file
    Batch(BatchCommand),
    /// List supported tax years
    Years(YearsCommand),
    /// Print expected input formats
    Schema(SchemaCommand),
}

fn main() -> anyhow::Result<()> {
    pretty_env_logger::init();
    let cli = Cli::parse();
    log::debug!("{:?}", cli);

    match cli.command {
        Command::Calc(cmd) => cmd.exec(),
        Command::Batch(cmd) => cmd.exec(),
        Command::Years(cmd) => cmd.exec(),
        Command::Schema(cmd) => cmd.exec(),
    }
}
