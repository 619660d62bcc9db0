mod commands;
mod input;
mod output;

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use std::process;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use commands::affordability::AffordabilityArgs;
use commands::calculator::{CalculateArgs, FieldsArgs};
use commands::dscr::DscrArgs;
use commands::purchase::PurchaseArgs;
use commands::refinance::RefinanceArgs;
use commands::rent_vs_buy::RentVsBuyArgs;
use commands::schedule::ScheduleArgs;

/// Fixed-rate mortgage calculations
#[derive(Parser)]
#[command(
    name = "mtg",
    version,
    about = "Fixed-rate mortgage calculations",
    long_about = "A CLI for mortgage payment, refinance, rent-vs-buy, rental DSCR and \
                  affordability analysis with decimal precision. Inputs are JSON or YAML \
                  files, piped JSON, or flags."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format
    #[arg(long, default_value = "json", global = true)]
    output: OutputFormat,

    /// Log engine diagnostics to stderr (overridden by RUST_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Monthly payment, program fee and payoff for a home purchase
    Purchase(PurchaseArgs),
    /// Compare an existing loan against a refinance
    Refinance(RefinanceArgs),
    /// Total cost of renting vs. buying over a holding period
    RentVsBuy(RentVsBuyArgs),
    /// Debt service coverage and returns for a rental property
    Dscr(DscrArgs),
    /// Maximum affordable home price from income and debts
    Affordability(AffordabilityArgs),
    /// Month-by-month or yearly amortization schedule
    Schedule(ScheduleArgs),
    /// Print the input fields a calculator accepts
    Fields(FieldsArgs),
    /// Run a calculator from a flat name -> number input map
    Calculate(CalculateArgs),
    /// Print version information
    Version,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
    Csv,
    Minimal,
}

fn init_logging(verbose: bool) {
    let fallback = if verbose {
        "mortgage_engine_core=debug,mtg=debug"
    } else {
        "mortgage_engine_core=warn"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback));

    // stdout carries results only
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result: Result<serde_json::Value, Box<dyn std::error::Error>> = match cli.command {
        Commands::Purchase(args) => commands::purchase::run_purchase(args),
        Commands::Refinance(args) => commands::refinance::run_refinance(args),
        Commands::RentVsBuy(args) => commands::rent_vs_buy::run_rent_vs_buy(args),
        Commands::Dscr(args) => commands::dscr::run_dscr(args),
        Commands::Affordability(args) => commands::affordability::run_affordability(args),
        Commands::Schedule(args) => commands::schedule::run_schedule(args),
        Commands::Fields(args) => commands::calculator::run_fields(args),
        Commands::Calculate(args) => commands::calculator::run_calculate(args),
        Commands::Version => {
            println!("mtg {}", env!("CARGO_PKG_VERSION"));
            return;
        }
    };

    match result {
        Ok(value) => {
            output::format_output(&cli.output, &value);
            process::exit(0);
        }
        Err(e) => {
            tracing::debug!(error = %e, "command failed");
            eprintln!("{}: {}", "error".red().bold(), e);
            process::exit(1);
        }
    }
}
