use anyhow::{Context, Result};
use clap::Parser;
use log::info;

use blood_ledger::chart::TextBarChart;
use blood_ledger::cli;
use blood_ledger::demand::{DemandFeed, DEFAULT_DEMAND_FEED};
use blood_ledger::domain::LedgerService;
use blood_ledger::storage::csv::{DEFAULT_BAGS_TABLE, DEFAULT_DONORS_TABLE};
use blood_ledger::storage::{CsvConnection, CsvLedgerStore};

/// LifeServe Blood Institute donor and stock ledger.
#[derive(Debug, Parser)]
#[command(name = "blood-ledger", version, about)]
struct Args {
    /// Donor table path; prompted for interactively when omitted
    #[arg(long)]
    donors: Option<String>,

    /// Stock table path; prompted for interactively when omitted
    #[arg(long)]
    bags: Option<String>,

    /// Hospital demand feed path
    #[arg(long, default_value = DEFAULT_DEMAND_FEED)]
    demand_feed: String,
}

/// Prompt for a table name, accepting the default on an empty line.
fn prompt_table_name(label: &str, default: &str) -> Result<String> {
    let input = cli::prompt(&format!("{label} ({default}): "))?;
    if input.is_empty() {
        Ok(default.to_string())
    } else {
        Ok(input)
    }
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    println!("<<< LifeServe Blood Institute >>>\n");
    println!("Loading database...");

    let donors = match args.donors {
        Some(name) => name,
        None => {
            println!("Enter the database file names without .txt extension");
            println!("or just press Enter to accept defaults");
            prompt_table_name("Donors database", DEFAULT_DONORS_TABLE)?
        }
    };
    let bags = match args.bags {
        Some(name) => name,
        None => prompt_table_name("Stock inventory database", DEFAULT_BAGS_TABLE)?,
    };

    let connection = CsvConnection::new(&donors, &bags);
    info!(
        "opening ledger: donors={}, bags={}",
        connection.donors_path().display(),
        connection.bags_path().display()
    );

    let store = CsvLedgerStore::new(connection);
    let mut ledger = LedgerService::load(store).context("failed to load the ledger database")?;
    println!("Database loaded successfully\n");

    let demand = DemandFeed::new(args.demand_feed);
    cli::run(&mut ledger, &demand, &TextBarChart)
}
