//! Interactive menu for the institute's front desk. One operation runs to
//! completion (including any blocking confirmation prompt) before the menu
//! is presented again.

use std::io::{self, Write};

use anyhow::{Context, Result};
use chrono::{Local, NaiveDate};
use log::debug;

use crate::chart::ChartRenderer;
use crate::demand::DemandSource;
use crate::domain::models::MIN_DONATION_GAP_DAYS;
use crate::domain::{DemandOutcome, DonationEligibility, LedgerService};
use crate::storage::LedgerStorage;

/// The five numbered main-menu commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuChoice {
    CheckInventory,
    AttendDemand,
    RecordDonation,
    StockReport,
    Exit,
}

impl MenuChoice {
    /// Parse a menu selection. `None` for anything that is not 1..=5.
    pub fn parse(input: &str) -> Option<MenuChoice> {
        match input.trim().parse::<u32>().ok()? {
            1 => Some(MenuChoice::CheckInventory),
            2 => Some(MenuChoice::AttendDemand),
            3 => Some(MenuChoice::RecordDonation),
            4 => Some(MenuChoice::StockReport),
            5 => Some(MenuChoice::Exit),
            _ => None,
        }
    }
}

fn display_menu() {
    println!("------------");
    println!("Main Menu");
    println!("------------");
    println!("(1) Check inventory");
    println!("(2) Attend to blood demand");
    println!("(3) Record new donation");
    println!("(4) Stock visual report");
    println!("(5) Exit");
}

/// Print `label` and read one line from stdin.
pub fn prompt(label: &str) -> Result<String> {
    print!("{label}");
    io::stdout().flush()?;
    let mut line = String::new();
    io::stdin()
        .read_line(&mut line)
        .context("failed to read from stdin")?;
    Ok(line.trim().to_string())
}

/// Yes/no confirmation. Anything other than an explicit yes counts as no.
pub fn confirm(label: &str) -> Result<bool> {
    let answer = prompt(label)?;
    Ok(matches!(answer.as_str(), "y" | "Y" | "yes" | "Yes" | "YES"))
}

/// Run the menu loop until the user exits. Recoverable errors are reported
/// and the menu is re-presented; only stdin/stdout failures propagate.
pub fn run<S: LedgerStorage>(
    ledger: &mut LedgerService<S>,
    demand: &dyn DemandSource,
    chart: &dyn ChartRenderer,
) -> Result<()> {
    loop {
        println!();
        display_menu();
        let input = prompt("Enter your choice: ")?;
        let Some(choice) = MenuChoice::parse(&input) else {
            println!("Please enter a number between 1 and 5.");
            continue;
        };
        debug!("menu choice: {:?}", choice);

        let today = Local::now().date_naive();
        let result = match choice {
            MenuChoice::CheckInventory => check_inventory(ledger, today),
            MenuChoice::AttendDemand => attend_demand(ledger, demand),
            MenuChoice::RecordDonation => record_donation(ledger, today),
            MenuChoice::StockReport => stock_report(ledger, chart),
            MenuChoice::Exit => {
                println!("Thank you for using the LifeServe Blood Institute ledger. Goodbye!");
                return Ok(());
            }
        };

        // Operation-level failures are recoverable: report and re-present
        // the menu.
        if let Err(e) = result {
            println!("Error: {e:#}");
        }
    }
}

fn check_inventory<S: LedgerStorage>(
    ledger: &mut LedgerService<S>,
    today: NaiveDate,
) -> Result<()> {
    let expired = ledger.check_inventory(today)?;
    if expired.is_empty() {
        println!("All {} bags are within their shelf life.", ledger.bags().len());
        return Ok(());
    }

    println!("The following bags have expired and were removed from the inventory:");
    for bag in &expired {
        println!(
            "  bag {:>4}  {}  collected {}",
            bag.id, bag.blood_group, bag.collected_on
        );
    }
    // The records are already gone; this acknowledges the physical disposal.
    prompt("Press Enter once the listed bags have been discarded... ")?;
    println!("Disposal noted.");
    Ok(())
}

fn attend_demand<S: LedgerStorage>(
    ledger: &mut LedgerService<S>,
    demand: &dyn DemandSource,
) -> Result<()> {
    let Some(required) = demand.current_demand()? else {
        println!("The hospital demand service is unavailable. Please try again later.");
        return Ok(());
    };

    println!("Current demand: {required}");
    match ledger.attend_demand(required)? {
        DemandOutcome::Dispatched(bag) => {
            println!("Dispatched bag {} ({}).", bag.id, bag.blood_group);
        }
        DemandOutcome::Appeal(contacts) if contacts.is_empty() => {
            println!("No compatible bag in stock and no compatible donor on record.");
        }
        DemandOutcome::Appeal(contacts) => {
            println!("No compatible bag in stock. Donors to contact for an appeal:");
            for donor in &contacts {
                println!(
                    "  {:>4}  {}  {}  ({})",
                    donor.id, donor.name, donor.phone, donor.blood_group
                );
            }
        }
    }
    Ok(())
}

fn record_donation<S: LedgerStorage>(
    ledger: &mut LedgerService<S>,
    today: NaiveDate,
) -> Result<()> {
    let input = prompt("Donor id: ")?;
    let Ok(donor_id) = input.parse::<u32>() else {
        println!("A donor id must be a positive whole number.");
        return Ok(());
    };

    match ledger.prepare_donation(donor_id, today)? {
        DonationEligibility::TooRecent {
            days_since_last, ..
        } => {
            println!(
                "Donor {} last donated {} days ago; a minimum gap of {} days is required.",
                donor_id, days_since_last, MIN_DONATION_GAP_DAYS
            );
        }
        DonationEligibility::Eligible(pending) => {
            let question = format!(
                "Record a new {} bag collected today ({}) (y/n)? ",
                pending.blood_group, pending.collected_on
            );
            if confirm(&question)? {
                let bag = ledger.commit_donation(pending)?;
                println!("Recorded bag {} ({}). Thank you, donor {}!", bag.id, bag.blood_group, donor_id);
            } else {
                // Dropping the pending donation cancels everything, the
                // donor's date update included.
                println!("Donation not recorded.");
            }
        }
    }
    Ok(())
}

fn stock_report<S: LedgerStorage>(
    ledger: &LedgerService<S>,
    chart: &dyn ChartRenderer,
) -> Result<()> {
    let counts = ledger.stock_report();
    if counts.is_empty() {
        println!("No bags in stock.");
        return Ok(());
    }
    println!("Stock by blood group:");
    chart.render(&counts)
}
