//! # CSV Storage Module
//!
//! Flat-file storage implementation for the blood ledger. Both tables are
//! plain comma-separated text with no header and no escaping:
//!
//! ```csv
//! 7,Jane Doe,555-1212,jane@x.com,O-,2024-01-01
//! ```
//!
//! Saves write both tables to temp files first and rename only after both
//! writes succeed, so the pair of files never diverges from the in-memory
//! state on a half-failed save.

pub mod bag_repository;
pub mod connection;
pub mod donor_repository;

pub use bag_repository::BagRepository;
pub use connection::{CsvConnection, DEFAULT_BAGS_TABLE, DEFAULT_DONORS_TABLE};
pub use donor_repository::DonorRepository;

use std::fs;

use anyhow::{Context, Result};
use indexmap::IndexMap;

use crate::domain::models::{BloodBag, Donor};
use crate::storage::LedgerStorage;

/// Flat-file ledger store combining the donor and stock repositories.
#[derive(Debug, Clone)]
pub struct CsvLedgerStore {
    connection: CsvConnection,
    donor_repository: DonorRepository,
    bag_repository: BagRepository,
}

impl CsvLedgerStore {
    pub fn new(connection: CsvConnection) -> Self {
        let donor_repository = DonorRepository::new(connection.clone());
        let bag_repository = BagRepository::new(connection.clone());
        Self {
            connection,
            donor_repository,
            bag_repository,
        }
    }

    pub fn connection(&self) -> &CsvConnection {
        &self.connection
    }
}

impl LedgerStorage for CsvLedgerStore {
    fn load_donors(&self) -> Result<IndexMap<u32, Donor>> {
        self.donor_repository.read_all()
    }

    fn load_bags(&self) -> Result<IndexMap<u32, BloodBag>> {
        self.bag_repository.read_all()
    }

    fn save_tables(
        &self,
        donors: &IndexMap<u32, Donor>,
        bags: &IndexMap<u32, BloodBag>,
    ) -> Result<()> {
        let donors_path = self.connection.donors_path();
        let bags_path = self.connection.bags_path();
        let donors_tmp = donors_path.with_extension("tmp");
        let bags_tmp = bags_path.with_extension("tmp");

        // Stage both tables before renaming either one.
        self.donor_repository.write_to(&donors_tmp, donors)?;
        self.bag_repository.write_to(&bags_tmp, bags)?;

        fs::rename(&donors_tmp, donors_path)
            .with_context(|| format!("cannot replace donor table {}", donors_path.display()))?;
        fs::rename(&bags_tmp, bags_path)
            .with_context(|| format!("cannot replace stock table {}", bags_path.display()))?;
        Ok(())
    }
}
