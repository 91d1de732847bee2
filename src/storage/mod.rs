//! # Storage
//!
//! This module defines the storage abstraction trait that allows the domain
//! layer to work with different backing stores without modification, plus the
//! flat-file CSV implementation the institute actually runs on.

pub mod csv;

use anyhow::Result;
use indexmap::IndexMap;

use crate::domain::models::{BloodBag, Donor};

pub use self::csv::{BagRepository, CsvConnection, CsvLedgerStore, DonorRepository};

/// Interface between the ledger service and its backing store.
///
/// Both tables load into insertion-ordered maps keyed by record id; the
/// insertion order of the load drives the deterministic first-match scan in
/// demand fulfillment.
pub trait LedgerStorage: Send + Sync {
    /// Load the donor table. Any malformed record is an error; no partial
    /// table is ever returned.
    fn load_donors(&self) -> Result<IndexMap<u32, Donor>>;

    /// Load the stock table. Same failure contract as `load_donors`.
    fn load_bags(&self) -> Result<IndexMap<u32, BloodBag>>;

    /// Persist both tables as one logical transaction: either both files
    /// reflect the given maps afterwards, or neither does.
    fn save_tables(
        &self,
        donors: &IndexMap<u32, Donor>,
        bags: &IndexMap<u32, BloodBag>,
    ) -> Result<()>;
}
