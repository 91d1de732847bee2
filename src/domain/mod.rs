//! Domain layer: models and the ledger service that implements the
//! institute's business rules on top of a storage backend.

pub mod ledger_service;
pub mod models;

pub use ledger_service::{DemandOutcome, DonationEligibility, LedgerService, PendingDonation};
