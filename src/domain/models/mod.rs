//! Domain models for the blood ledger.

pub mod blood_bag;
pub mod blood_group;
pub mod donor;

pub use blood_bag::{BloodBag, SHELF_LIFE_DAYS};
pub use blood_group::{BloodGroup, ParseBloodGroupError, ALL_GROUPS};
pub use donor::{Donor, MIN_DONATION_GAP_DAYS};
