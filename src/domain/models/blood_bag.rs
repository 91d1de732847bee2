use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::blood_group::BloodGroup;

/// Number of days a collected bag stays usable.
pub const SHELF_LIFE_DAYS: i64 = 30;

/// One collected unit of blood. Field order matches the stock table record
/// layout: `id,bloodGroup,collectionDate`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BloodBag {
    pub id: u32,
    pub blood_group: BloodGroup,
    pub collected_on: NaiveDate,
}

impl BloodBag {
    /// Age of the bag in days as of `today`. Derived at query time; a
    /// collection date in the future yields a negative age.
    pub fn age_days(&self, today: NaiveDate) -> i64 {
        (today - self.collected_on).num_days()
    }

    /// Whether the bag has outlived its shelf life as of `today`.
    pub fn is_expired(&self, today: NaiveDate) -> bool {
        self.age_days(today) > SHELF_LIFE_DAYS
    }
}
