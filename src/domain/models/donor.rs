use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::blood_group::BloodGroup;

/// Minimum number of days a donor must wait between donations.
pub const MIN_DONATION_GAP_DAYS: i64 = 120;

/// A registered donor. Field order matches the donor table record layout:
/// `id,name,phone,email,bloodGroup,lastDonationDate`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Donor {
    pub id: u32,
    pub name: String,
    pub phone: String,
    pub email: String,
    pub blood_group: BloodGroup,
    pub last_donation: NaiveDate,
}

impl Donor {
    /// Days elapsed since this donor's last recorded donation.
    /// Derived at query time; never stored on the record.
    pub fn days_since_donation(&self, today: NaiveDate) -> i64 {
        (today - self.last_donation).num_days()
    }

    /// Whether this donor meets the minimum gap rule as of `today`.
    pub fn is_eligible(&self, today: NaiveDate) -> bool {
        self.days_since_donation(today) >= MIN_DONATION_GAP_DAYS
    }
}
