use anyhow::{anyhow, bail, Result};
use chrono::NaiveDate;
use indexmap::IndexMap;
use log::{info, warn};

use crate::domain::models::{BloodBag, BloodGroup, Donor, MIN_DONATION_GAP_DAYS, SHELF_LIFE_DAYS};
use crate::storage::LedgerStorage;

/// Outcome of a demand-fulfillment request.
#[derive(Debug, Clone, PartialEq)]
pub enum DemandOutcome {
    /// A compatible bag was found, removed from the inventory and persisted.
    Dispatched(BloodBag),
    /// No compatible bag in stock; these donors can be contacted for a fresh
    /// donation appeal. Nothing was mutated.
    Appeal(Vec<Donor>),
}

/// A donation that passed the eligibility check but has not been committed.
/// Dropping it cancels the whole transaction; nothing is mutated until
/// [`LedgerService::commit_donation`] runs.
#[derive(Debug, Clone, PartialEq)]
pub struct PendingDonation {
    pub donor_id: u32,
    pub blood_group: BloodGroup,
    pub collected_on: NaiveDate,
}

/// Result of the donation eligibility check.
#[derive(Debug, Clone, PartialEq)]
pub enum DonationEligibility {
    Eligible(PendingDonation),
    /// The donor donated too recently. A defined business outcome, not an
    /// error: the action simply does not proceed.
    TooRecent { donor_id: u32, days_since_last: i64 },
}

/// The inventory ledger. Exclusively owns both tables for the duration of
/// one run and flushes every successful mutation back to the store before
/// returning, so no dirty state is ever held across menu iterations.
pub struct LedgerService<S: LedgerStorage> {
    storage: S,
    donors: IndexMap<u32, Donor>,
    bags: IndexMap<u32, BloodBag>,
}

impl<S: LedgerStorage> LedgerService<S> {
    /// Load both tables from the store. Either table being empty rejects
    /// startup.
    pub fn load(storage: S) -> Result<Self> {
        let donors = storage.load_donors()?;
        let bags = storage.load_bags()?;
        if donors.is_empty() {
            bail!("donor table is empty; nothing to run against");
        }
        if bags.is_empty() {
            bail!("stock table is empty; nothing to run against");
        }
        info!("loaded {} donors and {} bags", donors.len(), bags.len());
        Ok(Self {
            storage,
            donors,
            bags,
        })
    }

    pub fn donors(&self) -> &IndexMap<u32, Donor> {
        &self.donors
    }

    pub fn bags(&self) -> &IndexMap<u32, BloodBag> {
        &self.bags
    }

    /// Expiry sweep: drop every bag older than the shelf life from the live
    /// inventory, persist, and return the removed bags so the caller can
    /// confirm their physical disposal.
    pub fn check_inventory(&mut self, today: NaiveDate) -> Result<Vec<BloodBag>> {
        let mut expired = Vec::new();
        for bag in self.bags.values() {
            let age = bag.age_days(today);
            if age < 0 {
                // Data error, tolerated: the bag stays in the inventory.
                warn!(
                    "bag {} has a collection date in the future ({})",
                    bag.id, bag.collected_on
                );
            }
            if age > SHELF_LIFE_DAYS {
                expired.push(bag.clone());
            }
        }

        if !expired.is_empty() {
            self.bags.retain(|_, bag| !bag.is_expired(today));
            self.persist()?;
            info!("expiry sweep removed {} bags", expired.len());
        }
        Ok(expired)
    }

    /// Hunt for a single unit matching `required`. Dispatches (removes and
    /// persists) the first compatible bag in insertion order; when none
    /// matches, reports the compatible donors instead.
    pub fn attend_demand(&mut self, required: BloodGroup) -> Result<DemandOutcome> {
        let matched = self
            .bags
            .values()
            .find(|bag| required.can_receive_from(bag.blood_group))
            .map(|bag| bag.id);

        if let Some(id) = matched {
            if let Some(bag) = self.bags.shift_remove(&id) {
                self.persist()?;
                info!("dispatched bag {} ({}) for {} demand", bag.id, bag.blood_group, required);
                return Ok(DemandOutcome::Dispatched(bag));
            }
        }

        let contacts: Vec<Donor> = self
            .donors
            .values()
            .filter(|donor| required.can_receive_from(donor.blood_group))
            .cloned()
            .collect();
        info!(
            "no bag in stock for {} demand; {} compatible donors to contact",
            required,
            contacts.len()
        );
        Ok(DemandOutcome::Appeal(contacts))
    }

    /// Check donation eligibility for `donor_id` without mutating anything.
    /// An unknown donor id is a recoverable error.
    pub fn prepare_donation(&self, donor_id: u32, today: NaiveDate) -> Result<DonationEligibility> {
        let donor = self
            .donors
            .get(&donor_id)
            .ok_or_else(|| anyhow!("no donor with id {} on record", donor_id))?;

        let days_since_last = donor.days_since_donation(today);
        if days_since_last < MIN_DONATION_GAP_DAYS {
            info!(
                "donor {} donated {} days ago, below the {}-day minimum",
                donor_id, days_since_last, MIN_DONATION_GAP_DAYS
            );
            return Ok(DonationEligibility::TooRecent {
                donor_id,
                days_since_last,
            });
        }

        Ok(DonationEligibility::Eligible(PendingDonation {
            donor_id,
            blood_group: donor.blood_group,
            collected_on: today,
        }))
    }

    /// Commit a confirmed donation as one all-or-nothing transaction: the
    /// donor's last-donation date and the new bag land together, then both
    /// tables are persisted.
    pub fn commit_donation(&mut self, pending: PendingDonation) -> Result<BloodBag> {
        let donor = self
            .donors
            .get_mut(&pending.donor_id)
            .ok_or_else(|| anyhow!("no donor with id {} on record", pending.donor_id))?;
        donor.last_donation = pending.collected_on;

        let id = self.next_bag_id();
        let bag = BloodBag {
            id,
            blood_group: pending.blood_group,
            collected_on: pending.collected_on,
        };
        self.bags.insert(id, bag.clone());
        self.persist()?;
        info!(
            "recorded donation from donor {}: new bag {} ({})",
            pending.donor_id, bag.id, bag.blood_group
        );
        Ok(bag)
    }

    /// Count bags per blood group. Groups with no bags are absent from the
    /// result. No mutation.
    pub fn stock_report(&self) -> IndexMap<BloodGroup, usize> {
        let mut counts: IndexMap<BloodGroup, usize> = IndexMap::new();
        for bag in self.bags.values() {
            *counts.entry(bag.blood_group).or_insert(0) += 1;
        }
        counts
    }

    fn next_bag_id(&self) -> u32 {
        self.bags.keys().copied().max().unwrap_or(0) + 1
    }

    fn persist(&self) -> Result<()> {
        self.storage.save_tables(&self.donors, &self.bags)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    use crate::storage::{CsvConnection, CsvLedgerStore};

    const DONORS: &str = "7,Jane Doe,555-1212,jane@x.com,O-,2024-01-01\n\
                          8,Ben Okri,555-3434,ben@x.com,A+,2023-06-15\n";

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn setup_ledger(
        donor_lines: &str,
        bag_lines: &str,
    ) -> (LedgerService<CsvLedgerStore>, CsvLedgerStore, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let connection = CsvConnection::new_default_in(temp_dir.path());
        fs::write(connection.donors_path(), donor_lines).unwrap();
        fs::write(connection.bags_path(), bag_lines).unwrap();
        let store = CsvLedgerStore::new(connection);
        let ledger = LedgerService::load(store.clone()).expect("load failed");
        (ledger, store, temp_dir)
    }

    #[test]
    fn test_load_rejects_empty_tables() {
        let temp_dir = TempDir::new().unwrap();
        let connection = CsvConnection::new_default_in(temp_dir.path());
        fs::write(connection.donors_path(), DONORS).unwrap();
        fs::write(connection.bags_path(), "").unwrap();
        assert!(LedgerService::load(CsvLedgerStore::new(connection)).is_err());
    }

    #[test]
    fn test_check_inventory_drops_only_expired_bags() {
        let (mut ledger, store, _temp_dir) = setup_ledger(
            DONORS,
            "1,O-,2024-01-01\n2,A+,2024-01-25\n3,B+,2023-12-01\n",
        );

        let expired = ledger.check_inventory(date(2024, 2, 1)).unwrap();
        let expired_ids: Vec<u32> = expired.iter().map(|b| b.id).collect();
        assert_eq!(expired_ids, vec![1, 3]);

        // Post-sweep inventory holds no bag older than the shelf life.
        let today = date(2024, 2, 1);
        assert!(ledger.bags().values().all(|b| !b.is_expired(today)));

        // The sweep was persisted.
        let on_disk = store.load_bags().unwrap();
        assert_eq!(on_disk.keys().copied().collect::<Vec<u32>>(), vec![2]);
    }

    #[test]
    fn test_check_inventory_keeps_future_dated_bags() {
        let (mut ledger, _store, _temp_dir) = setup_ledger(DONORS, "1,O-,2024-06-01\n");
        let expired = ledger.check_inventory(date(2024, 2, 1)).unwrap();
        assert!(expired.is_empty());
        assert_eq!(ledger.bags().len(), 1);
    }

    #[test]
    fn test_attend_demand_dispatches_first_compatible_bag_in_insertion_order() {
        // B+ bag first in file order; both B+ and O+ are compatible with B+.
        let (mut ledger, store, _temp_dir) =
            setup_ledger(DONORS, "4,A-,2024-01-20\n9,B+,2024-01-10\n2,O+,2024-01-05\n");

        let outcome = ledger.attend_demand(BloodGroup::BPositive).unwrap();
        match outcome {
            DemandOutcome::Dispatched(bag) => {
                assert_eq!(bag.id, 9);
                assert!(BloodGroup::BPositive.can_receive_from(bag.blood_group));
            }
            other => panic!("expected a dispatch, got {:?}", other),
        }

        // At most one bag left the inventory, and the removal was persisted.
        assert_eq!(ledger.bags().len(), 2);
        assert_eq!(store.load_bags().unwrap().len(), 2);
    }

    #[test]
    fn test_attend_demand_falls_back_to_donor_appeal() {
        // Only an A+ bag in stock; AB- accepts O-, B-, A- and AB-, so no
        // bag matches and the donor scan kicks in.
        let (mut ledger, store, _temp_dir) = setup_ledger(DONORS, "1,A+,2024-01-20\n");

        let outcome = ledger.attend_demand(BloodGroup::AbNegative).unwrap();
        match outcome {
            DemandOutcome::Appeal(contacts) => {
                // Jane (O-) is compatible with AB-, Ben (A+) is not.
                assert_eq!(contacts.len(), 1);
                assert_eq!(contacts[0].id, 7);
            }
            other => panic!("expected an appeal, got {:?}", other),
        }

        // Fallback path mutates nothing.
        assert_eq!(ledger.bags().len(), 1);
        assert_eq!(store.load_bags().unwrap().len(), 1);
    }

    #[test]
    fn test_appeal_lists_compatible_donor_for_ab_positive() {
        // Spec scenario: AB+ demand, empty compatible stock, one A+ donor.
        let (mut ledger, _store, _temp_dir) = setup_ledger(
            "3,Amir Khan,555-9000,amir@x.com,A+,2023-01-01\n",
            "1,O-,2020-01-01\n",
        );
        // Expire the only bag first so the stock is empty of usable units.
        ledger.check_inventory(date(2024, 2, 1)).unwrap();
        assert!(ledger.bags().is_empty());

        match ledger.attend_demand(BloodGroup::AbPositive).unwrap() {
            DemandOutcome::Appeal(contacts) => {
                assert_eq!(contacts.len(), 1);
                assert_eq!(contacts[0].name, "Amir Khan");
            }
            other => panic!("expected an appeal, got {:?}", other),
        }
    }

    #[test]
    fn test_record_donation_success_scenario() {
        let (mut ledger, store, _temp_dir) = setup_ledger(
            "7,Jane Doe,555-1212,jane@x.com,O-,2023-08-01\n",
            "1,A+,2024-01-20\n",
        );
        let today = date(2024, 2, 1);

        let pending = match ledger.prepare_donation(7, today).unwrap() {
            DonationEligibility::Eligible(p) => p,
            other => panic!("expected eligible, got {:?}", other),
        };
        let bag = ledger.commit_donation(pending).unwrap();

        assert_eq!(bag.id, 2); // 1 + max existing bag id
        assert_eq!(bag.blood_group, BloodGroup::ONegative);
        assert_eq!(bag.collected_on, today);

        let donor = &ledger.donors()[&7];
        assert_eq!(donor.days_since_donation(today), 0);

        // Both tables persisted together.
        assert_eq!(store.load_donors().unwrap()[&7].last_donation, today);
        assert!(store.load_bags().unwrap().contains_key(&2));
    }

    #[test]
    fn test_record_donation_rejected_within_gap() {
        // 31 days since the last donation: below the 120-day minimum.
        let (mut ledger, store, _temp_dir) = setup_ledger(
            "7,Jane Doe,555-1212,jane@x.com,O-,2024-01-15\n",
            "1,A+,2024-01-20\n",
        );
        let today = date(2024, 2, 15);

        match ledger.prepare_donation(7, today).unwrap() {
            DonationEligibility::TooRecent {
                days_since_last, ..
            } => assert_eq!(days_since_last, 31),
            other => panic!("expected too-recent, got {:?}", other),
        }

        // No bag was created and nothing changed on disk.
        assert_eq!(ledger.bags().len(), 1);
        assert_eq!(
            store.load_donors().unwrap()[&7].last_donation,
            date(2024, 1, 15)
        );
    }

    #[test]
    fn test_unknown_donor_is_an_error() {
        let (ledger, _store, _temp_dir) = setup_ledger(DONORS, "1,A+,2024-01-20\n");
        let err = ledger.prepare_donation(99, date(2024, 2, 1)).unwrap_err();
        assert!(err.to_string().contains("no donor with id 99"));
    }

    #[test]
    fn test_unconfirmed_donation_leaves_no_trace() {
        let (mut ledger, store, _temp_dir) = setup_ledger(
            "7,Jane Doe,555-1212,jane@x.com,O-,2023-08-01\n",
            "1,A+,2024-01-20\n",
        );
        let today = date(2024, 2, 1);

        // Prepare but never commit: the pending donation is simply dropped.
        let eligibility = ledger.prepare_donation(7, today).unwrap();
        assert!(matches!(eligibility, DonationEligibility::Eligible(_)));
        drop(eligibility);

        assert_eq!(ledger.donors()[&7].last_donation, date(2023, 8, 1));
        assert_eq!(ledger.bags().len(), 1);
        assert_eq!(
            store.load_donors().unwrap()[&7].last_donation,
            date(2023, 8, 1)
        );
    }

    #[test]
    fn test_stock_report_counts_per_group_and_omits_empty_groups() {
        let (ledger, _store, _temp_dir) =
            setup_ledger(DONORS, "1,O-,2024-01-20\n2,O-,2024-01-21\n3,AB+,2024-01-22\n");

        let counts = ledger.stock_report();
        assert_eq!(counts.len(), 2);
        assert_eq!(counts[&BloodGroup::ONegative], 2);
        assert_eq!(counts[&BloodGroup::AbPositive], 1);
        assert!(!counts.contains_key(&BloodGroup::APositive));
    }
}
