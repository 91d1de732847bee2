//! Hospital demand collaborator.
//!
//! The hospital network is an external system the ledger has no control
//! over; all it exposes here is "which blood group is wanted right now, if
//! any". Unavailability is a normal answer, not an error: the menu tells the
//! user to retry later and moves on.

use std::fs;
use std::path::PathBuf;

use anyhow::Result;
use log::warn;

use crate::domain::models::BloodGroup;

/// Default path of the demand feed file.
pub const DEFAULT_DEMAND_FEED: &str = "demand.txt";

/// Source of the current hospital demand signal. `Ok(None)` means no demand
/// signal is available right now.
pub trait DemandSource {
    fn current_demand(&self) -> Result<Option<BloodGroup>>;
}

/// Demand source backed by a feed file the hospital network drops demand
/// tokens into, latest last. A missing, unreadable or garbled feed reads as
/// "no signal".
#[derive(Debug, Clone)]
pub struct DemandFeed {
    path: PathBuf,
}

impl DemandFeed {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl DemandSource for DemandFeed {
    fn current_demand(&self) -> Result<Option<BloodGroup>> {
        let contents = match fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(e) => {
                warn!("demand feed {} unreachable: {}", self.path.display(), e);
                return Ok(None);
            }
        };

        let Some(token) = contents.lines().rev().find_map(|line| {
            let line = line.trim();
            (!line.is_empty()).then_some(line)
        }) else {
            return Ok(None);
        };

        match token.parse::<BloodGroup>() {
            Ok(group) => Ok(Some(group)),
            Err(e) => {
                warn!("demand feed {}: {}", self.path.display(), e);
                Ok(None)
            }
        }
    }
}
