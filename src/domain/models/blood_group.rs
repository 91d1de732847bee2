use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// The eight ABO/Rh blood groups handled by the institute.
///
/// Serialized everywhere (files, prompts, reports) as the uppercase
/// tokens `O-`, `O+`, `B-`, `B+`, `A-`, `A+`, `AB-`, `AB+`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BloodGroup {
    #[serde(rename = "O-")]
    ONegative,
    #[serde(rename = "O+")]
    OPositive,
    #[serde(rename = "B-")]
    BNegative,
    #[serde(rename = "B+")]
    BPositive,
    #[serde(rename = "A-")]
    ANegative,
    #[serde(rename = "A+")]
    APositive,
    #[serde(rename = "AB-")]
    AbNegative,
    #[serde(rename = "AB+")]
    AbPositive,
}

/// All groups, in the order they appear on the institute's paperwork.
pub const ALL_GROUPS: [BloodGroup; 8] = [
    BloodGroup::ONegative,
    BloodGroup::OPositive,
    BloodGroup::BNegative,
    BloodGroup::BPositive,
    BloodGroup::ANegative,
    BloodGroup::APositive,
    BloodGroup::AbNegative,
    BloodGroup::AbPositive,
];

/// Transfusion compatibility table: recipient group -> donor groups the
/// recipient may safely receive. Built once at process start, never mutated.
static COMPATIBILITY: Lazy<HashMap<BloodGroup, &'static [BloodGroup]>> = Lazy::new(|| {
    use BloodGroup::*;

    let mut table: HashMap<BloodGroup, &'static [BloodGroup]> = HashMap::new();
    table.insert(ONegative, &[ONegative]);
    table.insert(OPositive, &[ONegative, OPositive]);
    table.insert(BNegative, &[ONegative, BNegative]);
    table.insert(BPositive, &[ONegative, OPositive, BNegative, BPositive]);
    table.insert(ANegative, &[ONegative, ANegative]);
    table.insert(APositive, &[ONegative, OPositive, ANegative, APositive]);
    table.insert(AbNegative, &[ONegative, BNegative, ANegative, AbNegative]);
    table.insert(AbPositive, &ALL_GROUPS);
    table
});

impl BloodGroup {
    /// The uppercase token used in the database files and reports.
    pub fn as_str(&self) -> &'static str {
        match self {
            BloodGroup::ONegative => "O-",
            BloodGroup::OPositive => "O+",
            BloodGroup::BNegative => "B-",
            BloodGroup::BPositive => "B+",
            BloodGroup::ANegative => "A-",
            BloodGroup::APositive => "A+",
            BloodGroup::AbNegative => "AB-",
            BloodGroup::AbPositive => "AB+",
        }
    }

    /// Donor groups a recipient of this group may safely receive.
    pub fn compatible_donors(&self) -> &'static [BloodGroup] {
        COMPATIBILITY[self]
    }

    /// Whether a recipient of this group can receive blood of `donor`'s group.
    pub fn can_receive_from(&self, donor: BloodGroup) -> bool {
        self.compatible_donors().contains(&donor)
    }
}

impl fmt::Display for BloodGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a string is not one of the eight blood-group tokens.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unrecognised blood group token: {0:?}")]
pub struct ParseBloodGroupError(pub String);

impl FromStr for BloodGroup {
    type Err = ParseBloodGroupError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        // Tokens are case-sensitive: "o-" and "ab+" are rejected.
        match s {
            "O-" => Ok(BloodGroup::ONegative),
            "O+" => Ok(BloodGroup::OPositive),
            "B-" => Ok(BloodGroup::BNegative),
            "B+" => Ok(BloodGroup::BPositive),
            "A-" => Ok(BloodGroup::ANegative),
            "A+" => Ok(BloodGroup::APositive),
            "AB-" => Ok(BloodGroup::AbNegative),
            "AB+" => Ok(BloodGroup::AbPositive),
            other => Err(ParseBloodGroupError(other.to_string())),
        }
    }
}
