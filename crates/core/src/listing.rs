//! Listing status values and the read-only view of a property that the
//! filter, visibility and statistics code works against.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::types::DbId;

pub const STATUS_AVAILABLE: &str = "available";
pub const STATUS_SOLD: &str = "sold";
pub const STATUS_RESERVED: &str = "reserved";

/// All valid status values.
pub const VALID_STATUSES: &[&str] = &[STATUS_AVAILABLE, STATUS_SOLD, STATUS_RESERVED];

/// Sales status of a property.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PropertyStatus {
    #[default]
    Available,
    Sold,
    Reserved,
}

impl PropertyStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            PropertyStatus::Available => STATUS_AVAILABLE,
            PropertyStatus::Sold => STATUS_SOLD,
            PropertyStatus::Reserved => STATUS_RESERVED,
        }
    }
}

impl fmt::Display for PropertyStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PropertyStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            STATUS_AVAILABLE => Ok(PropertyStatus::Available),
            STATUS_SOLD => Ok(PropertyStatus::Sold),
            STATUS_RESERVED => Ok(PropertyStatus::Reserved),
            other => Err(format!(
                "Invalid status '{other}'. Must be one of: {}",
                VALID_STATUSES.join(", ")
            )),
        }
    }
}

impl TryFrom<String> for PropertyStatus {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// Attributes of a property listing that access and filtering decisions read.
///
/// Implemented by the database row type; tests implement it on small
/// fixtures.
pub trait Listing {
    fn listing_id(&self) -> DbId;
    fn title(&self) -> &str;
    fn area(&self) -> &str;
    fn status(&self) -> PropertyStatus;
    fn price(&self) -> f64;
    fn golden_visa(&self) -> bool;
    /// Derived return on investment in percent (never stored).
    fn roi(&self) -> f64;
}
