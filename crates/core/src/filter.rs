//! Attribute filters over listings.
//!
//! Filters only ever narrow a candidate set. They are applied to the full
//! set before access annotation, so an item removed here never reappears
//! for any tier.

use serde::Deserialize;

use crate::listing::{Listing, PropertyStatus};

/// Public listing filter (`?area=&status=&min_price=&max_price=&golden_visa=`).
///
/// Empty strings and zero prices are treated as "not set".
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListingFilter {
    pub area: Option<String>,
    pub status: Option<PropertyStatus>,
    pub min_price: Option<f64>,
    pub max_price: Option<f64>,
    pub golden_visa: Option<bool>,
}

impl ListingFilter {
    pub fn matches<L: Listing>(&self, listing: &L) -> bool {
        if let Some(area) = self.area.as_deref().filter(|a| !a.is_empty()) {
            if listing.area() != area {
                return false;
            }
        }
        if let Some(status) = self.status {
            if listing.status() != status {
                return false;
            }
        }
        if let Some(min) = self.min_price.filter(|p| *p > 0.0) {
            if listing.price() < min {
                return false;
            }
        }
        if let Some(max) = self.max_price.filter(|p| *p > 0.0) {
            if listing.price() > max {
                return false;
            }
        }
        if let Some(golden_visa) = self.golden_visa {
            if listing.golden_visa() != golden_visa {
                return false;
            }
        }
        true
    }

    /// Keep only the items matching this filter, preserving order.
    pub fn apply<L: Listing>(&self, items: Vec<L>) -> Vec<L> {
        items.into_iter().filter(|l| self.matches(l)).collect()
    }
}

/// Free-text search used by the admin property table.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AdminSearch {
    /// Case-insensitive substring matched against title or area.
    pub search: Option<String>,
    pub status: Option<PropertyStatus>,
}

impl AdminSearch {
    pub fn matches<L: Listing>(&self, listing: &L) -> bool {
        let matches_search = match self.search.as_deref() {
            Some(term) if !term.is_empty() => {
                let term = term.to_lowercase();
                listing.title().to_lowercase().contains(&term)
                    || listing.area().to_lowercase().contains(&term)
            }
            _ => true,
        };
        let matches_status = self.status.map_or(true, |s| listing.status() == s);
        matches_search && matches_status
    }
}

/// Distinct areas in first-seen order, for populating the area dropdown.
pub fn distinct_areas<L: Listing>(items: &[L]) -> Vec<String> {
    let mut areas: Vec<String> = Vec::new();
    for item in items {
        if !areas.iter().any(|a| a == item.area()) {
            areas.push(item.area().to_string());
        }
    }
    areas
}
