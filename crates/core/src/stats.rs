//! Summary figures for the listings page and the admin dashboard.

use serde::Serialize;

use crate::listing::{Listing, PropertyStatus};

/// Footer statistics for a (filtered) listings page.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ListingStats {
    pub total: usize,
    pub golden_visa: usize,
    /// Mean ROI rounded to the nearest whole percent; `0` for an empty list.
    pub average_roi: i64,
}

impl ListingStats {
    pub fn compute<'a, L, I>(items: I) -> Self
    where
        L: Listing + 'a,
        I: IntoIterator<Item = &'a L>,
    {
        let mut total = 0usize;
        let mut golden_visa = 0usize;
        let mut roi_sum = 0.0f64;

        for item in items {
            total += 1;
            if item.golden_visa() {
                golden_visa += 1;
            }
            let roi = item.roi();
            if roi.is_finite() {
                roi_sum += roi;
            }
        }

        let average_roi = if total == 0 {
            0
        } else {
            (roi_sum / total as f64).round() as i64
        };

        Self {
            total,
            golden_visa,
            average_roi,
        }
    }
}

/// Portfolio overview shown on the admin dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PortfolioSummary {
    /// Sum of asking prices.
    pub total_value: f64,
    pub golden_visa_count: usize,
    pub available_count: usize,
}

impl PortfolioSummary {
    pub fn compute<L: Listing>(items: &[L]) -> Self {
        Self {
            total_value: items.iter().map(|l| l.price()).sum(),
            golden_visa_count: items.iter().filter(|l| l.golden_visa()).count(),
            available_count: items
                .iter()
                .filter(|l| l.status() == PropertyStatus::Available)
                .count(),
        }
    }
}
