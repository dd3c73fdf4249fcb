//! Investment figures shown on property cards.
//!
//! ROI is always derived from the financial fields on demand; it is never
//! persisted as an authoritative value.

/// Treat NaN and infinities as zero, the way blank form inputs are treated.
fn finite_or_zero(value: f64) -> f64 {
    if value.is_finite() {
        value
    } else {
        0.0
    }
}

/// Return on investment in percent.
///
/// `profit = selling - (purchase + extra_costs)` and
/// `roi = profit / (purchase + extra_costs) * 100`. Returns `0.0` when the
/// purchase or selling price is non-positive, when the total investment is
/// non-positive, or when the result would not be finite.
pub fn calculate_roi(purchase_price: f64, selling_price: f64, extra_costs: f64) -> f64 {
    let purchase = finite_or_zero(purchase_price);
    let selling = finite_or_zero(selling_price);
    let costs = finite_or_zero(extra_costs);

    if purchase <= 0.0 || selling <= 0.0 {
        return 0.0;
    }

    let total_investment = purchase + costs;
    if total_investment <= 0.0 {
        return 0.0;
    }

    let roi = (selling - total_investment) / total_investment * 100.0;
    finite_or_zero(roi)
}

/// Absolute profit: `selling - purchase - extra_costs`.
pub fn calculate_profit(purchase_price: f64, selling_price: f64, extra_costs: f64) -> f64 {
    finite_or_zero(selling_price) - finite_or_zero(purchase_price) - finite_or_zero(extra_costs)
}

/// ROI of a property from its stored financial fields.
///
/// Transfer fees and renovation cost together form the extra costs.
pub fn property_roi(
    purchase_price: f64,
    transfer_fees: f64,
    renovation_cost: f64,
    selling_price: f64,
) -> f64 {
    calculate_roi(
        purchase_price,
        selling_price,
        finite_or_zero(transfer_fees) + finite_or_zero(renovation_cost),
    )
}
