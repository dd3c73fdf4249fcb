//! Tier-based visibility policy.
//!
//! Given a viewer's tier and the grant relation relevant to that tier, every
//! listing is annotated as accessible (shown clearly) or blurred, with a
//! reason tag the UI turns into a call-to-action. The policy is closed-world:
//! a project absent from the grant set is not accessible, and nothing is
//! accessible until both the tier and the grant set have been resolved.

use std::collections::HashSet;

use serde::Serialize;

use crate::filter::ListingFilter;
use crate::listing::Listing;
use crate::roles::Tier;
use crate::types::DbId;

/// Set of project ids a viewer holds a grant for.
pub type GrantSet = HashSet<DbId>;

/// Which grant relation a tier reads its accessible set from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GrantSource {
    /// `public_project_access` rows with `is_public = true`.
    Public,
    /// The viewer's own `user_project_access` rows.
    User,
    /// No relation is read; every listing is accessible.
    Unrestricted,
}

impl GrantSource {
    pub fn for_tier(tier: Tier) -> Self {
        match tier {
            Tier::Visitor | Tier::Regular => GrantSource::Public,
            Tier::Premium => GrantSource::User,
            Tier::Admin => GrantSource::Unrestricted,
        }
    }
}

/// Load state of the grant set backing a resolution.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Grants {
    /// The fetch is still in flight (or has not started).
    #[default]
    Pending,
    Loaded(GrantSet),
}

/// Why a listing is shown the way it is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ReasonTag {
    /// Accessible; shown clearly.
    Visible,
    /// Identity or grants not resolved yet.
    Loading,
    /// Anonymous visitor without a public grant.
    SignUp,
    /// Signed-in regular user without a public grant.
    Upgrade,
    /// Premium user without a per-project grant.
    NoAccess,
}

/// A listing annotated with the viewer's access to it.
#[derive(Debug, Clone, Serialize)]
pub struct ResolvedListing<L> {
    pub property: L,
    pub is_accessible: bool,
    pub is_blurred: bool,
    pub reason: ReasonTag,
}

impl<L> ResolvedListing<L> {
    fn accessible(property: L) -> Self {
        Self {
            property,
            is_accessible: true,
            is_blurred: false,
            reason: ReasonTag::Visible,
        }
    }

    fn blurred(property: L, reason: ReasonTag) -> Self {
        Self {
            property,
            is_accessible: false,
            is_blurred: true,
            reason,
        }
    }
}

fn denied_reason(tier: Tier) -> ReasonTag {
    match tier {
        Tier::Visitor => ReasonTag::SignUp,
        Tier::Regular => ReasonTag::Upgrade,
        Tier::Premium | Tier::Admin => ReasonTag::NoAccess,
    }
}

/// Annotate `items` for a viewer.
///
/// `tier` is `None` while identity is still being resolved. Admins see
/// everything without consulting `grants`; every other tier needs a loaded
/// grant set, and until it arrives every item is blurred with
/// [`ReasonTag::Loading`]. Input order is preserved; see [`order`].
pub fn resolve<L: Listing>(
    tier: Option<Tier>,
    grants: &Grants,
    items: Vec<L>,
) -> Vec<ResolvedListing<L>> {
    let Some(tier) = tier else {
        return items
            .into_iter()
            .map(|l| ResolvedListing::blurred(l, ReasonTag::Loading))
            .collect();
    };

    if GrantSource::for_tier(tier) == GrantSource::Unrestricted {
        return items.into_iter().map(ResolvedListing::accessible).collect();
    }

    match grants {
        Grants::Pending => items
            .into_iter()
            .map(|l| ResolvedListing::blurred(l, ReasonTag::Loading))
            .collect(),
        Grants::Loaded(set) => items
            .into_iter()
            .map(|l| {
                if set.contains(&l.listing_id()) {
                    ResolvedListing::accessible(l)
                } else {
                    ResolvedListing::blurred(l, denied_reason(tier))
                }
            })
            .collect(),
    }
}

/// Stable ordering: accessible listings first, then by title (byte-wise).
pub fn order<L: Listing>(resolved: &mut [ResolvedListing<L>]) {
    resolved.sort_by(|a, b| {
        b.is_accessible
            .cmp(&a.is_accessible)
            .then_with(|| a.property.title().cmp(b.property.title()))
    });
}

/// Filter, annotate and order in one step.
///
/// The filter narrows the full candidate set before any access decision,
/// so a filtered-out item never appears regardless of tier.
pub fn resolve_filtered<L: Listing>(
    tier: Option<Tier>,
    grants: &Grants,
    items: Vec<L>,
    filter: &ListingFilter,
) -> Vec<ResolvedListing<L>> {
    let mut resolved = resolve(tier, grants, filter.apply(items));
    order(&mut resolved);
    resolved
}
