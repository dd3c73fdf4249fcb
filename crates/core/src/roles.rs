//! Role tiers and tier classification.
//!
//! A viewer resolves to exactly one [`Tier`]. Tiers are derived, never
//! stored: the profile only carries the `is_admin` / `is_premium` flags and
//! [`classify_tier`] turns those (plus any break-glass override) into a tier.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

pub const TIER_VISITOR: &str = "visitor";
pub const TIER_REGULAR: &str = "regular";
pub const TIER_PREMIUM: &str = "premium";
pub const TIER_ADMIN: &str = "admin";

/// All valid tier names, lowest privilege first.
pub const VALID_TIERS: &[&str] = &[TIER_VISITOR, TIER_REGULAR, TIER_PREMIUM, TIER_ADMIN];

/// Coarse role used for every visibility decision.
///
/// Variants are declared in ascending privilege so the derived `Ord`
/// expresses dominance: admin > premium > regular > visitor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tier {
    Visitor,
    Regular,
    Premium,
    Admin,
}

impl Tier {
    pub fn as_str(self) -> &'static str {
        match self {
            Tier::Visitor => TIER_VISITOR,
            Tier::Regular => TIER_REGULAR,
            Tier::Premium => TIER_PREMIUM,
            Tier::Admin => TIER_ADMIN,
        }
    }

    /// Whether this tier has at least the privileges of `other`.
    pub fn is_at_least(self, other: Tier) -> bool {
        self >= other
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Tier {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            TIER_VISITOR => Ok(Tier::Visitor),
            TIER_REGULAR => Ok(Tier::Regular),
            TIER_PREMIUM => Ok(Tier::Premium),
            TIER_ADMIN => Ok(Tier::Admin),
            other => Err(format!(
                "Invalid tier '{other}'. Must be one of: {}",
                VALID_TIERS.join(", ")
            )),
        }
    }
}

/// Role flags as stored on a profile row.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RoleFlags {
    pub is_admin: bool,
    pub is_premium: bool,
}

/// Break-glass override for a session, resolved from provisioned operator ids.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Override {
    #[default]
    None,
    Premium,
    Admin,
}

/// Classify an authenticated viewer.
///
/// `flags` is `None` when the profile lookup failed or found nothing; the
/// viewer then falls back to `regular` unless an override applies. Admin
/// implies premium.
pub fn classify_tier(flags: Option<RoleFlags>, override_: Override) -> Tier {
    let flags = flags.unwrap_or_default();
    let is_admin = flags.is_admin || override_ == Override::Admin;
    let is_premium = is_admin || flags.is_premium || override_ == Override::Premium;

    if is_admin {
        Tier::Admin
    } else if is_premium {
        Tier::Premium
    } else {
        Tier::Regular
    }
}

/// Roster role filter used by the admin user table.
///
/// `admin` and `premium` match on the stored flag (so an admin who is also
/// premium shows under both); `regular` matches users with neither flag.
pub fn matches_role_filter(flags: RoleFlags, role: Tier) -> bool {
    match role {
        Tier::Admin => flags.is_admin,
        Tier::Premium => flags.is_premium,
        Tier::Regular => !flags.is_admin && !flags.is_premium,
        Tier::Visitor => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ADMIN: RoleFlags = RoleFlags {
        is_admin: true,
        is_premium: false,
    };
    const PREMIUM: RoleFlags = RoleFlags {
        is_admin: false,
        is_premium: true,
    };

    #[test]
    fn test_admin_dominates_premium() {
        assert!(Tier::Admin > Tier::Premium);
        assert!(Tier::Premium > Tier::Regular);
        assert!(Tier::Regular > Tier::Visitor);
        assert!(Tier::Admin.is_at_least(Tier::Premium));
        assert!(!Tier::Regular.is_at_least(Tier::Premium));
    }

    #[test]
    fn test_stored_flags_classify() {
        assert_eq!(classify_tier(Some(ADMIN), Override::None), Tier::Admin);
        assert_eq!(classify_tier(Some(PREMIUM), Override::None), Tier::Premium);
        assert_eq!(
            classify_tier(Some(RoleFlags::default()), Override::None),
            Tier::Regular
        );
    }

    #[test]
    fn test_missing_profile_falls_back_to_regular() {
        assert_eq!(classify_tier(None, Override::None), Tier::Regular);
    }

    #[test]
    fn test_override_applies_without_profile() {
        assert_eq!(classify_tier(None, Override::Admin), Tier::Admin);
        assert_eq!(classify_tier(None, Override::Premium), Tier::Premium);
    }

    #[test]
    fn test_override_never_lowers_stored_role() {
        assert_eq!(classify_tier(Some(ADMIN), Override::Premium), Tier::Admin);
        assert_eq!(
            classify_tier(Some(RoleFlags::default()), Override::Admin),
            Tier::Admin
        );
    }

    #[test]
    fn test_tier_round_trips_through_str() {
        for name in VALID_TIERS {
            let tier: Tier = name.parse().unwrap();
            assert_eq!(tier.as_str(), *name);
        }
        assert!("owner".parse::<Tier>().unwrap_err().contains("Invalid tier"));
    }

    #[test]
    fn test_role_filter() {
        let both = RoleFlags {
            is_admin: true,
            is_premium: true,
        };
        assert!(matches_role_filter(both, Tier::Admin));
        assert!(matches_role_filter(both, Tier::Premium));
        assert!(!matches_role_filter(both, Tier::Regular));
        assert!(matches_role_filter(RoleFlags::default(), Tier::Regular));
        assert!(!matches_role_filter(ADMIN, Tier::Premium));
        assert!(!matches_role_filter(RoleFlags::default(), Tier::Visitor));
    }
}
