//! Access-control configuration loaded from environment variables.

use rigel_core::roles::Override;
use rigel_core::types::DbId;

/// Break-glass operator ids.
///
/// | Env var                     | Default |
/// |-----------------------------|---------|
/// | `BOOTSTRAP_ADMIN_USER_ID`   | unset   |
/// | `BOOTSTRAP_PREMIUM_USER_ID` | unset   |
///
/// A session whose user id matches one of these is classified as admin or
/// premium regardless of its stored profile. Ids are provisioned out of
/// band; no email comparison is ever made.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AccessConfig {
    pub bootstrap_admin: Option<DbId>,
    pub bootstrap_premium: Option<DbId>,
}

impl AccessConfig {
    /// Load from environment variables.
    ///
    /// # Panics
    ///
    /// Panics if a variable is set but is not a valid UUID.
    pub fn from_env() -> Self {
        Self {
            bootstrap_admin: read_id("BOOTSTRAP_ADMIN_USER_ID"),
            bootstrap_premium: read_id("BOOTSTRAP_PREMIUM_USER_ID"),
        }
    }

    /// The override that applies to `user_id`, admin taking precedence.
    pub fn override_for(&self, user_id: DbId) -> Override {
        if self.bootstrap_admin == Some(user_id) {
            Override::Admin
        } else if self.bootstrap_premium == Some(user_id) {
            Override::Premium
        } else {
            Override::None
        }
    }
}

fn read_id(var: &str) -> Option<DbId> {
    std::env::var(var)
        .ok()
        .filter(|v| !v.trim().is_empty())
        .map(|v| {
            v.trim()
                .parse()
                .unwrap_or_else(|_| panic!("{var} must be a valid UUID"))
        })
}
