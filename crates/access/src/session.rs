//! The authenticated session as issued by the auth provider.

use rigel_core::types::DbId;
use serde::{Deserialize, Serialize};

/// Read-only identity of a signed-in user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub user_id: DbId,
    pub email: String,
}

impl Session {
    pub fn new(user_id: DbId, email: impl Into<String>) -> Self {
        Self {
            user_id,
            email: email.into(),
        }
    }
}
