//! Acting identity supplied by the surrounding authentication layer.

use serde::{Deserialize, Serialize};

/// External user identifier. The auth subsystem owns the user records.
pub type UserId = i64;

/// Authenticated identity performing an operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Actor {
    pub user_id: UserId,
    pub is_superuser: bool,
}

impl Actor {
    /// Regular signed-in user.
    pub fn user(user_id: UserId) -> Self {
        Self {
            user_id,
            is_superuser: false,
        }
    }

    /// Signed-in user holding superuser privilege.
    pub fn superuser(user_id: UserId) -> Self {
        Self {
            user_id,
            is_superuser: true,
        }
    }

    /// Returns whether this actor may mutate records owned by `owner`.
    ///
    /// Granted to the owner itself and to any superuser.
    pub fn may_manage(&self, owner: UserId) -> bool {
        self.user_id == owner || self.is_superuser
    }
}
