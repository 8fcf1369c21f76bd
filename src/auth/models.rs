use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// The signed-in user, as handed over by the identity provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionUser {
    /// Unique user identifier.
    pub user_id: String,
    /// User email address, shown as the author name.
    pub email: String,
}

/// Explicit session object handed to every operation that cares about the
/// caller. `None` means nobody is signed in.
#[derive(Debug, Clone, Default)]
pub struct Session(pub Option<SessionUser>);

impl Session {
    pub fn anonymous() -> Self {
        Self(None)
    }

    pub fn signed_in(user: SessionUser) -> Self {
        Self(Some(user))
    }

    pub fn user(&self) -> Option<&SessionUser> {
        self.0.as_ref()
    }

    /// Return the signed-in user, or an `Unauthenticated` error carrying
    /// `action` as the user-facing prompt.
    pub fn require(&self, action: &str) -> Result<&SessionUser, AppError> {
        self.user()
            .ok_or_else(|| AppError::Unauthenticated(format!("Sign in to {action}")))
    }
}
