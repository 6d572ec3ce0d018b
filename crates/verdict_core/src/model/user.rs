//! User profile model stored next to auth accounts.
//!
//! The auth backend only knows email and credentials; names entered at
//! sign-up live in a profile document keyed by the account uid.

use crate::model::verdict::ValidationError;
use serde::{Deserialize, Serialize};

/// Profile document body for one signed-up user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub name: String,
    pub last_name: String,
    pub email: String,
    /// Epoch milliseconds.
    pub created_at: i64,
}

impl UserProfile {
    /// Name shown in the navigation bar.
    pub fn display_name(&self) -> String {
        format!("{} {}", self.name, self.last_name)
    }
}

/// Sign-up form input that becomes a profile.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewProfile {
    pub name: String,
    pub last_name: String,
    pub email: String,
}

impl NewProfile {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.name.trim().is_empty() {
            return Err(ValidationError::EmptyField("name"));
        }
        if self.last_name.trim().is_empty() {
            return Err(ValidationError::EmptyField("lastName"));
        }
        Ok(())
    }
}
