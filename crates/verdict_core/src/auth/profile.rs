//! User profile documents keyed by auth uid.

use crate::clock::Clock;
use crate::config::StoreConfig;
use crate::model::user::{NewProfile, UserProfile};
use crate::repo::document_store::{DocumentStore, StoreError, StoreResult};
use serde_json::Value;

/// Reads and writes `users/{uid}` profile documents.
pub struct ProfileService<S: DocumentStore> {
    store: S,
    collection: String,
}

impl<S: DocumentStore> ProfileService<S> {
    pub fn new(store: S, collection: impl Into<String>) -> Self {
        Self {
            store,
            collection: collection.into(),
        }
    }

    pub fn from_config(store: S, config: &StoreConfig) -> Self {
        Self::new(store, config.users_collection.clone())
    }

    /// Writes the profile for a freshly signed-up account.
    pub fn create_profile(
        &self,
        uid: &str,
        input: &NewProfile,
        clock: &dyn Clock,
    ) -> StoreResult<UserProfile> {
        let profile = UserProfile {
            name: input.name.trim().to_string(),
            last_name: input.last_name.trim().to_string(),
            email: input.email.trim().to_lowercase(),
            created_at: clock.now_epoch_ms(),
        };
        match serde_json::to_value(&profile)? {
            Value::Object(body) => self.store.set(&self.collection, uid, &body)?,
            other => {
                return Err(StoreError::InvalidData(format!(
                    "profile serialized to non-object: {other}"
                )))
            }
        }
        Ok(profile)
    }

    pub fn get_profile(&self, uid: &str) -> StoreResult<Option<UserProfile>> {
        let Some(document) = self.store.get(&self.collection, uid)? else {
            return Ok(None);
        };
        serde_json::from_value(Value::Object(document.body))
            .map(Some)
            .map_err(|err| StoreError::InvalidData(format!("profile `{uid}`: {err}")))
    }

    /// `"{name} {lastName}"`, or `None` when no profile exists.
    pub fn display_name(&self, uid: &str) -> StoreResult<Option<String>> {
        Ok(self
            .get_profile(uid)?
            .map(|profile| profile.display_name()))
    }
}
