//! Verdict lifecycle service.
//!
//! # Responsibility
//! - Validate and persist new verdicts.
//! - Merge partial edits over the stored record and write the full result.
//! - Gate deletion behind an explicit confirmation.
//!
//! # Invariants
//! - `create` never reaches the repository with a blank field.
//! - `delete` never reaches the repository without `Confirmation::Confirmed`.
//! - No retries: each call hits the repository at most once per operation.
//! - Concurrent edits are last-write-wins; there is no version check.

use crate::config::EditPolicy;
use crate::model::verdict::{RecordId, ValidationError, VerdictFields, VerdictPatch, VerdictRecord};
use crate::repo::document_store::StoreError;
use crate::repo::verdict_repo::VerdictRepository;
use log::{error, info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Answer to the "are you sure?" prompt before deleting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Confirmation {
    Confirmed,
    Declined,
}

impl From<bool> for Confirmation {
    fn from(value: bool) -> Self {
        if value {
            Self::Confirmed
        } else {
            Self::Declined
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteOutcome {
    Deleted,
    /// User declined; nothing was sent to the store.
    Cancelled,
}

/// Errors from verdict lifecycle operations.
#[derive(Debug)]
pub enum VerdictServiceError {
    /// Input rejected before any store call.
    Validation(ValidationError),
    /// Referenced verdict does not exist (stale id).
    NotFound(RecordId),
    /// Store/transport failure.
    Store(StoreError),
}

impl Display for VerdictServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::NotFound(id) => write!(f, "verdict not found: {id}"),
            Self::Store(err) => write!(f, "{err}"),
        }
    }
}

impl Error for VerdictServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Store(err) => Some(err),
            Self::NotFound(_) => None,
        }
    }
}

impl From<ValidationError> for VerdictServiceError {
    fn from(value: ValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<StoreError> for VerdictServiceError {
    fn from(value: StoreError) -> Self {
        match value {
            StoreError::NotFound(id) => Self::NotFound(id),
            other => Self::Store(other),
        }
    }
}

/// Verdict lifecycle facade over a repository implementation.
pub struct VerdictService<R: VerdictRepository> {
    repo: R,
    edit_policy: EditPolicy,
}

impl<R: VerdictRepository> VerdictService<R> {
    /// Creates a service with lenient edit validation.
    pub fn new(repo: R) -> Self {
        Self::with_edit_policy(repo, EditPolicy::default())
    }

    pub fn with_edit_policy(repo: R, edit_policy: EditPolicy) -> Self {
        Self { repo, edit_policy }
    }

    pub fn edit_policy(&self) -> EditPolicy {
        self.edit_policy
    }

    /// Validates and persists a new verdict, returning the store-assigned id.
    pub fn create(&self, fields: &VerdictFields) -> Result<RecordId, VerdictServiceError> {
        if let Err(err) = fields.validate() {
            warn!("event=verdict_create module=service status=rejected reason={err}");
            return Err(err.into());
        }

        match self.repo.create_verdict(fields) {
            Ok(id) => {
                info!("event=verdict_create module=service status=ok record_id={id}");
                Ok(id)
            }
            Err(err) => {
                error!("event=verdict_create module=service status=error error={err}");
                Err(err.into())
            }
        }
    }

    /// Loads one verdict for the detail and edit views.
    pub fn get(&self, id: &str) -> Result<VerdictRecord, VerdictServiceError> {
        match self.repo.get_verdict(id) {
            Ok(Some(record)) => Ok(record),
            Ok(None) => {
                warn!("event=verdict_get module=service status=not_found record_id={id}");
                Err(VerdictServiceError::NotFound(id.to_string()))
            }
            Err(err) => {
                error!("event=verdict_get module=service status=error record_id={id} error={err}");
                Err(err.into())
            }
        }
    }

    /// Lists every verdict in the collection.
    pub fn list_all(&self) -> Result<Vec<VerdictRecord>, VerdictServiceError> {
        self.repo.list_verdicts().map_err(|err| {
            error!("event=verdict_list module=service status=error error={err}");
            err.into()
        })
    }

    /// Applies `patch` over the stored record and writes the merged result.
    ///
    /// Under `EditPolicy::Lenient` blank fields are written as given.
    pub fn edit(
        &self,
        id: &str,
        patch: &VerdictPatch,
    ) -> Result<VerdictRecord, VerdictServiceError> {
        let current = self.get(id)?;
        let merged = VerdictRecord {
            id: current.id,
            fields: patch.merged_over(&current.fields),
        };

        if self.edit_policy == EditPolicy::Strict {
            if let Err(err) = merged.fields.validate() {
                warn!("event=verdict_edit module=service status=rejected record_id={id} reason={err}");
                return Err(err.into());
            }
        }

        match self.repo.update_verdict(&merged) {
            Ok(()) => {
                info!("event=verdict_edit module=service status=ok record_id={id}");
                Ok(merged)
            }
            Err(err) => {
                error!("event=verdict_edit module=service status=error record_id={id} error={err}");
                Err(err.into())
            }
        }
    }

    /// Deletes a verdict once the caller has confirmed.
    pub fn delete(
        &self,
        id: &str,
        confirmation: Confirmation,
    ) -> Result<DeleteOutcome, VerdictServiceError> {
        if confirmation == Confirmation::Declined {
            info!("event=verdict_delete module=service status=cancelled record_id={id}");
            return Ok(DeleteOutcome::Cancelled);
        }

        match self.repo.delete_verdict(id) {
            Ok(()) => {
                info!("event=verdict_delete module=service status=ok record_id={id}");
                Ok(DeleteOutcome::Deleted)
            }
            Err(err) => {
                error!("event=verdict_delete module=service status=error record_id={id} error={err}");
                Err(err.into())
            }
        }
    }
}
