//! Verdict record store adapter.
//!
//! # Responsibility
//! - Bind one configured collection of the document store to typed
//!   verdict CRUD.
//! - Convert between `VerdictFields` and stored JSON bodies.
//!
//! # Invariants
//! - The adapter never validates; the lifecycle service owns that.
//! - `update_verdict` writes the full field set it is given.

use crate::config::StoreConfig;
use crate::model::verdict::{RecordId, VerdictFields, VerdictRecord};
use crate::repo::document_store::{
    Document, DocumentBody, DocumentStore, StoreError, StoreResult,
};
use serde_json::Value;

/// Repository interface for verdict CRUD operations.
pub trait VerdictRepository {
    fn create_verdict(&self, fields: &VerdictFields) -> StoreResult<RecordId>;
    fn get_verdict(&self, id: &str) -> StoreResult<Option<VerdictRecord>>;
    fn update_verdict(&self, record: &VerdictRecord) -> StoreResult<()>;
    fn delete_verdict(&self, id: &str) -> StoreResult<()>;
    fn list_verdicts(&self) -> StoreResult<Vec<VerdictRecord>>;
}

impl<R: VerdictRepository + ?Sized> VerdictRepository for &R {
    fn create_verdict(&self, fields: &VerdictFields) -> StoreResult<RecordId> {
        (**self).create_verdict(fields)
    }

    fn get_verdict(&self, id: &str) -> StoreResult<Option<VerdictRecord>> {
        (**self).get_verdict(id)
    }

    fn update_verdict(&self, record: &VerdictRecord) -> StoreResult<()> {
        (**self).update_verdict(record)
    }

    fn delete_verdict(&self, id: &str) -> StoreResult<()> {
        (**self).delete_verdict(id)
    }

    fn list_verdicts(&self) -> StoreResult<Vec<VerdictRecord>> {
        (**self).list_verdicts()
    }
}

/// Document-store backed verdict repository for a single collection.
pub struct VerdictStore<S: DocumentStore> {
    store: S,
    collection: String,
}

impl<S: DocumentStore> VerdictStore<S> {
    pub fn new(store: S, collection: impl Into<String>) -> Self {
        Self {
            store,
            collection: collection.into(),
        }
    }

    /// Uses `config.verdict_collection` as the bound collection.
    pub fn from_config(store: S, config: &StoreConfig) -> Self {
        Self::new(store, config.verdict_collection.clone())
    }

    pub fn collection(&self) -> &str {
        &self.collection
    }
}

impl<S: DocumentStore> VerdictRepository for VerdictStore<S> {
    fn create_verdict(&self, fields: &VerdictFields) -> StoreResult<RecordId> {
        self.store.create(&self.collection, &fields_to_body(fields)?)
    }

    fn get_verdict(&self, id: &str) -> StoreResult<Option<VerdictRecord>> {
        self.store
            .get(&self.collection, id)?
            .map(document_to_record)
            .transpose()
    }

    fn update_verdict(&self, record: &VerdictRecord) -> StoreResult<()> {
        self.store
            .update(&self.collection, &record.id, &fields_to_body(&record.fields)?)
    }

    fn delete_verdict(&self, id: &str) -> StoreResult<()> {
        self.store.delete(&self.collection, id)
    }

    fn list_verdicts(&self) -> StoreResult<Vec<VerdictRecord>> {
        self.store
            .list_all(&self.collection)?
            .into_iter()
            .map(document_to_record)
            .collect()
    }
}

fn fields_to_body(fields: &VerdictFields) -> StoreResult<DocumentBody> {
    match serde_json::to_value(fields)? {
        Value::Object(body) => Ok(body),
        other => Err(StoreError::InvalidData(format!(
            "verdict fields serialized to non-object: {other}"
        ))),
    }
}

fn document_to_record(document: Document) -> StoreResult<VerdictRecord> {
    let Document { id, body } = document;
    let fields = serde_json::from_value::<VerdictFields>(Value::Object(body))
        .map_err(|err| StoreError::InvalidData(format!("verdict `{id}`: {err}")))?;
    Ok(VerdictRecord { id, fields })
}
