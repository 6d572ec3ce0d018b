//! Verdict listing and client-side filtering.
//!
//! # Responsibility
//! - Hold the manage-page snapshot of all verdicts.
//! - Derive the filtered view from the snapshot and the current filter.
//!
//! # Invariants
//! - Filtering never re-queries the store.
//! - Empty filter terms match every record; the three terms are ANDed.
//! - A missing field reads as an empty string, so it never matches a
//!   non-empty term.
//! - The snapshot drops a record only after the store confirms the delete.

use crate::model::verdict::VerdictRecord;
use crate::repo::verdict_repo::VerdictRepository;
use crate::service::verdict_service::{
    Confirmation, DeleteOutcome, VerdictService, VerdictServiceError,
};

/// Case-insensitive substring filter over three verdict fields.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VerdictFilter {
    pub case_number: String,
    pub court_name: String,
    pub judge_name: String,
}

impl VerdictFilter {
    pub fn is_empty(&self) -> bool {
        self.case_number.is_empty() && self.court_name.is_empty() && self.judge_name.is_empty()
    }

    pub fn matches(&self, record: &VerdictRecord) -> bool {
        contains_ignore_case(&record.fields.case_number, &self.case_number)
            && contains_ignore_case(&record.fields.court_name, &self.court_name)
            && contains_ignore_case(&record.fields.judge_name, &self.judge_name)
    }
}

/// Returns the records accepted by `filter`, preserving input order.
pub fn apply_filter(records: &[VerdictRecord], filter: &VerdictFilter) -> Vec<VerdictRecord> {
    records
        .iter()
        .filter(|record| filter.matches(record))
        .cloned()
        .collect()
}

fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    needle.is_empty() || haystack.to_lowercase().contains(&needle.to_lowercase())
}

/// Manage-page state: loaded snapshot, active filter and derived view.
#[derive(Debug, Clone, Default)]
pub struct VerdictListing {
    records: Vec<VerdictRecord>,
    filter: VerdictFilter,
    visible: Vec<VerdictRecord>,
}

impl VerdictListing {
    /// Loads every verdict through `service` with an empty filter.
    pub fn load<R: VerdictRepository>(
        service: &VerdictService<R>,
    ) -> Result<Self, VerdictServiceError> {
        Ok(Self::from_records(service.list_all()?))
    }

    pub fn from_records(records: Vec<VerdictRecord>) -> Self {
        let mut listing = Self {
            records,
            ..Self::default()
        };
        listing.refresh_view();
        listing
    }

    /// Replaces the snapshot with a fresh full load. On failure the current
    /// snapshot is kept.
    pub fn reload<R: VerdictRepository>(
        &mut self,
        service: &VerdictService<R>,
    ) -> Result<(), VerdictServiceError> {
        self.records = service.list_all()?;
        self.refresh_view();
        Ok(())
    }

    pub fn set_filter(&mut self, filter: VerdictFilter) {
        self.filter = filter;
        self.refresh_view();
    }

    pub fn filter(&self) -> &VerdictFilter {
        &self.filter
    }

    /// Full snapshot, unfiltered.
    pub fn records(&self) -> &[VerdictRecord] {
        &self.records
    }

    /// Snapshot after the active filter.
    pub fn visible(&self) -> &[VerdictRecord] {
        &self.visible
    }

    /// Deletes through `service` and prunes the snapshot once confirmed.
    pub fn delete<R: VerdictRepository>(
        &mut self,
        service: &VerdictService<R>,
        id: &str,
        confirmation: Confirmation,
    ) -> Result<DeleteOutcome, VerdictServiceError> {
        let outcome = service.delete(id, confirmation)?;
        if outcome == DeleteOutcome::Deleted {
            self.records.retain(|record| record.id != id);
            self.refresh_view();
        }
        Ok(outcome)
    }

    fn refresh_view(&mut self) {
        self.visible = apply_filter(&self.records, &self.filter);
    }
}
