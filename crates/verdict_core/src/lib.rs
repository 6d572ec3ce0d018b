//! Core domain logic for the Verdict Assistance System.
//! This crate is the single source of truth for verdict invariants.

pub mod auth;
pub mod clock;
pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use auth::backend::{AuthBackend, AuthError, AuthResult, AuthUser, SqliteAuthBackend};
pub use auth::profile::ProfileService;
pub use auth::session::{Route, SessionProvider, SubscriptionId};
pub use clock::{Clock, FixedClock, SystemClock};
pub use config::{ConfigError, EditPolicy, StoreConfig};
pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use model::user::{NewProfile, UserProfile};
pub use model::verdict::{
    RecordId, ValidationError, VerdictFields, VerdictPatch, VerdictRecord, VERDICT_FIELD_NAMES,
};
pub use repo::document_store::{
    Document, DocumentBody, DocumentStore, SqliteDocumentStore, StoreError, StoreResult,
};
pub use repo::verdict_repo::{VerdictRepository, VerdictStore};
pub use service::analytics::{
    count_by_court, count_by_month, CaseAnalytics, ChartSeries, CountBuckets, UNKNOWN_COURT,
};
pub use service::listing::{apply_filter, VerdictFilter, VerdictListing};
pub use service::verdict_service::{
    Confirmation, DeleteOutcome, VerdictService, VerdictServiceError,
};

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::{core_version, ping};

    #[test]
    fn ping_returns_pong() {
        assert_eq!(ping(), "pong");
    }

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
