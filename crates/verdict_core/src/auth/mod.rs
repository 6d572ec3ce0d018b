//! Authentication, session state and user profiles.
//!
//! # Responsibility
//! - Abstract the auth service behind `AuthBackend`.
//! - Hold one session per process and fan changes out to observers.
//!
//! # Invariants
//! - Verdict operations do not consult the session; only navigation does.

pub mod backend;
pub mod profile;
pub mod session;
