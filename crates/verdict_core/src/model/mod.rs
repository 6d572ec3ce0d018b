//! Domain model for verdict records and user profiles.
//!
//! # Invariants
//! - Every verdict is identified by a store-assigned `RecordId`.
//! - Deletion is a hard delete; ids are never recycled.

pub mod user;
pub mod verdict;
