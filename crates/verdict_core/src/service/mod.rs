//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate repository calls into use-case level APIs.
//! - Keep page/FFI layers decoupled from storage details.

pub mod analytics;
pub mod listing;
pub mod verdict_service;
