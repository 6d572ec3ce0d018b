//! Flutter-facing bindings for the Verdict Assistance System core.

pub mod api;
