//! Flutter-facing bindings for wishdo core.

pub mod api;
