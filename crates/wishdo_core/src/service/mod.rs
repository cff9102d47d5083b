//! Core use-case services.
//!
//! # Responsibility
//! - Combine the in-memory store with load/flush persistence.
//! - Keep UI/FFI layers decoupled from storage details.

pub mod task_service;
pub mod view_policy;
