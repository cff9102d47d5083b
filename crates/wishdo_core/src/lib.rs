//! Core domain logic for wishdo (원하는-일 처리기).
//! This crate is the single source of truth for task invariants and
//! persistence behavior; UI layers call in through `wishdo_ffi`.

pub mod assist;
pub mod config;
pub mod db;
pub mod display;
pub mod logging;
pub mod model;
pub mod persist;
pub mod service;
pub mod store;

pub use assist::{suggest_steps, FALLBACK_STEPS};
pub use config::{ConfigError, FlushPolicy, StoreConfig, DEFAULT_DEBOUNCE_MS, DEFAULT_STORAGE_KEY};
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::task::{
    Category, Step, StepProgress, StepSource, Task, TaskFilter, TaskId, TaskValidationError,
};
pub use persist::codec::{decode_tasks, encode_tasks};
pub use persist::kv::{KvError, KvResult, KvStore, MemoryKvStore};
pub use persist::loader::load_tasks;
pub use persist::sqlite::SqliteKvStore;
pub use persist::writer::DebouncedWriter;
pub use service::task_service::{TaskService, TaskServiceError};
pub use service::view_policy::ViewSelection;
pub use store::task_store::{TaskStore, ToggleOutcome};

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
