//! Task use-case service.
//!
//! # Responsibility
//! - Own one `TaskStore` and the `DebouncedWriter` persisting it.
//! - Run the one-shot load before the first mutation.
//! - Forward every applied mutation to the writer.
//!
//! # Invariants
//! - No-op mutations (unknown id, blank input) do not schedule a write.
//! - Callers never observe storage failures; the in-memory state is
//!   authoritative for the lifetime of the service.

use crate::config::{ConfigError, StoreConfig};
use crate::model::task::{Category, Task, TaskFilter, TaskId};
use crate::persist::kv::KvStore;
use crate::persist::loader::load_tasks;
use crate::persist::writer::DebouncedWriter;
use crate::store::task_store::{TaskStore, ToggleOutcome};
use log::info;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::io;
use std::sync::Arc;

#[derive(Debug)]
pub enum TaskServiceError {
    Config(ConfigError),
    WriterSpawn(io::Error),
}

impl Display for TaskServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Config(err) => write!(f, "{err}"),
            Self::WriterSpawn(err) => write!(f, "failed to start task writer: {err}"),
        }
    }
}

impl Error for TaskServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Config(err) => Some(err),
            Self::WriterSpawn(err) => Some(err),
        }
    }
}

impl From<ConfigError> for TaskServiceError {
    fn from(value: ConfigError) -> Self {
        Self::Config(value)
    }
}

impl From<io::Error> for TaskServiceError {
    fn from(value: io::Error) -> Self {
        Self::WriterSpawn(value)
    }
}

/// Application-root handle over the task collection.
pub struct TaskService {
    store: TaskStore,
    writer: DebouncedWriter,
}

impl TaskService {
    /// Loads the persisted collection and starts the writer.
    pub fn open(kv: Arc<dyn KvStore>, config: &StoreConfig) -> Result<Self, TaskServiceError> {
        config.validate()?;

        let store = TaskStore::from_tasks(load_tasks(kv.as_ref(), &config.storage_key));
        let writer =
            DebouncedWriter::spawn(kv, config.storage_key.as_str(), config.flush_policy())?;

        info!(
            "event=service_open module=service status=ok count={} debounce_ms={}",
            store.len(),
            config.debounce_ms
        );
        Ok(Self { store, writer })
    }

    pub fn store(&self) -> &TaskStore {
        &self.store
    }

    pub fn get(&self, id: &TaskId) -> Option<&Task> {
        self.store.get(id)
    }

    pub fn filtered(&self, filter: TaskFilter) -> Vec<&Task> {
        self.store.filtered(filter)
    }

    pub fn counts(&self) -> Vec<(TaskFilter, usize)> {
        self.store.counts()
    }

    pub fn add(&mut self, text: &str) -> Option<TaskId> {
        let id = self.store.add(text)?;
        self.persist();
        Some(id)
    }

    pub fn remove(&mut self, id: &TaskId) -> bool {
        self.persist_if(|store| store.remove(id))
    }

    pub fn toggle_done(&mut self, id: &TaskId) -> ToggleOutcome {
        let outcome = self.store.toggle_done(id);
        if outcome.changed() {
            self.persist();
        }
        outcome
    }

    pub fn set_category(&mut self, id: &TaskId, category: Category) -> bool {
        self.persist_if(|store| store.set_category(id, category))
    }

    pub fn add_step(&mut self, id: &TaskId, text: &str) -> bool {
        self.persist_if(|store| store.add_step(id, text))
    }

    pub fn toggle_step(&mut self, id: &TaskId, index: usize) -> bool {
        self.persist_if(|store| store.toggle_step(id, index))
    }

    pub fn remove_step(&mut self, id: &TaskId, index: usize) -> bool {
        self.persist_if(|store| store.remove_step(id, index))
    }

    pub fn set_memo(&mut self, id: &TaskId, memo: impl Into<String>) -> bool {
        let memo = memo.into();
        self.persist_if(|store| store.set_memo(id, memo))
    }

    pub fn apply_assist(&mut self, id: &TaskId) -> usize {
        let appended = self.store.apply_assist(id);
        if appended > 0 {
            self.persist();
        }
        appended
    }

    /// Stops the writer. A write still inside its debounce window is dropped.
    pub fn close(self) {
        self.writer.shutdown();
    }

    fn persist_if(&mut self, mutation: impl FnOnce(&mut TaskStore) -> bool) -> bool {
        let applied = mutation(&mut self.store);
        if applied {
            self.persist();
        }
        applied
    }

    fn persist(&self) {
        self.writer.schedule(self.store.tasks());
    }
}
