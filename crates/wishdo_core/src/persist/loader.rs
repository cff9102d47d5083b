//! One-shot startup load of the task collection.
//!
//! # Responsibility
//! - Read the storage key once and decode it into tasks.
//!
//! # Invariants
//! - Never fails: missing key, read error and a value that is not a JSON
//!   array all yield an empty collection.
//! - Records are decoded one by one; a record that fails to decode or fails
//!   `Task::validate()` is dropped without affecting its neighbours.
//! - The first record wins when ids repeat, so loaded ids are unique.

use crate::model::task::Task;
use crate::persist::kv::KvStore;
use log::{info, warn};
use serde_json::Value;
use std::collections::HashSet;

/// Loads the persisted collection stored under `key`.
pub fn load_tasks(kv: &dyn KvStore, key: &str) -> Vec<Task> {
    let bytes = match kv.get(key) {
        Ok(Some(bytes)) => bytes,
        Ok(None) => {
            info!("event=tasks_load module=persist status=empty reason=missing_key");
            return Vec::new();
        }
        Err(err) => {
            warn!("event=tasks_load module=persist status=error error_code=read_failed error={err}");
            return Vec::new();
        }
    };

    let records = match serde_json::from_slice::<Vec<Value>>(&bytes) {
        Ok(records) => records,
        Err(err) => {
            warn!(
                "event=tasks_load module=persist status=error error_code=parse_failed bytes={} error={err}",
                bytes.len()
            );
            return Vec::new();
        }
    };

    let total = records.len();
    let mut seen = HashSet::new();
    let mut tasks = Vec::with_capacity(total);
    for (index, record) in records.into_iter().enumerate() {
        let task = match serde_json::from_value::<Task>(record) {
            Ok(task) => task,
            Err(err) => {
                warn!(
                    "event=tasks_load module=persist status=skip reason=decode_failed index={index} error={err}"
                );
                continue;
            }
        };
        if let Err(err) = task.validate() {
            warn!("event=tasks_load module=persist status=skip reason=invalid error={err}");
            continue;
        }
        if !seen.insert(task.id().clone()) {
            warn!(
                "event=tasks_load module=persist status=skip reason=duplicate_id id={}",
                task.id()
            );
            continue;
        }
        tasks.push(task);
    }

    info!(
        "event=tasks_load module=persist status=ok count={} dropped={}",
        tasks.len(),
        total - tasks.len()
    );
    tasks
}
