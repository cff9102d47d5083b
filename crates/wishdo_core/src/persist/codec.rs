//! JSON encoding of the whole task collection.
//!
//! The stored value is one JSON array of task objects. There is no version
//! field; a schema change moves to a new storage key instead.

use crate::model::task::Task;

pub fn encode_tasks(tasks: &[Task]) -> serde_json::Result<Vec<u8>> {
    serde_json::to_vec(tasks)
}

pub fn decode_tasks(bytes: &[u8]) -> serde_json::Result<Vec<Task>> {
    serde_json::from_slice(bytes)
}
