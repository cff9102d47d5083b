//! Debounced background writer.
//!
//! # Responsibility
//! - Coalesce bursts of collection snapshots into one serialize-and-write.
//! - Keep the caller off the I/O path.
//!
//! # Invariants
//! - At most one flush is pending; a newer snapshot replaces it and restarts
//!   the quiescence window.
//! - Shutdown (explicit or on drop) discards a pending snapshot.
//! - Encode and write failures are logged and swallowed.

use crate::config::FlushPolicy;
use crate::model::task::Task;
use crate::persist::codec::encode_tasks;
use crate::persist::kv::KvStore;
use log::{debug, warn};
use std::io;
use std::sync::mpsc::{channel, Receiver, RecvTimeoutError, Sender};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Instant;

const WRITER_THREAD_NAME: &str = "wishdo-writer";

enum WriterCommand {
    Snapshot(Vec<Task>),
    Shutdown,
}

/// Handle to the writer thread.
pub struct DebouncedWriter {
    sender: Sender<WriterCommand>,
    worker: Option<JoinHandle<()>>,
}

impl DebouncedWriter {
    /// Starts the writer thread.
    ///
    /// # Errors
    /// - Returns the OS error when the thread cannot be spawned.
    pub fn spawn(
        kv: Arc<dyn KvStore>,
        storage_key: impl Into<String>,
        policy: FlushPolicy,
    ) -> io::Result<Self> {
        let (sender, receiver) = channel();
        let storage_key = storage_key.into();
        let worker = thread::Builder::new()
            .name(WRITER_THREAD_NAME.to_string())
            .spawn(move || run_worker(receiver, kv, storage_key, policy))?;

        Ok(Self {
            sender,
            worker: Some(worker),
        })
    }

    /// Hands the current collection to the writer and returns immediately.
    pub fn schedule(&self, tasks: &[Task]) {
        if self
            .sender
            .send(WriterCommand::Snapshot(tasks.to_vec()))
            .is_err()
        {
            warn!("event=writer_schedule module=persist status=error error_code=worker_gone");
        }
    }

    /// Stops the writer, discarding any pending snapshot.
    pub fn shutdown(mut self) {
        self.stop();
    }

    fn stop(&mut self) {
        let Some(worker) = self.worker.take() else {
            return;
        };
        let _ = self.sender.send(WriterCommand::Shutdown);
        if worker.join().is_err() {
            warn!("event=writer_stop module=persist status=error error_code=worker_panicked");
        }
    }
}

impl Drop for DebouncedWriter {
    fn drop(&mut self) {
        self.stop();
    }
}

fn run_worker(
    receiver: Receiver<WriterCommand>,
    kv: Arc<dyn KvStore>,
    storage_key: String,
    policy: FlushPolicy,
) {
    let mut pending: Option<(Vec<Task>, Instant)> = None;

    loop {
        let deadline = pending.as_ref().map(|(_, deadline)| *deadline);
        let command = match deadline {
            None => match receiver.recv() {
                Ok(command) => command,
                Err(_) => break,
            },
            Some(deadline) => {
                let wait = deadline.saturating_duration_since(Instant::now());
                match receiver.recv_timeout(wait) {
                    Ok(command) => command,
                    Err(RecvTimeoutError::Timeout) => {
                        if let Some((snapshot, _)) = pending.take() {
                            flush(kv.as_ref(), &storage_key, &snapshot);
                        }
                        continue;
                    }
                    Err(RecvTimeoutError::Disconnected) => break,
                }
            }
        };

        match command {
            WriterCommand::Snapshot(snapshot) => match policy {
                FlushPolicy::Immediate => flush(kv.as_ref(), &storage_key, &snapshot),
                FlushPolicy::Debounced(window) => {
                    pending = Some((snapshot, Instant::now() + window));
                }
            },
            WriterCommand::Shutdown => break,
        }
    }

    if let Some((snapshot, _)) = pending {
        debug!(
            "event=writer_stop module=persist status=ok discarded_count={}",
            snapshot.len()
        );
    }
}

fn flush(kv: &dyn KvStore, storage_key: &str, tasks: &[Task]) {
    let started_at = Instant::now();
    let bytes = match encode_tasks(tasks) {
        Ok(bytes) => bytes,
        Err(err) => {
            warn!("event=tasks_flush module=persist status=error error_code=encode_failed error={err}");
            return;
        }
    };

    match kv.set(storage_key, &bytes) {
        Ok(()) => debug!(
            "event=tasks_flush module=persist status=ok count={} bytes={} duration_ms={}",
            tasks.len(),
            bytes.len(),
            started_at.elapsed().as_millis()
        ),
        Err(err) => warn!(
            "event=tasks_flush module=persist status=error error_code=write_failed duration_ms={} error={err}",
            started_at.elapsed().as_millis()
        ),
    }
}
