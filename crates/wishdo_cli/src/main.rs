//! CLI smoke entry point.
//!
//! # Responsibility
//! - Verify `wishdo_core` linkage.
//! - Print a per-tab summary of a task database when a path is given.

use std::process::ExitCode;
use std::sync::Arc;
use wishdo_core::display::filter_label;
use wishdo_core::{SqliteKvStore, StoreConfig, TaskService};

fn main() -> ExitCode {
    println!("wishdo_core ping={}", wishdo_core::ping());
    println!("wishdo_core version={}", wishdo_core::core_version());

    let Some(db_path) = std::env::args().nth(1) else {
        return ExitCode::SUCCESS;
    };

    let kv = match SqliteKvStore::open(&db_path) {
        Ok(kv) => kv,
        Err(err) => {
            eprintln!("failed to open `{db_path}`: {err}");
            return ExitCode::FAILURE;
        }
    };
    let service = match TaskService::open(Arc::new(kv), &StoreConfig::default()) {
        Ok(service) => service,
        Err(err) => {
            eprintln!("failed to load tasks: {err}");
            return ExitCode::FAILURE;
        }
    };

    for (filter, count) in service.counts() {
        println!("{} ({}) count={count}", filter_label(filter), filter.as_str());
    }
    service.close();
    ExitCode::SUCCESS
}
