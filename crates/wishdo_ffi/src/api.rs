//! FFI use-case API for the mobile task screens.
//!
//! # Responsibility
//! - Expose stable, use-case-level task functions to Dart via FRB.
//! - Own the single process-wide task session.
//! - Report the tab the view should show after each mutation.
//!
//! # Invariants
//! - Exported functions must not panic across the FFI boundary.
//! - Unknown ids, bad indices and blank text are reported with `ok = false`
//!   and never change state.
//! - Ids cross the boundary as UTF-8 strings.

use log::{info, warn};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use wishdo_core::display::{
    category_label, empty_list_message, filter_label, format_created_at, progress_label,
};
use wishdo_core::{
    core_version as core_version_inner, init_logging as init_logging_inner, ping as ping_inner,
    Category, SqliteKvStore, StepSource, StoreConfig, Task, TaskFilter, TaskId, TaskService,
    ToggleOutcome, ViewSelection,
};

struct Session {
    service: TaskService,
    selection: ViewSelection,
}

static SESSION: Mutex<Option<Session>> = Mutex::new(None);

/// Locks the session, recovering from a panic in an earlier holder.
///
/// Every session mutation is a single store call, so a poisoned guard still
/// holds a consistent collection.
fn lock_session() -> MutexGuard<'static, Option<Session>> {
    SESSION.lock().unwrap_or_else(|poisoned: PoisonError<_>| {
        warn!("event=session_lock module=ffi status=recovered error_code=lock_poisoned");
        SESSION.clear_poison();
        poisoned.into_inner()
    })
}

/// Minimal health-check API for FRB smoke integration.
#[flutter_rust_bridge::frb(sync)]
pub fn ping() -> String {
    ping_inner().to_owned()
}

/// Expose core crate version through FFI.
#[flutter_rust_bridge::frb(sync)]
pub fn core_version() -> String {
    core_version_inner().to_owned()
}

/// Initializes Rust core logging once per process.
///
/// Returns an empty string on success and the error message on failure.
#[flutter_rust_bridge::frb(sync)]
pub fn init_logging(level: String, log_dir: String) -> String {
    match init_logging_inner(level.as_str(), log_dir.as_str()) {
        Ok(()) => String::new(),
        Err(err) => err,
    }
}

/// Opens the task database and loads the persisted collection.
///
/// Input semantics:
/// - `db_path`: SQLite file path; created when missing.
/// - `config_json`: optional `{"storage_key": .., "debounce_ms": ..}` override.
///
/// # FFI contract
/// - Returns empty string on success and error message on failure.
/// - A second call while a session is open is rejected.
#[flutter_rust_bridge::frb(sync)]
pub fn init_store(db_path: String, config_json: Option<String>) -> String {
    match init_store_inner(db_path.as_str(), config_json.as_deref()) {
        Ok(()) => String::new(),
        Err(err) => err,
    }
}

/// Closes the session. Writes still inside the debounce window are dropped.
#[flutter_rust_bridge::frb(sync)]
pub fn close_store() -> bool {
    let session = lock_session().take();
    match session {
        Some(session) => {
            session.service.close();
            info!("event=store_close module=ffi status=ok");
            true
        }
        None => false,
    }
}

/// One checklist step as shown in the detail sheet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepItem {
    pub text: String,
    pub done: bool,
    /// `user|assist`.
    pub source: String,
}

/// One task card.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskItem {
    pub id: String,
    pub text: String,
    pub done: bool,
    /// `short|info|long`.
    pub category: String,
    pub category_label: String,
    pub created_at_ms: i64,
    /// `YYYY. MM. DD. 오전|오후 hh:mm` in device local time.
    pub created_label: String,
    /// `스텝 done/total`.
    pub progress_label: String,
    pub steps: Vec<StepItem>,
    pub memo: String,
}

/// Response envelope for task mutations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskActionResponse {
    pub ok: bool,
    pub task_id: Option<String>,
    /// Tab the view should show next (`short|info|long|done`).
    pub selected_filter: String,
    pub message: String,
}

/// Response envelope for list queries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskListResponse {
    pub items: Vec<TaskItem>,
    /// Effective filter; echoes the request when it parsed.
    pub filter: String,
    /// Empty-state text when `items` is empty, otherwise empty.
    pub message: String,
}

/// Per-tab badge count.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterCount {
    pub filter: String,
    pub label: String,
    pub count: u32,
}

#[flutter_rust_bridge::frb(sync)]
pub fn task_add(text: String) -> TaskActionResponse {
    mutate("task_add", None, |session| {
        let added = session.service.add(text.as_str());
        session.selection.after_add(added.as_ref());
        match added {
            Some(id) => Ok(id),
            None => Err("text is empty".to_string()),
        }
    })
}

#[flutter_rust_bridge::frb(sync)]
pub fn task_remove(task_id: String) -> TaskActionResponse {
    let id = TaskId::from(task_id);
    mutate("task_remove", Some(&id), |session| {
        applied(session.service.remove(&id), &id)
    })
}

/// Flips completion. Completing switches the selected tab to `done`.
#[flutter_rust_bridge::frb(sync)]
pub fn task_toggle_done(task_id: String) -> TaskActionResponse {
    let id = TaskId::from(task_id);
    mutate("task_toggle_done", Some(&id), |session| {
        let outcome = session.service.toggle_done(&id);
        session.selection.after_toggle(outcome);
        applied(outcome != ToggleOutcome::NotFound, &id)
    })
}

#[flutter_rust_bridge::frb(sync)]
pub fn task_set_category(task_id: String, category: String) -> TaskActionResponse {
    let id = TaskId::from(task_id);
    mutate("task_set_category", Some(&id), |session| {
        let Some(category) = Category::parse(category.as_str()) else {
            return Err(format!("unknown category `{category}`"));
        };
        let changed = session.service.set_category(&id, category);
        session.selection.after_set_category(changed, category);
        applied(changed, &id)
    })
}

#[flutter_rust_bridge::frb(sync)]
pub fn task_add_step(task_id: String, text: String) -> TaskActionResponse {
    let id = TaskId::from(task_id);
    mutate("task_add_step", Some(&id), |session| {
        applied(session.service.add_step(&id, text.as_str()), &id)
    })
}

#[flutter_rust_bridge::frb(sync)]
pub fn task_toggle_step(task_id: String, index: u32) -> TaskActionResponse {
    let id = TaskId::from(task_id);
    mutate("task_toggle_step", Some(&id), |session| {
        applied(session.service.toggle_step(&id, index as usize), &id)
    })
}

#[flutter_rust_bridge::frb(sync)]
pub fn task_remove_step(task_id: String, index: u32) -> TaskActionResponse {
    let id = TaskId::from(task_id);
    mutate("task_remove_step", Some(&id), |session| {
        applied(session.service.remove_step(&id, index as usize), &id)
    })
}

/// Replaces the memo verbatim (no trimming).
#[flutter_rust_bridge::frb(sync)]
pub fn task_set_memo(task_id: String, memo: String) -> TaskActionResponse {
    let id = TaskId::from(task_id);
    mutate("task_set_memo", Some(&id), |session| {
        applied(session.service.set_memo(&id, memo), &id)
    })
}

/// Appends keyword template steps for the task title.
#[flutter_rust_bridge::frb(sync)]
pub fn task_apply_assist(task_id: String) -> TaskActionResponse {
    let id = TaskId::from(task_id);
    mutate("task_apply_assist", Some(&id), |session| {
        applied(session.service.apply_assist(&id) > 0, &id)
    })
}

/// Lists tasks for a tab. An unparseable filter yields an empty list.
#[flutter_rust_bridge::frb(sync)]
pub fn task_list(filter: String) -> TaskListResponse {
    let Some(parsed) = TaskFilter::parse(filter.as_str()) else {
        return TaskListResponse {
            items: Vec::new(),
            filter,
            message: "unknown filter".to_string(),
        };
    };

    let items = with_session(|session| {
        session
            .service
            .filtered(parsed)
            .into_iter()
            .map(to_task_item)
            .collect::<Vec<_>>()
    });

    match items {
        Ok(items) => {
            let message = if items.is_empty() {
                empty_list_message(parsed).to_string()
            } else {
                String::new()
            };
            TaskListResponse {
                items,
                filter: parsed.as_str().to_string(),
                message,
            }
        }
        Err(err) => TaskListResponse {
            items: Vec::new(),
            filter: parsed.as_str().to_string(),
            message: err,
        },
    }
}

#[flutter_rust_bridge::frb(sync)]
pub fn task_get(task_id: String) -> Option<TaskItem> {
    let id = TaskId::from(task_id);
    with_session(|session| session.service.get(&id).map(to_task_item))
        .ok()
        .flatten()
}

#[flutter_rust_bridge::frb(sync)]
pub fn task_counts() -> Vec<FilterCount> {
    with_session(|session| {
        session
            .service
            .counts()
            .into_iter()
            .map(|(filter, count)| FilterCount {
                filter: filter.as_str().to_string(),
                label: filter_label(filter).to_string(),
                count: u32::try_from(count).unwrap_or(u32::MAX),
            })
            .collect()
    })
    .unwrap_or_default()
}

/// Returns the currently selected tab.
#[flutter_rust_bridge::frb(sync)]
pub fn selected_filter() -> String {
    with_session(|session| session.selection.filter().as_str().to_string())
        .unwrap_or_else(|_| TaskFilter::default().as_str().to_string())
}

/// Selects a tab. Returns `false` for unknown filters or no session.
#[flutter_rust_bridge::frb(sync)]
pub fn select_filter(filter: String) -> bool {
    let Some(parsed) = TaskFilter::parse(filter.as_str()) else {
        return false;
    };
    with_session(|session| session.selection.select(parsed)).is_ok()
}

fn init_store_inner(db_path: &str, config_json: Option<&str>) -> Result<(), String> {
    let config = match config_json {
        Some(text) if !text.trim().is_empty() => {
            StoreConfig::from_json(text).map_err(|err| err.to_string())?
        }
        _ => StoreConfig::default(),
    };

    let mut guard = lock_session();
    if guard.is_some() {
        return Err("task store already initialized".to_string());
    }

    let kv = SqliteKvStore::open(db_path).map_err(|err| {
        warn!("event=store_init module=ffi status=error error_code=db_open_failed error={err}");
        format!("failed to open task store: {err}")
    })?;
    let service = TaskService::open(Arc::new(kv), &config).map_err(|err| err.to_string())?;

    info!(
        "event=store_init module=ffi status=ok count={}",
        service.store().len()
    );
    *guard = Some(Session {
        service,
        selection: ViewSelection::default(),
    });
    Ok(())
}

fn with_session<T>(f: impl FnOnce(&mut Session) -> T) -> Result<T, String> {
    let mut guard = lock_session();
    match guard.as_mut() {
        Some(session) => Ok(f(session)),
        None => Err("task store is not initialized".to_string()),
    }
}

fn applied(changed: bool, id: &TaskId) -> Result<TaskId, String> {
    if changed {
        Ok(id.clone())
    } else {
        Err("no change applied".to_string())
    }
}

fn mutate(
    event: &'static str,
    target: Option<&TaskId>,
    f: impl FnOnce(&mut Session) -> Result<TaskId, String>,
) -> TaskActionResponse {
    let result = with_session(|session| {
        let outcome = f(session);
        (outcome, session.selection.filter())
    });

    match result {
        Ok((Ok(id), filter)) => TaskActionResponse {
            ok: true,
            task_id: Some(id.to_string()),
            selected_filter: filter.as_str().to_string(),
            message: format!("{event} ok"),
        },
        Ok((Err(message), filter)) => TaskActionResponse {
            ok: false,
            task_id: target.map(TaskId::to_string),
            selected_filter: filter.as_str().to_string(),
            message,
        },
        Err(message) => {
            warn!("event={event} module=ffi status=error error_code=no_session");
            TaskActionResponse {
                ok: false,
                task_id: target.map(TaskId::to_string),
                selected_filter: TaskFilter::default().as_str().to_string(),
                message,
            }
        }
    }
}

fn to_task_item(task: &Task) -> TaskItem {
    TaskItem {
        id: task.id().to_string(),
        text: task.text().to_string(),
        done: task.is_done(),
        category: task.category().as_str().to_string(),
        category_label: category_label(task.category()).to_string(),
        created_at_ms: task.created_at(),
        created_label: format_created_at(task.created_at()).unwrap_or_default(),
        progress_label: progress_label(task.progress()),
        steps: task
            .checklist()
            .iter()
            .map(|step| StepItem {
                text: step.text.clone(),
                done: step.done,
                source: match step.source {
                    StepSource::User => "user".to_string(),
                    StepSource::Assist => "assist".to_string(),
                },
            })
            .collect(),
        memo: task.memo().to_string(),
    }
}
