//! In-memory task collection and its mutation contract.
//!
//! # Responsibility
//! - Hold the authoritative task list (newest first).
//! - Apply mutations atomically: each call applies fully or not at all.
//! - Derive filtered views on demand.
//!
//! # Invariants
//! - Task ids are unique across the collection at all times.
//! - Unknown ids, out-of-range indices and blank input are silent no-ops.
//! - `set_category` always leaves the task with `done == false`.
//! - Filtered views are recomputed on every call, never cached.

use crate::assist::suggest_steps;
use crate::model::task::{Category, Step, StepSource, Task, TaskFilter, TaskId};
use std::collections::HashSet;

/// Result of `TaskStore::toggle_done`.
///
/// `Completed` is the signal a view may use to switch to the `done` filter;
/// the store itself never changes any selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToggleOutcome {
    /// `done` went from false to true.
    Completed,
    /// `done` went from true to false.
    Reopened,
    /// No task with that id.
    NotFound,
}

impl ToggleOutcome {
    pub fn changed(self) -> bool {
        !matches!(self, Self::NotFound)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskStore {
    tasks: Vec<Task>,
}

impl TaskStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds a store from an existing collection, keeping collection order.
    ///
    /// Later records repeating an earlier id are dropped.
    pub fn from_tasks(tasks: Vec<Task>) -> Self {
        let mut seen = HashSet::new();
        let tasks = tasks
            .into_iter()
            .filter(|task| seen.insert(task.id().clone()))
            .collect();
        Self { tasks }
    }

    pub fn tasks(&self) -> &[Task] {
        self.tasks.as_slice()
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    pub fn get(&self, id: &TaskId) -> Option<&Task> {
        self.tasks.iter().find(|task| task.id() == id)
    }

    /// Prepends a new task created now. See `add_at`.
    pub fn add(&mut self, text: &str) -> Option<TaskId> {
        self.add_at(text, now_epoch_ms())
    }

    /// Prepends a new task with the given creation time.
    ///
    /// Returns the new id, or `None` when `text` is blank after trimming.
    pub fn add_at(&mut self, text: &str, created_at: i64) -> Option<TaskId> {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return None;
        }

        let mut task = Task::create(trimmed.to_string(), created_at);
        while self.get(task.id()).is_some() {
            task = Task::create(trimmed.to_string(), created_at);
        }
        let id = task.id().clone();
        self.tasks.insert(0, task);
        Some(id)
    }

    /// Deletes the task. Returns `false` when absent.
    pub fn remove(&mut self, id: &TaskId) -> bool {
        let before = self.tasks.len();
        self.tasks.retain(|task| task.id() != id);
        self.tasks.len() != before
    }

    /// Flips `done`, reporting the transition observed by this update.
    pub fn toggle_done(&mut self, id: &TaskId) -> ToggleOutcome {
        match self.find_mut(id) {
            Some(task) => {
                if task.toggle_done() {
                    ToggleOutcome::Completed
                } else {
                    ToggleOutcome::Reopened
                }
            }
            None => ToggleOutcome::NotFound,
        }
    }

    /// Moves the task to `category` and marks it active again.
    pub fn set_category(&mut self, id: &TaskId, category: Category) -> bool {
        match self.find_mut(id) {
            Some(task) => {
                task.set_category(category);
                true
            }
            None => false,
        }
    }

    /// Appends a user step. Blank text is ignored.
    pub fn add_step(&mut self, id: &TaskId, text: &str) -> bool {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return false;
        }
        match self.find_mut(id) {
            Some(task) => {
                task.push_step(Step::new(trimmed, StepSource::User));
                true
            }
            None => false,
        }
    }

    pub fn toggle_step(&mut self, id: &TaskId, index: usize) -> bool {
        self.find_mut(id)
            .is_some_and(|task| task.toggle_step(index))
    }

    /// Removes the step at `index`; later steps keep their relative order.
    pub fn remove_step(&mut self, id: &TaskId, index: usize) -> bool {
        self.find_mut(id)
            .is_some_and(|task| task.remove_step(index).is_some())
    }

    /// Replaces the memo verbatim. Whitespace and newlines are preserved.
    pub fn set_memo(&mut self, id: &TaskId, memo: impl Into<String>) -> bool {
        match self.find_mut(id) {
            Some(task) => {
                task.set_memo(memo.into());
                true
            }
            None => false,
        }
    }

    /// Appends the keyword template for the task title.
    ///
    /// Returns the number of appended steps (0 when the id is unknown).
    pub fn apply_assist(&mut self, id: &TaskId) -> usize {
        let Some(task) = self.find_mut(id) else {
            return 0;
        };
        let steps = suggest_steps(task.text());
        for text in &steps {
            task.push_step(Step::new(*text, StepSource::Assist));
        }
        steps.len()
    }

    /// Tasks visible under `filter`, in collection order.
    pub fn filtered(&self, filter: TaskFilter) -> Vec<&Task> {
        self.tasks
            .iter()
            .filter(|task| filter.matches(task))
            .collect()
    }

    /// Number of tasks per filter, in tab order.
    pub fn counts(&self) -> Vec<(TaskFilter, usize)> {
        TaskFilter::ALL
            .iter()
            .map(|filter| {
                let count = self.tasks.iter().filter(|task| filter.matches(task)).count();
                (*filter, count)
            })
            .collect()
    }

    fn find_mut(&mut self, id: &TaskId) -> Option<&mut Task> {
        self.tasks.iter_mut().find(|task| task.id() == id)
    }
}

fn now_epoch_ms() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

#[cfg(test)]
mod tests {
    use super::{TaskStore, ToggleOutcome};
    use crate::model::task::{Category, StepSource, TaskFilter, TaskId};

    #[test]
    fn add_uses_current_time() {
        let mut store = TaskStore::new();
        let before = chrono::Utc::now().timestamp_millis();
        let id = store.add("물 마시기").unwrap();
        let after = chrono::Utc::now().timestamp_millis();

        let created_at = store.get(&id).unwrap().created_at();
        assert!(created_at >= before && created_at <= after);
    }

    #[test]
    fn apply_assist_tags_steps_and_appends_after_user_steps() {
        let mut store = TaskStore::new();
        let id = store.add_at("제주 여행", 0).unwrap();
        store.add_step(&id, "휴가 내기");

        let appended = store.apply_assist(&id);
        let checklist = store.get(&id).unwrap().checklist();

        assert_eq!(appended, 4);
        assert_eq!(checklist.len(), 5);
        assert_eq!(checklist[0].source, StepSource::User);
        assert!(checklist[1..]
            .iter()
            .all(|step| step.source == StepSource::Assist && !step.done));
    }

    #[test]
    fn apply_assist_on_unknown_id_is_noop() {
        let mut store = TaskStore::new();
        assert_eq!(store.apply_assist(&TaskId::from("missing")), 0);
        assert!(store.is_empty());
    }

    #[test]
    fn counts_follow_tab_order() {
        let mut store = TaskStore::new();
        let a = store.add_at("a", 0).unwrap();
        store.add_at("b", 1).unwrap();
        let c = store.add_at("c", 2).unwrap();
        store.set_category(&a, Category::Info);
        assert_eq!(store.toggle_done(&c), ToggleOutcome::Completed);

        let counts = store.counts();
        assert_eq!(
            counts,
            vec![
                (TaskFilter::Active(Category::Short), 1),
                (TaskFilter::Active(Category::Info), 1),
                (TaskFilter::Active(Category::Long), 0),
                (TaskFilter::Done, 1),
            ]
        );
    }
}
