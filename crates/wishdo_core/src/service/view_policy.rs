//! Selected-tab policy for list screens.
//!
//! The store only reports outcomes; this type decides how the visible filter
//! reacts to them. Views may use it or keep their own selection.

use crate::model::task::{Category, TaskFilter, TaskId};
use crate::store::task_store::ToggleOutcome;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ViewSelection {
    filter: TaskFilter,
}

impl ViewSelection {
    pub fn new(filter: TaskFilter) -> Self {
        Self { filter }
    }

    pub fn filter(&self) -> TaskFilter {
        self.filter
    }

    pub fn select(&mut self, filter: TaskFilter) {
        self.filter = filter;
    }

    /// New tasks land in the default category, so show it.
    pub fn after_add(&mut self, added: Option<&TaskId>) {
        if added.is_some() {
            self.filter = TaskFilter::Active(Category::default());
        }
    }

    /// Completing a task jumps to the `done` tab; reopening keeps the tab.
    pub fn after_toggle(&mut self, outcome: ToggleOutcome) {
        if outcome == ToggleOutcome::Completed {
            self.filter = TaskFilter::Done;
        }
    }

    pub fn after_set_category(&mut self, applied: bool, category: Category) {
        if applied {
            self.filter = TaskFilter::Active(category);
        }
    }
}
