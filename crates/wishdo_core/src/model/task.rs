//! Task domain model.
//!
//! # Responsibility
//! - Define the persisted task record and its checklist steps.
//! - Own the category enumeration and the list filter derived from it.
//!
//! # Invariants
//! - `TaskId` is assigned once at creation and never changes.
//! - `category` is always a `Category` variant; `done` tasks are filtered
//!   independently of it.
//! - Checklist order changes only through explicit step removal.
//!
//! # Wire shape
//! - One task serializes to a camelCase JSON object:
//!   `{id, text, done, createdAt, category, checklist, memo}`.
//! - `checklist`, `memo`, `done` and step `source` may be absent in stored
//!   data and fall back to defaults.

use serde::{de, Deserialize, Deserializer, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Opaque, stable task identifier.
///
/// New ids are UUID v4 strings. Any non-empty string loaded from storage is
/// accepted unchanged, so older millisecond-timestamp ids keep working.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskId(String);

impl TaskId {
    /// Generates a fresh random identifier.
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl From<String> for TaskId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<&str> for TaskId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl Display for TaskId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.0.as_str())
    }
}

/// Fixed category set partitioning active tasks.
///
/// Deserialization goes through `Category::parse`, so stored names accept
/// the same aliases and casing as UI input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    /// Short-term work (단기). Also known as `now`.
    #[default]
    Short,
    /// Reference material worth keeping (정보).
    Info,
    /// Long-term goals (장기). Also known as `someday`.
    Long,
}

impl Category {
    pub const ALL: [Category; 3] = [Category::Short, Category::Info, Category::Long];

    /// Stable wire name.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Short => "short",
            Self::Info => "info",
            Self::Long => "long",
        }
    }

    /// Parses a wire name or alias, case-insensitive.
    ///
    /// Returns `None` for anything outside the enumeration, including the
    /// `done` pseudo-category.
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "short" | "now" => Some(Self::Short),
            "info" => Some(Self::Info),
            "long" | "someday" => Some(Self::Long),
            _ => None,
        }
    }
}

impl<'de> Deserialize<'de> for Category {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = String::deserialize(deserializer)?;
        Self::parse(&value)
            .ok_or_else(|| de::Error::custom(format!("unknown category `{value}`")))
    }
}

impl Display for Category {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// List selector: one active category, or the cross-cutting `done` view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TaskFilter {
    /// Tasks with `done == false` in the given category.
    Active(Category),
    /// Every task with `done == true`, whatever its stored category.
    Done,
}

impl TaskFilter {
    /// Tab order used by list screens.
    pub const ALL: [TaskFilter; 4] = [
        TaskFilter::Active(Category::Short),
        TaskFilter::Active(Category::Info),
        TaskFilter::Active(Category::Long),
        TaskFilter::Done,
    ];

    pub fn parse(value: &str) -> Option<Self> {
        if value.trim().eq_ignore_ascii_case("done") {
            return Some(Self::Done);
        }
        Category::parse(value).map(Self::Active)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Active(category) => category.as_str(),
            Self::Done => "done",
        }
    }

    /// Returns whether `task` belongs to this view.
    pub fn matches(self, task: &Task) -> bool {
        match self {
            Self::Done => task.done,
            Self::Active(category) => !task.done && task.category == category,
        }
    }
}

impl Default for TaskFilter {
    fn default() -> Self {
        Self::Active(Category::default())
    }
}

impl Display for TaskFilter {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Origin of a checklist step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StepSource {
    /// Typed by the user.
    #[default]
    User,
    /// Appended from the keyword template table.
    Assist,
}

/// One checklist entry. Identified by its position in the parent checklist.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Step {
    pub text: String,
    #[serde(default)]
    pub done: bool,
    #[serde(default)]
    pub source: StepSource,
}

impl Step {
    pub fn new(text: impl Into<String>, source: StepSource) -> Self {
        Self {
            text: text.into(),
            done: false,
            source,
        }
    }
}

/// Completed vs. total checklist steps, as shown on task cards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StepProgress {
    pub done: usize,
    pub total: usize,
}

/// Validation failure for task records read from outside the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskValidationError {
    EmptyId,
    BlankText { id: TaskId },
    BlankStep { id: TaskId, index: usize },
}

impl Display for TaskValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyId => write!(f, "task id must not be empty"),
            Self::BlankText { id } => write!(f, "task `{id}` has blank text"),
            Self::BlankStep { id, index } => {
                write!(f, "task `{id}` has a blank checklist step at index {index}")
            }
        }
    }
}

impl Error for TaskValidationError {}

/// The sole persisted entity.
///
/// Fields are read through accessors; writes go through `TaskStore` so the
/// collection-level invariants cannot be bypassed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    id: TaskId,
    text: String,
    #[serde(default)]
    done: bool,
    /// Unix epoch milliseconds.
    created_at: i64,
    #[serde(default)]
    category: Category,
    #[serde(default)]
    checklist: Vec<Step>,
    #[serde(default)]
    memo: String,
}

impl Task {
    /// Builds a fresh task. Callers must pass already-trimmed, non-empty text.
    pub(crate) fn create(text: String, created_at: i64) -> Self {
        Self {
            id: TaskId::generate(),
            text,
            done: false,
            created_at,
            category: Category::default(),
            checklist: Vec::new(),
            memo: String::new(),
        }
    }

    pub fn id(&self) -> &TaskId {
        &self.id
    }

    pub fn text(&self) -> &str {
        self.text.as_str()
    }

    pub fn is_done(&self) -> bool {
        self.done
    }

    pub fn created_at(&self) -> i64 {
        self.created_at
    }

    pub fn category(&self) -> Category {
        self.category
    }

    pub fn checklist(&self) -> &[Step] {
        self.checklist.as_slice()
    }

    pub fn memo(&self) -> &str {
        self.memo.as_str()
    }

    pub fn progress(&self) -> StepProgress {
        StepProgress {
            done: self.checklist.iter().filter(|step| step.done).count(),
            total: self.checklist.len(),
        }
    }

    /// Checks the record-level invariants.
    ///
    /// # Errors
    /// - `EmptyId` when `id` is empty.
    /// - `BlankText` when `text` is blank after trimming.
    /// - `BlankStep` for the first checklist step with blank text.
    pub fn validate(&self) -> Result<(), TaskValidationError> {
        if self.id.as_str().trim().is_empty() {
            return Err(TaskValidationError::EmptyId);
        }
        if self.text.trim().is_empty() {
            return Err(TaskValidationError::BlankText {
                id: self.id.clone(),
            });
        }
        if let Some(index) = self
            .checklist
            .iter()
            .position(|step| step.text.trim().is_empty())
        {
            return Err(TaskValidationError::BlankStep {
                id: self.id.clone(),
                index,
            });
        }
        Ok(())
    }

    /// Flips `done` and returns the new value.
    pub(crate) fn toggle_done(&mut self) -> bool {
        self.done = !self.done;
        self.done
    }

    pub(crate) fn set_category(&mut self, category: Category) {
        self.category = category;
        self.done = false;
    }

    pub(crate) fn push_step(&mut self, step: Step) {
        self.checklist.push(step);
    }

    pub(crate) fn toggle_step(&mut self, index: usize) -> bool {
        match self.checklist.get_mut(index) {
            Some(step) => {
                step.done = !step.done;
                true
            }
            None => false,
        }
    }

    pub(crate) fn remove_step(&mut self, index: usize) -> Option<Step> {
        if index < self.checklist.len() {
            Some(self.checklist.remove(index))
        } else {
            None
        }
    }

    pub(crate) fn set_memo(&mut self, memo: String) {
        self.memo = memo;
    }
}

#[cfg(test)]
mod tests {
    use super::{Category, Step, StepSource, Task, TaskFilter, TaskValidationError};

    #[test]
    fn category_parse_accepts_aliases_and_rejects_done() {
        assert_eq!(Category::parse(" NOW "), Some(Category::Short));
        assert_eq!(Category::parse("someday"), Some(Category::Long));
        assert_eq!(Category::parse("info"), Some(Category::Info));
        assert_eq!(Category::parse("done"), None);
        assert_eq!(Category::parse(""), None);
    }

    #[test]
    fn filter_matches_done_regardless_of_category() {
        let mut task = Task::create("read".to_string(), 0);
        task.set_category(Category::Long);
        task.toggle_done();

        assert!(TaskFilter::Done.matches(&task));
        assert!(!TaskFilter::Active(Category::Long).matches(&task));
    }

    #[test]
    fn validate_reports_first_blank_step() {
        let mut task = Task::create("trip".to_string(), 0);
        task.push_step(Step::new("book", StepSource::User));
        task.push_step(Step::new("  ", StepSource::User));

        let err = task.validate().unwrap_err();
        assert_eq!(
            err,
            TaskValidationError::BlankStep {
                id: task.id().clone(),
                index: 1,
            }
        );
    }

    #[test]
    fn progress_counts_done_steps() {
        let mut task = Task::create("trip".to_string(), 0);
        task.push_step(Step::new("a", StepSource::User));
        task.push_step(Step::new("b", StepSource::Assist));
        task.toggle_step(1);

        let progress = task.progress();
        assert_eq!(progress.done, 1);
        assert_eq!(progress.total, 2);
    }
}
