//! Korean display strings for task cards and tabs.
//!
//! # Responsibility
//! - Format `created_at` as `YYYY. MM. DD. 오전|오후 hh:mm`.
//! - Provide tab labels and empty-list messages.

use crate::model::task::{Category, StepProgress, TaskFilter};
use chrono::{DateTime, Datelike, Local, TimeZone, Timelike, Utc};

pub fn category_label(category: Category) -> &'static str {
    match category {
        Category::Short => "단기",
        Category::Info => "정보",
        Category::Long => "장기",
    }
}

pub fn filter_label(filter: TaskFilter) -> &'static str {
    match filter {
        TaskFilter::Active(category) => category_label(category),
        TaskFilter::Done => "완료",
    }
}

pub fn empty_list_message(filter: TaskFilter) -> &'static str {
    match filter {
        TaskFilter::Done => "완료한 항목이 없어요.",
        TaskFilter::Active(_) => "이 카테고리에 항목이 없어요.",
    }
}

/// `스텝 done/total` card suffix.
pub fn progress_label(progress: StepProgress) -> String {
    format!("스텝 {}/{}", progress.done, progress.total)
}

/// Formats epoch milliseconds in the device's local time zone.
///
/// Returns `None` when `epoch_ms` is outside chrono's range.
pub fn format_created_at(epoch_ms: i64) -> Option<String> {
    format_created_at_in(epoch_ms, &Local)
}

/// Formats epoch milliseconds in `tz`.
pub fn format_created_at_in<Tz: TimeZone>(epoch_ms: i64, tz: &Tz) -> Option<String> {
    let utc: DateTime<Utc> = Utc.timestamp_millis_opt(epoch_ms).single()?;
    let local = utc.with_timezone(tz);

    let hour = local.hour();
    let meridiem = if hour >= 12 { "오후" } else { "오전" };
    let hour12 = match hour % 12 {
        0 => 12,
        other => other,
    };

    Some(format!(
        "{}. {:02}. {:02}. {} {:02}:{:02}",
        local.year(),
        local.month(),
        local.day(),
        meridiem,
        hour12,
        local.minute()
    ))
}
