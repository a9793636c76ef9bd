//! Outbound sharing helpers: calendar links and chat share text.

use chrono::Days;

use crate::core::task::Task;
use crate::dates::format_date;

const CALENDAR_BASE: &str = "https://www.google.com/calendar/render?action=TEMPLATE";

/// Build a Google Calendar template URL for the task as an all-day event.
///
/// All-day events span `due/due+1` in `YYYYMMDD` form.
pub fn google_calendar_url(task: &Task) -> String {
    let start = task.due_date;
    let end = start.checked_add_days(Days::new(1)).unwrap_or(start);
    let dates = format!("{}/{}", start.format("%Y%m%d"), end.format("%Y%m%d"));

    let details = format!(
        "担当者: {}\n優先度: {}\nステータス: {}",
        task.assignee_name, task.priority, task.status
    );

    format!(
        "{CALENDAR_BASE}&text={}&dates={}&details={}",
        urlencoding::encode(&task.title),
        dates,
        urlencoding::encode(&details)
    )
}

/// Build the share text block for pasting into chat.
pub fn share_message(task: &Task) -> String {
    format!(
        "【タスク共有】\nタイトル: {}\n担当: {}\n期日: {}\n優先度: {}\nステータス: {}",
        task.title,
        task.assignee_name,
        format_date(task.due_date),
        task.priority,
        task.status
    )
}
