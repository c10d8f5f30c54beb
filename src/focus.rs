//! Focus mode: a cursor over the pending view that shows one task at a time.
//!
//! The cursor is index based. Whenever the pending view changes shape it is
//! clamped back into range, so after a removal it may land on a different task
//! than the one that was focused before.

use chrono::{DateTime, TimeZone, Utc};
use serde::Serialize;

use crate::error::FocusError;
use crate::i18n::date_locale;
use crate::models::{Language, Settings, Task, TimeFormat};

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct FocusNavigator {
    cursor: Option<usize>,
}

impl FocusNavigator {
    pub fn is_active(&self) -> bool {
        self.cursor.is_some()
    }

    pub fn cursor(&self) -> Option<usize> {
        self.cursor
    }

    /// Starts at the first pending task. Refused when there is nothing to focus.
    pub fn enter(&mut self, view_len: usize) -> Result<(), FocusError> {
        if view_len == 0 {
            return Err(FocusError::EmptyView);
        }
        self.cursor = Some(0);
        Ok(())
    }

    /// Leaves focus mode. The position is not remembered for the next entry.
    pub fn exit(&mut self) {
        self.cursor = None;
    }

    pub fn next(&mut self, view_len: usize) {
        if let Some(cursor) = self.cursor.as_mut() {
            if view_len > 0 {
                *cursor = (*cursor + 1) % view_len;
            }
        }
    }

    pub fn previous(&mut self, view_len: usize) {
        if let Some(cursor) = self.cursor.as_mut() {
            if view_len > 0 {
                *cursor = (*cursor + view_len - 1) % view_len;
            }
        }
    }

    pub fn current_task<'a>(&self, view: &[&'a Task]) -> Result<&'a Task, FocusError> {
        let cursor = self.cursor.unwrap_or(0);
        view.get(cursor.min(view.len().saturating_sub(1)))
            .copied()
            .ok_or(FocusError::EmptyView)
    }

    /// Re-clamps after the pending view changed. Returns whether focus is still active;
    /// an empty view deactivates the navigator.
    pub fn reconcile(&mut self, view_len: usize) -> bool {
        match self.cursor {
            None => false,
            Some(_) if view_len == 0 => {
                self.cursor = None;
                false
            }
            Some(cursor) => {
                self.cursor = Some(cursor.min(view_len - 1));
                true
            }
        }
    }
}

/// What a renderer needs to draw focus mode.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct FocusView {
    pub task: Task,
    pub index: usize,
    pub total: usize,
    pub announcement: String,
}

impl FocusView {
    pub fn new<Tz: TimeZone>(
        task: &Task,
        index: usize,
        total: usize,
        settings: &Settings,
        tz: &Tz,
    ) -> Self
    where
        Tz::Offset: std::fmt::Display,
    {
        Self {
            task: task.clone(),
            index,
            total,
            announcement: announcement(task, index, total, settings, tz),
        }
    }
}

/// Month and AM/PM names follow the display language.
pub fn format_due<Tz: TimeZone>(
    due: &DateTime<Utc>,
    tz: &Tz,
    time_format: TimeFormat,
    language: Language,
) -> String
where
    Tz::Offset: std::fmt::Display,
{
    let pattern = match time_format {
        TimeFormat::TwelveHour => "%b %-d, %Y, %-I:%M %p",
        TimeFormat::TwentyFourHour => "%b %-d, %Y, %H:%M",
    };
    due.with_timezone(tz)
        .format_localized(pattern, date_locale(language))
        .to_string()
}

/// Screen reader text for the focused task.
pub fn announcement<Tz: TimeZone>(
    task: &Task,
    index: usize,
    total: usize,
    settings: &Settings,
    tz: &Tz,
) -> String
where
    Tz::Offset: std::fmt::Display,
{
    let mut out = format!(
        "Currently focusing on task: {}. Priority: {}. Category: {}.",
        task.text, task.priority, task.category
    );
    if let Some(due) = &task.due_date {
        let due = format_due(due, tz, settings.time_format, settings.language);
        out.push_str(&format!(" Due date: {due}."));
    }
    out.push_str(&format!(" Task {} of {}.", index + 1, total));
    out
}
