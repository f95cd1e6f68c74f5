use chrono::{NaiveDateTime, TimeDelta};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::event::Event;
use super::todo::Todo;

/// A reminder that should fire once, at `due_at`.
///
/// Appointments derive `due_at` from a minutes-before offset; todos carry an
/// absolute reminder instant. `event_time` is the start or deadline shown in
/// the notification body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReminderRequest {
    pub event_id: Uuid,
    pub title: String,
    pub due_at: NaiveDateTime,
    pub event_time: NaiveDateTime,
}

impl ReminderRequest {
    /// Reminder for an appointment: fires `reminder_minutes` before start.
    /// A zero or absent offset means the reminder is disabled.
    pub fn for_event(event: &Event) -> Option<Self> {
        let minutes = event.reminder_minutes.filter(|&m| m > 0)?;
        Some(Self {
            event_id: event.id,
            title: event.title.clone(),
            due_at: event.start - TimeDelta::minutes(i64::from(minutes)),
            event_time: event.start,
        })
    }

    /// Reminder for a todo: fires at its absolute reminder instant.
    /// Completed todos never remind.
    pub fn for_todo(todo: &Todo) -> Option<Self> {
        if todo.completed {
            return None;
        }
        let due_at = todo.reminder_at?;
        Some(Self {
            event_id: todo.id,
            title: todo.title.clone(),
            due_at,
            event_time: todo.due.unwrap_or(due_at),
        })
    }
}

/// Dutch lead-time description for an appointment reminder offset:
/// "15 minuten van tevoren", "2 uur van tevoren", "2 dagen van tevoren".
/// Zero means no reminder, so no text.
pub fn lead_time_text(minutes: u32) -> Option<String> {
    if minutes == 0 {
        return None;
    }
    let text = if minutes < 60 {
        format!("{} minuten van tevoren", minutes)
    } else if minutes < 1440 {
        format!("{} uur van tevoren", minutes / 60)
    } else if minutes < 10080 {
        let unit = if minutes >= 2880 { "dagen" } else { "dag" };
        format!("{} {} van tevoren", minutes / 1440, unit)
    } else {
        format!("{} week van tevoren", minutes / 10080)
    };
    Some(text)
}
