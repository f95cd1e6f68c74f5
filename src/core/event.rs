use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::recurrence::RecurrenceRule;

/// A calendar appointment, or a todo projected onto the calendar
/// (in which case `start == end`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    pub id: Uuid,
    pub title: String,
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
    pub all_day: bool,
    pub location: String,
    pub description: String,
    /// Display color for the calendar cell, e.g. "#4dd0e1".
    pub color: Option<String>,
    pub recurrence: Option<RecurrenceRule>,
    /// Minutes before `start` to raise a reminder. 0 or absent means no
    /// reminder.
    pub reminder_minutes: Option<u32>,
}

impl Event {
    pub fn new(title: impl Into<String>, start: NaiveDateTime, end: NaiveDateTime) -> Self {
        Self {
            id: Uuid::new_v4(),
            title: title.into(),
            start,
            end,
            all_day: false,
            location: String::new(),
            description: String::new(),
            color: None,
            recurrence: None,
            reminder_minutes: None,
        }
    }

    /// Whether this event occupies the given calendar day.
    ///
    /// True when the event starts within the day, ends within the day, or
    /// fully spans it. All three arms are needed: the first two cover
    /// single-day and boundary days of a span, the third covers days a
    /// multi-day event passes straight through.
    pub fn occupies_day(&self, date: NaiveDate) -> bool {
        let day_start = date.and_hms_opt(0, 0, 0).unwrap();
        let day_end = date.and_hms_milli_opt(23, 59, 59, 999).unwrap();

        (self.start >= day_start && self.start <= day_end)
            || (self.end >= day_start && self.end <= day_end)
            || (self.start <= day_start && self.end >= day_end)
    }

    pub fn is_past(&self, now: NaiveDateTime) -> bool {
        self.end < now
    }
}
