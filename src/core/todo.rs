use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::event::Event;
use super::recurrence::RecurrenceRule;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    Medium,
    High,
}

impl Priority {
    pub fn as_keyword(&self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }

    pub fn from_keyword(s: &str) -> Option<Self> {
        match s {
            "low" => Some(Self::Low),
            "medium" => Some(Self::Medium),
            "high" => Some(Self::High),
            _ => None,
        }
    }
}

/// List-view completion filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StatusFilter {
    #[default]
    All,
    Active,
    Completed,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Todo {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub completed: bool,
    pub due: Option<NaiveDateTime>,
    /// Absolute instant at which to raise a reminder.
    pub reminder_at: Option<NaiveDateTime>,
    pub priority: Option<Priority>,
    pub category: Option<String>,
    pub recurrence: Option<RecurrenceRule>,
}

impl Todo {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            title: title.into(),
            description: String::new(),
            completed: false,
            due: None,
            reminder_at: None,
            priority: None,
            category: None,
            recurrence: None,
        }
    }

    pub fn matches_status(&self, filter: StatusFilter) -> bool {
        match filter {
            StatusFilter::All => true,
            StatusFilter::Active => !self.completed,
            StatusFilter::Completed => self.completed,
        }
    }

    /// Case-insensitive match against title and description.
    pub fn matches_search(&self, query: &str) -> bool {
        let query = query.trim().to_lowercase();
        if query.is_empty() {
            return true;
        }
        self.title.to_lowercase().contains(&query)
            || self.description.to_lowercase().contains(&query)
    }

    /// Project a due todo onto the calendar as a zero-length event.
    pub fn as_calendar_event(&self) -> Option<Event> {
        let due = self.due?;
        let mut event = Event::new(self.title.clone(), due, due);
        event.id = self.id;
        event.description = self.description.clone();
        event.recurrence = self.recurrence.clone();
        Some(event)
    }
}
