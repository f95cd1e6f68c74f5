//! Record store boundary.
//!
//! The engine reads entities through [`RecordStore`]; it never owns them.
//! Raw rows arrive with string-typed dates and loosely-typed recurrence
//! fields exactly as the upstream store serves them, and are converted into
//! core types at this boundary. Malformed rows are rejected here with a log
//! line and never reach the scheduling core.

use chrono::{DateTime, Local, NaiveDate, NaiveDateTime};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::future::Future;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use thiserror::Error;
use uuid::Uuid;

use crate::core::event::Event;
use crate::core::recurrence::{RecurrencePattern, RecurrenceRule};
use crate::core::reminder::ReminderRequest;
use crate::core::todo::{Priority, Todo};

/// A transient store failure. The scheduler logs these and retries on the
/// next tick; they are never surfaced to the end user as hard errors.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("record store unavailable: {0}")]
    Unavailable(String),
    #[error("failed to read store data: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse store data: {0}")]
    Parse(#[from] serde_json::Error),
}

/// A malformed row rejected at the store boundary.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RecordError {
    #[error("unparseable date `{0}`")]
    BadDate(String),
    #[error("unknown recurrence pattern `{0}`")]
    UnknownPattern(String),
    #[error("recurrence interval must be at least 1, got {0}")]
    BadInterval(i64),
    #[error("event ends before it starts")]
    EndBeforeStart,
    #[error("missing field `{0}`")]
    MissingField(&'static str),
}

/// Read access the scheduling engine needs from the host's store.
pub trait RecordStore {
    fn list_events(&self) -> impl Future<Output = Result<Vec<Event>, StoreError>> + Send;

    /// Non-completed reminders due within `[now, until]`.
    fn list_pending_reminders(
        &self,
        now: NaiveDateTime,
        until: NaiveDateTime,
    ) -> impl Future<Output = Result<Vec<ReminderRequest>, StoreError>> + Send;
}

/// Derive the due reminders from entity snapshots. Shared by the adapters
/// below; hosts with their own range-filtered queries don't need it.
pub fn pending_reminders(
    events: &[Event],
    todos: &[Todo],
    now: NaiveDateTime,
    until: NaiveDateTime,
) -> Vec<ReminderRequest> {
    events
        .iter()
        .filter_map(ReminderRequest::for_event)
        .chain(todos.iter().filter_map(ReminderRequest::for_todo))
        .filter(|r| r.due_at >= now && r.due_at <= until)
        .collect()
}

// ---------------------------------------------------------------------------
// Raw rows
// ---------------------------------------------------------------------------

/// An appointment row as stored upstream.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventRecord {
    pub id: Uuid,
    pub title: String,
    pub start_date: String,
    pub end_date: String,
    #[serde(default)]
    pub all_day: bool,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub color: Option<String>,
    #[serde(default)]
    pub is_recurring: bool,
    #[serde(default)]
    pub recurrence_pattern: Option<String>,
    #[serde(default)]
    pub recurrence_interval: Option<i64>,
    #[serde(default)]
    pub recurrence_end_date: Option<String>,
    #[serde(default)]
    pub reminder_minutes: Option<i64>,
}

/// A todo row as stored upstream.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TodoRecord {
    pub id: Uuid,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub completed: bool,
    #[serde(default)]
    pub due_date: Option<String>,
    #[serde(default)]
    pub reminder_date: Option<String>,
    #[serde(default)]
    pub priority: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub is_recurring: bool,
    #[serde(default)]
    pub recurrence_pattern: Option<String>,
    #[serde(default)]
    pub recurrence_interval: Option<i64>,
    #[serde(default)]
    pub recurrence_end_date: Option<String>,
}

/// Parse an instant stored as RFC 3339 (converted to host-local time) or as
/// a bare local datetime.
fn parse_instant(s: &str) -> Result<NaiveDateTime, RecordError> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt.with_timezone(&Local).naive_local());
    }
    NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S")
        .or_else(|_| NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S"))
        .map_err(|_| RecordError::BadDate(s.to_string()))
}

fn parse_day(s: &str) -> Result<NaiveDate, RecordError> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .or_else(|_| parse_instant(s).map(|dt| dt.date()))
        .map_err(|_| RecordError::BadDate(s.to_string()))
}

fn parse_recurrence(
    is_recurring: bool,
    pattern: Option<String>,
    interval: Option<i64>,
    end_date: Option<String>,
) -> Result<Option<RecurrenceRule>, RecordError> {
    if !is_recurring {
        return Ok(None);
    }
    let keyword = pattern.ok_or(RecordError::MissingField("recurrence_pattern"))?;
    let pattern = RecurrencePattern::from_keyword(&keyword)
        .ok_or(RecordError::UnknownPattern(keyword))?;
    let interval = interval.unwrap_or(1);
    if interval < 1 {
        return Err(RecordError::BadInterval(interval));
    }
    let end_date = end_date.as_deref().map(parse_day).transpose()?;
    Ok(Some(RecurrenceRule {
        pattern,
        interval: interval as u32,
        end_date,
    }))
}

impl TryFrom<EventRecord> for Event {
    type Error = RecordError;

    fn try_from(record: EventRecord) -> Result<Self, Self::Error> {
        let start = parse_instant(&record.start_date)?;
        let end = parse_instant(&record.end_date)?;
        if end < start {
            return Err(RecordError::EndBeforeStart);
        }
        Ok(Event {
            id: record.id,
            title: record.title,
            start,
            end,
            all_day: record.all_day,
            location: record.location.unwrap_or_default(),
            description: record.description.unwrap_or_default(),
            color: record.color,
            recurrence: parse_recurrence(
                record.is_recurring,
                record.recurrence_pattern,
                record.recurrence_interval,
                record.recurrence_end_date,
            )?,
            // Zero means "no reminder"; normalize it away here.
            reminder_minutes: record
                .reminder_minutes
                .filter(|&m| m > 0)
                .map(|m| m as u32),
        })
    }
}

impl TryFrom<TodoRecord> for Todo {
    type Error = RecordError;

    fn try_from(record: TodoRecord) -> Result<Self, Self::Error> {
        Ok(Todo {
            id: record.id,
            title: record.title,
            description: record.description.unwrap_or_default(),
            completed: record.completed,
            due: record.due_date.as_deref().map(parse_instant).transpose()?,
            reminder_at: record
                .reminder_date
                .as_deref()
                .map(parse_instant)
                .transpose()?,
            priority: record.priority.as_deref().and_then(Priority::from_keyword),
            category: record.category,
            recurrence: parse_recurrence(
                record.is_recurring,
                record.recurrence_pattern,
                record.recurrence_interval,
                record.recurrence_end_date,
            )?,
        })
    }
}

// ---------------------------------------------------------------------------
// Adapters
// ---------------------------------------------------------------------------

#[derive(Debug, Default)]
struct MemoryInner {
    events: Vec<Event>,
    todos: Vec<Todo>,
}

/// Cloneable in-memory store. Every query returns a snapshot, so readers
/// never observe mid-tick mutation.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    inner: Arc<Mutex<MemoryInner>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert_event(&self, event: Event) {
        self.lock().events.push(event);
    }

    pub fn insert_todo(&self, todo: Todo) {
        self.lock().todos.push(todo);
    }

    /// Mark a todo completed. Returns false when the id is unknown.
    pub fn complete_todo(&self, id: Uuid) -> bool {
        let mut inner = self.lock();
        match inner.todos.iter_mut().find(|t| t.id == id) {
            Some(todo) => {
                todo.completed = true;
                true
            }
            None => false,
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, MemoryInner> {
        self.inner.lock().expect("store lock poisoned")
    }
}

impl RecordStore for MemoryStore {
    fn list_events(&self) -> impl Future<Output = Result<Vec<Event>, StoreError>> + Send {
        let events = self.lock().events.clone();
        async move { Ok(events) }
    }

    fn list_pending_reminders(
        &self,
        now: NaiveDateTime,
        until: NaiveDateTime,
    ) -> impl Future<Output = Result<Vec<ReminderRequest>, StoreError>> + Send {
        let (events, todos) = {
            let inner = self.lock();
            (inner.events.clone(), inner.todos.clone())
        };
        async move { Ok(pending_reminders(&events, &todos, now, until)) }
    }
}

/// Read-only JSON-file adapter: one file of event rows, one of todo rows.
///
/// A missing file is an empty store; an unreadable one is a transient
/// [`StoreError`], so a poll tick simply retries later. Rows that fail the
/// typed conversion are skipped with a warning.
#[derive(Debug, Clone)]
pub struct FileStore {
    events_path: PathBuf,
    todos_path: PathBuf,
}

impl FileStore {
    pub fn new(events_path: impl Into<PathBuf>, todos_path: impl Into<PathBuf>) -> Self {
        Self {
            events_path: events_path.into(),
            todos_path: todos_path.into(),
        }
    }

    fn load_events(&self) -> Result<Vec<Event>, StoreError> {
        let records: Vec<EventRecord> = read_records(&self.events_path)?;
        Ok(convert_records(records, "event"))
    }

    fn load_todos(&self) -> Result<Vec<Todo>, StoreError> {
        let records: Vec<TodoRecord> = read_records(&self.todos_path)?;
        Ok(convert_records(records, "todo"))
    }
}

fn read_records<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>, StoreError> {
    match std::fs::read_to_string(path) {
        Ok(content) => Ok(serde_json::from_str(&content)?),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Vec::new()),
        Err(e) => Err(e.into()),
    }
}

fn convert_records<R, T>(records: Vec<R>, kind: &str) -> Vec<T>
where
    T: TryFrom<R, Error = RecordError>,
{
    records
        .into_iter()
        .filter_map(|record| match T::try_from(record) {
            Ok(entity) => Some(entity),
            Err(err) => {
                log::warn!("skipping malformed {} record: {}", kind, err);
                None
            }
        })
        .collect()
}

impl RecordStore for FileStore {
    fn list_events(&self) -> impl Future<Output = Result<Vec<Event>, StoreError>> + Send {
        let result = self.load_events();
        async move { result }
    }

    fn list_pending_reminders(
        &self,
        now: NaiveDateTime,
        until: NaiveDateTime,
    ) -> impl Future<Output = Result<Vec<ReminderRequest>, StoreError>> + Send {
        let result = self
            .load_events()
            .and_then(|events| Ok((events, self.load_todos()?)));
        async move {
            let (events, todos) = result?;
            Ok(pending_reminders(&events, &todos, now, until))
        }
    }
}
