pub mod event;
pub mod recurrence;
pub mod reminder;
pub mod temporal;
pub mod todo;

pub use event::Event;
pub use recurrence::{RecurrencePattern, RecurrenceRule, describe};
pub use reminder::ReminderRequest;
pub use temporal::{Period, PeriodBounds};
pub use todo::{Priority, StatusFilter, Todo};
