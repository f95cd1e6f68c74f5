//! Scheduling engine for a personal organizer: month calendar layout,
//! recurrence descriptions, period filtering and a permission-gated
//! reminder polling loop.
//!
//! The crate owns no persistence and no UI. Entities come from a
//! [`store::RecordStore`] the host provides; notifications go out through a
//! [`scheduler::NotificationSink`] the host provides.

pub mod calendar;
pub mod config;
pub mod core;
pub mod scheduler;
pub mod store;
