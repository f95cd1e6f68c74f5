use chrono::{Datelike, NaiveDate, TimeDelta};

use crate::core::event::Event;

/// Cells in a month grid: always 6 rows of 7 days, weeks starting Monday.
pub const GRID_DAYS: usize = 42;

pub const MONTH_NAMES: [&str; 12] = [
    "Januari",
    "Februari",
    "Maart",
    "April",
    "Mei",
    "Juni",
    "Juli",
    "Augustus",
    "September",
    "Oktober",
    "November",
    "December",
];

pub const DAY_NAMES: [&str; 7] = ["Ma", "Di", "Wo", "Do", "Vr", "Za", "Zo"];

/// One cell of the month grid.
#[derive(Debug, Clone)]
pub struct CalendarDay {
    pub date: NaiveDate,
    /// False for the leading/trailing padding days of adjacent months.
    pub in_month: bool,
    pub is_today: bool,
    /// Events occupying this day, ordered by start time, then title.
    pub events: Vec<Event>,
}

/// Build the 42-cell grid for a month (`month` is 1–12).
///
/// Leading cells come from the tail of the previous month so the first
/// column is always a Monday; trailing cells pad out of the next month.
/// An out-of-range month is a caller bug and panics.
pub fn month_grid(year: i32, month: u32, today: NaiveDate) -> Vec<CalendarDay> {
    let first = NaiveDate::from_ymd_opt(year, month, 1)
        .expect("month must be 1-12 and year in chrono's supported range");

    let grid_start = first - TimeDelta::days(i64::from(first.weekday().num_days_from_monday()));

    (0..GRID_DAYS as i64)
        .map(|offset| {
            let date = grid_start + TimeDelta::days(offset);
            CalendarDay {
                date,
                in_month: date.month() == month && date.year() == year,
                is_today: date == today,
                events: Vec::new(),
            }
        })
        .collect()
}

/// Build the grid and place every occupying event on its days.
pub fn layout_month(
    year: i32,
    month: u32,
    today: NaiveDate,
    events: &[Event],
) -> Vec<CalendarDay> {
    let mut grid = month_grid(year, month, today);
    for day in &mut grid {
        day.events = events_on_day(events, day.date);
    }
    grid
}

/// Events occupying a single day, ordered by start time with title as
/// tiebreak. All-day events sort like any other; the ordering stays total.
pub fn events_on_day(events: &[Event], date: NaiveDate) -> Vec<Event> {
    let mut found: Vec<Event> = events
        .iter()
        .filter(|e| e.occupies_day(date))
        .cloned()
        .collect();
    found.sort_by(|a, b| a.start.cmp(&b.start).then_with(|| a.title.cmp(&b.title)));
    found
}

/// Dutch header label, e.g. "Maart 2024".
pub fn month_label(year: i32, month: u32) -> String {
    assert!((1..=12).contains(&month), "month must be 1-12");
    format!("{} {}", MONTH_NAMES[(month - 1) as usize], year)
}
