use chrono::{NaiveDate, NaiveDateTime, TimeDelta};
use serde::{Deserialize, Serialize};

/// A named or custom reporting period.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Period {
    Week,
    Month,
    #[serde(rename = "3months")]
    Quarter,
    Year,
    Custom {
        start: Option<NaiveDate>,
        end: Option<NaiveDate>,
    },
}

/// Resolved bounds of a period.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PeriodBounds {
    Range {
        start: NaiveDateTime,
        end: NaiveDateTime,
    },
    /// No filtering at all.
    AllTime,
}

impl Period {
    /// Resolve to concrete bounds relative to `now`.
    ///
    /// Named periods look back a fixed number of days ending at `now`. A
    /// custom period with either bound missing degrades to [`PeriodBounds::AllTime`]
    /// rather than erroring: incomplete input filters nothing.
    pub fn resolve(&self, now: NaiveDateTime) -> PeriodBounds {
        let days_back = match self {
            Self::Week => 7,
            Self::Month => 30,
            Self::Quarter => 90,
            Self::Year => 365,
            Self::Custom {
                start: Some(start),
                end: Some(end),
            } => {
                return PeriodBounds::Range {
                    start: start.and_hms_opt(0, 0, 0).unwrap(),
                    end: end.and_hms_milli_opt(23, 59, 59, 999).unwrap(),
                };
            }
            Self::Custom { .. } => return PeriodBounds::AllTime,
        };
        PeriodBounds::Range {
            start: now - TimeDelta::days(days_back),
            end: now,
        }
    }

    /// Dutch display label, as used in report headers.
    pub fn label(&self) -> String {
        match self {
            Self::Week => "Laatste week".to_string(),
            Self::Month => "Laatste maand".to_string(),
            Self::Quarter => "Laatste 3 maanden".to_string(),
            Self::Year => "Laatste jaar".to_string(),
            Self::Custom {
                start: Some(start),
                end: Some(end),
            } => format!("{} tot {}", start, end),
            Self::Custom { .. } => "Alles".to_string(),
        }
    }
}

impl PeriodBounds {
    /// Inclusive on both ends.
    pub fn contains(&self, instant: NaiveDateTime) -> bool {
        match self {
            Self::Range { start, end } => instant >= *start && instant <= *end,
            Self::AllTime => true,
        }
    }
}

/// Narrow `items` to those whose instant falls inside the period.
pub fn filter_by<'a, T>(
    items: &'a [T],
    period: &Period,
    now: NaiveDateTime,
    instant: impl Fn(&T) -> NaiveDateTime,
) -> Vec<&'a T> {
    let bounds = period.resolve(now);
    items.iter().filter(|item| bounds.contains(instant(item))).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(y: i32, m: u32, d: u32, h: u32, min: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(h, min, 0)
            .unwrap()
    }

    #[test]
    fn week_spans_exactly_seven_days_ending_now() {
        let now = at(2024, 3, 15, 12, 0);
        let PeriodBounds::Range { start, end } = Period::Week.resolve(now) else {
            panic!("expected bounded range");
        };
        assert_eq!(end, now);
        assert_eq!(end - start, TimeDelta::days(7));
    }

    #[test]
    fn named_periods_look_back_fixed_days() {
        let now = at(2024, 3, 15, 12, 0);
        for (period, days) in [
            (Period::Week, 7),
            (Period::Month, 30),
            (Period::Quarter, 90),
            (Period::Year, 365),
        ] {
            let PeriodBounds::Range { start, end } = period.resolve(now) else {
                panic!("expected bounded range");
            };
            assert_eq!(end - start, TimeDelta::days(days));
            assert_eq!(end, now);
        }
    }

    #[test]
    fn custom_with_both_bounds_is_inclusive_of_end_day() {
        let period = Period::Custom {
            start: Some(NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()),
            end: Some(NaiveDate::from_ymd_opt(2024, 1, 31).unwrap()),
        };
        let bounds = period.resolve(at(2024, 3, 15, 12, 0));
        assert!(bounds.contains(at(2024, 1, 1, 0, 0)));
        assert!(bounds.contains(at(2024, 1, 31, 23, 59)));
        assert!(!bounds.contains(at(2024, 2, 1, 0, 0)));
    }

    #[test]
    fn custom_missing_a_bound_filters_nothing() {
        let period = Period::Custom {
            start: Some(NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()),
            end: None,
        };
        assert_eq!(period.resolve(at(2024, 3, 15, 12, 0)), PeriodBounds::AllTime);
        assert!(PeriodBounds::AllTime.contains(at(1999, 1, 1, 0, 0)));
    }

    #[test]
    fn contains_is_inclusive_on_both_ends() {
        let now = at(2024, 3, 15, 12, 0);
        let bounds = Period::Week.resolve(now);
        assert!(bounds.contains(now));
        assert!(bounds.contains(now - TimeDelta::days(7)));
        assert!(!bounds.contains(now - TimeDelta::days(7) - TimeDelta::seconds(1)));
        assert!(!bounds.contains(now + TimeDelta::seconds(1)));
    }

    #[test]
    fn filter_by_period() {
        let now = at(2024, 3, 15, 12, 0);
        let instants = vec![
            at(2024, 3, 14, 9, 0),  // yesterday: in week
            at(2024, 3, 1, 9, 0),   // two weeks ago: in month only
            at(2023, 1, 1, 9, 0),   // last year: out of both
        ];

        let week = filter_by(&instants, &Period::Week, now, |t| *t);
        assert_eq!(week.len(), 1);
        let month = filter_by(&instants, &Period::Month, now, |t| *t);
        assert_eq!(month.len(), 2);
        let all = filter_by(
            &instants,
            &Period::Custom { start: None, end: None },
            now,
            |t| *t,
        );
        assert_eq!(all.len(), 3);
    }

    #[test]
    fn labels() {
        assert_eq!(Period::Week.label(), "Laatste week");
        assert_eq!(Period::Quarter.label(), "Laatste 3 maanden");
        let custom = Period::Custom {
            start: Some(NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()),
            end: Some(NaiveDate::from_ymd_opt(2024, 1, 31).unwrap()),
        };
        assert_eq!(custom.label(), "2024-01-01 tot 2024-01-31");
    }

    #[test]
    fn quarter_serializes_as_3months() {
        let json = serde_json::to_string(&Period::Quarter).unwrap();
        assert_eq!(json, "\"3months\"");
        let back: Period = serde_json::from_str("\"3months\"").unwrap();
        assert_eq!(back, Period::Quarter);
    }
}
