use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Repeat unit for appointments and todos.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecurrencePattern {
    Daily,
    Weekly,
    Monthly,
    Yearly,
}

impl RecurrencePattern {
    pub fn as_keyword(&self) -> &'static str {
        match self {
            Self::Daily => "daily",
            Self::Weekly => "weekly",
            Self::Monthly => "monthly",
            Self::Yearly => "yearly",
        }
    }

    pub fn from_keyword(s: &str) -> Option<Self> {
        match s {
            "daily" => Some(Self::Daily),
            "weekly" => Some(Self::Weekly),
            "monthly" => Some(Self::Monthly),
            "yearly" => Some(Self::Yearly),
            _ => None,
        }
    }

    /// Dutch unit noun, singular or plural.
    fn unit_noun(&self, plural: bool) -> &'static str {
        match (self, plural) {
            (Self::Daily, false) => "dag",
            (Self::Daily, true) => "dagen",
            (Self::Weekly, false) => "week",
            (Self::Weekly, true) => "weken",
            (Self::Monthly, false) => "maand",
            (Self::Monthly, true) => "maanden",
            (Self::Yearly, false) => "jaar",
            (Self::Yearly, true) => "jaren",
        }
    }
}

/// A recurrence rule: repeat every `interval` pattern-units.
///
/// Purely descriptive. The engine never expands a rule into concrete future
/// occurrences; an event shows up on its stored start date only. `end_date`
/// round-trips through the store but is not evaluated here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecurrenceRule {
    pub pattern: RecurrencePattern,
    /// Repeat every N units, at least 1.
    pub interval: u32,
    pub end_date: Option<NaiveDate>,
}

impl RecurrenceRule {
    pub fn new(pattern: RecurrencePattern, interval: u32) -> Self {
        Self {
            pattern,
            interval: interval.max(1),
            end_date: None,
        }
    }
}

impl fmt::Display for RecurrenceRule {
    /// Human description: "Elke dag", "Elke 3 dagen", "Elke 2 weken".
    /// The interval number is omitted when it is 1.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.interval > 1 {
            write!(
                f,
                "Elke {} {}",
                self.interval,
                self.pattern.unit_noun(true)
            )
        } else {
            write!(f, "Elke {}", self.pattern.unit_noun(false))
        }
    }
}

/// Description of an optional rule; `None` when there is no rule.
pub fn describe(rule: Option<&RecurrenceRule>) -> Option<String> {
    rule.map(|r| r.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn singular_omits_interval() {
        assert_eq!(
            RecurrenceRule::new(RecurrencePattern::Daily, 1).to_string(),
            "Elke dag"
        );
        assert_eq!(
            RecurrenceRule::new(RecurrencePattern::Monthly, 1).to_string(),
            "Elke maand"
        );
        assert_eq!(
            RecurrenceRule::new(RecurrencePattern::Yearly, 1).to_string(),
            "Elke jaar"
        );
    }

    #[test]
    fn plural_includes_interval() {
        assert_eq!(
            RecurrenceRule::new(RecurrencePattern::Weekly, 2).to_string(),
            "Elke 2 weken"
        );
        assert_eq!(
            RecurrenceRule::new(RecurrencePattern::Daily, 3).to_string(),
            "Elke 3 dagen"
        );
        assert_eq!(
            RecurrenceRule::new(RecurrencePattern::Yearly, 5).to_string(),
            "Elke 5 jaren"
        );
    }

    #[test]
    fn describe_absent_rule() {
        assert_eq!(describe(None), None);
        let rule = RecurrenceRule::new(RecurrencePattern::Weekly, 1);
        assert_eq!(describe(Some(&rule)), Some("Elke week".to_string()));
    }

    #[test]
    fn zero_interval_clamped() {
        let rule = RecurrenceRule::new(RecurrencePattern::Daily, 0);
        assert_eq!(rule.interval, 1);
    }

    #[test]
    fn pattern_keywords_round_trip() {
        for pattern in [
            RecurrencePattern::Daily,
            RecurrencePattern::Weekly,
            RecurrencePattern::Monthly,
            RecurrencePattern::Yearly,
        ] {
            assert_eq!(
                RecurrencePattern::from_keyword(pattern.as_keyword()),
                Some(pattern)
            );
        }
        assert_eq!(RecurrencePattern::from_keyword("fortnightly"), None);
    }

    #[test]
    fn pattern_serializes_lowercase() {
        let json = serde_json::to_string(&RecurrencePattern::Monthly).unwrap();
        assert_eq!(json, "\"monthly\"");
    }
}
