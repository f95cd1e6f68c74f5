use chrono::TimeDelta;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Default poll period for the reminder scheduler, in seconds.
pub const DEFAULT_TICK_SECS: u64 = 60;

/// Default reminder lookahead window, in seconds (5 minutes).
pub const DEFAULT_LOOKAHEAD_SECS: u64 = 300;

/// Engine policy knobs.
///
/// The tick period should stay at or below the lookahead window; otherwise a
/// reminder's whole due window can pass between two polls.
#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct AgendaConfig {
    pub tick_secs: u64,
    pub lookahead_secs: u64,
}

impl Default for AgendaConfig {
    fn default() -> Self {
        Self {
            tick_secs: DEFAULT_TICK_SECS,
            lookahead_secs: DEFAULT_LOOKAHEAD_SECS,
        }
    }
}

impl AgendaConfig {
    /// Poll period for the tokio timer.
    pub fn tick_period(&self) -> Duration {
        Duration::from_secs(self.tick_secs)
    }

    /// Lookahead window for due-time arithmetic.
    pub fn lookahead(&self) -> TimeDelta {
        TimeDelta::seconds(self.lookahead_secs as i64)
    }

    /// True when the tick period fits inside the lookahead window, the
    /// condition under which every due window is observed at least once.
    pub fn covers_every_window(&self) -> bool {
        self.tick_secs <= self.lookahead_secs
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_cover_every_window() {
        let config = AgendaConfig::default();
        assert_eq!(config.tick_secs, 60);
        assert_eq!(config.lookahead_secs, 300);
        assert!(config.covers_every_window());
    }

    #[test]
    fn oversized_tick_detected() {
        let config = AgendaConfig {
            tick_secs: 600,
            lookahead_secs: 300,
        };
        assert!(!config.covers_every_window());
    }

    #[test]
    fn serde_round_trip() {
        let config = AgendaConfig {
            tick_secs: 30,
            lookahead_secs: 120,
        };
        let json = serde_json::to_string(&config).unwrap();
        let back: AgendaConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back, config);
    }
}
