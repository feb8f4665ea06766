//! Configuration for the campus events module

use chrono::Duration;
use serde::{Deserialize, Serialize};

/// Campus events module configuration
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Minutes after an event's start time before a check-in counts as late
    #[serde(default = "default_late_after_minutes")]
    pub late_after_minutes: u32,

    /// Upper bound on compare-and-set attempts for one registration
    #[serde(default = "default_max_register_attempts")]
    pub max_register_attempts: u32,

    /// Reject registrations once the event has started
    #[serde(default)]
    pub registration_closes_at_start: bool,

    /// Top-students size when the caller passes no limit
    #[serde(default = "default_top_students_limit")]
    pub default_top_students_limit: usize,

    /// Largest top-students size a caller may request
    #[serde(default = "default_max_top_students_limit")]
    pub max_top_students_limit: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            late_after_minutes: default_late_after_minutes(),
            max_register_attempts: default_max_register_attempts(),
            registration_closes_at_start: false,
            default_top_students_limit: default_top_students_limit(),
            max_top_students_limit: default_max_top_students_limit(),
        }
    }
}

impl Config {
    pub fn late_grace(&self) -> Duration {
        Duration::minutes(i64::from(self.late_after_minutes))
    }
}

fn default_late_after_minutes() -> u32 {
    15
}

fn default_max_register_attempts() -> u32 {
    32
}

fn default_top_students_limit() -> usize {
    3
}

fn default_max_top_students_limit() -> usize {
    100
}
