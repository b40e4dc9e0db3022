//! Per-user notification preferences

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationPrefs {
    /// Gentle reminders when a need turns critical
    pub soft_nudges: bool,
    pub daily_report: bool,
}

impl Default for NotificationPrefs {
    fn default() -> Self {
        Self {
            soft_nudges: true,
            daily_report: true,
        }
    }
}
