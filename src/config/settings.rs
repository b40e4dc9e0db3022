//! Settings sections of the config file

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::engine::DEFAULT_CAP_SECONDS;
use crate::gamification::TaskPolicy;

/// Core game rules
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameSettings {
    /// Upper bound on the seconds of decay applied in one tick.
    /// A pet left alone for days only loses this much at once.
    #[serde(default = "default_decay_cap_seconds")]
    pub decay_cap_seconds: i64,

    /// Coins a new pet starts with
    #[serde(default = "default_starting_coins")]
    pub starting_coins: u64,
}

fn default_decay_cap_seconds() -> i64 {
    DEFAULT_CAP_SECONDS
}

fn default_starting_coins() -> u64 {
    1000
}

impl Default for GameSettings {
    fn default() -> Self {
        Self {
            decay_cap_seconds: default_decay_cap_seconds(),
            starting_coins: default_starting_coins(),
        }
    }
}

/// How each day's tasks are picked
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyTaskSettings {
    /// "seeded" samples from the pool per date, "fixed" always uses
    /// feed / minigame / play
    #[serde(default)]
    pub policy: TaskPolicy,

    /// Number of tasks sampled under the seeded policy
    #[serde(default = "default_task_count")]
    pub count: usize,
}

fn default_task_count() -> usize {
    3
}

impl Default for DailyTaskSettings {
    fn default() -> Self {
        Self {
            policy: TaskPolicy::default(),
            count: default_task_count(),
        }
    }
}

/// Random bonus events after care actions
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BonusEventSettings {
    /// Probability in 0.0..=1.0
    #[serde(default = "default_bonus_chance")]
    pub chance: f64,

    /// Fixed RNG seed, for reproducible runs
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
}

fn default_bonus_chance() -> f64 {
    0.15
}

impl Default for BonusEventSettings {
    fn default() -> Self {
        Self {
            chance: default_bonus_chance(),
            seed: None,
        }
    }
}

/// Background sweeps run by `petkeeper scheduler`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SchedulerSettings {
    #[serde(default = "default_decay_interval_secs")]
    pub decay_interval_secs: u64,

    #[serde(default = "default_nudge_interval_secs")]
    pub nudge_interval_secs: u64,

    /// UTC hour (0-23) at which the daily report goes out
    #[serde(default = "default_daily_report_hour_utc")]
    pub daily_report_hour_utc: u32,
}

fn default_decay_interval_secs() -> u64 {
    600
}

fn default_nudge_interval_secs() -> u64 {
    1200
}

fn default_daily_report_hour_utc() -> u32 {
    7
}

impl Default for SchedulerSettings {
    fn default() -> Self {
        Self {
            decay_interval_secs: default_decay_interval_secs(),
            nudge_interval_secs: default_nudge_interval_secs(),
            daily_report_hour_utc: default_daily_report_hour_utc(),
        }
    }
}

/// Where pet data lives
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StorageSettings {
    /// SQLite database file. Defaults to ~/.petkeeper/pets.db
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub database_path: Option<PathBuf>,
}
