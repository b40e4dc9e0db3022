//! Configuration loading and management

mod io;
mod settings;

pub use settings::{
    BonusEventSettings, DailyTaskSettings, GameSettings, SchedulerSettings, StorageSettings,
};

use std::path::PathBuf;

use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};

/// Main configuration structure
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Core game rules
    #[serde(default)]
    pub game: GameSettings,

    /// Daily task selection
    #[serde(default)]
    pub daily_tasks: DailyTaskSettings,

    /// Random bonus events
    #[serde(default)]
    pub bonus_events: BonusEventSettings,

    /// Background sweeps
    #[serde(default)]
    pub scheduler: SchedulerSettings,

    /// Storage location
    #[serde(default)]
    pub storage: StorageSettings,
}

impl Config {
    /// Reject values the engine cannot work with
    pub fn validate(&self) -> Result<()> {
        if self.game.decay_cap_seconds < 0 {
            bail!("game.decay_cap_seconds must not be negative");
        }
        if !(0.0..=1.0).contains(&self.bonus_events.chance) {
            bail!("bonus_events.chance must be between 0.0 and 1.0");
        }
        if self.daily_tasks.count == 0 {
            bail!("daily_tasks.count must be at least 1");
        }
        if self.scheduler.daily_report_hour_utc > 23 {
            bail!("scheduler.daily_report_hour_utc must be 0-23");
        }
        if self.scheduler.decay_interval_secs == 0 || self.scheduler.nudge_interval_secs == 0 {
            bail!("scheduler intervals must be positive");
        }
        Ok(())
    }

    /// Database path, falling back to ~/.petkeeper/pets.db
    pub fn database_path(&self) -> PathBuf {
        self.storage
            .database_path
            .clone()
            .unwrap_or_else(|| Self::global_config_dir().join("pets.db"))
    }
}
