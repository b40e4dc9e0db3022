//! Init command implementation

use anyhow::{bail, Result};
use std::path::PathBuf;

use petkeeper::config::Config;

/// Default configuration content for petkeeper init
pub const DEFAULT_CONFIG: &str = r#"# Petkeeper Configuration
# =======================
#
# Every key is optional. Missing keys fall back to the values shown here.

# ============================================================================
# GAME - Core rules
# ============================================================================
#
#   decay_cap_seconds - Most decay applied in one tick, however long the pet
#                       was left alone (default: 21600 = 6 hours)
#   starting_coins    - Coins a new pet starts with (default: 1000)

[game]
decay_cap_seconds = 21600
starting_coins = 1000

# ============================================================================
# DAILY TASKS
# ============================================================================
#
#   policy - "seeded": the same random sample for everyone on a given UTC day
#            "fixed":  always feed / minigame / play
#   count  - Tasks per day under the seeded policy (default: 3)

[daily_tasks]
policy = "seeded"
count = 3

# ============================================================================
# BONUS EVENTS - Random surprises after feed, wash, play, heal and chat
# ============================================================================
#
#   chance - Probability per action, 0.0 to 1.0 (default: 0.15)
#   seed   - Optional fixed RNG seed for reproducible runs

[bonus_events]
chance = 0.15
# seed = 42

# ============================================================================
# SCHEDULER - Background sweeps run by `petkeeper scheduler`
# ============================================================================

[scheduler]
decay_interval_secs = 600
nudge_interval_secs = 1200
# UTC hour for the daily report
daily_report_hour_utc = 7

# ============================================================================
# STORAGE
# ============================================================================

[storage]
# Defaults to ~/.petkeeper/pets.db
# database_path = "/var/lib/petkeeper/pets.db"
"#;

/// Write the default config file
pub async fn init_command(config_path: Option<PathBuf>, force: bool) -> Result<()> {
    let config_path = config_path.unwrap_or_else(Config::global_config_path);

    if config_path.exists() && !force {
        bail!(
            "Configuration already exists: {}\nUse --force to overwrite.",
            config_path.display()
        );
    }

    Config::write_file(&config_path, DEFAULT_CONFIG)?;
    println!("Created: {}", config_path.display());

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_matches_builtin_defaults() {
        let parsed: Config = toml::from_str(DEFAULT_CONFIG).unwrap();
        assert_eq!(parsed, Config::default());
    }
}
