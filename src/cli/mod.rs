//! CLI command implementations

pub mod claim;
pub mod init;
pub mod pet;
pub mod scheduler;
pub mod views;

use std::path::Path;

use anyhow::{Context, Result};
use serde::Serialize;
use serde_json::json;

use petkeeper::config::Config;
use petkeeper::error::GameError;
use petkeeper::service::{GameService, SystemClock};
use petkeeper::store::SqliteStore;

/// The service as the binary runs it
pub type Service = GameService<SqliteStore, SystemClock>;

/// Open the database named by `--db`, the config, or the default location
pub fn open_service(config: &Config, db: Option<&Path>) -> Result<Service> {
    let db_path = db
        .map(Path::to_path_buf)
        .unwrap_or_else(|| config.database_path());
    let store = SqliteStore::open(&db_path)?;
    tracing::debug!("Using database {}", db_path.display());
    Ok(GameService::new(store, SystemClock, config))
}

pub fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let out = serde_json::to_string_pretty(value).context("Failed to serialize output")?;
    println!("{}", out);
    Ok(())
}

/// JSON body for a request the player got wrong (unknown item, nothing to
/// claim yet). Backend failures return `None` and surface through anyhow.
pub fn user_error_json(err: &anyhow::Error) -> Option<serde_json::Value> {
    let game = err.downcast_ref::<GameError>()?;
    if !game.is_user_facing() {
        return None;
    }
    Some(json!({ "error": game.to_string() }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_errors_become_json() {
        let err = anyhow::Error::from(GameError::NotEligible("chest not ready".to_string()));
        let body = user_error_json(&err).unwrap();
        assert_eq!(body["error"], "not eligible: chest not ready");

        let err = anyhow::Error::from(GameError::not_found("item", "food_unicorn"))
            .context("Failed to buy");
        assert!(user_error_json(&err).is_some());
    }

    #[test]
    fn test_backend_errors_stay_errors() {
        let storage = anyhow::Error::from(GameError::Storage(rusqlite::Error::QueryReturnedNoRows));
        assert!(user_error_json(&storage).is_none());
        assert!(user_error_json(&anyhow::anyhow!("disk full")).is_none());
    }
}
