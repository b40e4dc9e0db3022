//! Shared test utilities for service integration tests

#![allow(dead_code)]

use chrono::{DateTime, TimeZone, Utc};
use tempfile::TempDir;

use petkeeper::config::Config;
use petkeeper::gamification::TaskPolicy;
use petkeeper::service::{Clock, GameService, ManualClock};
use petkeeper::store::{LoadContext, PetStore, SqliteStore};
use petkeeper::time_bucket::day_key;

pub type TestService = GameService<SqliteStore, ManualClock>;

/// A service over a file database in a temp dir. Keep the struct alive for
/// as long as the database is needed.
pub struct TestGame {
    pub dir: TempDir,
    pub service: TestService,
}

impl TestGame {
    pub fn clock(&self) -> &ManualClock {
        self.service.clock()
    }

    /// Put items straight into a player's inventory, bypassing the shop
    pub fn give_item(&self, user_id: i64, key: &str, qty: u32) {
        let config = test_config();
        let now = self.clock().now();
        let ctx = LoadContext {
            now,
            day: day_key(now),
            starting_coins: config.game.starting_coins,
            task_policy: config.daily_tasks.policy,
            task_count: config.daily_tasks.count,
        };
        self.service
            .store()
            .transact(user_id, &ctx, |snap| {
                snap.inventory.add(key, qty);
                Ok(())
            })
            .expect("Failed to add item");
    }
}

/// A fixed instant inside the seeded live event window
pub fn start_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 4, 2, 10, 0, 0).unwrap()
}

/// Config with the fixed task list and no random bonus events
pub fn test_config() -> Config {
    let mut config = Config::default();
    config.daily_tasks.policy = TaskPolicy::Fixed;
    config.bonus_events.chance = 0.0;
    config
}

pub fn create_game_with(config: Config) -> TestGame {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let store = SqliteStore::open(&dir.path().join("pets.db")).expect("Failed to open store");
    let clock = ManualClock::new(start_time());
    TestGame {
        dir,
        service: GameService::new(store, clock, &config),
    }
}

pub fn create_game() -> TestGame {
    create_game_with(test_config())
}
