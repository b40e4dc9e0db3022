//! SQLite schema and migrations

use rusqlite::{params, Connection};

use crate::gamification::default_event;
use crate::time_bucket::to_millis;

pub(super) const SCHEMA_SQL: &str = r#"
CREATE TABLE IF NOT EXISTS schema_version (
    version INTEGER PRIMARY KEY
);

-- One pet per user
CREATE TABLE IF NOT EXISTS pets (
    user_id INTEGER PRIMARY KEY,
    name TEXT NOT NULL,
    hunger INTEGER NOT NULL,
    hygiene INTEGER NOT NULL,
    happiness INTEGER NOT NULL,
    health INTEGER NOT NULL,
    energy INTEGER NOT NULL,
    trait_courage INTEGER NOT NULL DEFAULT 50,
    trait_friendliness INTEGER NOT NULL DEFAULT 50,
    trait_energy INTEGER NOT NULL DEFAULT 50,
    trait_curiosity INTEGER NOT NULL DEFAULT 50,
    trait_tidiness INTEGER NOT NULL DEFAULT 50,
    level INTEGER NOT NULL DEFAULT 1,
    xp INTEGER NOT NULL DEFAULT 0,
    stage TEXT NOT NULL DEFAULT 'baby',
    coins INTEGER NOT NULL DEFAULT 0,
    intelligence INTEGER NOT NULL DEFAULT 0,
    crystals INTEGER NOT NULL DEFAULT 0,
    behavior TEXT NOT NULL DEFAULT 'calm',
    last_active_at INTEGER NOT NULL,     -- Unix ms
    last_tick_at INTEGER NOT NULL,       -- Unix ms, never decreases
    created_at INTEGER NOT NULL
);

CREATE TABLE IF NOT EXISTS inventory (
    user_id INTEGER NOT NULL,
    item_key TEXT NOT NULL,
    quantity INTEGER NOT NULL,
    PRIMARY KEY (user_id, item_key)
);

CREATE TABLE IF NOT EXISTS daily_progress (
    user_id INTEGER NOT NULL,
    day TEXT NOT NULL,                   -- YYYY-MM-DD (UTC)
    tasks TEXT NOT NULL,                 -- versioned JSON document
    login_bonus_claimed INTEGER NOT NULL DEFAULT 0,
    chest_claimed INTEGER NOT NULL DEFAULT 0,
    PRIMARY KEY (user_id, day)
);

CREATE TABLE IF NOT EXISTS streaks (
    user_id INTEGER PRIMARY KEY,
    current_streak INTEGER NOT NULL DEFAULT 0,
    best_streak INTEGER NOT NULL DEFAULT 0,
    last_claim_date TEXT
);

CREATE TABLE IF NOT EXISTS live_events (
    key TEXT PRIMARY KEY,
    title TEXT NOT NULL,
    description TEXT NOT NULL DEFAULT '',
    starts_at INTEGER NOT NULL,
    ends_at INTEGER NOT NULL,
    target_points INTEGER NOT NULL,
    reward_coins INTEGER NOT NULL DEFAULT 0,
    reward_xp INTEGER NOT NULL DEFAULT 0,
    enabled INTEGER NOT NULL DEFAULT 1
);

CREATE TABLE IF NOT EXISTS event_progress (
    user_id INTEGER NOT NULL,
    event_key TEXT NOT NULL,
    points INTEGER NOT NULL DEFAULT 0,
    completed_at INTEGER,
    claimed_at INTEGER,
    PRIMARY KEY (user_id, event_key)
);

CREATE TABLE IF NOT EXISTS achievement_progress (
    user_id INTEGER NOT NULL,
    key TEXT NOT NULL,
    progress INTEGER NOT NULL DEFAULT 0,
    completed_at INTEGER,
    claimed_at INTEGER,
    PRIMARY KEY (user_id, key)
);

CREATE TABLE IF NOT EXISTS quest_progress (
    user_id INTEGER NOT NULL,
    quest_key TEXT NOT NULL,
    current_step_index INTEGER NOT NULL DEFAULT 0,
    step_progress INTEGER NOT NULL DEFAULT 0,
    step_completed_at INTEGER,
    step_claimed_at INTEGER,
    quest_completed_at INTEGER,
    PRIMARY KEY (user_id, quest_key)
);
"#;

/// Run any pending migrations
pub(super) fn run_migrations(conn: &Connection) -> rusqlite::Result<()> {
    let version: i32 = conn
        .query_row("SELECT COALESCE(MAX(version), 0) FROM schema_version", [], |r| r.get(0))
        .unwrap_or(0);

    // Migration 2: notification preferences and activity log
    if version < 2 {
        conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS notification_prefs (
                user_id INTEGER PRIMARY KEY,
                soft_nudges INTEGER NOT NULL DEFAULT 1,
                daily_report INTEGER NOT NULL DEFAULT 1
            );

            CREATE TABLE IF NOT EXISTS event_log (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                user_id INTEGER NOT NULL,
                action TEXT NOT NULL,
                payload TEXT NOT NULL,           -- JSON
                created_at INTEGER NOT NULL
            );
            CREATE INDEX IF NOT EXISTS idx_event_log_user ON event_log(user_id, created_at);
            "#,
        )?;
        conn.execute("INSERT OR REPLACE INTO schema_version VALUES (2)", [])?;
    }

    // Migration 3: seed the default live event
    if version < 3 {
        let event = default_event();
        conn.execute(
            "INSERT OR IGNORE INTO live_events
                (key, title, description, starts_at, ends_at, target_points, reward_coins, reward_xp, enabled)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, 1)",
            params![
                event.key,
                event.title,
                event.description,
                to_millis(event.starts_at),
                to_millis(event.ends_at),
                event.target_points,
                event.reward.coins as i64,
                event.reward.xp as i64,
            ],
        )?;
        conn.execute("INSERT OR REPLACE INTO schema_version VALUES (3)", [])?;
    }

    Ok(())
}
