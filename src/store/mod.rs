//! Persistence for per-player game state
//!
//! The service never touches rows directly. It asks the store for a
//! [`PlayerSnapshot`] inside a transaction, mutates it in memory and the store
//! writes it back on success.

mod schema;
mod sqlite;

pub use sqlite::SqliteStore;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::{Inventory, NotificationPrefs, PetState};
use crate::error::GameResult;
use crate::gamification::{
    AchievementProgress, DailyProgress, EventProgress, LiveEvent, QuestProgress, StreakState,
    TaskPolicy,
};

/// What a store needs to materialize a snapshot for a request
#[derive(Debug, Clone)]
pub struct LoadContext {
    pub now: DateTime<Utc>,
    /// UTC day key of `now`
    pub day: String,
    pub starting_coins: u64,
    pub task_policy: TaskPolicy,
    pub task_count: usize,
}

/// One entry of a player's activity history
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogEntry {
    pub action: String,
    pub payload: serde_json::Value,
    pub created_at: DateTime<Utc>,
}

/// Everything that belongs to one player
#[derive(Debug, Clone)]
pub struct PlayerSnapshot {
    pub pet: PetState,
    pub inventory: Inventory,
    /// Progress for the request's day, created on first touch
    pub daily: DailyProgress,
    pub streak: StreakState,
    pub event_progress: Vec<EventProgress>,
    pub achievements: Vec<AchievementProgress>,
    pub quests: Vec<QuestProgress>,
    pub prefs: NotificationPrefs,
    /// True when the pet was created by this load
    pub created: bool,
    /// Entries appended during this transaction
    pub pending_log: Vec<LogEntry>,
}

impl PlayerSnapshot {
    /// A brand-new player with starting stats and inventory
    pub fn fresh(user_id: i64, ctx: &LoadContext) -> Self {
        Self {
            pet: PetState::new(user_id, ctx.now, ctx.starting_coins),
            inventory: Inventory::starting(),
            daily: DailyProgress::new(&ctx.day, ctx.task_policy, ctx.task_count),
            streak: StreakState::default(),
            event_progress: Vec::new(),
            achievements: Vec::new(),
            quests: Vec::new(),
            prefs: NotificationPrefs::default(),
            created: true,
            pending_log: Vec::new(),
        }
    }

    pub fn event_progress_mut(&mut self, event_key: &str) -> &mut EventProgress {
        let i = match self.event_progress.iter().position(|p| p.event_key == event_key) {
            Some(i) => i,
            None => {
                self.event_progress.push(EventProgress::new(event_key));
                self.event_progress.len() - 1
            }
        };
        &mut self.event_progress[i]
    }

    pub fn event_progress(&self, event_key: &str) -> Option<&EventProgress> {
        self.event_progress.iter().find(|p| p.event_key == event_key)
    }

    pub fn achievement_mut(&mut self, key: &str) -> &mut AchievementProgress {
        let i = match self.achievements.iter().position(|a| a.key == key) {
            Some(i) => i,
            None => {
                self.achievements.push(AchievementProgress::new(key));
                self.achievements.len() - 1
            }
        };
        &mut self.achievements[i]
    }

    pub fn quest_mut(&mut self, key: &str) -> &mut QuestProgress {
        let i = match self.quests.iter().position(|q| q.key == key) {
            Some(i) => i,
            None => {
                self.quests.push(QuestProgress::new(key));
                self.quests.len() - 1
            }
        };
        &mut self.quests[i]
    }

    pub fn record(&mut self, action: &str, payload: serde_json::Value, now: DateTime<Utc>) {
        self.pending_log.push(LogEntry {
            action: action.to_string(),
            payload,
            created_at: now,
        });
    }
}

/// Transactional storage for player snapshots
pub trait PetStore: Send + Sync {
    /// Run `f` on the player's snapshot inside one transaction.
    ///
    /// The player is created on first access. The snapshot is written back
    /// only when `f` returns `Ok`; on `Err` nothing is persisted.
    fn transact<T, F>(&self, user_id: i64, ctx: &LoadContext, f: F) -> GameResult<T>
    where
        F: FnOnce(&mut PlayerSnapshot) -> GameResult<T>;

    /// Ids of every player that has a pet
    fn user_ids(&self) -> GameResult<Vec<i64>>;

    fn live_events(&self) -> GameResult<Vec<LiveEvent>>;

    fn upsert_live_event(&self, event: &LiveEvent) -> GameResult<()>;

    /// Most recent activity first
    fn history(&self, user_id: i64, limit: usize) -> GameResult<Vec<LogEntry>>;
}
