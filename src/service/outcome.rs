//! What the service hands back to callers

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::catalog::ItemCategory;
use crate::domain::{PetState, StatChange, Stage};
use crate::engine::{is_lonely, xp_to_next, Grant, Reward};
use crate::gamification::DailyProgress;

/// Something the client may want to surface to the player.
///
/// The core only decides that a notification should fire; delivery is up to
/// the caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Notification {
    LevelUp { level: u32 },
    StageChanged { from: Stage, to: Stage },
    ItemUnlocked { item_key: String },
    TaskCompleted { task_key: String },
    AllTasksCompleted,
    LoginBonus,
    ChestOpened,
    StreakMilestone { days: u32 },
    EventCompleted { event_key: String },
    AchievementCompleted { key: String },
    QuestStepCompleted { quest_key: String, step_index: usize, step_title: String },
    QuestCompleted { quest_key: String },
    BonusEvent { message: String },
    EnergyRestored { amount: i64 },
    ItemUsed { item_key: String, title: String },
    Hungry,
    Lonely,
}

/// Pet plus the derived values clients always need next to it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PetView {
    #[serde(flatten)]
    pub pet: PetState,
    pub xp_to_next: u64,
    pub lonely: bool,
}

impl PetView {
    pub fn new(pet: &PetState, now: DateTime<Utc>) -> Self {
        Self {
            pet: pet.clone(),
            xp_to_next: xp_to_next(pet.level),
            lonely: is_lonely(pet, now),
        }
    }
}

/// Result of an action, item use, minigame or claim
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Outcome {
    pub pet: PetView,
    /// Stat changes from the action itself (decay is not included)
    pub changes: Vec<StatChange>,
    pub reward: Option<Reward>,
    pub daily: DailyProgress,
    pub notifications: Vec<Notification>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PurchaseOutcome {
    pub pet: PetView,
    pub item_key: String,
    pub price: u64,
    /// Quantity owned after the purchase
    pub quantity: u32,
    pub daily: DailyProgress,
    pub notifications: Vec<Notification>,
}

/// A catalog entry priced for one player
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShopOffer {
    pub key: String,
    pub title: String,
    pub section: String,
    pub category: ItemCategory,
    pub price: u64,
    pub level_required: u32,
    pub unlocked: bool,
    pub affordable: bool,
    pub owned: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InventoryLine {
    pub key: String,
    pub title: String,
    pub category: ItemCategory,
    pub quantity: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AchievementView {
    pub key: String,
    pub title: String,
    pub description: String,
    pub target: u64,
    pub progress: u64,
    pub completed: bool,
    pub claimed: bool,
    pub reward: Grant,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestView {
    pub key: String,
    pub title: String,
    pub description: String,
    pub step_index: usize,
    pub step_count: usize,
    /// None once the quest is finished
    pub step_title: Option<String>,
    pub step_target: Option<u32>,
    pub step_progress: u32,
    pub step_completed: bool,
    pub step_reward: Option<Grant>,
    pub finished: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventView {
    pub key: String,
    pub title: String,
    pub description: String,
    pub starts_at: DateTime<Utc>,
    pub ends_at: DateTime<Utc>,
    pub target_points: u32,
    pub points: u32,
    pub completed: bool,
    pub claimed: bool,
    pub reward: Grant,
}
