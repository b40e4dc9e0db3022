//! Gamification - daily tasks, streaks, live events, achievements, quests
//!
//! Everything here is pure state over per-player records. The service layer
//! loads the records, feeds metrics in and persists the result.

pub mod achievements;
pub mod daily;
pub mod events;
pub mod metrics;
pub mod quests;
pub mod streaks;

pub use achievements::{
    find_achievement, AchievementDef, AchievementProgress, AchievementTrigger, ACHIEVEMENTS,
};
pub use daily::{DailyProgress, DailyTask, TaskPolicy, DAILY_CHEST, LOGIN_BONUS};
pub use events::{default_event, select_active, EventProgress, LiveEvent};
pub use metrics::{Metric, MetricKind, MetricPattern};
pub use quests::{find_quest, QuestDef, QuestProgress, StepClaim, StepCompleted, QUESTS};
pub use streaks::{StreakState, StreakUpdate};
