//! Achievement definitions and per-player progress

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::metrics::{Metric, MetricKind, MetricPattern};
use crate::catalog::MinigameCategory;
use crate::engine::{Action, Grant};
use crate::error::{GameError, GameResult};

/// What moves an achievement forward
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AchievementTrigger {
    /// Counts matching metrics
    Metric(MetricPattern),
    /// Counts coins earned from rewards (spending does not subtract)
    CoinsEarned,
    /// Tracks the best login streak
    BestStreak,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AchievementDef {
    pub key: &'static str,
    pub title: &'static str,
    pub description: &'static str,
    pub target: u64,
    pub reward: Grant,
    pub trigger: AchievementTrigger,
}

pub static ACHIEVEMENTS: &[AchievementDef] = &[
    AchievementDef {
        key: "feed_count_25",
        title: "Caring Chef",
        description: "Feed your pet 25 times",
        target: 25,
        reward: Grant::new(50, 120),
        trigger: AchievementTrigger::Metric(MetricPattern::Exact(Metric::Action(Action::Feed))),
    },
    AchievementDef {
        key: "play_count_25",
        title: "Best Playmate",
        description: "Play with your pet 25 times",
        target: 25,
        reward: Grant::new(60, 140),
        trigger: AchievementTrigger::Metric(MetricPattern::Exact(Metric::Action(Action::Play))),
    },
    AchievementDef {
        key: "minigame_count_20",
        title: "Game Fan",
        description: "Play 20 minigames",
        target: 20,
        reward: Grant::new(80, 180),
        trigger: AchievementTrigger::Metric(MetricPattern::AnyOf(MetricKind::Minigame)),
    },
    AchievementDef {
        key: "math_minigame_count_20",
        title: "Little Mathematician",
        description: "Play 20 math minigames",
        target: 20,
        reward: Grant::new(80, 180),
        trigger: AchievementTrigger::Metric(MetricPattern::Exact(Metric::Minigame(
            MinigameCategory::Math,
        ))),
    },
    AchievementDef {
        key: "letters_game_count_20",
        title: "Letter Explorer",
        description: "Play 20 letters games",
        target: 20,
        reward: Grant::new(80, 180),
        trigger: AchievementTrigger::Metric(MetricPattern::Exact(Metric::Minigame(
            MinigameCategory::Letters,
        ))),
    },
    AchievementDef {
        key: "coins_earned_1000",
        title: "Treasure Keeper",
        description: "Earn 1000 coins",
        target: 1000,
        reward: Grant::new(90, 250),
        trigger: AchievementTrigger::CoinsEarned,
    },
    AchievementDef {
        key: "streak_best_7",
        title: "Week of Care",
        description: "Reach a 7 day login streak",
        target: 7,
        reward: Grant::new(100, 220),
        trigger: AchievementTrigger::BestStreak,
    },
    AchievementDef {
        key: "streak_best_30",
        title: "Devoted Friend",
        description: "Reach a 30 day login streak",
        target: 30,
        reward: Grant::new(250, 700),
        trigger: AchievementTrigger::BestStreak,
    },
];

pub fn find_achievement(key: &str) -> Option<&'static AchievementDef> {
    ACHIEVEMENTS.iter().find(|a| a.key == key)
}

/// A player's progress on one achievement
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AchievementProgress {
    pub key: String,
    pub progress: u64,
    pub completed_at: Option<DateTime<Utc>>,
    pub claimed_at: Option<DateTime<Utc>>,
}

impl AchievementProgress {
    pub fn new(key: &str) -> Self {
        Self {
            key: key.to_string(),
            progress: 0,
            completed_at: None,
            claimed_at: None,
        }
    }

    fn mark_completed(&mut self, def: &AchievementDef, now: DateTime<Utc>) -> bool {
        if self.completed_at.is_none() && self.progress >= def.target {
            self.completed_at = Some(now);
            return true;
        }
        false
    }

    /// Add to the counter. Returns true when this call completed it.
    pub fn add(&mut self, def: &AchievementDef, delta: u64, now: DateTime<Utc>) -> bool {
        if delta == 0 {
            return false;
        }
        self.progress = self.progress.saturating_add(delta);
        self.mark_completed(def, now)
    }

    /// Raise the counter to `value` if that is higher; never lowers it.
    pub fn raise_to(&mut self, def: &AchievementDef, value: u64, now: DateTime<Utc>) -> bool {
        if value <= self.progress {
            return false;
        }
        self.progress = value;
        self.mark_completed(def, now)
    }

    pub fn claim(&mut self, def: &AchievementDef, now: DateTime<Utc>) -> GameResult<Grant> {
        if self.claimed_at.is_some() {
            return Err(GameError::AlreadyClaimed(format!("achievement {}", def.key)));
        }
        if self.completed_at.is_none() {
            return Err(GameError::NotEligible(format!(
                "achievement {} at {}/{}",
                def.key, self.progress, def.target
            )));
        }
        self.claimed_at = Some(now);
        Ok(def.reward)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_completion_set_once() {
        let def = find_achievement("feed_count_25").unwrap();
        let mut p = AchievementProgress::new(def.key);
        let now = Utc::now();
        assert!(!p.add(def, 24, now));
        assert!(p.add(def, 1, now));
        assert!(!p.add(def, 1, now));
        assert_eq!(p.progress, 26);
    }

    #[test]
    fn test_raise_to_is_monotonic() {
        let def = find_achievement("streak_best_7").unwrap();
        let mut p = AchievementProgress::new(def.key);
        let now = Utc::now();
        p.raise_to(def, 5, now);
        p.raise_to(def, 2, now);
        assert_eq!(p.progress, 5);
        assert!(p.raise_to(def, 7, now));
    }

    #[test]
    fn test_claim_rules() {
        let def = find_achievement("coins_earned_1000").unwrap();
        let mut p = AchievementProgress::new(def.key);
        let now = Utc::now();
        assert!(matches!(p.claim(def, now), Err(GameError::NotEligible(_))));
        p.add(def, 1000, now);
        assert_eq!(p.claim(def, now).unwrap(), Grant::new(90, 250));
        assert!(matches!(p.claim(def, now), Err(GameError::AlreadyClaimed(_))));
        assert_eq!(p.progress, 1000);
    }

    #[test]
    fn test_keys_unique() {
        for (i, a) in ACHIEVEMENTS.iter().enumerate() {
            assert!(ACHIEVEMENTS[i + 1..].iter().all(|b| b.key != a.key));
        }
    }
}
