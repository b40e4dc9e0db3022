//! Sequential multi-step quests
//!
//! Only the current step of a quest listens for metrics. Claiming a step
//! moves on to the next one; claiming the last step finishes the quest and
//! freezes it.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::metrics::{Metric, MetricKind, MetricPattern};
use crate::catalog::MinigameCategory;
use crate::engine::{Action, Grant};
use crate::error::{GameError, GameResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuestStep {
    pub title: &'static str,
    pub pattern: MetricPattern,
    pub target: u32,
    pub reward: Grant,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuestDef {
    pub key: &'static str,
    pub title: &'static str,
    pub description: &'static str,
    pub steps: &'static [QuestStep],
}

const fn step(title: &'static str, pattern: MetricPattern, target: u32, coins: u64, xp: u64) -> QuestStep {
    QuestStep {
        title,
        pattern,
        target,
        reward: Grant::new(xp, coins),
    }
}

const fn exact(metric: Metric) -> MetricPattern {
    MetricPattern::Exact(metric)
}

const ANY_MINIGAME: MetricPattern = MetricPattern::AnyOf(MetricKind::Minigame);
const MATH: MetricPattern = exact(Metric::Minigame(MinigameCategory::Math));
const LETTERS: MetricPattern = exact(Metric::Minigame(MinigameCategory::Letters));
const EVENT: MetricPattern = exact(Metric::EventPoints);

pub static QUESTS: &[QuestDef] = &[
    QuestDef {
        key: "first_steps",
        title: "First Steps",
        description: "Learn the basics of pet care",
        steps: &[
            step("Feed your pet twice", exact(Metric::Action(Action::Feed)), 2, 30, 12),
            step("Give your pet a bath", exact(Metric::Action(Action::Wash)), 1, 20, 10),
            step("Play with your pet", exact(Metric::Action(Action::Play)), 1, 35, 14),
        ],
    },
    QuestDef {
        key: "stockpile",
        title: "Stockpile",
        description: "Shop for supplies and put them to use",
        steps: &[
            step("Buy 2 items", exact(Metric::ShopBuy), 2, 25, 10),
            step("Use 2 items", MetricPattern::AnyOf(MetricKind::UseItem), 2, 30, 12),
            step("Heal your pet", exact(Metric::Action(Action::Heal)), 1, 40, 16),
        ],
    },
    QuestDef {
        key: "minigames",
        title: "Game Time",
        description: "Play minigames with your pet",
        steps: &[
            step("Play a minigame", ANY_MINIGAME, 1, 25, 10),
            step("Play 3 minigames", ANY_MINIGAME, 3, 45, 18),
            step("Play 5 minigames", ANY_MINIGAME, 5, 70, 25),
        ],
    },
    QuestDef {
        key: "festival",
        title: "Festival Spirit",
        description: "Collect live event points",
        steps: &[
            step("Collect 5 event points", EVENT, 5, 35, 14),
            step("Collect 15 event points", EVENT, 15, 75, 28),
            step("Collect 30 event points", EVENT, 30, 120, 45),
        ],
    },
    QuestDef {
        key: "math_training",
        title: "Math Training",
        description: "Practice counting and sums",
        steps: &[
            step("Play a math game", MATH, 1, 25, 10),
            step("Play 3 math games", MATH, 3, 45, 18),
            step("Play 5 math games", MATH, 5, 70, 25),
        ],
    },
    QuestDef {
        key: "letters_training",
        title: "Letters Training",
        description: "Practice letters and sounds",
        steps: &[
            step("Play a letters game", LETTERS, 1, 25, 10),
            step("Play 3 letters games", LETTERS, 3, 45, 18),
            step("Play 5 letters games", LETTERS, 5, 70, 25),
        ],
    },
    QuestDef {
        key: "caretaker",
        title: "Caretaker",
        description: "Any kind of care counts",
        steps: &[
            step("Do 5 care actions", MetricPattern::AnyOf(MetricKind::Action), 5, 30, 12),
            step("Do 15 care actions", MetricPattern::AnyOf(MetricKind::Action), 15, 60, 24),
            step("Do 30 care actions", MetricPattern::AnyOf(MetricKind::Action), 30, 100, 40),
        ],
    },
];

pub fn find_quest(key: &str) -> Option<&'static QuestDef> {
    QUESTS.iter().find(|q| q.key == key)
}

/// A player's position in one quest
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestProgress {
    pub key: String,
    pub current_step_index: usize,
    pub step_progress: u32,
    pub step_completed_at: Option<DateTime<Utc>>,
    pub step_claimed_at: Option<DateTime<Utc>>,
    pub quest_completed_at: Option<DateTime<Utc>>,
}

/// Emitted when a metric finishes the current step
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepCompleted {
    pub quest_key: String,
    pub step_index: usize,
    pub step_title: String,
}

/// Result of a successful step claim
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepClaim {
    pub quest_key: String,
    pub step_index: usize,
    pub reward: Grant,
    pub quest_completed: bool,
}

impl QuestProgress {
    pub fn new(key: &str) -> Self {
        Self {
            key: key.to_string(),
            current_step_index: 0,
            step_progress: 0,
            step_completed_at: None,
            step_claimed_at: None,
            quest_completed_at: None,
        }
    }

    pub fn is_finished(&self) -> bool {
        self.quest_completed_at.is_some()
    }

    pub fn current_step<'a>(&self, def: &'a QuestDef) -> Option<&'a QuestStep> {
        if self.is_finished() {
            return None;
        }
        def.steps.get(self.current_step_index)
    }

    /// Feed a metric into the current step.
    pub fn apply(
        &mut self,
        def: &QuestDef,
        metric: &Metric,
        delta: u32,
        now: DateTime<Utc>,
    ) -> Option<StepCompleted> {
        if delta == 0 || self.step_completed_at.is_some() || self.step_claimed_at.is_some() {
            return None;
        }
        let step = self.current_step(def)?;
        if !step.pattern.matches(metric) {
            return None;
        }
        let target = step.target;
        let title = step.title;

        self.step_progress = self.step_progress.saturating_add(delta).min(target);
        if self.step_progress >= target {
            self.step_completed_at = Some(now);
            return Some(StepCompleted {
                quest_key: def.key.to_string(),
                step_index: self.current_step_index,
                step_title: title.to_string(),
            });
        }
        None
    }

    pub fn claim_current_step(&mut self, def: &QuestDef, now: DateTime<Utc>) -> GameResult<StepClaim> {
        if self.is_finished() || self.step_claimed_at.is_some() {
            return Err(GameError::AlreadyClaimed(format!("quest {}", def.key)));
        }
        let Some(step) = def.steps.get(self.current_step_index) else {
            return Err(GameError::AlreadyClaimed(format!("quest {}", def.key)));
        };
        if self.step_completed_at.is_none() {
            return Err(GameError::NotEligible(format!(
                "quest {} step {} at {}/{}",
                def.key,
                self.current_step_index + 1,
                self.step_progress,
                step.target
            )));
        }

        let claimed_index = self.current_step_index;
        let reward = step.reward;
        let is_last = claimed_index + 1 >= def.steps.len();

        if is_last {
            self.step_claimed_at = Some(now);
            self.quest_completed_at = Some(now);
            self.current_step_index = def.steps.len();
            self.step_progress = step.target;
        } else {
            self.current_step_index += 1;
            self.step_progress = 0;
            self.step_completed_at = None;
            self.step_claimed_at = None;
        }

        Ok(StepClaim {
            quest_key: def.key.to_string(),
            step_index: claimed_index,
            reward,
            quest_completed: is_last,
        })
    }
}

/// Feed a metric into every quest, creating rows on first touch.
pub fn apply_metric(
    rows: &mut Vec<QuestProgress>,
    metric: &Metric,
    delta: u32,
    now: DateTime<Utc>,
) -> Vec<StepCompleted> {
    let mut completed = Vec::new();
    for def in QUESTS {
        let listens = def
            .steps
            .iter()
            .any(|s| s.pattern.matches(metric));
        if !listens {
            continue;
        }
        let row = match rows.iter().position(|r| r.key == def.key) {
            Some(i) => &mut rows[i],
            None => {
                rows.push(QuestProgress::new(def.key));
                let last = rows.len() - 1;
                &mut rows[last]
            }
        };
        if let Some(done) = row.apply(def, metric, delta, now) {
            completed.push(done);
        }
    }
    completed
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::ItemCategory;

    const FEED: Metric = Metric::Action(Action::Feed);

    #[test]
    fn test_only_current_step_listens() {
        let def = find_quest("first_steps").unwrap();
        let mut q = QuestProgress::new(def.key);
        let now = Utc::now();
        assert!(q.apply(def, &Metric::Action(Action::Wash), 1, now).is_none());
        assert_eq!(q.step_progress, 0);
        assert!(q.apply(def, &FEED, 1, now).is_none());
        let done = q.apply(def, &FEED, 5, now).unwrap();
        assert_eq!(done.step_index, 0);
        assert_eq!(q.step_progress, 2);
        // completed step stops accumulating
        assert!(q.apply(def, &FEED, 1, now).is_none());
        assert_eq!(q.step_progress, 2);
    }

    #[test]
    fn test_claim_rules_and_final_freeze() {
        let def = find_quest("first_steps").unwrap();
        let mut q = QuestProgress::new(def.key);
        let now = Utc::now();

        assert!(matches!(q.claim_current_step(def, now), Err(GameError::NotEligible(_))));

        q.apply(def, &FEED, 2, now);
        let first = q.claim_current_step(def, now).unwrap();
        assert_eq!(first.reward, Grant::new(12, 30));
        assert!(!first.quest_completed);
        assert_eq!(q.current_step_index, 1);
        assert_eq!(q.step_progress, 0);
        assert!(matches!(q.claim_current_step(def, now), Err(GameError::NotEligible(_))));

        q.apply(def, &Metric::Action(Action::Wash), 1, now);
        q.claim_current_step(def, now).unwrap();
        q.apply(def, &Metric::Action(Action::Play), 1, now);
        let last = q.claim_current_step(def, now).unwrap();
        assert!(last.quest_completed);
        assert!(q.is_finished());
        assert_eq!(q.step_progress, 1);

        assert!(matches!(q.claim_current_step(def, now), Err(GameError::AlreadyClaimed(_))));
        assert!(q.apply(def, &Metric::Action(Action::Play), 1, now).is_none());
        assert_eq!(q.current_step_index, 3);
    }

    #[test]
    fn test_wildcard_step_matches_any_family_member() {
        let def = find_quest("stockpile").unwrap();
        let mut q = QuestProgress::new(def.key);
        let now = Utc::now();
        q.apply(def, &Metric::ShopBuy, 2, now);
        q.claim_current_step(def, now).unwrap();
        q.apply(def, &Metric::UseItem(ItemCategory::Food), 1, now);
        let done = q.apply(def, &Metric::UseItem(ItemCategory::Toy), 1, now);
        assert!(done.is_some());
    }

    #[test]
    fn test_apply_metric_touches_all_listening_quests() {
        let mut rows = Vec::new();
        let now = Utc::now();
        let done = apply_metric(&mut rows, &Metric::Minigame(MinigameCategory::Math), 1, now);
        let keys: Vec<_> = done.iter().map(|d| d.quest_key.as_str()).collect();
        assert_eq!(keys, vec!["minigames", "math_training"]);
        assert_eq!(rows.len(), 2);
    }
}
