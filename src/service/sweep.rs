//! Scheduled sweeps over every pet
//!
//! Each pet gets its own transaction, so one bad row never blocks the rest.
//! Failures are logged and counted, not propagated.

use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{info, warn};

use super::clock::Clock;
use super::GameService;
use crate::domain::{Behavior, Vitals};
use crate::engine::{apply_decay, is_lonely, refresh_behavior};
use crate::error::GameResult;
use crate::store::PetStore;

/// Totals from a decay sweep
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SweepReport {
    pub pets_seen: usize,
    /// Pets that actually had decay applied
    pub pets_decayed: usize,
    pub failures: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NudgeReason {
    Hungry,
    Tired,
    Dirty,
    Sick,
}

impl NudgeReason {
    /// Reasons in a fixed order, empty when the pet is fine
    pub fn for_vitals(v: &Vitals) -> Vec<NudgeReason> {
        let mut reasons = Vec::new();
        if v.hunger < 30 {
            reasons.push(Self::Hungry);
        }
        if v.energy < 20 {
            reasons.push(Self::Tired);
        }
        if v.hygiene < 30 {
            reasons.push(Self::Dirty);
        }
        if v.health < 40 {
            reasons.push(Self::Sick);
        }
        reasons
    }
}

/// A gentle reminder that should go out to a player
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Nudge {
    pub user_id: i64,
    pub reasons: Vec<NudgeReason>,
}

/// Morning summary of one pet
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyReport {
    pub user_id: i64,
    pub name: String,
    pub level: u32,
    pub coins: u64,
    pub vitals: Vitals,
    pub behavior: Behavior,
    pub streak: u32,
    pub tasks_completed: usize,
    pub tasks_total: usize,
}

impl<S: PetStore, C: Clock> GameService<S, C> {
    /// Apply pending decay to every pet
    pub fn decay_all(&self) -> GameResult<SweepReport> {
        let now = self.clock.now();
        let cap = self.game.decay_cap_seconds;
        let mut report = SweepReport::default();

        for user_id in self.store.user_ids()? {
            report.pets_seen += 1;
            let result = self.with_player(user_id, now, |snap| {
                let lonely = is_lonely(&snap.pet, now);
                let applied = apply_decay(&mut snap.pet, now, cap, lonely);
                refresh_behavior(&mut snap.pet);
                Ok(applied > 0)
            });
            match result {
                Ok(true) => report.pets_decayed += 1,
                Ok(false) => {}
                Err(e) => {
                    warn!(user_id, "Decay sweep failed: {}", e);
                    report.failures += 1;
                }
            }
        }

        info!(
            seen = report.pets_seen,
            decayed = report.pets_decayed,
            failures = report.failures,
            "Decay sweep finished"
        );
        Ok(report)
    }

    /// Log a soft nudge for every opted-in pet that needs care
    pub fn soft_nudge_sweep(&self) -> GameResult<Vec<Nudge>> {
        let now = self.clock.now();
        let mut nudges = Vec::new();

        for user_id in self.store.user_ids()? {
            let result = self.with_player(user_id, now, |snap| {
                if !snap.prefs.soft_nudges {
                    return Ok(None);
                }
                let reasons = NudgeReason::for_vitals(&snap.pet.vitals);
                if reasons.is_empty() {
                    return Ok(None);
                }
                snap.record("soft_nudge", json!({ "reasons": reasons }), now);
                Ok(Some(Nudge { user_id, reasons }))
            });
            match result {
                Ok(Some(nudge)) => nudges.push(nudge),
                Ok(None) => {}
                Err(e) => warn!(user_id, "Nudge sweep failed: {}", e),
            }
        }

        info!(created = nudges.len(), "Soft nudge sweep finished");
        Ok(nudges)
    }

    /// Log a daily summary for every opted-in pet
    pub fn daily_report_sweep(&self) -> GameResult<Vec<DailyReport>> {
        let now = self.clock.now();
        let mut reports = Vec::new();

        for user_id in self.store.user_ids()? {
            let result = self.with_player(user_id, now, |snap| {
                if !snap.prefs.daily_report {
                    return Ok(None);
                }
                let required = snap.daily.tasks.iter().filter(|t| !t.extra);
                let report = DailyReport {
                    user_id,
                    name: snap.pet.name.clone(),
                    level: snap.pet.level,
                    coins: snap.pet.coins,
                    vitals: snap.pet.vitals,
                    behavior: snap.pet.behavior,
                    streak: snap.streak.current,
                    tasks_completed: required.clone().filter(|t| t.completed).count(),
                    tasks_total: required.count(),
                };
                snap.record("daily_report", serde_json::to_value(&report)?, now);
                Ok(Some(report))
            });
            match result {
                Ok(Some(report)) => reports.push(report),
                Ok(None) => {}
                Err(e) => warn!(user_id, "Daily report failed: {}", e),
            }
        }

        info!(created = reports.len(), "Daily report sweep finished");
        Ok(reports)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::STARTING_VITALS;

    #[test]
    fn test_nudge_reasons_follow_thresholds() {
        assert!(NudgeReason::for_vitals(&STARTING_VITALS).is_empty());

        let mut v = STARTING_VITALS;
        v.hunger = 29;
        v.health = 39;
        assert_eq!(
            NudgeReason::for_vitals(&v),
            vec![NudgeReason::Hungry, NudgeReason::Sick]
        );

        v.hunger = 30;
        v.energy = 19;
        v.hygiene = 0;
        v.health = 40;
        assert_eq!(
            NudgeReason::for_vitals(&v),
            vec![NudgeReason::Tired, NudgeReason::Dirty]
        );
    }
}
