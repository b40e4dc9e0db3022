//! Random bonus events after care actions
//!
//! The roll uses an owned `StdRng` so tests can seed it or pin the chance to
//! 0.0 / 1.0.

use std::sync::Mutex;

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::domain::{PersonalityTrait, PetState, StatChange, Vital};
use crate::engine::{Action, Grant};

/// What a bonus event does
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum BonusEffect {
    Coins(u64),
    Xp(u64),
    Intelligence(u64),
    Vital(Vital, i32),
    Trait(PersonalityTrait, i32),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BonusEvent {
    pub message: &'static str,
    pub effect: BonusEffect,
}

const fn event(message: &'static str, effect: BonusEffect) -> BonusEvent {
    BonusEvent { message, effect }
}

static WASH_EVENTS: &[BonusEvent] = &[
    event("Found a shiny coin in the foam! +10 coins", BonusEffect::Coins(10)),
    event("Bubble party! +10 happiness", BonusEffect::Vital(Vital::Happiness, 10)),
    event("So shiny it sparkles! +20 hygiene", BonusEffect::Vital(Vital::Hygiene, 20)),
];

static PLAY_EVENTS: &[BonusEvent] = &[
    event("Found a forgotten toy! +15 happiness", BonusEffect::Vital(Vital::Happiness, 15)),
    event("Defeated an imaginary monster! +10 XP", BonusEffect::Xp(10)),
    event("The ball landed in the mud. -10 hygiene", BonusEffect::Vital(Vital::Hygiene, -10)),
];

static FEED_EVENTS: &[BonusEvent] = &[
    event("That was incredibly tasty! +15 happiness", BonusEffect::Vital(Vital::Happiness, 15)),
    event("A golden crumb in the bowl! +15 coins", BonusEffect::Coins(15)),
    event("A bit too much food. -10 energy", BonusEffect::Vital(Vital::Energy, -10)),
];

static HEAL_EVENTS: &[BonusEvent] = &[
    event("The medicine tasted sweet! +10 happiness", BonusEffect::Vital(Vital::Happiness, 10)),
    event("Took the shot bravely! +5 courage", BonusEffect::Trait(PersonalityTrait::Courage, 5)),
];

static CHAT_EVENTS: &[BonusEvent] = &[
    event("Told you an interesting story. +5 intelligence", BonusEffect::Intelligence(5)),
    event("Talked you out of some pocket money! +5 coins", BonusEffect::Coins(5)),
];

/// Candidate events for an action. Sleep and clean have none.
pub fn events_for(action: Action) -> &'static [BonusEvent] {
    match action {
        Action::Wash => WASH_EVENTS,
        Action::Play => PLAY_EVENTS,
        Action::Feed => FEED_EVENTS,
        Action::Heal => HEAL_EVENTS,
        Action::Chat => CHAT_EVENTS,
        Action::Sleep | Action::Clean => &[],
    }
}

/// What applying a bonus event produced
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BonusApplied {
    /// Coins / XP / intelligence to route through progression
    pub grant: Grant,
    pub changes: Vec<StatChange>,
}

impl BonusEvent {
    /// Stat effects land on the pet now; economy effects are returned as a
    /// grant so they go through the level-up loop.
    pub fn apply(&self, pet: &mut PetState) -> BonusApplied {
        let mut applied = BonusApplied::default();
        match self.effect {
            BonusEffect::Coins(n) => applied.grant.coins = n,
            BonusEffect::Xp(n) => applied.grant.xp = n,
            BonusEffect::Intelligence(n) => applied.grant.intelligence = n,
            BonusEffect::Vital(v, d) => applied.changes.push(pet.vitals.apply(v, d)),
            BonusEffect::Trait(t, d) => applied.changes.push(pet.personality.apply(t, d)),
        }
        applied
    }
}

/// Rolls for bonus events with an injectable RNG
pub struct BonusRoller {
    chance: f64,
    rng: Mutex<StdRng>,
}

impl BonusRoller {
    pub fn new(chance: f64, seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        // NaN would make gen_bool panic; treat it as disabled
        let chance = if chance.is_nan() { 0.0 } else { chance.clamp(0.0, 1.0) };
        Self {
            chance,
            rng: Mutex::new(rng),
        }
    }

    pub fn chance(&self) -> f64 {
        self.chance
    }

    pub fn roll(&self, action: Action) -> Option<BonusEvent> {
        let candidates = events_for(action);
        if candidates.is_empty() || self.chance <= 0.0 {
            return None;
        }
        let mut rng = self.rng.lock().unwrap_or_else(|p| p.into_inner());
        if !rng.gen_bool(self.chance) {
            return None;
        }
        candidates.choose(&mut *rng).copied()
    }
}

impl std::fmt::Debug for BonusRoller {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BonusRoller").field("chance", &self.chance).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[test]
    fn test_zero_chance_never_fires() {
        let roller = BonusRoller::new(0.0, Some(1));
        for _ in 0..100 {
            assert!(roller.roll(Action::Feed).is_none());
        }
    }

    #[test]
    fn test_out_of_range_chance_is_clamped() {
        let roller = BonusRoller::new(f64::NAN, Some(1));
        assert_eq!(roller.chance(), 0.0);
        for _ in 0..100 {
            assert!(roller.roll(Action::Feed).is_none());
        }

        assert_eq!(BonusRoller::new(f64::NEG_INFINITY, Some(1)).chance(), 0.0);
        assert_eq!(BonusRoller::new(-0.5, Some(1)).chance(), 0.0);
        let always = BonusRoller::new(f64::INFINITY, Some(1));
        assert_eq!(always.chance(), 1.0);
        assert!(always.roll(Action::Feed).is_some());
    }

    #[test]
    fn test_full_chance_always_fires_for_care_actions() {
        let roller = BonusRoller::new(1.0, Some(1));
        for action in [Action::Feed, Action::Wash, Action::Play, Action::Heal, Action::Chat] {
            let ev = roller.roll(action).unwrap();
            assert!(events_for(action).contains(&ev));
        }
        assert!(roller.roll(Action::Sleep).is_none());
        assert!(roller.roll(Action::Clean).is_none());
    }

    #[test]
    fn test_same_seed_same_sequence() {
        let a = BonusRoller::new(0.5, Some(7));
        let b = BonusRoller::new(0.5, Some(7));
        for _ in 0..20 {
            assert_eq!(a.roll(Action::Play), b.roll(Action::Play));
        }
    }

    #[test]
    fn test_apply_splits_stats_and_economy() {
        let mut pet = PetState::new(1, Utc::now(), 0);
        let coins = event("c", BonusEffect::Coins(10)).apply(&mut pet);
        assert_eq!(coins.grant, Grant::new(0, 10));
        assert!(coins.changes.is_empty());

        let hygiene = event("h", BonusEffect::Vital(Vital::Hygiene, 50)).apply(&mut pet);
        assert_eq!(pet.vitals.hygiene, 100);
        assert_eq!(hygiene.changes[0].delta, 20);
        assert!(hygiene.grant.is_empty());
    }
}
