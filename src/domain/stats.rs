//! Bounded stat vectors and clamp semantics

use serde::{Deserialize, Serialize};

pub const STAT_MIN: i32 = 0;
pub const STAT_MAX: i32 = 100;

/// Default value for every personality trait on a fresh pet.
pub const TRAIT_DEFAULT: i32 = 50;

pub fn clamp_stat(value: i32) -> i32 {
    value.clamp(STAT_MIN, STAT_MAX)
}

/// Round a fractional stat to the nearest integer, then clamp it.
pub fn clamp_rounded(value: f64) -> i32 {
    let rounded = value.round();
    if rounded <= STAT_MIN as f64 {
        STAT_MIN
    } else if rounded >= STAT_MAX as f64 {
        STAT_MAX
    } else {
        rounded as i32
    }
}

/// One of the five care stats
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Vital {
    Hunger,
    Hygiene,
    Happiness,
    Health,
    Energy,
}

impl Vital {
    pub const ALL: [Vital; 5] = [
        Vital::Hunger,
        Vital::Hygiene,
        Vital::Happiness,
        Vital::Health,
        Vital::Energy,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Hunger => "hunger",
            Self::Hygiene => "hygiene",
            Self::Happiness => "happiness",
            Self::Health => "health",
            Self::Energy => "energy",
        }
    }
}

/// One of the five personality traits
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PersonalityTrait {
    Courage,
    Friendliness,
    Energy,
    Curiosity,
    Tidiness,
}

impl PersonalityTrait {
    pub const ALL: [PersonalityTrait; 5] = [
        PersonalityTrait::Courage,
        PersonalityTrait::Friendliness,
        PersonalityTrait::Energy,
        PersonalityTrait::Curiosity,
        PersonalityTrait::Tidiness,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Courage => "courage",
            Self::Friendliness => "friendliness",
            Self::Energy => "energy",
            Self::Curiosity => "curiosity",
            Self::Tidiness => "tidiness",
        }
    }
}

/// Any field an effect can touch
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "name", rename_all = "snake_case")]
pub enum StatField {
    Vital(Vital),
    Trait(PersonalityTrait),
    /// Unbounded, only ever grows
    Intelligence,
}

/// A field change as it was actually applied (after clamping)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatChange {
    pub field: StatField,
    pub before: i64,
    pub after: i64,
    pub delta: i64,
}

impl StatChange {
    pub fn new(field: StatField, before: i64, after: i64) -> Self {
        Self {
            field,
            before,
            after,
            delta: after - before,
        }
    }
}

/// The five care stats, each in [0, 100]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Vitals {
    pub hunger: i32,
    pub hygiene: i32,
    pub happiness: i32,
    pub health: i32,
    pub energy: i32,
}

impl Vitals {
    pub fn get(&self, vital: Vital) -> i32 {
        match vital {
            Vital::Hunger => self.hunger,
            Vital::Hygiene => self.hygiene,
            Vital::Happiness => self.happiness,
            Vital::Health => self.health,
            Vital::Energy => self.energy,
        }
    }

    fn slot(&mut self, vital: Vital) -> &mut i32 {
        match vital {
            Vital::Hunger => &mut self.hunger,
            Vital::Hygiene => &mut self.hygiene,
            Vital::Happiness => &mut self.happiness,
            Vital::Health => &mut self.health,
            Vital::Energy => &mut self.energy,
        }
    }

    pub fn set(&mut self, vital: Vital, value: i32) {
        *self.slot(vital) = clamp_stat(value);
    }

    /// Add a signed delta and report what was really applied.
    pub fn apply(&mut self, vital: Vital, delta: i32) -> StatChange {
        let before = self.get(vital);
        let after = clamp_stat(before.saturating_add(delta));
        *self.slot(vital) = after;
        StatChange::new(StatField::Vital(vital), before as i64, after as i64)
    }

    pub fn in_range(&self) -> bool {
        Vital::ALL
            .iter()
            .all(|v| (STAT_MIN..=STAT_MAX).contains(&self.get(*v)))
    }
}

/// Personality traits, each in [0, 100]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Personality {
    pub courage: i32,
    pub friendliness: i32,
    pub energy: i32,
    pub curiosity: i32,
    pub tidiness: i32,
}

impl Default for Personality {
    fn default() -> Self {
        Self {
            courage: TRAIT_DEFAULT,
            friendliness: TRAIT_DEFAULT,
            energy: TRAIT_DEFAULT,
            curiosity: TRAIT_DEFAULT,
            tidiness: TRAIT_DEFAULT,
        }
    }
}

impl Personality {
    pub fn get(&self, t: PersonalityTrait) -> i32 {
        match t {
            PersonalityTrait::Courage => self.courage,
            PersonalityTrait::Friendliness => self.friendliness,
            PersonalityTrait::Energy => self.energy,
            PersonalityTrait::Curiosity => self.curiosity,
            PersonalityTrait::Tidiness => self.tidiness,
        }
    }

    fn slot(&mut self, t: PersonalityTrait) -> &mut i32 {
        match t {
            PersonalityTrait::Courage => &mut self.courage,
            PersonalityTrait::Friendliness => &mut self.friendliness,
            PersonalityTrait::Energy => &mut self.energy,
            PersonalityTrait::Curiosity => &mut self.curiosity,
            PersonalityTrait::Tidiness => &mut self.tidiness,
        }
    }

    pub fn apply(&mut self, t: PersonalityTrait, delta: i32) -> StatChange {
        let before = self.get(t);
        let after = clamp_stat(before.saturating_add(delta));
        *self.slot(t) = after;
        StatChange::new(StatField::Trait(t), before as i64, after as i64)
    }
}
