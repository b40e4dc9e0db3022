//! Pet record, life stages and behavior labels

use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::stats::{Personality, Vitals};
use crate::error::GameError;

pub const DEFAULT_PET_NAME: &str = "Unicorn";

/// Vitals every new pet starts with
pub const STARTING_VITALS: Vitals = Vitals {
    hunger: 80,
    hygiene: 80,
    happiness: 80,
    health: 85,
    energy: 85,
};

/// Items granted on first access
pub const STARTING_INVENTORY: &[(&str, u32)] = &[
    ("food_apple", 8),
    ("food_carrot", 5),
    ("wash_soap", 5),
    ("medicine_bandage", 3),
    ("toy_ball", 3),
];

/// Coarse life phase, derived purely from level
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    Baby,
    Child,
    Teen,
    Adult,
}

impl Stage {
    /// Levels 1-5 baby, 6-10 child, 11-20 teen, above 20 adult
    pub fn for_level(level: u32) -> Self {
        match level {
            0..=5 => Self::Baby,
            6..=10 => Self::Child,
            11..=20 => Self::Teen,
            _ => Self::Adult,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Baby => "baby",
            Self::Child => "child",
            Self::Teen => "teen",
            Self::Adult => "adult",
        }
    }
}

impl FromStr for Stage {
    type Err = GameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "baby" => Ok(Self::Baby),
            "child" => Ok(Self::Child),
            "teen" => Ok(Self::Teen),
            "adult" => Ok(Self::Adult),
            _ => Err(GameError::InvalidInput(format!("unknown stage: {s}"))),
        }
    }
}

/// Descriptive mood label, recomputed after every mutation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Behavior {
    Hungry,
    Tired,
    Dirty,
    Sick,
    Joyful,
    Sad,
    Playful,
    Curious,
    Calm,
}

impl Behavior {
    pub const ALL: [Behavior; 9] = [
        Self::Hungry,
        Self::Tired,
        Self::Dirty,
        Self::Sick,
        Self::Joyful,
        Self::Sad,
        Self::Playful,
        Self::Curious,
        Self::Calm,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Hungry => "hungry",
            Self::Tired => "tired",
            Self::Dirty => "dirty",
            Self::Sick => "sick",
            Self::Joyful => "joyful",
            Self::Sad => "sad",
            Self::Playful => "playful",
            Self::Curious => "curious",
            Self::Calm => "calm",
        }
    }
}

impl FromStr for Behavior {
    type Err = GameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|b| b.as_str() == s)
            .ok_or_else(|| GameError::InvalidInput(format!("unknown behavior: {s}")))
    }
}

/// Per-user pet record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PetState {
    pub user_id: i64,
    pub name: String,
    pub vitals: Vitals,
    pub personality: Personality,
    pub level: u32,
    /// Carry towards the next level, always below the current threshold
    pub xp: u64,
    pub stage: Stage,
    pub coins: u64,
    pub intelligence: u64,
    pub crystals: u64,
    pub behavior: Behavior,
    /// Last user-initiated interaction
    pub last_active_at: DateTime<Utc>,
    /// Last time decay was applied; never moves backward
    pub last_tick_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

impl PetState {
    pub fn new(user_id: i64, now: DateTime<Utc>, starting_coins: u64) -> Self {
        Self {
            user_id,
            name: DEFAULT_PET_NAME.to_string(),
            vitals: STARTING_VITALS,
            personality: Personality::default(),
            level: 1,
            xp: 0,
            stage: Stage::Baby,
            coins: starting_coins,
            intelligence: 0,
            crystals: 0,
            behavior: Behavior::Calm,
            last_active_at: now,
            last_tick_at: now,
            created_at: now,
        }
    }
}
