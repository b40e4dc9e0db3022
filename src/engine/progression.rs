//! XP, levels and stage transitions
//!
//! Every reward in the game flows through [`apply_progress`]: XP is scaled by
//! intelligence, the level-up loop runs until the carry is below the next
//! threshold, and each level reached pays a coin bonus plus one cosmetic.

use serde::{Deserialize, Serialize};

use crate::domain::{Inventory, PetState, Stage};

/// Base amounts handed to the progression engine
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Grant {
    pub xp: u64,
    pub coins: u64,
    pub intelligence: u64,
    pub crystals: u64,
}

impl Grant {
    pub const fn new(xp: u64, coins: u64) -> Self {
        Self {
            xp,
            coins,
            intelligence: 0,
            crystals: 0,
        }
    }

    pub const fn with_intelligence(mut self, intelligence: u64) -> Self {
        self.intelligence = intelligence;
        self
    }

    pub fn merge(self, other: Grant) -> Self {
        Self {
            xp: self.xp + other.xp,
            coins: self.coins + other.coins,
            intelligence: self.intelligence + other.intelligence,
            crystals: self.crystals + other.crystals,
        }
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// Breakdown of what a grant did to the pet
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reward {
    /// XP after the intelligence multiplier
    pub xp: u64,
    /// Coins from the grant itself
    pub coins: u64,
    /// Coins paid for levels reached
    pub level_bonus_coins: u64,
    pub intelligence: u64,
    pub crystals: u64,
    pub levels_gained: Vec<u32>,
    pub level_up: bool,
    pub stage_before: Stage,
    pub stage_after: Stage,
    pub stage_changed: bool,
    pub unlocks: Vec<String>,
}

impl Reward {
    pub fn total_coins(&self) -> u64 {
        self.coins + self.level_bonus_coins
    }
}

/// XP needed to go from `level` to `level + 1`
pub fn xp_to_next(level: u32) -> u64 {
    (50.0 * (level.max(1) as f64).powf(1.4)).ceil() as u64
}

pub fn xp_multiplier(intelligence: u64) -> f64 {
    1.0 + intelligence as f64 / 100.0
}

pub fn gained_xp(base_xp: u64, intelligence: u64) -> u64 {
    (base_xp as f64 * xp_multiplier(intelligence)).round() as u64
}

pub fn level_bonus_coins(level: u32) -> u64 {
    12 + 2 * level as u64
}

/// Cosmetic unlocked on reaching `level`
pub fn level_unlock_key(level: u32) -> String {
    format!("decor_level_{level}")
}

/// Apply a grant to the pet. The multiplier uses intelligence as it was
/// before this grant.
pub fn apply_progress(pet: &mut PetState, inventory: &mut Inventory, grant: Grant) -> Reward {
    let xp = gained_xp(grant.xp, pet.intelligence);
    let stage_before = pet.stage;

    let mut level = pet.level.max(1);
    let mut carry = pet.xp + xp;
    let mut levels_gained = Vec::new();
    while carry >= xp_to_next(level) {
        carry -= xp_to_next(level);
        level += 1;
        levels_gained.push(level);
    }

    pet.xp = carry;
    pet.level = level;
    pet.stage = Stage::for_level(level);
    pet.coins += grant.coins;
    pet.intelligence += grant.intelligence;
    pet.crystals += grant.crystals;

    let mut level_bonus = 0;
    let mut unlocks = Vec::with_capacity(levels_gained.len());
    for reached in &levels_gained {
        level_bonus += level_bonus_coins(*reached);
        let key = level_unlock_key(*reached);
        if inventory.quantity(&key) == 0 {
            inventory.add(&key, 1);
        }
        unlocks.push(key);
    }
    pet.coins += level_bonus;

    Reward {
        xp,
        coins: grant.coins,
        level_bonus_coins: level_bonus,
        intelligence: grant.intelligence,
        crystals: grant.crystals,
        level_up: !levels_gained.is_empty(),
        levels_gained,
        stage_before,
        stage_after: pet.stage,
        stage_changed: stage_before != pet.stage,
        unlocks,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn fresh() -> (PetState, Inventory) {
        (PetState::new(7, Utc::now(), 1000), Inventory::default())
    }

    #[test]
    fn test_xp_to_next_starts_at_fifty_and_grows() {
        assert_eq!(xp_to_next(1), 50);
        assert_eq!(xp_to_next(2), 132);
        for level in 1..60 {
            assert!(xp_to_next(level + 1) > xp_to_next(level));
        }
    }

    #[test]
    fn test_intelligence_scales_xp() {
        assert_eq!(gained_xp(10, 0), 10);
        assert_eq!(gained_xp(10, 50), 15);
        assert!(gained_xp(100, 11) > gained_xp(100, 10));
    }

    #[test]
    fn test_simple_grant_without_level_up() {
        let (mut pet, mut inv) = fresh();
        let reward = apply_progress(&mut pet, &mut inv, Grant::new(5, 2));
        assert_eq!(pet.xp, 5);
        assert_eq!(pet.coins, 1002);
        assert!(!reward.level_up);
        assert!(reward.unlocks.is_empty());
    }

    #[test]
    fn test_multi_level_loop_leaves_carry_below_threshold() {
        let (mut pet, mut inv) = fresh();
        // 50 + 132 = 182 to reach level 3
        let reward = apply_progress(&mut pet, &mut inv, Grant::new(200, 0));
        assert_eq!(reward.levels_gained, vec![2, 3]);
        assert_eq!(pet.level, 3);
        assert_eq!(pet.xp, 18);
        assert!(pet.xp < xp_to_next(pet.level));
        assert_eq!(reward.level_bonus_coins, 16 + 18);
        assert_eq!(pet.coins, 1000 + 34);
        assert_eq!(inv.quantity("decor_level_2"), 1);
        assert_eq!(inv.quantity("decor_level_3"), 1);
    }

    #[test]
    fn test_stage_change_detected() {
        let (mut pet, mut inv) = fresh();
        pet.level = 5;
        let reward = apply_progress(&mut pet, &mut inv, Grant::new(xp_to_next(5), 0));
        assert_eq!(pet.level, 6);
        assert!(reward.stage_changed);
        assert_eq!(reward.stage_before, Stage::Baby);
        assert_eq!(reward.stage_after, Stage::Child);
    }

    #[test]
    fn test_unlock_is_idempotent() {
        let (mut pet, mut inv) = fresh();
        inv.add("decor_level_2", 1);
        apply_progress(&mut pet, &mut inv, Grant::new(50, 0));
        assert_eq!(inv.quantity("decor_level_2"), 1);
    }
}
