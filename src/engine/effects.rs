//! Care actions and item use
//!
//! Each action maps to a fixed table of vital deltas and personality nudges.
//! Deltas are applied with clamping, and the reported change is what was
//! actually applied.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::catalog::shop::{find_item, item_effect, ItemCategory};
use crate::domain::{
    Inventory, PersonalityTrait, PetState, StatChange, StatField,
    Vital::{self, Energy, Happiness, Health, Hunger, Hygiene},
};
use crate::engine::progression::Grant;
use crate::error::{GameError, GameResult};

/// A care action the user can perform on the pet
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    Feed,
    Wash,
    Play,
    Heal,
    Chat,
    Sleep,
    Clean,
}

impl Action {
    pub const ALL: [Action; 7] = [
        Action::Feed,
        Action::Wash,
        Action::Play,
        Action::Heal,
        Action::Chat,
        Action::Sleep,
        Action::Clean,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Feed => "feed",
            Self::Wash => "wash",
            Self::Play => "play",
            Self::Heal => "heal",
            Self::Chat => "chat",
            Self::Sleep => "sleep",
            Self::Clean => "clean",
        }
    }

    /// Parse a user-supplied key, rejecting unknown actions
    pub fn parse(key: &str) -> GameResult<Self> {
        key.parse()
    }

    pub fn vital_effects(&self) -> &'static [(Vital, i32)] {
        match self {
            Self::Feed => &[(Hunger, 18), (Happiness, 3), (Hygiene, -1)],
            Self::Wash => &[(Hygiene, 28), (Health, 3), (Happiness, 2)],
            Self::Play => &[(Happiness, 20), (Energy, -10), (Hunger, -4), (Hygiene, -2)],
            Self::Heal => &[(Health, 24), (Happiness, 4), (Energy, -2)],
            Self::Chat => &[(Happiness, 10), (Health, 2), (Energy, -1)],
            Self::Sleep => &[(Energy, 25), (Happiness, 5)],
            Self::Clean => &[(Hygiene, 15), (Happiness, 5)],
        }
    }

    pub fn trait_effects(&self) -> &'static [(PersonalityTrait, i32)] {
        match self {
            Self::Feed => &[(PersonalityTrait::Friendliness, 1)],
            Self::Wash => &[(PersonalityTrait::Tidiness, 2)],
            Self::Play => &[(PersonalityTrait::Energy, 1), (PersonalityTrait::Courage, 1)],
            Self::Heal => &[(PersonalityTrait::Courage, 1)],
            Self::Chat => &[
                (PersonalityTrait::Friendliness, 2),
                (PersonalityTrait::Curiosity, 1),
            ],
            Self::Sleep => &[],
            Self::Clean => &[(PersonalityTrait::Tidiness, 1)],
        }
    }

    pub fn base_reward(&self) -> Grant {
        match self {
            Self::Feed | Self::Wash => Grant::new(5, 2),
            Self::Play => Grant::new(10, 5),
            Self::Heal => Grant::new(7, 3),
            Self::Chat => Grant::new(4, 1),
            Self::Sleep => Grant::new(10, 100),
            Self::Clean => Grant::new(3, 5),
        }
    }
}

impl FromStr for Action {
    type Err = GameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|a| a.as_str() == s)
            .ok_or_else(|| GameError::InvalidInput(format!("unknown action: {s}")))
    }
}

/// Apply an action's table to the pet.
pub fn apply_action(pet: &mut PetState, action: Action) -> Vec<StatChange> {
    let mut changes = Vec::new();
    for (vital, delta) in action.vital_effects() {
        changes.push(pet.vitals.apply(*vital, *delta));
    }
    for (t, delta) in action.trait_effects() {
        changes.push(pet.personality.apply(*t, *delta));
    }
    changes
}

/// Result of consuming one inventory item
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemUse {
    pub category: ItemCategory,
    pub changes: Vec<StatChange>,
    /// Intelligence the item added directly; progression grants it again
    pub intelligence: u64,
}

/// Consume one unit of `item_key` and apply its effect.
///
/// Validation happens before anything is touched: unknown keys are
/// `NotFound`, cosmetics are `InvalidInput`, items not owned are
/// `NotEligible`.
pub fn apply_item(pet: &mut PetState, inventory: &mut Inventory, item_key: &str) -> GameResult<ItemUse> {
    let category = ItemCategory::of(item_key);
    let known = find_item(item_key).is_some() || inventory.quantity(item_key) > 0;
    if !known && item_effect(item_key).is_none() {
        return Err(GameError::not_found("item", item_key));
    }
    if !category.is_consumable() {
        return Err(GameError::InvalidInput(format!("{item_key} cannot be used")));
    }
    let effect = item_effect(item_key).ok_or_else(|| GameError::not_found("item", item_key))?;
    if !inventory.take_one(item_key) {
        return Err(GameError::NotEligible(format!("no {item_key} left in inventory")));
    }

    let mut changes: Vec<StatChange> = effect
        .vitals
        .iter()
        .map(|(vital, delta)| pet.vitals.apply(*vital, *delta))
        .collect();
    if effect.intelligence > 0 {
        let before = pet.intelligence;
        pet.intelligence += effect.intelligence;
        changes.push(StatChange::new(
            StatField::Intelligence,
            before as i64,
            pet.intelligence as i64,
        ));
    }

    Ok(ItemUse {
        category,
        changes,
        intelligence: effect.intelligence,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn fresh() -> PetState {
        PetState::new(1, Utc::now(), 1000)
    }

    #[test]
    fn test_parse_rejects_unknown_action() {
        assert_eq!(Action::parse("feed").unwrap(), Action::Feed);
        assert!(matches!(Action::parse("dance"), Err(GameError::InvalidInput(_))));
        for action in Action::ALL {
            assert_eq!(action.as_str().parse::<Action>().ok(), Some(action));
        }
    }

    #[test]
    fn test_feed_applies_table() {
        let mut pet = fresh();
        let changes = apply_action(&mut pet, Action::Feed);
        assert_eq!(pet.vitals.hunger, 98);
        assert_eq!(pet.vitals.happiness, 83);
        assert_eq!(pet.vitals.hygiene, 79);
        assert_eq!(pet.personality.friendliness, 51);
        assert_eq!(changes.len(), 4);
    }

    #[test]
    fn test_clamped_delta_is_reported() {
        let mut pet = fresh();
        pet.vitals.hunger = 95;
        let changes = apply_action(&mut pet, Action::Feed);
        let hunger = changes
            .iter()
            .find(|c| c.field == StatField::Vital(Vital::Hunger))
            .unwrap();
        assert_eq!(hunger.delta, 5);
        assert_eq!(pet.vitals.hunger, 100);
    }

    #[test]
    fn test_all_actions_keep_stats_in_range() {
        let mut pet = fresh();
        for _ in 0..20 {
            for action in Action::ALL {
                apply_action(&mut pet, action);
                assert!(pet.vitals.in_range());
            }
        }
    }

    #[test]
    fn test_item_use_consumes_and_applies() {
        let mut pet = fresh();
        let mut inv = Inventory::starting();
        pet.vitals.health = 50;
        let used = apply_item(&mut pet, &mut inv, "medicine_bandage").unwrap();
        assert_eq!(used.category, ItemCategory::Medicine);
        assert_eq!(pet.vitals.health, 70);
        assert_eq!(inv.quantity("medicine_bandage"), 2);
    }

    #[test]
    fn test_item_intelligence_is_unbounded() {
        let mut pet = fresh();
        pet.intelligence = 250;
        let mut inv = Inventory::default();
        inv.add("toy_robot", 1);
        apply_item(&mut pet, &mut inv, "toy_robot").unwrap();
        assert_eq!(pet.intelligence, 255);
        assert_eq!(inv.quantity("toy_robot"), 0);
    }

    #[test]
    fn test_item_errors() {
        let mut pet = fresh();
        let mut inv = Inventory::starting();
        inv.add("decor_star_halo", 1);
        assert!(matches!(
            apply_item(&mut pet, &mut inv, "food_mystery"),
            Err(GameError::NotFound { .. })
        ));
        assert!(matches!(
            apply_item(&mut pet, &mut inv, "unicorn_dust"),
            Err(GameError::NotFound { .. })
        ));
        assert!(matches!(
            apply_item(&mut pet, &mut inv, "decor_star_halo"),
            Err(GameError::InvalidInput(_))
        ));
        assert!(matches!(
            apply_item(&mut pet, &mut inv, "food_sushi"),
            Err(GameError::NotEligible(_))
        ));
        assert_eq!(inv.quantity("decor_star_halo"), 1);
    }
}
