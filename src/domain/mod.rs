//! Core domain types

mod inventory;
mod pet;
mod prefs;
mod stats;

pub use inventory::Inventory;
pub use pet::{
    Behavior, PetState, Stage, DEFAULT_PET_NAME, STARTING_INVENTORY, STARTING_VITALS,
};
pub use prefs::NotificationPrefs;
pub use stats::{
    clamp_rounded, clamp_stat, Personality, PersonalityTrait, StatChange, StatField, Vital,
    Vitals, STAT_MAX, STAT_MIN, TRAIT_DEFAULT,
};
