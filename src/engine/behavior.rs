//! Behavior label and loneliness

use chrono::{DateTime, Duration, Utc};

use crate::domain::{Behavior, PetState, Vitals};

/// A pet left alone this long counts as lonely
pub const LONELY_AFTER_HOURS: i64 = 24;

/// Pick the label for the most pressing condition first.
pub fn classify(v: &Vitals) -> Behavior {
    if v.hunger < 30 {
        return Behavior::Hungry;
    }
    if v.energy < 20 {
        return Behavior::Tired;
    }
    if v.hygiene < 30 {
        return Behavior::Dirty;
    }
    if v.health < 40 {
        return Behavior::Sick;
    }
    if v.happiness > 80 {
        return Behavior::Joyful;
    }
    if v.happiness < 35 {
        return Behavior::Sad;
    }
    if v.happiness > 65 && v.energy > 60 {
        return Behavior::Playful;
    }
    if v.energy > 55 && v.health > 60 {
        return Behavior::Curious;
    }
    Behavior::Calm
}

pub fn refresh_behavior(pet: &mut PetState) {
    pet.behavior = classify(&pet.vitals);
}

pub fn is_lonely(pet: &PetState, now: DateTime<Utc>) -> bool {
    now - pet.last_active_at >= Duration::hours(LONELY_AFTER_HOURS)
}
