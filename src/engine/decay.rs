//! Time-based stat decay
//!
//! Converts wall-clock time since the last tick into stat loss. One tick is
//! ten minutes of elapsed time. Long absences decay at a reduced rate and the
//! total is capped, so coming back after a week is not a death sentence.

use chrono::{DateTime, Utc};

use crate::domain::{clamp_rounded, PetState};

/// Calls closer together than this are ignored entirely
pub const MIN_TICK_INTERVAL_SECS: i64 = 30;

pub const SECONDS_PER_TICK: f64 = 600.0;

/// Default upper bound on decayed time per application (6 hours)
pub const DEFAULT_CAP_SECONDS: i64 = 6 * 3600;

const BASE_DROP_PER_TICK: f64 = 0.8;
const HAPPINESS_DROP_PER_TICK: f64 = 0.25;
const LONELY_HAPPINESS_FACTOR: f64 = 1.5;

// Happiness penalties while a need is unmet
const HUNGRY_BELOW: i32 = 40;
const HUNGRY_PENALTY: f64 = 0.4;
const TIRED_BELOW: i32 = 35;
const TIRED_PENALTY: f64 = 0.4;
const DIRTY_BELOW: i32 = 40;
const DIRTY_PENALTY: f64 = 0.45;

// Health only suffers once hunger or hygiene turn critical
const STARVING_BELOW: i32 = 25;
const STARVING_HEALTH_DROP: f64 = 0.6;
const FILTHY_BELOW: i32 = 25;
const FILTHY_HEALTH_DROP: f64 = 0.7;

/// Rate multiplier for an absence of the given length.
///
/// Full rate up to 6h, half rate up to 24h, quarter rate beyond. The rate
/// never increases with a longer absence.
pub fn absence_multiplier(elapsed_secs: i64) -> f64 {
    let hours = elapsed_secs as f64 / 3600.0;
    if hours <= 6.0 {
        1.0
    } else if hours <= 24.0 {
        0.5
    } else {
        0.25
    }
}

/// Apply decay for the time between `pet.last_tick_at` and `now`.
///
/// Returns the number of seconds that were actually decayed (after the cap).
/// A call within 30 seconds of the previous tick, or with `now` earlier than
/// the previous tick, changes nothing and returns 0.
pub fn apply_decay(pet: &mut PetState, now: DateTime<Utc>, cap_seconds: i64, lonely: bool) -> i64 {
    let elapsed = (now - pet.last_tick_at).num_seconds().max(0);
    if elapsed < MIN_TICK_INTERVAL_SECS {
        return 0;
    }

    let effective = elapsed.min(cap_seconds);
    if effective <= 0 {
        pet.last_tick_at = now;
        return 0;
    }

    let ticks = effective as f64 / SECONDS_PER_TICK * absence_multiplier(elapsed);
    let vitals = &mut pet.vitals;

    let base_drop = BASE_DROP_PER_TICK * ticks;
    vitals.hunger = clamp_rounded(vitals.hunger as f64 - base_drop);
    vitals.energy = clamp_rounded(vitals.energy as f64 - base_drop);
    vitals.hygiene = clamp_rounded(vitals.hygiene as f64 - base_drop);

    // Penalties read the already-decayed needs
    let mut happiness_drop = HAPPINESS_DROP_PER_TICK * ticks;
    if vitals.hunger < HUNGRY_BELOW {
        happiness_drop += HUNGRY_PENALTY * ticks;
    }
    if vitals.energy < TIRED_BELOW {
        happiness_drop += TIRED_PENALTY * ticks;
    }
    if vitals.hygiene < DIRTY_BELOW {
        happiness_drop += DIRTY_PENALTY * ticks;
    }
    if lonely {
        happiness_drop *= LONELY_HAPPINESS_FACTOR;
    }
    vitals.happiness = clamp_rounded(vitals.happiness as f64 - happiness_drop);

    let mut health_drop = 0.0;
    if vitals.hunger < STARVING_BELOW {
        health_drop += STARVING_HEALTH_DROP * ticks;
    }
    if vitals.hygiene < FILTHY_BELOW {
        health_drop += FILTHY_HEALTH_DROP * ticks;
    }
    if health_drop > 0.0 {
        vitals.health = clamp_rounded(vitals.health as f64 - health_drop);
    }

    pet.last_tick_at = now;
    effective
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn pet_at(ts: DateTime<Utc>) -> PetState {
        PetState::new(1, ts, 1000)
    }

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 1, 8, 0, 0).unwrap()
    }

    #[test]
    fn test_noop_within_thirty_seconds() {
        let mut pet = pet_at(t0());
        let before = pet.clone();
        assert_eq!(apply_decay(&mut pet, t0() + Duration::seconds(29), DEFAULT_CAP_SECONDS, false), 0);
        assert_eq!(pet, before);
    }

    #[test]
    fn test_noop_when_clock_goes_backwards() {
        let mut pet = pet_at(t0());
        let before = pet.clone();
        assert_eq!(apply_decay(&mut pet, t0() - Duration::hours(3), DEFAULT_CAP_SECONDS, false), 0);
        assert_eq!(pet, before);
        assert_eq!(pet.last_tick_at, t0());
    }

    #[test]
    fn test_six_hours_full_rate() {
        let mut pet = pet_at(t0());
        let applied = apply_decay(&mut pet, t0() + Duration::hours(6), 21600, false);
        assert_eq!(applied, 21600);
        // 36 ticks * 0.8 = 28.8
        assert_eq!(pet.vitals.hunger, 51);
        assert_eq!(pet.vitals.energy, 56);
        assert_eq!(pet.vitals.hygiene, 51);
        // 0.25 * 36 = 9, no penalties since needs stay >= 40 / 35
        assert_eq!(pet.vitals.happiness, 71);
        assert_eq!(pet.vitals.health, 85);
        assert_eq!(pet.last_tick_at, t0() + Duration::hours(6));
    }

    #[test]
    fn test_cap_bounds_long_absence() {
        let mut pet = pet_at(t0());
        let applied = apply_decay(&mut pet, t0() + Duration::hours(48), 21600, false);
        assert_eq!(applied, 21600);
        // quarter rate: 9 ticks * 0.8 = 7.2
        assert_eq!(pet.vitals.hunger, 73);
    }

    #[test]
    fn test_lonely_increases_happiness_loss() {
        let mut a = pet_at(t0());
        let mut b = pet_at(t0());
        apply_decay(&mut a, t0() + Duration::hours(4), DEFAULT_CAP_SECONDS, false);
        apply_decay(&mut b, t0() + Duration::hours(4), DEFAULT_CAP_SECONDS, true);
        assert!(b.vitals.happiness < a.vitals.happiness);
        assert_eq!(a.vitals.hunger, b.vitals.hunger);
    }

    #[test]
    fn test_health_only_drops_when_critical() {
        let mut pet = pet_at(t0());
        pet.vitals.hunger = 10;
        pet.vitals.hygiene = 90;
        apply_decay(&mut pet, t0() + Duration::hours(1), DEFAULT_CAP_SECONDS, false);
        // 6 ticks: hunger -> 5, health loses 0.6 * 6 = 3.6
        assert_eq!(pet.vitals.hunger, 5);
        assert_eq!(pet.vitals.health, 81);

        let mut fine = pet_at(t0());
        apply_decay(&mut fine, t0() + Duration::hours(1), DEFAULT_CAP_SECONDS, false);
        assert_eq!(fine.vitals.health, 85);
    }

    #[test]
    fn test_zero_cap_only_advances_tick() {
        let mut pet = pet_at(t0());
        let applied = apply_decay(&mut pet, t0() + Duration::hours(2), 0, false);
        assert_eq!(applied, 0);
        assert_eq!(pet.vitals, crate::domain::STARTING_VITALS);
        assert_eq!(pet.last_tick_at, t0() + Duration::hours(2));
    }

    #[test]
    fn test_stats_stay_in_range_under_heavy_decay() {
        let mut pet = pet_at(t0());
        pet.vitals.hunger = 2;
        pet.vitals.hygiene = 1;
        pet.vitals.energy = 0;
        pet.vitals.happiness = 3;
        pet.vitals.health = 4;
        apply_decay(&mut pet, t0() + Duration::hours(6), DEFAULT_CAP_SECONDS, true);
        assert!(pet.vitals.in_range());
        assert_eq!(pet.vitals.health, 0);
    }

    #[test]
    fn test_absence_multiplier_is_non_increasing() {
        let mut last = f64::MAX;
        for hours in [0, 1, 6, 7, 24, 25, 100] {
            let m = absence_multiplier(hours * 3600);
            assert!(m <= last);
            last = m;
        }
    }
}
