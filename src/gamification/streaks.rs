//! Login streak tracking
//!
//! The streak advances when the daily login bonus is claimed.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::engine::Grant;

/// Streak lengths that pay a bigger bonus, highest first
pub const STREAK_MILESTONES: [u32; 4] = [30, 14, 7, 3];

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StreakState {
    pub current: u32,
    pub best: u32,
    pub last_claim_date: Option<NaiveDate>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StreakUpdate {
    pub current: u32,
    pub best: u32,
    /// Bonus for the current streak length
    pub bonus: Grant,
    /// Set when this update landed exactly on a milestone
    pub milestone: Option<u32>,
    /// False for a repeated call on the same date
    pub advanced: bool,
}

/// Step bonus for a streak length: (coins, xp) 80/30 at 30 days, 45/18 at
/// 14, 25/10 at 7, 10/4 at 3, nothing below.
pub fn streak_bonus(current: u32) -> Grant {
    if current >= 30 {
        Grant::new(30, 80)
    } else if current >= 14 {
        Grant::new(18, 45)
    } else if current >= 7 {
        Grant::new(10, 25)
    } else if current >= 3 {
        Grant::new(4, 10)
    } else {
        Grant::default()
    }
}

impl StreakState {
    /// Record activity on `date`. Repeats on the same (or an earlier) date
    /// return the current bonus without changing anything.
    pub fn update(&mut self, date: NaiveDate) -> StreakUpdate {
        if self.last_claim_date.is_some_and(|last| date <= last) {
            return StreakUpdate {
                current: self.current,
                best: self.best,
                bonus: streak_bonus(self.current),
                milestone: None,
                advanced: false,
            };
        }

        let consecutive = self
            .last_claim_date
            .and_then(|last| last.succ_opt())
            .is_some_and(|next| next == date);
        self.current = if consecutive { self.current + 1 } else { 1 };
        self.best = self.best.max(self.current);
        self.last_claim_date = Some(date);

        StreakUpdate {
            current: self.current,
            best: self.best,
            bonus: streak_bonus(self.current),
            milestone: STREAK_MILESTONES.iter().copied().find(|m| *m == self.current),
            advanced: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 1, day).unwrap()
    }

    #[test]
    fn test_same_date_is_idempotent() {
        let mut s = StreakState::default();
        s.update(d(1));
        let again = s.update(d(1));
        assert_eq!(again.current, 1);
        assert!(!again.advanced);
        assert_eq!(s.current, 1);
    }

    #[test]
    fn test_consecutive_increments_and_gap_resets() {
        let mut s = StreakState::default();
        s.update(d(1));
        s.update(d(2));
        let third = s.update(d(3));
        assert_eq!(third.current, 3);
        assert_eq!(third.milestone, Some(3));
        assert_eq!(third.bonus, Grant::new(4, 10));

        let reset = s.update(d(5));
        assert_eq!(reset.current, 1);
        assert_eq!(reset.best, 3);
        assert_eq!(reset.milestone, None);
    }

    #[test]
    fn test_repeat_after_milestone_reports_bonus_not_milestone() {
        let mut s = StreakState::default();
        for day in 1..=7 {
            s.update(d(day));
        }
        let repeat = s.update(d(7));
        assert_eq!(repeat.current, 7);
        assert_eq!(repeat.bonus, Grant::new(10, 25));
        assert_eq!(repeat.milestone, None);
    }

    #[test]
    fn test_best_never_decreases() {
        let mut s = StreakState::default();
        let mut best = 0;
        for day in [1, 2, 3, 4, 9, 10, 20, 21, 22, 23, 24, 25] {
            let u = s.update(d(day));
            assert!(u.best >= best);
            best = u.best;
        }
        assert_eq!(best, 6);
    }

    #[test]
    fn test_bonus_steps() {
        assert_eq!(streak_bonus(2), Grant::default());
        assert_eq!(streak_bonus(14), Grant::new(18, 45));
        assert_eq!(streak_bonus(45), Grant::new(30, 80));
    }
}
