//! Time-limited live events

use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};

use crate::engine::Grant;
use crate::error::{GameError, GameResult};

/// Event points per care action or item use
pub const POINTS_PER_CARE: i64 = 1;
/// Event points for a won / lost minigame round
pub const POINTS_PER_MINIGAME_WIN: i64 = 2;
pub const POINTS_PER_MINIGAME_LOSS: i64 = 1;

/// Admin-defined event window
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LiveEvent {
    pub key: String,
    pub title: String,
    pub description: String,
    pub starts_at: DateTime<Utc>,
    pub ends_at: DateTime<Utc>,
    pub target_points: u32,
    pub reward: Grant,
    pub enabled: bool,
}

impl LiveEvent {
    /// Enabled and `starts_at <= now < ends_at`
    pub fn is_active(&self, now: DateTime<Utc>) -> bool {
        self.enabled && self.starts_at <= now && now < self.ends_at
    }
}

/// The event seeded into a fresh store
pub fn default_event() -> LiveEvent {
    LiveEvent {
        key: "spring_festival_2026".to_string(),
        title: "Spring Festival".to_string(),
        description: "Care for your pet and play minigames to collect festival points".to_string(),
        starts_at: Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).single().unwrap_or(DateTime::UNIX_EPOCH),
        ends_at: Utc.with_ymd_and_hms(2027, 1, 1, 0, 0, 0).single().unwrap_or(DateTime::UNIX_EPOCH),
        target_points: 40,
        reward: Grant::new(120, 300),
        enabled: true,
    }
}

/// Pick the active event, preferring the most recent start.
pub fn select_active(events: &[LiveEvent], now: DateTime<Utc>) -> Option<&LiveEvent> {
    events
        .iter()
        .filter(|e| e.is_active(now))
        .max_by_key(|e| e.starts_at)
}

/// A player's progress in one event
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventProgress {
    pub event_key: String,
    pub points: u32,
    pub completed_at: Option<DateTime<Utc>>,
    pub claimed_at: Option<DateTime<Utc>>,
}

impl EventProgress {
    pub fn new(event_key: &str) -> Self {
        Self {
            event_key: event_key.to_string(),
            points: 0,
            completed_at: None,
            claimed_at: None,
        }
    }

    /// Add points. Ignored for non-positive amounts and once claimed.
    /// Returns true when this call reached the target.
    pub fn add_points(&mut self, event: &LiveEvent, points: i64, now: DateTime<Utc>) -> bool {
        if points <= 0 || self.claimed_at.is_some() {
            return false;
        }
        let points = u32::try_from(points).unwrap_or(u32::MAX);
        self.points = self.points.saturating_add(points);
        if self.completed_at.is_none() && self.points >= event.target_points {
            self.completed_at = Some(now);
            return true;
        }
        false
    }

    pub fn claim(&mut self, event: &LiveEvent, now: DateTime<Utc>) -> GameResult<Grant> {
        if self.claimed_at.is_some() {
            return Err(GameError::AlreadyClaimed(format!("event {}", event.key)));
        }
        if self.completed_at.is_none() || self.points < event.target_points {
            return Err(GameError::NotEligible(format!(
                "event {} needs {} points, have {}",
                event.key, event.target_points, self.points
            )));
        }
        self.claimed_at = Some(now);
        Ok(event.reward)
    }
}
