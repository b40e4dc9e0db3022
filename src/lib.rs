//! Petkeeper - virtual pet care engine
//!
//! Petkeeper tracks one pet per player: its vitals decay over wall-clock
//! time, care actions and minigames pay XP and coins, and a layer of daily
//! tasks, login streaks, live events, achievements and quests sits on top.
//!
//! ## Layout
//!
//! - `domain`, `catalog`: plain data and the static item / game tables
//! - `engine`: pure transitions (decay, effects, progression, behavior)
//! - `gamification`: side progression fed by metrics
//! - `store`: transactional persistence (`PetStore`, SQLite adapter)
//! - `service`: `GameService`, which composes all of the above per request

pub mod catalog;
pub mod config;
pub mod domain;
pub mod engine;
pub mod error;
pub mod gamification;
pub mod service;
pub mod store;
pub mod time_bucket;

pub use domain::*;
pub use error::{GameError, GameResult};
