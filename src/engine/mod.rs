//! Pure state-transition engines: decay, effects, progression, behavior

pub mod behavior;
pub mod decay;
pub mod effects;
pub mod progression;

pub use behavior::{classify, is_lonely, refresh_behavior};
pub use decay::{apply_decay, DEFAULT_CAP_SECONDS};
pub use effects::{apply_action, apply_item, Action, ItemUse};
pub use progression::{apply_progress, xp_to_next, Grant, Reward};
