//! Claim command implementation

use anyhow::Result;
use clap::Subcommand;
use serde_json::json;

use super::{print_json, Service};

#[derive(Subcommand, Debug, Clone)]
pub enum ClaimTarget {
    /// Today's login bonus (also advances the streak)
    Login,
    /// The daily chest, once every task of the day is done
    Chest,
    /// The active live event reward
    Event,
    /// A completed achievement
    Achievement { key: String },
    /// The current step of a quest
    Quest { key: String },
}

pub async fn claim_command(service: &Service, user_id: i64, target: ClaimTarget) -> Result<()> {
    let outcome = match target {
        ClaimTarget::Login => service.claim_login_bonus(user_id)?,
        ClaimTarget::Chest => service.claim_daily_chest(user_id)?,
        ClaimTarget::Event => Some(service.claim_live_event(user_id)?),
        ClaimTarget::Achievement { key } => Some(service.claim_achievement(user_id, &key)?),
        ClaimTarget::Quest { key } => Some(service.claim_quest_step(user_id, &key)?),
    };

    match outcome {
        Some(outcome) => print_json(&outcome),
        None => print_json(&json!({ "claimed": false, "reason": "nothing to claim right now" })),
    }
}
