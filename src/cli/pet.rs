//! Commands that act on the pet

use anyhow::Result;

use petkeeper::catalog::{MinigameResult, PlayMode};

use super::{print_json, Service};

/// Show the pet after applying pending decay
pub async fn state_command(service: &Service, user_id: i64) -> Result<()> {
    let view = service.tick(user_id)?;
    print_json(&view)
}

pub async fn act_command(service: &Service, user_id: i64, action: &str) -> Result<()> {
    let outcome = service.perform_action(user_id, action)?;
    print_json(&outcome)
}

pub async fn use_command(service: &Service, user_id: i64, item: &str) -> Result<()> {
    let outcome = service.perform_item_use(user_id, item)?;
    print_json(&outcome)
}

pub async fn minigame_command(
    service: &Service,
    user_id: i64,
    game_type: String,
    score: u32,
    elapsed_ms: u64,
    mode: &str,
) -> Result<()> {
    let mode: PlayMode = mode.parse()?;
    let result = MinigameResult {
        game_type,
        score,
        elapsed_ms,
        mode,
    };
    let outcome = service.perform_minigame(user_id, &result)?;
    print_json(&outcome)
}

pub async fn buy_command(service: &Service, user_id: i64, item: &str) -> Result<()> {
    let purchase = service.buy_shop_item(user_id, item)?;
    print_json(&purchase)
}
