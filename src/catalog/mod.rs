//! Static game catalogs

pub mod minigames;
pub mod shop;

pub use minigames::{
    find_game, score_play, GameType, MinigameCategory, MinigameResult, PlayMode, ScoredPlay,
};
pub use shop::{
    find_item, item_effect, item_title, price_for_level, ItemCategory, ItemEffect, ShopItem,
    CATALOG,
};
