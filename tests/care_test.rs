//! End-to-end care flows: actions, decay, minigames, items and the shop

mod common;

use chrono::Duration;

use common::{create_game, create_game_with, test_config};
use petkeeper::catalog::{MinigameResult, PlayMode};
use petkeeper::domain::StatField;
use petkeeper::error::GameError;
use petkeeper::service::{BonusRoller, Notification};

#[test]
fn test_new_pet_starts_with_defaults() {
    let game = create_game();
    let view = game.service.get_or_create_pet(1).unwrap();

    assert_eq!(view.pet.level, 1);
    assert_eq!(view.pet.coins, 1000);
    assert_eq!(view.pet.vitals.hunger, 80);
    assert_eq!(view.xp_to_next, 50);

    let history = game.service.history(1, 10).unwrap();
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].action, "pet_created");
}

#[test]
fn test_feed_updates_stats_reward_and_task() {
    let game = create_game();
    let outcome = game.service.perform_action(1, "feed").unwrap();

    assert_eq!(outcome.pet.pet.vitals.hunger, 98);
    assert_eq!(outcome.pet.pet.xp, 5);
    assert_eq!(outcome.pet.pet.coins, 1002);
    let reward = outcome.reward.unwrap();
    assert_eq!(reward.xp, 5);
    assert_eq!(reward.coins, 2);

    let feed = outcome.daily.tasks.iter().find(|t| t.key == "feed_count").unwrap();
    assert_eq!(feed.progress, 1);
    assert!(!feed.completed);

    let history = game.service.history(1, 1).unwrap();
    assert_eq!(history[0].action, "action");
    assert_eq!(history[0].payload["action"], "feed");
}

#[test]
fn test_unknown_action_is_rejected() {
    let game = create_game();
    let err = game.service.perform_action(1, "dance").unwrap_err();
    assert!(matches!(err, GameError::InvalidInput(_)));
}

#[test]
fn test_six_hours_idle_decay() {
    let game = create_game();
    game.service.get_or_create_pet(1).unwrap();

    game.clock().advance(Duration::hours(6));
    let view = game.service.tick(1).unwrap();

    assert_eq!(view.pet.vitals.hunger, 51);
    assert_eq!(view.pet.vitals.energy, 56);
    assert_eq!(view.pet.vitals.hygiene, 51);
    assert_eq!(view.pet.vitals.happiness, 71);
    assert_eq!(view.pet.vitals.health, 85);
    assert!(!view.lonely);

    // A second tick at the same instant changes nothing
    let again = game.service.tick(1).unwrap();
    assert_eq!(again.pet.vitals, view.pet.vitals);
}

#[test]
fn test_get_or_create_does_not_decay() {
    let game = create_game();
    game.service.get_or_create_pet(1).unwrap();
    game.clock().advance(Duration::hours(6));

    let view = game.service.get_or_create_pet(1).unwrap();
    assert_eq!(view.pet.vitals.hunger, 80);
}

#[test]
fn test_minigame_win_restores_energy() {
    let game = create_game();
    let result = MinigameResult {
        game_type: "hangman".to_string(),
        score: 5,
        elapsed_ms: 9000,
        mode: PlayMode::Classic,
    };
    let outcome = game.service.perform_minigame(1, &result).unwrap();

    assert_eq!(outcome.pet.pet.vitals.energy, 97);
    assert_eq!(outcome.pet.pet.intelligence, 2);
    assert!(outcome
        .notifications
        .iter()
        .any(|n| matches!(n, Notification::EnergyRestored { amount: 12 })));
    let task = outcome.daily.tasks.iter().find(|t| t.key == "minigame_count").unwrap();
    assert!(task.completed);
}

#[test]
fn test_invalid_minigame_changes_nothing() {
    let game = create_game();
    let result = MinigameResult {
        game_type: "chess".to_string(),
        score: 3,
        elapsed_ms: 4000,
        mode: PlayMode::Classic,
    };
    assert!(matches!(
        game.service.perform_minigame(1, &result),
        Err(GameError::InvalidInput(_))
    ));
    assert!(game.service.history(1, 10).unwrap().is_empty());
}

#[test]
fn test_use_item_consumes_inventory() {
    let game = create_game();
    let outcome = game.service.perform_item_use(1, "food_apple").unwrap();
    assert!(outcome.pet.pet.vitals.hunger > 80);

    let apples = game
        .service
        .inventory(1)
        .unwrap()
        .into_iter()
        .find(|line| line.key == "food_apple")
        .unwrap();
    assert_eq!(apples.quantity, 7);

    assert!(game.service.perform_item_use(1, "food_truffle").is_err());
}

#[test]
fn test_item_intelligence_counts_twice() {
    let game = create_game();
    game.service.get_or_create_pet(1).unwrap();
    game.give_item(1, "toy_robot", 1);

    let outcome = game.service.perform_item_use(1, "toy_robot").unwrap();

    // The effect adds 5 and the use reward grants the same 5 again
    assert_eq!(outcome.reward.unwrap().intelligence, 5);
    assert_eq!(outcome.pet.pet.intelligence, 10);
    assert!(outcome
        .changes
        .iter()
        .any(|c| c.field == StatField::Intelligence && c.delta == 5));
}

#[test]
fn test_buy_item() {
    let game = create_game();
    let purchase = game.service.buy_shop_item(1, "food_apple").unwrap();

    assert_eq!(purchase.price, 9);
    assert_eq!(purchase.quantity, 9);
    assert_eq!(purchase.pet.pet.coins, 991);
}

#[test]
fn test_purchase_errors_roll_back() {
    let game = create_game();
    game.service.get_or_create_pet(1).unwrap();
    game.clock().advance(Duration::hours(6));

    let err = game.service.buy_shop_item(1, "food_truffle").unwrap_err();
    assert!(matches!(err, GameError::NotEligible(_)));
    let err = game.service.buy_shop_item(1, "food_unicorn").unwrap_err();
    assert!(matches!(err, GameError::NotFound { .. }));

    // Decay from the failed requests was not persisted
    let view = game.service.get_or_create_pet(1).unwrap();
    assert_eq!(view.pet.vitals.hunger, 80);
    assert_eq!(view.pet.coins, 1000);
    assert!(game
        .service
        .history(1, 10)
        .unwrap()
        .iter()
        .all(|entry| entry.action != "buy"));
}

#[test]
fn test_purchase_without_coins() {
    let mut config = test_config();
    config.game.starting_coins = 5;
    let game = create_game_with(config);

    let err = game.service.buy_shop_item(1, "food_apple").unwrap_err();
    assert!(matches!(err, GameError::NotEligible(_)));
    assert_eq!(game.service.get_or_create_pet(1).unwrap().pet.coins, 5);
}

#[test]
fn test_bonus_event_always_fires_at_full_chance() {
    let game = create_game();
    let service = game.service.with_bonus_roller(BonusRoller::new(1.0, Some(7)));

    let outcome = service.perform_action(1, "feed").unwrap();
    assert!(outcome
        .notifications
        .iter()
        .any(|n| matches!(n, Notification::BonusEvent { .. })));

    let history = service.history(1, 1).unwrap();
    assert!(history[0].payload["bonus"].is_string());
}

#[test]
fn test_players_are_independent() {
    let game = create_game();
    game.service.perform_action(1, "feed").unwrap();
    let other = game.service.get_or_create_pet(2).unwrap();

    assert_eq!(other.pet.coins, 1000);
    assert_eq!(other.pet.vitals.hunger, 80);
}
