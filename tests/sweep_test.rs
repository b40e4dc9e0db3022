//! Background sweeps over every stored pet

mod common;

use chrono::Duration;

use common::create_game;
use petkeeper::domain::NotificationPrefs;
use petkeeper::service::NudgeReason;

#[test]
fn test_decay_all_reports_counts() {
    let game = create_game();
    game.service.get_or_create_pet(1).unwrap();
    game.service.get_or_create_pet(2).unwrap();

    let report = game.service.decay_all().unwrap();
    assert_eq!(report.pets_seen, 2);
    assert_eq!(report.pets_decayed, 0);

    game.clock().advance(Duration::hours(1));
    let report = game.service.decay_all().unwrap();
    assert_eq!(report.pets_decayed, 2);
    assert_eq!(report.failures, 0);
    assert!(game.service.get_or_create_pet(1).unwrap().pet.vitals.hunger < 80);
}

#[test]
fn test_nudges_respect_preferences() {
    let game = create_game();
    game.service.get_or_create_pet(1).unwrap();
    game.service
        .set_notification_prefs(
            2,
            NotificationPrefs {
                soft_nudges: false,
                daily_report: true,
            },
        )
        .unwrap();

    assert!(game.service.soft_nudge_sweep().unwrap().is_empty());

    for _ in 0..3 {
        game.clock().advance(Duration::hours(6));
        game.service.decay_all().unwrap();
    }

    let nudges = game.service.soft_nudge_sweep().unwrap();
    assert_eq!(nudges.len(), 1);
    assert_eq!(nudges[0].user_id, 1);
    assert!(nudges[0].reasons.contains(&NudgeReason::Hungry));
    assert!(nudges[0].reasons.contains(&NudgeReason::Tired));

    let history = game.service.history(1, 1).unwrap();
    assert_eq!(history[0].action, "soft_nudge");
}

#[test]
fn test_daily_report_lists_opted_in_pets() {
    let game = create_game();
    game.service.perform_action(1, "feed").unwrap();
    game.service
        .set_notification_prefs(
            2,
            NotificationPrefs {
                soft_nudges: true,
                daily_report: false,
            },
        )
        .unwrap();

    let reports = game.service.daily_report_sweep().unwrap();
    assert_eq!(reports.len(), 1);
    assert_eq!(reports[0].user_id, 1);
    assert_eq!(reports[0].tasks_total, 3);
    assert_eq!(reports[0].tasks_completed, 0);

    let history = game.service.history(1, 1).unwrap();
    assert_eq!(history[0].action, "daily_report");
}

#[test]
fn test_state_survives_reopen() {
    let game = create_game();
    game.service.perform_action(1, "feed").unwrap();
    let path = game.dir.path().join("pets.db");

    let reopened = petkeeper::store::SqliteStore::open(&path).unwrap();
    let service = petkeeper::service::GameService::new(
        reopened,
        petkeeper::service::ManualClock::new(common::start_time()),
        &common::test_config(),
    );
    let view = service.get_or_create_pet(1).unwrap();
    assert_eq!(view.pet.vitals.hunger, 98);
    assert_eq!(view.pet.coins, 1002);
}
