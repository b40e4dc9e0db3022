//! Read-only commands

use anyhow::Result;

use super::{print_json, Service};

pub async fn shop_command(service: &Service, user_id: i64, affordable_only: bool) -> Result<()> {
    let mut offers = service.shop_catalog(user_id)?;
    if affordable_only {
        offers.retain(|o| o.unlocked && o.affordable);
    }
    print_json(&offers)
}

pub async fn inventory_command(service: &Service, user_id: i64) -> Result<()> {
    print_json(&service.inventory(user_id)?)
}

pub async fn daily_command(service: &Service, user_id: i64) -> Result<()> {
    print_json(&service.daily_state(user_id)?)
}

pub async fn event_command(service: &Service, user_id: i64) -> Result<()> {
    print_json(&service.active_event(user_id)?)
}

pub async fn quests_command(service: &Service, user_id: i64) -> Result<()> {
    print_json(&service.quests(user_id)?)
}

pub async fn achievements_command(service: &Service, user_id: i64) -> Result<()> {
    print_json(&service.achievements(user_id)?)
}

pub async fn streak_command(service: &Service, user_id: i64) -> Result<()> {
    print_json(&service.streak(user_id)?)
}

pub async fn history_command(service: &Service, user_id: i64, limit: usize) -> Result<()> {
    print_json(&service.history(user_id, limit)?)
}

/// Show notification preferences, updating whichever flags were given
pub async fn prefs_command(
    service: &Service,
    user_id: i64,
    soft_nudges: Option<bool>,
    daily_report: Option<bool>,
) -> Result<()> {
    let mut prefs = service.notification_prefs(user_id)?;
    if soft_nudges.is_none() && daily_report.is_none() {
        return print_json(&prefs);
    }
    if let Some(v) = soft_nudges {
        prefs.soft_nudges = v;
    }
    if let Some(v) = daily_report {
        prefs.daily_report = v;
    }
    print_json(&service.set_notification_prefs(user_id, prefs)?)
}
