//! Scheduler command implementation
//!
//! Runs the periodic sweeps until Ctrl-C:
//! - decay for every pet
//! - soft nudges for pets that need care
//! - one daily report per UTC day at the configured hour

use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use chrono::{DateTime, Timelike, Utc};
use tokio::time::{interval, MissedTickBehavior};
use tracing::{error, info, warn};

use petkeeper::config::SchedulerSettings;
use petkeeper::error::GameResult;
use petkeeper::service::Clock;
use petkeeper::time_bucket::day_key;

use super::{print_json, Service};

/// How often the daily report hour is checked
const REPORT_CHECK_SECS: u64 = 60;

/// Tracks the one daily report per UTC day
#[derive(Debug, Clone)]
pub struct ReportSchedule {
    hour_utc: u32,
    last_sent_day: Option<String>,
}

impl ReportSchedule {
    pub fn new(hour_utc: u32) -> Self {
        Self {
            hour_utc,
            last_sent_day: None,
        }
    }

    /// Whether the daily report should go out now
    pub fn is_due(&self, now: DateTime<Utc>) -> bool {
        now.hour() == self.hour_utc && self.last_sent_day.as_deref() != Some(day_key(now).as_str())
    }

    /// Record a report that went out. A failed sweep is not recorded and
    /// is retried on the next check within the hour.
    pub fn mark_sent(&mut self, now: DateTime<Utc>) {
        self.last_sent_day = Some(day_key(now));
    }
}

async fn run_sweep<T, F>(service: &Arc<Service>, name: &'static str, f: F) -> Option<T>
where
    F: FnOnce(&Service) -> GameResult<T> + Send + 'static,
    T: Send + 'static,
{
    let svc = Arc::clone(service);
    match tokio::task::spawn_blocking(move || f(&svc)).await {
        Ok(Ok(value)) => Some(value),
        Ok(Err(e)) => {
            warn!("{} failed: {}", name, e);
            None
        }
        Err(e) => {
            error!("{} task panicked: {}", name, e);
            None
        }
    }
}

/// Run the sweeps forever
pub async fn scheduler_command(service: Service, settings: &SchedulerSettings) -> Result<()> {
    let service = Arc::new(service);

    let mut decay = interval(Duration::from_secs(settings.decay_interval_secs));
    let mut nudges = interval(Duration::from_secs(settings.nudge_interval_secs));
    let mut report_check = interval(Duration::from_secs(REPORT_CHECK_SECS));
    for timer in [&mut decay, &mut nudges, &mut report_check] {
        timer.set_missed_tick_behavior(MissedTickBehavior::Delay);
    }

    let mut reports = ReportSchedule::new(settings.daily_report_hour_utc);

    info!(
        decay_secs = settings.decay_interval_secs,
        nudge_secs = settings.nudge_interval_secs,
        report_hour = settings.daily_report_hour_utc,
        "Scheduler started"
    );

    loop {
        tokio::select! {
            _ = decay.tick() => {
                run_sweep(&service, "decay sweep", |s| s.decay_all()).await;
            }
            _ = nudges.tick() => {
                if let Some(created) = run_sweep(&service, "nudge sweep", |s| s.soft_nudge_sweep()).await {
                    for nudge in &created {
                        print_json(nudge)?;
                    }
                }
            }
            _ = report_check.tick() => {
                let now = service.clock().now();
                if reports.is_due(now)
                    && run_sweep(&service, "daily report", |s| s.daily_report_sweep()).await.is_some()
                {
                    reports.mark_sent(now);
                }
            }
            _ = tokio::signal::ctrl_c() => {
                info!("Shutting down scheduler");
                break;
            }
        }
    }

    Ok(())
}

/// One decay pass, for cron-style setups
pub async fn decay_all_command(service: &Service) -> Result<()> {
    let report = service.decay_all()?;
    print_json(&report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_report_due_once_per_day_at_hour() {
        let at_seven = Utc.with_ymd_and_hms(2026, 4, 2, 7, 15, 0).unwrap();
        let at_eight = Utc.with_ymd_and_hms(2026, 4, 2, 8, 0, 0).unwrap();
        let next_day = Utc.with_ymd_and_hms(2026, 4, 3, 7, 0, 0).unwrap();

        let mut reports = ReportSchedule::new(7);
        assert!(reports.is_due(at_seven));
        assert!(!reports.is_due(at_eight));

        reports.mark_sent(at_seven);
        assert!(!reports.is_due(at_seven + chrono::Duration::minutes(1)));
        assert!(reports.is_due(next_day));
    }

    #[test]
    fn test_unsent_report_stays_due() {
        let at_seven = Utc.with_ymd_and_hms(2026, 4, 2, 7, 0, 0).unwrap();
        let reports = ReportSchedule::new(7);

        // Nothing recorded after a failed sweep, so the next check retries
        assert!(reports.is_due(at_seven));
        assert!(reports.is_due(at_seven + chrono::Duration::minutes(1)));
    }
}
