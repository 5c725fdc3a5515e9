//! Window scheduling.
//!
//! Two independent periodic concerns, both funneled through the shared
//! session lock:
//!
//! 1. The daily open trigger fires at a configured local time in the
//!    reference timezone, skipping excluded weekdays (log only, no state
//!    change on skip).
//! 2. The expiry poll wakes on a fixed interval and closes the window
//!    once the deadline has passed. Closing is idempotent, so a poll that
//!    arrives late or twice is harmless.
//!
//! Deadlines are re-derived from the persisted window on restart; nothing
//! here re-arms a close from a wall-clock delay computed at open time.

use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration as StdDuration;

use chrono::{DateTime, Datelike, Duration, NaiveTime, TimeZone, Utc, Weekday};
use chrono_tz::Tz;

use crate::config::Config;
use crate::error::ConfigError;
use crate::session::{Notifier, SharedSession};

/// Everything the two scheduler tasks need, parsed out of [`Config`] once
/// at startup.
#[derive(Debug, Clone)]
pub struct SchedulerParams {
    pub tz: Tz,
    pub open_at: NaiveTime,
    pub excluded: HashSet<Weekday>,
    pub duration: Duration,
    pub poll_interval: StdDuration,
    pub poll_initial_delay: StdDuration,
}

impl SchedulerParams {
    pub fn from_config(config: &Config) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            tz: config.timezone()?,
            open_at: config.open_time()?,
            excluded: config.excluded_days()?,
            duration: config.collection_duration(),
            poll_interval: StdDuration::from_secs(config.expiry_poll_interval_seconds),
            poll_initial_delay: StdDuration::from_secs(config.expiry_poll_initial_delay_seconds),
        })
    }
}

/// Next occurrence of `open_at` in `tz`, rolling to tomorrow if today's
/// occurrence has already passed.
///
/// DST gaps (a local time that does not exist on that day) are skipped
/// forward by an hour; ambiguous local times take the earlier instant.
pub fn next_open_instant(now: DateTime<Utc>, tz: Tz, open_at: NaiveTime) -> DateTime<Utc> {
    let local_now = now.with_timezone(&tz);
    let today = local_now.date_naive();
    let date = if local_now.time() < open_at {
        today
    } else {
        today.succ_opt().unwrap_or(today)
    };
    let candidate = date.and_time(open_at);

    match tz.from_local_datetime(&candidate).earliest() {
        Some(instant) => instant.with_timezone(&Utc),
        None => {
            let shifted = candidate + Duration::hours(1);
            tz.from_local_datetime(&shifted)
                .earliest()
                .map(|instant| instant.with_timezone(&Utc))
                .unwrap_or(now + Duration::days(1))
        }
    }
}

/// Whether the daily open should be skipped at this instant.
pub fn is_excluded_day(at: DateTime<Utc>, tz: Tz, excluded: &HashSet<Weekday>) -> bool {
    excluded.contains(&at.with_timezone(&tz).weekday())
}

/// Daily open trigger. Sleeps until the next local open time, then either
/// opens the window or skips the excluded weekday.
pub async fn run_daily_open(
    session: SharedSession,
    notifier: Arc<dyn Notifier>,
    params: SchedulerParams,
) {
    loop {
        let now = Utc::now();
        let next = next_open_instant(now, params.tz, params.open_at);
        let wait = (next - now).to_std().unwrap_or_default();
        tracing::info!(next_open = %next, "daily open scheduled");
        tokio::time::sleep(wait).await;

        let fired_at = Utc::now();
        if is_excluded_day(fired_at, params.tz, &params.excluded) {
            tracing::info!(
                weekday = %fired_at.with_timezone(&params.tz).weekday(),
                "daily open skipped on excluded weekday"
            );
            continue;
        }

        let opened = {
            let mut session = session.lock().await;
            session.open_window(fired_at, params.duration)
        };
        match opened {
            Ok(note) => {
                if let Err(err) = notifier.deliver(&note) {
                    tracing::warn!(error = %err, "failed to deliver open notification");
                }
            }
            Err(err) => tracing::warn!(error = %err, "scheduled open rejected"),
        }
    }
}

/// Expiry poll. After the initial delay, checks the deadline on every
/// interval tick; only the tick that closes the window produces a
/// notification.
pub async fn run_expiry_poll(
    session: SharedSession,
    notifier: Arc<dyn Notifier>,
    params: SchedulerParams,
) {
    tokio::time::sleep(params.poll_initial_delay).await;
    let mut ticker = tokio::time::interval(params.poll_interval);
    loop {
        ticker.tick().await;
        let closed = {
            let mut session = session.lock().await;
            session.check_expiry(Utc::now())
        };
        if let Some(note) = closed {
            if let Err(err) = notifier.deliver(&note) {
                tracing::warn!(error = %err, "failed to deliver close notification");
            }
        } else {
            tracing::debug!("expiry poll: nothing to close");
        }
    }
}
