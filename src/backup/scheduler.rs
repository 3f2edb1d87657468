//! Backup scheduler.
//!
//! Single-threaded timer loop: sleep until the next local midnight, fire
//! the daily backup (plus the end-of-month monthly backup when due), then
//! re-arm. Re-arming never depends on the outcome of the fired task, and
//! at most one task is in flight at a time by construction.
//!
//! An hourly fallback check covers schedules missed while the process was
//! not running at midnight.

use crate::backup::config::{BackupConfig, Frequency};
use crate::backup::notify::Notification;
use crate::backup::result_error::error::Error;
use crate::backup::store::Store;
use crate::backup::task::{BackupExecutor, BackupTrigger};
use chrono::{Datelike, Days, Local, NaiveDate, NaiveDateTime, TimeZone, Weekday};
use std::time::Duration;
use tracing::{info, warn};

/// Fixed backoff before retrying a failed timer computation.
static SCHEDULE_RETRY_BACKOFF: Duration = Duration::from_secs(3600);
/// Cadence of the fallback due check between midnight firings.
static DUE_CHECK_INTERVAL: Duration = Duration::from_secs(3600);

pub struct Scheduler<S: Store> {
    config: BackupConfig,
    store: S,
    notifier: Box<dyn Notification>,
    /// Month (1-12) of the most recently completed monthly backup. Never
    /// cleared; month rollover makes the comparison against the current
    /// month fail, which re-enables the next monthly backup.
    monthly_backup_month: Option<u32>,
    /// Date of the most recent automatic backup; drives the fallback due
    /// check and status display.
    last_backup_date: Option<NaiveDate>,
}

impl<S: Store> Scheduler<S> {
    pub fn new(config: BackupConfig, store: S, notifier: Box<dyn Notification>) -> Self {
        let last_backup_date = config.last_backup_date;
        Self {
            config,
            store,
            notifier,
            monthly_backup_month: None,
            last_backup_date,
        }
    }

    pub fn last_backup_date(&self) -> Option<NaiveDate> {
        self.last_backup_date
    }

    fn executor(&self) -> BackupExecutor<'_, S> {
        BackupExecutor::new(&self.config, &self.store, self.notifier.as_ref())
    }

    /// Midnight handler: daily backup first, then the monthly backup when
    /// today is the month's last day and one has not been taken for this
    /// month yet. The two snapshots are independent files.
    pub fn on_midnight_fire(&mut self, now: NaiveDateTime) {
        let report = self.executor().run_backup(BackupTrigger::Daily, now);
        if report.success {
            self.last_backup_date = Some(now.date());
        }

        let today = now.date();
        if today.day() == last_day_of_month(today)
            && self.monthly_backup_month != Some(today.month())
        {
            let report = self.executor().run_backup(BackupTrigger::Monthly, now);
            if report.success {
                self.monthly_backup_month = Some(today.month());
            }
        }
    }

    /// Fallback safety net, run hourly between midnight firings.
    pub fn on_due_check(&mut self, now: NaiveDateTime) {
        let last = self.last_backup_date.unwrap_or(NaiveDate::MIN);
        if !check_due_now(self.config.frequency, last, now.date()) {
            return;
        }

        info!("Fallback check found an overdue backup (last: {last})");
        let trigger = match self.config.frequency {
            Frequency::Daily => BackupTrigger::Daily,
            Frequency::Weekly => BackupTrigger::Weekly,
            Frequency::Monthly => BackupTrigger::Monthly,
        };
        let report = self.executor().run_backup(trigger, now);
        if report.success {
            self.last_backup_date = Some(now.date());
        }
    }

    /// Blocking scheduler loop. Loops indefinitely; the next timer is
    /// re-armed after every firing regardless of the backup outcome.
    pub fn run(&mut self) {
        info!("Backup schedulers started");
        loop {
            let target_naive = next_midnight(Local::now().naive_local());
            let target = match Local.from_local_datetime(&target_naive).earliest() {
                Some(t) => t,
                None => {
                    let e = Error::Scheduling(format!(
                        "no local instant for {target_naive}, retrying in {SCHEDULE_RETRY_BACKOFF:?}"
                    ));
                    warn!("{e}");
                    std::thread::sleep(SCHEDULE_RETRY_BACKOFF);
                    continue;
                }
            };

            info!("Next daily backup scheduled for {target}");
            loop {
                let now = Local::now();
                if now >= target {
                    break;
                }
                let remaining = (target - now).to_std().unwrap_or(Duration::ZERO);
                std::thread::sleep(remaining.min(DUE_CHECK_INTERVAL));
                if Local::now() < target {
                    self.on_due_check(Local::now().naive_local());
                }
            }

            self.on_midnight_fire(Local::now().naive_local());
        }
    }
}

/// 00:00:00 of the calendar day after `now`.
pub fn next_midnight(now: NaiveDateTime) -> NaiveDateTime {
    (now.date() + Days::new(1))
        .and_hms_opt(0, 0, 0)
        .expect("midnight is always a valid time")
}

/// Day number of the last day of `date`'s month.
pub fn last_day_of_month(date: NaiveDate) -> u32 {
    let first_of_next = if date.month() == 12 {
        NaiveDate::from_ymd_opt(date.year() + 1, 1, 1)
    } else {
        NaiveDate::from_ymd_opt(date.year(), date.month() + 1, 1)
    }
    .expect("first of month is always a valid date");
    (first_of_next - Days::new(1)).day()
}

/// Whether an automatic backup is overdue. `Daily`: any later day.
/// `Weekly`: Sundays only. `Monthly`: the 1st of the month only. A backup
/// taken today is never due again today.
pub fn check_due_now(frequency: Frequency, last_backup_date: NaiveDate, today: NaiveDate) -> bool {
    match frequency {
        Frequency::Daily => today > last_backup_date,
        Frequency::Weekly => today.weekday() == Weekday::Sun && today > last_backup_date,
        Frequency::Monthly => today.day() == 1 && today > last_backup_date,
    }
}
