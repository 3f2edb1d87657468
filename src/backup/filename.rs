//! On-disk naming for backup and archive files.
//!
//! Every produced file name and every name parsed back (for retention
//! cleanup) goes through this module, so the format can change without
//! touching the executors.
//!
//! Formats:
//! - Manual/Daily/Weekly snapshot: `{base}_{YYYY-MM-DD_HH-MM-SS}.{db|zip}`
//! - Monthly snapshot: `{base}_{year}_{month:02}_{month_name}.{db|zip}`,
//!   named after the previous calendar month
//! - Archive store: `arsiv_{YYYY-MM-DD_HH-MM-SS}.db`

use chrono::{Datelike, NaiveDate, NaiveDateTime};

pub static MANUAL_DIR: &str = "Manuel";
pub static DAILY_DIR: &str = "Gunluk";
pub static WEEKLY_DIR: &str = "Haftalik";
pub static MONTHLY_DIR: &str = "Aylik";
pub static ARCHIVE_DIR: &str = "Arsiv";

/// Localized month names used in monthly snapshot labels.
pub static MONTH_NAMES: [&str; 12] = [
    "Ocak", "Şubat", "Mart", "Nisan", "Mayıs", "Haziran", "Temmuz", "Ağustos", "Eylül", "Ekim",
    "Kasım", "Aralık",
];

static ARCHIVE_PREFIX: &str = "arsiv";
static STAMP_FORMAT: &str = "%Y-%m-%d_%H-%M-%S";
static DATE_FORMAT: &str = "%Y-%m-%d";

pub fn snapshot_ext(compress: bool) -> &'static str {
    if compress {
        "zip"
    } else {
        "db"
    }
}

/// File name for a Manual/Daily/Weekly snapshot taken at `now`.
pub fn stamped_file_name(base: &str, now: NaiveDateTime, compress: bool) -> String {
    format!(
        "{}_{}.{}",
        base,
        now.format(STAMP_FORMAT),
        snapshot_ext(compress)
    )
}

/// The calendar month preceding `today`, as (year, month).
pub fn previous_month(today: NaiveDate) -> (i32, u32) {
    if today.month() > 1 {
        (today.year(), today.month() - 1)
    } else {
        (today.year() - 1, 12)
    }
}

/// Period label for a monthly snapshot taken on `today`, e.g. `2025_01_Ocak`.
///
/// The monthly snapshot summarizes the month that just ended, so the label
/// names the previous month even though the file is written on the last day
/// of the current one.
pub fn monthly_period_label(today: NaiveDate) -> String {
    let (year, month) = previous_month(today);
    format!(
        "{}_{:02}_{}",
        year,
        month,
        MONTH_NAMES[(month - 1) as usize]
    )
}

pub fn monthly_file_name(base: &str, today: NaiveDate, compress: bool) -> String {
    format!(
        "{}_{}.{}",
        base,
        monthly_period_label(today),
        snapshot_ext(compress)
    )
}

/// File name for an archive store created at `now`. Always uncompressed.
pub fn archive_file_name(now: NaiveDateTime) -> String {
    format!("{}_{}.db", ARCHIVE_PREFIX, now.format(STAMP_FORMAT))
}

/// Extracts the snapshot date from a backup file name.
///
/// Accepts `.db` and `.zip` files whose name starts with `{base}_`; the
/// date is the leading `YYYY-MM-DD` of the embedded timestamp. Returns
/// `None` for anything else, including monthly period labels, which share
/// the prefix but carry no day component.
pub fn parse_backup_date(file_name: &str, base: &str) -> Option<NaiveDate> {
    let stem = file_name
        .strip_suffix(".db")
        .or_else(|| file_name.strip_suffix(".zip"))?;
    let stamp = stem.strip_prefix(base)?.strip_prefix('_')?;
    let date_part = stamp.get(..10)?;
    NaiveDate::parse_from_str(date_part, DATE_FORMAT).ok()
}
