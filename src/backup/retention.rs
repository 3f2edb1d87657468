//! Retention policy for the daily backup folder.
//!
//! A named retention option maps to a day count; snapshots whose embedded
//! date is strictly older than `today - days` are deleted. A count of zero
//! (or less) means keep everything indefinitely.

use crate::backup::filename;
use crate::backup::result_error::result::Result;
use chrono::{Duration, NaiveDate};
use std::fs;
use std::path::Path;
use tracing::{debug, info};

/// Fallback when the configured option is not one of the known names.
pub static DEFAULT_RETENTION_DAYS: i64 = 45;

/// Day count for a named retention option. Unknown options fall back to
/// [`DEFAULT_RETENTION_DAYS`] rather than failing.
pub fn days_for(option: &str) -> i64 {
    match option {
        "7 Gün" => 7,
        "45 Gün" => 45,
        "90 Gün" => 90,
        "Tümünü Sakla" => 0,
        _ => DEFAULT_RETENTION_DAYS,
    }
}

/// Whether a snapshot dated `file_date` is past retention.
///
/// Always false for `cutoff_days <= 0`. The boundary is exclusive: a file
/// dated exactly `today - cutoff_days` is retained.
pub fn is_expired(file_date: NaiveDate, cutoff_days: i64, today: NaiveDate) -> bool {
    if cutoff_days <= 0 {
        return false;
    }
    file_date < today - Duration::days(cutoff_days)
}

/// Deletes expired snapshots in `dir` matching the `base` name prefix and
/// the `.db`/`.zip` extensions. Returns the number of files removed.
///
/// Names that do not parse (monthly labels, unrelated files) are skipped;
/// the directory listing is the only ledger of existing backups.
pub fn cleanup_dir(dir: &Path, cutoff_days: i64, base: &str, today: NaiveDate) -> Result<usize> {
    if cutoff_days <= 0 {
        return Ok(0);
    }

    let mut removed = 0;
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        let name = entry.file_name();
        let Some(name) = name.to_str() else { continue };
        let Some(file_date) = filename::parse_backup_date(name, base) else {
            debug!("skipping undated file in backup folder: {name}");
            continue;
        };
        if is_expired(file_date, cutoff_days, today) {
            fs::remove_file(entry.path())?;
            info!("Removed out of retention backup {:?}", entry.path());
            removed += 1;
        }
    }

    Ok(removed)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_days_for_known_options() {
        assert_eq!(days_for("7 Gün"), 7);
        assert_eq!(days_for("45 Gün"), 45);
        assert_eq!(days_for("90 Gün"), 90);
        assert_eq!(days_for("Tümünü Sakla"), 0);
    }

    #[test]
    fn test_days_for_unknown_option_falls_back() {
        assert_eq!(days_for("14 Gün"), DEFAULT_RETENTION_DAYS);
        assert_eq!(days_for(""), DEFAULT_RETENTION_DAYS);
    }

    #[test]
    fn test_is_expired_keep_all() {
        let ancient = date(1990, 1, 1);
        assert!(!is_expired(ancient, 0, date(2025, 3, 10)));
        assert!(!is_expired(ancient, -5, date(2025, 3, 10)));
    }

    #[test]
    fn test_is_expired_exclusive_boundary() {
        let today = date(2025, 3, 10);
        // Exactly cutoff_days old: retained
        assert!(!is_expired(date(2025, 3, 3), 7, today));
        // One day older: expired
        assert!(is_expired(date(2025, 3, 2), 7, today));
    }

    #[test]
    fn test_cleanup_dir_removes_only_expired() {
        let dir = tempfile::tempdir().unwrap();
        let base = "arac_veritabani";
        let old = dir.path().join("arac_veritabani_2025-03-02_00-00-10.db");
        let recent = dir.path().join("arac_veritabani_2025-03-03_00-00-10.zip");
        let monthly = dir.path().join("arac_veritabani_2025_01_Ocak.db");
        let unrelated = dir.path().join("notlar.txt");
        for p in [&old, &recent, &monthly, &unrelated] {
            std::fs::write(p, b"x").unwrap();
        }

        let removed = cleanup_dir(dir.path(), 7, base, date(2025, 3, 10)).unwrap();

        assert_eq!(removed, 1);
        assert!(!old.exists());
        assert!(recent.exists());
        assert!(monthly.exists());
        assert!(unrelated.exists());
    }

    #[test]
    fn test_cleanup_dir_keep_all_touches_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let old = dir.path().join("arac_veritabani_1999-01-01_00-00-00.db");
        std::fs::write(&old, b"x").unwrap();

        let removed = cleanup_dir(dir.path(), 0, "arac_veritabani", date(2025, 3, 10)).unwrap();

        assert_eq!(removed, 0);
        assert!(old.exists());
    }
}
