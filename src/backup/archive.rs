//! Archive task executor.
//!
//! Moves records older than a cutoff out of the primary store into a new
//! archive database under the Arsiv folder. Copy-then-delete: the delete
//! is gated strictly behind a confirmed insert into the archive target, so
//! an interruption can duplicate records but never lose them.

use crate::backup::config::BackupConfig;
use crate::backup::filename;
use crate::backup::notify::Notification;
use crate::backup::result_error::error::Error;
use crate::backup::result_error::result::Result;
use crate::backup::store::Store;
use chrono::NaiveDateTime;
use std::fs;
use std::path::PathBuf;
use tracing::{error, info, warn};

/// Outcome of one archive task, as reported to the notification sink.
#[derive(Debug)]
pub struct ArchiveReport {
    pub moved_count: usize,
    pub path: Option<PathBuf>,
    pub success: bool,
    pub message: String,
}

pub struct ArchiveExecutor<'a, S: Store> {
    config: &'a BackupConfig,
    store: &'a S,
    notifier: &'a dyn Notification,
}

impl<'a, S: Store> ArchiveExecutor<'a, S> {
    pub fn new(config: &'a BackupConfig, store: &'a S, notifier: &'a dyn Notification) -> Self {
        Self {
            config,
            store,
            notifier,
        }
    }

    pub fn run_archive(&self, cutoff: NaiveDateTime, now: NaiveDateTime) -> ArchiveReport {
        self.notifier
            .notify_start("Arşivleme", "Kayıtlar arşivleniyor, lütfen bekleyin...");

        let report = match self.archive_inner(cutoff, now) {
            Ok((0, _)) => ArchiveReport {
                moved_count: 0,
                path: None,
                success: true,
                message: "Seçilen kritere uygun arşivlenecek kayıt bulunamadı.".to_string(),
            },
            Ok((moved, path)) => {
                info!("Archive finished: {moved} records moved");
                ArchiveReport {
                    moved_count: moved,
                    path,
                    success: true,
                    message: format!("{moved} adet kayıt başarıyla arşivlendi."),
                }
            }
            Err(e) => {
                error!("Archive failed: {e}");
                ArchiveReport {
                    moved_count: 0,
                    path: None,
                    success: false,
                    message: "Arşivleme sırasında bir hata oluştu!\nDetaylar hata kayıt dosyasına yazıldı."
                        .to_string(),
                }
            }
        };

        self.notifier.notify_complete(&report.message);
        report
    }

    fn archive_inner(
        &self,
        cutoff: NaiveDateTime,
        now: NaiveDateTime,
    ) -> Result<(usize, Option<PathBuf>)> {
        let records = self.store.select_before(cutoff)?;
        if records.is_empty() {
            return Ok((0, None));
        }

        let dest_dir = self.config.backup_root.join(filename::ARCHIVE_DIR);
        fs::create_dir_all(&dest_dir)?;
        let path = dest_dir.join(filename::archive_file_name(now));

        self.store
            .bulk_insert(&records, &path)
            .map_err(Error::archive_insert)?;

        // Rows are now safe in the archive; a failed delete only leaves
        // duplicates behind.
        if let Err(e) = self.store.delete_before(cutoff) {
            warn!("{}", e.archive_delete());
        }

        Ok((records.len(), Some(path)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backup::config::Frequency;
    use crate::backup::notify::{NullNotification, RecordingNotification};
    use crate::backup::store::tests::{cutoff, record};
    use crate::backup::store::{SqliteStore, VehicleRecord};
    use std::path::Path;

    fn test_config(dir: &Path) -> BackupConfig {
        BackupConfig {
            db_path: dir.join("arac_veritabani.db"),
            backup_root: dir.join("Yedekler"),
            compress: false,
            daily_retention: "45 Gün".to_string(),
            frequency: Frequency::Daily,
            last_backup_date: None,
        }
    }

    fn seeded_store(config: &BackupConfig) -> SqliteStore {
        let store = SqliteStore::open(&config.db_path).unwrap();
        store.insert_record(&record(1, "34AA111", "2023-04-01 08:30"));
        store.insert_record(&record(2, "34BB222", "2023-09-15 11:00"));
        store.insert_record(&record(3, "34CC333", "2025-02-10 09:15"));
        store
    }

    #[test]
    fn test_archive_moves_old_records() {
        let dir = tempfile::tempdir().unwrap();
        let config = test_config(dir.path());
        let store = seeded_store(&config);
        let notifier = RecordingNotification::new();

        let report = ArchiveExecutor::new(&config, &store, &notifier)
            .run_archive(cutoff(2024, 1, 1), cutoff(2025, 3, 10));

        assert!(report.success);
        assert_eq!(report.moved_count, 2);
        assert_eq!(report.message, "2 adet kayıt başarıyla arşivlendi.");
        assert_eq!(store.record_count(), 1);

        let path = report.path.unwrap();
        assert_eq!(
            path,
            config
                .backup_root
                .join("Arsiv")
                .join("arsiv_2025-03-10_00-00-00.db")
        );
        let archive = rusqlite::Connection::open(&path).unwrap();
        let count: i64 = archive
            .query_row("SELECT COUNT(*) FROM vehicles", [], |row| row.get(0))
            .unwrap();
        assert_eq!(count, 2);
    }

    #[test]
    fn test_archive_zero_records_creates_no_file() {
        let dir = tempfile::tempdir().unwrap();
        let config = test_config(dir.path());
        let store = SqliteStore::open(&config.db_path).unwrap();

        let report = ArchiveExecutor::new(&config, &store, &NullNotification)
            .run_archive(cutoff(2024, 1, 1), cutoff(2025, 3, 10));

        assert!(report.success);
        assert_eq!(report.moved_count, 0);
        assert!(report.path.is_none());
        assert!(!config.backup_root.join("Arsiv").exists());
    }

    struct FailingInsert(SqliteStore);

    impl Store for FailingInsert {
        fn snapshot_to(&self, dest: &Path) -> Result<PathBuf> {
            self.0.snapshot_to(dest)
        }
        fn select_before(&self, cutoff: NaiveDateTime) -> Result<Vec<VehicleRecord>> {
            self.0.select_before(cutoff)
        }
        fn bulk_insert(&self, _records: &[VehicleRecord], _target: &Path) -> Result<()> {
            Err(rusqlite::Error::InvalidQuery.into())
        }
        fn delete_before(&self, cutoff: NaiveDateTime) -> Result<usize> {
            self.0.delete_before(cutoff)
        }
        fn count_before(&self, cutoff: NaiveDateTime) -> Result<u64> {
            self.0.count_before(cutoff)
        }
        fn oldest_record_timestamp(&self) -> Result<Option<NaiveDateTime>> {
            self.0.oldest_record_timestamp()
        }
    }

    #[test]
    fn test_insert_failure_leaves_primary_untouched() {
        let dir = tempfile::tempdir().unwrap();
        let config = test_config(dir.path());
        let store = FailingInsert(seeded_store(&config));

        let report = ArchiveExecutor::new(&config, &store, &NullNotification)
            .run_archive(cutoff(2024, 1, 1), cutoff(2025, 3, 10));

        assert!(!report.success);
        assert_eq!(report.moved_count, 0);
        assert!(report.message.contains("hata oluştu"));
        // Deletion is gated behind a confirmed insert
        assert_eq!(store.0.record_count(), 3);
    }
}
