//! Backup task executor.
//!
//! Given a trigger, produces one snapshot file in the right destination
//! subfolder, optionally zipped, and applies retention cleanup for daily
//! backups. All failures are caught at the task boundary and turned into a
//! report; nothing here can take down the scheduler.

use crate::backup::config::BackupConfig;
use crate::backup::filename;
use crate::backup::notify::Notification;
use crate::backup::result_error::error::Error;
use crate::backup::result_error::result::Result;
use crate::backup::retention;
use crate::backup::store::Store;
use chrono::NaiveDateTime;
use std::fs;
use std::fs::File;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{error, info, warn};
use zip::write::SimpleFileOptions;

/// Why a backup task was started. Decides the destination subfolder and
/// the filename format; consumed once per run, never persisted.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BackupTrigger {
    Manual,
    Daily,
    Weekly,
    Monthly,
}

impl BackupTrigger {
    pub fn subdir(self) -> &'static str {
        match self {
            BackupTrigger::Manual => filename::MANUAL_DIR,
            BackupTrigger::Daily => filename::DAILY_DIR,
            BackupTrigger::Weekly => filename::WEEKLY_DIR,
            BackupTrigger::Monthly => filename::MONTHLY_DIR,
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            BackupTrigger::Manual => "Manuel Yedekleme",
            BackupTrigger::Daily | BackupTrigger::Weekly => "Yedekleme",
            BackupTrigger::Monthly => "Aylık Yedekleme",
        }
    }
}

// The engine can hold a transient handle on the staged snapshot right
// after the copy finishes.
static TEMP_CLEANUP_GRACE: Duration = Duration::from_millis(200);

/// Outcome of one backup task, as reported to the notification sink.
#[derive(Debug)]
pub struct BackupReport {
    pub path: Option<PathBuf>,
    pub success: bool,
    pub message: String,
}

pub struct BackupExecutor<'a, S: Store> {
    config: &'a BackupConfig,
    store: &'a S,
    notifier: &'a dyn Notification,
}

impl<'a, S: Store> BackupExecutor<'a, S> {
    pub fn new(config: &'a BackupConfig, store: &'a S, notifier: &'a dyn Notification) -> Self {
        Self {
            config,
            store,
            notifier,
        }
    }

    pub fn run_backup(&self, trigger: BackupTrigger, now: NaiveDateTime) -> BackupReport {
        self.notifier
            .notify_start(trigger.title(), "Yedekleme yapılıyor, lütfen bekleyin...");

        let report = match self.backup_inner(trigger, now) {
            Ok(path) => {
                info!("Backup finished: {:?}", path);
                let file_name = path
                    .file_name()
                    .and_then(|n| n.to_str())
                    .unwrap_or_default();
                BackupReport {
                    message: format!("Yedekleme başarıyla tamamlandı.\nKonum: {file_name}"),
                    path: Some(path),
                    success: true,
                }
            }
            Err(e) => {
                error!("Backup failed: {e}");
                BackupReport {
                    path: None,
                    success: false,
                    message: "Yedekleme sırasında hata oluştu!".to_string(),
                }
            }
        };

        self.notifier.notify_complete(&report.message);
        report
    }

    fn backup_inner(&self, trigger: BackupTrigger, now: NaiveDateTime) -> Result<PathBuf> {
        let dest_dir = self.config.backup_root.join(trigger.subdir());
        fs::create_dir_all(&dest_dir)?;

        let base = self.config.db_base_name();
        let file_name = match trigger {
            BackupTrigger::Monthly => {
                filename::monthly_file_name(base, now.date(), self.config.compress)
            }
            _ => filename::stamped_file_name(base, now, self.config.compress),
        };
        let final_path = dest_dir.join(&file_name);

        // Snapshot into a working directory first; a partial write must
        // never land in the destination folder.
        let workdir = tempfile::Builder::new().prefix("yedek-").tempdir()?;
        let staged = workdir.path().join(format!("{base}.db"));
        self.store.snapshot_to(&staged).map_err(Error::snapshot)?;

        if self.config.compress {
            if let Err(e) = compress_to_zip(&staged, &final_path, &format!("{base}.db")) {
                let _ = fs::remove_file(&final_path);
                return Err(e.compression());
            }
        } else {
            fs::copy(&staged, &final_path).map_err(|e| Error::from(e).snapshot())?;
        }

        // A failed temp cleanup never flips a successful backup.
        std::thread::sleep(TEMP_CLEANUP_GRACE);
        if let Err(e) = workdir.close() {
            warn!("Temp cleanup failed, leaving stale workdir behind: {e}");
        }

        if trigger == BackupTrigger::Daily {
            let days = retention::days_for(&self.config.daily_retention);
            match retention::cleanup_dir(&dest_dir, days, base, now.date()) {
                Ok(0) => {}
                Ok(n) => info!("Retention cleanup removed {n} old daily backups"),
                Err(e) => warn!("Retention cleanup failed: {e}"),
            }
        }

        Ok(final_path)
    }
}

fn compress_to_zip(src: &Path, dest: &Path, entry_name: &str) -> Result<()> {
    let file = File::create(dest)?;
    let mut writer = zip::ZipWriter::new(file);
    let options =
        SimpleFileOptions::default().compression_method(zip::CompressionMethod::Deflated);
    writer.start_file(entry_name, options)?;
    let mut reader = File::open(src)?;
    io::copy(&mut reader, &mut writer)?;
    writer.finish()?;
    Ok(())
}
