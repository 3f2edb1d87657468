//! # gate_backup
//!
//! Backup, retention and archival engine for a vehicle gate log database.
//!
//! ## Features
//!
//! - **Scheduled Backups**: nightly snapshot at local midnight, with an
//!   hourly fallback check for missed schedules
//! - **Monthly Snapshots**: an extra end-of-month snapshot named after the
//!   month that just ended
//! - **Hot Snapshots**: SQLite online backup API, no exclusive lock needed
//! - **Compression**: optional single-entry zip container per snapshot
//! - **Retention Management**: named retention options applied to the daily
//!   backup folder
//! - **Archival**: one-way move of aged records into a separate archive
//!   database, copy-then-delete
//!
//! ## Quick Start
//!
//! ```no_run
//! use gate_backup::backup::config::BackupConfig;
//! use gate_backup::backup::notify::LogNotification;
//! use gate_backup::backup::scheduler::Scheduler;
//! use gate_backup::backup::store::SqliteStore;
//!
//! // Load configuration from YAML file
//! let config = BackupConfig::load("config.yml")?;
//!
//! // Start the midnight scheduler loop
//! let store = SqliteStore::open(&config.db_path)?;
//! Scheduler::new(config, store, Box::new(LogNotification)).run();
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod backup;
