use chrono::{Local, NaiveDate};
use clap::{Parser, Subcommand};
use gate_backup::backup::archive::ArchiveExecutor;
use gate_backup::backup::config::BackupConfig;
use gate_backup::backup::notify::LogNotification;
use gate_backup::backup::result_error::result::Result;
use gate_backup::backup::result_error::WithMsg;
use gate_backup::backup::scheduler::Scheduler;
use gate_backup::backup::store::{SqliteStore, Store};
use gate_backup::backup::task::{BackupExecutor, BackupTrigger};
use std::path::PathBuf;
use std::process::exit;
use tracing::{error, info};

/// Backup, retention and archival tool for a vehicle gate log database
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Location of config file
    #[arg(short, long)]
    config: PathBuf,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the midnight backup scheduler loop
    Run,
    /// Take a one-off manual backup
    Backup,
    /// Move records older than midnight of the given date into an archive file
    Archive {
        /// Cutoff date, YYYY-MM-DD
        #[arg(long)]
        before: NaiveDate,
    },
}

fn main() {
    tracing_subscriber::fmt::init();
    let args = Args::parse();

    if let Err(e) = run(args) {
        error!("{e}");
        exit(1);
    }
}

fn run(args: Args) -> Result<()> {
    let config = BackupConfig::load(&args.config)
        .with_msg(format!("Load config failed: {:?}", &args.config))?;
    let store = SqliteStore::open(&config.db_path)?;
    let notifier = LogNotification;

    match args.command {
        Command::Run => {
            Scheduler::new(config, store, Box::new(notifier)).run();
        }
        Command::Backup => {
            let report = BackupExecutor::new(&config, &store, &notifier)
                .run_backup(BackupTrigger::Manual, Local::now().naive_local());
            if !report.success {
                exit(1);
            }
        }
        Command::Archive { before } => {
            let cutoff = before
                .and_hms_opt(0, 0, 0)
                .expect("midnight is always a valid time");
            match store.oldest_record_timestamp()? {
                Some(oldest) => info!("Oldest record: {}", oldest.format("%d.%m.%Y")),
                None => info!("Store is empty"),
            }
            info!(
                "{} records with entry before {}",
                store.count_before(cutoff)?,
                before
            );
            let report = ArchiveExecutor::new(&config, &store, &notifier)
                .run_archive(cutoff, Local::now().naive_local());
            if !report.success {
                exit(1);
            }
        }
    }

    Ok(())
}
