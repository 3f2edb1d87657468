//! Narrow storage contract consumed by the backup/archive core.
//!
//! The live application owns the full record schema and its CRUD; this
//! module only exposes the handful of operations the core needs, plus the
//! SQLite implementation backing them.

use crate::backup::result_error::result::Result;
use chrono::NaiveDateTime;
use rusqlite::{params, Connection, MAIN_DB};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

/// Entry timestamps are TEXT in this format; lexicographic comparison is
/// chronological, so cutoffs are passed to SQL as formatted strings.
pub static ENTRY_STAMP_FORMAT: &str = "%Y-%m-%d %H:%M";

/// One row of the primary record table, moved opaquely between the
/// primary store and an archive store.
#[derive(Debug, Clone, PartialEq)]
pub struct VehicleRecord {
    pub id: i64,
    pub plate: String,
    pub trailer_plate: String,
    pub driver: String,
    pub phone: String,
    pub driver_firm: String,
    pub origin_firm: String,
    pub entry_date: String,
    pub exit_date: Option<String>,
    pub status: String,
    pub notes: Option<String>,
}

/// Storage operations the backup/archive core consumes.
pub trait Store {
    /// Hot-copy of the live store to a new file, without exclusive locking.
    fn snapshot_to(&self, dest: &Path) -> Result<PathBuf>;
    /// Records with an entry time strictly before the cutoff.
    fn select_before(&self, cutoff: NaiveDateTime) -> Result<Vec<VehicleRecord>>;
    /// Inserts records into `target`, creating the archive schema if absent.
    fn bulk_insert(&self, records: &[VehicleRecord], target: &Path) -> Result<()>;
    /// Deletes records with an entry time strictly before the cutoff;
    /// returns the number deleted.
    fn delete_before(&self, cutoff: NaiveDateTime) -> Result<usize>;
    fn count_before(&self, cutoff: NaiveDateTime) -> Result<u64>;
    fn oldest_record_timestamp(&self) -> Result<Option<NaiveDateTime>>;
}

static SELECT_COLUMNS: &str =
    "id, plaka, dorsePlaka, surucu, telefon, surucuFirma, gelinenFirma, \
     entryDate, exitDate, status, notes";

// Archive stores carry the same columns but no AUTOINCREMENT key, so the
// original row ids survive the move.
static ARCHIVE_DDL: &str = "CREATE TABLE IF NOT EXISTS vehicles (\
     id INTEGER, plaka TEXT, dorsePlaka TEXT, surucu TEXT, telefon TEXT, \
     surucuFirma TEXT, gelinenFirma TEXT, entryDate TEXT, exitDate TEXT, \
     status TEXT, notes TEXT)";

fn format_cutoff(cutoff: NaiveDateTime) -> String {
    cutoff.format(ENTRY_STAMP_FORMAT).to_string()
}

/// SQLite-backed primary store.
pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    /// Opens (creating if needed) the primary database and ensures its
    /// schema and indexes exist.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if let Some(dir) = path.parent() {
            if !dir.as_os_str().is_empty() {
                fs::create_dir_all(dir)?;
            }
        }
        let conn = Connection::open(path)?;
        conn.execute(
            "CREATE TABLE IF NOT EXISTS vehicles (\
             id INTEGER PRIMARY KEY AUTOINCREMENT, plaka TEXT, dorsePlaka TEXT, \
             surucu TEXT, telefon TEXT, surucuFirma TEXT, gelinenFirma TEXT, \
             entryDate TEXT, exitDate TEXT, status TEXT, notes TEXT)",
            [],
        )?;
        conn.execute(
            "CREATE TABLE IF NOT EXISTS blacklist (\
             id INTEGER PRIMARY KEY AUTOINCREMENT, type TEXT NOT NULL, \
             value TEXT NOT NULL, reason TEXT, date_added TEXT, UNIQUE(type, value))",
            [],
        )?;
        conn.execute(
            "CREATE INDEX IF NOT EXISTS idx_entry_date ON vehicles(entryDate)",
            [],
        )?;
        conn.execute("CREATE INDEX IF NOT EXISTS idx_plaka ON vehicles(plaka)", [])?;
        info!("Database connection established: {:?}", path);
        Ok(Self { conn })
    }

    #[cfg(test)]
    pub(crate) fn insert_record(&self, r: &VehicleRecord) {
        self.conn
            .execute(
                "INSERT INTO vehicles (plaka, dorsePlaka, surucu, telefon, surucuFirma, \
                 gelinenFirma, entryDate, exitDate, status, notes) \
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
                params![
                    r.plate,
                    r.trailer_plate,
                    r.driver,
                    r.phone,
                    r.driver_firm,
                    r.origin_firm,
                    r.entry_date,
                    r.exit_date,
                    r.status,
                    r.notes
                ],
            )
            .unwrap();
    }

    #[cfg(test)]
    pub(crate) fn record_count(&self) -> u64 {
        self.conn
            .query_row("SELECT COUNT(*) FROM vehicles", [], |row| {
                row.get::<_, i64>(0)
            })
            .unwrap() as u64
    }
}

impl Store for SqliteStore {
    fn snapshot_to(&self, dest: &Path) -> Result<PathBuf> {
        if let Some(dir) = dest.parent() {
            if !dir.as_os_str().is_empty() {
                fs::create_dir_all(dir)?;
            }
        }
        self.conn.backup(MAIN_DB, dest, None)?;
        Ok(dest.to_path_buf())
    }

    fn select_before(&self, cutoff: NaiveDateTime) -> Result<Vec<VehicleRecord>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {SELECT_COLUMNS} FROM vehicles WHERE entryDate < ?1"
        ))?;
        let rows = stmt.query_map([format_cutoff(cutoff)], |row| {
            Ok(VehicleRecord {
                id: row.get(0)?,
                plate: row.get(1)?,
                trailer_plate: row.get(2)?,
                driver: row.get(3)?,
                phone: row.get(4)?,
                driver_firm: row.get(5)?,
                origin_firm: row.get(6)?,
                entry_date: row.get(7)?,
                exit_date: row.get(8)?,
                status: row.get(9)?,
                notes: row.get(10)?,
            })
        })?;
        rows.collect::<rusqlite::Result<Vec<_>>>().map_err(Into::into)
    }

    fn bulk_insert(&self, records: &[VehicleRecord], target: &Path) -> Result<()> {
        let mut conn = Connection::open(target)?;
        conn.execute(ARCHIVE_DDL, [])?;
        let tx = conn.transaction()?;
        {
            let mut stmt = tx.prepare(
                "INSERT INTO vehicles VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)",
            )?;
            for r in records {
                stmt.execute(params![
                    r.id,
                    r.plate,
                    r.trailer_plate,
                    r.driver,
                    r.phone,
                    r.driver_firm,
                    r.origin_firm,
                    r.entry_date,
                    r.exit_date,
                    r.status,
                    r.notes
                ])?;
            }
        }
        tx.commit()?;
        Ok(())
    }

    fn delete_before(&self, cutoff: NaiveDateTime) -> Result<usize> {
        self.conn
            .execute(
                "DELETE FROM vehicles WHERE entryDate < ?1",
                [format_cutoff(cutoff)],
            )
            .map_err(Into::into)
    }

    fn count_before(&self, cutoff: NaiveDateTime) -> Result<u64> {
        self.conn
            .query_row(
                "SELECT COUNT(*) FROM vehicles WHERE entryDate < ?1",
                [format_cutoff(cutoff)],
                |row| row.get::<_, i64>(0),
            )
            .map(|n| n as u64)
            .map_err(Into::into)
    }

    fn oldest_record_timestamp(&self) -> Result<Option<NaiveDateTime>> {
        let oldest: Option<String> =
            self.conn
                .query_row("SELECT MIN(entryDate) FROM vehicles", [], |row| row.get(0))?;
        Ok(oldest
            .and_then(|s| NaiveDateTime::parse_from_str(&s, ENTRY_STAMP_FORMAT).ok()))
    }
}
