use crate::backup::result_error::result::Result;
use crate::backup::validate::{validate_db_base_name, validate_writable_dir};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::path::{Path, PathBuf};
use validator::Validate;

/// Automatic backup frequency, as shown in the settings dialog.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Frequency {
    #[default]
    #[serde(rename = "Günlük")]
    Daily,
    #[serde(rename = "Haftalık")]
    Weekly,
    #[serde(rename = "Aylık")]
    Monthly,
}

#[derive(Clone, Debug, Serialize, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct BackupConfig {
    /// Live database file; its stem becomes the snapshot name prefix.
    #[validate(custom(function = validate_db_base_name))]
    pub db_path: PathBuf,
    /// Root folder for the Manuel/Gunluk/Haftalik/Aylik/Arsiv subfolders.
    #[validate(custom(function = validate_writable_dir))]
    pub backup_root: PathBuf,
    /// Wrap snapshots in a zip container.
    #[serde(default = "default_compress")]
    pub compress: bool,
    /// Named retention option for the daily folder, e.g. "45 Gün".
    #[serde(default = "default_daily_retention")]
    pub daily_retention: String,
    #[serde(default)]
    pub frequency: Frequency,
    /// Date of the last automatic backup, carried across restarts by the
    /// hosting application.
    #[serde(default)]
    pub last_backup_date: Option<NaiveDate>,
}

fn default_compress() -> bool {
    true
}

fn default_daily_retention() -> String {
    "45 Gün".to_string()
}

impl BackupConfig {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let config: BackupConfig = serde_yml::from_reader(File::open(path.as_ref())?)?;
        config.validate()?;
        Ok(config)
    }

    pub fn db_base_name(&self) -> &str {
        self.db_path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("veritabani")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_minimal_config_defaults() {
        let config: BackupConfig = serde_yml::from_str(
            "db_path: Veritabanı/arac_veritabani.db\nbackup_root: Yedekler\n",
        )
        .unwrap();

        assert!(config.compress);
        assert_eq!(config.daily_retention, "45 Gün");
        assert_eq!(config.frequency, Frequency::Daily);
        assert_eq!(config.last_backup_date, None);
    }

    #[test]
    fn test_frequency_localized_names() {
        let config: BackupConfig = serde_yml::from_str(
            "db_path: a.db\nbackup_root: Yedekler\nfrequency: Haftalık\n",
        )
        .unwrap();
        assert_eq!(config.frequency, Frequency::Weekly);

        let config: BackupConfig =
            serde_yml::from_str("db_path: a.db\nbackup_root: Yedekler\nfrequency: Aylık\n")
                .unwrap();
        assert_eq!(config.frequency, Frequency::Monthly);
    }

    #[test]
    fn test_unknown_key_rejected() {
        let res: std::result::Result<BackupConfig, _> =
            serde_yml::from_str("db_path: a.db\nbackup_root: Yedekler\nyanlis_anahtar: 1\n");
        assert!(res.is_err());
    }

    #[test]
    fn test_db_base_name() {
        let config: BackupConfig = serde_yml::from_str(
            "db_path: Veritabanı/arac_veritabani.db\nbackup_root: Yedekler\n",
        )
        .unwrap();
        assert_eq!(config.db_base_name(), "arac_veritabani");
    }

    #[test]
    fn test_load_validates_backup_root() {
        let dir = tempfile::tempdir().unwrap();
        let config_path = dir.path().join("config.yml");
        let root = dir.path().join("Yedekler");
        std::fs::write(
            &config_path,
            format!(
                "db_path: {}\nbackup_root: {}\ncompress: false\n",
                dir.path().join("arac_veritabani.db").display(),
                root.display()
            ),
        )
        .unwrap();

        let config = BackupConfig::load(&config_path).unwrap();
        assert!(!config.compress);
        // validation creates the missing backup root
        assert!(root.is_dir());
    }
}
