//! Validation functions for configuration values.

use sanitize_filename::{is_sanitized, sanitize};
use std::path::{Path, PathBuf};
use validator::ValidationError;

pub fn validate_writable_dir(dir: &PathBuf) -> Result<(), ValidationError> {
    validate_dir_exist_or_created(dir)?;
    let md = std::fs::metadata(dir).map_err(|e| {
        ValidationError::new("InvalidDirectory")
            .with_message(format!("cannot access metadata for {:?}: {}", dir, e).into())
    })?;
    if md.permissions().readonly() {
        Err(ValidationError::new("InvalidDirectory")
            .with_message(format!("cannot write to dir {:?}", dir).into()))
    } else {
        Ok(())
    }
}

pub fn validate_dir_exist_or_created<P: AsRef<Path>>(dir: P) -> Result<(), ValidationError> {
    let dir = dir.as_ref();
    if dir.exists() {
        if !dir.is_dir() {
            return Err(ValidationError::new("InvalidDirectory")
                .with_message(format!("{:?} is not a directory", dir).into()));
        }
    } else {
        return std::fs::create_dir_all(dir).map_err(|e| {
            ValidationError::new("InvalidDirectory")
                .with_message(format!("cannot create or access path {:?}: {}", dir, e).into())
        });
    }

    Ok(())
}

/// The database file stem becomes the snapshot name prefix, so it must be
/// a clean file name component.
pub fn validate_db_base_name(path: &PathBuf) -> Result<(), ValidationError> {
    let base = path
        .file_stem()
        .and_then(|s| s.to_str())
        .ok_or_else(|| {
            ValidationError::new("InvalidDbPath")
                .with_message(format!("{:?} has no usable file name", path).into())
        })?;

    if !is_sanitized(base) {
        return Err(ValidationError::new("InvalidDbPath").with_message(
            format!("invalid database file name, try sanitizing like {:?}", sanitize(base)).into(),
        ));
    }

    Ok(())
}
