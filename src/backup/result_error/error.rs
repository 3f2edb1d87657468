use crate::backup::result_error::WithMsg;
use thiserror::Error;

/// Failure taxonomy for the backup/archive core.
///
/// The stage wrappers (`Scheduling`, `Snapshot`, `Compression`,
/// `ArchiveInsert`, `ArchiveDelete`) mark where in a task an underlying
/// error occurred; they decide how the task boundary reacts. Cleanup
/// failures carry no wrapper since they are logged at the call site and
/// never change a task's outcome.
#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Sqlite(#[from] rusqlite::Error),
    #[error(transparent)]
    Zip(#[from] zip::result::ZipError),
    #[error(transparent)]
    Validation(#[from] validator::ValidationErrors),
    #[error(transparent)]
    ConfigParse(#[from] serde_yml::Error),
    #[error("timer scheduling failed: {0}")]
    Scheduling(String),
    #[error("snapshot failed:\n{}", indent::indent_all_with("  ", .0.to_string()))]
    Snapshot(Box<Error>),
    #[error("compression failed:\n{}", indent::indent_all_with("  ", .0.to_string()))]
    Compression(Box<Error>),
    #[error("archive insert failed, primary store untouched:\n{}", indent::indent_all_with("  ", .0.to_string()))]
    ArchiveInsert(Box<Error>),
    #[error("archive delete failed after insert, records duplicated:\n{}", indent::indent_all_with("  ", .0.to_string()))]
    ArchiveDelete(Box<Error>),
    #[error("{}:\n{}", msg, indent::indent_all_with("  ", error.to_string()))]
    WithMsg { msg: String, error: Box<Error> },
}

impl Error {
    pub fn snapshot(self) -> Self {
        Error::Snapshot(Box::new(self))
    }

    pub fn compression(self) -> Self {
        Error::Compression(Box::new(self))
    }

    pub fn archive_insert(self) -> Self {
        Error::ArchiveInsert(Box::new(self))
    }

    pub fn archive_delete(self) -> Self {
        Error::ArchiveDelete(Box::new(self))
    }
}

impl<S: Into<String>> WithMsg<S> for Error {
    fn with_msg(self, msg: S) -> Self {
        Self::WithMsg {
            msg: msg.into(),
            error: Box::new(self),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_from_io_error() {
        let io_error = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let error = Error::from(io_error);

        match error {
            Error::Io(_) => (),
            _ => panic!("Expected Io error"),
        }
    }

    #[test]
    fn test_error_with_msg() {
        let io_error = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let error = Error::from(io_error).with_msg("Custom message");

        match error {
            Error::WithMsg { msg, .. } => assert_eq!(msg, "Custom message"),
            _ => panic!("Expected WithMsg error"),
        }
    }

    #[test]
    fn test_error_with_msg_display() {
        let io_error = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let error_str = Error::from(io_error).with_msg("Operation failed").to_string();

        assert!(error_str.contains("Operation failed"));
        assert!(error_str.contains("file not found"));
    }

    #[test]
    fn test_stage_wrapper_display() {
        let io_error = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "disk full");
        let error_str = Error::from(io_error).snapshot().to_string();

        assert!(error_str.contains("snapshot failed"));
        assert!(error_str.contains("disk full"));
    }

    #[test]
    fn test_archive_wrapper_display() {
        let sql_error = rusqlite::Error::InvalidQuery;
        let error_str = Error::from(sql_error).archive_insert().to_string();

        assert!(error_str.contains("primary store untouched"));
    }
}
