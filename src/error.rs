use std::fmt;

use serde::Serialize;
use ts_rs::TS;

/// Structured error type for everything around the generator: loading the
/// fixture file, settings, and writing the archive. Descriptor generation
/// itself cannot fail.
#[derive(Debug, Clone, Serialize, TS)]
#[serde(tag = "code", content = "detail")]
#[ts(export)]
pub enum AppError {
    NotFound { what: String },
    IoError { message: String },
    InvalidFixture { message: String },
    SettingsError { message: String },
    ArchiveError { message: String },
    InvalidFixtureTypeId { value: String },
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::NotFound { what } => write!(f, "{what} not found"),
            AppError::IoError { message } => write!(f, "I/O error: {message}"),
            AppError::InvalidFixture { message } => {
                write!(f, "Invalid fixture description: {message}")
            }
            AppError::SettingsError { message } => write!(f, "Settings error: {message}"),
            AppError::ArchiveError { message } => write!(f, "Archive error: {message}"),
            AppError::InvalidFixtureTypeId { value } => {
                write!(f, "Invalid fixture type id: {value}")
            }
        }
    }
}

impl std::error::Error for AppError {}

impl From<std::io::Error> for AppError {
    fn from(e: std::io::Error) -> Self {
        AppError::IoError {
            message: e.to_string(),
        }
    }
}

impl From<serde_json::Error> for AppError {
    fn from(e: serde_json::Error) -> Self {
        AppError::InvalidFixture {
            message: e.to_string(),
        }
    }
}

impl From<zip::result::ZipError> for AppError {
    fn from(e: zip::result::ZipError) -> Self {
        AppError::ArchiveError {
            message: e.to_string(),
        }
    }
}

/// Allow converting AppError to String for callers that only display it.
impl From<AppError> for String {
    fn from(e: AppError) -> String {
        e.to_string()
    }
}
