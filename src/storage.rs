use std::ffi::OsString;
use std::fs;
use std::io::Write;
use std::path::Path;

use serde::Serialize;

use crate::error::AppError;
use crate::model::FixtureDescription;

/// Atomically write bytes to a file using write-to-temp-then-rename.
///
/// The data goes to a `.tmp` sibling, is fsynced, and is then renamed over
/// the target, so readers never observe a half-written archive.
pub fn atomic_write(path: &Path, data: &[u8]) -> Result<(), AppError> {
    let file_name = path.file_name().ok_or_else(|| AppError::IoError {
        message: format!("not a file path: {}", path.display()),
    })?;
    let mut tmp_name = OsString::from(file_name);
    tmp_name.push(".tmp");
    let tmp_path = path.with_file_name(&tmp_name);

    let mut file = fs::File::create(&tmp_path)?;
    file.write_all(data)?;
    file.sync_all()?;
    drop(file);

    fs::rename(&tmp_path, path)?;
    Ok(())
}

pub(crate) fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<(), AppError> {
    let json = serde_json::to_string_pretty(value).map_err(|e| AppError::IoError {
        message: e.to_string(),
    })?;
    atomic_write(path, json.as_bytes())
}

pub(crate) fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T, AppError> {
    let data = fs::read_to_string(path)?;
    let value = serde_json::from_str(&data)?;
    Ok(value)
}

/// Load an extracted fixture description from a JSON file.
pub fn load_fixture(path: &Path) -> Result<FixtureDescription, AppError> {
    if !path.exists() {
        return Err(AppError::NotFound {
            what: path.display().to_string(),
        });
    }
    read_json(path)
}
