//! `.gdtf` container: a zip archive holding `description.xml`.

use std::io::{Cursor, Write};
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use regex::Regex;
use tracing::info;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

use crate::error::AppError;
use crate::model::FixtureDescription;
use crate::paths;
use crate::storage::atomic_write;

#[allow(clippy::expect_used)] // literal pattern, covered by tests
static WHITESPACE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("whitespace pattern is valid"));

/// Download stem: `"{manufacturer}-{shortName}"` with every whitespace run,
/// leading and trailing ones included, replaced by a single `-`.
pub fn archive_stem(fixture: &FixtureDescription) -> String {
    let raw = format!("{}-{}", fixture.manufacturer, fixture.short_name);
    WHITESPACE.replace_all(&raw, "-").into_owned()
}

/// Download file name including the `.gdtf` extension.
pub fn archive_file_name(fixture: &FixtureDescription) -> String {
    format!("{}.{}", archive_stem(fixture), paths::ARCHIVE_EXT)
}

/// Zip the descriptor under the fixed entry name, stored uncompressed.
pub fn build_archive(description: &str) -> Result<Vec<u8>, AppError> {
    let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Stored);
    writer.start_file(paths::DESCRIPTION_FILE, options)?;
    writer.write_all(description.as_bytes())?;
    let cursor = writer.finish()?;
    Ok(cursor.into_inner())
}

/// Write the archive into `out_dir`, creating it if needed. Returns the path written.
pub fn write_archive(
    out_dir: &Path,
    fixture: &FixtureDescription,
    description: &str,
) -> Result<PathBuf, AppError> {
    std::fs::create_dir_all(out_dir)?;
    let bytes = build_archive(description)?;
    let path = out_dir.join(archive_file_name(fixture));
    atomic_write(&path, &bytes)?;
    info!(path = %path.display(), bytes = bytes.len(), "wrote archive");
    Ok(path)
}

/// Write the bare descriptor into `out_dir`. Returns the path written.
pub fn write_description(out_dir: &Path, description: &str) -> Result<PathBuf, AppError> {
    std::fs::create_dir_all(out_dir)?;
    let path = paths::description_path(out_dir);
    atomic_write(&path, description.as_bytes())?;
    info!(path = %path.display(), "wrote descriptor");
    Ok(path)
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::indexing_slicing)]
mod tests {
    use std::io::Read;

    use zip::ZipArchive;

    use super::*;
    use crate::model::PhysicalProperties;

    fn fixture(manufacturer: &str, short_name: &str) -> FixtureDescription {
        FixtureDescription {
            manufacturer: manufacturer.to_string(),
            name: "Test".to_string(),
            short_name: short_name.to_string(),
            fixture_type: "LED Bar".to_string(),
            dmx_modes: Vec::new(),
            physical: PhysicalProperties {
                weight: "N/A".to_string(),
                width: "N/A".to_string(),
                height: "N/A".to_string(),
                depth: "N/A".to_string(),
                power_consumption: "N/A".to_string(),
                pan_range: None,
                tilt_range: None,
            },
            wheels: None,
            beam: None,
        }
    }

    #[test]
    fn file_name_collapses_whitespace() {
        let f = fixture("Acme  Lighting", "Pixel Bar\t8");
        assert_eq!(archive_file_name(&f), "Acme-Lighting-Pixel-Bar-8.gdtf");
    }

    #[test]
    fn file_name_keeps_edge_whitespace_as_dashes() {
        let f = fixture(" Acme", "PB8 ");
        assert_eq!(archive_stem(&f), "-Acme-PB8-");
        assert_eq!(archive_file_name(&f), "-Acme-PB8-.gdtf");
    }

    #[test]
    fn archive_holds_single_stored_entry() {
        let bytes = build_archive("<GDTF/>").unwrap();
        let mut archive = ZipArchive::new(Cursor::new(bytes)).unwrap();
        assert_eq!(archive.len(), 1);

        let mut entry = archive.by_index(0).unwrap();
        assert_eq!(entry.name(), "description.xml");
        assert_eq!(entry.compression(), CompressionMethod::Stored);
        let mut text = String::new();
        entry.read_to_string(&mut text).unwrap();
        assert_eq!(text, "<GDTF/>");
    }

    #[test]
    fn write_archive_creates_dir() {
        let dir = std::env::temp_dir().join("gdtf_creator_test_package");
        let _ = std::fs::remove_dir_all(&dir);

        let path = write_archive(&dir, &fixture("Acme", "PB8"), "<GDTF/>").unwrap();
        assert_eq!(path, dir.join("Acme-PB8.gdtf"));
        assert!(path.exists());

        let _ = std::fs::remove_dir_all(&dir);
    }
}
