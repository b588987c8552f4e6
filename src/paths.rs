//! Centralized file names and path-building functions.
//!
//! No other module should hard-code these strings.

use std::path::{Path, PathBuf};

// ── Leaf filenames ───────────────────────────────────────────────

/// Name of the descriptor inside the archive.
pub const DESCRIPTION_FILE: &str = "description.xml";
pub const SETTINGS_FILE: &str = "gdtf-creator.json";

// ── Extensions ───────────────────────────────────────────────────

pub const ARCHIVE_EXT: &str = "gdtf";

// ── Path functions ───────────────────────────────────────────────

/// Default settings location: the working directory.
pub fn settings_path(dir: &Path) -> PathBuf {
    dir.join(SETTINGS_FILE)
}

pub fn description_path(out_dir: &Path) -> PathBuf {
    out_dir.join(DESCRIPTION_FILE)
}
