//! Byte source module
//!
//! Opens, validates, and fully buffers configuration files; the scanner
//! and the include stack consume bytes through [`FileSource`]. Buffering
//! whole files keeps frame suspension purely positional (streaming over
//! non-seekable transports is out of scope).

pub mod source;

pub use source::{FileSource, FileSourceError};

use crate::config::runtime::FileSourcePreferences;
use std::path::Path;

/// Open a file with default preferences
pub fn open(path: &Path) -> Result<FileSource, FileSourceError> {
    FileSource::open(path)
}

/// Open a file with explicit preferences
pub fn open_with_preferences(
    path: &Path,
    prefs: &FileSourcePreferences,
) -> Result<FileSource, FileSourceError> {
    FileSource::open_with_preferences(path, prefs)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_module_open_helper() {
        let dir = tempdir().unwrap();
        let file_path = dir.path().join("app.cfg");
        fs::write(&file_path, "name = \"demo\";").unwrap();

        let source = open(&file_path).unwrap();
        assert_eq!(source.path(), file_path.as_path());
        assert!(!source.is_empty());
    }
}
