//! Directory-inclusion iterator
//!
//! Enumerates the immediate entries of a base directory once, up front,
//! and hands the include stack one file path at a time. Admission rules:
//! regular files and symlinks only (entries whose type cannot be
//! classified are admitted and left for open to reject), names starting
//! with `.` are excluded, and the admitted names are sorted byte-wise
//! ascending so expansion order is deterministic.

use crate::config::compile_time::include::MAX_DIRECTORY_ENTRIES;
use crate::logging::codes;
use crate::{log_debug, log_success};
use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};

use super::IncludeError;

#[derive(Debug)]
pub struct DirectoryIterator {
    base_dir: PathBuf,
    entries: Vec<OsString>,
    cursor: usize,
}

impl DirectoryIterator {
    /// Enumerate `base_dir` and build the iteration plan.
    ///
    /// The base directory must already be resolved against the including
    /// file's directory; entries are joined onto it verbatim.
    pub fn open(base_dir: &Path) -> Result<Self, IncludeError> {
        let read = fs::read_dir(base_dir).map_err(|e| IncludeError::DirectoryScanFailed {
            path: base_dir.display().to_string(),
            message: e.to_string(),
        })?;

        let mut entries = Vec::new();
        for entry in read {
            let entry = entry.map_err(|e| IncludeError::DirectoryScanFailed {
                path: base_dir.display().to_string(),
                message: e.to_string(),
            })?;

            let name = entry.file_name();
            if name.as_encoded_bytes().first() == Some(&b'.') {
                continue;
            }

            // Admit regular files and symlinks; entries whose type cannot
            // be determined are admitted and rejected by open later
            let admitted = match entry.file_type() {
                Ok(kind) => kind.is_file() || kind.is_symlink(),
                Err(_) => true,
            };
            if !admitted {
                continue;
            }

            entries.push(name);
            if entries.len() > MAX_DIRECTORY_ENTRIES {
                return Err(IncludeError::DirectoryScanFailed {
                    path: base_dir.display().to_string(),
                    message: format!(
                        "directory holds more than {} admissible entries",
                        MAX_DIRECTORY_ENTRIES
                    ),
                });
            }
        }

        entries.sort();

        log_success!(codes::success::DIRECTORY_EXPANDED, "Directory expanded for inclusion",
            "directory" => base_dir.display(),
            "entries" => entries.len());

        Ok(Self {
            base_dir: base_dir.to_path_buf(),
            entries,
            cursor: 0,
        })
    }

    /// The resolved directory being iterated
    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    /// Take the next file path, advancing the cursor
    pub fn next_entry(&mut self) -> Option<PathBuf> {
        let name = self.entries.get(self.cursor)?;
        self.cursor += 1;
        let path = self.base_dir.join(name);
        log_debug!("Directory iterator advanced",
            "entry" => path.display(),
            "position" => self.cursor,
            "total" => self.entries.len());
        Some(path)
    }

    /// Entries not yet handed out
    pub fn remaining(&self) -> usize {
        self.entries.len() - self.cursor
    }

    pub fn is_exhausted(&self) -> bool {
        self.cursor >= self.entries.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_entries_sorted_and_filtered() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("b.cfg"), "b").unwrap();
        fs::write(dir.path().join("a.cfg"), "a").unwrap();
        fs::write(dir.path().join(".hidden.cfg"), "h").unwrap();
        fs::create_dir(dir.path().join("sub")).unwrap();

        let mut iter = DirectoryIterator::open(dir.path()).unwrap();
        assert_eq!(iter.remaining(), 2);
        assert_eq!(
            iter.next_entry().unwrap(),
            dir.path().join("a.cfg")
        );
        assert_eq!(
            iter.next_entry().unwrap(),
            dir.path().join("b.cfg")
        );
        assert!(iter.next_entry().is_none());
        assert!(iter.is_exhausted());
    }

    #[test]
    fn test_byte_wise_ordering() {
        let dir = tempdir().unwrap();
        // 'B' (0x42) sorts before 'a' (0x61) in byte order
        fs::write(dir.path().join("a.cfg"), "").unwrap();
        fs::write(dir.path().join("B.cfg"), "").unwrap();
        fs::write(dir.path().join("10.cfg"), "").unwrap();

        let mut iter = DirectoryIterator::open(dir.path()).unwrap();
        assert_eq!(iter.next_entry().unwrap(), dir.path().join("10.cfg"));
        assert_eq!(iter.next_entry().unwrap(), dir.path().join("B.cfg"));
        assert_eq!(iter.next_entry().unwrap(), dir.path().join("a.cfg"));
    }

    #[test]
    fn test_missing_directory_is_scan_failure() {
        let dir = tempdir().unwrap();
        let result = DirectoryIterator::open(&dir.path().join("absent"));
        assert!(matches!(
            result,
            Err(IncludeError::DirectoryScanFailed { .. })
        ));
    }

    #[test]
    fn test_empty_directory_iterates_nothing() {
        let dir = tempdir().unwrap();
        let mut iter = DirectoryIterator::open(dir.path()).unwrap();
        assert!(iter.is_exhausted());
        assert!(iter.next_entry().is_none());
    }

    #[cfg(unix)]
    #[test]
    fn test_symlinks_are_admitted() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("real.cfg"), "x = 1;").unwrap();
        std::os::unix::fs::symlink(
            dir.path().join("real.cfg"),
            dir.path().join("link.cfg"),
        )
        .unwrap();

        let iter = DirectoryIterator::open(dir.path()).unwrap();
        assert_eq!(iter.remaining(), 2);
    }
}
