//! Buffered byte source implementation with validation staging

use crate::config::compile_time::file_source::{LARGE_FILE_THRESHOLD, MAX_FILE_SIZE};
use crate::config::runtime::FileSourcePreferences;
use crate::logging::codes;
use crate::{log_debug, log_error, log_warning};
use std::fs;
use std::path::{Path, PathBuf};

/// Byte source specific errors
#[derive(Debug, Clone, thiserror::Error)]
pub enum FileSourceError {
    #[error("File not found: {path}")]
    FileNotFound { path: String },

    #[error("Path is not a regular file: {path}")]
    NotAFile { path: String },

    #[error("File too large: {size} bytes (max: {max_size})")]
    FileTooLarge { size: u64, max_size: u64 },

    #[error("Permission denied: {path}")]
    PermissionDenied { path: String },

    #[error("I/O error reading file: {message}")]
    IoError { message: String },

    #[error("Invalid file extension: expected .cfg, found {extension:?}")]
    InvalidExtension { extension: Option<String> },
}

impl FileSourceError {
    /// Get the diagnostic code for this error
    pub fn error_code(&self) -> crate::logging::Code {
        match self {
            FileSourceError::FileNotFound { .. } => codes::file_source::FILE_NOT_FOUND,
            FileSourceError::NotAFile { .. } => codes::file_source::NOT_A_FILE,
            FileSourceError::FileTooLarge { .. } => codes::file_source::FILE_TOO_LARGE,
            FileSourceError::PermissionDenied { .. } => codes::file_source::PERMISSION_DENIED,
            FileSourceError::IoError { .. } => codes::file_source::IO_ERROR,
            FileSourceError::InvalidExtension { .. } => codes::file_source::INVALID_EXTENSION,
        }
    }
}

/// A fully buffered byte source over one configuration file.
///
/// Yields raw 8-bit bytes (no transcoding) and tracks a 1-based line
/// number; only `\n` advances it. The cursor, line number, and
/// start-of-line flag are the whole of a frame's resumable state, so a
/// suspended source resumes exactly where it left off.
pub struct FileSource {
    bytes: Vec<u8>,
    cursor: usize,
    line: u32,
    at_line_start: bool,
    path: PathBuf,
}

impl FileSource {
    /// Open and buffer a file with default preferences
    pub fn open(path: &Path) -> Result<Self, FileSourceError> {
        Self::open_with_preferences(path, &FileSourcePreferences::default())
    }

    /// Open and buffer a file, validating it first
    pub fn open_with_preferences(
        path: &Path,
        prefs: &FileSourcePreferences,
    ) -> Result<Self, FileSourceError> {
        let metadata = match fs::metadata(path) {
            Ok(meta) => meta,
            Err(e) => return Err(Self::classify_io_error(path, e)),
        };

        if !metadata.is_file() {
            let error = FileSourceError::NotAFile {
                path: path.display().to_string(),
            };
            log_error!(error.error_code(), "Path is not a regular file",
                "path" => path.display());
            return Err(error);
        }

        if metadata.len() > MAX_FILE_SIZE {
            let error = FileSourceError::FileTooLarge {
                size: metadata.len(),
                max_size: MAX_FILE_SIZE,
            };
            log_error!(error.error_code(), "File exceeds maximum buffered size",
                "path" => path.display(),
                "size_bytes" => metadata.len(),
                "limit_bytes" => MAX_FILE_SIZE);
            return Err(error);
        }

        if prefs.require_cfg_extension {
            let extension = path
                .extension()
                .and_then(|ext| ext.to_str())
                .map(|s| s.to_lowercase());
            if extension.as_deref() != Some("cfg") {
                let error = FileSourceError::InvalidExtension { extension };
                log_error!(error.error_code(), "File does not have required .cfg extension",
                    "path" => path.display());
                return Err(error);
            }
        }

        let bytes = match fs::read(path) {
            Ok(bytes) => bytes,
            Err(e) => return Err(Self::classify_io_error(path, e)),
        };

        if metadata.len() > LARGE_FILE_THRESHOLD {
            log_warning!("Large configuration file buffered",
                "path" => path.display(),
                "size_bytes" => metadata.len());
        }

        if prefs.log_read_metrics {
            log_debug!("File buffered",
                "path" => path.display(),
                "size_bytes" => bytes.len(),
                "is_large" => metadata.len() > LARGE_FILE_THRESHOLD);
        }

        Ok(Self::from_bytes(bytes, path))
    }

    /// Construct a source over in-memory bytes.
    ///
    /// The label is only used for diagnostics and relative include
    /// resolution; no file is touched.
    pub fn from_bytes(bytes: impl Into<Vec<u8>>, label: impl Into<PathBuf>) -> Self {
        Self {
            bytes: bytes.into(),
            cursor: 0,
            line: 1,
            at_line_start: true,
            path: label.into(),
        }
    }

    fn classify_io_error(path: &Path, e: std::io::Error) -> FileSourceError {
        let error = match e.kind() {
            std::io::ErrorKind::NotFound => FileSourceError::FileNotFound {
                path: path.display().to_string(),
            },
            std::io::ErrorKind::PermissionDenied => FileSourceError::PermissionDenied {
                path: path.display().to_string(),
            },
            _ => FileSourceError::IoError {
                message: format!("failed to read '{}': {}", path.display(), e),
            },
        };
        log_error!(error.error_code(), "Failed to open byte source",
            "path" => path.display(),
            "io_error" => e);
        error
    }

    /// The path this source was opened from (or labeled with)
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Current 1-based line number
    pub fn line(&self) -> u32 {
        self.line
    }

    /// Whether only spaces and tabs have been consumed since the last
    /// `\n` (or since the start of the buffer). Directive recognition
    /// is anchored on this.
    pub fn at_line_start(&self) -> bool {
        self.at_line_start
    }

    /// Look at the byte `n` positions past the cursor without consuming
    pub fn peek(&self, n: usize) -> Option<u8> {
        self.bytes.get(self.cursor + n).copied()
    }

    /// The unconsumed remainder of the buffer
    pub fn rest(&self) -> &[u8] {
        &self.bytes[self.cursor..]
    }

    /// Consume and return the next byte, maintaining line bookkeeping
    pub fn bump(&mut self) -> Option<u8> {
        let byte = self.bytes.get(self.cursor).copied()?;
        self.cursor += 1;
        match byte {
            b'\n' => {
                self.line += 1;
                self.at_line_start = true;
            }
            b' ' | b'\t' => {}
            _ => self.at_line_start = false,
        }
        Some(byte)
    }

    /// Consume `n` bytes (no-op past the end of the buffer)
    pub fn consume(&mut self, n: usize) {
        for _ in 0..n {
            if self.bump().is_none() {
                break;
            }
        }
    }

    /// Whether the buffer is exhausted
    pub fn is_eof(&self) -> bool {
        self.cursor >= self.bytes.len()
    }

    /// Total buffered size in bytes
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

impl std::fmt::Debug for FileSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FileSource")
            .field("path", &self.path)
            .field("cursor", &self.cursor)
            .field("line", &self.line)
            .field("len", &self.bytes.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_open_valid_file() {
        let dir = tempdir().unwrap();
        let file_path = dir.path().join("test.cfg");
        fs::write(&file_path, "port = 80;\n").unwrap();

        let source = FileSource::open(&file_path).unwrap();
        assert_eq!(source.len(), 11);
        assert_eq!(source.line(), 1);
        assert!(source.at_line_start());
    }

    #[test]
    fn test_file_not_found() {
        let dir = tempdir().unwrap();
        let result = FileSource::open(&dir.path().join("missing.cfg"));
        assert!(matches!(result, Err(FileSourceError::FileNotFound { .. })));
    }

    #[test]
    fn test_directory_is_not_a_file() {
        let dir = tempdir().unwrap();
        let result = FileSource::open(dir.path());
        assert!(matches!(result, Err(FileSourceError::NotAFile { .. })));
    }

    #[test]
    fn test_extension_requirement() {
        let dir = tempdir().unwrap();
        let file_path = dir.path().join("test.txt");
        fs::write(&file_path, "x = 1;").unwrap();

        let prefs = FileSourcePreferences {
            require_cfg_extension: true,
            ..Default::default()
        };
        let result = FileSource::open_with_preferences(&file_path, &prefs);
        assert!(matches!(
            result,
            Err(FileSourceError::InvalidExtension { .. })
        ));
    }

    #[test]
    fn test_line_tracking_only_counts_newline() {
        let mut source = FileSource::from_bytes(b"a\nb\rc\x0cd\n".to_vec(), "mem");
        while source.bump().is_some() {}
        // two \n bytes; \r and \f do not advance the line counter
        assert_eq!(source.line(), 3);
    }

    #[test]
    fn test_line_start_flag() {
        let mut source = FileSource::from_bytes(b"  x\n\t @".to_vec(), "mem");
        source.bump();
        source.bump();
        assert!(source.at_line_start()); // spaces preserve
        source.bump(); // 'x'
        assert!(!source.at_line_start());
        source.bump(); // '\n'
        assert!(source.at_line_start());
        source.bump(); // '\t'
        source.bump(); // ' '
        assert!(source.at_line_start()); // tab and space preserve
        source.bump(); // '@'
        assert!(!source.at_line_start());
    }

    #[test]
    fn test_peek_does_not_consume() {
        let mut source = FileSource::from_bytes(b"xy".to_vec(), "mem");
        assert_eq!(source.peek(0), Some(b'x'));
        assert_eq!(source.peek(1), Some(b'y'));
        assert_eq!(source.peek(2), None);
        assert_eq!(source.bump(), Some(b'x'));
        assert_eq!(source.peek(0), Some(b'y'));
    }

    #[test]
    fn test_consume_stops_at_eof() {
        let mut source = FileSource::from_bytes(b"ab".to_vec(), "mem");
        source.consume(10);
        assert!(source.is_eof());
        assert_eq!(source.bump(), None);
    }
}
