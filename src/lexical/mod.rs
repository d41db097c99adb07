//! Lexical scanning module
//!
//! The scanner state machine, the numeric decoding it relies on, and the
//! module-level convenience API. Tokens are pulled one at a time; the
//! include machinery in [`crate::include`] swaps byte sources underneath
//! the pull without the caller noticing.

pub mod numbers;
pub mod scanner;

use crate::file_source::{FileSource, FileSourceError};
use crate::tokens::OwnedToken;
use std::path::Path;

pub use numbers::NumericError;
pub use scanner::{ScanError, ScanErrorKind, ScannedToken, Scanner, ScannerMetrics};

// ============================================================================
// MODULE API
// ============================================================================

/// Open a root file and return a scanner over it
pub fn scan_file(path: &Path) -> Result<Scanner, FileSourceError> {
    Scanner::from_path(path)
}

/// Scan in-memory bytes to completion, returning owned tokens
pub fn scan_bytes(bytes: impl Into<Vec<u8>>, label: &str) -> Vec<OwnedToken> {
    Scanner::new(FileSource::from_bytes(bytes, label)).drain_owned()
}

// ============================================================================
// MODULE INITIALIZATION AND VALIDATION
// ============================================================================

/// Validate that every scanner diagnostic code carries registry metadata
/// (for system startup)
pub fn init_scanner_logging() -> Result<(), String> {
    let probe_codes = [
        crate::logging::codes::scanning::MALFORMED_NUMBER,
        crate::logging::codes::scanning::NUMBER_OUT_OF_RANGE,
        crate::logging::codes::scanning::UNTERMINATED_STRING,
        crate::logging::codes::scanning::UNTERMINATED_COMMENT,
        crate::logging::codes::scanning::UNTERMINATED_INCLUDE,
        crate::logging::codes::scanning::STRING_TOO_LARGE,
        crate::logging::codes::scanning::NAME_TOO_LONG,
        crate::logging::codes::include::INCLUDE_OPEN_FAILED,
        crate::logging::codes::include::INCLUDE_CYCLE,
        crate::logging::codes::include::INCLUDE_TOO_DEEP,
        crate::logging::codes::include::INVALID_INCLUDE_PATH,
        crate::logging::codes::include::DIRECTORY_SCAN_FAILED,
    ];

    for code in &probe_codes {
        if crate::logging::codes::get_metadata(code.as_str()).is_none() {
            return Err(format!(
                "Scanner diagnostic code {} not found in metadata registry",
                code.as_str()
            ));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scan_bytes_helper() {
        let tokens = scan_bytes(b"n = 3;".to_vec(), "mem.cfg");
        assert_eq!(
            tokens,
            vec![
                OwnedToken::Name("n".into()),
                OwnedToken::Equals,
                OwnedToken::Integer(3),
                OwnedToken::Semicolon,
            ]
        );
    }

    #[test]
    fn test_init_scanner_logging() {
        assert!(init_scanner_logging().is_ok());
    }
}
