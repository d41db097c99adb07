//! SCL Scanner
//!
//! Lexical scanner core for SCL (structured configuration language)
//! files: a multi-mode lexer with transparent `@include` /
//! `@include_dir` expansion, escape decoding, and overflow-driven
//! numeric type promotion. The grammar parser that consumes the token
//! stream lives outside this crate.

// ============================================================================
// PUBLIC API - Core Types (Re-exports)
// ============================================================================

pub use file_source::{FileSource, FileSourceError};
pub use include::{DirectoryIterator, IncludeError, IncludeStack};
pub use lexical::{
    scan_bytes, scan_file, ScanError, ScanErrorKind, ScannedToken, Scanner, ScannerMetrics,
};
pub use tokens::{OwnedToken, Token, TokenClass};

/// Configuration system (compile-time constants + runtime preferences)
pub mod config;

// ============================================================================
// INTERNAL MODULES (partially re-exported above)
// ============================================================================

pub mod file_source;
pub mod include;
pub mod lexical;
#[macro_use]
pub mod logging;
pub mod tokens;

// ============================================================================
// LIBRARY INFORMATION
// ============================================================================

/// SCL language specification version this scanner targets
pub const LANGUAGE_VERSION: &str = "1.0.0";

/// Scanner implementation version
pub const SCANNER_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library capability information
#[derive(Debug, Clone)]
pub struct LibraryInfo {
    pub language_version: &'static str,
    pub scanner_version: &'static str,
    pub max_include_depth: usize,
}

/// Get library information
pub fn get_library_info() -> LibraryInfo {
    LibraryInfo {
        language_version: LANGUAGE_VERSION,
        scanner_version: SCANNER_VERSION,
        max_include_depth: config::compile_time::include::MAX_INCLUDE_DEPTH,
    }
}

impl LibraryInfo {
    pub fn summary(&self) -> String {
        format!(
            "SCL Scanner v{} (Language: v{}), include depth limit {}",
            self.scanner_version, self.language_version, self.max_include_depth
        )
    }
}

// ============================================================================
// INITIALIZATION
// ============================================================================

/// Initialize the scanner library.
///
/// Call once at application startup to initialize logging and validate
/// the diagnostic code registry. Scanning works without it; events are
/// simply dropped.
pub fn init() -> Result<(), String> {
    logging::init_global_logging()?;
    lexical::init_scanner_logging()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_library_info() {
        let info = get_library_info();
        assert_eq!(info.language_version, LANGUAGE_VERSION);
        assert!(info.max_include_depth > 0);
        assert!(info.summary().contains("SCL Scanner"));
    }
}
