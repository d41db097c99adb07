//! Transparent file inclusion
//!
//! `@include` and `@include_dir` directives swap the scanner's active
//! byte source rather than producing tokens; this module holds the frame
//! stack that makes the swap reversible and the directory iterator that
//! feeds synthetic pushes.

pub mod directory;
pub mod stack;

pub use directory::DirectoryIterator;
pub use stack::{IncludeStack, ScanFrame};

use crate::logging::codes;

/// Include processing errors
#[derive(Debug, Clone, thiserror::Error)]
pub enum IncludeError {
    #[error("cannot open include file '{path}': {message}")]
    OpenFailed { path: String, message: String },

    #[error("include cycle detected: '{path}' is already being scanned")]
    Cycle { path: String },

    #[error("include nesting too deep: {depth} frames (max {limit})")]
    TooDeep { depth: usize, limit: usize },

    #[error("invalid include path: {reason}")]
    InvalidPath { reason: String },

    #[error("cannot scan include directory '{path}': {message}")]
    DirectoryScanFailed { path: String, message: String },
}

impl IncludeError {
    /// Get the diagnostic code for this error
    pub fn error_code(&self) -> crate::logging::Code {
        match self {
            IncludeError::OpenFailed { .. } => codes::include::INCLUDE_OPEN_FAILED,
            IncludeError::Cycle { .. } => codes::include::INCLUDE_CYCLE,
            IncludeError::TooDeep { .. } => codes::include::INCLUDE_TOO_DEEP,
            IncludeError::InvalidPath { .. } => codes::include::INVALID_INCLUDE_PATH,
            IncludeError::DirectoryScanFailed { .. } => codes::include::DIRECTORY_SCAN_FAILED,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes_map_to_registry() {
        let errors = [
            IncludeError::OpenFailed {
                path: "a".into(),
                message: "m".into(),
            },
            IncludeError::Cycle { path: "a".into() },
            IncludeError::TooDeep { depth: 11, limit: 10 },
            IncludeError::InvalidPath { reason: "r".into() },
            IncludeError::DirectoryScanFailed {
                path: "d".into(),
                message: "m".into(),
            },
        ];
        for error in errors {
            let code = error.error_code();
            assert!(
                crate::logging::codes::get_metadata(code.as_str()).is_some(),
                "unregistered code {}",
                code
            );
        }
    }
}
