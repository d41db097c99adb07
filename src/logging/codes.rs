//! Consolidated diagnostic codes and classification system
//!
//! Single source of truth for every code the scanner can emit, together
//! with the metadata (category, severity, recoverability) that callers
//! and log backends consult.

use std::collections::HashMap;
use std::sync::OnceLock;

// ============================================================================
// CODE WRAPPER TYPE
// ============================================================================

/// Universal code wrapper for both error and success codes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Code(&'static str);

impl Code {
    pub const fn new(code: &'static str) -> Self {
        Self(code)
    }

    pub fn as_str(&self) -> &'static str {
        self.0
    }
}

impl std::fmt::Display for Code {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ============================================================================
// ERROR CLASSIFICATION TYPES
// ============================================================================

/// Error severity levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    Critical = 0,
    High = 1,
    Medium = 2,
    Low = 3,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Critical => "Critical",
            Severity::High => "High",
            Severity::Medium => "Medium",
            Severity::Low => "Low",
        }
    }
}

/// Complete metadata for a diagnostic code
#[derive(Debug, Clone)]
pub struct CodeMetadata {
    pub code: &'static str,
    pub category: &'static str,
    pub severity: Severity,
    pub recoverable: bool,
    pub description: &'static str,
}

// ============================================================================
// CODE CONSTANTS
// ============================================================================

/// System codes
pub mod system {
    use super::Code;

    pub const INTERNAL_ERROR: Code = Code::new("ERR001");
    pub const INITIALIZATION_FAILURE: Code = Code::new("ERR002");
}

/// File source codes
pub mod file_source {
    use super::Code;

    pub const FILE_NOT_FOUND: Code = Code::new("E005");
    pub const NOT_A_FILE: Code = Code::new("E006");
    pub const FILE_TOO_LARGE: Code = Code::new("E007");
    pub const PERMISSION_DENIED: Code = Code::new("E008");
    pub const IO_ERROR: Code = Code::new("E009");
    pub const INVALID_EXTENSION: Code = Code::new("E010");
}

/// Scanning codes
pub mod scanning {
    use super::Code;

    pub const MALFORMED_NUMBER: Code = Code::new("E020");
    pub const NUMBER_OUT_OF_RANGE: Code = Code::new("E021");
    pub const UNTERMINATED_STRING: Code = Code::new("E022");
    pub const UNTERMINATED_COMMENT: Code = Code::new("E023");
    pub const UNTERMINATED_INCLUDE: Code = Code::new("E024");
    pub const STRING_TOO_LARGE: Code = Code::new("E025");
    pub const NAME_TOO_LONG: Code = Code::new("E026");
}

/// Include processing codes
pub mod include {
    use super::Code;

    pub const INCLUDE_OPEN_FAILED: Code = Code::new("E030");
    pub const INCLUDE_CYCLE: Code = Code::new("E031");
    pub const INCLUDE_TOO_DEEP: Code = Code::new("E032");
    pub const INVALID_INCLUDE_PATH: Code = Code::new("E033");
    pub const DIRECTORY_SCAN_FAILED: Code = Code::new("E034");
}

/// Success codes
pub mod success {
    use super::Code;

    pub const SYSTEM_INITIALIZED: Code = Code::new("I001");
    pub const FILE_BUFFERED: Code = Code::new("I005");
    pub const SCAN_COMPLETE: Code = Code::new("I020");
    pub const INCLUDE_PUSHED: Code = Code::new("I030");
    pub const DIRECTORY_EXPANDED: Code = Code::new("I031");
}

// ============================================================================
// METADATA REGISTRY
// ============================================================================

fn registry() -> &'static HashMap<&'static str, CodeMetadata> {
    static REGISTRY: OnceLock<HashMap<&'static str, CodeMetadata>> = OnceLock::new();
    REGISTRY.get_or_init(|| {
        let entries = [
            CodeMetadata {
                code: "ERR001",
                category: "System",
                severity: Severity::Critical,
                recoverable: false,
                description: "Internal scanner error",
            },
            CodeMetadata {
                code: "ERR002",
                category: "System",
                severity: Severity::Critical,
                recoverable: false,
                description: "Initialization failure",
            },
            CodeMetadata {
                code: "E005",
                category: "FileSource",
                severity: Severity::Medium,
                recoverable: true,
                description: "File not found",
            },
            CodeMetadata {
                code: "E006",
                category: "FileSource",
                severity: Severity::Medium,
                recoverable: true,
                description: "Path is not a regular file",
            },
            CodeMetadata {
                code: "E007",
                category: "FileSource",
                severity: Severity::High,
                recoverable: false,
                description: "File exceeds the compile-time size limit",
            },
            CodeMetadata {
                code: "E008",
                category: "FileSource",
                severity: Severity::Medium,
                recoverable: true,
                description: "Permission denied",
            },
            CodeMetadata {
                code: "E009",
                category: "FileSource",
                severity: Severity::Medium,
                recoverable: true,
                description: "I/O error while reading",
            },
            CodeMetadata {
                code: "E010",
                category: "FileSource",
                severity: Severity::Low,
                recoverable: true,
                description: "File does not carry the required extension",
            },
            CodeMetadata {
                code: "E020",
                category: "Scanning",
                severity: Severity::Medium,
                recoverable: true,
                description: "Malformed numeric literal",
            },
            CodeMetadata {
                code: "E021",
                category: "Scanning",
                severity: Severity::Medium,
                recoverable: true,
                description: "Numeric literal out of representable range",
            },
            CodeMetadata {
                code: "E022",
                category: "Scanning",
                severity: Severity::Medium,
                recoverable: true,
                description: "Unterminated string literal at end of file",
            },
            CodeMetadata {
                code: "E023",
                category: "Scanning",
                severity: Severity::Medium,
                recoverable: true,
                description: "Unterminated block comment at end of file",
            },
            CodeMetadata {
                code: "E024",
                category: "Scanning",
                severity: Severity::Medium,
                recoverable: true,
                description: "Unterminated include path at end of file",
            },
            CodeMetadata {
                code: "E025",
                category: "Scanning",
                severity: Severity::High,
                recoverable: false,
                description: "String literal exceeds the compile-time size limit",
            },
            CodeMetadata {
                code: "E026",
                category: "Scanning",
                severity: Severity::Medium,
                recoverable: true,
                description: "Identifier exceeds the compile-time length limit",
            },
            CodeMetadata {
                code: "E030",
                category: "Include",
                severity: Severity::Medium,
                recoverable: true,
                description: "Included file could not be opened",
            },
            CodeMetadata {
                code: "E031",
                category: "Include",
                severity: Severity::High,
                recoverable: true,
                description: "Include cycle detected",
            },
            CodeMetadata {
                code: "E032",
                category: "Include",
                severity: Severity::High,
                recoverable: true,
                description: "Include nesting exceeds the compile-time depth limit",
            },
            CodeMetadata {
                code: "E033",
                category: "Include",
                severity: Severity::Medium,
                recoverable: true,
                description: "Include path is not representable",
            },
            CodeMetadata {
                code: "E034",
                category: "Include",
                severity: Severity::Medium,
                recoverable: true,
                description: "Directory could not be enumerated",
            },
        ];

        entries
            .into_iter()
            .map(|meta| (meta.code, meta))
            .collect()
    })
}

/// Look up full metadata for a code
pub fn get_metadata(code: &str) -> Option<&'static CodeMetadata> {
    registry().get(code)
}

/// Get the category for a code ("Unknown" if unregistered)
pub fn get_category(code: &str) -> &'static str {
    get_metadata(code).map(|m| m.category).unwrap_or("Unknown")
}

/// Get the severity for a code (Low if unregistered)
pub fn get_severity(code: &str) -> Severity {
    get_metadata(code).map(|m| m.severity).unwrap_or(Severity::Low)
}

/// Get the description for a code
pub fn get_description(code: &str) -> &'static str {
    get_metadata(code)
        .map(|m| m.description)
        .unwrap_or("Unknown error")
}

/// Check whether an error with this code is recoverable
pub fn is_recoverable(code: &str) -> bool {
    get_metadata(code).map(|m| m.recoverable).unwrap_or(true)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_code_display() {
        assert_eq!(include::INCLUDE_CYCLE.to_string(), "E031");
    }

    #[test]
    fn test_registry_lookup() {
        let meta = get_metadata("E031").expect("E031 registered");
        assert_eq!(meta.category, "Include");
        assert_eq!(meta.severity, Severity::High);
        assert!(meta.recoverable);
    }

    #[test]
    fn test_unknown_code_defaults() {
        assert_eq!(get_category("E999"), "Unknown");
        assert_eq!(get_description("E999"), "Unknown error");
        assert!(is_recoverable("E999"));
    }

    #[test]
    fn test_every_error_code_is_registered() {
        let codes = [
            system::INTERNAL_ERROR,
            system::INITIALIZATION_FAILURE,
            file_source::FILE_NOT_FOUND,
            file_source::NOT_A_FILE,
            file_source::FILE_TOO_LARGE,
            file_source::PERMISSION_DENIED,
            file_source::IO_ERROR,
            file_source::INVALID_EXTENSION,
            scanning::MALFORMED_NUMBER,
            scanning::NUMBER_OUT_OF_RANGE,
            scanning::UNTERMINATED_STRING,
            scanning::UNTERMINATED_COMMENT,
            scanning::UNTERMINATED_INCLUDE,
            scanning::STRING_TOO_LARGE,
            scanning::NAME_TOO_LONG,
            include::INCLUDE_OPEN_FAILED,
            include::INCLUDE_CYCLE,
            include::INCLUDE_TOO_DEEP,
            include::INVALID_INCLUDE_PATH,
            include::DIRECTORY_SCAN_FAILED,
        ];
        for code in codes {
            assert!(
                get_metadata(code.as_str()).is_some(),
                "missing metadata for {}",
                code
            );
        }
    }
}
