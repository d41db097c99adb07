// RUNTIME PREFERENCES (User Experience)

use serde::{Deserialize, Serialize};
use std::env;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileSourcePreferences {
    /// Whether to require the .cfg extension (user preference, not security)
    pub require_cfg_extension: bool,

    /// Whether to log per-file read metrics
    pub log_read_metrics: bool,
}

impl Default for FileSourcePreferences {
    fn default() -> Self {
        Self {
            require_cfg_extension: env::var("SCL_REQUIRE_CFG_EXTENSION")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(false),
            log_read_metrics: env::var("SCL_LOG_READ_METRICS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(false),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScannerPreferences {
    /// Whether to collect per-class token metrics
    pub collect_token_metrics: bool,

    /// Whether to log every include push and pop
    pub log_include_transitions: bool,

    /// Whether to log string literal length statistics
    pub log_string_statistics: bool,
}

impl Default for ScannerPreferences {
    fn default() -> Self {
        Self {
            collect_token_metrics: env::var("SCL_SCANNER_TOKEN_METRICS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(true),
            log_include_transitions: env::var("SCL_SCANNER_LOG_INCLUDES")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(false),
            log_string_statistics: env::var("SCL_SCANNER_LOG_STRING_STATS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(false),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingPreferences {
    /// Minimum level emitted by the global service
    pub min_log_level: LogLevelPreference,

    /// Whether events are emitted as JSON lines instead of plain text
    pub use_structured_logging: bool,
}

impl Default for LoggingPreferences {
    fn default() -> Self {
        Self {
            min_log_level: env::var("SCL_LOG_LEVEL")
                .ok()
                .and_then(|v| LogLevelPreference::from_str(&v))
                .unwrap_or(LogLevelPreference::Warning),
            use_structured_logging: env::var("SCL_STRUCTURED_LOGGING")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(false),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LogLevelPreference {
    Error,
    Warning,
    Info,
    Debug,
}

impl LogLevelPreference {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_ascii_lowercase().as_str() {
            "error" => Some(Self::Error),
            "warn" | "warning" => Some(Self::Warning),
            "info" => Some(Self::Info),
            "debug" => Some(Self::Debug),
            _ => None,
        }
    }

    pub fn to_events_log_level(self) -> crate::logging::LogLevel {
        match self {
            Self::Error => crate::logging::LogLevel::Error,
            Self::Warning => crate::logging::LogLevel::Warning,
            Self::Info => crate::logging::LogLevel::Info,
            Self::Debug => crate::logging::LogLevel::Debug,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_level_parsing() {
        assert_eq!(
            LogLevelPreference::from_str("warn"),
            Some(LogLevelPreference::Warning)
        );
        assert_eq!(
            LogLevelPreference::from_str("DEBUG"),
            Some(LogLevelPreference::Debug)
        );
        assert_eq!(LogLevelPreference::from_str("verbose"), None);
    }

    #[test]
    fn test_scanner_preferences_default() {
        let prefs = ScannerPreferences::default();
        assert!(prefs.collect_token_metrics);
    }
}
