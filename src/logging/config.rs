//! Configuration access for the logging subsystem
//!
//! Runtime preferences are installed once; until then the env-derived
//! defaults apply.

use crate::config::runtime::LoggingPreferences;
use std::sync::OnceLock;

use super::events::LogLevel;

static RUNTIME_PREFERENCES: OnceLock<LoggingPreferences> = OnceLock::new();

/// Initialize runtime logging preferences
pub fn init_runtime_preferences(preferences: LoggingPreferences) -> Result<(), String> {
    RUNTIME_PREFERENCES
        .set(preferences)
        .map_err(|_| "Runtime logging preferences already initialized".to_string())
}

fn get_runtime_preferences() -> LoggingPreferences {
    RUNTIME_PREFERENCES.get().cloned().unwrap_or_default()
}

/// Get minimum log level (user preference)
pub fn get_min_log_level() -> LogLevel {
    get_runtime_preferences().min_log_level.to_events_log_level()
}

/// Check if structured (JSON) logging is enabled
pub fn use_structured_logging() -> bool {
    get_runtime_preferences().use_structured_logging
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_without_init() {
        // Must not panic before init; exact level depends on environment
        let _ = get_min_log_level();
        let _ = use_structured_logging();
    }
}
