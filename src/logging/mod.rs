//! Global logging module for the SCL scanner
//!
//! Provides a thread-safe global logging service with code-classified
//! events and a clean macro interface. The service is write-only from the
//! scanner's point of view; scanning itself keeps no global state.

pub mod codes;
pub mod config;
pub mod events;
pub mod macros;
pub mod service;

use std::sync::{Arc, OnceLock};

pub use codes::Code;
pub use events::{LogEvent, LogLevel};
pub use service::{ConsoleLogger, Logger, LoggingService, MemoryLogger, StructuredLogger};

static GLOBAL_LOGGER: OnceLock<Arc<LoggingService>> = OnceLock::new();

// ============================================================================
// INITIALIZATION
// ============================================================================

/// Initialize the global logging system
pub fn init_global_logging() -> Result<(), String> {
    let service = Arc::new(LoggingService::with_config());

    GLOBAL_LOGGER
        .set(service.clone())
        .map_err(|_| "Global logger already initialized".to_string())?;

    // Sanity-check the code registry before anything relies on it
    let probe_codes = ["ERR001", "E005", "E020", "E031"];
    for &code in &probe_codes {
        if codes::get_description(code) == "Unknown error" {
            return Err(format!("Missing metadata for diagnostic code: {}", code));
        }
    }

    service.log_success(
        codes::success::SYSTEM_INITIALIZED,
        "Global logging system initialized",
    );

    Ok(())
}

/// Initialize with custom service (primarily for testing)
pub fn init_global_logging_with_service(service: Arc<LoggingService>) -> Result<(), String> {
    GLOBAL_LOGGER
        .set(service)
        .map_err(|_| "Global logger already initialized".to_string())
}

/// Check if global logging is initialized
pub fn is_initialized() -> bool {
    GLOBAL_LOGGER.get().is_some()
}

// ============================================================================
// GLOBAL ACCESS
// ============================================================================

/// Safe access to the global logger
pub fn try_get_global_logger() -> Option<&'static LoggingService> {
    GLOBAL_LOGGER.get().map(|service| service.as_ref())
}

// ============================================================================
// MACRO SUPPORT FUNCTIONS
// ============================================================================

/// Log error with context (used by log_error! macro)
pub fn log_error_with_context(code: Code, message: &str, context: Vec<(&str, &str)>) {
    let mut event = LogEvent::error(code, message);
    for (key, value) in context {
        event = event.with_context(key, value);
    }
    if let Some(logger) = try_get_global_logger() {
        logger.log_event(event);
    }
}

/// Log success with context (used by log_success! macro)
pub fn log_success_with_context(code: Code, message: &str, context: Vec<(&str, &str)>) {
    let mut event = LogEvent::success(code, message);
    for (key, value) in context {
        event = event.with_context(key, value);
    }
    if let Some(logger) = try_get_global_logger() {
        logger.log_event(event);
    }
}

/// Safe error logging (won't panic if uninitialized)
pub fn safe_log_error(code: Code, message: &str) {
    if let Some(logger) = try_get_global_logger() {
        logger.log_error(code, message);
    } else {
        eprintln!("[ERROR] FALLBACK: [{}] {}", code.as_str(), message);
    }
}
