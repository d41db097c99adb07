//! Logging service implementation

use super::codes::Code;
use super::config;
use super::events::{LogEvent, LogLevel};
use crate::config::compile_time::logging::LOG_BUFFER_SIZE;
use std::sync::{Arc, Mutex};

/// Simple logger trait
pub trait Logger: Send + Sync {
    fn log(&self, event: &LogEvent);
}

/// Main logging service with configuration awareness
pub struct LoggingService {
    logger: Arc<dyn Logger>,
    min_level: LogLevel,
}

impl LoggingService {
    /// Create new logging service with specified logger and minimum level
    pub fn new(logger: Arc<dyn Logger>, min_level: LogLevel) -> Self {
        Self { logger, min_level }
    }

    /// Create service with configuration-aware settings
    pub fn with_config() -> Self {
        let min_level = config::get_min_log_level();
        let logger: Arc<dyn Logger> = if config::use_structured_logging() {
            Arc::new(StructuredLogger)
        } else {
            Arc::new(ConsoleLogger)
        };

        Self::new(logger, min_level)
    }

    /// Check if level should be logged
    pub fn should_log(&self, level: LogLevel) -> bool {
        level <= self.min_level
    }

    /// Log an event
    pub fn log_event(&self, event: LogEvent) {
        if self.should_log(event.level) {
            self.logger.log(&event);
        }
    }

    /// Convenience method: log error with code
    pub fn log_error(&self, code: Code, message: &str) {
        self.log_event(LogEvent::error(code, message));
    }

    /// Convenience method: log success with code
    pub fn log_success(&self, code: Code, message: &str) {
        self.log_event(LogEvent::success(code, message));
    }

    /// Convenience method: log warning
    pub fn log_warning(&self, message: &str) {
        self.log_event(LogEvent::warning(message));
    }

    /// Convenience method: log debug
    pub fn log_debug(&self, message: &str) {
        self.log_event(LogEvent::debug(message));
    }
}

/// Simple console logger
pub struct ConsoleLogger;

impl Logger for ConsoleLogger {
    fn log(&self, event: &LogEvent) {
        match event.level {
            LogLevel::Error => eprintln!("{}", event.format()),
            _ => println!("{}", event.format()),
        }
    }
}

/// Structured logger emitting one JSON object per event
pub struct StructuredLogger;

impl Logger for StructuredLogger {
    fn log(&self, event: &LogEvent) {
        match event.format_json() {
            Ok(json) => match event.level {
                LogLevel::Error => eprintln!("{}", json),
                _ => println!("{}", json),
            },
            // Fall back to plain format if JSON serialization fails
            Err(_) => match event.level {
                LogLevel::Error => eprintln!("{}", event.format()),
                _ => println!("{}", event.format()),
            },
        }
    }
}

/// Memory logger for testing
pub struct MemoryLogger {
    events: Mutex<Vec<LogEvent>>,
}

impl MemoryLogger {
    pub fn new() -> Self {
        Self {
            events: Mutex::new(Vec::with_capacity(64)),
        }
    }

    pub fn get_events(&self) -> Vec<LogEvent> {
        self.events.lock().map(|e| e.clone()).unwrap_or_default()
    }

    pub fn event_count(&self) -> usize {
        self.events.lock().map(|e| e.len()).unwrap_or(0)
    }

    pub fn get_errors(&self) -> Vec<LogEvent> {
        self.get_events().into_iter().filter(|e| e.is_error()).collect()
    }

    pub fn has_error_with_code(&self, code: Code) -> bool {
        self.get_events()
            .iter()
            .any(|e| e.is_error() && e.code.as_str() == code.as_str())
    }

    pub fn clear(&self) {
        if let Ok(mut events) = self.events.lock() {
            events.clear();
        }
    }
}

impl Default for MemoryLogger {
    fn default() -> Self {
        Self::new()
    }
}

impl Logger for MemoryLogger {
    fn log(&self, event: &LogEvent) {
        if let Ok(mut events) = self.events.lock() {
            if events.len() < LOG_BUFFER_SIZE {
                events.push(event.clone());
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logging::codes;

    #[test]
    fn test_memory_logger_captures_events() {
        let logger = MemoryLogger::new();
        logger.log(&LogEvent::error(
            codes::include::INCLUDE_CYCLE,
            "cycle detected",
        ));
        logger.log(&LogEvent::debug("probe"));

        assert_eq!(logger.event_count(), 2);
        assert_eq!(logger.get_errors().len(), 1);
        assert!(logger.has_error_with_code(codes::include::INCLUDE_CYCLE));
    }

    #[test]
    fn test_service_filters_by_level() {
        let memory = Arc::new(MemoryLogger::new());
        let service = LoggingService::new(memory.clone(), LogLevel::Warning);

        service.log_debug("suppressed");
        service.log_warning("kept");
        service.log_error(codes::system::INTERNAL_ERROR, "kept");

        assert_eq!(memory.event_count(), 2);
    }
}
