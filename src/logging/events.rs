//! Event system for scanner logging

use super::codes::Code;
use std::collections::HashMap;
use std::time::SystemTime;

/// Log severity levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum LogLevel {
    Error = 0,
    Warning = 1,
    Info = 2,
    Debug = 3,
}

impl LogLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Error => "ERROR",
            LogLevel::Warning => "WARN",
            LogLevel::Info => "INFO",
            LogLevel::Debug => "DEBUG",
        }
    }
}

/// Core log event structure
#[derive(Debug, Clone)]
pub struct LogEvent {
    pub timestamp: SystemTime,
    pub level: LogLevel,
    pub code: Code,
    pub message: String,
    pub context: HashMap<String, String>,
}

impl LogEvent {
    fn new(level: LogLevel, code: Code, message: &str) -> Self {
        Self {
            timestamp: SystemTime::now(),
            level,
            code,
            message: message.to_string(),
            context: HashMap::new(),
        }
    }

    /// Create a new error event
    pub fn error(code: Code, message: &str) -> Self {
        Self::new(LogLevel::Error, code, message)
    }

    /// Create a new warning event (warnings may not have codes)
    pub fn warning(message: &str) -> Self {
        Self::new(LogLevel::Warning, Code::new("W000"), message)
    }

    /// Create a new info event
    pub fn info(message: &str) -> Self {
        Self::new(LogLevel::Info, Code::new("I000"), message)
    }

    /// Create a success event (info with success code)
    pub fn success(code: Code, message: &str) -> Self {
        Self::new(LogLevel::Info, code, message)
    }

    /// Create a debug event
    pub fn debug(message: &str) -> Self {
        Self::new(LogLevel::Debug, Code::new("D000"), message)
    }

    /// Add context data
    pub fn with_context(mut self, key: &str, value: &str) -> Self {
        self.context.insert(key.to_string(), value.to_string());
        self
    }

    pub fn is_error(&self) -> bool {
        self.level == LogLevel::Error
    }

    pub fn is_warning(&self) -> bool {
        self.level == LogLevel::Warning
    }

    pub fn is_info(&self) -> bool {
        self.level == LogLevel::Info
    }

    /// Get severity classification from the code registry
    pub fn severity(&self) -> &'static str {
        super::codes::get_severity(self.code.as_str()).as_str()
    }

    /// Get category from the code registry
    pub fn category(&self) -> &'static str {
        super::codes::get_category(self.code.as_str())
    }

    /// Format for plain-text display
    pub fn format(&self) -> String {
        let mut out = format!(
            "[{}] {} - {}",
            self.level.as_str(),
            self.code.as_str(),
            self.message
        );
        if !self.context.is_empty() {
            let mut pairs: Vec<_> = self.context.iter().collect();
            pairs.sort_by_key(|(k, _)| k.as_str());
            let rendered: Vec<String> =
                pairs.iter().map(|(k, v)| format!("{}={}", k, v)).collect();
            out.push_str(&format!(" ({})", rendered.join(", ")));
        }
        out
    }

    /// Format as a JSON line for structured logging
    pub fn format_json(&self) -> Result<String, serde_json::Error> {
        let timestamp = self
            .timestamp
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap_or_default()
            .as_secs();

        let mut json = serde_json::json!({
            "timestamp": timestamp,
            "level": self.level.as_str(),
            "code": self.code.as_str(),
            "message": self.message,
            "category": self.category(),
            "severity": self.severity(),
        });

        if !self.context.is_empty() {
            json["context"] = serde_json::Value::Object(
                self.context
                    .iter()
                    .map(|(k, v)| (k.clone(), serde_json::Value::String(v.clone())))
                    .collect(),
            );
        }

        serde_json::to_string(&json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logging::codes;

    #[test]
    fn test_error_event_creation() {
        let event = LogEvent::error(codes::include::INCLUDE_CYCLE, "cycle detected");

        assert!(event.is_error());
        assert_eq!(event.code.as_str(), "E031");
        assert_eq!(event.category(), "Include");
    }

    #[test]
    fn test_event_with_context() {
        let event = LogEvent::error(codes::file_source::FILE_TOO_LARGE, "too large")
            .with_context("size", "1024")
            .with_context("limit", "512");

        assert_eq!(event.context.get("size"), Some(&"1024".to_string()));
        assert_eq!(event.context.get("limit"), Some(&"512".to_string()));
    }

    #[test]
    fn test_event_formatting() {
        let event = LogEvent::error(codes::scanning::MALFORMED_NUMBER, "bad number");
        let formatted = event.format();

        assert!(formatted.contains("[ERROR]"));
        assert!(formatted.contains("E020"));
        assert!(formatted.contains("bad number"));
    }

    #[test]
    fn test_json_formatting() {
        let event = LogEvent::error(codes::file_source::PERMISSION_DENIED, "denied")
            .with_context("file", "test.cfg");

        let json = event.format_json().expect("serializable");
        assert!(json.contains("\"level\":\"ERROR\""));
        assert!(json.contains("\"code\":\"E008\""));
    }
}
