//! Type-safe logging macros using Code types with Display support

/// Log error with Code type - accepts Display types for context values
#[macro_export]
macro_rules! log_error {
    ($code:expr, $message:expr) => {
        $crate::logging::log_error_with_context($code, $message, vec![])
    };

    ($code:expr, $message:expr, $($key:expr => $value:expr),+) => {
        {
            let context_strings: Vec<(&str, String)> = vec![$(($key, format!("{}", $value))),+];
            let context_refs: Vec<(&str, &str)> = context_strings.iter()
                .map(|(k, v)| (*k, v.as_str()))
                .collect();
            $crate::logging::log_error_with_context($code, $message, context_refs)
        }
    };
}

/// Log success with Code type - accepts Display types for context values
#[macro_export]
macro_rules! log_success {
    ($code:expr, $message:expr) => {
        $crate::logging::log_success_with_context($code, $message, vec![])
    };

    ($code:expr, $message:expr, $($key:expr => $value:expr),+) => {
        {
            let context_strings: Vec<(&str, String)> = vec![$(($key, format!("{}", $value))),+];
            let context_refs: Vec<(&str, &str)> = context_strings.iter()
                .map(|(k, v)| (*k, v.as_str()))
                .collect();
            $crate::logging::log_success_with_context($code, $message, context_refs)
        }
    };
}

/// Log warning message - accepts Display types for context values
#[macro_export]
macro_rules! log_warning {
    ($message:expr) => {
        {
            if let Some(logger) = $crate::logging::try_get_global_logger() {
                logger.log_event($crate::logging::LogEvent::warning($message));
            }
        }
    };

    ($message:expr, $($key:expr => $value:expr),+) => {
        {
            let mut event = $crate::logging::LogEvent::warning($message);
            $(
                event = event.with_context($key, &format!("{}", $value));
            )+
            if let Some(logger) = $crate::logging::try_get_global_logger() {
                logger.log_event(event);
            }
        }
    };
}

/// Log debug message - accepts Display types for context values
#[macro_export]
macro_rules! log_debug {
    ($message:expr) => {
        {
            if $crate::logging::config::get_min_log_level() >= $crate::logging::LogLevel::Debug {
                if let Some(logger) = $crate::logging::try_get_global_logger() {
                    logger.log_event($crate::logging::LogEvent::debug($message));
                }
            }
        }
    };

    ($message:expr, $($key:expr => $value:expr),+) => {
        {
            if $crate::logging::config::get_min_log_level() >= $crate::logging::LogLevel::Debug {
                let mut event = $crate::logging::LogEvent::debug($message);
                $(
                    event = event.with_context($key, &format!("{}", $value));
                )+
                if let Some(logger) = $crate::logging::try_get_global_logger() {
                    logger.log_event(event);
                }
            }
        }
    };
}

#[cfg(test)]
mod tests {
    use crate::logging::codes;

    #[allow(dead_code)]
    fn example_usage() {
        let depth: usize = 3;
        let path = std::path::PathBuf::from("/etc/app/base.cfg");

        log_error!(codes::include::INCLUDE_TOO_DEEP, "Include nesting too deep",
            "depth" => depth,
            "file" => path.display()
        );

        log_success!(codes::success::SCAN_COMPLETE, "Scan finished",
            "tokens" => 157
        );

        log_warning!("Skipping unreadable directory entry", "entry" => "conf.d/50-local.cfg");

        log_debug!("Frame resumed", "line" => 12);
    }
}
