//! Configuration module for the SCL scanner
//!
//! Compile-time limits live in `constants`; user-tunable behavior lives in
//! `runtime`. Limits are enforced unconditionally and cannot be relaxed at
//! runtime.

pub mod constants;
pub mod runtime;

pub use constants::compile_time;
pub use runtime::{
    FileSourcePreferences, LogLevelPreference, LoggingPreferences, ScannerPreferences,
};
