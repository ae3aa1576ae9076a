//! Logging capability handed to the shader cache.
//!
//! The cache never talks to a global logger directly: it receives an
//! `Arc<dyn Logger>` so applications choose the sink and tests can record
//! what was emitted. [DefaultLogger] forwards to the `log` facade.

/// Source used for every entry the shader cache emits
pub const SHADER_CACHE_SOURCE: &str = "shader_cache";

/// Implement this trait to route cache diagnostics somewhere else
pub trait Logger: Send + Sync {
    fn log(&self, entry: &LogEntry);
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogEntry {
    pub severity: LogSeverity,
    /// Module that produced the entry
    pub source: String,
    pub message: String,
}

impl LogEntry {
    pub fn new(severity: LogSeverity, source: &str, message: String) -> Self {
        LogEntry {
            severity,
            source: source.to_string(),
            message,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum LogSeverity {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl From<LogSeverity> for ::log::Level {
    fn from(severity: LogSeverity) -> Self {
        match severity {
            LogSeverity::Trace => ::log::Level::Trace,
            LogSeverity::Debug => ::log::Level::Debug,
            LogSeverity::Info => ::log::Level::Info,
            LogSeverity::Warn => ::log::Level::Warn,
            LogSeverity::Error => ::log::Level::Error,
        }
    }
}

/// Sends entries to whatever `log` implementation the application installed,
/// using the entry source as target.
#[derive(Debug, Default, Clone, Copy)]
pub struct DefaultLogger;

impl Logger for DefaultLogger {
    fn log(&self, entry: &LogEntry) {
        let level: ::log::Level = entry.severity.into();
        ::log::log!(target: entry.source.as_str(), level, "{}", entry.message);
    }
}

// ===== LOGGING MACROS =====

#[macro_export]
macro_rules! cache_log {
    ($logger:expr, $severity:expr, $($arg:tt)*) => {
        $crate::core::log::Logger::log(
            &*$logger,
            &$crate::core::log::LogEntry::new(
                $severity,
                $crate::core::log::SHADER_CACHE_SOURCE,
                format!($($arg)*),
            ),
        )
    };
}

#[macro_export]
macro_rules! cache_debug {
    ($logger:expr, $($arg:tt)*) => {
        $crate::cache_log!($logger, $crate::core::log::LogSeverity::Debug, $($arg)*)
    };
}

#[macro_export]
macro_rules! cache_info {
    ($logger:expr, $($arg:tt)*) => {
        $crate::cache_log!($logger, $crate::core::log::LogSeverity::Info, $($arg)*)
    };
}

#[macro_export]
macro_rules! cache_warn {
    ($logger:expr, $($arg:tt)*) => {
        $crate::cache_log!($logger, $crate::core::log::LogSeverity::Warn, $($arg)*)
    };
}

#[macro_export]
macro_rules! cache_error {
    ($logger:expr, $($arg:tt)*) => {
        $crate::cache_log!($logger, $crate::core::log::LogSeverity::Error, $($arg)*)
    };
}
