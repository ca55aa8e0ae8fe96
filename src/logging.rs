use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl LogLevel {
    fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Trace => "TRACE",
            LogLevel::Debug => "DEBUG",
            LogLevel::Info => "INFO ",
            LogLevel::Warn => "WARN ",
            LogLevel::Error => "ERROR",
        }
    }
}

impl From<LogLevel> for log::Level {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Trace => log::Level::Trace,
            LogLevel::Debug => log::Level::Debug,
            LogLevel::Info => log::Level::Info,
            LogLevel::Warn => log::Level::Warn,
            LogLevel::Error => log::Level::Error,
        }
    }
}

/// Diagnostic side channel handed to the analysis functions.
pub trait TimingLogger: Send + Sync {
    fn log(&self, level: LogLevel, component: &str, msg: &str);
}

/// Prints to stdout, dropping anything below `min_level`.
pub struct ConsoleLogger {
    min_level: LogLevel,
}

impl ConsoleLogger {
    pub fn new(min_level: LogLevel) -> Arc<Self> {
        Arc::new(Self { min_level })
    }
}

impl TimingLogger for ConsoleLogger {
    fn log(&self, level: LogLevel, component: &str, msg: &str) {
        if level < self.min_level {
            return;
        }
        println!("[{}] [{}] {}", level.as_str(), component, msg);
    }
}

/// Forwards to the `log` facade, using the component as the target.
pub struct LogFacade;

impl LogFacade {
    pub fn new() -> Arc<Self> {
        Arc::new(Self)
    }
}

impl TimingLogger for LogFacade {
    fn log(&self, level: LogLevel, component: &str, msg: &str) {
        log::log!(target: component, log::Level::from(level), "{}", msg);
    }
}

pub struct NullLogger;

impl TimingLogger for NullLogger {
    fn log(&self, _level: LogLevel, _component: &str, _msg: &str) {}
}

#[cfg(test)]
pub(crate) mod capture {
    use super::{LogLevel, TimingLogger};
    use std::sync::Mutex;

    /// Collects every record, for asserting on diagnostics in tests.
    #[derive(Default)]
    pub struct CaptureLogger {
        pub records: Mutex<Vec<(LogLevel, String, String)>>,
    }

    impl TimingLogger for CaptureLogger {
        fn log(&self, level: LogLevel, component: &str, msg: &str) {
            if let Ok(mut records) = self.records.lock() {
                records.push((level, component.to_string(), msg.to_string()));
            }
        }
    }
}
