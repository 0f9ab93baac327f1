//! Per-instance logger.
//!
//! Wraps the `log` facade with the instance identity and the verbosity
//! configured through `log_level`. The backend itself (env_logger or
//! whatever the host installs) is not configured here.

use std::fmt;
use std::sync::Arc;

use log::{Level, LevelFilter};

pub const LOG_TARGET: &str = "kafka";

#[derive(Debug, Clone)]
pub struct InstanceLogger {
    instance: Arc<str>,
    filter: LevelFilter,
}

impl InstanceLogger {
    pub fn new(instance: impl Into<Arc<str>>, filter: LevelFilter) -> Self {
        Self {
            instance: instance.into(),
            filter,
        }
    }

    pub fn instance(&self) -> &str {
        &self.instance
    }

    pub fn filter(&self) -> LevelFilter {
        self.filter
    }

    pub fn enabled(&self, level: Level) -> bool {
        level <= self.filter
    }

    pub fn log(&self, level: Level, args: fmt::Arguments<'_>) {
        if self.enabled(level) {
            log::log!(target: LOG_TARGET, level, "[{}] {}", self.instance, args);
        }
    }

    pub fn debug(&self, args: fmt::Arguments<'_>) {
        self.log(Level::Debug, args);
    }

    pub fn info(&self, args: fmt::Arguments<'_>) {
        self.log(Level::Info, args);
    }

    pub fn warn(&self, args: fmt::Arguments<'_>) {
        self.log(Level::Warn, args);
    }

    pub fn error(&self, args: fmt::Arguments<'_>) {
        self.log(Level::Error, args);
    }
}
