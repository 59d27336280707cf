// Logging utilities for the Phraseless certificate stack
//
// This module provides:
// - Component-based structured logging on top of the `log` facade
// - Identity tracking through logger inheritance
// - A small logging configuration that initializes `env_logger`

use log::{debug, error, info, warn};
use serde::{Deserialize, Serialize};
use std::fmt::{self, Arguments, Display, Formatter};
use std::sync::Once;

/// Predefined components for logging categorization
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Component {
    Certs,
    Codec,
    Chain,
    Challenge,
    Trust,
    Config,
    Custom(&'static str),
}

impl Component {
    /// Get the string representation of the component
    pub fn as_str(&self) -> &str {
        match self {
            Component::Certs => "Certs",
            Component::Codec => "Codec",
            Component::Chain => "Chain",
            Component::Challenge => "Challenge",
            Component::Trust => "Trust",
            Component::Config => "Config",
            Component::Custom(name) => name,
        }
    }
}

// Display helper to avoid allocating the prefix on every log call
struct ComponentPrefixDisplay {
    parent: Option<Component>,
    component: Component,
}

impl Display for ComponentPrefixDisplay {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self.parent {
            Some(parent) => write!(f, "{}.{}", parent.as_str(), self.component.as_str()),
            None => write!(f, "{}", self.component.as_str()),
        }
    }
}

/// A component-scoped logger tagged with the identity it acts for
#[derive(Clone, Debug)]
pub struct Logger {
    component: Component,
    /// Label of the local identity (e.g. a certificate name or key id)
    identity: String,
    parent_component: Option<Component>,
}

impl Logger {
    /// Create a new root logger for a component and identity label
    pub fn new_root(component: Component, identity: &str) -> Self {
        Self {
            component,
            identity: identity.to_string(),
            parent_component: None,
        }
    }

    /// Create a child logger with the same identity but a different component
    pub fn with_component(&self, component: Component) -> Self {
        Self {
            component,
            identity: self.identity.clone(),
            parent_component: Some(self.component),
        }
    }

    /// Replace the identity label, keeping the component hierarchy
    pub fn with_identity(&self, identity: impl Into<String>) -> Self {
        Self {
            component: self.component,
            identity: identity.into(),
            parent_component: self.parent_component,
        }
    }

    pub fn identity(&self) -> &str {
        &self.identity
    }

    pub fn component(&self) -> Component {
        self.component
    }

    fn prefix(&self) -> ComponentPrefixDisplay {
        ComponentPrefixDisplay {
            parent: self.parent_component,
            component: self.component,
        }
    }

    /// Full prefix as an owned string, e.g. `Trust.Chain`
    pub fn component_prefix(&self) -> String {
        self.prefix().to_string()
    }

    /// Log a debug message
    pub fn debug(&self, message: impl Into<String>) {
        if log::log_enabled!(log::Level::Debug) {
            debug!("[{}][{}] {}", self.identity, self.prefix(), message.into());
        }
    }

    /// Log a debug message using fmt::Arguments (avoids allocating message String)
    pub fn debug_args(&self, args: Arguments) {
        if log::log_enabled!(log::Level::Debug) {
            debug!("[{}][{}] {}", self.identity, self.prefix(), args);
        }
    }

    /// Log an info message
    pub fn info(&self, message: impl Into<String>) {
        if log::log_enabled!(log::Level::Info) {
            info!("[{}][{}] {}", self.identity, self.prefix(), message.into());
        }
    }

    pub fn info_args(&self, args: Arguments) {
        if log::log_enabled!(log::Level::Info) {
            info!("[{}][{}] {}", self.identity, self.prefix(), args);
        }
    }

    /// Log a warning message
    pub fn warn(&self, message: impl Into<String>) {
        if log::log_enabled!(log::Level::Warn) {
            warn!("[{}][{}] {}", self.identity, self.prefix(), message.into());
        }
    }

    pub fn warn_args(&self, args: Arguments) {
        if log::log_enabled!(log::Level::Warn) {
            warn!("[{}][{}] {}", self.identity, self.prefix(), args);
        }
    }

    /// Log an error message
    pub fn error(&self, message: impl Into<String>) {
        if log::log_enabled!(log::Level::Error) {
            error!("[{}][{}] {}", self.identity, self.prefix(), message.into());
        }
    }

    pub fn error_args(&self, args: Arguments) {
        if log::log_enabled!(log::Level::Error) {
            error!("[{}][{}] {}", self.identity, self.prefix(), args);
        }
    }
}

/// Log levels accepted by [`LoggingConfig`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
    Off,
}

impl LogLevel {
    pub fn to_level_filter(self) -> log::LevelFilter {
        match self {
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
            LogLevel::Off => log::LevelFilter::Off,
        }
    }
}

/// Logging configuration
///
/// `RUST_LOG` still wins over `level` when it is set, so operators can
/// raise verbosity without touching configuration files.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct LoggingConfig {
    #[serde(default)]
    pub level: LogLevel,
    /// Extra `env_logger` filter directives, e.g. `phraseless_certs=debug`
    #[serde(default)]
    pub filter: Option<String>,
}

static INIT: Once = Once::new();

impl LoggingConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_level(mut self, level: LogLevel) -> Self {
        self.level = level;
        self
    }

    pub fn with_filter(mut self, filter: impl Into<String>) -> Self {
        self.filter = Some(filter.into());
        self
    }

    /// Install the global logger. Only the first call has an effect.
    pub fn apply(&self) {
        let level = self.level.to_level_filter();
        let filter = self.filter.clone();
        INIT.call_once(move || {
            let mut builder = env_logger::Builder::new();
            builder.filter_level(level);
            if let Some(directives) = filter {
                builder.parse_filters(&directives);
            }
            if let Ok(env) = std::env::var("RUST_LOG") {
                builder.parse_filters(&env);
            }
            // Another crate may already have installed a logger.
            let _ = builder.try_init();
        });
    }
}
