//! Tracing / logging initialisation.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Log level per component.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogConfig {
    /// Global default level: "trace" | "debug" | "info" | "warn" | "error"
    #[serde(default = "default_level")]
    pub level: String,
    /// Override per component: component name → level. Short names
    /// (`resolver`) expand to the crate target (`calldecode_resolver`).
    #[serde(default)]
    pub components: BTreeMap<String, String>,
    /// Emit JSON structured logs (true) or human-readable text (false)
    #[serde(default)]
    pub json: bool,
}

fn default_level() -> String {
    "info".to_string()
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: default_level(),
            components: BTreeMap::new(),
            json: false,
        }
    }
}

const COMPONENTS: [&str; 4] = ["core", "abi", "resolver", "pipeline"];

impl LogConfig {
    /// The `EnvFilter` directive string, e.g. `info,calldecode_resolver=debug`.
    pub fn directives(&self) -> String {
        let mut directives = self.level.clone();
        for (component, level) in &self.components {
            let target = if COMPONENTS.contains(&component.as_str()) {
                format!("calldecode_{component}")
            } else {
                component.replace('-', "_")
            };
            directives.push_str(&format!(",{target}={level}"));
        }
        directives
    }
}

#[derive(Debug, Error)]
pub enum InitError {
    #[error("invalid log directives '{directives}': {reason}")]
    InvalidDirectives { directives: String, reason: String },

    #[error("a global tracing subscriber is already installed: {0}")]
    AlreadyInitialised(String),
}

/// Install the global subscriber described by `config`.
/// Call once at application startup.
pub fn init_tracing(config: &LogConfig) -> Result<(), InitError> {
    let directives = config.directives();
    let filter = EnvFilter::try_new(&directives).map_err(|e| InitError::InvalidDirectives {
        reason: e.to_string(),
        directives,
    })?;

    let registry = tracing_subscriber::registry().with(filter);
    let result = if config.json {
        registry.with(fmt::layer().json()).try_init()
    } else {
        registry.with(fmt::layer()).try_init()
    };
    result.map_err(|e| InitError::AlreadyInitialised(e.to_string()))
}
