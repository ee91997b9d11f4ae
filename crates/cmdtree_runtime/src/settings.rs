//! Console host configuration, loaded from TOML.
//!
//! ```toml
//! prompt = "> "
//! banner = true
//! players = ["alice", "bob"]
//!
//! [actor]
//! name = "console"
//! player = false
//! op = true
//! grant = ["sample.nbt", "sample.nbt.type"]
//! revoke = ["sample.user.remove"]
//!
//! [engine]
//! quotes = ['"']
//! max_completions = 20
//!
//! [log]
//! filter = "info,cmdtree_engine=debug"
//! ```

use std::fs;
use std::path::Path;

use cmdtree_engine::EngineConfig;
use serde::{Deserialize, Serialize};

use crate::error::{Result, RuntimeError};

/// Identity and permissions of the console actor.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ActorSettings {
    /// Display name.
    pub name: String,
    /// Whether the console acts as a live player.
    pub player: bool,
    /// Whether the console is an operator (for permission defaults).
    pub op: bool,
    /// Permissions granted outright (`*` grants everything).
    pub grant: Vec<String>,
    /// Permissions revoked regardless of grants and defaults.
    pub revoke: Vec<String>,
}

impl Default for ActorSettings {
    fn default() -> Self {
        Self {
            name: "console".to_string(),
            player: false,
            op: true,
            grant: Vec::new(),
            revoke: Vec::new(),
        }
    }
}

/// Logging configuration.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogSettings {
    /// `tracing` filter directive; `RUST_LOG` overrides it.
    pub filter: String,
}

impl Default for LogSettings {
    fn default() -> Self {
        Self {
            filter: "warn".to_string(),
        }
    }
}

/// Full console host configuration.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RuntimeConfig {
    /// REPL prompt.
    pub prompt: String,
    /// Whether to print the welcome banner.
    pub banner: bool,
    /// Players the demo commands treat as online.
    pub players: Vec<String>,
    /// Console actor settings.
    pub actor: ActorSettings,
    /// Engine settings.
    pub engine: EngineConfig,
    /// Logging settings.
    pub log: LogSettings,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            prompt: "> ".to_string(),
            banner: true,
            players: Vec::new(),
            actor: ActorSettings::default(),
            engine: EngineConfig::default(),
            log: LogSettings::default(),
        }
    }
}

impl RuntimeConfig {
    /// Parses a configuration from TOML text.
    ///
    /// # Errors
    ///
    /// Returns the TOML parse error.
    pub fn from_toml_str(text: &str) -> std::result::Result<Self, toml::de::Error> {
        toml::from_str(text)
    }

    /// Loads a configuration file.
    ///
    /// # Errors
    ///
    /// Returns [`RuntimeError::Io`] if the file cannot be read and
    /// [`RuntimeError::Config`] if it does not parse.
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path).map_err(|source| RuntimeError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text).map_err(|source| RuntimeError::Config {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Builder method to raise the log filter.
    #[must_use]
    pub fn with_log_filter(mut self, filter: impl Into<String>) -> Self {
        self.log.filter = filter.into();
        self
    }
}
