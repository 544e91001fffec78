//! Configuration types for logtide.
//!
//! [`Config::load`] reads `~/.config/logtide/config.toml`, creating it with
//! hardcoded defaults if it does not yet exist, then applies `LOGTIDE__*`
//! environment overrides (e.g. `LOGTIDE__STREAM__DEFAULT_TAIL_DEPTH=500`).
//! [`Config::defaults`] returns the same defaults without touching the
//! filesystem (useful in tests).

use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::controller::check_tail_depth;
use crate::error::ConfigError;
use crate::renderer::{DisplayZone, RenderOptions};

// ---------------------------------------------------------------------------
// Embedded defaults
// ---------------------------------------------------------------------------

const DEFAULT_CONFIG: &str = r#"
[connection]
stream_url    = "ws://127.0.0.1:8080/logs"
directory_url = "http://127.0.0.1:8080"
token_env     = "LOGTIDE_TOKEN"
request_timeout_secs = 10

[stream]
default_tail_depth = 100
max_tail_depth     = 10000

[display]
show_timestamps = true
timezone        = "local"
"#;

// ---------------------------------------------------------------------------
// Public config types
// ---------------------------------------------------------------------------

/// Top-level application configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub connection: ConnectionConfig,
    #[serde(default)]
    pub stream: StreamConfig,
    #[serde(default)]
    pub display: DisplayConfig,
}

/// `[connection]` section of `config.toml`.
#[derive(Debug, Clone, Deserialize)]
pub struct ConnectionConfig {
    #[serde(default = "default_stream_url")]
    pub stream_url: String,
    #[serde(default = "default_directory_url")]
    pub directory_url: String,
    /// Name of the environment variable holding the bearer token. The token
    /// itself is never stored in the file.
    #[serde(default = "default_token_env")]
    pub token_env: String,
    #[serde(default)]
    pub server_hint: Option<String>,
    /// Bound on one inventory request, in seconds.
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

fn default_stream_url() -> String { "ws://127.0.0.1:8080/logs".to_string() }
fn default_directory_url() -> String { "http://127.0.0.1:8080".to_string() }
fn default_token_env() -> String { "LOGTIDE_TOKEN".to_string() }
fn default_request_timeout_secs() -> u64 { 10 }

impl Default for ConnectionConfig {
    fn default() -> Self {
        Self {
            stream_url: default_stream_url(),
            directory_url: default_directory_url(),
            token_env: default_token_env(),
            server_hint: None,
            request_timeout_secs: default_request_timeout_secs(),
        }
    }
}

impl ConnectionConfig {
    /// Read the bearer token from the configured environment variable.
    pub fn token(&self) -> Option<String> {
        std::env::var(&self.token_env).ok().filter(|t| !t.is_empty())
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs.max(1))
    }
}

/// `[stream]` section of `config.toml`.
#[derive(Debug, Clone, Deserialize)]
pub struct StreamConfig {
    #[serde(default = "default_tail_depth")]
    pub default_tail_depth: u32,
    #[serde(default = "default_max_tail_depth")]
    pub max_tail_depth: u32,
}

fn default_tail_depth() -> u32 { 100 }
fn default_max_tail_depth() -> u32 { 10_000 }

impl StreamConfig {
    /// Reject a default depth the controller would refuse as an intent.
    pub fn validate(&self) -> Result<(), ConfigError> {
        check_tail_depth(u64::from(self.default_tail_depth), self.max_tail_depth).map(|_| ())
    }
}

impl Default for StreamConfig {
    fn default() -> Self {
        Self {
            default_tail_depth: default_tail_depth(),
            max_tail_depth: default_max_tail_depth(),
        }
    }
}

/// `[display]` section of `config.toml`.
#[derive(Debug, Clone, Deserialize)]
pub struct DisplayConfig {
    #[serde(default = "default_show_timestamps")]
    pub show_timestamps: bool,
    #[serde(default)]
    pub timezone: DisplayZone,
}

fn default_show_timestamps() -> bool { true }

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            show_timestamps: default_show_timestamps(),
            timezone: DisplayZone::default(),
        }
    }
}

impl DisplayConfig {
    pub fn render_options(&self) -> RenderOptions {
        RenderOptions {
            show_timestamps: self.show_timestamps,
            zone: self.timezone,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::defaults()
    }
}

impl Config {
    /// Load from `~/.config/logtide/config.toml`, layered on top of the
    /// built-in defaults. Creates the file with defaults if it does not exist.
    pub fn load() -> anyhow::Result<Self> {
        let path = config_path();

        if !path.exists() {
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)?;
            }
            std::fs::write(&path, DEFAULT_CONFIG.trim_start())?;
        }

        Self::load_from(&path)
    }

    /// Load from an explicit file (which may be missing), layered on top of
    /// the built-in defaults and under the environment.
    pub fn load_from(path: &Path) -> anyhow::Result<Self> {
        let cfg: Self = config::Config::builder()
            .add_source(config::File::from_str(DEFAULT_CONFIG, config::FileFormat::Toml))
            .add_source(config::File::from(path).required(false))
            .add_source(config::Environment::with_prefix("LOGTIDE").separator("__"))
            .build()?
            .try_deserialize()?;
        cfg.stream.validate()?;
        Ok(cfg)
    }

    /// Return the built-in defaults without touching the filesystem.
    pub fn defaults() -> Self {
        config::Config::builder()
            .add_source(config::File::from_str(DEFAULT_CONFIG, config::FileFormat::Toml))
            .build()
            .expect("built-in default config must be valid TOML")
            .try_deserialize()
            .expect("built-in default config must deserialize correctly")
    }
}

// ---------------------------------------------------------------------------
// Path helpers
// ---------------------------------------------------------------------------

fn config_path() -> PathBuf {
    std::env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".to_string()))
                .join(".config")
        })
        .join("logtide")
        .join("config.toml")
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
