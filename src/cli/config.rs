use clap::{Parser, Subcommand};
use serde::{Deserialize, Serialize};

use crate::provider::analyzer::{DEFAULT_ENDPOINT, DEFAULT_MODEL, DEFAULT_TIMEOUT_SECS};
use crate::server::routes::DEFAULT_MAX_BODY_BYTES;
use crate::ui::profile::NormalizeProfile;

pub const DEFAULT_CONFIG_PATH: &str = "sketch-enhancer.yaml";
pub const API_KEY_ENV: &str = "GEMINI_API_KEY";

// ============================================================================
// CLI Argument Parsing (clap derive)
// ============================================================================

#[derive(Parser, Debug)]
#[command(
    name = "sketch-enhancer",
    version,
    about = "Turns UI sketches into normalized UI element trees"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Verbosity level (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Path to config file (default: sketch-enhancer.yaml in current dir)
    #[arg(long, global = true)]
    pub config: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the HTTP service
    Serve {
        /// Interface to bind
        #[arg(long)]
        host: Option<String>,

        /// Port to bind
        #[arg(long)]
        port: Option<u16>,

        /// Normalizer profile: minimal, standard, label-merge, container-fold, full
        #[arg(long)]
        profile: Option<String>,

        /// Answer every image with the contents of this file instead of calling the provider
        #[arg(long)]
        mock_response: Option<String>,

        /// Append one JSON line per analysis request to this file
        #[arg(long)]
        trace_file: Option<String>,
    },

    /// Normalize a UI element JSON file and print the result
    Normalize {
        /// JSON file: {"ui_elements": [...]}, an array, or a single element
        #[arg(short, long)]
        input: String,

        /// Normalizer profile: minimal, standard, label-merge, container-fold, full
        #[arg(long)]
        profile: Option<String>,

        /// Pretty-print the output
        #[arg(long, default_value_t = false)]
        pretty: bool,
    },
}

// ============================================================================
// Config File Model (optional YAML)
// ============================================================================

/// Optional YAML config file: `sketch-enhancer.yaml`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub provider: ProviderConfig,
    #[serde(default)]
    pub normalizer: NormalizerConfig,
    #[serde(default)]
    pub trace: TraceConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    #[serde(default = "default_max_body_bytes")]
    pub max_body_bytes: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            max_body_bytes: default_max_body_bytes(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    #[serde(default = "default_model")]
    pub model: String,

    /// Falls back to the GEMINI_API_KEY environment variable.
    pub api_key: Option<String>,

    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            model: default_model(),
            api_key: None,
            timeout_secs: default_timeout_secs(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NormalizerConfig {
    #[serde(default)]
    pub profile: NormalizeProfile,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TraceConfig {
    pub path: Option<String>,
}

// Serde default helpers
fn default_host() -> String { "0.0.0.0".to_string() }
fn default_port() -> u16 { 5003 }
fn default_max_body_bytes() -> usize { DEFAULT_MAX_BODY_BYTES }
fn default_endpoint() -> String { DEFAULT_ENDPOINT.to_string() }
fn default_model() -> String { DEFAULT_MODEL.to_string() }
fn default_timeout_secs() -> u64 { DEFAULT_TIMEOUT_SECS }

// ============================================================================
// Config File Loading
// ============================================================================

/// Load config from a YAML file. Returns defaults if file is missing or malformed.
pub fn load_config(path: Option<&str>) -> AppConfig {
    let config_path = path.unwrap_or(DEFAULT_CONFIG_PATH);
    match std::fs::read_to_string(config_path) {
        Ok(content) => serde_yaml::from_str(&content).unwrap_or_else(|e| {
            tracing::warn!(path = config_path, error = %e, "ignoring malformed config file");
            AppConfig::default()
        }),
        Err(_) => AppConfig::default(),
    }
}

// ============================================================================
// Resolution (CLI > config file > environment > defaults)
// ============================================================================

/// Resolve the profile name given on the command line against the config.
pub fn resolve_profile(
    cli_profile: Option<&str>,
    config: &AppConfig,
) -> Result<NormalizeProfile, crate::ui::profile::UnknownProfile> {
    match cli_profile {
        Some(name) => name.parse(),
        None => Ok(config.normalizer.profile),
    }
}

/// API key from the config file, then the environment.
pub fn resolve_api_key(config: &AppConfig) -> Option<String> {
    config
        .provider
        .api_key
        .clone()
        .filter(|k| !k.is_empty())
        .or_else(|| std::env::var(API_KEY_ENV).ok().filter(|k| !k.is_empty()))
}

pub fn bind_address(host: Option<&str>, port: Option<u16>, config: &AppConfig) -> String {
    format!(
        "{}:{}",
        host.unwrap_or(&config.server.host),
        port.unwrap_or(config.server.port)
    )
}
