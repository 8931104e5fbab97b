// ⚙️ Configuration - TOML file with serde defaults
// Every section is optional; a missing file means all defaults.
//
// [calculation]  kua remap policy, current-year number
// [validation]   accepted birth-year range
// [grid]         placeholder for empty cells
// [narrative]    OpenAI-compatible endpoint used for readings
// [server]       bind address of loshu-server

use anyhow::{Context as AnyhowContext, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Environment variable that points at a config file
pub const CONFIG_ENV_VAR: &str = "LOSHU_CONFIG";

// ============================================================================
// SECTIONS
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalculationConfig {
    /// Traditional Feng Shui remap of a Kua of 5 (2 for males, 8 for females)
    #[serde(default)]
    pub apply_kua5_legacy_remap: bool,

    /// Also compute the personal year number for the current calendar year
    #[serde(default = "default_true")]
    pub include_current_year_number: bool,
}

impl Default for CalculationConfig {
    fn default() -> Self {
        Self {
            apply_kua5_legacy_remap: false,
            include_current_year_number: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationConfig {
    /// Earliest accepted birth year (the latest is always the current year)
    #[serde(default = "default_min_year")]
    pub min_year: i32,
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            min_year: default_min_year(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GridConfig {
    /// Text shown in a grid cell whose digit never occurs
    #[serde(default = "default_placeholder")]
    pub empty_placeholder: String,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            empty_placeholder: default_placeholder(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NarrativeConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Base URL of an OpenAI-compatible API (".../chat/completions" is appended)
    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    #[serde(default = "default_model")]
    pub model: String,

    /// Name of the environment variable holding the API key.
    /// The key itself never lives in the config file.
    #[serde(default = "default_api_key_env")]
    pub api_key_env: String,

    #[serde(default)]
    pub temperature: f32,

    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for NarrativeConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            endpoint: default_endpoint(),
            model: default_model(),
            api_key_env: default_api_key_env(),
            temperature: 0.0,
            timeout_secs: default_timeout_secs(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_bind_addr")]
    pub bind_addr: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: default_bind_addr(),
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_min_year() -> i32 {
    1900
}

fn default_placeholder() -> String {
    "—".to_string()
}

fn default_endpoint() -> String {
    "https://api.groq.com/openai/v1".to_string()
}

fn default_model() -> String {
    "meta-llama/llama-4-scout-17b-16e-instruct".to_string()
}

fn default_api_key_env() -> String {
    "GROQ_API_KEY".to_string()
}

fn default_timeout_secs() -> u64 {
    60
}

fn default_bind_addr() -> String {
    "0.0.0.0:3000".to_string()
}

// ============================================================================
// APP CONFIG
// ============================================================================

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub calculation: CalculationConfig,
    #[serde(default)]
    pub validation: ValidationConfig,
    #[serde(default)]
    pub grid: GridConfig,
    #[serde(default)]
    pub narrative: NarrativeConfig,
    #[serde(default)]
    pub server: ServerConfig,
}

impl AppConfig {
    /// Parse a TOML document
    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content).context("Failed to parse config TOML")
    }

    /// Load config from a TOML file (the file must exist)
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read config file: {:?}", path.as_ref()))?;

        Self::from_toml_str(&content)
            .with_context(|| format!("Invalid config file: {:?}", path.as_ref()))
    }

    /// Load from an explicit path, else from `$LOSHU_CONFIG`, else defaults.
    ///
    /// An explicit path that does not exist is an error; the env var is only
    /// honoured when it points at an existing file.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        if let Some(path) = path {
            return Self::load(path);
        }

        match std::env::var_os(CONFIG_ENV_VAR).map(PathBuf::from) {
            Some(env_path) if env_path.exists() => Self::load(env_path),
            Some(env_path) => {
                tracing::warn!(path = ?env_path, "{} points at a missing file, using defaults", CONFIG_ENV_VAR);
                Ok(Self::default())
            }
            None => Ok(Self::default()),
        }
    }

    /// Serialize back to TOML (used by `loshu config`)
    pub fn to_toml_string(&self) -> Result<String> {
        toml::to_string_pretty(self).context("Failed to serialize config")
    }
}
