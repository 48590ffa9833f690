//! Configuration loading.
//!
//! Sources, later ones winning:
//! - `~/.arincli.{yaml,toml,json}` (or the file given with `--config`)
//! - environment variables (`APIKEY`, `BASEURL`)
//! - command-line flags

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use config::{Environment, File};
use directories::BaseDirs;
use serde::Deserialize;

use crate::error::CliError;

/// Config file stem looked up in the home directory.
const CONFIG_FILE_STEM: &str = ".arincli";

/// Production registry origin.
pub const DEFAULT_BASE_URL: &str = "https://reg.arin.net/";

/// Resolved CLI configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Registry API key.
    #[serde(rename = "apikey", default)]
    pub api_key: Option<String>,

    /// Registry origin (OTE: https://reg.ote.arin.net/).
    #[serde(rename = "baseurl", default = "default_base_url")]
    pub base_url: String,

    /// Echo raw response bodies to stderr.
    #[serde(skip)]
    pub dump: bool,

    #[serde(skip)]
    pub verbose: bool,

    /// File the settings came from, if any.
    #[serde(skip)]
    pub source: Option<PathBuf>,
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: default_base_url(),
            dump: false,
            verbose: false,
            source: None,
        }
    }
}

impl Config {
    /// Load config from `path`, or from the home directory when no path is
    /// given. An explicit path must exist; the home file is optional.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let (file, required) = match path {
            Some(path) => (path.to_path_buf(), true),
            None => (home_config_stem()?, false),
        };

        let file_source = File::from(file.as_path()).required(required);
        let settings = config::Config::builder()
            .add_source(file_source)
            .add_source(Environment::default())
            .build()
            .with_context(|| format!("Failed to read config from {:?}", file))?;

        let mut config: Self = settings
            .try_deserialize()
            .with_context(|| format!("Failed to parse config from {:?}", file))?;
        config.source = resolve_source(&file);
        Ok(config)
    }

    /// The API key, which every registry call needs.
    pub fn require_api_key(&self) -> Result<&str, CliError> {
        match self.api_key.as_deref().map(str::trim) {
            Some(key) if !key.is_empty() => Ok(key),
            _ => Err(CliError::MissingApiKey),
        }
    }
}

fn home_config_stem() -> Result<PathBuf> {
    BaseDirs::new()
        .map(|dirs| dirs.home_dir().join(CONFIG_FILE_STEM))
        .ok_or_else(|| anyhow::anyhow!("Could not determine home directory"))
}

/// Report the file actually read: `File::from` also tries known extensions
/// when the path has none.
fn resolve_source(file: &Path) -> Option<PathBuf> {
    if file.is_file() {
        return Some(file.to_path_buf());
    }
    ["yaml", "yml", "toml", "json"]
        .iter()
        .map(|ext| {
            let mut name = file.as_os_str().to_owned();
            name.push(".");
            name.push(ext);
            PathBuf::from(name)
        })
        .find(|candidate| candidate.is_file())
}
