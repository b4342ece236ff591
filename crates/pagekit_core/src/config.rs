//! pagekit configuration.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;
use std::time::Duration;

use jsonc_parser::ParseOptions;
use jsonschema::Validator;
use reqwest::Url;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::http_client::{DEFAULT_TIMEOUT, TransportError};

// Embed the schema
const SCHEMA_JSON: &str = include_str!("../../../schemas/v1/config.json");
static CONFIG_SCHEMA: OnceLock<Validator> = OnceLock::new();

/// Configuration file names looked up in a directory, in order.
pub const CONFIG_FILE_NAMES: [&str; 2] = [".pagekit.jsonc", ".pagekit.json"];

/// Errors that can occur while loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The configuration file could not be read.
    #[error("Failed to read config {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The configuration is not valid JSON(C).
    #[error("Invalid config: {0}")]
    Parse(String),

    /// The configuration does not match the schema.
    #[error("Config validation failed: {0}")]
    Validation(String),

    /// `base_url` is not an absolute URL.
    #[error("Invalid base URL '{0}'")]
    InvalidBaseUrl(String),

    /// The HTTP transport could not be created.
    #[error("Transport error: {0}")]
    Transport(#[from] TransportError),
}

/// How a transport fault affects a page resolution.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransportFaultPolicy {
    /// Treat the fault like any other failed candidate and try the next one.
    #[default]
    Fallback,
    /// Stop the resolution with the fault.
    Abort,
}

/// Configuration for resolving pages.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PagekitConfig {
    /// Base URL relative identifiers are fetched from.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,

    /// Request timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Documents scanned for template declarations at startup.
    #[serde(default)]
    pub declarations: Vec<String>,

    /// Variables for page expressions.
    #[serde(default)]
    pub variables: HashMap<String, String>,

    /// Transport fault handling.
    #[serde(default)]
    pub transport_faults: TransportFaultPolicy,

    /// Directory relative declaration paths are resolved against.
    /// This is usually the directory containing the configuration file.
    #[serde(skip)]
    pub base_dir: Option<PathBuf>,
}

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT.as_secs()
}

impl PagekitConfig {
    /// Creates the default configuration.
    pub fn new() -> Self {
        Self {
            base_url: None,
            timeout_secs: default_timeout_secs(),
            declarations: Vec::new(),
            variables: HashMap::new(),
            transport_faults: TransportFaultPolicy::default(),
            base_dir: None,
        }
    }

    /// Finds a configuration file in `dir`.
    pub fn find(dir: impl AsRef<Path>) -> Option<PathBuf> {
        CONFIG_FILE_NAMES
            .iter()
            .map(|name| dir.as_ref().join(name))
            .find(|path| path.is_file())
    }

    /// Loads configuration from a file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        let mut config = Self::from_json(&content)?;

        if let Some(parent) = path.parent() {
            config.base_dir = Some(parent.to_path_buf());
        }

        Ok(config)
    }

    /// Parses configuration from a JSON or JSONC string with schema validation.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let value = jsonc_parser::parse_to_serde_value(json, &ParseOptions::default())
            .map_err(|e| ConfigError::Parse(e.to_string()))?
            .unwrap_or_else(|| serde_json::Value::Object(serde_json::Map::new()));

        let schema = CONFIG_SCHEMA.get_or_init(|| {
            let schema_json: serde_json::Value =
                serde_json::from_str(SCHEMA_JSON).expect("Invalid embedded config schema");
            Validator::new(&schema_json).expect("Invalid config schema compilation")
        });

        if let Err(e) = schema.validate(&value) {
            return Err(ConfigError::Validation(format!(
                "{} at {}",
                e,
                e.instance_path()
            )));
        }

        serde_json::from_value(value).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Parsed base URL.
    pub fn base_url(&self) -> Result<Option<Url>, ConfigError> {
        self.base_url
            .as_deref()
            .map(|raw| Url::parse(raw).map_err(|_| ConfigError::InvalidBaseUrl(raw.to_string())))
            .transpose()
    }

    /// Request timeout.
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Declaration documents, resolved against [`Self::base_dir`].
    pub fn declaration_paths(&self) -> Vec<PathBuf> {
        self.declarations
            .iter()
            .map(|p| match &self.base_dir {
                Some(dir) => dir.join(p),
                None => PathBuf::from(p),
            })
            .collect()
    }
}

impl Default for PagekitConfig {
    fn default() -> Self {
        Self::new()
    }
}
