use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::{Error, Result};
use crate::paths;
use crate::translation::{Formality, RetryPolicy, normalize_code};

/// Environment variable read for the API key when nothing else names one.
pub const DEFAULT_API_KEY_ENV: &str = "DEEPL_API_KEY";

pub const DEFAULT_RETRY: u32 = 5;
pub const DEFAULT_DELAY_SECS: f64 = 1.0;

/// The `[deepl]` section of config.toml.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DeeplConfig {
    /// API key stored directly in config (not recommended).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    /// Environment variable name containing the API key.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key_env: Option<String>,
    /// API base URL, overriding the one derived from the key.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub endpoint: Option<String>,
}

/// Default settings in the `[translate]` section of config.toml.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TranslateDefaults {
    /// Default target language code.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target: Option<String>,
    /// Default source language code.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub retry: Option<u32>,
    /// Seconds between retries.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub delay: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub formality: Option<Formality>,
    /// Translate document title, subject, keywords and comments too.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<bool>,
}

/// The complete configuration file structure.
///
/// Corresponds to `~/.config/sla-translate/config.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ConfigFile {
    #[serde(default)]
    pub deepl: DeeplConfig,
    #[serde(default)]
    pub translate: TranslateDefaults,
}

/// Snapshot of the process environment, taken once at startup.
#[derive(Debug, Clone, Default)]
pub struct Environment {
    vars: HashMap<String, String>,
}

impl Environment {
    pub fn capture() -> Self {
        Self {
            vars: std::env::vars().collect(),
        }
    }

    pub fn from_pairs<K: Into<String>, V: Into<String>>(
        pairs: impl IntoIterator<Item = (K, V)>,
    ) -> Self {
        Self {
            vars: pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    /// Returns a variable's value, treating empty values as unset.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.vars
            .get(name)
            .map(String::as_str)
            .filter(|v| !v.is_empty())
    }
}

/// Options for resolving configuration.
///
/// Contains CLI overrides that take precedence over config file values.
#[derive(Debug, Clone, Default)]
pub struct ResolveOptions {
    pub file: Option<PathBuf>,
    pub output: Option<PathBuf>,
    pub target: Option<String>,
    pub source: Option<String>,
    pub api_key: Option<String>,
    pub endpoint: Option<String>,
    pub retry: Option<u32>,
    pub delay: Option<f64>,
    pub formality: Option<Formality>,
    pub metadata: bool,
}

/// Everything needed to reach the translation API.
#[derive(Debug, Clone)]
pub struct ApiSettings {
    pub api_key: String,
    pub endpoint: Option<String>,
    pub retry: RetryPolicy,
}

/// Resolved configuration for one translation run.
#[derive(Debug, Clone)]
pub struct Configuration {
    pub api: ApiSettings,
    /// Source language code; `None` lets the API detect it.
    pub source_language: Option<String>,
    pub target_language: String,
    pub formality: Option<Formality>,
    pub include_metadata: bool,
    pub input: PathBuf,
    pub output: PathBuf,
}

/// Resolves the API key, endpoint and retry policy.
///
/// The key is taken from the CLI, then the environment variable named by
/// `api_key_env` (default `DEEPL_API_KEY`), then the config file.
pub fn resolve_api(
    options: &ResolveOptions,
    config_file: &ConfigFile,
    env: &Environment,
) -> Result<ApiSettings> {
    let env_var = config_file
        .deepl
        .api_key_env
        .as_deref()
        .unwrap_or(DEFAULT_API_KEY_ENV);

    let api_key = options
        .api_key
        .as_deref()
        .filter(|k| !k.is_empty())
        .or_else(|| env.get(env_var))
        .or(config_file.deepl.api_key.as_deref())
        .map(str::to_string)
        .ok_or_else(|| {
            Error::Config(format!(
                "Missing required configuration: DeepL API key\n\n\
                 Please provide it via:\n  \
                 - CLI option: sla-translate --api_key <key>\n  \
                 - Environment: export {env_var}=\"your-api-key\"\n  \
                 - Config file: api_key in ~/.config/sla-translate/config.toml"
            ))
        })?;

    let retries = options
        .retry
        .or(config_file.translate.retry)
        .unwrap_or(DEFAULT_RETRY);

    let delay = options
        .delay
        .or(config_file.translate.delay)
        .unwrap_or(DEFAULT_DELAY_SECS);
    let delay = Duration::try_from_secs_f64(delay).map_err(|e| {
        Error::Config(format!(
            "Invalid retry delay: {delay} ({e})\n\nThe delay must be a non-negative number of seconds."
        ))
    })?;

    Ok(ApiSettings {
        api_key,
        endpoint: options
            .endpoint
            .clone()
            .or_else(|| config_file.deepl.endpoint.clone()),
        retry: RetryPolicy { retries, delay },
    })
}

/// Resolves configuration by merging CLI options with config file settings.
///
/// CLI options take precedence over config file values.
///
/// # Errors
///
/// Returns [`Error::Config`] if the API key, target language or input file is
/// missing, or a value is out of range.
pub fn resolve_config(
    options: &ResolveOptions,
    config_file: &ConfigFile,
    env: &Environment,
) -> Result<Configuration> {
    let api = resolve_api(options, config_file, env)?;

    let target_language = options
        .target
        .as_deref()
        .or(config_file.translate.target.as_deref())
        .map(normalize_code)
        .filter(|code| !code.is_empty())
        .ok_or_else(|| {
            Error::Config(
                "Missing required configuration: target language\n\n\
                 Please provide it via:\n  \
                 - CLI option: sla-translate --target <code>\n  \
                 - Config file: Run 'sla-translate configure' to set up configuration"
                    .to_string(),
            )
        })?;

    let source_language = options
        .source
        .as_deref()
        .or(config_file.translate.source.as_deref())
        .map(normalize_code)
        .filter(|code| !code.is_empty());

    let input = options.file.clone().ok_or_else(|| {
        Error::Config(
            "Missing required argument: input file\n\n\
             Please provide it via: sla-translate --file <document.sla>"
                .to_string(),
        )
    })?;

    let output = options
        .output
        .clone()
        .unwrap_or_else(|| paths::default_output_path(&input, &target_language));

    Ok(Configuration {
        api,
        source_language,
        target_language,
        formality: options.formality.or(config_file.translate.formality),
        include_metadata: options.metadata || config_file.translate.metadata.unwrap_or(false),
        input,
        output,
    })
}

/// Manages loading and saving configuration files.
pub struct ConfigManager {
    config_path: PathBuf,
}

impl ConfigManager {
    /// Creates a new config manager.
    ///
    /// Configuration is stored at `$XDG_CONFIG_HOME/sla-translate/config.toml`
    /// or `~/.config/sla-translate/config.toml` if `XDG_CONFIG_HOME` is not set.
    pub fn new() -> Result<Self> {
        Ok(Self {
            config_path: paths::config_dir()?.join("config.toml"),
        })
    }

    pub fn at(config_path: impl Into<PathBuf>) -> Self {
        Self {
            config_path: config_path.into(),
        }
    }

    pub fn config_path(&self) -> &Path {
        &self.config_path
    }

    /// Loads the config file. A missing file yields the defaults; an
    /// unreadable or malformed one is a configuration error.
    pub fn load(&self) -> Result<ConfigFile> {
        let contents = match fs::read_to_string(&self.config_path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(ConfigFile::default()),
            Err(e) => {
                return Err(Error::Config(format!(
                    "Failed to read config file {}: {e}",
                    self.config_path.display()
                )));
            }
        };

        toml::from_str(&contents).map_err(|e| {
            Error::Config(format!(
                "Failed to parse config file {}: {e}",
                self.config_path.display()
            ))
        })
    }

    pub fn save(&self, config: &ConfigFile) -> Result<()> {
        if let Some(parent) = self.config_path.parent() {
            fs::create_dir_all(parent).map_err(Error::io(parent))?;
        }

        let contents = toml::to_string_pretty(config)
            .map_err(|e| Error::Config(format!("Failed to serialize config: {e}")))?;

        fs::write(&self.config_path, contents).map_err(Error::io(&self.config_path))
    }
}
