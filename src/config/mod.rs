//! Configuration file management and option resolution.

mod manager;

pub use manager::{
    ApiSettings, ConfigFile, ConfigManager, Configuration, DEFAULT_API_KEY_ENV,
    DEFAULT_DELAY_SECS, DEFAULT_RETRY, DeeplConfig, Environment, ResolveOptions,
    TranslateDefaults, resolve_api, resolve_config,
};
