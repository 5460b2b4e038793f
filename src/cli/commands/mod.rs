//! Subcommand implementations.

use crate::config::ApiSettings;
use crate::error::{Error, Result};
use crate::translation::DeeplClient;

/// Configure command handler.
pub mod configure;

/// Language listing handler.
pub mod languages;

/// Translation command handler.
pub mod translate;

/// Builds the DeepL client for resolved API settings.
fn connect(api: &ApiSettings) -> Result<DeeplClient> {
    let client = DeeplClient::new(api.api_key.clone(), api.endpoint.clone())
        .map_err(|e| Error::Config(e.to_string()))?;
    log::info!("using DeepL endpoint {}", client.endpoint());
    Ok(client)
}
