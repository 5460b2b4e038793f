//! Command-line interface definitions and handlers.

/// CLI argument parsing with clap.
pub mod args;

/// Subcommand implementations.
pub mod commands;

pub use args::{Args, Command};

use crate::config::ResolveOptions;

impl Args {
    /// The options that feed configuration resolution.
    pub fn resolve_options(&self) -> ResolveOptions {
        ResolveOptions {
            file: self.file.clone(),
            output: self.output.clone(),
            target: self.target.clone(),
            source: self.source.clone(),
            api_key: self.api_key.clone(),
            endpoint: self.endpoint.clone(),
            retry: self.retry,
            delay: self.delay,
            formality: self.formality,
            metadata: self.metadata,
        }
    }
}
