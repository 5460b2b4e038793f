//! # sla-translate - Scribus document translation
//!
//! `sla-translate` translates the text stored in Scribus `.sla` documents
//! through the DeepL API and writes a new document with the same layout.
//! Only story text (and, on request, document metadata) is sent; geometry,
//! styles and every other attribute are written back byte for byte.
//!
//! ## Quick Start
//!
//! ```bash
//! # Translate a document into French
//! export DEEPL_API_KEY="..."
//! sla-translate -f flyer.sla -t FR
//!
//! # List target languages
//! sla-translate -l target
//! ```
//!
//! ## Configuration
//!
//! Settings are stored in `~/.config/sla-translate/config.toml`:
//!
//! ```toml
//! [deepl]
//! api_key_env = "DEEPL_API_KEY"
//!
//! [translate]
//! target = "FR"
//! retry = 5
//! delay = 1.0
//! ```
//!
//! ## Library use
//!
//! The [`pipeline::Pipeline`] drives any [`translation::TranslationApi`]
//! implementation, so documents can be processed against a stub service:
//!
//! ```no_run
//! # async fn demo(config: sla_translate::config::Configuration) -> sla_translate::Result<()> {
//! use sla_translate::pipeline::Pipeline;
//! use sla_translate::translation::DeeplClient;
//!
//! let client = DeeplClient::new(config.api.api_key.clone(), None)
//!     .map_err(|e| sla_translate::Error::Config(e.to_string()))?;
//! let outcome = Pipeline::new(config, client).run(&mut |_| {}).await?;
//! println!("{} text unit(s) changed", outcome.units_changed);
//! # Ok(())
//! # }
//! ```

/// Command-line interface definitions and handlers.
pub mod cli;

/// Configuration file management and option resolution.
pub mod config;

/// XML document model, text location and rewriting.
pub mod document;

/// Error types and exit codes.
pub mod error;

/// File system utilities.
pub mod fs;

/// Global output configuration (quiet mode, colors, logging).
pub mod output;

/// XDG-style path utilities.
pub mod paths;

/// The load, translate and save state machine.
pub mod pipeline;

/// Translation API seam, DeepL client and retrying translator.
pub mod translation;

/// Terminal UI components (progress, colors).
pub mod ui;

pub use error::{Error, ErrorKind, Result};
