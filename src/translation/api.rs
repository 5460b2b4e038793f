//! The seam between the pipeline and a remote translation service.

use std::fmt;
use std::future::Future;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Which side of a translation a language list describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, clap::ValueEnum)]
pub enum LanguageKind {
    Source,
    Target,
}

impl LanguageKind {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Source => "source",
            Self::Target => "target",
        }
    }
}

impl fmt::Display for LanguageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A language offered by the translation service.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Language {
    /// Code to send back to the API, e.g. `EN-US`.
    pub language: String,
    pub name: String,
    /// Only reported for target languages.
    #[serde(default)]
    pub supports_formality: Option<bool>,
}

/// How formal the translated text should sound.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum Formality {
    Default,
    More,
    Less,
    PreferMore,
    PreferLess,
}

impl Formality {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Default => "default",
            Self::More => "more",
            Self::Less => "less",
            Self::PreferMore => "prefer_more",
            Self::PreferLess => "prefer_less",
        }
    }
}

/// One call's worth of text.
#[derive(Debug, Clone, Copy)]
pub struct TranslateRequest<'a> {
    pub texts: &'a [String],
    /// Source language code; `None` lets the service detect it.
    pub source: Option<&'a str>,
    pub target: &'a str,
    pub formality: Option<Formality>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Translation {
    pub text: String,
    #[serde(default)]
    pub detected_source_language: Option<String>,
}

/// A single failed exchange with the translation service.
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("network error: {0}")]
    Network(String),

    #[error("HTTP {status}: {message}")]
    Status { status: u16, message: String },

    #[error("unexpected response: {0}")]
    Decode(String),
}

/// How the translator reacts to an [`ApiError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureClass {
    /// Worth retrying after a delay.
    Transient,
    Auth,
    Quota,
    /// Retrying would fail the same way.
    Permanent,
}

impl ApiError {
    pub const fn class(&self) -> FailureClass {
        match self {
            Self::Network(_) => FailureClass::Transient,
            Self::Status { status, .. } => match *status {
                401 | 403 => FailureClass::Auth,
                456 => FailureClass::Quota,
                429 | 500..=599 => FailureClass::Transient,
                _ => FailureClass::Permanent,
            },
            Self::Decode(_) => FailureClass::Permanent,
        }
    }
}

/// A remote translation service.
///
/// Implementations make exactly one attempt per call; retrying, batching and
/// language validation are handled by [`super::Translator`].
pub trait TranslationApi {
    /// Translates `request.texts`, returning one translation per text in
    /// the same order.
    fn translate(
        &self,
        request: TranslateRequest<'_>,
    ) -> impl Future<Output = Result<Vec<Translation>, ApiError>> + Send;

    fn languages(
        &self,
        kind: LanguageKind,
    ) -> impl Future<Output = Result<Vec<Language>, ApiError>> + Send;
}
