//! Error taxonomy for the translation pipeline.
//!
//! Every failure that can end a run is one [`Error`] variant. The variant's
//! [`ErrorKind`] drives the terminal pipeline state, the message prefix shown
//! to the user and the process exit code.

use std::fmt;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::translation::{ApiError, LanguageKind};

/// Errors that can end a translation run.
#[derive(Error, Debug)]
pub enum Error {
    /// Missing or invalid configuration (no API key, no target language, ...).
    #[error("{0}")]
    Config(String),

    /// The input is not a well-formed Scribus document.
    #[error("{0}")]
    Parse(String),

    /// The requested language is not offered by the translation API.
    #[error(
        "{kind} language '{code}' is not supported\n\nSupported {kind} languages: {}",
        supported.join(", ")
    )]
    UnsupportedLanguage {
        kind: LanguageKind,
        code: String,
        supported: Vec<String>,
    },

    /// The API rejected the key.
    #[error("translation API rejected the API key: {0}")]
    Auth(String),

    /// The account's character quota is used up.
    #[error("translation quota exceeded: {0}")]
    QuotaExceeded(String),

    /// The API call did not succeed, after retries where the failure was transient.
    #[error("translation failed after {attempts} attempt(s): {cause}")]
    Translation {
        attempts: u32,
        #[source]
        cause: ApiError,
    },

    /// Translated text could not be written back into the document.
    #[error("{0}")]
    Rewrite(String),

    #[error("{}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Config(_) => ErrorKind::Config,
            Self::Parse(_) => ErrorKind::Parse,
            Self::UnsupportedLanguage { .. } => ErrorKind::UnsupportedLanguage,
            Self::Auth(_) => ErrorKind::Auth,
            Self::QuotaExceeded(_) => ErrorKind::QuotaExceeded,
            Self::Translation { .. } => ErrorKind::Translation,
            Self::Rewrite(_) => ErrorKind::Rewrite,
            Self::Io { .. } => ErrorKind::Io,
        }
    }

    /// Returns a closure wrapping an I/O error with the path it happened on.
    pub fn io(path: &Path) -> impl FnOnce(io::Error) -> Self + '_ {
        move |source| Self::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}

/// The category of an [`Error`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    Config,
    Parse,
    UnsupportedLanguage,
    Auth,
    QuotaExceeded,
    Translation,
    Rewrite,
    Io,
}

impl ErrorKind {
    /// Process exit status for a run that failed with this kind of error.
    pub const fn exit_code(self) -> exitcode::ExitCode {
        match self {
            Self::Config => exitcode::CONFIG,
            Self::Parse => exitcode::DATAERR,
            Self::UnsupportedLanguage => exitcode::USAGE,
            Self::Auth => exitcode::NOPERM,
            Self::QuotaExceeded => exitcode::UNAVAILABLE,
            Self::Translation => exitcode::TEMPFAIL,
            Self::Rewrite => exitcode::SOFTWARE,
            Self::Io => exitcode::IOERR,
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            Self::Config => "ConfigError",
            Self::Parse => "ParseError",
            Self::UnsupportedLanguage => "UnsupportedLanguageError",
            Self::Auth => "AuthError",
            Self::QuotaExceeded => "QuotaExceededError",
            Self::Translation => "TranslationError",
            Self::Rewrite => "RewriteError",
            Self::Io => "IoError",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

pub type Result<T> = std::result::Result<T, Error>;
