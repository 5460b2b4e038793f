//! Global output configuration and logging setup.
//!
//! ## Design Principles
//!
//! - Listings (supported languages, configuration) go to stdout
//! - Status messages, progress and logs go to stderr
//! - Errors always go to stderr
//! - Quiet mode suppresses status lines and the progress bar
//! - Colors can be disabled via flag or NO_COLOR environment variable

use std::io::Write;
use std::sync::OnceLock;

use log::LevelFilter;

static OUTPUT_CONFIG: OnceLock<OutputConfig> = OnceLock::new();

/// How user-facing output should look for this process.
#[derive(Debug, Clone, Default)]
pub struct OutputConfig {
    pub quiet: bool,
    pub no_color: bool,
}

impl OutputConfig {
    /// Combines the `--quiet`/`--no-color` flags with `NO_COLOR`
    /// (<https://no-color.org/>).
    pub fn from_flags(quiet: bool, no_color: bool) -> Self {
        Self {
            quiet,
            no_color: no_color || std::env::var_os("NO_COLOR").is_some(),
        }
    }
}

/// Sets the process-wide output configuration. Only the first call wins.
pub fn init(config: OutputConfig) {
    let _ = OUTPUT_CONFIG.set(config);
}

pub fn config() -> &'static OutputConfig {
    OUTPUT_CONFIG.get_or_init(|| OutputConfig::from_flags(false, false))
}

pub fn is_quiet() -> bool {
    config().quiet
}

pub fn is_no_color() -> bool {
    config().no_color
}

/// Maps the number of `-v` flags to a log level.
pub const fn level_for_verbosity(verbose: u8) -> LevelFilter {
    match verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    }
}

/// Installs the `env_logger` backend for the `log` facade.
///
/// `RUST_LOG` overrides the level picked from `-v` flags. Quiet mode
/// lowers the default to errors only.
pub fn init_logger(verbose: u8) {
    let level = if is_quiet() && verbose == 0 {
        LevelFilter::Error
    } else {
        level_for_verbosity(verbose)
    };

    let _ = env_logger::Builder::new()
        .filter_level(level)
        .parse_env("RUST_LOG")
        .format(|buf, record| {
            writeln!(
                buf,
                "{}: {}",
                record.level().as_str().to_ascii_lowercase(),
                record.args()
            )
        })
        .try_init();
}

/// Print a status message to stderr (respects quiet mode).
///
/// Use this for progress indicators, informational messages, etc.
#[macro_export]
macro_rules! status {
    ($($arg:tt)*) => {
        if !$crate::output::is_quiet() {
            eprintln!($($arg)*);
        }
    };
}
