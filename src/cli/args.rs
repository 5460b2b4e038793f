use std::path::PathBuf;

use clap::{ArgAction, Parser, Subcommand};

use crate::translation::{Formality, LanguageKind};

#[derive(Parser, Debug)]
#[command(name = "sla-translate")]
#[command(about = "Translate the text of Scribus (.sla) documents with DeepL")]
#[command(version)]
pub struct Args {
    /// Scribus document to translate
    #[arg(short = 'f', long)]
    pub file: Option<PathBuf>,

    /// Output path [default: <name>_translated_to_<TARGET>.<ext> next to the input]
    #[arg(short = 'o', long)]
    pub output: Option<PathBuf>,

    /// Target language code (e.g. FR, DE, EN-US)
    #[arg(short = 't', long)]
    pub target: Option<String>,

    /// Source language code; detected automatically if omitted
    #[arg(short = 's', long)]
    pub source: Option<String>,

    /// DeepL API key [env: DEEPL_API_KEY]
    #[arg(short = 'k', long = "api_key", visible_alias = "api-key")]
    pub api_key: Option<String>,

    /// Retries after a transient API failure [default: 5]
    #[arg(short = 'r', long)]
    pub retry: Option<u32>,

    /// Seconds to wait between retries [default: 1]
    #[arg(short = 'd', long, allow_negative_numbers = true)]
    pub delay: Option<f64>,

    /// List supported source or target languages and exit
    #[arg(short = 'l', long, value_enum, value_name = "KIND")]
    pub list: Option<LanguageKind>,

    /// Formality of the translated text
    #[arg(long, value_enum)]
    pub formality: Option<Formality>,

    /// Also translate the document title, subject, keywords and comments
    #[arg(long)]
    pub metadata: bool,

    /// DeepL API base URL
    #[arg(long)]
    pub endpoint: Option<String>,

    /// Suppress status messages and the progress bar
    #[arg(short = 'q', long, global = true)]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short = 'v', long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Configure default settings
    Configure {
        /// Show current configuration
        #[arg(long)]
        show: bool,
    },
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_args_are_consistent() {
        Args::command().debug_assert();
    }

    #[test]
    fn test_parse_translate_flags() {
        let args = Args::try_parse_from([
            "sla-translate",
            "-f",
            "flyer.sla",
            "-t",
            "fr",
            "-s",
            "en",
            "-k",
            "key",
            "-r",
            "3",
            "-d",
            "0.5",
            "--formality",
            "prefer-less",
        ])
        .unwrap();

        assert_eq!(args.file, Some(PathBuf::from("flyer.sla")));
        assert_eq!(args.target.as_deref(), Some("fr"));
        assert_eq!(args.source.as_deref(), Some("en"));
        assert_eq!(args.api_key.as_deref(), Some("key"));
        assert_eq!(args.retry, Some(3));
        assert_eq!(args.delay, Some(0.5));
        assert_eq!(args.formality, Some(Formality::PreferLess));
        assert!(args.command.is_none());
    }

    #[test]
    fn test_api_key_accepts_both_spellings() {
        let underscore =
            Args::try_parse_from(["sla-translate", "--api_key", "a"]).unwrap();
        let hyphen = Args::try_parse_from(["sla-translate", "--api-key", "b"]).unwrap();

        assert_eq!(underscore.api_key.as_deref(), Some("a"));
        assert_eq!(hyphen.api_key.as_deref(), Some("b"));
    }

    #[test]
    fn test_list_kind() {
        let args = Args::try_parse_from(["sla-translate", "-l", "target"]).unwrap();
        assert_eq!(args.list, Some(LanguageKind::Target));

        assert!(Args::try_parse_from(["sla-translate", "-l", "both"]).is_err());
    }

    #[test]
    fn test_negative_delay_reaches_validation() {
        let args = Args::try_parse_from(["sla-translate", "-d", "-1"]).unwrap();
        assert_eq!(args.delay, Some(-1.0));
    }

    #[test]
    fn test_verbose_counts() {
        let args = Args::try_parse_from(["sla-translate", "-vv"]).unwrap();
        assert_eq!(args.verbose, 2);
    }

    #[test]
    fn test_configure_subcommand() {
        let args = Args::try_parse_from(["sla-translate", "configure", "--show"]).unwrap();
        assert!(matches!(args.command, Some(Command::Configure { show: true })));
    }
}
