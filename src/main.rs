use std::process::ExitCode;

use clap::Parser;

use sla_translate::cli::commands::{configure, languages, translate};
use sla_translate::cli::{Args, Command};
use sla_translate::output::{self, OutputConfig};
use sla_translate::ui::Style;

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();

    output::init(OutputConfig::from_flags(args.quiet, args.no_color));
    output::init_logger(args.verbose);

    let options = args.resolve_options();
    let result = match (&args.command, args.list) {
        (Some(Command::Configure { show }), _) => configure::run_configure(*show),
        (None, Some(kind)) => languages::run_languages(kind, &options).await,
        (None, None) => translate::run_translate(&options).await,
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => report(&err),
    }
}

fn report(err: &anyhow::Error) -> ExitCode {
    let (label, code) = err
        .downcast_ref::<sla_translate::Error>()
        .map_or(("error".to_string(), 1), |e| {
            (format!("error[{}]", e.kind()), e.kind().exit_code())
        });

    eprintln!("{}: {err}", Style::error(label));
    ExitCode::from(u8::try_from(code).unwrap_or(1))
}
