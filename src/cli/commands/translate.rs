use anyhow::Result;

use super::connect;
use crate::config::{ConfigManager, Environment, ResolveOptions, resolve_config};
use crate::pipeline::{Pipeline, PipelineEvent, State};
use crate::status;
use crate::ui::{Progress, Style};

/// Translates one document and writes the result next to it (or to `--output`).
pub async fn run_translate(options: &ResolveOptions) -> Result<()> {
    let env = Environment::capture();
    let file_config = ConfigManager::new()?.load()?;
    let config = resolve_config(options, &file_config, &env)?;

    let client = connect(&config.api)?;
    let auto_detect = config.source_language.is_none();
    let target = config.target_language.clone();

    status!(
        "{} {} {} {}",
        Style::label("Translating"),
        Style::value(config.input.display()),
        Style::secondary("to"),
        Style::code(&target)
    );

    let progress = Progress::new("Loading document...");
    let mut observer = move |event: PipelineEvent| match event {
        PipelineEvent::Entered(State::Loaded) => progress.set_message("Locating text..."),
        PipelineEvent::Located { units } => progress.start_bar(units, "Translating"),
        PipelineEvent::Progress { done, .. } => progress.set_position(done),
        PipelineEvent::Entered(State::Translated) => progress.set_message("Rewriting..."),
        PipelineEvent::Entered(State::Rewritten) => progress.set_message("Saving..."),
        PipelineEvent::Entered(State::Saved | State::Failed(_)) => progress.stop(),
        PipelineEvent::Entered(_) => {}
    };

    let mut pipeline = Pipeline::new(config, client);
    let outcome = pipeline.run(&mut observer).await?;

    if auto_detect && let Some(detected) = &outcome.detected_source {
        status!(
            "{} {}",
            Style::label("Detected source language:"),
            Style::code(detected)
        );
    }
    status!(
        "{} {} of {} text unit(s) changed, {} character(s) sent",
        Style::success("✓"),
        outcome.units_changed,
        outcome.units_located,
        outcome.characters_sent
    );
    println!(
        "Translation completed. Output saved to {}",
        outcome.output.display()
    );

    Ok(())
}
