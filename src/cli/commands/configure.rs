//! Configure command handler for editing default settings.

use std::time::Duration;

use anyhow::{Result, bail};
use clap::ValueEnum;
use inquire::{Confirm, CustomType, Select, Text};

use crate::config::{
    ConfigFile, ConfigManager, DEFAULT_API_KEY_ENV, DEFAULT_DELAY_SECS, DEFAULT_RETRY,
    TranslateDefaults,
};
use crate::translation::{Formality, normalize_code};
use crate::ui::{Style, handle_prompt_cancellation};

const NO_FORMALITY: &str = "(none)";

/// Runs the configure command.
///
/// With `show`, prints the config file path and its settings. Otherwise asks
/// for each default interactively and saves the result.
pub fn run_configure(show: bool) -> Result<()> {
    let manager = ConfigManager::new()?;
    if show {
        let config = manager.load()?;
        print_config(&manager, &config);
        return Ok(());
    }
    handle_prompt_cancellation(|| run_configure_inner(&manager))?;
    Ok(())
}

fn run_configure_inner(manager: &ConfigManager) -> Result<()> {
    let mut config = manager.load()?;
    print_config(manager, &config);

    let target = prompt_target(config.translate.target.as_deref())?;

    let source = Text::new("Default source language:")
        .with_help_message("Leave empty to let DeepL detect it")
        .with_default(config.translate.source.as_deref().unwrap_or_default())
        .prompt()?;
    let source = Some(normalize_code(&source)).filter(|code| !code.is_empty());

    let api_key_env = Text::new("Environment variable holding the API key:")
        .with_default(
            config
                .deepl
                .api_key_env
                .as_deref()
                .unwrap_or(DEFAULT_API_KEY_ENV),
        )
        .prompt()?;

    let retry = CustomType::<u32>::new("Retries after a transient failure:")
        .with_default(config.translate.retry.unwrap_or(DEFAULT_RETRY))
        .with_error_message("Please enter a whole number")
        .prompt()?;

    let delay = CustomType::<f64>::new("Seconds between retries:")
        .with_default(config.translate.delay.unwrap_or(DEFAULT_DELAY_SECS))
        .with_error_message("Please enter a number of seconds")
        .prompt()?;
    if Duration::try_from_secs_f64(delay).is_err() {
        bail!("Retry delay must be a non-negative number of seconds");
    }

    let formality = select_formality(config.translate.formality)?;

    let metadata = Confirm::new("Translate document metadata (title, subject, keywords)?")
        .with_default(config.translate.metadata.unwrap_or(false))
        .prompt()?;

    config.deepl.api_key_env = Some(api_key_env.trim().to_string())
        .filter(|name| !name.is_empty() && name != DEFAULT_API_KEY_ENV);
    config.translate = TranslateDefaults {
        target: Some(target),
        source,
        retry: Some(retry),
        delay: Some(delay),
        formality,
        metadata: Some(metadata),
    };

    manager.save(&config)?;

    println!();
    println!(
        "{} Configuration saved to {}",
        Style::success("✓"),
        Style::secondary(manager.config_path().display().to_string())
    );

    Ok(())
}

fn prompt_target(default: Option<&str>) -> Result<String> {
    let mut prompt = Text::new("Default target language:")
        .with_help_message("DeepL language code, e.g. FR, DE, EN-US");
    if let Some(d) = default {
        prompt = prompt.with_default(d);
    }

    let target = normalize_code(&prompt.prompt()?);
    if target.is_empty() {
        bail!("Target language cannot be empty");
    }
    Ok(target)
}

fn select_formality(default: Option<Formality>) -> Result<Option<Formality>> {
    let mut options = vec![NO_FORMALITY];
    options.extend(Formality::value_variants().iter().map(|f| f.as_str()));

    let default_index = default
        .and_then(|d| Formality::value_variants().iter().position(|f| *f == d))
        .map_or(0, |idx| idx + 1);

    let selection = Select::new("Default formality:", options)
        .with_starting_cursor(default_index)
        .prompt()?;

    Ok(Formality::value_variants()
        .iter()
        .copied()
        .find(|f| f.as_str() == selection))
}

fn print_config(manager: &ConfigManager, config: &ConfigFile) {
    fn show(value: Option<String>) -> String {
        value.map_or_else(|| Style::secondary("(not set)"), Style::value)
    }

    println!(
        "{} {}",
        Style::header("Configuration"),
        Style::secondary(manager.config_path().display().to_string())
    );
    println!(
        "  {}  {}",
        Style::label("api_key_env"),
        Style::value(
            config
                .deepl
                .api_key_env
                .as_deref()
                .unwrap_or(DEFAULT_API_KEY_ENV)
        )
    );
    println!(
        "  {}      {}",
        Style::label("api_key"),
        show(config.deepl.api_key.as_ref().map(|_| "(set)".to_string()))
    );
    println!(
        "  {}     {}",
        Style::label("endpoint"),
        show(config.deepl.endpoint.clone())
    );
    println!(
        "  {}       {}",
        Style::label("target"),
        show(config.translate.target.clone())
    );
    println!(
        "  {}       {}",
        Style::label("source"),
        show(config.translate.source.clone())
    );
    println!(
        "  {}        {}",
        Style::label("retry"),
        show(config.translate.retry.map(|r| r.to_string()))
    );
    println!(
        "  {}        {}",
        Style::label("delay"),
        show(config.translate.delay.map(|d| d.to_string()))
    );
    println!(
        "  {}    {}",
        Style::label("formality"),
        show(config.translate.formality.map(|f| f.as_str().to_string()))
    );
    println!(
        "  {}     {}",
        Style::label("metadata"),
        show(config.translate.metadata.map(|m| m.to_string()))
    );
    println!();
}
