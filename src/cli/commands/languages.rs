use anyhow::Result;

use super::connect;
use crate::config::{ConfigManager, Environment, ResolveOptions, resolve_api};
use crate::translation::{LanguageKind, Translator, print_languages};
use crate::ui::Progress;

/// Fetches and prints the languages DeepL supports as source or target.
pub async fn run_languages(kind: LanguageKind, options: &ResolveOptions) -> Result<()> {
    let env = Environment::capture();
    let file_config = ConfigManager::new()?.load()?;
    let api = resolve_api(options, &file_config, &env)?;

    let mut translator = Translator::new(connect(&api)?, api.retry);

    let progress = Progress::new(&format!("Fetching {kind} languages..."));
    let languages = translator.languages(kind).await?;
    progress.stop();

    print_languages(kind, languages);
    Ok(())
}
