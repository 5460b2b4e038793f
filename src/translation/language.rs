//! Language code handling and listing.

use super::api::{Language, LanguageKind};
use crate::ui::Style;

/// Normalizes a user-supplied language code to the API's upper-case form.
pub fn normalize_code(code: &str) -> String {
    code.trim().to_ascii_uppercase()
}

/// Formats one language as `CODE - Name - Support formality: yes|no|N/A`.
pub fn format_language(language: &Language) -> String {
    let formality = match language.supports_formality {
        Some(true) => "yes",
        Some(false) => "no",
        None => "N/A",
    };
    format!(
        "{} - {} - Support formality: {}",
        Style::code(&language.language),
        language.name,
        Style::secondary(formality)
    )
}

/// Prints the supported languages of one kind to stdout.
pub fn print_languages(kind: LanguageKind, languages: &[Language]) {
    println!("{}", Style::header(format!("Supported {kind} languages:")));
    for language in languages {
        println!("  {}", format_language(language));
    }
}
