mod api;
mod client;
mod deepl;
mod language;

pub use api::{
    ApiError, FailureClass, Formality, Language, LanguageKind, TranslateRequest, Translation,
    TranslationApi,
};
pub use client::{
    BatchLimits, LanguagePair, MAX_BYTES_PER_REQUEST, MAX_TEXTS_PER_REQUEST, RetryPolicy,
    TranslatedBatch, Translator, chunk_ranges,
};
pub use deepl::{DeeplClient, FREE_ENDPOINT, PRO_ENDPOINT, endpoint_for_key};
pub use language::{format_language, normalize_code, print_languages};
