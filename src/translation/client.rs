use std::collections::HashMap;
use std::future::Future;
use std::ops::Range;
use std::time::Duration;

use super::api::{
    ApiError, FailureClass, Formality, Language, LanguageKind, TranslateRequest, TranslationApi,
};
use crate::error::{Error, Result};

/// DeepL accepts at most 50 texts per request.
pub const MAX_TEXTS_PER_REQUEST: usize = 50;

/// DeepL caps request bodies at 128 KiB; leave room for JSON overhead.
pub const MAX_BYTES_PER_REQUEST: usize = 120 * 1024;

/// How often and how patiently to retry transient failures.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RetryPolicy {
    /// Retries after the first attempt.
    pub retries: u32,
    pub delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            retries: 5,
            delay: Duration::from_secs(1),
        }
    }
}

/// Size limits for one translate request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BatchLimits {
    pub max_texts: usize,
    pub max_bytes: usize,
}

impl Default for BatchLimits {
    fn default() -> Self {
        Self {
            max_texts: MAX_TEXTS_PER_REQUEST,
            max_bytes: MAX_BYTES_PER_REQUEST,
        }
    }
}

/// What to translate into, and from.
#[derive(Debug, Clone, Copy)]
pub struct LanguagePair<'a> {
    pub source: Option<&'a str>,
    pub target: &'a str,
    pub formality: Option<Formality>,
}

/// Result of [`Translator::translate`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TranslatedBatch {
    /// One entry per input text, in input order.
    pub texts: Vec<String>,
    /// Source language reported by the service for the first chunk.
    pub detected_source: Option<String>,
}

/// Drives a [`TranslationApi`]: validates languages, splits work into
/// request-sized chunks and retries transient failures.
pub struct Translator<A> {
    api: A,
    retry: RetryPolicy,
    limits: BatchLimits,
    languages: HashMap<LanguageKind, Vec<Language>>,
}

impl<A: TranslationApi> Translator<A> {
    pub fn new(api: A, retry: RetryPolicy) -> Self {
        Self {
            api,
            retry,
            limits: BatchLimits::default(),
            languages: HashMap::new(),
        }
    }

    #[must_use]
    pub fn with_limits(mut self, limits: BatchLimits) -> Self {
        self.limits = limits;
        self
    }

    pub const fn api(&self) -> &A {
        &self.api
    }

    /// Lists the languages the service supports, fetching once per kind.
    pub async fn languages(&mut self, kind: LanguageKind) -> Result<&[Language]> {
        if !self.languages.contains_key(&kind) {
            let (fetched, _) = self
                .with_retry("list languages", || self.api.languages(kind))
                .await?;
            self.languages.insert(kind, fetched);
        }
        Ok(self.languages.get(&kind).map(Vec::as_slice).unwrap_or_default())
    }

    /// Fails with [`Error::UnsupportedLanguage`] unless `code` is offered.
    ///
    /// Codes compare case-insensitively.
    pub async fn ensure_supported(&mut self, kind: LanguageKind, code: &str) -> Result<()> {
        let languages = self.languages(kind).await?;
        if languages
            .iter()
            .any(|l| l.language.eq_ignore_ascii_case(code))
        {
            return Ok(());
        }
        Err(Error::UnsupportedLanguage {
            kind,
            code: code.to_string(),
            supported: languages.iter().map(|l| l.language.clone()).collect(),
        })
    }

    /// Translates `texts`, returning the translations in the same order.
    ///
    /// Languages are validated before anything is sent. `on_progress` is
    /// called with the number of texts translated so far after each chunk.
    pub async fn translate(
        &mut self,
        texts: &[String],
        pair: LanguagePair<'_>,
        on_progress: &mut (dyn FnMut(usize) + Send),
    ) -> Result<TranslatedBatch> {
        self.ensure_supported(LanguageKind::Target, pair.target).await?;
        if let Some(source) = pair.source {
            self.ensure_supported(LanguageKind::Source, source).await?;
        }

        let mut batch = TranslatedBatch {
            texts: Vec::with_capacity(texts.len()),
            detected_source: None,
        };

        for range in chunk_ranges(texts, self.limits) {
            let chunk = &texts[range];
            let request = TranslateRequest {
                texts: chunk,
                source: pair.source,
                target: pair.target,
                formality: pair.formality,
            };
            log::debug!("translating chunk of {} text(s)", chunk.len());

            let (translations, attempts) = self
                .with_retry("translate", || self.api.translate(request))
                .await?;

            if translations.len() != chunk.len() {
                return Err(Error::Translation {
                    attempts,
                    cause: ApiError::Decode(format!(
                        "sent {} text(s) but received {} translation(s)",
                        chunk.len(),
                        translations.len()
                    )),
                });
            }

            for translation in translations {
                if batch.detected_source.is_none() {
                    batch.detected_source = translation.detected_source_language.clone();
                }
                batch.texts.push(translation.text);
            }
            on_progress(batch.texts.len());
        }

        Ok(batch)
    }

    /// Calls until success or a non-retryable failure. Returns the value
    /// and the number of attempts it took.
    async fn with_retry<T, F, Fut>(&self, operation: &str, mut call: F) -> Result<(T, u32)>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = std::result::Result<T, ApiError>>,
    {
        let mut attempt = 0u32;
        loop {
            attempt += 1;
            let err = match call().await {
                Ok(value) => return Ok((value, attempt)),
                Err(err) => err,
            };

            match err.class() {
                FailureClass::Auth => return Err(Error::Auth(err.to_string())),
                FailureClass::Quota => return Err(Error::QuotaExceeded(err.to_string())),
                FailureClass::Permanent => {
                    return Err(Error::Translation {
                        attempts: attempt,
                        cause: err,
                    });
                }
                FailureClass::Transient if attempt > self.retry.retries => {
                    return Err(Error::Translation {
                        attempts: attempt,
                        cause: err,
                    });
                }
                FailureClass::Transient => {
                    log::warn!(
                        "{operation} failed ({err}), retry {attempt}/{} in {:.1}s",
                        self.retry.retries,
                        self.retry.delay.as_secs_f64()
                    );
                    tokio::time::sleep(self.retry.delay).await;
                }
            }
        }
    }
}

/// Splits `texts` into consecutive ranges that respect `limits`.
///
/// A text larger than `max_bytes` on its own still gets a chunk.
pub fn chunk_ranges(texts: &[String], limits: BatchLimits) -> Vec<Range<usize>> {
    let max_texts = limits.max_texts.max(1);
    let mut ranges = Vec::new();
    let mut start = 0;
    let mut bytes = 0;

    for (i, text) in texts.iter().enumerate() {
        let count = i - start;
        if count > 0 && (count == max_texts || bytes + text.len() > limits.max_bytes) {
            ranges.push(start..i);
            start = i;
            bytes = 0;
        }
        bytes += text.len();
    }
    if start < texts.len() {
        ranges.push(start..texts.len());
    }

    ranges
}
