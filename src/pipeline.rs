//! Load, locate, translate, rewrite and save one document.

use std::fmt;
use std::path::PathBuf;

use crate::config::Configuration;
use crate::document::{Document, LocatorOptions, TextLocator, TextUnit, rewrite};
use crate::error::{Error, ErrorKind, Result};
use crate::fs;
use crate::translation::{BatchLimits, LanguagePair, TranslationApi, Translator};

/// Where a run is. Every run ends in `Saved` or `Failed`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum State {
    Pending,
    Loaded,
    Located,
    Translated,
    Rewritten,
    Saved,
    Failed(ErrorKind),
}

impl State {
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Saved | Self::Failed(_))
    }
}

impl fmt::Display for State {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pending => f.write_str("pending"),
            Self::Loaded => f.write_str("loaded"),
            Self::Located => f.write_str("located"),
            Self::Translated => f.write_str("translated"),
            Self::Rewritten => f.write_str("rewritten"),
            Self::Saved => f.write_str("saved"),
            Self::Failed(kind) => write!(f, "failed ({kind})"),
        }
    }
}

/// Reported to the observer passed to [`Pipeline::run`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PipelineEvent {
    /// The run moved to a new state.
    Entered(State),
    /// Text units located in the document, reported before translation starts.
    Located { units: usize },
    /// `done` of `total` texts have been translated.
    Progress { done: usize, total: usize },
}

/// Summary of a successful run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Outcome {
    pub units_located: usize,
    /// Units whose translation differed from the original text.
    pub units_changed: usize,
    /// Characters submitted for translation.
    pub characters_sent: usize,
    pub detected_source: Option<String>,
    pub output: PathBuf,
}

pub type Observer<'a> = &'a mut (dyn FnMut(PipelineEvent) + Send);

pub struct Pipeline<A> {
    config: Configuration,
    translator: Translator<A>,
    state: State,
}

impl<A: TranslationApi> Pipeline<A> {
    pub fn new(config: Configuration, api: A) -> Self {
        let translator = Translator::new(api, config.api.retry);
        Self {
            config,
            translator,
            state: State::Pending,
        }
    }

    #[must_use]
    pub fn with_limits(mut self, limits: BatchLimits) -> Self {
        self.translator = self.translator.with_limits(limits);
        self
    }

    pub const fn state(&self) -> State {
        self.state
    }

    pub const fn config(&self) -> &Configuration {
        &self.config
    }

    pub const fn translator(&self) -> &Translator<A> {
        &self.translator
    }

    /// Runs the document through every stage.
    ///
    /// On failure the state becomes `Failed` and no output file is written;
    /// the input file is never modified.
    pub async fn run(&mut self, observer: Observer<'_>) -> Result<Outcome> {
        match self.execute(observer).await {
            Ok(outcome) => Ok(outcome),
            Err(err) => {
                log::debug!("pipeline failed in state {}: {err}", self.state);
                self.enter(State::Failed(err.kind()), observer);
                Err(err)
            }
        }
    }

    async fn execute(&mut self, observer: Observer<'_>) -> Result<Outcome> {
        let bytes = fs::read_input(&self.config.input)?;
        let mut document = Document::parse(&bytes)?;
        drop(bytes);
        self.enter(State::Loaded, observer);

        let options = LocatorOptions {
            include_metadata: self.config.include_metadata,
        };
        let units = TextLocator::new(&document, options)
            .units()
            .collect::<Result<Vec<TextUnit>>>()?;
        log::info!("located {} translatable text unit(s)", units.len());
        self.enter(State::Located, observer);
        observer(PipelineEvent::Located { units: units.len() });

        let texts: Vec<String> = units.iter().map(|unit| unit.value.clone()).collect();
        let characters_sent = texts.iter().map(|text| text.chars().count()).sum();
        let total = texts.len();

        let pair = LanguagePair {
            source: self.config.source_language.as_deref(),
            target: &self.config.target_language,
            formality: self.config.formality,
        };
        let mut report = |done: usize| observer(PipelineEvent::Progress { done, total });
        let batch = self.translator.translate(&texts, pair, &mut report).await?;
        if let Some(detected) = &batch.detected_source {
            log::info!("detected source language: {detected}");
        }
        self.enter(State::Translated, observer);

        let units_changed = rewrite(&mut document, &units, &batch.texts)?;
        log::info!("rewrote {units_changed} of {total} text unit(s)");
        self.enter(State::Rewritten, observer);

        let output = self.config.output.clone();
        let serialized = document.to_bytes().map_err(Error::io(&output))?;
        fs::atomic_write(&output, &serialized)?;
        self.enter(State::Saved, observer);

        Ok(Outcome {
            units_located: total,
            units_changed,
            characters_sent,
            detected_source: batch.detected_source,
            output,
        })
    }

    fn enter(&mut self, state: State, observer: Observer<'_>) {
        log::debug!("pipeline state: {} -> {state}", self.state);
        self.state = state;
        observer(PipelineEvent::Entered(state));
    }
}
