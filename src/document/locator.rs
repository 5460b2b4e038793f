//! Finds the translatable text of a Scribus document.
//!
//! Scribus stores story text one formatting run per `ITEXT` element, in the
//! `CH` attribute. Everything else on the page (geometry, colours, fonts,
//! style and item names) lives in attributes too, so only an explicit
//! whitelist of element/attribute pairs is ever translated.

use quick_xml::events::{BytesStart, Event};

use super::tree::{Document, Location, attribute_value};
use crate::error::{Error, Result};

const ROOT_ELEMENTS: &[&str] = &["SCRIBUSUTF8NEW", "SCRIBUSUTF8"];

/// Elements that own a story: text frames, and table cells (`TableData/Cell`).
const STORY_OWNERS: &[&str] = &[
    "PAGEOBJECT",
    "MASTEROBJECT",
    "FRAMEOBJECT",
    "PatternItem",
    "Cell",
];

const STORY_TEXT: &str = "StoryText";
const ITEXT: &str = "ITEXT";
const ITEXT_PARENTS: &[&str] = &[
    STORY_TEXT,
    "PAGEOBJECT",
    "MASTEROBJECT",
    "FRAMEOBJECT",
    "PatternItem",
];
const ITEXT_FIELD: &str = "CH";

const DOCUMENT: &str = "DOCUMENT";
const METADATA_FIELDS: &[&str] = &["TITLE", "SUBJECT", "KEYWORDS", "COMMENTS"];

/// A translatable string and where it lives in the document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextUnit {
    pub location: Location,
    pub value: String,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct LocatorOptions {
    /// Also translate the document title, subject, keywords and comments.
    pub include_metadata: bool,
}

/// Walks a [`Document`] and yields its [`TextUnit`]s in document order.
///
/// Each call to [`TextLocator::units`] starts a fresh pass.
pub struct TextLocator<'a> {
    document: &'a Document,
    options: LocatorOptions,
}

impl<'a> TextLocator<'a> {
    pub const fn new(document: &'a Document, options: LocatorOptions) -> Self {
        Self { document, options }
    }

    pub fn units(&self) -> Units<'a> {
        Units {
            events: self.document.events(),
            options: self.options,
            index: 0,
            stack: Vec::new(),
            pending: Vec::new(),
            failed: false,
        }
    }
}

/// Lazy iterator returned by [`TextLocator::units`].
///
/// Yields `Err(Error::Parse)` once and then stops if the document does not
/// follow the Scribus nesting rules.
pub struct Units<'a> {
    events: &'a [Event<'static>],
    options: LocatorOptions,
    index: usize,
    stack: Vec<String>,
    // Units found on the current element, popped in whitelist order.
    pending: Vec<TextUnit>,
    failed: bool,
}

impl Units<'_> {
    fn visit(&mut self, index: usize, element: &BytesStart<'_>) -> Result<()> {
        let name = String::from_utf8_lossy(element.name().as_ref()).into_owned();
        let parent = self.stack.last().map(String::as_str);

        match parent {
            None if !ROOT_ELEMENTS.contains(&name.as_str()) => {
                return Err(Error::Parse(format!(
                    "not a Scribus document: root element is <{name}>, expected one of {}",
                    ROOT_ELEMENTS.join(", ")
                )));
            }
            Some(ITEXT) => {
                return Err(Error::Parse(format!(
                    "<{name}> is nested inside <{ITEXT}>, which never has children"
                )));
            }
            _ => {}
        }

        match name.as_str() {
            ITEXT => {
                expect_parent(&name, parent, ITEXT_PARENTS)?;
                self.collect(index, element, &[ITEXT_FIELD])?;
            }
            STORY_TEXT => expect_parent(&name, parent, STORY_OWNERS)?,
            DOCUMENT if self.options.include_metadata => {
                if self.stack.len() != 1 {
                    return Err(Error::Parse(format!(
                        "<{DOCUMENT}> must be a direct child of the root element"
                    )));
                }
                self.collect(index, element, METADATA_FIELDS)?;
            }
            _ => {}
        }

        Ok(())
    }

    fn collect(
        &mut self,
        index: usize,
        element: &BytesStart<'_>,
        fields: &[&'static str],
    ) -> Result<()> {
        for &attribute in fields.iter().rev() {
            if let Some(value) = attribute_value(element, attribute)?
                && is_translatable(&value)
            {
                self.pending.push(TextUnit {
                    location: Location {
                        event: index,
                        attribute,
                    },
                    value,
                });
            }
        }
        Ok(())
    }
}

impl Iterator for Units<'_> {
    type Item = Result<TextUnit>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(unit) = self.pending.pop() {
                return Some(Ok(unit));
            }
            if self.failed {
                return None;
            }

            let index = self.index;
            let events = self.events;
            let event = events.get(index)?;
            self.index += 1;

            let outcome = match event {
                Event::Start(element) => {
                    let outcome = self.visit(index, element);
                    self.stack
                        .push(String::from_utf8_lossy(element.name().as_ref()).into_owned());
                    outcome
                }
                Event::Empty(element) => self.visit(index, element),
                Event::End(_) => {
                    self.stack.pop();
                    Ok(())
                }
                _ => Ok(()),
            };

            if let Err(e) = outcome {
                self.failed = true;
                self.pending.clear();
                return Some(Err(e));
            }
        }
    }
}

fn expect_parent(name: &str, parent: Option<&str>, allowed: &[&str]) -> Result<()> {
    match parent {
        Some(parent) if allowed.contains(&parent) => Ok(()),
        Some(parent) => Err(Error::Parse(format!(
            "unexpected <{name}> inside <{parent}>, expected a parent among {}",
            allowed.join(", ")
        ))),
        None => Err(Error::Parse(format!("unexpected <{name}> at document root"))),
    }
}

/// Returns `true` if `value` carries words worth sending for translation.
///
/// Values without any alphabetic character (numbers, coordinates,
/// punctuation, whitespace) are layout tokens and stay as they are.
pub fn is_translatable(value: &str) -> bool {
    value.chars().any(char::is_alphabetic)
}
