//! Scribus document model: parsing, text location and rewriting.

mod locator;
mod rewriter;
mod tree;

pub use locator::{LocatorOptions, TextLocator, TextUnit, Units, is_translatable};
pub use rewriter::rewrite;
pub use tree::{Document, Location};
