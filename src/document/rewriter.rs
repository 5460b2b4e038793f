//! Writes translated strings back into the document.

use super::locator::TextUnit;
use super::tree::Document;
use crate::error::{Error, Result};

/// Stores each translation at the location of the text unit it came from.
///
/// `units` and `translations` correspond by position. A translation equal
/// to its source leaves the element untouched. Returns the number of
/// attributes that changed.
pub fn rewrite(
    document: &mut Document,
    units: &[TextUnit],
    translations: &[String],
) -> Result<usize> {
    if units.len() != translations.len() {
        return Err(Error::Rewrite(format!(
            "{} text units but {} translations",
            units.len(),
            translations.len()
        )));
    }

    // Resolve everything first; a failure leaves the document unchanged.
    for unit in units {
        let current = document.attribute(unit.location)?.ok_or_else(|| {
            Error::Rewrite(format!(
                "text unit at event {} no longer resolves to a '{}' attribute",
                unit.location.event, unit.location.attribute
            ))
        })?;

        if current != unit.value {
            return Err(Error::Rewrite(format!(
                "'{}' at event {} changed after it was located",
                unit.location.attribute, unit.location.event
            )));
        }
    }

    let mut changed = 0;
    for (unit, translated) in units.iter().zip(translations) {
        if *translated != unit.value {
            document.set_attribute(unit.location, translated)?;
            changed += 1;
        }
    }

    Ok(changed)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::document::{Location, LocatorOptions, TextLocator};

    const DOC: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<SCRIBUSUTF8NEW Version="1.5.8">
 <DOCUMENT>
  <PAGEOBJECT XPOS="12.5">
   <StoryText>
    <ITEXT FONT="Arial" CH="Hello world"/>
    <ITEXT CH="Goodbye"/>
   </StoryText>
  </PAGEOBJECT>
 </DOCUMENT>
</SCRIBUSUTF8NEW>
"#;

    fn located() -> (Document, Vec<TextUnit>) {
        let doc = Document::parse(DOC.as_bytes()).unwrap();
        let units = TextLocator::new(&doc, LocatorOptions::default())
            .units()
            .collect::<Result<Vec<_>>>()
            .unwrap();
        (doc, units)
    }

    #[test]
    fn test_rewrite_replaces_only_text() {
        let (mut doc, units) = located();
        let translations = vec!["Bonjour le monde".to_string(), "Au revoir".to_string()];

        let changed = rewrite(&mut doc, &units, &translations).unwrap();
        assert_eq!(changed, 2);

        let output = String::from_utf8(doc.to_bytes().unwrap()).unwrap();
        let expected = DOC
            .replace("Hello world", "Bonjour le monde")
            .replace("Goodbye", "Au revoir");
        assert_eq!(output, expected);
    }

    #[test]
    fn test_rewrite_identical_translation_is_noop() {
        let (mut doc, units) = located();
        let translations = vec!["Hello world".to_string(), "Goodbye".to_string()];

        assert_eq!(rewrite(&mut doc, &units, &translations).unwrap(), 0);
        assert_eq!(doc.to_bytes().unwrap(), DOC.as_bytes());
    }

    #[test]
    fn test_rewrite_rejects_length_mismatch() {
        let (mut doc, units) = located();
        let err = rewrite(&mut doc, &units, &["one".to_string()]).unwrap_err();
        assert!(matches!(err, Error::Rewrite(_)));
    }

    #[test]
    fn test_rewrite_rejects_unresolved_location() {
        let (mut doc, mut units) = located();
        units[0].location = Location {
            event: 0,
            attribute: "CH",
        };
        let translations = vec!["a".to_string(), "b".to_string()];
        let err = rewrite(&mut doc, &units, &translations).unwrap_err();
        assert!(err.to_string().contains("no longer resolves"));
    }

    #[test]
    fn test_rewrite_rejects_changed_value() {
        let (mut doc, units) = located();
        doc.set_attribute(units[1].location, "Edited").unwrap();
        let translations = vec!["a".to_string(), "b".to_string()];
        let before = doc.to_bytes().unwrap();
        let err = rewrite(&mut doc, &units, &translations).unwrap_err();
        assert!(err.to_string().contains("changed after it was located"));
        assert_eq!(doc.to_bytes().unwrap(), before);
    }
}
