//! Loss-free XML document model built on `quick-xml` events.
//!
//! The document is kept as the flat, ordered list of events the reader
//! produced; element nesting is implied by start/end pairs. Untouched events
//! are written back verbatim, so a load/save cycle without edits reproduces
//! the input byte for byte.

use std::borrow::Cow;
use std::io;

use quick_xml::escape::{escape, unescape};
use quick_xml::events::attributes::Attribute;
use quick_xml::events::{BytesStart, Event};
use quick_xml::name::QName;
use quick_xml::{Reader, Writer};

use crate::error::{Error, Result};

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// Points at one attribute of one element in a [`Document`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Location {
    /// Index of the element's start (or empty) event.
    pub event: usize,
    /// Name of the attribute holding the text.
    pub attribute: &'static str,
}

/// A parsed XML document that can be edited in place and serialized back.
#[derive(Debug, Clone)]
pub struct Document {
    events: Vec<Event<'static>>,
    bom: bool,
}

impl Document {
    /// Parses a UTF-8 XML document.
    ///
    /// Rejects input that is not UTF-8, declares another encoding, has
    /// mismatched or unclosed tags, or does not have exactly one root element.
    pub fn parse(bytes: &[u8]) -> Result<Self> {
        let (bom, body) = bytes
            .strip_prefix(UTF8_BOM)
            .map_or((false, bytes), |rest| (true, rest));

        let content = std::str::from_utf8(body)
            .map_err(|e| Error::Parse(format!("document is not valid UTF-8: {e}")))?;

        let mut reader = Reader::from_str(content);
        reader.config_mut().trim_text(false);

        let mut events = Vec::new();
        let mut depth = 0usize;
        let mut roots = 0usize;

        loop {
            let event = match reader.read_event() {
                Ok(Event::Eof) => break,
                Ok(event) => event,
                Err(e) => {
                    return Err(Error::Parse(format!(
                        "malformed XML at byte {}: {e}",
                        reader.error_position()
                    )));
                }
            };

            match &event {
                Event::Decl(decl) => check_encoding(decl)?,
                Event::Start(_) => {
                    if depth == 0 {
                        roots += 1;
                    }
                    depth += 1;
                }
                Event::Empty(_) if depth == 0 => roots += 1,
                Event::End(_) => depth = depth.saturating_sub(1),
                _ => {}
            }

            events.push(event.into_owned());
        }

        if depth != 0 {
            return Err(Error::Parse(format!(
                "unexpected end of document: {depth} element(s) left open"
            )));
        }
        if roots != 1 {
            return Err(Error::Parse(format!(
                "expected exactly one root element, found {roots}"
            )));
        }

        Ok(Self { events, bom })
    }

    /// Serializes the document.
    pub fn to_bytes(&self) -> io::Result<Vec<u8>> {
        let mut buffer = Vec::new();
        if self.bom {
            buffer.extend_from_slice(UTF8_BOM);
        }

        let mut writer = Writer::new(buffer);
        for event in &self.events {
            writer
                .write_event(event.clone())
                .map_err(|e| io::Error::other(e.to_string()))?;
        }

        Ok(writer.into_inner())
    }

    pub(crate) fn events(&self) -> &[Event<'static>] {
        &self.events
    }

    /// Reads the unescaped value of the attribute at `location`.
    ///
    /// Returns `Ok(None)` when the location does not point at an element
    /// carrying that attribute.
    pub fn attribute(&self, location: Location) -> Result<Option<String>> {
        let Some(element) = self.element(location.event) else {
            return Ok(None);
        };
        attribute_value(element, location.attribute)
    }

    /// Replaces the value of the attribute at `location`.
    ///
    /// Other attributes keep their order and raw text. Fails when the
    /// location no longer resolves.
    pub fn set_attribute(&mut self, location: Location, value: &str) -> Result<()> {
        let unresolved = || {
            Error::Rewrite(format!(
                "no '{}' attribute at event {}",
                location.attribute, location.event
            ))
        };

        let element = self.element(location.event).ok_or_else(unresolved)?;
        let name = String::from_utf8_lossy(element.name().as_ref()).into_owned();

        let mut rebuilt = BytesStart::new(name);
        let mut found = false;
        for attr in element.attributes() {
            let attr = attr.map_err(|e| Error::Rewrite(format!("malformed attribute: {e}")))?;
            if attr.key.as_ref() == location.attribute.as_bytes() {
                found = true;
                rebuilt.push_attribute(Attribute {
                    key: QName(location.attribute.as_bytes()),
                    value: Cow::Owned(escape_attribute(value).into_bytes()),
                });
            } else {
                rebuilt.push_attribute(double_quoted(attr));
            }
        }
        if !found {
            return Err(unresolved());
        }

        let rebuilt = rebuilt.into_owned();
        self.events[location.event] = match self.events[location.event] {
            Event::Start(_) => Event::Start(rebuilt),
            _ => Event::Empty(rebuilt),
        };
        Ok(())
    }

    fn element(&self, index: usize) -> Option<&BytesStart<'static>> {
        match self.events.get(index)? {
            Event::Start(e) | Event::Empty(e) => Some(e),
            _ => None,
        }
    }
}

/// Escapes a value for a double-quoted attribute.
///
/// Tabs and line breaks become character references; written raw, a parser
/// would normalize them to spaces.
fn escape_attribute(value: &str) -> String {
    escape(value)
        .replace('\n', "&#10;")
        .replace('\r', "&#13;")
        .replace('\t', "&#9;")
}

/// Reads and unescapes one attribute of an element.
pub(crate) fn attribute_value(element: &BytesStart<'_>, name: &str) -> Result<Option<String>> {
    for attr in element.attributes() {
        let attr = attr.map_err(|e| Error::Parse(format!("malformed attribute: {e}")))?;
        if attr.key.as_ref() != name.as_bytes() {
            continue;
        }
        let raw = std::str::from_utf8(&attr.value)
            .map_err(|e| Error::Parse(format!("attribute '{name}' is not UTF-8: {e}")))?;
        let value = unescape(raw)
            .map_err(|e| Error::Parse(format!("attribute '{name}' has a bad escape: {e}")))?;
        return Ok(Some(value.into_owned()));
    }
    Ok(None)
}

// `push_attribute` always writes double quotes, so a raw `"` kept from a
// single-quoted value has to be escaped.
fn double_quoted(attr: Attribute<'_>) -> Attribute<'_> {
    if !attr.value.contains(&b'"') {
        return attr;
    }
    let mut value = Vec::with_capacity(attr.value.len() + 8);
    for &byte in attr.value.iter() {
        if byte == b'"' {
            value.extend_from_slice(b"&quot;");
        } else {
            value.push(byte);
        }
    }
    Attribute {
        key: attr.key,
        value: Cow::Owned(value),
    }
}

fn check_encoding(decl: &quick_xml::events::BytesDecl<'_>) -> Result<()> {
    let Some(encoding) = decl.encoding() else {
        return Ok(());
    };
    let encoding =
        encoding.map_err(|e| Error::Parse(format!("malformed XML declaration: {e}")))?;
    if encoding.eq_ignore_ascii_case(b"utf-8") || encoding.eq_ignore_ascii_case(b"utf8") {
        Ok(())
    } else {
        Err(Error::Parse(format!(
            "unsupported document encoding '{}', expected UTF-8",
            String::from_utf8_lossy(&encoding)
        )))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<SCRIBUSUTF8NEW Version="1.5.8">
    <DOCUMENT ANZPAGES="1" TITLE="Flyer">
        <!-- layout -->
        <PAGEOBJECT XPOS="12.5" YPOS="40" PTYPE="4">
            <StoryText>
                <DefaultStyle/>
                <ITEXT FONT="DejaVu Sans Book" CH="Hello &amp; welcome"/>
                <para/>
            </StoryText>
        </PAGEOBJECT>
    </DOCUMENT>
</SCRIBUSUTF8NEW>
"#;

    fn itext_location(doc: &Document) -> Location {
        let event = doc
            .events()
            .iter()
            .position(|e| matches!(e, Event::Empty(s) if s.name().as_ref() == b"ITEXT"))
            .unwrap();
        Location {
            event,
            attribute: "CH",
        }
    }

    #[test]
    fn test_round_trip_is_byte_identical() {
        let doc = Document::parse(SAMPLE.as_bytes()).unwrap();
        assert_eq!(doc.to_bytes().unwrap(), SAMPLE.as_bytes());
    }

    #[test]
    fn test_round_trip_keeps_bom() {
        let mut input = UTF8_BOM.to_vec();
        input.extend_from_slice(SAMPLE.as_bytes());
        let doc = Document::parse(&input).unwrap();
        assert_eq!(doc.to_bytes().unwrap(), input);
    }

    #[test]
    fn test_attribute_is_unescaped() {
        let doc = Document::parse(SAMPLE.as_bytes()).unwrap();
        let value = doc.attribute(itext_location(&doc)).unwrap();
        assert_eq!(value.as_deref(), Some("Hello & welcome"));
    }

    #[test]
    fn test_set_attribute_escapes_and_keeps_order() {
        let mut doc = Document::parse(SAMPLE.as_bytes()).unwrap();
        let location = itext_location(&doc);
        doc.set_attribute(location, "Bonjour <& bienvenue>").unwrap();

        let output = String::from_utf8(doc.to_bytes().unwrap()).unwrap();
        assert!(output.contains(
            r#"<ITEXT FONT="DejaVu Sans Book" CH="Bonjour &lt;&amp; bienvenue&gt;"/>"#
        ));
        assert!(output.contains(r#"<PAGEOBJECT XPOS="12.5" YPOS="40" PTYPE="4">"#));
        assert_eq!(
            doc.attribute(location).unwrap().as_deref(),
            Some("Bonjour <& bienvenue>")
        );
    }

    #[test]
    fn test_set_attribute_encodes_line_breaks_and_tabs() {
        let input = r#"<SCRIBUSUTF8NEW><ITEXT CH="Line one&#10;Line two"/></SCRIBUSUTF8NEW>"#;
        let mut doc = Document::parse(input.as_bytes()).unwrap();
        let location = Location {
            event: 1,
            attribute: "CH",
        };
        assert_eq!(
            doc.attribute(location).unwrap().as_deref(),
            Some("Line one\nLine two")
        );

        doc.set_attribute(location, "Ligne un\nLigne deux\r\tfin").unwrap();

        let output = doc.to_bytes().unwrap();
        assert_eq!(
            String::from_utf8(output.clone()).unwrap(),
            r#"<SCRIBUSUTF8NEW><ITEXT CH="Ligne un&#10;Ligne deux&#13;&#9;fin"/></SCRIBUSUTF8NEW>"#
        );
        let reparsed = Document::parse(&output).unwrap();
        assert_eq!(
            reparsed.attribute(location).unwrap().as_deref(),
            Some("Ligne un\nLigne deux\r\tfin")
        );
    }

    #[test]
    fn test_set_attribute_missing_attribute_fails() {
        let mut doc = Document::parse(SAMPLE.as_bytes()).unwrap();
        let location = Location {
            attribute: "TITLE",
            ..itext_location(&doc)
        };
        let err = doc.set_attribute(location, "x").unwrap_err();
        assert!(matches!(err, Error::Rewrite(_)));
    }

    #[test]
    fn test_set_attribute_on_non_element_fails() {
        let mut doc = Document::parse(SAMPLE.as_bytes()).unwrap();
        // Event 0 is the XML declaration.
        let location = Location {
            event: 0,
            attribute: "CH",
        };
        assert!(doc.set_attribute(location, "x").is_err());
        assert_eq!(doc.attribute(location).unwrap(), None);
    }

    #[test]
    fn test_single_quoted_attribute_survives_rewrite() {
        let input = r#"<SCRIBUSUTF8NEW><ITEXT NOTE='say "hi"' CH="Hello"/></SCRIBUSUTF8NEW>"#;
        let mut doc = Document::parse(input.as_bytes()).unwrap();
        doc.set_attribute(
            Location {
                event: 1,
                attribute: "CH",
            },
            "Salut",
        )
        .unwrap();
        let output = String::from_utf8(doc.to_bytes().unwrap()).unwrap();
        assert!(output.contains(r#"NOTE="say &quot;hi&quot;" CH="Salut""#));
    }

    #[test]
    fn test_parse_rejects_mismatched_tags() {
        let err = Document::parse(b"<a><b></a>").unwrap_err();
        assert!(matches!(err, Error::Parse(_)));
    }

    #[test]
    fn test_parse_rejects_unclosed_root() {
        let err = Document::parse(b"<a><b/>").unwrap_err();
        assert!(matches!(err, Error::Parse(_)));
    }

    #[test]
    fn test_parse_rejects_two_roots() {
        let err = Document::parse(b"<a/><b/>").unwrap_err();
        assert!(err.to_string().contains("exactly one root"));
    }

    #[test]
    fn test_parse_rejects_other_encodings() {
        let input = br#"<?xml version="1.0" encoding="ISO-8859-1"?><a/>"#;
        let err = Document::parse(input).unwrap_err();
        assert!(err.to_string().contains("ISO-8859-1"));
    }

    #[test]
    fn test_parse_rejects_invalid_utf8() {
        let err = Document::parse(b"<a CH=\"\xFF\"/>").unwrap_err();
        assert!(err.to_string().contains("UTF-8"));
    }
}
