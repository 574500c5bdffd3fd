//! XML reading utilities for the SpreadsheetML parts of an xlsx package.
//! Wraps quick-xml with a reusable buffer and small helper traits for attributes and text.

use crate::error::ProjectSheetError;
use quick_xml::escape::resolve_xml_entity;
use quick_xml::events::attributes::Attribute;
use quick_xml::events::BytesRef;
use quick_xml::events::BytesStart;
use quick_xml::events::Event;
use quick_xml::Reader;
use std::borrow::Cow;
use std::io::BufRead;
use std::str::FromStr;
use thiserror::Error;

/// Errors raised while interpreting XML content
#[derive(Error, Debug)]
pub enum XmlError {
    #[error("Unknown entity '&{0};'")]
    ParseEntityError(String),

    #[error("Invalid attribute value '{0}'")]
    ParseAttributeValueError(String),
}

/// Event reader over one XML part, configured for workbook parts.
///
/// Empty elements are expanded into start/end pairs so `<fgColor rgb=".."/>`
/// and `<fgColor rgb=".."></fgColor>` are handled by the same match arms.
pub(crate) struct XmlReader<R: BufRead> {
    reader: Reader<R>,
    buffer: Vec<u8>,
}

impl<R: BufRead> XmlReader<R> {
    pub(crate) fn new(buf_reader: R) -> XmlReader<R> {
        let mut reader = Reader::from_reader(buf_reader);
        let config = reader.config_mut();
        config.check_comments = false;
        config.check_end_names = false;
        config.expand_empty_elements = true;
        config.trim_text(false);

        XmlReader {
            reader,
            buffer: Vec::with_capacity(1024),
        }
    }

    /// Reads the next event, `None` at end of input.
    pub(crate) fn next(&'_ mut self) -> Result<Option<Event<'_>>, ProjectSheetError> {
        self.buffer.clear();
        match self.reader.read_event_into(&mut self.buffer) {
            Ok(Event::Eof) => Ok(None),
            Ok(event) => Ok(Some(event)),
            Err(error) => Err(ProjectSheetError::XmlError(error)),
        }
    }
}

pub(crate) trait XmlAttributeHelper<'a> {
    fn get_value(&self) -> Result<Cow<'a, str>, ProjectSheetError>;

    fn parse_value<T: FromStr>(&self) -> Result<T, ProjectSheetError>;
}

impl<'a> XmlAttributeHelper<'a> for Attribute<'a> {
    fn get_value(&self) -> Result<Cow<'a, str>, ProjectSheetError> {
        Ok(self.unescape_value()?)
    }

    fn parse_value<T: FromStr>(&self) -> Result<T, ProjectSheetError> {
        let value = self.get_value()?;
        value
            .trim()
            .parse()
            .map_err(|_| XmlError::ParseAttributeValueError(value.to_string()).into())
    }
}

pub(crate) trait XmlNodeHelper<'a> {
    /// Looks up an attribute by its local name, ignoring any namespace prefix.
    fn get_attribute_value(&'a self, name: &str) -> Result<Option<Cow<'a, str>>, ProjectSheetError>;

    fn parse_attribute_value<T: FromStr>(&'a self, name: &str) -> Result<Option<T>, ProjectSheetError>;
}

impl<'a> XmlNodeHelper<'a> for BytesStart<'a> {
    fn get_attribute_value(&'a self, name: &str) -> Result<Option<Cow<'a, str>>, ProjectSheetError> {
        for result in self.attributes() {
            let attribute = result?;
            if attribute.key.local_name().as_ref() == name.as_bytes() {
                return attribute.get_value().map(Some);
            }
        }
        Ok(None)
    }

    fn parse_attribute_value<T: FromStr>(&'a self, name: &str) -> Result<Option<T>, ProjectSheetError> {
        for result in self.attributes() {
            let attribute = result?;
            if attribute.key.local_name().as_ref() == name.as_bytes() {
                return attribute.parse_value().map(Some);
            }
        }
        Ok(None)
    }
}

pub(crate) trait XmlTextContextHelper {
    /// Appends a character or entity reference (`&amp;`, `&#10;`, `&#x41;`).
    fn push_bytes_ref(&mut self, bytes: &BytesRef) -> Result<(), ProjectSheetError>;
}

impl XmlTextContextHelper for String {
    fn push_bytes_ref(&mut self, bytes: &BytesRef) -> Result<(), ProjectSheetError> {
        let raw = bytes.xml_content()?;
        if let Some(number) = raw.strip_prefix('#') {
            let code = match number.strip_prefix('x').or_else(|| number.strip_prefix('X')) {
                Some(hex) => u32::from_str_radix(hex, 16)?,
                None => number.parse::<u32>()?,
            };
            if let Some(character) = char::from_u32(code) {
                self.push(character);
            }
        } else if let Some(entity) = resolve_xml_entity(&raw) {
            self.push_str(entity);
        } else {
            Err(XmlError::ParseEntityError(raw.to_string()))?;
        }
        Ok(())
    }
}

/// Drives an `XmlReader` to the end, dispatching each event to the given arms.
/// Unmatched events are ignored; `break` inside an arm stops reading.
#[macro_export]
macro_rules! match_xml_events {
    ($reader:expr => { $($arms:tt)* }) => {
        while let Some(result) = $reader.next()? {
            match result {
                Event::Eof => break,
                $($arms)*
                _ => (),
            }
        }
    };
}

#[cfg(test)]
mod tests {
    use super::*;
    use quick_xml::name::QName;

    fn reader(xml: &str) -> XmlReader<&[u8]> {
        XmlReader::new(xml.as_bytes())
    }

    #[test]
    fn read_attributes_ignoring_prefix() -> Result<(), ProjectSheetError> {
        let mut reader = reader(r#"<sheet name="Projects &amp; Leads" r:id="rId3" sheetId="7"/>"#);
        let mut seen = None;
        match_xml_events!(reader => {
            Event::Start(event) if event.name() == QName(b"sheet") => {
                let name = event.get_attribute_value("name")?.map(|value| value.to_string());
                let id = event.get_attribute_value("id")?.map(|value| value.to_string());
                let sheet_id = event.parse_attribute_value::<usize>("sheetId")?;
                seen = Some((name, id, sheet_id));
            }
        });
        assert_eq!(seen, Some((Some("Projects & Leads".to_owned()), Some("rId3".to_owned()), Some(7))));
        Ok(())
    }

    #[test]
    fn invalid_attribute_value() {
        let mut reader = reader(r#"<workbookView activeTab="first"/>"#);
        let result: Result<(), ProjectSheetError> = (|| {
            match_xml_events!(reader => {
                Event::Start(event) => {
                    event.parse_attribute_value::<usize>("activeTab")?;
                }
            });
            Ok(())
        })();
        assert!(matches!(result, Err(ProjectSheetError::XmlHelperError(XmlError::ParseAttributeValueError(_)))));
    }

    #[test]
    fn resolve_references() -> Result<(), ProjectSheetError> {
        let mut reader = reader("<t>A&amp;B&#10;&#x43;</t>");
        let mut text = String::new();
        match_xml_events!(reader => {
            Event::Text(event) => text.push_str(&event.xml_content()?),
            Event::GeneralRef(event) => text.push_bytes_ref(&event)?,
        });
        assert_eq!(text, "A&B\nC");
        Ok(())
    }
}
