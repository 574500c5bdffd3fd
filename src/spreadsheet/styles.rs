//! Cell formats from `xl/styles.xml`: the number-format kind and the fill color of each `cellXfs` entry.
use crate::error::ProjectSheetError;
use crate::helpers::xml::XmlNodeHelper;
use crate::helpers::xml::XmlReader;
use crate::match_xml_events;
use crate::spreadsheet::cell::CellType;
use quick_xml::events::Event;
use quick_xml::name::QName;
use std::collections::HashMap;
use std::io::BufRead;

const TAG_CUSTOM_FORMATS: QName = QName(b"numFmts");
const TAG_CUSTOM_FORMAT: QName = QName(b"numFmt");
const TAG_FILLS: QName = QName(b"fills");
const TAG_FILL: QName = QName(b"fill");
const TAG_PATTERN_FILL: QName = QName(b"patternFill");
const TAG_FOREGROUND_COLOR: QName = QName(b"fgColor");
const TAG_FORMAT_INDEXES: QName = QName(b"cellXfs");
const TAG_FORMAT_INDEX: QName = QName(b"xf");

/// ARGB value some writers emit for "no color".
const TRANSPARENT: &str = "00000000";

/// Resolved cell format.
#[derive(Clone, Debug, Default, PartialEq)]
pub(crate) struct CellStyle {
    /// Kind used for numeric values carrying this format
    pub(crate) kind: CellType,
    /// Raw ARGB foreground color of the fill, if the fill is a visible pattern
    pub(crate) fill: Option<String>,
}

/// Style table indexed by the `s` attribute of worksheet cells.
#[derive(Clone, Debug, Default)]
pub(crate) struct Styles {
    formats: Vec<CellStyle>,
}

impl Styles {
    pub(crate) fn get(&self, index: usize) -> Option<&CellStyle> {
        self.formats.get(index)
    }

    pub(crate) fn len(&self) -> usize {
        self.formats.len()
    }

    /// Parses the styles part.
    pub(crate) fn parse<R: BufRead>(reader: &mut XmlReader<R>, is_1904: bool) -> Result<Styles, ProjectSheetError> {
        let mut custom_formats_context = false;
        let mut custom_formats = HashMap::<String, CellType>::new();

        let mut fills_context = false;
        let mut fills = Vec::<Option<String>>::new();
        let mut pattern_visible = false;
        let mut fill_color = None::<String>;

        let mut format_indexes_context = false;
        let mut format_indexes = Vec::<(String, usize)>::new();

        match_xml_events!(reader => {
            Event::Start(event) if event.name() == TAG_CUSTOM_FORMATS => custom_formats_context = true,
            Event::End(event) if event.name() == TAG_CUSTOM_FORMATS => custom_formats_context = false,
            Event::Start(event) if custom_formats_context && event.name() == TAG_CUSTOM_FORMAT => {
                let id = event.get_attribute_value("numFmtId")?;
                let format = event.get_attribute_value("formatCode")?;
                if let Some((id, format)) = id.zip(format) {
                    custom_formats.insert(id.to_string(), CellType::parse_custom_number_format(&format, is_1904));
                }
            }

            Event::Start(event) if event.name() == TAG_FILLS => fills_context = true,
            Event::End(event) if event.name() == TAG_FILLS => fills_context = false,
            Event::Start(event) if fills_context && event.name() == TAG_FILL => {
                pattern_visible = false;
                fill_color = None;
            }
            Event::Start(event) if fills_context && event.name() == TAG_PATTERN_FILL => {
                pattern_visible = event
                    .get_attribute_value("patternType")?
                    .map(|kind| kind != "none")
                    .unwrap_or(false);
            }
            Event::Start(event) if fills_context && event.name() == TAG_FOREGROUND_COLOR => {
                fill_color = event
                    .get_attribute_value("rgb")?
                    .map(|rgb| rgb.trim().to_ascii_uppercase())
                    .filter(|rgb| !rgb.is_empty() && rgb != TRANSPARENT);
            }
            Event::End(event) if fills_context && event.name() == TAG_FILL => {
                fills.push(fill_color.take().filter(|_| pattern_visible));
            }

            Event::Start(event) if event.name() == TAG_FORMAT_INDEXES => format_indexes_context = true,
            Event::End(event) if event.name() == TAG_FORMAT_INDEXES => format_indexes_context = false,
            Event::Start(event) if format_indexes_context && event.name() == TAG_FORMAT_INDEX => {
                let format_id = event.get_attribute_value("numFmtId")?.map(|id| id.to_string()).unwrap_or_else(|| "0".to_owned());
                let fill_id = event.parse_attribute_value::<usize>("fillId")?.unwrap_or(0);
                format_indexes.push((format_id, fill_id));
            }
        });

        let formats = format_indexes
            .into_iter()
            .map(|(format_id, fill_id)| CellStyle {
                kind: custom_formats
                    .get(&format_id)
                    .copied()
                    .or_else(|| CellType::parse_builtin_number_format_id(&format_id, is_1904))
                    .unwrap_or(CellType::Number),
                fill: fills.get(fill_id).cloned().flatten(),
            })
            .collect();
        Ok(Styles { formats })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const STYLES: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<styleSheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main">
  <numFmts count="1"><numFmt numFmtId="164" formatCode="mm/dd/yy"/></numFmts>
  <fills count="4">
    <fill><patternFill patternType="none"/></fill>
    <fill><patternFill patternType="gray125"/></fill>
    <fill><patternFill patternType="solid"><fgColor rgb="00EA352E"/><bgColor indexed="64"/></patternFill></fill>
    <fill><patternFill patternType="solid"><fgColor theme="4"/></patternFill></fill>
  </fills>
  <cellStyleXfs count="1"><xf numFmtId="0" fillId="2"/></cellStyleXfs>
  <cellXfs count="4">
    <xf numFmtId="0" fillId="0" xfId="0"/>
    <xf numFmtId="0" fillId="2" applyFill="1"/>
    <xf numFmtId="164" fillId="0" applyNumberFormat="1"/>
    <xf numFmtId="14" fillId="3"/>
  </cellXfs>
  <dxfs count="1"><dxf><fill><patternFill><fgColor rgb="FFFF0000"/></patternFill></fill></dxf></dxfs>
</styleSheet>"#;

    #[test]
    fn parse_styles() -> Result<(), ProjectSheetError> {
        let mut reader = XmlReader::new(STYLES.as_bytes());
        let styles = Styles::parse(&mut reader, false)?;

        assert_eq!(styles.len(), 4);
        assert_eq!(styles.get(0), Some(&CellStyle { kind: CellType::Number, fill: None }));
        assert_eq!(styles.get(1), Some(&CellStyle { kind: CellType::Number, fill: Some("00EA352E".to_owned()) }));
        assert_eq!(styles.get(2).map(|style| style.kind), Some(CellType::NumberDateTime1900));
        assert_eq!(styles.get(3), Some(&CellStyle { kind: CellType::NumberDateTime1900, fill: None }));
        assert!(styles.get(4).is_none());
        Ok(())
    }

    #[test]
    fn transparent_fill_is_none() -> Result<(), ProjectSheetError> {
        let xml = r#"<styleSheet><fills><fill><patternFill patternType="solid"><fgColor rgb="00000000"/></patternFill></fill></fills>
            <cellXfs><xf numFmtId="0" fillId="0"/></cellXfs></styleSheet>"#;
        let styles = Styles::parse(&mut XmlReader::new(xml.as_bytes()), true)?;
        assert_eq!(styles.get(0).and_then(|style| style.fill.clone()), None);
        Ok(())
    }
}
