use crate::error::ProjectSheetError;
use crate::helpers::reader::WorkbookReader;
use crate::helpers::xml::XmlNodeHelper;
use crate::helpers::xml::XmlReader;
use crate::helpers::xml::XmlTextContextHelper;
use crate::helpers::zip::ZipHelper;
use crate::match_xml_events;
use crate::spreadsheet::cell::Cell;
use crate::spreadsheet::cell::CellType;
use crate::spreadsheet::cell::CellValue;
use crate::spreadsheet::criteria::Criteria;
use crate::spreadsheet::excel::load_relationships;
use crate::spreadsheet::reference::index_to_reference;
use crate::spreadsheet::reference::reference_to_index;
use crate::spreadsheet::sheet::Sheet;
use crate::spreadsheet::styles::Styles;
use crate::spreadsheet::SpreadsheetError;
use log::debug;
use log::warn;
use quick_xml::events::Event;
use quick_xml::name::QName;
use std::io::BufRead;
use std::path::Path;
use zip::ZipArchive;

// XML tag names for parsing Excel XLSX format
const TAG_SHARED_STRING_ITEM: QName = QName(b"si"); // Shared string table item
const TAG_PHONETIC_TEXT: QName = QName(b"rPh"); // Phonetic text for Asian languages
const TAG_TEXT: QName = QName(b"t"); // Text content within strings
const TAG_WORKBOOK_PROPERTIES: QName = QName(b"workbookPr"); // Workbook properties
const TAG_WORKBOOK_VIEW: QName = QName(b"workbookView"); // Window state, holds the active tab
const TAG_SHEET: QName = QName(b"sheet"); // Worksheet definition
const TAG_ROW: QName = QName(b"row"); // Row in worksheet
const TAG_CELL: QName = QName(b"c"); // Cell in worksheet
const TAG_INLINE_STRING: QName = QName(b"is"); // Inline string value
const TAG_VALUE: QName = QName(b"v"); // Cell value content

/// Worksheet entry from `xl/workbook.xml`.
#[derive(Clone, Debug)]
struct SheetEntry {
    name: String,
    /// Position among all `<sheet>` elements, which is what `activeTab` counts
    tab: usize,
    /// Part path inside the package
    path: String,
}

/// An opened xlsx workbook. Holds the package plus the workbook-level tables
/// (sheet list, styles, shared strings) needed to load any worksheet.
pub struct Workbook {
    /// File name of the workbook
    pub name: String,
    zip: ZipArchive<WorkbookReader>,
    sheets: Vec<SheetEntry>,
    active_tab: usize,
    styles: Styles,
    shared_strings: Vec<String>,
}

impl Workbook {
    /// Opens an xlsx file from disk.
    ///
    /// # Errors
    /// `FileNotFound` when the path does not exist, `MalformedInput`-class
    /// errors when the package structure cannot be read.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Workbook, ProjectSheetError> {
        let path = path.as_ref();
        let reader = WorkbookReader::open(path)?;
        Self::load(&path.display().to_string(), reader)
    }

    /// Opens an xlsx package held in memory.
    pub fn from_bytes(name: &str, bytes: Vec<u8>) -> Result<Workbook, ProjectSheetError> {
        Self::load(name, WorkbookReader::from_bytes(bytes))
    }

    fn load(file_name: &str, mut reader: WorkbookReader) -> Result<Workbook, ProjectSheetError> {
        if reader.is_compound_file()? {
            Err(SpreadsheetError::CompoundFileError(file_name.to_owned()))?;
        }

        let mut zip = ZipArchive::new(reader)?;
        let (sheets, active_tab, is_1904) = load_workbook(&mut zip, file_name)?;
        if sheets.is_empty() {
            Err(SpreadsheetError::EmptyWorkbook(file_name.to_owned()))?;
        }

        let styles = match zip.xml_reader("xl/styles.xml")? {
            Some(mut reader) => Styles::parse(&mut reader, is_1904)?,
            None => Styles::default(),
        };
        let shared_strings = load_shared_strings(&mut zip)?;
        debug!(
            "Opened '{}': {} worksheets, {} cell formats, {} shared strings, 1904 dates: {}",
            file_name,
            sheets.len(),
            styles.len(),
            shared_strings.len(),
            is_1904
        );

        Ok(Workbook {
            name: file_name.to_owned(),
            zip,
            sheets,
            active_tab,
            styles,
            shared_strings,
        })
    }

    pub fn sheet_names(&self) -> Vec<&str> {
        self.sheets.iter().map(|sheet| sheet.name.as_str()).collect()
    }

    /// Name of the sheet selected when the workbook was last saved.
    /// Falls back to the first worksheet when the active tab is not a worksheet.
    pub fn active_sheet_name(&self) -> &str {
        &self.sheets[self.active_index()].name
    }

    fn active_index(&self) -> usize {
        self.sheets
            .iter()
            .position(|sheet| sheet.tab == self.active_tab)
            .unwrap_or(0)
    }

    /// Loads the active worksheet.
    pub fn active_sheet(&mut self) -> Result<Sheet, ProjectSheetError> {
        self.read_sheet(self.active_index())
    }

    /// Loads the active worksheet, or the first one whose name matches the criteria.
    pub fn sheet(&mut self, criteria: &Criteria) -> Result<Sheet, ProjectSheetError> {
        if criteria.selects_active() {
            return self.active_sheet();
        }
        let index = self
            .sheets
            .iter()
            .position(|sheet| criteria.accept(&sheet.name))
            .ok_or_else(|| SpreadsheetError::SheetNotFound(self.name.to_owned()))?;
        self.read_sheet(index)
    }

    /// Parses one worksheet into an owned `Sheet`.
    ///
    /// Cells without a value are kept only when their style carries a fill,
    /// so the color of an otherwise empty cell is still visible.
    fn read_sheet(&mut self, index: usize) -> Result<Sheet, ProjectSheetError> {
        let entry = self.sheets[index].clone();
        let mut sheet = Sheet::new(&self.name, &entry.name);
        let mut reader = self
            .zip
            .xml_reader(&entry.path)?
            .ok_or_else(|| SpreadsheetError::MissingPart(self.name.to_owned(), entry.path.to_owned()))?;

        let mut row = 0usize;
        let mut col = 0usize;
        let mut kind = CellType::default();
        let mut fill = None::<String>;
        let mut value = None::<String>;
        match_xml_events!(reader => {
            Event::Start(event) if event.name() == TAG_ROW => {
                row = event.parse_attribute_value::<usize>("r")?.unwrap_or(row + 1);
                col = 0;
            }
            Event::Start(event) if event.name() == TAG_CELL => {
                (row, col) = event
                    .get_attribute_value("r")?
                    .and_then(|reference| reference_to_index(&reference))
                    .unwrap_or((row, col + 1));
                value = None;
                kind = event
                    .get_attribute_value("t")?
                    .map(|t| match t.as_ref() {
                        "inlineStr" | "str" => CellType::InlineString,
                        "s" => CellType::SharedString,
                        "d" => CellType::IsoDateTime,
                        "b" => CellType::Boolean,
                        "e" => CellType::Error,
                        _ => CellType::Number,
                    })
                    .unwrap_or(CellType::Number);
                fill = None;
                if let Some(style_id) = event.parse_attribute_value::<usize>("s")? {
                    let style = self.styles.get(style_id).ok_or_else(|| {
                        SpreadsheetError::MalformedInput(
                            self.name.to_owned(),
                            format!("unknown style index {style_id} at {}", index_to_reference(row, col)),
                        )
                    })?;
                    if kind == CellType::Number {
                        kind = style.kind;
                    }
                    fill = style.fill.clone();
                }
            }
            Event::Start(event) if event.name() == TAG_INLINE_STRING => {
                value = Some(read_string_value(&mut reader, TAG_INLINE_STRING, false)?);
            }
            Event::Start(event) if event.name() == TAG_VALUE => {
                value = Some(read_string_value(&mut reader, TAG_VALUE, true)?);
            }
            Event::End(event) if event.name() == TAG_CELL => {
                let raw = value.take().unwrap_or_default();
                let cell_value = if raw.is_empty() {
                    CellValue::Empty
                } else if kind == CellType::SharedString {
                    let string = raw
                        .trim()
                        .parse::<usize>()
                        .ok()
                        .and_then(|index| self.shared_strings.get(index))
                        .ok_or_else(|| {
                            SpreadsheetError::MalformedInput(
                                self.name.to_owned(),
                                format!("dangling shared string '{raw}' at {}", index_to_reference(row, col)),
                            )
                        })?;
                    CellValue::Text(string.to_owned())
                } else {
                    CellValue::convert(kind, &raw).map_err(|message| {
                        SpreadsheetError::CellValueError(entry.name.to_owned(), index_to_reference(row, col), message)
                    })?
                };
                if !cell_value.is_empty() || fill.is_some() {
                    sheet.push(Cell {
                        row,
                        col,
                        value: cell_value,
                        fill: fill.take(),
                    });
                }
            }
        });

        if sheet.is_empty() {
            warn!("Worksheet '{}' in '{}' has no cells", entry.name, self.name);
        } else {
            debug!(
                "Loaded worksheet '{}': {} rows, {} columns",
                entry.name,
                sheet.max_row(),
                sheet.max_col()
            );
        }
        Ok(sheet)
    }
}

/// Reads the sheet list, active tab and date system from `xl/workbook.xml`.
fn load_workbook(
    zip: &mut ZipArchive<WorkbookReader>,
    file_name: &str,
) -> Result<(Vec<SheetEntry>, usize, bool), ProjectSheetError> {
    let relationships = load_relationships(zip, file_name, "xl/_rels/workbook.xml.rels")?;
    let mut reader = zip
        .xml_reader("xl/workbook.xml")?
        .ok_or_else(|| SpreadsheetError::MissingPart(file_name.to_owned(), "xl/workbook.xml".to_owned()))?;
    let mut sheets = Vec::<SheetEntry>::new();
    let mut tab = 0usize;
    let mut active_tab = 0usize;
    let mut is_1904 = false;
    match_xml_events!(reader => {
        Event::Start(event) if event.name() == TAG_SHEET => {
            let name = event.get_attribute_value("name")?;
            let id = event.get_attribute_value("id")?;
            if let Some((name, id)) = name.zip(id) {
                if let Some(path) = relationships.get(id.as_ref()) {
                    sheets.push(SheetEntry {
                        name: name.to_string(),
                        tab,
                        path: path.to_owned(),
                    });
                }
            }
            tab += 1;
        }
        Event::Start(event) if event.name() == TAG_WORKBOOK_PROPERTIES => {
            is_1904 = event
                .get_attribute_value("date1904")?
                .map(|value| value == "1" || value == "true")
                .unwrap_or(false);
        }
        Event::Start(event) if event.name() == TAG_WORKBOOK_VIEW => {
            active_tab = event.parse_attribute_value::<usize>("activeTab")?.unwrap_or(0);
        }
    });
    Ok((sheets, active_tab, is_1904))
}

/// Loads the whole shared string table; absent part means no shared strings.
fn load_shared_strings(zip: &mut ZipArchive<WorkbookReader>) -> Result<Vec<String>, ProjectSheetError> {
    let mut shared_strings = Vec::<String>::new();
    let mut reader = match zip.xml_reader("xl/sharedStrings.xml")? {
        Some(reader) => reader,
        None => return Ok(shared_strings),
    };
    match_xml_events!(reader => {
        Event::Start(event) if event.name() == TAG_SHARED_STRING_ITEM => {
            shared_strings.push(read_string_value(&mut reader, TAG_SHARED_STRING_ITEM, false)?);
        }
    });
    Ok(shared_strings)
}

/// Reads string content up to `end_tag`, concatenating rich text runs
/// and skipping phonetic annotations.
fn read_string_value<R: BufRead>(
    reader: &mut XmlReader<R>,
    end_tag: QName,
    is_text_content: bool,
) -> Result<String, ProjectSheetError> {
    let mut is_phonetic_text = false;
    let mut is_text = is_text_content;
    let mut text = String::new();
    match_xml_events!(reader => {
        Event::End(event) if event.name() == end_tag => break,
        Event::Start(event) if event.name() == TAG_PHONETIC_TEXT => is_phonetic_text = true,
        Event::End(event) if event.name() == TAG_PHONETIC_TEXT => is_phonetic_text = false,
        Event::Start(event) if !is_phonetic_text && event.name() == TAG_TEXT => is_text = true,
        Event::End(event) if is_text && event.name() == TAG_TEXT => is_text = false,
        Event::Text(event) if is_text => text.push_str(&event.xml_content()?),
        Event::CData(event) if is_text => text.push_str(&event.xml_content()?),
        Event::GeneralRef(event) if is_text => text.push_bytes_ref(&event)?,
    });
    Ok(text)
}
