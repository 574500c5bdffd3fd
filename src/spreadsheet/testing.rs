//! In-memory xlsx packages for tests.
use std::io::Cursor;
use std::io::Write;
use zip::write::SimpleFileOptions;
use zip::ZipWriter;

/// Fill colors available to test cells, by style index:
/// 0 plain, 1 red `00EA352E`, 2 green `FF40B14B`, 3 date format, 4 unknown `00123456`.
const STYLES: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<styleSheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main">
<numFmts count="1"><numFmt numFmtId="164" formatCode="mm/dd/yyyy"/></numFmts>
<fills count="5">
<fill><patternFill patternType="none"/></fill>
<fill><patternFill patternType="gray125"/></fill>
<fill><patternFill patternType="solid"><fgColor rgb="00EA352E"/></patternFill></fill>
<fill><patternFill patternType="solid"><fgColor rgb="FF40B14B"/></patternFill></fill>
<fill><patternFill patternType="solid"><fgColor rgb="00123456"/></patternFill></fill>
</fills>
<cellXfs count="5">
<xf numFmtId="0" fillId="0"/>
<xf numFmtId="0" fillId="2" applyFill="1"/>
<xf numFmtId="0" fillId="3" applyFill="1"/>
<xf numFmtId="164" fillId="0" applyNumberFormat="1"/>
<xf numFmtId="0" fillId="4" applyFill="1"/>
</cellXfs>
</styleSheet>"#;

/// A test cell: reference, optional `t` attribute, optional style, raw content.
pub(crate) struct TestCell {
    pub(crate) reference: &'static str,
    pub(crate) kind: Option<&'static str>,
    pub(crate) style: Option<usize>,
    pub(crate) value: String,
}

pub(crate) fn text(reference: &'static str, value: &str) -> TestCell {
    TestCell {
        reference,
        kind: Some("inlineStr"),
        style: None,
        value: value.to_owned(),
    }
}

pub(crate) fn number(reference: &'static str, value: f64) -> TestCell {
    TestCell {
        reference,
        kind: None,
        style: None,
        value: value.to_string(),
    }
}

pub(crate) fn styled(mut cell: TestCell, style: usize) -> TestCell {
    cell.style = Some(style);
    cell
}

fn escape(value: &str) -> String {
    value.replace('&', "&amp;").replace('<', "&lt;").replace('>', "&gt;").replace('"', "&quot;")
}

fn cell_xml(cell: &TestCell) -> String {
    let style = cell.style.map(|style| format!(r#" s="{style}""#)).unwrap_or_default();
    match cell.kind {
        Some("inlineStr") => format!(
            r#"<c r="{}" t="inlineStr"{style}><is><t>{}</t></is></c>"#,
            cell.reference,
            escape(&cell.value)
        ),
        Some(kind) => format!(r#"<c r="{}" t="{kind}"{style}><v>{}</v></c>"#, cell.reference, escape(&cell.value)),
        None if cell.value.is_empty() => format!(r#"<c r="{}"{style}/>"#, cell.reference),
        None => format!(r#"<c r="{}"{style}><v>{}</v></c>"#, cell.reference, cell.value),
    }
}

fn sheet_xml(cells: &[TestCell]) -> String {
    let mut rows: Vec<(usize, Vec<&TestCell>)> = Vec::new();
    for cell in cells {
        let digits = cell.reference.trim_start_matches(|c: char| c.is_ascii_alphabetic());
        let row = digits.parse::<usize>().expect("row number");
        match rows.iter_mut().find(|(index, _)| *index == row) {
            Some((_, row_cells)) => row_cells.push(cell),
            None => rows.push((row, vec![cell])),
        }
    }
    rows.sort_by_key(|(index, _)| *index);
    let body: String = rows
        .iter()
        .map(|(index, row_cells)| {
            let cells: String = row_cells.iter().map(|cell| cell_xml(cell)).collect();
            format!(r#"<row r="{index}">{cells}</row>"#)
        })
        .collect();
    format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<worksheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main"><sheetData>{body}</sheetData></worksheet>"#
    )
}

/// Builds an xlsx package with the given sheets; `active` is the selected tab.
pub(crate) fn workbook(sheets: &[(&str, Vec<TestCell>)], active: usize, shared_strings: &[&str]) -> Vec<u8> {
    let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
    let options = SimpleFileOptions::default();
    let mut put = |name: &str, content: &str| {
        writer.start_file(name, options).expect("start zip member");
        writer.write_all(content.as_bytes()).expect("write zip member");
    };

    let sheet_entries: String = sheets
        .iter()
        .enumerate()
        .map(|(index, (name, _))| format!(r#"<sheet name="{}" sheetId="{}" r:id="rId{}"/>"#, escape(name), index + 1, index + 1))
        .collect();
    put(
        "xl/workbook.xml",
        &format!(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<workbook xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships">
<workbookPr/><bookViews><workbookView activeTab="{active}"/></bookViews><sheets>{sheet_entries}</sheets></workbook>"#
        ),
    );

    let relationships: String = sheets
        .iter()
        .enumerate()
        .map(|(index, _)| {
            format!(
                r#"<Relationship Id="rId{}" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/worksheet" Target="worksheets/sheet{}.xml"/>"#,
                index + 1,
                index + 1
            )
        })
        .collect();
    put(
        "xl/_rels/workbook.xml.rels",
        &format!(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">{relationships}<Relationship Id="rId99" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/styles" Target="styles.xml"/></Relationships>"#
        ),
    );

    put("xl/styles.xml", STYLES);

    if !shared_strings.is_empty() {
        let items: String = shared_strings.iter().map(|value| format!("<si><t>{}</t></si>", escape(value))).collect();
        put(
            "xl/sharedStrings.xml",
            &format!(r#"<sst xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main">{items}</sst>"#),
        );
    }

    for (index, (_, cells)) in sheets.iter().enumerate() {
        put(&format!("xl/worksheets/sheet{}.xml", index + 1), &sheet_xml(cells));
    }

    writer.finish().expect("finish zip").into_inner()
}
