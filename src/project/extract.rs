//! # Field Extraction
//!
//! Walks the data rows of a loaded sheet, classifies each one and turns the
//! project rows into fixed-shape `ProjectRecord`s.
//!
//! Coercion follows spreadsheet truthiness: for most text fields an empty
//! cell, `0`, `""` or `FALSE` means "not filled in" and becomes `None`.
//! Amount columns only take numbers; anything else is dropped and reported
//! as an `ExtractionIssue` without affecting the rest of the row.
use crate::project::classify::classify;
use crate::project::classify::project_name;
use crate::project::classify::Classification;
use crate::project::classify::RowFacts;
use crate::project::classify::Signal;
use crate::project::classify::SkipReason;
use crate::project::color::Color;
use crate::project::column::Column;
use crate::project::policy::ClassificationPolicy;
use crate::project::record::ProjectRecord;
use crate::spreadsheet::CellValue;
use crate::spreadsheet::Row;
use crate::spreadsheet::Sheet;
use log::debug;
use log::trace;
use log::warn;
use serde::Serialize;
use std::collections::BTreeMap;
use std::collections::HashMap;
use std::fmt::Display;

/// Default number of header rows above the data.
pub const DEFAULT_HEADER_ROWS: usize = 1;

/// Default maximum length of the comments field, in characters.
pub const DEFAULT_COMMENT_LIMIT: usize = 500;

#[derive(Clone, Debug, PartialEq)]
pub struct ExtractOptions {
    pub header_rows: usize,
    pub comment_limit: usize,
}

impl Default for ExtractOptions {
    fn default() -> Self {
        Self {
            header_rows: DEFAULT_HEADER_ROWS,
            comment_limit: DEFAULT_COMMENT_LIMIT,
        }
    }
}

/// A non-fatal problem found while extracting a row.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub enum ExtractionIssue {
    /// A value could not be coerced to the field type; the field is left empty.
    FieldCoercionSkipped {
        row: usize,
        column: &'static str,
        cell: String,
        found: String,
    },
}

impl Display for ExtractionIssue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ExtractionIssue::FieldCoercionSkipped { row, column, cell, found } => {
                write!(f, "Row {row}: '{column}' ({cell}) expects a number, found '{found}'")
            }
        }
    }
}

/// Row counters of one extraction run.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct ExtractionStats {
    pub rows_scanned: usize,
    pub skipped_blank: usize,
    pub skipped_pattern: usize,
    pub rejected: usize,
    pub qualified: usize,
    /// Project rows whose name was already seen (case-insensitive)
    pub duplicate_names: usize,
    /// How many project rows each signal fired on
    pub signals: BTreeMap<Signal, usize>,
}

#[derive(Clone, Debug, Default)]
pub struct Extraction {
    pub records: Vec<ProjectRecord>,
    pub issues: Vec<ExtractionIssue>,
    pub stats: ExtractionStats,
}

/// Extracts the project records of a sheet, in sheet order.
pub fn extract_projects(sheet: &Sheet, policy: &ClassificationPolicy, options: &ExtractOptions) -> Extraction {
    let mut extraction = Extraction::default();
    let mut seen_names = HashMap::<String, usize>::new();
    let empty_row = Row::default();

    for index in options.header_rows + 1..=sheet.max_row() {
        extraction.stats.rows_scanned += 1;
        let row = sheet.row(index).unwrap_or(&empty_row);

        let color = row
            .fill(Column::ProjectName.index())
            .and_then(|fill| Color::parse(fill).ok());
        let color_status = color.as_ref().and_then(|color| policy.color_status(color));
        let facts = RowFacts {
            name: row.value(Column::ProjectName.index()),
            customer: row.value(Column::Customer.index()),
            location: row.value(Column::Location.index()),
            label: row.value(Column::Label.index()),
            color_status,
            total_cogs: row.value(Column::TotalCogs.index()),
            quote_with_tax: row.value(Column::QuoteWithTax.index()),
            quote_material: row.value(Column::QuoteMaterial.index()),
        };

        let signals = match classify(policy, &facts) {
            Classification::Skip(SkipReason::Blank) => {
                extraction.stats.skipped_blank += 1;
                continue;
            }
            Classification::Skip(SkipReason::Pattern(pattern)) => {
                trace!("Row {index} skipped by pattern '{pattern}'");
                extraction.stats.skipped_pattern += 1;
                continue;
            }
            Classification::Reject => {
                trace!("Row {index} has no project signal");
                extraction.stats.rejected += 1;
                continue;
            }
            Classification::Qualify(signals) => signals,
        };

        let name = project_name(facts.name).unwrap_or_default().to_owned();
        extraction.stats.qualified += 1;
        for signal in &signals {
            *extraction.stats.signals.entry(*signal).or_default() += 1;
        }
        if let Some(first_row) = seen_names.get(&name.to_lowercase()) {
            debug!("Row {index}: project name '{name}' already seen at row {first_row}");
            extraction.stats.duplicate_names += 1;
        } else {
            seen_names.insert(name.to_lowercase(), index);
        }

        let mut fields = FieldReader {
            row,
            index,
            issues: &mut extraction.issues,
        };
        let record = ProjectRecord {
            row: index,
            name,
            location: fields.text(Column::Location),
            address: fields.text(Column::Address),
            label: fields.text(Column::Label),
            quote_sent: fields.flag(Column::QuoteSent),
            reached_out: fields.flag(Column::ReachedOut),
            total_cogs: fields.number(Column::TotalCogs),
            customer: fields.text(Column::Customer),
            phone: fields.filled_text(Column::Phone),
            email: fields.text(Column::Email),
            build_size: fields.filled_text(Column::BuildSize),
            received_details: fields.filled_text(Column::ReceivedDetails),
            zip_code: fields.filled_text(Column::ZipCode),
            project_type: fields.text(Column::ProjectType),
            project_sqft: fields.number(Column::ProjectSqft),
            received_quote: fields.filled_text(Column::ReceivedQuote),
            erecting_labor: fields.number(Column::ErectingLabor),
            concrete_labor: fields.number(Column::ConcreteLabor),
            our_quote_material: fields.number(Column::QuoteMaterial),
            sales_tax: fields.number(Column::SalesTax),
            our_quote_with_tax: fields.number(Column::QuoteWithTax),
            delivered_quote: fields.filled_text(Column::DeliveredQuote),
            quote_accepted: fields.filled_text(Column::QuoteAccepted),
            deposit_paid: fields.text(Column::DepositPaid),
            drawings_status: fields.text(Column::DrawingsStatus),
            est_metal_date: fields.filled_text(Column::EstMetalDate),
            door_order_date: fields.filled_text(Column::DoorOrderDate),
            est_door_date: fields.filled_text(Column::EstDoorDate),
            metal_production: fields.text(Column::MetalProduction),
            metal_delivery: fields.text(Column::MetalDelivery),
            door_delivery: fields.text(Column::DoorDelivery),
            final_ach: fields.filled_text(Column::FinalAch),
            contractor_date: fields.filled_text(Column::ContractorDate),
            job_status: fields.text(Column::JobStatus),
            comments: fields.filled_text(Column::Comments).map(|text| truncate(&text, options.comment_limit)),
            color: color.map(|color| color.to_string()),
            color_status,
        };
        extraction.records.push(record);
    }

    if extraction.records.is_empty() && !sheet.is_empty() {
        warn!("No project rows found in worksheet '{}'", sheet.name);
    }
    extraction
}

/// Coerces the cells of one row, collecting issues as it goes.
struct FieldReader<'a> {
    row: &'a Row,
    index: usize,
    issues: &'a mut Vec<ExtractionIssue>,
}

impl FieldReader<'_> {
    /// Any non-empty value as text.
    fn text(&self, column: Column) -> Option<String> {
        let value = self.row.value(column.index());
        match value {
            CellValue::Empty => None,
            CellValue::Text(text) if text.is_empty() => None,
            _ => Some(value.to_string()),
        }
    }

    /// Truthy values as text; `0`, `FALSE` and `""` count as not filled in.
    fn filled_text(&self, column: Column) -> Option<String> {
        let value = self.row.value(column.index());
        value.is_truthy().then(|| value.to_string())
    }

    fn flag(&self, column: Column) -> bool {
        self.row.value(column.index()).is_truthy()
    }

    /// Numbers only; any other non-empty value is reported and dropped.
    fn number(&mut self, column: Column) -> Option<f64> {
        let cell = self.row.cell(column.index())?;
        match &cell.value {
            CellValue::Number(number) => Some(*number),
            CellValue::Empty => None,
            value => {
                let issue = ExtractionIssue::FieldCoercionSkipped {
                    row: self.index,
                    column: column.header(),
                    cell: cell.reference(),
                    found: value.to_string(),
                };
                debug!("{issue}");
                self.issues.push(issue);
                None
            }
        }
    }
}

/// First `limit` characters of `text`.
pub(crate) fn truncate(text: &str, limit: usize) -> String {
    match text.char_indices().nth(limit) {
        Some((end, _)) => text[..end].to_owned(),
        None => text.to_owned(),
    }
}
