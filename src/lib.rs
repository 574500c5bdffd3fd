//! # Project Sheet
//!
//! Extracts project rows from the "Storage Materials" workbook and publishes
//! them for the dashboard front end.
//!
//! A run is one sequential transformation:
//!
//! 1. **Load** the workbook (`.xlsx`) and its active sheet, with typed cell
//!    values and the fill color of every styled cell
//! 2. **Classify** each data row: skip patterns first, then any single
//!    qualifying signal (customer, location, label, known fill color, region
//!    in the name, `#` prefix, financial figures) makes it a project
//! 3. **Extract** the 35 fixed columns into a `ProjectRecord`
//! 4. **Write** the records as JSON and as a generated TypeScript module
//!
//! The skip patterns, region pattern and color table live in a TOML policy;
//! the built-in one can be replaced without rebuilding.
pub mod config;
pub mod error;
pub(crate) mod helpers;
pub mod output;
pub mod project;
pub mod spreadsheet;

use crate::error::ProjectSheetError;
use crate::error::ResultMessage;
use crate::project::extract_projects;
use crate::project::ClassificationPolicy;
use crate::project::ExtractOptions;
use crate::project::Extraction;
use crate::spreadsheet::Criteria;
use crate::spreadsheet::Sheet;
use crate::spreadsheet::Workbook;
use log::info;
use std::path::Path;

/// Opens a workbook and loads the sheet chosen by `sheet_patterns`
/// (the active sheet when there are none). The package is closed on return.
pub fn load_sheet<P: AsRef<Path>, S: AsRef<str>>(path: P, sheet_patterns: &[S]) -> Result<Sheet, ProjectSheetError> {
    let path = path.as_ref();
    let criteria = Criteria::from_patterns(sheet_patterns)?;
    let mut workbook = Workbook::open(path)?;
    let sheet = workbook
        .sheet(&criteria)
        .with_prefix(&format!("Load sheet from '{}'", path.display()))?;
    info!("Loaded sheet '{}' from '{}': {} rows", sheet.name, path.display(), sheet.max_row());
    Ok(sheet)
}

/// Loads the project sheet of a workbook and extracts its project records.
pub fn scan_workbook<P: AsRef<Path>, S: AsRef<str>>(
    path: P,
    sheet_patterns: &[S],
    policy: &ClassificationPolicy,
    options: &ExtractOptions,
) -> Result<Extraction, ProjectSheetError> {
    let sheet = load_sheet(path, sheet_patterns)?;
    let extraction = extract_projects(&sheet, policy, options);
    info!(
        "Scanned {} rows: {} projects, {} skipped by pattern, {} blank, {} without signal, {} field issues",
        extraction.stats.rows_scanned,
        extraction.stats.qualified,
        extraction.stats.skipped_pattern,
        extraction.stats.skipped_blank,
        extraction.stats.rejected,
        extraction.issues.len()
    );
    Ok(extraction)
}
