//! # Workbook Loading
//!
//! Reads an Excel 2007+ package (`.xlsx`, `.xlsm`) into an owned in-memory
//! `Sheet`: typed cell values, shared strings resolved, number formats applied
//! for dates and times, and the fill color of every styled cell attached.
use thiserror::Error;

pub mod cell;
pub mod criteria;
pub(crate) mod excel;
pub(crate) mod reference;
pub mod sheet;
pub(crate) mod styles;
#[cfg(test)]
pub(crate) mod testing;
pub mod xlsx;

pub use cell::Cell;
pub use cell::CellValue;
pub use criteria::Criteria;
pub use sheet::Row;
pub use sheet::Sheet;
pub use xlsx::Workbook;

/// Structural problems of a workbook package. All of them are fatal for the run.
#[derive(Error, Debug)]
pub enum SpreadsheetError {
    #[error("Malformed workbook '{0}': {1}")]
    MalformedInput(String, String),

    #[error("Malformed workbook '{0}': missing part '{1}'")]
    MissingPart(String, String),

    #[error("Workbook '{0}' is password protected or not an xlsx package")]
    CompoundFileError(String),

    #[error("Workbook '{0}' contains no worksheets")]
    EmptyWorkbook(String),

    #[error("No worksheet in '{0}' matches the requested sheet names")]
    SheetNotFound(String),

    #[error("Invalid cell value in '{0}'!{1}: {2}")]
    CellValueError(String, String, String),
}
