//! Low-level readers shared by the workbook loader.

pub(crate) mod reader;
pub(crate) mod xml;
pub(crate) mod zip;
