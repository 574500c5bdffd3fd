//! # Output
//!
//! Serializers for extracted records: the JSON interchange file and the
//! generated TypeScript data module.
use crate::error::ProjectSheetError;
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

pub mod json;
pub mod typescript;

/// Creates (or truncates) an output file, making missing parent directories.
pub(crate) fn create_output(path: &Path) -> Result<BufWriter<File>, ProjectSheetError> {
    if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    Ok(BufWriter::new(File::create(path)?))
}
