use thiserror::Error;

/// Main error type for the project sheet extractor.
/// Aggregates errors from the standard library, dependencies, and internal modules.
#[derive(Error, Debug)]
pub enum ProjectSheetError {
    #[error("{0}: {1}")]
    WithContextError(String, #[source] Box<ProjectSheetError>),

    // Standard library errors
    #[error("{0}")]
    IoError(#[from] std::io::Error),

    #[error("{0}")]
    ParseIntError(#[from] std::num::ParseIntError),

    #[error("{0}")]
    PatternError(#[from] glob::PatternError),

    // Third-party library errors
    #[error("{0}")]
    ZipError(#[from] zip::result::ZipError),

    #[error("{0}")]
    XmlError(#[from] quick_xml::Error),

    #[error("{0}")]
    XmlEncodingError(#[from] quick_xml::encoding::EncodingError),

    #[error("{0}")]
    XmlAttributeError(#[from] quick_xml::events::attributes::AttrError),

    #[error("{0}")]
    JsonError(#[from] serde_json::Error),

    #[error("{0}")]
    TomlError(#[from] toml::de::Error),

    #[error("{0}")]
    RegexError(#[from] regex::Error),

    // Helper module errors
    #[error("{0}")]
    XmlHelperError(#[from] crate::helpers::xml::XmlError),

    #[error("{0}")]
    WorkbookReaderError(#[from] crate::helpers::reader::WorkbookReaderError),

    // Spreadsheet module errors
    #[error("{0}")]
    SpreadsheetError(#[from] crate::spreadsheet::SpreadsheetError),

    // Project module errors
    #[error("{0}")]
    PolicyError(#[from] crate::project::policy::PolicyError),
}

impl ProjectSheetError {
    /// True when the error means an input file does not exist.
    pub fn is_file_not_found(&self) -> bool {
        match self {
            ProjectSheetError::WorkbookReaderError(crate::helpers::reader::WorkbookReaderError::FileNotFound(_)) => true,
            ProjectSheetError::IoError(error) => error.kind() == std::io::ErrorKind::NotFound,
            ProjectSheetError::WithContextError(_, source) => source.is_file_not_found(),
            _ => false,
        }
    }

    /// True when the error comes from an unreadable workbook structure.
    pub fn is_malformed_input(&self) -> bool {
        match self {
            ProjectSheetError::SpreadsheetError(crate::spreadsheet::SpreadsheetError::SheetNotFound(_)) => false,
            ProjectSheetError::ZipError(_)
            | ProjectSheetError::XmlError(_)
            | ProjectSheetError::XmlEncodingError(_)
            | ProjectSheetError::XmlAttributeError(_)
            | ProjectSheetError::XmlHelperError(_)
            | ProjectSheetError::SpreadsheetError(_) => true,
            ProjectSheetError::WithContextError(_, source) => source.is_malformed_input(),
            _ => false,
        }
    }
}

pub(crate) trait ResultMessage {
    fn with_prefix(self, message: &str) -> Self;
}

impl<T> ResultMessage for Result<T, ProjectSheetError> {
    fn with_prefix(self, message: &str) -> Self {
        self.map_err(|e| ProjectSheetError::WithContextError(message.to_owned(), Box::new(e)))
    }
}
