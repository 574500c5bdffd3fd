//! Run configuration: file locations and extraction settings.
//!
//! Values come from the built-in defaults, then an optional TOML file,
//! then command-line flags (applied by the binary).
use crate::error::ProjectSheetError;
use crate::output::typescript;
use crate::output::typescript::Order;
use crate::project::extract;
use log::debug;
use serde::Deserialize;
use serde::Serialize;
use std::path::Path;
use std::path::PathBuf;

pub const DEFAULT_INPUT: &str = "Storage Materials.xlsx";
pub const DEFAULT_JSON: &str = "projects_data.json";
pub const DEFAULT_TYPESCRIPT: &str = "src/lib/data.ts";

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Source workbook
    pub input: PathBuf,
    /// Extracted records
    pub json: PathBuf,
    /// Generated front-end module
    pub typescript: PathBuf,
    /// Classification policy replacing the built-in one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub policy: Option<PathBuf>,
    /// Glob patterns choosing the sheet; the active sheet when empty
    pub sheet: Vec<String>,
    /// Where to write the summary as JSON
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<PathBuf>,
    pub header_rows: usize,
    pub comment_limit: usize,
    pub typescript_comment_limit: usize,
    pub order: Order,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            input: PathBuf::from(DEFAULT_INPUT),
            json: PathBuf::from(DEFAULT_JSON),
            typescript: PathBuf::from(DEFAULT_TYPESCRIPT),
            policy: None,
            sheet: Vec::new(),
            summary: None,
            header_rows: extract::DEFAULT_HEADER_ROWS,
            comment_limit: extract::DEFAULT_COMMENT_LIMIT,
            typescript_comment_limit: typescript::DEFAULT_COMMENT_LIMIT,
            order: Order::default(),
        }
    }
}

impl Config {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Config, ProjectSheetError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;
        let config = Self::from_toml(&content)?;
        debug!("Loaded configuration from '{}'", path.display());
        Ok(config)
    }

    pub fn from_toml(content: &str) -> Result<Config, ProjectSheetError> {
        Ok(toml::from_str(content)?)
    }
}
