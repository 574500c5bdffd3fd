//! # Classification Policy
//!
//! The predicate tables the row classifier runs on: skip patterns, the region
//! pattern, the numbered-project prefix and the color table. A built-in policy
//! is embedded in the binary; a TOML file with the same layout replaces it.
use crate::error::ProjectSheetError;
use crate::project::color::Color;
use crate::project::color::ColorError;
use crate::project::color::ColorStatus;
use crate::project::color::ColorTable;
use log::debug;
use regex::Regex;
use regex::RegexBuilder;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::Path;
use thiserror::Error;

const DEFAULT_POLICY: &str = include_str!("default_policy.toml");

#[derive(Error, Debug)]
pub enum PolicyError {
    #[error("Invalid {0} pattern '{1}': {2}")]
    InvalidPattern(&'static str, String, regex::Error),

    #[error("Invalid color entry for '{0}': {1}")]
    InvalidColor(String, ColorError),

    #[error("Policy '{0}': {1}")]
    InvalidPolicy(String, String),
}

/// On-disk layout of a policy file.
#[derive(Deserialize, Debug)]
#[serde(deny_unknown_fields)]
struct PolicyFile {
    skip_patterns: Vec<String>,
    region_pattern: String,
    #[serde(default = "default_numbered_prefix")]
    numbered_prefix: String,
    #[serde(default)]
    colors: BTreeMap<String, Vec<String>>,
}

fn default_numbered_prefix() -> String {
    "#".to_owned()
}

/// A compiled classification policy.
#[derive(Clone, Debug)]
pub struct ClassificationPolicy {
    skip_patterns: Vec<Regex>,
    region_pattern: Regex,
    numbered_prefix: String,
    colors: ColorTable,
}

impl ClassificationPolicy {
    /// The policy shipped with the binary.
    pub fn builtin() -> Result<ClassificationPolicy, ProjectSheetError> {
        Self::from_toml("<builtin>", DEFAULT_POLICY)
    }

    /// Loads a policy file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<ClassificationPolicy, ProjectSheetError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;
        let policy = Self::from_toml(&path.display().to_string(), &content)?;
        debug!("Loaded classification policy from '{}'", path.display());
        Ok(policy)
    }

    /// Parses and compiles a policy from TOML text. `source` names it in errors.
    pub fn from_toml(source: &str, content: &str) -> Result<ClassificationPolicy, ProjectSheetError> {
        let file: PolicyFile = toml::from_str(content)?;

        let skip_patterns = file
            .skip_patterns
            .iter()
            .map(|pattern| {
                RegexBuilder::new(pattern)
                    .case_insensitive(true)
                    .build()
                    .map_err(|error| PolicyError::InvalidPattern("skip", pattern.to_owned(), error))
            })
            .collect::<Result<Vec<_>, _>>()?;

        let region_pattern = Regex::new(&file.region_pattern)
            .map_err(|error| PolicyError::InvalidPattern("region", file.region_pattern.to_owned(), error))?;

        if file.numbered_prefix.is_empty() {
            Err(PolicyError::InvalidPolicy(source.to_owned(), "numbered_prefix must not be empty".to_owned()))?;
        }

        let mut colors = ColorTable::default();
        for (label, codes) in &file.colors {
            let status = ColorStatus::parse(label).map_err(|error| PolicyError::InvalidColor(label.to_owned(), error))?;
            for code in codes {
                let color = Color::parse(code).map_err(|error| PolicyError::InvalidColor(label.to_owned(), error))?;
                colors.insert(color, status);
            }
        }

        Ok(ClassificationPolicy {
            skip_patterns,
            region_pattern,
            numbered_prefix: file.numbered_prefix,
            colors,
        })
    }

    /// First skip pattern found in the lowercased name.
    pub fn skip_match(&self, name: &str) -> Option<&str> {
        let name = name.trim().to_lowercase();
        self.skip_patterns
            .iter()
            .find(|pattern| pattern.is_match(&name))
            .map(|pattern| pattern.as_str())
    }

    /// True when the name mentions a region (state abbreviation, Canada, ...).
    pub fn mentions_region(&self, name: &str) -> bool {
        self.region_pattern.is_match(name)
    }

    pub fn is_numbered(&self, name: &str) -> bool {
        name.starts_with(&self.numbered_prefix)
    }

    pub fn color_status(&self, color: &Color) -> Option<ColorStatus> {
        self.colors.status(color)
    }

    pub fn colors(&self) -> &ColorTable {
        &self.colors
    }

    pub fn skip_pattern_count(&self) -> usize {
        self.skip_patterns.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn color(raw: &str) -> Color {
        Color::parse(raw).unwrap()
    }

    #[test]
    fn builtin_policy() -> Result<(), ProjectSheetError> {
        let policy = ClassificationPolicy::builtin()?;
        assert_eq!(policy.skip_pattern_count(), 49);
        assert_eq!(policy.colors().len(), 16);

        assert_eq!(policy.skip_match("Suppliers"), Some("^suppliers?$"));
        assert_eq!(policy.skip_match("  CONTRACTOR "), Some("^contractors?$"));
        assert_eq!(policy.skip_match("01_Accounting"), Some(r"^\d{2}_"));
        assert_eq!(policy.skip_match("Copy of New Project Template"), Some("new project template"));
        assert_eq!(policy.skip_match("Supplier yard, TX"), None);
        assert_eq!(policy.skip_match("Dallas, TX Storage Unit"), None);

        assert!(policy.mentions_region("Dallas, TX Storage Unit"));
        assert!(policy.mentions_region("Moncton NB"));
        assert!(!policy.mentions_region("Dallas, tx Storage"));
        assert!(!policy.mentions_region("TEXAS"));
        assert!(policy.mentions_region("Barn in Tulsa, OK"));

        assert!(policy.is_numbered("#1042 Warehouse"));
        assert!(!policy.is_numbered("Warehouse #1042"));

        assert_eq!(policy.color_status(&color("00EA352E")), Some(ColorStatus::NeedsClarification));
        assert_eq!(policy.color_status(&color("FFFF0000")), Some(ColorStatus::NeedsClarification));
        assert_eq!(policy.color_status(&color("00D190DA")), Some(ColorStatus::PurplePink));
        assert_eq!(policy.color_status(&color("00123456")), None);
        Ok(())
    }

    #[test]
    fn custom_policy() -> Result<(), ProjectSheetError> {
        let policy = ClassificationPolicy::from_toml(
            "custom.toml",
            r#"
            skip_patterns = ['^archive']
            region_pattern = '\b(Ontario)\b'
            [colors]
            red = ["FFC00000"]
            "#,
        )?;
        assert!(policy.skip_match("Archive 2023").is_some());
        assert!(policy.skip_match("Suppliers").is_none());
        assert!(policy.mentions_region("Barrie, Ontario"));
        assert!(policy.is_numbered("#7"));
        assert_eq!(policy.color_status(&color("C00000")), Some(ColorStatus::NeedsClarification));
        Ok(())
    }

    #[test]
    fn invalid_policies() {
        let result = ClassificationPolicy::from_toml("bad.toml", "skip_patterns = ['(']\nregion_pattern = 'x'");
        assert!(matches!(result, Err(ProjectSheetError::PolicyError(PolicyError::InvalidPattern("skip", _, _)))));

        let result = ClassificationPolicy::from_toml("bad.toml", "skip_patterns = []\nregion_pattern = 'x'\n[colors]\nblue = ['0000FF']");
        assert!(matches!(result, Err(ProjectSheetError::PolicyError(PolicyError::InvalidColor(_, _)))));

        let result = ClassificationPolicy::from_toml("bad.toml", "skip_patterns = []\nregion_pattern = 'x'\n[colors]\nred = ['nope']");
        assert!(matches!(result, Err(ProjectSheetError::PolicyError(PolicyError::InvalidColor(_, _)))));

        let result = ClassificationPolicy::from_toml("bad.toml", "skip_patterns = []");
        assert!(matches!(result, Err(ProjectSheetError::TomlError(_))));
    }

    #[test]
    fn missing_policy_file() {
        let result = ClassificationPolicy::load("does/not/exist.toml");
        assert!(result.err().map(|error| error.is_file_not_found()).unwrap_or(false));
    }
}
