//! Fill colors and the status labels they stand for.
use serde::Deserialize;
use serde::Serialize;
use std::collections::HashMap;
use std::fmt::Display;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ColorError {
    #[error("Invalid color '{0}': expected RGB or ARGB hex")]
    InvalidColor(String),

    #[error("Unknown color status '{0}'")]
    UnknownStatus(String),
}

/// A fill color in canonical form: six uppercase hex digits, no alpha.
///
/// `00EA352E`, `FFEA352E`, `#ea352e` and `EA352E` are the same color.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Color(String);

impl Color {
    /// Normalizes an RGB or ARGB hex code.
    pub fn parse(raw: &str) -> Result<Color, ColorError> {
        let hex = raw.trim().trim_start_matches('#');
        if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(ColorError::InvalidColor(raw.to_owned()));
        }
        match hex.len() {
            6 => Ok(Color(hex.to_ascii_uppercase())),
            8 => Ok(Color(hex[2..].to_ascii_uppercase())),
            _ => Err(ColorError::InvalidColor(raw.to_owned())),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for Color {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Status a row carries through the fill color of its name cell.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ColorStatus {
    #[serde(rename = "Yellow - Quotation")]
    Quotation,
    #[serde(rename = "Green - Already Quoted")]
    AlreadyQuoted,
    #[serde(rename = "Red - Needs Clarification")]
    NeedsClarification,
    #[serde(rename = "Brown - Ongoing Project")]
    OngoingProject,
    #[serde(rename = "Orange")]
    Orange,
    #[serde(rename = "Purple/Pink")]
    PurplePink,
}

impl ColorStatus {
    pub const ALL: [ColorStatus; 6] = [
        ColorStatus::Quotation,
        ColorStatus::AlreadyQuoted,
        ColorStatus::NeedsClarification,
        ColorStatus::OngoingProject,
        ColorStatus::Orange,
        ColorStatus::PurplePink,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            ColorStatus::Quotation => "Yellow - Quotation",
            ColorStatus::AlreadyQuoted => "Green - Already Quoted",
            ColorStatus::NeedsClarification => "Red - Needs Clarification",
            ColorStatus::OngoingProject => "Brown - Ongoing Project",
            ColorStatus::Orange => "Orange",
            ColorStatus::PurplePink => "Purple/Pink",
        }
    }

    /// Accepts the full label or its short color name (`red`, `green`, `purple`, ...).
    pub fn parse(value: &str) -> Result<ColorStatus, ColorError> {
        let value = value.trim();
        let short = value.to_ascii_lowercase();
        ColorStatus::ALL
            .into_iter()
            .find(|status| status.label().eq_ignore_ascii_case(value))
            .or(match short.as_str() {
                "yellow" | "quotation" => Some(ColorStatus::Quotation),
                "green" | "already quoted" => Some(ColorStatus::AlreadyQuoted),
                "red" | "needs clarification" => Some(ColorStatus::NeedsClarification),
                "brown" | "ongoing project" => Some(ColorStatus::OngoingProject),
                "purple" | "pink" => Some(ColorStatus::PurplePink),
                _ => None,
            })
            .ok_or_else(|| ColorError::UnknownStatus(value.to_owned()))
    }
}

impl Display for ColorStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Lookup from canonical color to status. Unknown colors have no status.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ColorTable {
    entries: HashMap<Color, ColorStatus>,
}

impl ColorTable {
    pub fn insert(&mut self, color: Color, status: ColorStatus) {
        self.entries.insert(color, status);
    }

    pub fn status(&self, color: &Color) -> Option<ColorStatus> {
        self.entries.get(color).copied()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
