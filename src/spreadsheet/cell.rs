use crate::spreadsheet::reference::index_to_reference;
use chrono::Duration;
use chrono::NaiveDate;
use chrono::NaiveDateTime;
use chrono::NaiveTime;
use chrono::Timelike;
use std::fmt::Display;

/// Storage kinds of cell data in an xlsx worksheet, before conversion to `CellValue`.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub(crate) enum CellType {
    #[default]
    Empty,
    /// Boolean values stored as 0/1
    Boolean,
    /// Numeric values
    Number,
    /// Date/time values stored as numbers from 1900 epoch
    NumberDateTime1900,
    /// Time values stored as numbers from 1900 epoch
    NumberTime1900,
    /// Date/time values stored as numbers from 1904 epoch
    NumberDateTime1904,
    /// Time values stored as numbers from 1904 epoch
    NumberTime1904,
    /// ISO 8601 date/time strings (`t="d"`)
    IsoDateTime,
    /// Inline or formula string values
    InlineString,
    /// Shared string table references
    SharedString,
    /// Error values such as `#N/A`
    Error,
}

impl CellType {
    /// Maps built-in Excel number format IDs to a date or time kind.
    pub(crate) fn parse_builtin_number_format_id(id: &str, is_1904: bool) -> Option<Self> {
        match id {
            "14" | "15" | "16" | "17" | "22" => Some(if is_1904 { Self::NumberDateTime1904 } else { Self::NumberDateTime1900 }),
            "18" | "19" | "20" | "21" | "45" | "46" | "47" => Some(if is_1904 { Self::NumberTime1904 } else { Self::NumberTime1900 }),
            _ => None,
        }
    }

    /// Inspects a custom number format code for date or time tokens.
    /// Quoted literals, escaped characters and bracketed sections (colors, conditions) are skipped.
    pub(crate) fn parse_custom_number_format(format: &str, is_1904: bool) -> Self {
        let mut is_escaped = false;
        let mut is_literal = false;
        let mut is_bracket = false;
        let mut is_date = false;
        let mut is_time = false;
        for character in format.chars() {
            match character {
                _ if is_escaped => is_escaped = false,
                '_' | '\\' if !is_literal => is_escaped = true,

                '"' if is_literal => is_literal = false,
                '"' if !is_bracket => is_literal = true,

                ']' if is_bracket => is_bracket = false,
                '[' if !is_literal => is_bracket = true,
                _ if is_literal || is_bracket => (),

                'Y' | 'y' | 'D' | 'd' => is_date = true,
                'H' | 'h' | 'S' | 's' => is_time = true,
                _ => (),
            }
        }

        match (is_date, is_time, is_1904) {
            (true, _, false) => Self::NumberDateTime1900,
            (true, _, true) => Self::NumberDateTime1904,
            (false, true, false) => Self::NumberTime1900,
            (false, true, true) => Self::NumberTime1904,
            (false, false, _) => Self::Number,
        }
    }
}

/// A typed cell value as the extractor sees it.
#[derive(Clone, Debug, PartialEq)]
pub enum CellValue {
    Empty,
    Bool(bool),
    Number(f64),
    Text(String),
    DateTime(NaiveDateTime),
    Time(NaiveTime),
    /// Spreadsheet error literal (`#REF!`, `#N/A`, ...)
    Error(String),
}

impl CellValue {
    /// Converts a raw worksheet value of the given storage kind.
    /// Shared string references must already be resolved to their text.
    pub(crate) fn convert(kind: CellType, raw: &str) -> Result<CellValue, String> {
        let number = || raw.trim().parse::<f64>().map_err(|_| format!("parse '{raw}' to number failed"));
        let value = match kind {
            CellType::Empty => CellValue::Empty,
            CellType::Boolean => CellValue::Bool(raw.trim() == "1" || raw.trim().eq_ignore_ascii_case("true")),
            CellType::Number => CellValue::Number(number()?),
            CellType::NumberDateTime1900 => to_datetime(number()?, false)?,
            CellType::NumberDateTime1904 => to_datetime(number()?, true)?,
            CellType::NumberTime1900 => to_time(number()?, false)?,
            CellType::NumberTime1904 => to_time(number()?, true)?,
            CellType::IsoDateTime => parse_iso_datetime(raw).unwrap_or_else(|| CellValue::Text(raw.to_owned())),
            CellType::InlineString | CellType::SharedString => CellValue::Text(raw.to_owned()),
            CellType::Error => CellValue::Error(raw.to_owned()),
        };
        Ok(value)
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, CellValue::Empty)
    }

    /// Truthiness used by the classification signals and flag fields:
    /// empty, `false`, zero and the empty string are false, everything else is true.
    pub fn is_truthy(&self) -> bool {
        match self {
            CellValue::Empty => false,
            CellValue::Bool(value) => *value,
            CellValue::Number(value) => *value != 0.0,
            CellValue::Text(value) => !value.is_empty(),
            CellValue::DateTime(_) | CellValue::Time(_) | CellValue::Error(_) => true,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            CellValue::Text(value) => Some(value),
            _ => None,
        }
    }
}

impl Display for CellValue {
    /// Text form of a value: integral numbers drop the fraction,
    /// date/times render as `YYYY-MM-DD HH:MM:SS[.ffffff]`, booleans as `True`/`False`.
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CellValue::Empty => Ok(()),
            CellValue::Bool(true) => write!(f, "True"),
            CellValue::Bool(false) => write!(f, "False"),
            CellValue::Number(value) => write!(f, "{}", format_number(*value)),
            CellValue::Text(value) | CellValue::Error(value) => write!(f, "{value}"),
            CellValue::DateTime(value) => {
                write!(f, "{}", value.format("%Y-%m-%d %H:%M:%S"))?;
                write_fraction(f, value.nanosecond())
            }
            CellValue::Time(value) => {
                write!(f, "{}", value.format("%H:%M:%S"))?;
                write_fraction(f, value.nanosecond())
            }
        }
    }
}

fn write_fraction(f: &mut std::fmt::Formatter<'_>, nanosecond: u32) -> std::fmt::Result {
    let micros = nanosecond / 1_000;
    if micros > 0 {
        write!(f, ".{micros:06}")
    } else {
        Ok(())
    }
}

/// Formats a number the way a spreadsheet user reads it: `42` rather than `42.0`.
pub(crate) fn format_number(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        value.to_string()
    }
}

/// A single worksheet cell with its 1-based position and the raw ARGB fill of its style.
#[derive(Clone, Debug, PartialEq)]
pub struct Cell {
    pub row: usize,
    pub col: usize,
    pub value: CellValue,
    pub fill: Option<String>,
}

impl Cell {
    /// Excel-style reference such as "A12".
    pub fn reference(&self) -> String {
        index_to_reference(self.row, self.col)
    }
}

/// Serial day number to calendar date/time.
/// The 1900 system counts from 1899-12-30 and carries the Lotus 1-2-3 leap year bug below day 60.
fn to_datetime(serial: f64, is_1904: bool) -> Result<CellValue, String> {
    let epoch = if is_1904 {
        NaiveDate::from_ymd_opt(1904, 1, 1)
    } else {
        NaiveDate::from_ymd_opt(1899, 12, 30)
    }
    .and_then(|date| date.and_hms_opt(0, 0, 0))
    .ok_or_else(|| "invalid epoch".to_owned())?;
    let serial = if !is_1904 && serial > 0.0 && serial < 60.0 { serial + 1.0 } else { serial };
    let micros = (serial * 86_400_000_000f64).round() as i64;
    epoch
        .checked_add_signed(Duration::microseconds(micros))
        .map(CellValue::DateTime)
        .ok_or_else(|| format!("serial date '{serial}' out of range"))
}

/// Time-formatted serials below one day are plain times of day.
fn to_time(serial: f64, is_1904: bool) -> Result<CellValue, String> {
    let micros = (serial * 86_400_000_000f64).round() as i64;
    if (0..86_400_000_000).contains(&micros) {
        let seconds = (micros / 1_000_000) as u32;
        let nanoseconds = (micros % 1_000_000) as u32 * 1_000;
        NaiveTime::from_num_seconds_from_midnight_opt(seconds, nanoseconds)
            .map(CellValue::Time)
            .ok_or_else(|| format!("serial time '{serial}' out of range"))
    } else {
        to_datetime(serial, is_1904)
    }
}

fn parse_iso_datetime(raw: &str) -> Option<CellValue> {
    if let Ok(datetime) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f") {
        Some(CellValue::DateTime(datetime))
    } else if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        date.and_hms_opt(0, 0, 0).map(CellValue::DateTime)
    } else if let Ok(time) = NaiveTime::parse_from_str(raw, "%H:%M:%S%.f") {
        Some(CellValue::Time(time))
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn custom_number_formats() {
        assert_eq!(CellType::parse_custom_number_format("mm/dd/yy", false), CellType::NumberDateTime1900);
        assert_eq!(CellType::parse_custom_number_format("h:mm AM/PM", true), CellType::NumberTime1904);
        assert_eq!(CellType::parse_custom_number_format("[Red]#,##0.00", false), CellType::Number);
        assert_eq!(CellType::parse_custom_number_format("\"$\"#,##0_);(\"$\"#,##0)", false), CellType::Number);
        assert_eq!(CellType::parse_custom_number_format("0.0\"days\"", false), CellType::Number);
    }

    #[test]
    fn convert_dates() {
        let value = CellValue::convert(CellType::NumberDateTime1900, "45672").unwrap();
        assert_eq!(value.to_string(), "2025-01-15 00:00:00");

        let value = CellValue::convert(CellType::NumberDateTime1900, "45672.5").unwrap();
        assert_eq!(value.to_string(), "2025-01-15 12:00:00");

        let value = CellValue::convert(CellType::NumberDateTime1904, "0").unwrap();
        assert_eq!(value.to_string(), "1904-01-01 00:00:00");

        let value = CellValue::convert(CellType::NumberTime1900, "0.75").unwrap();
        assert_eq!(value.to_string(), "18:00:00");

        let value = CellValue::convert(CellType::IsoDateTime, "2024-03-01T08:30:00").unwrap();
        assert_eq!(value.to_string(), "2024-03-01 08:30:00");
    }

    #[test]
    fn convert_scalars() {
        assert_eq!(CellValue::convert(CellType::Boolean, "1").unwrap(), CellValue::Bool(true));
        assert_eq!(CellValue::convert(CellType::Number, "12.5").unwrap(), CellValue::Number(12.5));
        assert_eq!(CellValue::convert(CellType::Error, "#N/A").unwrap(), CellValue::Error("#N/A".to_owned()));
        assert!(CellValue::convert(CellType::Number, "abc").is_err());
    }

    #[test]
    fn truthiness() {
        assert!(!CellValue::Empty.is_truthy());
        assert!(!CellValue::Number(0.0).is_truthy());
        assert!(!CellValue::Text(String::new()).is_truthy());
        assert!(!CellValue::Bool(false).is_truthy());
        assert!(CellValue::Text(" ".to_owned()).is_truthy());
        assert!(CellValue::Number(-1.0).is_truthy());
    }

    #[test]
    fn display_numbers() {
        assert_eq!(CellValue::Number(75201.0).to_string(), "75201");
        assert_eq!(CellValue::Number(0.0825).to_string(), "0.0825");
        assert_eq!(CellValue::Bool(true).to_string(), "True");
    }
}
