use crate::project::color::ColorStatus;
use crate::project::policy::ClassificationPolicy;
use crate::spreadsheet::CellValue;
use serde::Serialize;
use std::fmt::Display;

/// Why a row was skipped before any signal was looked at.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub enum SkipReason {
    /// Name cell missing, not text, or only whitespace
    Blank,
    /// Name matched this skip pattern
    Pattern(String),
}

/// A single reason for treating a row as a project.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum Signal {
    Customer,
    Location,
    Label,
    Color,
    Region,
    Numbered,
    Financial,
}

impl Display for Signal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Signal::Customer => "customer",
            Signal::Location => "location",
            Signal::Label => "label",
            Signal::Color => "color",
            Signal::Region => "region",
            Signal::Numbered => "numbered",
            Signal::Financial => "financial",
        };
        f.write_str(name)
    }
}

/// Outcome of classifying one row. Skip wins over every signal.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Classification {
    Skip(SkipReason),
    Qualify(Vec<Signal>),
    Reject,
}

impl Classification {
    pub fn is_project(&self) -> bool {
        matches!(self, Classification::Qualify(_))
    }
}

/// The parts of a row the classifier looks at.
#[derive(Clone, Copy, Debug)]
pub struct RowFacts<'a> {
    pub name: &'a CellValue,
    pub customer: &'a CellValue,
    pub location: &'a CellValue,
    pub label: &'a CellValue,
    pub color_status: Option<ColorStatus>,
    pub total_cogs: &'a CellValue,
    pub quote_with_tax: &'a CellValue,
    pub quote_material: &'a CellValue,
}

/// Trimmed project name, `None` when the cell cannot name a project.
pub fn project_name(value: &CellValue) -> Option<&str> {
    value.as_text().map(str::trim).filter(|name| !name.is_empty())
}

pub fn classify(policy: &ClassificationPolicy, facts: &RowFacts) -> Classification {
    let name = match project_name(facts.name) {
        Some(name) => name,
        None => return Classification::Skip(SkipReason::Blank),
    };
    if let Some(pattern) = policy.skip_match(name) {
        return Classification::Skip(SkipReason::Pattern(pattern.to_owned()));
    }

    let checks = [
        (Signal::Customer, facts.customer.is_truthy()),
        (Signal::Location, facts.location.is_truthy()),
        (Signal::Label, facts.label.is_truthy()),
        (Signal::Color, facts.color_status.is_some()),
        (Signal::Region, policy.mentions_region(name)),
        (Signal::Numbered, policy.is_numbered(name)),
        (
            Signal::Financial,
            facts.total_cogs.is_truthy() || facts.quote_with_tax.is_truthy() || facts.quote_material.is_truthy(),
        ),
    ];
    let signals: Vec<Signal> = checks.into_iter().filter(|(_, holds)| *holds).map(|(signal, _)| signal).collect();

    if signals.is_empty() {
        Classification::Reject
    } else {
        Classification::Qualify(signals)
    }
}
