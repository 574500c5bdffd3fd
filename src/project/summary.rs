//! Aggregate figures over extracted records, for the log and `--summary`.
//!
//! The KPI block computes the same numbers as the generated `getKPIData()`,
//! so the two can be compared without running the front end.
use crate::error::ProjectSheetError;
use crate::project::color::ColorStatus;
use crate::project::record::ProjectRecord;
use log::info;
use regex::Regex;
use serde::Serialize;

/// US state abbreviations used to place a project by its name.
/// Mirrors the regex in the generated `getKPIData()`, not the policy's region
/// pattern (no Canada or NB), so both report the same locations.
const STATE_PATTERN: &str = r"\b(AL|AK|AZ|AR|CA|CO|CT|DE|FL|GA|HI|ID|IL|IN|IA|KS|KY|LA|ME|MD|MA|MI|MN|MS|MO|MT|NE|NV|NH|NJ|NM|NY|NC|ND|OH|OK|OR|PA|RI|SC|SD|TN|TX|UT|VT|VA|WA|WV|WI|WY)\b";

const TOP_LOCATIONS: usize = 15;

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Count {
    pub key: String,
    pub count: usize,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct Kpi {
    pub total_projects: usize,
    pub new_leads: usize,
    pub active_bids: usize,
    pub active_projects: usize,
    pub quotes_accepted: usize,
    pub deposits_paid: usize,
    pub total_quote_value: f64,
    pub projects_by_label: Vec<Count>,
    pub projects_by_location: Vec<Count>,
    pub quotation: usize,
    pub already_quoted: usize,
    pub needs_clarification: usize,
    pub ongoing_projects: usize,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct Summary {
    pub total: usize,
    pub with_customer: usize,
    pub with_location: usize,
    pub with_label: usize,
    pub with_color_status: usize,
    pub with_quote: usize,
    pub with_est_metal_date: usize,
    pub with_contractor_date: usize,
    pub first_row: Option<usize>,
    pub last_row: Option<usize>,
    pub by_label: Vec<Count>,
    pub by_color_status: Vec<Count>,
    /// Canonical fill colors seen on project rows, recognized or not
    pub by_color: Vec<Count>,
    pub kpi: Kpi,
}

impl Summary {
    pub fn from_records(records: &[ProjectRecord]) -> Result<Summary, ProjectSheetError> {
        let count = |predicate: fn(&ProjectRecord) -> bool| records.iter().filter(|record| predicate(record)).count();
        Ok(Summary {
            total: records.len(),
            with_customer: count(|record| record.customer.is_some()),
            with_location: count(|record| record.location.is_some()),
            with_label: count(|record| record.label.is_some()),
            with_color_status: count(|record| record.color_status.is_some()),
            with_quote: count(|record| record.our_quote_with_tax.is_some_and(|value| value != 0.0)),
            with_est_metal_date: count(|record| record.est_metal_date.is_some()),
            with_contractor_date: count(|record| record.contractor_date.is_some()),
            first_row: records.iter().map(|record| record.row).min(),
            last_row: records.iter().map(|record| record.row).max(),
            by_label: tally(records.iter().map(|record| record.label.as_deref().unwrap_or("No Label")), true),
            by_color_status: tally(
                records
                    .iter()
                    .map(|record| record.color_status.map(|status| status.label()).unwrap_or("No Color")),
                true,
            ),
            by_color: tally(records.iter().filter_map(|record| record.color.as_deref()), true),
            kpi: Kpi::from_records(records)?,
        })
    }

    pub fn log(&self) {
        info!(
            "{} projects (rows {}..{}): {} with customer, {} with location, {} with label, {} with color status, {} with quote",
            self.total,
            self.first_row.unwrap_or(0),
            self.last_row.unwrap_or(0),
            self.with_customer,
            self.with_location,
            self.with_label,
            self.with_color_status,
            self.with_quote
        );
        info!(
            "Dates: {} with estimated metal date, {} with contractor date",
            self.with_est_metal_date, self.with_contractor_date
        );
        for entry in &self.by_label {
            info!("  label {}: {}", entry.key, entry.count);
        }
        for entry in &self.by_color_status {
            info!("  status {}: {}", entry.key, entry.count);
        }
    }
}

impl Kpi {
    pub fn from_records(records: &[ProjectRecord]) -> Result<Kpi, ProjectSheetError> {
        let state = Regex::new(STATE_PATTERN)?;
        let accepted_date = Regex::new(r"^\d{2}/\d{2}/\d{2}$")?;

        let label_is = |label: &str| records.iter().filter(|record| record.label.as_deref() == Some(label)).count();
        let status_has = |part: &str| {
            records
                .iter()
                .filter(|record| display_status(record).is_some_and(|status| status.contains(part)))
                .count()
        };

        let mut locations = tally(
            records.iter().filter_map(|record| {
                record
                    .location
                    .as_deref()
                    .or_else(|| state.captures(&record.name).and_then(|captures| captures.get(1)).map(|found| found.as_str()))
            }),
            true,
        );
        locations.truncate(TOP_LOCATIONS);

        Ok(Kpi {
            total_projects: records.len(),
            new_leads: label_is("2025 New Lead"),
            active_bids: label_is("2025 Active Bid"),
            active_projects: label_is("2025 Active project"),
            quotes_accepted: records
                .iter()
                .filter_map(|record| record.quote_accepted.as_deref())
                .filter(|value| value.to_lowercase() == "accepted" || accepted_date.is_match(value))
                .count(),
            deposits_paid: records
                .iter()
                .filter(|record| record.deposit_paid.as_deref() == Some("Paid"))
                .count(),
            total_quote_value: records.iter().filter_map(|record| record.our_quote_with_tax).sum(),
            projects_by_label: tally(
                records
                    .iter()
                    .map(|record| record.label.as_deref().or(display_status(record)).unwrap_or("No Status")),
                false,
            ),
            projects_by_location: locations,
            quotation: status_has("Quotation"),
            already_quoted: status_has("Already Quoted"),
            needs_clarification: status_has("Needs Clarification"),
            ongoing_projects: status_has("Ongoing Project"),
        })
    }
}

/// Status shown for a record: its color status, else its label.
pub fn display_status(record: &ProjectRecord) -> Option<&str> {
    record
        .color_status
        .map(|status: ColorStatus| status.label())
        .or(record.label.as_deref())
}

/// Counts keys in first-seen order, optionally sorted by descending count (ties keep first-seen order).
fn tally<'a>(keys: impl Iterator<Item = &'a str>, by_count: bool) -> Vec<Count> {
    let mut counts = Vec::<Count>::new();
    for key in keys {
        match counts.iter_mut().find(|entry| entry.key == key) {
            Some(entry) => entry.count += 1,
            None => counts.push(Count {
                key: key.to_owned(),
                count: 1,
            }),
        }
    }
    if by_count {
        counts.sort_by(|a, b| b.count.cmp(&a.count));
    }
    counts
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(row: usize, name: &str) -> ProjectRecord {
        ProjectRecord {
            row,
            name: name.to_owned(),
            ..Default::default()
        }
    }

    fn sample() -> Vec<ProjectRecord> {
        vec![
            ProjectRecord {
                label: Some("2025 New Lead".to_owned()),
                location: Some("Austin".to_owned()),
                customer: Some("Jane Roe".to_owned()),
                ..record(4, "Ranch barn")
            },
            ProjectRecord {
                color_status: Some(ColorStatus::NeedsClarification),
                color: Some("EA352E".to_owned()),
                our_quote_with_tax: Some(48500.0),
                quote_accepted: Some("Accepted".to_owned()),
                ..record(9, "Dallas, TX Storage Unit")
            },
            ProjectRecord {
                label: Some("2025 Active Bid".to_owned()),
                color_status: Some(ColorStatus::Quotation),
                color: Some("FEFF00".to_owned()),
                our_quote_with_tax: Some(1500.5),
                quote_accepted: Some("03/14/25".to_owned()),
                deposit_paid: Some("Paid".to_owned()),
                est_metal_date: Some("2025-01-15 00:00:00".to_owned()),
                ..record(12, "Shop in Tulsa, OK")
            },
            ProjectRecord {
                color: Some("123456".to_owned()),
                quote_accepted: Some("Declined".to_owned()),
                ..record(20, "Houston, TX warehouse")
            },
        ]
    }

    #[test]
    fn summary_counts() -> Result<(), ProjectSheetError> {
        let summary = Summary::from_records(&sample())?;
        assert_eq!(summary.total, 4);
        assert_eq!(summary.with_customer, 1);
        assert_eq!(summary.with_label, 2);
        assert_eq!(summary.with_color_status, 2);
        assert_eq!(summary.with_quote, 2);
        assert_eq!(summary.with_est_metal_date, 1);
        assert_eq!((summary.first_row, summary.last_row), (Some(4), Some(20)));
        assert_eq!(
            summary.by_label,
            vec![
                Count { key: "No Label".to_owned(), count: 2 },
                Count { key: "2025 New Lead".to_owned(), count: 1 },
                Count { key: "2025 Active Bid".to_owned(), count: 1 },
            ]
        );
        assert_eq!(summary.by_color.len(), 3);
        Ok(())
    }

    #[test]
    fn kpi_matches_generated_module() -> Result<(), ProjectSheetError> {
        let kpi = Kpi::from_records(&sample())?;
        assert_eq!(kpi.total_projects, 4);
        assert_eq!(kpi.new_leads, 1);
        assert_eq!(kpi.active_bids, 1);
        assert_eq!(kpi.quotes_accepted, 2);
        assert_eq!(kpi.deposits_paid, 1);
        assert_eq!(kpi.total_quote_value, 50000.5);
        assert_eq!(kpi.quotation, 1);
        assert_eq!(kpi.needs_clarification, 1);
        assert_eq!(kpi.already_quoted, 0);
        assert_eq!(
            kpi.projects_by_label,
            vec![
                Count { key: "2025 New Lead".to_owned(), count: 1 },
                Count { key: "Red - Needs Clarification".to_owned(), count: 1 },
                Count { key: "2025 Active Bid".to_owned(), count: 1 },
                Count { key: "No Status".to_owned(), count: 1 },
            ]
        );
        assert_eq!(
            kpi.projects_by_location,
            vec![
                Count { key: "TX".to_owned(), count: 2 },
                Count { key: "Austin".to_owned(), count: 1 },
                Count { key: "OK".to_owned(), count: 1 },
            ]
        );
        Ok(())
    }

    #[test]
    fn location_regex_matches_generated_module() -> Result<(), ProjectSheetError> {
        assert!(crate::output::typescript::HELPERS.contains(&format!("/{STATE_PATTERN}/")));

        let records = vec![record(1, "Moncton NB barn"), record(2, "Barn in Tulsa, OK")];
        let kpi = Kpi::from_records(&records)?;
        assert_eq!(kpi.projects_by_location, vec![Count { key: "OK".to_owned(), count: 1 }]);
        Ok(())
    }

    #[test]
    fn empty_records() -> Result<(), ProjectSheetError> {
        let summary = Summary::from_records(&[])?;
        assert_eq!(summary.total, 0);
        assert_eq!(summary.first_row, None);
        assert!(summary.kpi.projects_by_location.is_empty());
        Ok(())
    }
}
