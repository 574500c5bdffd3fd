//! # TypeScript Data Module
//!
//! Renders records as `export const projects: Project[]` for the dashboard
//! front end, followed by the fixed helpers it imports (`getKPIData`,
//! `getProjectById`, `formatCurrency`). Field names follow the front end's
//! `Project` interface in `./types`.
use crate::error::ProjectSheetError;
use crate::output::create_output;
use crate::project::extract::truncate;
use crate::project::summary::display_status;
use crate::project::ProjectRecord;
use crate::spreadsheet::cell::format_number;
use log::info;
use serde::Deserialize;
use serde::Serialize;
use std::io::Write;
use std::path::Path;

/// Default maximum length of comments in the generated module, in characters.
pub const DEFAULT_COMMENT_LIMIT: usize = 200;

/// Order of the generated array.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Order {
    /// Highest row first; rows further down the sheet are newer
    #[default]
    LatestFirst,
    /// Sheet order
    Sheet,
}

#[derive(Clone, Debug, PartialEq)]
pub struct TypeScriptOptions {
    /// Workbook name mentioned in the header comment
    pub source_name: String,
    pub order: Order,
    pub comment_limit: usize,
}

impl Default for TypeScriptOptions {
    fn default() -> Self {
        Self {
            source_name: "Storage Materials.xlsx".to_owned(),
            order: Order::default(),
            comment_limit: DEFAULT_COMMENT_LIMIT,
        }
    }
}

pub(crate) const HELPERS: &str = r#"
export function getKPIData(): KPIData {
  const totalProjects = projects.length;
  const newLeads = projects.filter(p => p.projectLabel === "2025 New Lead").length;
  const activeBids = projects.filter(p => p.projectLabel === "2025 Active Bid").length;
  const activeProjects = projects.filter(p => p.projectLabel === "2025 Active project").length;

  // Count by color status
  const quotation = projects.filter(p => p.colorStatus?.includes("Quotation")).length;
  const alreadyQuoted = projects.filter(p => p.colorStatus?.includes("Already Quoted")).length;
  const needsClarification = projects.filter(p => p.colorStatus?.includes("Needs Clarification")).length;
  const ongoingProjects = projects.filter(p => p.colorStatus?.includes("Ongoing Project")).length;

  const quotesAccepted = projects.filter(p =>
    p.quoteAcceptedDeclined &&
    (p.quoteAcceptedDeclined.toLowerCase() === "accepted" || p.quoteAcceptedDeclined.match(/^\d{2}\/\d{2}\/\d{2}$/))
  ).length;
  const depositsPaid = projects.filter(p => p.depositPaid === "Paid").length;
  const totalQuoteValue = projects.reduce((sum, p) => sum + (p.ourQuoteWithTax || 0), 0);

  // Group by label/status
  const labelCounts: Record<string, number> = {};
  projects.forEach(p => {
    const label = p.projectLabel || p.colorStatus || "No Status";
    labelCounts[label] = (labelCounts[label] || 0) + 1;
  });
  const projectsByLabel = Object.entries(labelCounts).map(([label, count]) => ({ label, count }));

  // Group by location (extract state from project name)
  const locationCounts: Record<string, number> = {};
  projects.forEach(p => {
    let location = p.location;
    if (!location && p.projectName) {
      const stateMatch = p.projectName.match(/\b(AL|AK|AZ|AR|CA|CO|CT|DE|FL|GA|HI|ID|IL|IN|IA|KS|KY|LA|ME|MD|MA|MI|MN|MS|MO|MT|NE|NV|NH|NJ|NM|NY|NC|ND|OH|OK|OR|PA|RI|SC|SD|TN|TX|UT|VT|VA|WA|WV|WI|WY)\b/);
      if (stateMatch) {
        location = stateMatch[1];
      }
    }
    if (location) {
      locationCounts[location] = (locationCounts[location] || 0) + 1;
    }
  });
  const projectsByLocation = Object.entries(locationCounts)
    .map(([location, count]) => ({ location, count }))
    .sort((a, b) => b.count - a.count)
    .slice(0, 15);

  return {
    totalProjects,
    newLeads,
    activeBids,
    activeProjects,
    quotesAccepted,
    depositsPaid,
    totalQuoteValue,
    projectsByLabel,
    projectsByLocation,
    quotation,
    alreadyQuoted,
    needsClarification,
    ongoingProjects,
  };
}

export function getProjectById(id: number): Project | undefined {
  return projects.find(p => p.id === id);
}

export function formatCurrency(value: number | null): string {
  if (value === null) return "—";
  return new Intl.NumberFormat("en-US", {
    style: "currency",
    currency: "USD",
    minimumFractionDigits: 0,
    maximumFractionDigits: 0,
  }).format(value);
}
"#;

/// Renders the complete module.
pub fn render(records: &[ProjectRecord], options: &TypeScriptOptions) -> Result<String, ProjectSheetError> {
    let mut sorted: Vec<&ProjectRecord> = records.iter().collect();
    let ordering = match options.order {
        Order::LatestFirst => {
            sorted.sort_by(|a, b| b.row.cmp(&a.row));
            "Sorted by row number descending (latest projects first)"
        }
        Order::Sheet => {
            sorted.sort_by_key(|record| record.row);
            "Listed in sheet order"
        }
    };

    let mut out = String::new();
    out.push_str("import { Project, KPIData } from \"./types\";\n\n");
    out.push_str(&format!("// Data extracted from {} - {} projects\n", options.source_name, records.len()));
    out.push_str(&format!("// {ordering}\n"));
    out.push_str("export const projects: Project[] = [\n");
    for record in sorted {
        render_record(&mut out, record, options)?;
    }
    out.push_str("];\n\n");
    out.push_str(HELPERS);
    Ok(out)
}

/// Renders and writes the module.
pub fn write<P: AsRef<Path>>(path: P, records: &[ProjectRecord], options: &TypeScriptOptions) -> Result<(), ProjectSheetError> {
    let path = path.as_ref();
    let content = render(records, options)?;
    let mut writer = create_output(path)?;
    writer.write_all(content.as_bytes())?;
    writer.flush()?;
    info!("Generated '{}' with {} projects", path.display(), records.len());
    Ok(())
}

fn render_record(out: &mut String, record: &ProjectRecord, options: &TypeScriptOptions) -> Result<(), ProjectSheetError> {
    let comments = record.comments.as_deref().map(|text| truncate(text, options.comment_limit));
    let fields: [(&str, String); 37] = [
        ("id", record.row.to_string()),
        ("projectName", serde_json::to_string(&record.name)?),
        ("location", string(&record.location)?),
        ("projectAddress", string(&record.address)?),
        ("projectLabel", string(&record.label)?),
        ("quoteSent", record.quote_sent.to_string()),
        ("reachedOut", record.reached_out.to_string()),
        ("totalCOGs", amount(record.total_cogs)),
        ("customer", string(&record.customer)?),
        ("phone", string(&record.phone)?),
        ("email", string(&record.email)?),
        ("buildSize", string(&record.build_size)?),
        ("receivedProjectDetails", string(&record.received_details)?),
        ("zipCode", string(&record.zip_code)?),
        ("projectType", string(&record.project_type)?),
        ("projectSQFT", amount(record.project_sqft)),
        ("receivedQuoteDrawings", string(&record.received_quote)?),
        ("erectingLabor", amount(record.erecting_labor)),
        ("concreteLabor", amount(record.concrete_labor)),
        ("ourQuoteMaterialOnly", amount(record.our_quote_material)),
        ("salesTaxPercent", amount(record.sales_tax)),
        ("ourQuoteWithTax", amount(record.our_quote_with_tax)),
        ("deliveredCustomerQuote", string(&record.delivered_quote)?),
        ("quoteAcceptedDeclined", string(&record.quote_accepted)?),
        ("depositPaid", string(&record.deposit_paid)?),
        ("engineeredDrawingsStatus", string(&record.drawings_status)?),
        ("estimatedMetalDeliveryDate", string(&record.est_metal_date)?),
        ("doorOrderSubmittedDate", string(&record.door_order_date)?),
        ("estimatedDoorDeliveryDate", string(&record.est_door_date)?),
        ("metalProduction", string(&record.metal_production)?),
        ("metalDelivery", string(&record.metal_delivery)?),
        ("doorDelivery", string(&record.door_delivery)?),
        ("finalACHPayment", string(&record.final_ach)?),
        ("contractorStartDate", string(&record.contractor_date)?),
        ("jobStatus", string(&record.job_status)?),
        ("comments", string(&comments)?),
        ("colorStatus", serde_json::to_string(&display_status(record))?),
    ];

    out.push_str("  {\n");
    for (name, value) in fields {
        out.push_str(&format!("    {name}: {value},\n"));
    }
    out.push_str("  },\n");
    Ok(())
}

/// JSON string literal or `null`.
fn string(value: &Option<String>) -> Result<String, ProjectSheetError> {
    Ok(serde_json::to_string(value)?)
}

/// Number literal; zero and absent amounts are both `null`.
fn amount(value: Option<f64>) -> String {
    match value {
        Some(number) if number != 0.0 && number.is_finite() => format_number(number),
        _ => "null".to_owned(),
    }
}
