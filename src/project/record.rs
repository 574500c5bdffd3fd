use crate::project::color::ColorStatus;
use serde::Deserialize;
use serde::Serialize;
use serde::Serializer;

/// One project row. Every field is always present; absent values are `None`
/// and serialize as `null`.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ProjectRecord {
    /// 1-based sheet row, unique per record
    pub row: usize,
    pub name: String,
    pub location: Option<String>,
    pub address: Option<String>,
    pub label: Option<String>,
    pub quote_sent: bool,
    pub reached_out: bool,
    #[serde(serialize_with = "serialize_amount")]
    pub total_cogs: Option<f64>,
    pub customer: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub build_size: Option<String>,
    pub received_details: Option<String>,
    pub zip_code: Option<String>,
    pub project_type: Option<String>,
    #[serde(serialize_with = "serialize_amount")]
    pub project_sqft: Option<f64>,
    pub received_quote: Option<String>,
    #[serde(serialize_with = "serialize_amount")]
    pub erecting_labor: Option<f64>,
    #[serde(serialize_with = "serialize_amount")]
    pub concrete_labor: Option<f64>,
    #[serde(serialize_with = "serialize_amount")]
    pub our_quote_material: Option<f64>,
    #[serde(serialize_with = "serialize_amount")]
    pub sales_tax: Option<f64>,
    #[serde(serialize_with = "serialize_amount")]
    pub our_quote_with_tax: Option<f64>,
    pub delivered_quote: Option<String>,
    pub quote_accepted: Option<String>,
    pub deposit_paid: Option<String>,
    pub drawings_status: Option<String>,
    pub est_metal_date: Option<String>,
    pub door_order_date: Option<String>,
    pub est_door_date: Option<String>,
    pub metal_production: Option<String>,
    pub metal_delivery: Option<String>,
    pub door_delivery: Option<String>,
    pub final_ach: Option<String>,
    pub contractor_date: Option<String>,
    pub job_status: Option<String>,
    pub comments: Option<String>,
    /// Canonical RGB hex of the name cell fill
    pub color: Option<String>,
    pub color_status: Option<ColorStatus>,
}

/// Integral amounts are written as integers (`125000`, not `125000.0`).
pub(crate) fn serialize_amount<S: Serializer>(value: &Option<f64>, serializer: S) -> Result<S::Ok, S::Error> {
    match value {
        Some(number) if number.fract() == 0.0 && number.abs() < 9.007_199_254_740_992e15 => {
            serializer.serialize_i64(*number as i64)
        }
        Some(number) => serializer.serialize_f64(*number),
        None => serializer.serialize_none(),
    }
}
