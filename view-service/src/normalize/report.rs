use analytics_client::domain::ReportRow;
use serde_json::{Map, Value};

use super::{coerce_f64, coerce_string, first_present, record_unrecognized};
use crate::pipeline::Normalize;

/// Report rows in upstream order, or `None` when the document is not a list.
///
/// Rows with an unusable `predicted_next_day_kwh` are kept with `None` so the
/// raw report stays intact; aggregation filters them out.
pub fn normalize_report(raw: Option<&Value>) -> Option<Vec<ReportRow>> {
    let Some(Value::Array(rows)) = raw else {
        return None;
    };
    Some(rows.iter().map(normalize_row).collect())
}

fn normalize_row(raw: &Value) -> ReportRow {
    let empty = Map::new();
    let row = raw.as_object().unwrap_or(&empty);
    let number = |key: &str| first_present(row, &[key]).and_then(coerce_f64);
    let text = |key: &str| first_present(row, &[key]).and_then(coerce_string);

    ReportRow {
        appliance: text("appliance").unwrap_or_default(),
        predicted_next_day_kwh: number("predicted_next_day_kwh"),
        predicted_co2_kg: number("predicted_co2_kg"),
        usage_cluster: text("usage_cluster"),
        eco_score: number("eco_score"),
        cost: number("cost"),
        recommendation: text("recommendation"),
    }
}

#[derive(Clone, Default)]
pub struct ReportNormalizer;

impl Normalize<Option<Vec<ReportRow>>> for ReportNormalizer {
    fn normalize(&self, raw: Option<&Value>) -> Option<Vec<ReportRow>> {
        let rows = normalize_report(raw);
        match &rows {
            Some(rows) => {
                let rejected = rows.iter().filter(|r| !r.is_valid()).count();
                if rejected > 0 {
                    metrics::counter!("report_rows_rejected_total").increment(rejected as u64);
                    tracing::debug!(rejected, "report rows without a usable prediction");
                }
            }
            None if !matches!(raw, None | Some(Value::Null)) => record_unrecognized("report"),
            None => {}
        }
        rows
    }
}
