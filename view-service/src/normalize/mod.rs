//! Boundary normalizers: raw upstream JSON in, canonical domain values out.
//!
//! Each payload kind has a structural shape detector, a pure `normalize_*`
//! function and a unit-struct [`Normalize`](crate::pipeline::Normalize)
//! implementation that adds metrics around the pure function.

pub mod budget;
pub mod forecast;
pub mod readings;
pub mod report;

use serde_json::{Map, Value};

pub use budget::{normalize_budget_plan, normalize_schedule, BudgetPlanNormalizer, ScheduleNormalizer};
pub use forecast::{detect_forecast_shape, normalize_forecast, ForecastNormalizer, ForecastShape};
pub use readings::{
    detect_dataset_shape, normalize_dataset, normalize_readings, DatasetNormalizer, DatasetShape, ReadingNormalizer,
};
pub use report::{normalize_report, ReportNormalizer};

/// Finite number from a JSON number or numeric string.
pub fn coerce_f64(value: &Value) -> Option<f64> {
    let parsed = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    parsed.filter(|v| v.is_finite())
}

pub fn coerce_bool(value: &Value) -> Option<bool> {
    match value {
        Value::Bool(b) => Some(*b),
        Value::Number(n) => n.as_f64().map(|v| v != 0.0),
        Value::String(s) => match s.trim().to_ascii_lowercase().as_str() {
            "true" | "1" | "yes" => Some(true),
            "false" | "0" | "no" | "" => Some(false),
            _ => None,
        },
        _ => None,
    }
}

pub fn coerce_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// First key among `keys` whose value is present and not `null`.
pub(crate) fn first_present<'a>(obj: &'a Map<String, Value>, keys: &[&str]) -> Option<&'a Value> {
    keys.iter()
        .filter_map(|key| obj.get(*key))
        .find(|v| !v.is_null())
}

/// Coerced number from the first present key, `0.0` otherwise.
pub(crate) fn number_or_zero(obj: &Map<String, Value>, keys: &[&str]) -> f64 {
    first_present(obj, keys).and_then(coerce_f64).unwrap_or(0.0)
}

pub(crate) fn record_unrecognized(payload: &'static str) {
    metrics::counter!("payload_unrecognized_shape_total", "payload" => payload).increment(1);
    tracing::warn!(payload, "upstream payload did not match any known shape");
}
