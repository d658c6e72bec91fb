use analytics_client::domain::ForecastPoint;
use serde_json::{Map, Value};

use super::{coerce_bool, coerce_f64, coerce_string, first_present, number_or_zero, record_unrecognized};
use crate::{pipeline::Normalize, timestamps};

/// The three forecast encodings the upstream is known to send.
///
/// There is no shape tag on the wire; detection is purely structural and the
/// variants are tried in declaration order.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ForecastShape<'a> {
    Absent,
    /// `[{"datetime": .., "predicted_kwh": .., "anomaly": ..}, ..]`
    Points(&'a [Value]),
    /// `{"predicted_kwh": {"0": .., "1": ..}, "anomaly": {"0": .., ..}}`
    Columnar {
        predicted: &'a Value,
        anomaly: Option<&'a Value>,
    },
    Unrecognized,
}

pub fn detect_forecast_shape(raw: Option<&Value>) -> ForecastShape<'_> {
    match raw {
        None | Some(Value::Null) => ForecastShape::Absent,
        Some(Value::Array(points)) => ForecastShape::Points(points),
        Some(Value::Object(doc)) => match doc.get("predicted_kwh") {
            Some(predicted @ (Value::Object(_) | Value::Array(_))) => ForecastShape::Columnar {
                predicted,
                anomaly: doc.get("anomaly").filter(|a| a.is_object() || a.is_array()),
            },
            _ => ForecastShape::Unrecognized,
        },
        Some(_) => ForecastShape::Unrecognized,
    }
}

pub fn normalize_forecast(raw: Option<&Value>) -> Vec<ForecastPoint> {
    match detect_forecast_shape(raw) {
        ForecastShape::Points(points) => points.iter().enumerate().map(|(i, p)| point(i, p)).collect(),
        ForecastShape::Columnar { predicted, anomaly } => columnar(predicted, anomaly),
        ForecastShape::Absent | ForecastShape::Unrecognized => Vec::new(),
    }
}

fn hour_label(index: usize) -> String {
    format!("Hour {}", index + 1)
}

fn point(index: usize, raw: &Value) -> ForecastPoint {
    let empty = Map::new();
    let item = raw.as_object().unwrap_or(&empty);

    let time_label = first_present(item, &["datetime"])
        .and_then(coerce_string)
        .and_then(|dt| timestamps::day_hour_label(&dt))
        .unwrap_or_else(|| hour_label(index));

    ForecastPoint {
        time_label,
        predicted_kwh: number_or_zero(item, &["predicted_kwh", "kwh", "usage"]).max(0.0),
        anomaly: first_present(item, &["anomaly"]).and_then(coerce_bool).unwrap_or(false),
    }
}

fn columnar(predicted: &Value, anomaly: Option<&Value>) -> Vec<ForecastPoint> {
    ordered_entries(predicted)
        .into_iter()
        .enumerate()
        .map(|(i, (key, value))| ForecastPoint {
            time_label: hour_label(i),
            predicted_kwh: coerce_f64(value).unwrap_or(0.0).max(0.0),
            anomaly: anomaly
                .and_then(|series| series_get(series, &key))
                .and_then(coerce_bool)
                .unwrap_or(false),
        })
        .collect()
}

/// Canonical array-index keys (`"0"`, `"17"`, not `"07"`).
fn array_index(key: &str) -> Option<u32> {
    key.parse::<u32>().ok().filter(|n| n.to_string() == key)
}

/// Entries in natural key order: array-index keys ascending, then the
/// remaining keys in document order.
fn ordered_entries(series: &Value) -> Vec<(String, &Value)> {
    match series {
        Value::Array(items) => items.iter().enumerate().map(|(i, v)| (i.to_string(), v)).collect(),
        Value::Object(map) => {
            let (mut indexed, named): (Vec<_>, Vec<_>) = map.iter().partition(|(k, _)| array_index(k).is_some());
            indexed.sort_by_key(|(k, _)| array_index(k));
            indexed
                .into_iter()
                .chain(named)
                .map(|(k, v)| (k.clone(), v))
                .collect()
        }
        _ => Vec::new(),
    }
}

fn series_get<'a>(series: &'a Value, key: &str) -> Option<&'a Value> {
    match series {
        Value::Object(map) => map.get(key),
        Value::Array(items) => key.parse::<usize>().ok().and_then(|i| items.get(i)),
        _ => None,
    }
}

#[derive(Clone, Default)]
pub struct ForecastNormalizer;

impl Normalize<Vec<ForecastPoint>> for ForecastNormalizer {
    fn normalize(&self, raw: Option<&Value>) -> Vec<ForecastPoint> {
        if detect_forecast_shape(raw) == ForecastShape::Unrecognized {
            record_unrecognized("forecast");
        }
        normalize_forecast(raw)
    }
}
