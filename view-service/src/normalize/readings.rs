use analytics_client::domain::{Dataset, DatasetSummary, HourlyReading};
use serde_json::{Map, Value};

use super::{coerce_bool, coerce_f64, coerce_string, first_present, number_or_zero, record_unrecognized};
use crate::pipeline::Normalize;

/// Where the hourly rows of a dataset document live.
///
/// `chart` is an older upstream key for the same rows and is only consulted
/// when `sample` is not an array.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DatasetShape<'a> {
    Absent,
    Sample(&'a [Value]),
    Chart(&'a [Value]),
    Unrecognized,
}

pub fn detect_dataset_shape(raw: Option<&Value>) -> DatasetShape<'_> {
    match raw {
        None | Some(Value::Null) => DatasetShape::Absent,
        Some(Value::Object(doc)) => match (doc.get("sample"), doc.get("chart")) {
            (Some(Value::Array(rows)), _) => DatasetShape::Sample(rows),
            (_, Some(Value::Array(rows))) => DatasetShape::Chart(rows),
            _ => DatasetShape::Unrecognized,
        },
        Some(_) => DatasetShape::Unrecognized,
    }
}

/// Canonical hourly readings in upstream order.
pub fn normalize_readings(raw: Option<&Value>) -> Vec<HourlyReading> {
    match detect_dataset_shape(raw) {
        DatasetShape::Sample(rows) | DatasetShape::Chart(rows) => rows.iter().map(normalize_reading).collect(),
        DatasetShape::Absent | DatasetShape::Unrecognized => Vec::new(),
    }
}

fn normalize_reading(row: &Value) -> HourlyReading {
    let empty = Map::new();
    let row = row.as_object().unwrap_or(&empty);
    let kwh = |keys: &[&str]| number_or_zero(row, keys).max(0.0);

    HourlyReading {
        datetime: row.get("datetime").and_then(coerce_string).unwrap_or_default(),
        kitchen_kwh: kwh(&["kitchen_kwh"]),
        laundry_kwh: kwh(&["laundry_kwh"]),
        hvac_lights_kwh: kwh(&["hvac_lights_kwh", "HVAC_lights_kwh"]),
        other_kwh: kwh(&["other_kwh"]),
        total_kwh: kwh(&["total_kwh"]),
        anomaly: row.get("anomaly").and_then(coerce_bool).unwrap_or(false),
    }
}

/// Full dataset document: readings plus summary and recommendations.
pub fn normalize_dataset(raw: Option<&Value>) -> Dataset {
    with_readings(raw, normalize_readings(raw))
}

fn with_readings(raw: Option<&Value>, readings: Vec<HourlyReading>) -> Dataset {
    let doc = raw.and_then(Value::as_object);

    let summary = doc
        .and_then(|d| d.get("summary"))
        .and_then(Value::as_object)
        .map(|s| DatasetSummary {
            total_kwh: number_or_zero(s, &["total_kwh"]),
            estimated_bill: first_present(s, &["estimated_bill"]).and_then(coerce_f64),
        })
        .unwrap_or_default();

    let recommendations = doc
        .and_then(|d| d.get("recommendations"))
        .and_then(Value::as_array)
        .map(|items| items.iter().filter_map(coerce_string).collect())
        .unwrap_or_default();

    Dataset {
        readings,
        summary,
        recommendations,
    }
}

#[derive(Clone, Default)]
pub struct ReadingNormalizer;

impl Normalize<Vec<HourlyReading>> for ReadingNormalizer {
    fn normalize(&self, raw: Option<&Value>) -> Vec<HourlyReading> {
        if detect_dataset_shape(raw) == DatasetShape::Unrecognized {
            record_unrecognized("readings");
        }
        normalize_readings(raw)
    }
}

#[derive(Clone, Default)]
pub struct DatasetNormalizer;

/// Readings go through [`ReadingNormalizer`], so shape misses are counted
/// under `payload="readings"`.
impl Normalize<Dataset> for DatasetNormalizer {
    fn normalize(&self, raw: Option<&Value>) -> Dataset {
        with_readings(raw, ReadingNormalizer.normalize(raw))
    }
}
