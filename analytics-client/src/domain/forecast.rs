#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct ForecastPoint {
    pub time_label: String,
    pub predicted_kwh: f64,
    pub anomaly: bool,
}
