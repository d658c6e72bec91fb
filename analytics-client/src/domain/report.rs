/// Per-appliance prediction row from the upstream report.
///
/// `predicted_next_day_kwh` is `None` when the upstream value was missing or
/// not a finite number; such rows are kept but never aggregated.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct ReportRow {
    pub appliance: String,
    pub predicted_next_day_kwh: Option<f64>,
    pub predicted_co2_kg: Option<f64>,
    pub usage_cluster: Option<String>,
    pub eco_score: Option<f64>,
    pub cost: Option<f64>,
    pub recommendation: Option<String>,
}

impl ReportRow {
    pub fn is_valid(&self) -> bool {
        self.predicted_next_day_kwh.is_some_and(f64::is_finite)
    }
}
