use analytics_client::domain::Dataset;
use serde::Serialize;

use super::{resolve_dataset, DisplayState, ViewState};
use crate::{
    aggregate::{aggregate_categories, compute_efficiency, extract_anomalies, is_hvac_heavy, CategoryBreakdown, CategorySlice},
    timestamps,
};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnomalyAlert {
    pub datetime: String,
    /// `HH:MM`, or the raw timestamp when it cannot be read.
    pub time: String,
    pub total_kwh: f64,
    pub hvac_heavy: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalysisModel {
    pub breakdown: CategoryBreakdown,
    pub slices: Vec<CategorySlice>,
    pub anomalies: Vec<AnomalyAlert>,
    pub recommendations: Vec<String>,
    pub efficiency_score: u8,
    pub vampire_load_kwh: String,
}

pub fn analysis_view(dataset: Option<&Dataset>) -> ViewState<AnalysisModel> {
    let dataset = match (resolve_dataset(dataset), dataset) {
        (DisplayState::Populated, Some(dataset)) => dataset,
        (state, _) => return ViewState::bare(state).unwrap_or(ViewState::NoData),
    };

    let breakdown = aggregate_categories(&dataset.readings);
    let efficiency = compute_efficiency(Some(dataset));
    let anomalies = extract_anomalies(&dataset.readings)
        .into_iter()
        .map(|r| AnomalyAlert {
            datetime: r.datetime.clone(),
            time: timestamps::clock_label(&r.datetime).unwrap_or_else(|| r.datetime.clone()),
            total_kwh: r.total_kwh,
            hvac_heavy: is_hvac_heavy(r),
        })
        .collect();

    ViewState::Populated(AnalysisModel {
        slices: breakdown.slices(),
        breakdown,
        anomalies,
        recommendations: dataset.recommendations.clone(),
        efficiency_score: efficiency.score,
        vampire_load_kwh: efficiency.vampire_load_display(),
    })
}
