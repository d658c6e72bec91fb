use analytics_client::domain::ForecastPoint;
use serde::Serialize;

use super::{resolve_fetched, DisplayState, ViewState};
use crate::{aggregate::round_to, config::DisplayConfig};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ForecastModel {
    pub points: Vec<ForecastPoint>,
    pub total_kwh: String,
    pub hours: usize,
    pub anomaly_count: usize,
    /// Total usage is above the configured alert threshold.
    pub exceeds_alert: bool,
}

pub fn forecast_view(
    points: Option<&[ForecastPoint]>,
    in_flight: bool,
    display: &DisplayConfig,
) -> ViewState<ForecastModel> {
    let points = match (resolve_fetched(points, in_flight), points) {
        (DisplayState::Populated, Some(points)) => points,
        (state, _) => return ViewState::bare(state).unwrap_or(ViewState::NoData),
    };

    let total = points.iter().fold(0.0, |acc, p| acc + p.predicted_kwh);

    ViewState::Populated(ForecastModel {
        points: points.to_vec(),
        total_kwh: format!("{:.1}", round_to(total, 1)),
        hours: points.len(),
        anomaly_count: points.iter().filter(|p| p.anomaly).count(),
        exceeds_alert: total > display.usage_alert_kwh,
    })
}
