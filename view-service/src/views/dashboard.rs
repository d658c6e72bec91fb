use analytics_client::domain::Dataset;
use serde::Serialize;

use super::{resolve_dataset, DisplayState, ViewState};
use crate::{aggregate::round_to, config::DisplayConfig, timestamps};

/// Tariff used when the upstream summary carries no bill.
const FALLBACK_TARIFF_PER_KWH: f64 = 8.0;
const CO2_KG_PER_KWH: f64 = 0.92;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartPoint {
    pub label: String,
    pub total_kwh: f64,
    pub datetime: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardSummary {
    pub total_kwh: f64,
    pub estimated_bill: f64,
    pub co2_kg: f64,
    pub reading_hours: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardModel {
    pub chart: Vec<ChartPoint>,
    pub summary: DashboardSummary,
    pub recommendations: Vec<String>,
    pub currency: &'static str,
}

pub fn dashboard_view(dataset: Option<&Dataset>, display: &DisplayConfig) -> ViewState<DashboardModel> {
    let dataset = match (resolve_dataset(dataset), dataset) {
        (DisplayState::Populated, Some(dataset)) => dataset,
        (state, _) => return ViewState::bare(state).unwrap_or(ViewState::NoData),
    };

    let chart = dataset
        .readings
        .iter()
        .enumerate()
        .map(|(i, r)| ChartPoint {
            label: timestamps::clock_label(&r.datetime).unwrap_or_else(|| format!("H{}", i + 1)),
            total_kwh: r.total_kwh,
            datetime: r.datetime.clone(),
        })
        .collect();

    let total_kwh = dataset.summary.total_kwh;
    // a zero bill is treated as missing
    let estimated_bill = dataset
        .summary
        .estimated_bill
        .filter(|bill| *bill != 0.0)
        .unwrap_or(total_kwh * FALLBACK_TARIFF_PER_KWH);

    ViewState::Populated(DashboardModel {
        chart,
        summary: DashboardSummary {
            total_kwh: round_to(total_kwh, 2),
            estimated_bill: round_to(estimated_bill, 2),
            co2_kg: round_to(total_kwh * CO2_KG_PER_KWH, 2),
            reading_hours: dataset.readings.len(),
        },
        recommendations: dataset.recommendations.clone(),
        currency: display.currency.symbol(),
    })
}
