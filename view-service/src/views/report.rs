use analytics_client::domain::ReportRow;
use serde::Serialize;

use super::{resolve_report, DisplayState, ViewState};
use crate::{aggregate::aggregate_report, config::DisplayConfig};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportModel {
    pub rows: Vec<ReportRow>,
    pub total_predicted_kwh: String,
    pub total_cost: String,
    pub potential_savings: String,
    pub currency: &'static str,
}

pub fn report_view(rows: Option<&[ReportRow]>, display: &DisplayConfig) -> ViewState<ReportModel> {
    let rows = match (resolve_report(rows), rows) {
        (DisplayState::Populated, Some(rows)) => rows,
        (state, _) => return ViewState::bare(state).unwrap_or(ViewState::NoData),
    };

    let summary = aggregate_report(rows);
    ViewState::Populated(ReportModel {
        rows: rows.iter().filter(|r| r.is_valid()).cloned().collect(),
        total_predicted_kwh: summary.total_predicted_kwh_display(),
        total_cost: summary.total_cost_display(),
        potential_savings: summary.potential_savings_display(),
        currency: display.currency.symbol(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::normalize::normalize_report;
    use serde_json::json;

    #[test]
    fn only_valid_rows_are_listed_and_summed() {
        let rows = normalize_report(Some(&json!([
            {"appliance": "Kitchen", "predicted_next_day_kwh": 2.5, "cost": 10.4},
            {"appliance": "HVAC", "predicted_next_day_kwh": 4.0, "cost": 20.3},
            {"appliance": "Broken", "predicted_next_day_kwh": null, "cost": 999}
        ])))
        .unwrap();

        let ViewState::Populated(model) = report_view(Some(&rows), &DisplayConfig::default()) else {
            panic!("expected populated report");
        };

        assert_eq!(model.rows.len(), 2);
        assert_eq!(model.total_predicted_kwh, "6.5");
        assert_eq!(model.total_cost, "31");
        assert_eq!(model.potential_savings, "4.65");
    }

    #[test]
    fn report_without_valid_rows_is_empty() {
        let rows = vec![ReportRow::default()];
        let display = DisplayConfig::default();

        assert_eq!(report_view(Some(&rows), &display), ViewState::Empty);
        assert_eq!(report_view(None, &display), ViewState::NoData);
    }
}
