use analytics_client::domain::ReportRow;

use super::round_to;

/// Share of the estimated cost presented as achievable savings.
pub const SAVINGS_RATE: f64 = 0.15;

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ReportSummary {
    /// One decimal.
    pub total_predicted_kwh: f64,
    /// Whole currency units.
    pub total_cost: f64,
    /// Two decimals, derived from the rounded `total_cost`.
    pub potential_savings: f64,
    pub included_rows: usize,
}

impl ReportSummary {
    pub fn total_predicted_kwh_display(&self) -> String {
        if self.included_rows == 0 {
            return "0".to_string();
        }
        format!("{:.1}", self.total_predicted_kwh)
    }

    pub fn total_cost_display(&self) -> String {
        format!("{:.0}", self.total_cost)
    }

    pub fn potential_savings_display(&self) -> String {
        format!("{:.2}", self.potential_savings)
    }
}

pub fn aggregate_report(rows: &[ReportRow]) -> ReportSummary {
    let (kwh, cost, included_rows) = rows
        .iter()
        .filter_map(|row| Some((row.predicted_next_day_kwh.filter(|v| v.is_finite())?, row.cost.unwrap_or(0.0))))
        .fold((0.0, 0.0, 0usize), |(kwh, cost, n), (k, c)| (kwh + k, cost + c, n + 1));

    let total_cost = round_to(cost, 0);
    ReportSummary {
        total_predicted_kwh: round_to(kwh, 1),
        total_cost,
        potential_savings: round_to(total_cost * SAVINGS_RATE, 2),
        included_rows,
    }
}
