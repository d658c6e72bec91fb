//! Render-ready view-models and the rules deciding which display state each
//! screen is in.
//!
//! Resolvers only look at presence and shape; the per-screen builders run the
//! aggregations once a screen is known to be populated.

pub mod analysis;
pub mod dashboard;
pub mod forecast;
pub mod planner;
pub mod report;

use analytics_client::domain::{Dataset, ReportRow};
use serde::Serialize;

pub use analysis::{analysis_view, AnalysisModel};
pub use dashboard::{dashboard_view, DashboardModel};
pub use forecast::{forecast_view, ForecastModel};
pub use planner::{planner_view, PlannerModel};
pub use report::{report_view, ReportModel};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DisplayState {
    /// Nothing to show yet.
    NoData,
    Loading,
    /// Loaded, but nothing usable came back.
    Empty,
    Populated,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "state", content = "model", rename_all = "snake_case")]
pub enum ViewState<T> {
    NoData,
    Loading,
    Empty,
    Populated(T),
    Failed { message: String },
}

impl<T> ViewState<T> {
    /// Non-populated display states carry no model.
    fn bare(state: DisplayState) -> Option<Self> {
        match state {
            DisplayState::NoData => Some(Self::NoData),
            DisplayState::Loading => Some(Self::Loading),
            DisplayState::Empty => Some(Self::Empty),
            DisplayState::Populated => None,
        }
    }
}

/// Dashboard and analysis screens.
pub fn resolve_dataset(dataset: Option<&Dataset>) -> DisplayState {
    match dataset {
        Some(d) if !d.is_empty() => DisplayState::Populated,
        _ => DisplayState::NoData,
    }
}

/// Screens backed by a fetch that may still be outstanding.
pub fn resolve_fetched<T>(loaded: Option<&[T]>, in_flight: bool) -> DisplayState {
    if in_flight {
        return DisplayState::Loading;
    }
    match loaded {
        None => DisplayState::NoData,
        Some([]) => DisplayState::Empty,
        Some(_) => DisplayState::Populated,
    }
}

/// Report screen: absent input is `NoData`; a list without a single valid row
/// is `Empty`.
pub fn resolve_report(rows: Option<&[ReportRow]>) -> DisplayState {
    match rows {
        None => DisplayState::NoData,
        Some(rows) if rows.iter().any(ReportRow::is_valid) => DisplayState::Populated,
        Some(_) => DisplayState::Empty,
    }
}
