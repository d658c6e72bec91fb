//! Application state and the fetch flows that feed it.
//!
//! The controller is the only writer of the application state. Fetches run without the
//! lock held; their results are stamped with the generation current when they
//! were issued and applied afterwards, so a slow response can never overwrite
//! the outcome of a newer request.

use std::{future::Future, sync::Arc};

use analytics_client::{
    domain::{Dataset, ForecastPoint, ReportRow},
    AnalyticsUpstream, UpstreamError,
};
use serde::Serialize;
use serde_json::Value;
use tokio::sync::RwLock;

use crate::{
    config::DisplayConfig,
    normalize::{DatasetNormalizer, ForecastNormalizer, ReportNormalizer},
    pipeline::{ApplyOutcome, Envelope, Generation, Normalize},
    planner::{PlannerAggregator, PlannerData, PlannerParams, PlannerTicket},
    views::{self, AnalysisModel, DashboardModel, ForecastModel, PlannerModel, ReportModel, ViewState},
};

const CONNECTION_ERROR_MESSAGE: &str = "Connection error: is the analytics service running?";
const UPLOAD_COMPLETE_MESSAGE: &str = "Analysis complete. Forecast and report updated.";

#[derive(Debug, Default)]
struct AppState {
    dataset: Option<Dataset>,
    forecast: Option<Vec<ForecastPoint>>,
    report: Option<Vec<ReportRow>>,
    planner: PlannerAggregator,
    upload_latest: Generation,
    upload_in_flight: bool,
}

/// Everything one successful upload replaces.
struct UploadResult {
    dataset: Dataset,
    forecast: Vec<ForecastPoint>,
    report: Option<Vec<ReportRow>>,
}

/// The step of the upload flow that failed.
#[derive(thiserror::Error, Debug)]
enum UploadFailure {
    #[error("upload rejected: {0}")]
    Upload(UpstreamError),
    /// The file was analysed but forecast or report could not be fetched.
    #[error("forecast/report fetch failed: {0}")]
    Followup(UpstreamError),
}

impl UploadFailure {
    fn message(&self) -> String {
        match self {
            Self::Upload(e @ UpstreamError::Status { .. }) => {
                format!("Upload failed: {}", e.detail().unwrap_or("Invalid File"))
            }
            Self::Upload(_) => CONNECTION_ERROR_MESSAGE.to_string(),
            Self::Followup(e) => format!("Analysis complete, but fetching forecast/report failed: {e}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum UploadOutcome {
    Completed { message: String },
    Failed { message: String },
    /// A newer upload was started before this one finished.
    Superseded,
}

pub struct Controller {
    upstream: Arc<dyn AnalyticsUpstream>,
    display: DisplayConfig,
    state: RwLock<AppState>,
}

impl Controller {
    pub fn new(upstream: Arc<dyn AnalyticsUpstream>, display: DisplayConfig) -> Self {
        Self {
            upstream,
            display,
            state: RwLock::new(AppState::default()),
        }
    }

    /// Send a file for analysis, then fetch forecast and report. Dataset,
    /// forecast and report are replaced together or not at all.
    pub async fn upload(&self, file_name: &str, body: Vec<u8>) -> UploadOutcome {
        let generation = {
            let mut state = self.state.write().await;
            state.upload_latest = state.upload_latest.next();
            state.upload_in_flight = true;
            state.upload_latest
        };
        tracing::info!(generation = generation.value(), file_name, bytes = body.len(), "upload started");

        let result = self.fetch_upload(file_name, body).await;
        self.apply_upload(Envelope::new(result, generation)).await
    }

    async fn fetch_upload(&self, file_name: &str, body: Vec<u8>) -> Result<UploadResult, UploadFailure> {
        let raw = observe("upload", self.upstream.upload(file_name, body))
            .await
            .map_err(UploadFailure::Upload)?;
        let followup = futures::try_join!(
            observe("forecast", self.upstream.forecast()),
            observe("report", self.upstream.report()),
        );
        let (forecast, report) = followup.map_err(UploadFailure::Followup)?;

        Ok(UploadResult {
            dataset: DatasetNormalizer.normalize(Some(&raw)),
            forecast: ForecastNormalizer.normalize(Some(&forecast)),
            report: ReportNormalizer.normalize(Some(&report)),
        })
    }

    async fn apply_upload(&self, env: Envelope<Result<UploadResult, UploadFailure>>) -> UploadOutcome {
        let mut state = self.state.write().await;
        if env.generation != state.upload_latest {
            metrics::counter!("upload_stale_responses_total").increment(1);
            tracing::debug!(
                generation = env.generation.value(),
                latest = state.upload_latest.value(),
                "discarding superseded upload"
            );
            return UploadOutcome::Superseded;
        }
        state.upload_in_flight = false;

        match env.payload {
            Ok(result) => {
                tracing::info!(
                    readings = result.dataset.readings.len(),
                    forecast_points = result.forecast.len(),
                    "upload applied"
                );
                state.dataset = Some(result.dataset);
                state.forecast = Some(result.forecast);
                state.report = result.report;
                UploadOutcome::Completed {
                    message: UPLOAD_COMPLETE_MESSAGE.to_string(),
                }
            }
            Err(e) => {
                tracing::error!(error = %e, "upload failed");
                UploadOutcome::Failed { message: e.message() }
            }
        }
    }

    /// Record a new planner selection. The caller completes the returned
    /// ticket with [`Controller::complete_planner`].
    pub async fn select_planner(&self, params: PlannerParams) -> PlannerTicket {
        self.state.write().await.planner.begin(params)
    }

    /// Fetch schedule and budget computation for `ticket` and apply them if
    /// the ticket is still the latest selection.
    pub async fn complete_planner(&self, ticket: PlannerTicket) -> ApplyOutcome {
        let PlannerParams { budget, category } = ticket.params;
        let (schedule, plan) = futures::join!(
            observe("planner", self.upstream.schedule(budget, category)),
            observe("budget_planner", self.upstream.budget_plan(budget, category)),
        );

        let payload = match (schedule, plan) {
            (Ok(schedule), Ok(plan)) => Ok(PlannerData::from_raw(&schedule, &plan)),
            (Err(e), _) | (_, Err(e)) => Err(e),
        };
        self.state
            .write()
            .await
            .planner
            .apply(Envelope::new(payload, ticket.generation))
    }

    pub async fn dashboard(&self) -> ViewState<DashboardModel> {
        let state = self.state.read().await;
        views::dashboard_view(state.dataset.as_ref(), &self.display)
    }

    pub async fn analysis(&self) -> ViewState<AnalysisModel> {
        let state = self.state.read().await;
        views::analysis_view(state.dataset.as_ref())
    }

    pub async fn forecast(&self) -> ViewState<ForecastModel> {
        let state = self.state.read().await;
        views::forecast_view(state.forecast.as_deref(), state.upload_in_flight, &self.display)
    }

    pub async fn planner(&self) -> ViewState<PlannerModel> {
        let state = self.state.read().await;
        views::planner_view(state.planner.state(), &self.display)
    }

    pub async fn report(&self) -> ViewState<ReportModel> {
        let state = self.state.read().await;
        views::report_view(state.report.as_deref(), &self.display)
    }
}

async fn observe<F>(endpoint: &'static str, call: F) -> Result<Value, UpstreamError>
where
    F: Future<Output = Result<Value, UpstreamError>>,
{
    metrics::counter!("upstream_requests_total", "endpoint" => endpoint).increment(1);
    let res = call.await;
    if let Err(e) = &res {
        metrics::counter!("upstream_failures_total", "endpoint" => endpoint).increment(1);
        tracing::warn!(error = %e, endpoint, "upstream request failed");
    }
    res
}
