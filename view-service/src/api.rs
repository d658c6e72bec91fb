use std::sync::Arc;

use analytics_client::domain::BudgetCategory;
use axum::{
    body::Bytes,
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post, put},
    Json, Router,
};
use serde::{Deserialize, Serialize};

use crate::{
    controller::{Controller, UploadOutcome},
    pipeline::Generation,
    planner::{ParamsError, PlannerParams},
    views::{AnalysisModel, DashboardModel, ForecastModel, PlannerModel, ReportModel, ViewState},
};

#[derive(thiserror::Error, Debug)]
pub enum ApiError {
    #[error("invalid planner selection: {0}")]
    InvalidSelection(#[from] ParamsError),
    #[error("upload body is empty")]
    EmptyUpload,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = Json(serde_json::json!({ "error": self.to_string() }));
        (StatusCode::BAD_REQUEST, body).into_response()
    }
}

pub fn router(controller: Arc<Controller>) -> Router {
    Router::new()
        .route("/views/dashboard", get(dashboard))
        .route("/views/analysis", get(analysis))
        .route("/views/forecast", get(forecast))
        .route("/views/planner", get(planner))
        .route("/views/report", get(report))
        .route("/planner/selection", put(select_planner))
        .route("/upload", post(upload))
        .with_state(controller)
}

async fn dashboard(State(ctl): State<Arc<Controller>>) -> Json<ViewState<DashboardModel>> {
    Json(ctl.dashboard().await)
}

async fn analysis(State(ctl): State<Arc<Controller>>) -> Json<ViewState<AnalysisModel>> {
    Json(ctl.analysis().await)
}

async fn forecast(State(ctl): State<Arc<Controller>>) -> Json<ViewState<ForecastModel>> {
    Json(ctl.forecast().await)
}

async fn planner(State(ctl): State<Arc<Controller>>) -> Json<ViewState<PlannerModel>> {
    Json(ctl.planner().await)
}

async fn report(State(ctl): State<Arc<Controller>>) -> Json<ViewState<ReportModel>> {
    Json(ctl.report().await)
}

#[derive(Deserialize)]
struct Selection {
    budget: u32,
    #[serde(default)]
    category: BudgetCategory,
}

#[derive(Serialize)]
struct SelectionAccepted {
    generation: Generation,
    budget: u32,
    category: BudgetCategory,
}

/// Start a planner fetch for the new selection and return immediately; the
/// result shows up on `/views/planner`.
async fn select_planner(
    State(ctl): State<Arc<Controller>>,
    Json(selection): Json<Selection>,
) -> Result<(StatusCode, Json<SelectionAccepted>), ApiError> {
    let params = PlannerParams::new(selection.budget, selection.category)?;
    let ticket = ctl.select_planner(params).await;

    tokio::spawn({
        let ctl = ctl.clone();
        async move {
            ctl.complete_planner(ticket).await;
        }
    });

    Ok((
        StatusCode::ACCEPTED,
        Json(SelectionAccepted {
            generation: ticket.generation,
            budget: params.budget,
            category: params.category,
        }),
    ))
}

#[derive(Deserialize)]
struct UploadQuery {
    #[serde(default = "default_file_name")]
    file_name: String,
}

fn default_file_name() -> String {
    "upload.csv".to_string()
}

/// Raw CSV body; the file name travels in the query string.
async fn upload(
    State(ctl): State<Arc<Controller>>,
    Query(query): Query<UploadQuery>,
    body: Bytes,
) -> Result<(StatusCode, Json<UploadOutcome>), ApiError> {
    if body.is_empty() {
        return Err(ApiError::EmptyUpload);
    }

    let outcome = ctl.upload(&query.file_name, body.to_vec()).await;
    let status = match outcome {
        UploadOutcome::Completed { .. } => StatusCode::OK,
        UploadOutcome::Failed { .. } => StatusCode::BAD_GATEWAY,
        UploadOutcome::Superseded => StatusCode::CONFLICT,
    };
    Ok((status, Json(outcome)))
}
