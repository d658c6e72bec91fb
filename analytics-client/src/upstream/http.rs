use reqwest::{multipart, Client, Response};
use serde_json::Value;

use super::{AnalyticsUpstream, UpstreamError};
use crate::domain::BudgetCategory;

/// `reqwest`-backed client for the analytics service.
///
/// No request timeout is configured: a request that never resolves leaves the
/// caller waiting, and the caller decides what that means for its view.
#[derive(Clone)]
pub struct HttpUpstream {
    base_url: String,
    client: Client,
}

impl HttpUpstream {
    pub fn new(base_url: impl Into<String>) -> Result<Self, UpstreamError> {
        let client = Client::builder()
            .build()
            .map_err(|e| UpstreamError::Connection(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            client,
        })
    }

    fn url(&self, endpoint: &str) -> String {
        format!("{}/{}", self.base_url, endpoint)
    }

    async fn get_json(&self, endpoint: &str, query: &[(&str, String)]) -> Result<Value, UpstreamError> {
        let url = self.url(endpoint);
        tracing::debug!(%url, "fetching from analytics service");

        let response = self
            .client
            .get(&url)
            .query(query)
            .send()
            .await
            .map_err(|e| UpstreamError::Connection(e.to_string()))?;

        read_json(response).await
    }
}

async fn read_json(response: Response) -> Result<Value, UpstreamError> {
    let status = response.status();
    if !status.is_success() {
        // Error bodies are best-effort: FastAPI-style `{"detail": ...}` when present.
        let detail = response
            .json::<Value>()
            .await
            .ok()
            .and_then(|body| body.get("detail").and_then(Value::as_str).map(str::to_string));
        return Err(UpstreamError::Status {
            status: status.as_u16(),
            detail,
        });
    }

    response
        .json::<Value>()
        .await
        .map_err(|e| UpstreamError::Decode(e.to_string()))
}

fn planner_query(budget: u32, category: BudgetCategory) -> [(&'static str, String); 2] {
    [
        ("budget", budget.to_string()),
        ("category", category.as_query().to_string()),
    ]
}

#[async_trait::async_trait]
impl AnalyticsUpstream for HttpUpstream {
    async fn upload(&self, file_name: &str, body: Vec<u8>) -> Result<Value, UpstreamError> {
        let part = multipart::Part::bytes(body)
            .file_name(file_name.to_string())
            .mime_str("text/csv")
            .map_err(|e| UpstreamError::Connection(format!("invalid upload part: {e}")))?;
        let form = multipart::Form::new().part("file", part);

        let response = self
            .client
            .post(self.url("upload"))
            .multipart(form)
            .send()
            .await
            .map_err(|e| UpstreamError::Connection(e.to_string()))?;

        read_json(response).await
    }

    async fn forecast(&self) -> Result<Value, UpstreamError> {
        self.get_json("forecast", &[]).await
    }

    async fn report(&self) -> Result<Value, UpstreamError> {
        self.get_json("report", &[]).await
    }

    async fn schedule(&self, budget: u32, category: BudgetCategory) -> Result<Value, UpstreamError> {
        self.get_json("planner", &planner_query(budget, category)).await
    }

    async fn budget_plan(&self, budget: u32, category: BudgetCategory) -> Result<Value, UpstreamError> {
        self.get_json("budget-planner", &planner_query(budget, category)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::{
        matchers::{method, path, query_param},
        Mock, MockServer, ResponseTemplate,
    };

    #[tokio::test]
    async fn budget_plan_sends_selection_as_query() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/budget-planner"))
            .and(query_param("budget", "750"))
            .and(query_param("category", "HVAC_lights"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"total_cost": 12.5})))
            .mount(&server)
            .await;

        let upstream = HttpUpstream::new(server.uri()).unwrap();
        let body = upstream
            .budget_plan(750, BudgetCategory::HvacLights)
            .await
            .unwrap();

        assert_eq!(body, json!({"total_cost": 12.5}));
    }

    #[tokio::test]
    async fn non_success_status_carries_detail() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/upload"))
            .respond_with(ResponseTemplate::new(422).set_body_json(json!({"detail": "missing datetime column"})))
            .mount(&server)
            .await;

        let upstream = HttpUpstream::new(format!("{}/", server.uri())).unwrap();
        let err = upstream
            .upload("meter.csv", b"a,b\n1,2\n".to_vec())
            .await
            .unwrap_err();

        assert!(matches!(err, UpstreamError::Status { status: 422, .. }));
        assert_eq!(err.detail(), Some("missing datetime column"));
    }

    #[tokio::test]
    async fn non_json_success_body_is_a_decode_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/forecast"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>"))
            .mount(&server)
            .await;

        let upstream = HttpUpstream::new(server.uri()).unwrap();
        let err = upstream.forecast().await.unwrap_err();

        assert!(matches!(err, UpstreamError::Decode(_)));
    }

    #[tokio::test]
    async fn unreachable_service_is_a_connection_error() {
        let upstream = HttpUpstream::new("http://127.0.0.1:1").unwrap();
        let err = upstream.report().await.unwrap_err();

        assert!(matches!(err, UpstreamError::Connection(_)));
        assert_eq!(err.detail(), None);
    }
}
