//! HTTP client for the toxicity-analysis backend: job launch, single-comment
//! analysis, history listing, and health checks.
//!
//! Launching a job does not open the progress channel — the returned
//! [`Session`] carries the id; callers hand it to [`crate::session::attach`].

use std::time::Duration;

use crate::error::ToxiError;
use crate::protocol::{
    AnalysisRequest, CommentRecord, CommentRequest, CommentResponse, HealthResponse,
    LaunchResponse, PredictionListResponse, PredictionRow, MAX_COMMENTS, MIN_COMMENTS,
};
use crate::session::{Session, SessionStatus};

/// Configuration for a [`ToxiClient`]. One base URL selects the backend
/// host; there is no ambient global — construct this explicitly and pass
/// it where it is needed.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL of the backend HTTP API (e.g. `http://localhost:8000`).
    pub base_url: String,
    /// TCP connection timeout for REST calls.
    pub connect_timeout: Duration,
    /// Per-request read timeout for REST calls.
    pub request_timeout: Duration,
}

impl ClientConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        ClientConfig {
            base_url: base_url.into(),
            ..Default::default()
        }
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        ClientConfig {
            base_url: "http://localhost:8000".to_string(),
            connect_timeout: Duration::from_secs(5),
            request_timeout: Duration::from_secs(30),
        }
    }
}

/// Check an [`AnalysisRequest`] before anything touches the network.
pub fn validate_request(request: &AnalysisRequest) -> Result<(), ToxiError> {
    if request.url.trim().is_empty() {
        return Err(ToxiError::Validation(
            "la URL del video no puede estar vacía".to_string(),
        ));
    }
    if request.max_comments < MIN_COMMENTS || request.max_comments > MAX_COMMENTS {
        return Err(ToxiError::Validation(format!(
            "max_comments debe estar entre {MIN_COMMENTS} y {MAX_COMMENTS}, recibido {}",
            request.max_comments
        )));
    }
    Ok(())
}

pub struct ToxiClient {
    client: reqwest::Client,
    config: ClientConfig,
}

impl ToxiClient {
    pub fn new(config: ClientConfig) -> Result<Self, ToxiError> {
        let client = reqwest::Client::builder()
            .connect_timeout(config.connect_timeout)
            .timeout(config.request_timeout)
            .build()?;
        Ok(ToxiClient { client, config })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{path}", self.config.base_url.trim_end_matches('/'))
    }

    /// Launch an asynchronous video analysis. On success the backend has
    /// accepted the job and assigned a session id; the progress channel is
    /// NOT opened here.
    pub async fn start_analysis(&self, request: &AnalysisRequest) -> Result<Session, ToxiError> {
        validate_request(request)?;

        let response = self
            .client
            .post(self.endpoint("/v1/analyze_video_with_ml"))
            .json(request)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let detail = response
                .json::<serde_json::Value>()
                .await
                .ok()
                .and_then(|body| body.get("detail").and_then(|d| d.as_str()).map(String::from))
                .unwrap_or_else(|| format!("HTTP {status}"));
            return Err(ToxiError::Launch(detail));
        }

        let launch: LaunchResponse = response.json().await?;
        if !launch.success {
            return Err(ToxiError::Launch(launch.detail.unwrap_or_else(|| {
                "no se pudo iniciar el análisis".to_string()
            })));
        }
        let session_id = launch
            .session_id
            .ok_or_else(|| ToxiError::Launch("respuesta sin session_id".to_string()))?;

        Ok(Session {
            session_id,
            status: SessionStatus::Connecting,
        })
    }

    /// Classify a single comment synchronously.
    pub async fn analyze_comment(&self, comment: &str) -> Result<CommentRecord, ToxiError> {
        if comment.trim().is_empty() {
            return Err(ToxiError::Validation(
                "el comentario no puede estar vacío".to_string(),
            ));
        }
        let response: CommentResponse = self
            .client
            .post(self.endpoint("/v1/toxicity/analyze-comment"))
            .json(&CommentRequest {
                comment: comment.to_string(),
            })
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        Ok(response.result)
    }

    /// Fetch the list of prior analyses, raw. Use [`crate::history`] to
    /// normalize rows for display.
    pub async fn fetch_history(&self) -> Result<Vec<PredictionRow>, ToxiError> {
        let response: PredictionListResponse = self
            .client
            .get(self.endpoint("/v1/prediction_list"))
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        Ok(response.prediction_list)
    }

    /// Fetch the stored detail blob for one prior analysis.
    pub async fn fetch_detail(&self, id: i64) -> Result<serde_json::Value, ToxiError> {
        let body: serde_json::Value = self
            .client
            .get(self.endpoint(&format!("/v1/prediction_detail/{id}")))
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        Ok(body
            .get("prediction")
            .cloned()
            .unwrap_or(serde_json::Value::Null))
    }

    /// Probe the classifier's health endpoint.
    pub async fn health(&self) -> Result<HealthResponse, ToxiError> {
        let response: HealthResponse = self
            .client
            .get(self.endpoint("/v1/toxicity/health"))
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        Ok(response)
    }
}
