//! Wire types for the toxicity-analysis backend.
//!
//! Mirrors the JSON shapes the backend actually emits. The payloads are
//! dynamic on the server side, so every inbound field is defaulted or
//! optional — absence never fails deserialization, and optional fields are
//! accessed through explicit presence checks downstream.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

// -- Launch call ------------------------------------------------------------

/// Body for `POST /v1/analyze_video_with_ml`.
///
/// Immutable once sent; validated by the client before submission.
#[derive(Debug, Clone, Serialize)]
pub struct AnalysisRequest {
    pub url: String,
    pub max_comments: u32,
}

/// Inclusive bounds the backend scraper accepts for `max_comments`.
pub const MIN_COMMENTS: u32 = 5;
pub const MAX_COMMENTS: u32 = 1000;

#[derive(Debug, Clone, Deserialize)]
pub struct LaunchResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub session_id: Option<String>,
    /// Human-readable rejection reason, when the backend provides one.
    #[serde(default)]
    pub detail: Option<String>,
}

// -- Progress channel frames ------------------------------------------------

/// One inbound frame on the `/ws/{session_id}` channel, discriminated on
/// the `type` field. Frames that do not match either variant are treated as
/// malformed and ignored by the consumer.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ChannelEvent {
    Progress {
        percentage: f64,
        #[serde(default)]
        message: String,
    },
    Completion {
        success: bool,
        #[serde(default)]
        data: Option<AnalysisResult>,
        #[serde(default)]
        error: Option<String>,
    },
}

// -- Analysis payload -------------------------------------------------------

/// The completed analysis delivered in a successful completion frame.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AnalysisResult {
    #[serde(default)]
    pub total_comments: u64,
    #[serde(default)]
    pub toxic_comments: u64,
    #[serde(default)]
    pub total_replies: u64,
    #[serde(default)]
    pub toxic_replies: u64,
    #[serde(default)]
    pub total_analyzed: u64,
    #[serde(default)]
    pub total_toxic: u64,
    #[serde(default)]
    pub toxicity_rate: f64,
    #[serde(default)]
    pub main_comments_toxicity_rate: f64,
    #[serde(default)]
    pub replies_toxicity_rate: f64,
    #[serde(default)]
    pub summary: AnalysisSummary,
    #[serde(default)]
    pub main_comments_analysis: Vec<CommentRecord>,
    #[serde(default)]
    pub replies_analysis: Vec<CommentRecord>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AnalysisSummary {
    /// category name → occurrence count, in the order the backend emitted.
    #[serde(default)]
    pub categories_found: serde_json::Map<String, serde_json::Value>,
    #[serde(default)]
    pub most_toxic_comment: Option<CommentRecord>,
    #[serde(default)]
    pub most_toxic_reply: Option<CommentRecord>,
    #[serde(default)]
    pub average_toxicity: f64,
    #[serde(default)]
    pub model_info: Option<ModelInfo>,
}

/// One classified comment or reply, produced entirely by the backend.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CommentRecord {
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub is_toxic: bool,
    /// Classifier confidence in [0, 1].
    #[serde(default)]
    pub toxicity_confidence: f64,
    #[serde(default)]
    pub categories_detected: Vec<String>,
    #[serde(default)]
    pub category_scores: HashMap<String, f64>,
    #[serde(default)]
    pub metadata: CommentMetadata,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CommentMetadata {
    #[serde(default)]
    pub author: Option<String>,
    #[serde(default)]
    pub likes: Option<u64>,
    /// Author of the parent comment, present only on replies.
    #[serde(default)]
    pub parent_author: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelInfo {
    #[serde(default)]
    pub model_type: String,
    #[serde(default)]
    pub version: String,
    #[serde(default)]
    pub device: String,
    #[serde(default)]
    pub model_loaded: bool,
}

// -- Single-comment call ----------------------------------------------------

/// Body for `POST /v1/toxicity/analyze-comment`.
#[derive(Debug, Clone, Serialize)]
pub struct CommentRequest {
    pub comment: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CommentResponse {
    pub result: CommentRecord,
}

// -- History listing --------------------------------------------------------

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PredictionListResponse {
    #[serde(default)]
    pub prediction_list: Vec<PredictionRow>,
}

/// One prior analysis as stored by the backend. Column presence varies with
/// backend version, so everything is optional.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PredictionRow {
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(default)]
    pub video_title: Option<String>,
    #[serde(default)]
    pub video_url: Option<String>,
    #[serde(default)]
    pub video_author: Option<String>,
    #[serde(default)]
    pub video_description: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
    /// Older backend versions wrote `inserted_at` instead of `created_at`.
    #[serde(default)]
    pub inserted_at: Option<String>,
    #[serde(default)]
    pub total_comments: Option<u64>,
    #[serde(default)]
    pub total_replies: Option<u64>,
    #[serde(default)]
    pub toxicity_rate: Option<f64>,
    #[serde(default)]
    pub total_likes: Option<u64>,
    #[serde(default)]
    pub total_emojis: Option<u64>,
    /// Raw technical category flags, fed through the category mapper
    /// before display.
    #[serde(default)]
    pub categories_summary: serde_json::Map<String, serde_json::Value>,
}

// -- Health call ------------------------------------------------------------

#[derive(Debug, Clone, Deserialize)]
pub struct HealthResponse {
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub model_info: Option<serde_json::Value>,
    #[serde(default)]
    pub pipeline_version: Option<String>,
}
