//! External tests for wire types — frame discrimination, tolerant
//! deserialization of backend payloads, and request serialization.

use toxilens::protocol::*;

// -- Channel frame discrimination ------------------------------------------

#[test]
fn test_progress_frame_deserializes() {
    let event: ChannelEvent =
        serde_json::from_str(r#"{"type":"progress","percentage":40,"message":"Extrayendo"}"#)
            .expect("deserialize");
    match event {
        ChannelEvent::Progress { percentage, message } => {
            assert_eq!(percentage, 40.0);
            assert_eq!(message, "Extrayendo");
        }
        ChannelEvent::Completion { .. } => panic!("expected progress"),
    }
}

#[test]
fn test_progress_frame_without_message_defaults_empty() {
    let event: ChannelEvent =
        serde_json::from_str(r#"{"type":"progress","percentage":10}"#).expect("deserialize");
    match event {
        ChannelEvent::Progress { message, .. } => assert_eq!(message, ""),
        ChannelEvent::Completion { .. } => panic!("expected progress"),
    }
}

#[test]
fn test_completion_success_frame_carries_data() {
    let event: ChannelEvent = serde_json::from_str(
        r#"{"type":"completion","success":true,"data":{"total_comments":3,"toxicity_rate":0.5}}"#,
    )
    .expect("deserialize");
    match event {
        ChannelEvent::Completion { success, data, error } => {
            assert!(success);
            assert!(error.is_none());
            let data = data.expect("data present");
            assert_eq!(data.total_comments, 3);
            assert_eq!(data.toxicity_rate, 0.5);
        }
        ChannelEvent::Progress { .. } => panic!("expected completion"),
    }
}

#[test]
fn test_completion_failure_frame_carries_error() {
    let event: ChannelEvent =
        serde_json::from_str(r#"{"type":"completion","success":false,"error":"timeout"}"#)
            .expect("deserialize");
    match event {
        ChannelEvent::Completion { success, data, error } => {
            assert!(!success);
            assert!(data.is_none());
            assert_eq!(error.as_deref(), Some("timeout"));
        }
        ChannelEvent::Progress { .. } => panic!("expected completion"),
    }
}

#[test]
fn test_frame_without_type_is_an_error() {
    assert!(serde_json::from_str::<ChannelEvent>(r#"{"percentage":50}"#).is_err());
}

#[test]
fn test_frame_with_unknown_type_is_an_error() {
    assert!(serde_json::from_str::<ChannelEvent>(r#"{"type":"heartbeat"}"#).is_err());
}

// -- Launch call ------------------------------------------------------------

#[test]
fn test_analysis_request_serializes_backend_field_names() {
    let request = AnalysisRequest {
        url: "https://www.youtube.com/watch?v=abc".to_string(),
        max_comments: 50,
    };
    let json = serde_json::to_string(&request).expect("serialize");
    assert!(json.contains("\"url\":"));
    assert!(json.contains("\"max_comments\":50"));
}

#[test]
fn test_launch_response_tolerates_missing_session_id() {
    let response: LaunchResponse =
        serde_json::from_str(r#"{"success":false,"detail":"video privado"}"#).expect("deserialize");
    assert!(!response.success);
    assert!(response.session_id.is_none());
    assert_eq!(response.detail.as_deref(), Some("video privado"));
}

// -- Analysis payload tolerance --------------------------------------------

#[test]
fn test_analysis_result_deserializes_from_empty_object() {
    let result: AnalysisResult = serde_json::from_str("{}").expect("deserialize");
    assert_eq!(result.total_analyzed, 0);
    assert!(result.main_comments_analysis.is_empty());
    assert!(result.summary.most_toxic_comment.is_none());
}

#[test]
fn test_comment_record_optional_metadata() {
    let record: CommentRecord =
        serde_json::from_str(r#"{"text":"hola","is_toxic":false,"toxicity_confidence":0.02}"#)
            .expect("deserialize");
    assert!(record.metadata.author.is_none());
    assert!(record.metadata.likes.is_none());
    assert!(record.categories_detected.is_empty());
}

#[test]
fn test_comment_record_full_metadata() {
    let record: CommentRecord = serde_json::from_str(
        r#"{
            "text": "qué horror",
            "is_toxic": true,
            "toxicity_confidence": 0.91,
            "categories_detected": ["IsToxic", "IsAbusive"],
            "category_scores": {"IsToxic": 0.91, "IsAbusive": 0.85},
            "metadata": {"author": "user1", "likes": 12, "parent_author": "op"}
        }"#,
    )
    .expect("deserialize");
    assert_eq!(record.metadata.author.as_deref(), Some("user1"));
    assert_eq!(record.metadata.likes, Some(12));
    assert_eq!(record.category_scores.get("IsAbusive"), Some(&0.85));
}

#[test]
fn test_categories_found_preserves_backend_order() {
    let summary: AnalysisSummary = serde_json::from_str(
        r#"{"categories_found":{"IsSexist":2,"IsToxic":5,"IsAbusive":1}}"#,
    )
    .expect("deserialize");
    let keys: Vec<&String> = summary.categories_found.keys().collect();
    assert_eq!(keys, vec!["IsSexist", "IsToxic", "IsAbusive"]);
}

// -- History rows -----------------------------------------------------------

#[test]
fn test_prediction_row_tolerates_sparse_columns() {
    let row: PredictionRow =
        serde_json::from_str(r#"{"id":3,"video_title":"Mi video"}"#).expect("deserialize");
    assert_eq!(row.id, Some(3));
    assert!(row.toxicity_rate.is_none());
    assert!(row.categories_summary.is_empty());
}

#[test]
fn test_prediction_list_defaults_to_empty() {
    let response: PredictionListResponse = serde_json::from_str("{}").expect("deserialize");
    assert!(response.prediction_list.is_empty());
}
