//! External tests for the launcher — validation must reject bad requests
//! before anything touches the network.

use toxilens::client::{validate_request, ClientConfig, ToxiClient};
use toxilens::error::ToxiError;
use toxilens::protocol::AnalysisRequest;

fn request(max_comments: u32) -> AnalysisRequest {
    AnalysisRequest {
        url: "https://www.youtube.com/watch?v=dQw4w9WgXcQ".to_string(),
        max_comments,
    }
}

#[test]
fn test_out_of_range_rejected_for_all_boundary_values() {
    for bad in [0, 1, 4, 1001, 5000, u32::MAX] {
        assert!(
            matches!(validate_request(&request(bad)), Err(ToxiError::Validation(_))),
            "max_comments={bad} should fail validation"
        );
    }
    for good in [5, 6, 50, 999, 1000] {
        assert!(validate_request(&request(good)).is_ok());
    }
}

#[tokio::test]
async fn test_launch_with_invalid_count_makes_no_network_call() {
    // An unroutable base URL: any network attempt would surface as an Http
    // error, so getting Validation back proves the call never left.
    let client = ToxiClient::new(ClientConfig::new("http://127.0.0.1:9")).expect("client");
    let err = client.start_analysis(&request(3)).await.unwrap_err();
    assert!(matches!(err, ToxiError::Validation(_)));
}

#[tokio::test]
async fn test_launch_with_empty_url_makes_no_network_call() {
    let client = ToxiClient::new(ClientConfig::new("http://127.0.0.1:9")).expect("client");
    let bad = AnalysisRequest {
        url: "".to_string(),
        max_comments: 50,
    };
    let err = client.start_analysis(&bad).await.unwrap_err();
    assert!(matches!(err, ToxiError::Validation(_)));
}

#[test]
fn test_validation_error_message_names_the_bounds() {
    let err = validate_request(&request(3)).unwrap_err();
    let message = err.to_string();
    assert!(message.contains('5'));
    assert!(message.contains("1000"));
}
