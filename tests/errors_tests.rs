use std::error::Error;
use hereguard::errors::{NotifierError, SlackError};

#[test]
fn test_slack_error_implements_error_trait() {
    // Verify SlackError implements the Error trait
    fn assert_error<T: Error>(_: &T) {}

    let error = SlackError::ParseError("test error".to_string());
    assert_error(&error);
}

#[test]
fn test_slack_error_display() {
    let error = SlackError::ApiError("API failed".to_string());
    assert_eq!(format!("{error}"), "Failed to access Slack API: API failed");

    let error = SlackError::HttpError("Connection error".to_string());
    assert_eq!(
        format!("{error}"),
        "Failed to send HTTP request: Connection error"
    );

    let error = SlackError::RateLimited {
        retry_after_secs: Some(30),
    };
    assert!(error.is_rate_limited());
    assert!(format!("{error}").contains("30"));
}

#[test]
fn test_notifier_error_keeps_source() {
    let error = NotifierError::ChannelLookup {
        channel_id: "C123".to_string(),
        source: SlackError::ApiError("conversations.info error: channel_not_found".to_string()),
    };

    assert!(error.is_metadata_failure());
    assert!(format!("{error}").contains("C123"));
    let source = error.source().map(ToString::to_string).unwrap_or_default();
    assert!(source.contains("channel_not_found"));

    assert!(!NotifierError::Config("PORT: invalid digit".to_string()).is_metadata_failure());
}

#[test]
fn test_slack_error_from_conversions() {
    let parse_err = serde_json::from_str::<serde_json::Value>("{not json").unwrap_err();
    let slack_err: SlackError = parse_err.into();
    assert!(matches!(slack_err, SlackError::ParseError(_)));

    // We can't easily build a reqwest::Error directly, but this verifies that
    // the From<reqwest::Error> conversion exists.
    #[allow(unused)]
    fn _check_reqwest_conversion(err: reqwest::Error) -> SlackError {
        SlackError::from(err)
    }
}
