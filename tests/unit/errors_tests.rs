/*!
 * Tests for error types
 */

use ectrans::errors::{AppError, PipelineError, ProviderError};

#[test]
fn test_fromStatus_shouldMapStatusCodes() {
    assert!(matches!(ProviderError::from_status(401, "bad key"), ProviderError::AuthenticationError(_)));
    assert!(matches!(ProviderError::from_status(403, "forbidden"), ProviderError::AuthenticationError(_)));
    assert!(matches!(ProviderError::from_status(429, "slow down"), ProviderError::RateLimitExceeded(_)));
    assert!(matches!(
        ProviderError::from_status(502, "bad gateway"),
        ProviderError::ApiError { status_code: 502, .. }
    ));
}

#[test]
fn test_isTransient_shouldSeparateRetryableErrors() {
    assert!(ProviderError::Timeout(1000).is_transient());
    assert!(ProviderError::RateLimitExceeded("quota".to_string()).is_transient());
    assert!(ProviderError::from_status(503, "unavailable").is_transient());
    assert!(!ProviderError::from_status(400, "bad request").is_transient());
    assert!(!ProviderError::AuthenticationError("bad key".to_string()).is_transient());
    assert!(!ProviderError::EmptyResponse.is_transient());
}

#[test]
fn test_display_shouldIncludeDetails() {
    let error = ProviderError::ApiError {
        status_code: 500,
        message: "internal".to_string(),
    };
    assert_eq!(error.to_string(), "API responded with error: 500 - internal");
    assert_eq!(ProviderError::Timeout(250).to_string(), "Request timed out after 250 ms");
}

#[test]
fn test_appError_shouldWrapLowerLevelErrors() {
    let provider: AppError = ProviderError::EmptyResponse.into();
    assert!(matches!(provider, AppError::Provider(_)));

    let pipeline: AppError = PipelineError::MalformedInput("NUL byte".to_string()).into();
    assert_eq!(pipeline.to_string(), "Pipeline error: Malformed input text: NUL byte");

    let io: AppError = std::io::Error::new(std::io::ErrorKind::NotFound, "missing").into();
    assert!(matches!(io, AppError::File(_)));

    let storage: AppError = rusqlite::Error::InvalidQuery.into();
    assert!(matches!(storage, AppError::Storage(_)));
}
