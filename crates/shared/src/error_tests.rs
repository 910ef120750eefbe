use super::*;
use rstest::rstest;

#[rstest]
#[case(AppError::NotFound("view".into()), 404, "NOT_FOUND")]
#[case(AppError::Validation("record".into()), 400, "VALIDATION_ERROR")]
#[case(AppError::ExternalService("renderer".into()), 502, "EXTERNAL_SERVICE_ERROR")]
#[case(AppError::Internal("boom".into()), 500, "INTERNAL_ERROR")]
fn test_app_error_mapping(#[case] error: AppError, #[case] status: u16, #[case] code: &str) {
    assert_eq!(error.status_code(), status);
    assert_eq!(error.error_code(), code);
}

#[test]
fn test_app_error_display() {
    assert_eq!(
        AppError::NotFound("msg".into()).to_string(),
        "Not found: msg"
    );
    assert_eq!(
        AppError::Validation("msg".into()).to_string(),
        "Validation error: msg"
    );
    assert_eq!(
        AppError::ExternalService("msg".into()).to_string(),
        "External service error: msg"
    );
    assert_eq!(
        AppError::Internal("msg".into()).to_string(),
        "Internal error: msg"
    );
}
