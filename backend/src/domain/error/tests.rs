//! Tests for the domain error payload and trace propagation.

use super::*;
use rstest::{fixture, rstest};
use serde_json::json;

const TRACE_ID: &str = "00000000-0000-0000-0000-000000000000";

#[fixture]
fn expected_trace_id() -> String {
    TRACE_ID.to_owned()
}

#[rstest]
#[case(Error::validation("bad"), ErrorCode::Validation)]
#[case(Error::unauthorized("login required"), ErrorCode::Unauthorized)]
#[case(Error::not_found("missing"), ErrorCode::NotFound)]
#[case(Error::conflict("taken"), ErrorCode::Conflict)]
#[case(Error::store("down"), ErrorCode::Store)]
#[case(Error::internal("boom"), ErrorCode::Internal)]
fn constructors_set_code(#[case] error: Error, #[case] code: ErrorCode) {
    assert_eq!(error.code(), code);
}

#[rstest]
fn try_new_rejects_empty_messages() {
    let result = Error::try_new(ErrorCode::Validation, "   ");
    assert_eq!(result, Err(ErrorValidationError::EmptyMessage));
}

#[rstest]
fn new_substitutes_blank_messages() {
    let error = Error::new(ErrorCode::Internal, "");
    assert_eq!(error.message(), "unspecified error");
}

#[rstest]
fn try_with_trace_id_rejects_empty_values() {
    let result = Error::validation("bad").try_with_trace_id("  ");
    assert_eq!(result, Err(ErrorValidationError::EmptyTraceId));
}

#[rstest]
fn new_returns_none_when_trace_id_out_of_scope() {
    let error = Error::internal("boom");
    assert!(error.trace_id().is_none());
}

#[rstest]
#[tokio::test]
async fn new_captures_trace_id_in_scope(expected_trace_id: String) {
    let trace_id: TraceId = expected_trace_id.parse().expect("fixture is a valid UUID");
    let error = TraceId::scope(trace_id, async move { Error::conflict("taken") }).await;

    assert_eq!(error.trace_id(), Some(expected_trace_id.as_str()));
}

#[rstest]
fn serialises_kind_under_error_key(expected_trace_id: String) {
    let error = Error::validation("species is required")
        .with_trace_id(expected_trace_id.clone())
        .with_details(json!({"field": "species", "code": "missing_field"}));

    let value = serde_json::to_value(&error).expect("serialise error");
    assert_eq!(
        value,
        json!({
            "error": "ValidationError",
            "message": "species is required",
            "traceId": expected_trace_id,
            "details": {"field": "species", "code": "missing_field"},
        })
    );
}

#[rstest]
fn omits_optional_fields_when_absent() {
    let value = serde_json::to_value(Error::not_found("missing")).expect("serialise error");
    assert_eq!(value, json!({"error": "NotFoundError", "message": "missing"}));
}

#[rstest]
#[case(ErrorCode::Store, true)]
#[case(ErrorCode::Internal, true)]
#[case(ErrorCode::Conflict, false)]
#[case(ErrorCode::Validation, false)]
fn server_faults_are_flagged(#[case] code: ErrorCode, #[case] expected: bool) {
    assert_eq!(code.is_server_fault(), expected);
}
