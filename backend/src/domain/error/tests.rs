//! Tests for the domain error payload and its wire shape.

use super::*;
use rstest::{fixture, rstest};
use serde_json::json;

const TRACE_ID: &str = "00000000-0000-0000-0000-000000000000";

#[fixture]
fn conflict_error() -> Error {
    Error::conflict("email already in use").with_path("/usuarios")
}

#[rstest]
#[case(ErrorCode::InvalidRequest, 400)]
#[case(ErrorCode::NotFound, 404)]
#[case(ErrorCode::Conflict, 409)]
#[case(ErrorCode::InternalError, 500)]
fn status_equivalent_follows_taxonomy(#[case] code: ErrorCode, #[case] expected: u16) {
    assert_eq!(code.status_equivalent(), expected);
}

#[rstest]
fn try_new_rejects_blank_messages() {
    let result = Error::try_new(ErrorCode::InternalError, "   ");
    assert_eq!(result, Err(ErrorValidationError::EmptyMessage));
}

#[rstest]
fn trace_id_is_absent_out_of_scope() {
    assert!(Error::internal("boom").trace_id().is_none());
}

#[rstest]
#[tokio::test]
async fn new_captures_trace_id_in_scope() {
    let trace_id: TraceId = TRACE_ID.parse().expect("valid uuid");
    let error = TraceId::scope(trace_id, async { Error::internal("boom") }).await;
    assert_eq!(error.trace_id(), Some(TRACE_ID));
}

#[rstest]
fn default_path_does_not_override_existing_path(conflict_error: Error) {
    let error = conflict_error.with_default_path("/elsewhere");
    assert_eq!(error.path(), Some("/usuarios"));

    let pathless = Error::internal("boom").with_default_path("/usuarios");
    assert_eq!(pathless.path(), Some("/usuarios"));
}

#[rstest]
fn serialises_code_status_message_and_path(conflict_error: Error) {
    let value = serde_json::to_value(conflict_error.with_trace_id(TRACE_ID)).expect("serialise");
    assert_eq!(
        value,
        json!({
            "code": "conflict",
            "status": 409,
            "message": "email already in use",
            "path": "/usuarios",
            "traceId": TRACE_ID,
        })
    );
}

#[rstest]
fn omits_absent_optional_fields() {
    let value = serde_json::to_value(Error::internal("boom")).expect("serialise");
    let object = value.as_object().expect("object payload");
    assert!(!object.contains_key("path"));
    assert!(!object.contains_key("traceId"));
    assert!(!object.contains_key("details"));
}

#[rstest]
fn deserialising_rejects_blank_message() {
    let payload = json!({ "code": "conflict", "message": " " });
    assert!(serde_json::from_value::<Error>(payload).is_err());
}

#[rstest]
fn deserialising_restores_details() {
    let payload = json!({
        "code": "invalid_request",
        "status": 400,
        "message": "email is required",
        "path": "/usuarios",
        "details": { "field": "email", "code": "missing" },
    });
    let error: Error = serde_json::from_value(payload).expect("deserialise");
    assert_eq!(error.code(), ErrorCode::InvalidRequest);
    assert_eq!(error.details(), Some(&json!({ "field": "email", "code": "missing" })));
}

#[rstest]
fn display_includes_path_when_present(conflict_error: Error) {
    assert_eq!(conflict_error.to_string(), "email already in use (/usuarios)");
}
