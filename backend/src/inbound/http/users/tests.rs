//! Tests for the registration handler.

use super::*;
use crate::Trace;
use crate::domain::ports::MockUserProvisioning;
use crate::domain::{
    DisplayName, EmailAddress, ProvisionedUser, User, UserId, USERS_PATH, TRACE_ID_HEADER,
};
use actix_web::http::StatusCode;
use actix_web::{App, test as actix_test};
use rstest::rstest;
use serde_json::{Value, json};

fn listener(id: i64) -> ProvisionedUser {
    ProvisionedUser::Listener(User::new(
        UserId::new(id).expect("valid id"),
        DisplayName::new("Ana").expect("valid name"),
        EmailAddress::new("a@x.com").expect("valid email"),
        false,
    ))
}

async fn post_json(provisioning: MockUserProvisioning, body: Value) -> (StatusCode, Value) {
    let state = HttpState::new(Arc::new(provisioning));
    let app = actix_test::init_service(
        App::new()
            .wrap(Trace)
            .app_data(web::Data::new(state))
            .service(web::scope("/api").configure(configure)),
    )
    .await;
    let request = actix_test::TestRequest::post()
        .uri("/api/usuarios")
        .set_json(body)
        .to_request();
    let response = actix_test::call_service(&app, request).await;
    let status = response.status();
    let body = actix_test::read_body(response).await;
    let value = serde_json::from_slice(&body).expect("json body");
    (status, value)
}

#[rstest]
#[actix_web::test]
async fn created_account_is_returned_with_201() {
    let mut provisioning = MockUserProvisioning::new();
    provisioning
        .expect_provision()
        .withf(|payload| payload.email.as_deref() == Some("a@x.com") && !payload.is_artist)
        .times(1)
        .returning(|_| Ok(listener(1)));

    let (status, body) = post_json(
        provisioning,
        json!({ "name": "Ana", "email": "a@x.com", "password": "s3cret", "isArtist": false }),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(
        body,
        json!({ "id": 1, "name": "Ana", "email": "a@x.com", "isArtist": false })
    );
}

#[rstest]
#[actix_web::test]
async fn legacy_keys_reach_the_use_case() {
    let mut provisioning = MockUserProvisioning::new();
    provisioning
        .expect_provision()
        .withf(|payload| payload.name.as_deref() == Some("Ana") && payload.genre_id == Some(7))
        .times(1)
        .returning(|_| Ok(listener(2)));

    let (status, _) = post_json(
        provisioning,
        json!({
            "nombreusuario": "Ana",
            "correo": "a@x.com",
            "contrasenia": "s3cret",
            "esartista": true,
            "idgenero": 7,
        }),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
}

#[rstest]
#[case(Error::conflict("email already in use"), StatusCode::CONFLICT, "conflict")]
#[case(Error::invalid_request("email is required"), StatusCode::BAD_REQUEST, "invalid_request")]
#[case(Error::internal("failed to create user"), StatusCode::INTERNAL_SERVER_ERROR, "internal_error")]
#[actix_web::test]
async fn domain_errors_map_to_statuses(
    #[case] error: Error,
    #[case] expected_status: StatusCode,
    #[case] expected_code: &str,
) {
    let mut provisioning = MockUserProvisioning::new();
    let returned = error.with_path(USERS_PATH);
    provisioning
        .expect_provision()
        .times(1)
        .returning(move |_| Err(returned.clone()));

    let (status, body) = post_json(
        provisioning,
        json!({ "name": "Ana", "email": "a@x.com", "password": "s3cret" }),
    )
    .await;

    assert_eq!(status, expected_status);
    assert_eq!(body["code"], json!(expected_code));
    assert_eq!(body["status"], json!(expected_status.as_u16()));
    assert_eq!(body["path"], json!(USERS_PATH));
}

#[rstest]
#[actix_web::test]
async fn malformed_body_is_a_validation_error() {
    let mut provisioning = MockUserProvisioning::new();
    provisioning.expect_provision().never();

    let (status, body) = post_json(provisioning, json!({ "name": 42 })).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], json!("invalid_request"));
    assert_eq!(body["path"], json!("/api/usuarios"));
    assert!(body["traceId"].is_string());
}

#[rstest]
#[actix_web::test]
async fn spawned_provisioning_keeps_the_request_trace() {
    let mut provisioning = MockUserProvisioning::new();
    provisioning.expect_provision().times(1).returning(|_| {
        let current = TraceId::current().expect("trace id in scope");
        Err(Error::conflict("email already in use").with_details(json!({
            "observedTrace": current.to_string(),
        })))
    });

    let state = HttpState::new(Arc::new(provisioning));
    let app = actix_test::init_service(
        App::new()
            .wrap(Trace)
            .app_data(web::Data::new(state))
            .service(web::scope("/api").configure(configure)),
    )
    .await;
    let request = actix_test::TestRequest::post()
        .uri("/api/usuarios")
        .set_json(json!({ "name": "Ana", "email": "a@x.com", "password": "s3cret" }))
        .to_request();
    let response = actix_test::call_service(&app, request).await;
    let header = response
        .headers()
        .get(TRACE_ID_HEADER)
        .and_then(|value| value.to_str().ok())
        .map(str::to_owned)
        .expect("trace header");
    let body: Value = actix_test::read_body_json(response).await;

    assert_eq!(body["traceId"], json!(header));
    assert_eq!(body["details"]["observedTrace"], json!(header));
}
