//! End-to-end registration through the HTTP adapter with in-memory doubles.
//!
//! Wires the real provisioning service behind the Actix routes, backed by
//! `InMemoryUserStore` and `RecordingIdentityProvider`, and checks the
//! observable state of both systems after each request.

use std::sync::Arc;
use std::time::Duration;

use actix_web::http::StatusCode;
use actix_web::{App, test as actix_test, web};
use rstest::{fixture, rstest};
use serde_json::{Value, json};

use user_service::Trace;
use user_service::domain::ports::{IdentityProviderError, UserStoreError};
use user_service::domain::{
    DisplayName, EmailAddress, NewUser, Password, TRACE_ID_HEADER, UserProvisioningService,
};
use user_service::inbound::http::{HttpState, users};
use user_service::test_support::{InMemoryUserStore, RecordingIdentityProvider};

struct Harness {
    store: Arc<InMemoryUserStore>,
    identity: Arc<RecordingIdentityProvider>,
}

#[fixture]
fn harness() -> Harness {
    Harness {
        store: Arc::new(InMemoryUserStore::new()),
        identity: Arc::new(RecordingIdentityProvider::new()),
    }
}

impl Harness {
    async fn post(&self, body: Value) -> (StatusCode, Option<String>, Value) {
        let service =
            UserProvisioningService::new(Arc::clone(&self.store), Arc::clone(&self.identity))
                .with_identity_timeout(Duration::from_millis(50));
        let state = HttpState::new(Arc::new(service));
        let app = actix_test::init_service(
            App::new()
                .wrap(Trace)
                .app_data(web::Data::new(state))
                .service(web::scope("/api").configure(users::configure)),
        )
        .await;
        let request = actix_test::TestRequest::post()
            .uri("/api/usuarios")
            .set_json(body)
            .to_request();
        let response = actix_test::call_service(&app, request).await;
        let status = response.status();
        let trace = response
            .headers()
            .get(TRACE_ID_HEADER)
            .and_then(|value| value.to_str().ok())
            .map(str::to_owned);
        let body = actix_test::read_body_json(response).await;
        (status, trace, body)
    }
}

fn existing_user(email: &str) -> NewUser {
    NewUser {
        display_name: DisplayName::new("Existing").expect("valid name"),
        email: EmailAddress::new(email).expect("valid email"),
        password: Password::new("hunter2").expect("valid password"),
        is_artist: false,
    }
}

#[rstest]
#[actix_web::test]
async fn listener_is_persisted_and_registered(harness: Harness) {
    let (status, _, body) = harness
        .post(json!({ "name": "Ana", "email": "a@x.com", "password": "s3cret", "isArtist": false }))
        .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(
        body,
        json!({ "id": 1, "name": "Ana", "email": "a@x.com", "isArtist": false })
    );
    assert_eq!(harness.store.users().len(), 1);
    assert!(harness.store.profiles().is_empty());
    assert_eq!(harness.identity.account_count(), 1);
}

#[rstest]
#[actix_web::test]
async fn artist_gets_a_profile_and_genre_echo(harness: Harness) {
    let (status, _, body) = harness
        .post(json!({
            "nombreusuario": "Bea",
            "correo": "b@x.com",
            "contrasenia": "s3cret",
            "esartista": true,
            "genero": { "idgenero": 3, "nombre": "rock" },
        }))
        .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["isArtist"], json!(true));
    assert_eq!(body["genreId"], json!(3));
    assert_eq!(body["genre"]["nombre"], json!("rock"));
    assert_eq!(harness.store.profiles().len(), 1);
    assert_eq!(harness.identity.account_count(), 1);
}

#[rstest]
#[actix_web::test]
async fn duplicate_email_never_reaches_the_identity_provider(harness: Harness) {
    harness.store.seed_user(&existing_user("a@x.com"));

    let (status, _, body) = harness
        .post(json!({ "name": "Ana", "email": "a@x.com", "password": "s3cret" }))
        .await;

    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["code"], json!("conflict"));
    assert_eq!(harness.identity.account_count(), 0);
    assert_eq!(harness.store.users().len(), 1);
}

#[rstest]
#[actix_web::test]
async fn identity_conflict_rolls_back_the_user_row(harness: Harness) {
    harness
        .identity
        .fail_create(IdentityProviderError::already_exists("EMAIL_EXISTS"));

    let (status, _, body) = harness
        .post(json!({ "name": "Ana", "email": "a@x.com", "password": "s3cret" }))
        .await;

    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["message"], json!("account already exists"));
    assert!(harness.store.users().is_empty());
    assert_eq!(harness.store.rollbacks(), 1);
    assert!(harness.identity.deleted_ids().is_empty());
}

#[rstest]
#[actix_web::test]
async fn commit_failure_removes_the_identity_account(harness: Harness) {
    harness
        .store
        .fail_commit(UserStoreError::connection("connection reset"));

    let (status, trace, body) = harness
        .post(json!({ "name": "Ana", "email": "a@x.com", "password": "s3cret" }))
        .await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["code"], json!("internal_error"));
    assert_eq!(body["message"], json!("failed to create user"));
    assert_eq!(body["traceId"], json!(trace.expect("trace header")));
    assert!(harness.store.users().is_empty());
    assert_eq!(harness.identity.account_count(), 0);
    assert_eq!(harness.identity.deleted_ids().len(), 1);
}

#[rstest]
#[actix_web::test]
async fn slow_identity_provider_is_compensated(harness: Harness) {
    harness.identity.delay_create(Duration::from_millis(500));

    let (status, _, _) = harness
        .post(json!({ "name": "Ana", "email": "a@x.com", "password": "s3cret" }))
        .await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(harness.store.users().is_empty());
    assert_eq!(harness.identity.deleted_ids().len(), 1);
    assert_eq!(harness.identity.account_count(), 0);
}

#[rstest]
#[case(json!({ "email": "a@x.com", "password": "s3cret" }), "name")]
#[case(json!({ "name": "Ana", "password": "s3cret" }), "email")]
#[case(json!({ "name": "Ana", "email": "not-an-email", "password": "s3cret" }), "email")]
#[case(json!({ "name": "Ana", "email": "a@x.com" }), "password")]
#[actix_web::test]
async fn invalid_payloads_touch_nothing(
    harness: Harness,
    #[case] body: Value,
    #[case] field: &str,
) {
    let (status, _, response) = harness.post(body).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(response["details"]["field"], json!(field));
    assert_eq!(harness.store.commits(), 0);
    assert_eq!(harness.identity.account_count(), 0);
}
