//! Tests for account HTTP handlers.

use actix_web::test as actix_test;
use rstest::rstest;
use serde_json::{Value, json};

use crate::inbound::http::test_utils::{Harness, session_cookie, sign_up, status_and_json};
use crate::test_support::test_app;

fn post(uri: &str, body: Value) -> actix_test::TestRequest {
    actix_test::TestRequest::post().uri(uri).set_json(body)
}

#[actix_web::test]
async fn registration_signs_the_account_in() {
    let harness = Harness::new();
    let app = actix_test::init_service(test_app(harness.state, Harness::cors())).await;

    let req = post(
        "/api/v1/auth/register",
        json!({"email": "Angler@Example.org", "username": "angler", "password": "tightlines"}),
    )
    .to_request();
    let res = actix_test::call_service(&app, req).await;
    let cookie = session_cookie(&res);
    let (status, created) = status_and_json(res).await;
    assert_eq!(status, 201);
    assert_eq!(created["email"], json!("angler@example.org"));
    assert!(created.get("passwordHash").is_none());

    let me = actix_test::TestRequest::get()
        .uri("/api/v1/auth/me")
        .cookie(cookie)
        .to_request();
    let (status, body) = status_and_json(actix_test::call_service(&app, me).await).await;
    assert_eq!(status, 200);
    assert_eq!(body["id"], created["id"]);
}

#[rstest]
#[case::missing_password(json!({"email": "a@example.org", "username": "angler"}), "password", "missing_field")]
#[case::short_password(json!({"email": "a@example.org", "username": "angler", "password": "short"}), "password", "too_short")]
#[case::bad_email(json!({"email": "angler", "username": "angler", "password": "tightlines"}), "email", "invalid_format")]
#[case::bad_username(json!({"email": "a@example.org", "username": "a!", "password": "tightlines"}), "username", "invalid_length")]
#[actix_web::test]
async fn registration_rejects_invalid_input(
    #[case] body: Value,
    #[case] field: &str,
    #[case] code: &str,
) {
    let harness = Harness::new();
    let app = actix_test::init_service(test_app(harness.state, Harness::cors())).await;

    let res = actix_test::call_service(&app, post("/api/v1/auth/register", body).to_request()).await;
    let (status, error) = status_and_json(res).await;
    assert_eq!(status, 400);
    assert_eq!(error["error"], json!("ValidationError"));
    assert_eq!(error["details"]["field"], json!(field));
    assert_eq!(error["details"]["code"], json!(code));
}

#[actix_web::test]
async fn duplicate_registration_conflicts() {
    let harness = Harness::new();
    let app = actix_test::init_service(test_app(harness.state, Harness::cors())).await;
    sign_up(&app, "angler").await;

    let req = post(
        "/api/v1/auth/register",
        json!({"email": "angler@example.org", "username": "someone", "password": "tightlines"}),
    )
    .to_request();
    let (status, error) = status_and_json(actix_test::call_service(&app, req).await).await;
    assert_eq!(status, 409);
    assert_eq!(error["error"], json!("ConflictError"));
}

#[rstest]
#[case::wrong_password("angler@example.org", "slacklines")]
#[case::unknown_email("nobody@example.org", "tightlines")]
#[actix_web::test]
async fn failed_logins_look_identical(#[case] email: &str, #[case] password: &str) {
    let harness = Harness::new();
    let app = actix_test::init_service(test_app(harness.state, Harness::cors())).await;
    sign_up(&app, "angler").await;

    let req = post(
        "/api/v1/auth/login",
        json!({"email": email, "password": password}),
    )
    .to_request();
    let (status, error) = status_and_json(actix_test::call_service(&app, req).await).await;
    assert_eq!(status, 401);
    assert_eq!(error["message"], json!("invalid email or password"));
}

#[actix_web::test]
async fn logout_clears_the_session() {
    let harness = Harness::new();
    let app = actix_test::init_service(test_app(harness.state, Harness::cors())).await;
    let cookie = sign_up(&app, "angler").await;

    let logout = actix_test::TestRequest::post()
        .uri("/api/v1/auth/logout")
        .cookie(cookie)
        .to_request();
    let res = actix_test::call_service(&app, logout).await;
    assert_eq!(res.status().as_u16(), 204);
    let cleared = session_cookie(&res);

    let me = actix_test::TestRequest::get()
        .uri("/api/v1/auth/me")
        .cookie(cleared)
        .to_request();
    let (status, error) = status_and_json(actix_test::call_service(&app, me).await).await;
    assert_eq!(status, 401);
    assert_eq!(error["error"], json!("UnauthorizedError"));
}

#[actix_web::test]
async fn password_change_requires_the_current_password() {
    let harness = Harness::new();
    let app = actix_test::init_service(test_app(harness.state, Harness::cors())).await;
    let cookie = sign_up(&app, "angler").await;

    let wrong = post(
        "/api/v1/auth/change-password",
        json!({"currentPassword": "slacklines", "newPassword": "bentrod42"}),
    )
    .cookie(cookie.clone())
    .to_request();
    assert_eq!(actix_test::call_service(&app, wrong).await.status().as_u16(), 401);

    let right = post(
        "/api/v1/auth/change-password",
        json!({"currentPassword": "tightlines", "newPassword": "bentrod42"}),
    )
    .cookie(cookie)
    .to_request();
    assert_eq!(actix_test::call_service(&app, right).await.status().as_u16(), 204);

    let login = post(
        "/api/v1/auth/login",
        json!({"email": "angler@example.org", "password": "bentrod42"}),
    )
    .to_request();
    assert_eq!(actix_test::call_service(&app, login).await.status().as_u16(), 200);
}

#[rstest]
#[case(json!({"newPassword": "bentrod42"}), "currentPassword")]
#[case(json!({"currentPassword": "", "newPassword": "bentrod42"}), "currentPassword")]
#[case(json!({"currentPassword": "tightlines", "newPassword": "short"}), "newPassword")]
fn password_change_errors_name_the_field(#[case] body: Value, #[case] field: &str) {
    let request: super::ChangePasswordRequest = serde_json::from_value(body).expect("valid JSON");
    let err = request.parse().expect_err("invalid change");
    assert_eq!(
        err.details().and_then(|details| details.get("field")).cloned(),
        Some(json!(field))
    );
}

#[actix_web::test]
async fn store_outage_is_reported_without_detail() {
    let harness = Harness::new();
    let store = harness.store.clone();
    let app = actix_test::init_service(test_app(harness.state, Harness::cors())).await;
    store.set_unavailable(true);

    let req = post(
        "/api/v1/auth/register",
        json!({"email": "angler@example.org", "username": "angler", "password": "tightlines"}),
    )
    .to_request();
    let (status, error) = status_and_json(actix_test::call_service(&app, req).await).await;
    assert_eq!(status, 503);
    assert_eq!(error["error"], json!("StoreError"));
    assert!(error.get("details").is_none());
    assert!(!error["message"].as_str().unwrap_or_default().contains("offline"));
}
