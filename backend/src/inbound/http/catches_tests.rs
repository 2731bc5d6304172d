//! Tests for catch HTTP handlers.

use actix_web::body::MessageBody;
use actix_web::cookie::Cookie;
use actix_web::dev::{Service, ServiceResponse};
use actix_web::test as actix_test;
use rstest::rstest;
use serde_json::{Value, json};

use super::*;
use crate::inbound::http::test_utils::{Harness, sign_up, status_and_json};
use crate::test_support::test_app;

async fn send<S, B>(
    app: &S,
    cookie: &Cookie<'static>,
    req: actix_test::TestRequest,
) -> (u16, Value)
where
    S: Service<actix_http::Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
    B: MessageBody,
{
    let req = req.cookie(cookie.clone()).to_request();
    status_and_json(actix_test::call_service(app, req).await).await
}

async fn create_session<S, B>(app: &S, cookie: &Cookie<'static>) -> String
where
    S: Service<actix_http::Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
    B: MessageBody,
{
    let (status, location) = send(
        app,
        cookie,
        actix_test::TestRequest::post()
            .uri("/api/v1/locations")
            .set_json(json!({"name": "Mill Pond", "latitude": 51.5, "longitude": -0.12})),
    )
    .await;
    assert_eq!(status, 201);
    let (status, session) = send(
        app,
        cookie,
        actix_test::TestRequest::post().uri("/api/v1/sessions").set_json(json!({
            "locationId": location["id"],
            "date": "2026-03-14",
            "startTime": "06:00",
            "endTime": "09:30",
        })),
    )
    .await;
    assert_eq!(status, 201);
    session["id"].as_str().unwrap_or_default().to_owned()
}

#[actix_web::test]
async fn catches_round_trip_through_create_update_and_delete() {
    let harness = Harness::new();
    let app = actix_test::init_service(test_app(harness.state, Harness::cors())).await;
    let cookie = sign_up(&app, "angler").await;

    let (status, created) = send(
        &app,
        &cookie,
        actix_test::TestRequest::post()
            .uri("/api/v1/catches")
            .set_json(json!({"species": "Bass", "weight": 2.3, "bait": "worm"})),
    )
    .await;
    assert_eq!(status, 201);
    assert_eq!(created["released"], json!(false));
    assert_eq!(created["sessionId"], Value::Null);
    let uri = format!("/api/v1/catches/{}", created["id"].as_str().unwrap_or_default());

    let (status, fetched) = send(&app, &cookie, actix_test::TestRequest::get().uri(&uri)).await;
    assert_eq!(status, 200);
    assert_eq!(fetched, created);

    let (status, updated) = send(
        &app,
        &cookie,
        actix_test::TestRequest::put()
            .uri(&uri)
            .set_json(json!({"released": true, "bait": null})),
    )
    .await;
    assert_eq!(status, 200);
    assert_eq!(updated["released"], json!(true));
    assert_eq!(updated["bait"], Value::Null);
    assert_eq!(updated["weight"], json!(2.3));

    let (status, _) = send(&app, &cookie, actix_test::TestRequest::delete().uri(&uri)).await;
    assert_eq!(status, 204);
    let (status, error) = send(&app, &cookie, actix_test::TestRequest::get().uri(&uri)).await;
    assert_eq!(status, 404);
    assert_eq!(error["error"], json!("NotFoundError"));
}

#[rstest]
#[case::missing_species(json!({"weight": 1.0}), "species", "missing_field")]
#[case::blank_species(json!({"species": "  "}), "species", "empty")]
#[case::negative_weight(json!({"species": "perch", "weight": -1.0}), "weight", "invalid_measurement")]
#[case::bad_session(json!({"species": "perch", "sessionId": "nope"}), "sessionId", "invalid_uuid")]
#[case::bad_photo(json!({"species": "perch", "photoUrl": "ftp://x"}), "photoUrl", "invalid_url")]
#[case::text_weight(json!({"species": "bass", "weight": "heavy"}), "weight", "invalid_type")]
#[case::text_released(json!({"species": "bass", "released": "yes"}), "released", "invalid_type")]
#[actix_web::test]
async fn invalid_catches_are_rejected_and_not_stored(
    #[case] body: Value,
    #[case] field: &str,
    #[case] code: &str,
) {
    let harness = Harness::new();
    let store = harness.store.clone();
    let app = actix_test::init_service(test_app(harness.state, Harness::cors())).await;
    let cookie = sign_up(&app, "angler").await;

    let (status, error) = send(
        &app,
        &cookie,
        actix_test::TestRequest::post().uri("/api/v1/catches").set_json(body),
    )
    .await;
    assert_eq!(status, 400);
    assert_eq!(error["details"]["field"], json!(field));
    assert_eq!(error["details"]["code"], json!(code));
    assert_eq!(store.catch_count(), 0);
}

#[actix_web::test]
async fn listing_filters_and_pages() {
    let harness = Harness::new();
    let app = actix_test::init_service(test_app(harness.state, Harness::cors())).await;
    let cookie = sign_up(&app, "angler").await;
    let session_id = create_session(&app, &cookie).await;

    for (species, released, in_session) in [
        ("Perch", true, true),
        ("perch", false, false),
        ("Bream", true, true),
        ("Roach", false, false),
    ] {
        let mut body = json!({"species": species, "released": released});
        if in_session {
            body["sessionId"] = json!(session_id);
        }
        let (status, _) = send(
            &app,
            &cookie,
            actix_test::TestRequest::post().uri("/api/v1/catches").set_json(body),
        )
        .await;
        assert_eq!(status, 201);
    }

    let by_session = format!("?sessionId={session_id}");
    for (query, total) in [
        ("", 4),
        ("?species=PERCH", 2),
        ("?released=true", 2),
        (by_session.as_str(), 2),
        ("?species=perch&released=false", 1),
    ] {
        let (status, page) = send(
            &app,
            &cookie,
            actix_test::TestRequest::get().uri(&format!("/api/v1/catches{query}")),
        )
        .await;
        assert_eq!(status, 200, "query {query}");
        assert_eq!(page["total"], json!(total), "query {query}");
    }

    let (status, page) = send(
        &app,
        &cookie,
        actix_test::TestRequest::get().uri("/api/v1/catches?page=2&perPage=3"),
    )
    .await;
    assert_eq!(status, 200);
    assert_eq!(page["items"].as_array().map(Vec::len), Some(1));
    assert_eq!(page["pages"], json!(2));
    assert_eq!(page["currentPage"], json!(2));
    assert_eq!(page["perPage"], json!(3));
}

#[rstest]
#[case("?perPage=0", "perPage")]
#[case("?perPage=101", "perPage")]
#[case("?page=0", "page")]
#[case("?sessionId=nope", "sessionId")]
#[actix_web::test]
async fn listing_rejects_bad_queries(#[case] query: &str, #[case] field: &str) {
    let harness = Harness::new();
    let app = actix_test::init_service(test_app(harness.state, Harness::cors())).await;
    let cookie = sign_up(&app, "angler").await;

    let (status, error) = send(
        &app,
        &cookie,
        actix_test::TestRequest::get().uri(&format!("/api/v1/catches{query}")),
    )
    .await;
    assert_eq!(status, 400);
    assert_eq!(error["details"]["field"], json!(field));
}

#[actix_web::test]
async fn another_anglers_session_cannot_be_referenced() {
    let harness = Harness::new();
    let store = harness.store.clone();
    let app = actix_test::init_service(test_app(harness.state, Harness::cors())).await;
    let owner = sign_up(&app, "owner").await;
    let intruder = sign_up(&app, "intruder").await;
    let session_id = create_session(&app, &owner).await;

    let (status, error) = send(
        &app,
        &intruder,
        actix_test::TestRequest::post()
            .uri("/api/v1/catches")
            .set_json(json!({"species": "pike", "sessionId": session_id})),
    )
    .await;
    assert_eq!(status, 404);
    assert_eq!(error["error"], json!("NotFoundError"));
    assert_eq!(store.catch_count(), 0);
}

#[actix_web::test]
async fn catches_are_private_to_their_owner() {
    let harness = Harness::new();
    let app = actix_test::init_service(test_app(harness.state, Harness::cors())).await;
    let owner = sign_up(&app, "owner").await;
    let intruder = sign_up(&app, "intruder").await;

    let (_, created) = send(
        &app,
        &owner,
        actix_test::TestRequest::post()
            .uri("/api/v1/catches")
            .set_json(json!({"species": "carp"})),
    )
    .await;
    let uri = format!("/api/v1/catches/{}", created["id"].as_str().unwrap_or_default());

    for req in [
        actix_test::TestRequest::get().uri(&uri),
        actix_test::TestRequest::put()
            .uri(&uri)
            .set_json(json!({"released": true})),
        actix_test::TestRequest::delete().uri(&uri),
    ] {
        let (status, _) = send(&app, &intruder, req).await;
        assert_eq!(status, 404);
    }

    let (status, page) = send(
        &app,
        &intruder,
        actix_test::TestRequest::get().uri("/api/v1/catches"),
    )
    .await;
    assert_eq!(status, 200);
    assert_eq!(page["total"], json!(0));
}

#[actix_web::test]
async fn catches_require_a_session() {
    let harness = Harness::new();
    let app = actix_test::init_service(test_app(harness.state, Harness::cors())).await;

    let req = actix_test::TestRequest::get().uri("/api/v1/catches").to_request();
    let (status, error) = status_and_json(actix_test::call_service(&app, req).await).await;
    assert_eq!(status, 401);
    assert_eq!(error["error"], json!("UnauthorizedError"));
}

#[rstest]
#[case(json!({}), CatchPatch::default())]
#[case(
    json!({"sessionId": null, "weight": null}),
    CatchPatch { session_id: Some(None), weight: Some(None), ..CatchPatch::default() }
)]
#[case(
    json!({"species": "tench", "released": true}),
    CatchPatch {
        species: Some("tench".to_owned()),
        released: Some(true),
        ..CatchPatch::default()
    }
)]
fn update_bodies_become_patches(#[case] body: Value, #[case] expected: CatchPatch) {
    let request: UpdateCatchRequest = serde_json::from_value(body).expect("valid JSON");
    assert_eq!(request.parse().expect("valid patch"), expected);
}

#[rstest]
fn blank_species_filters_are_ignored() {
    let query = CatchListQuery {
        species: Some("   ".to_owned()),
        ..CatchListQuery::default()
    };
    assert_eq!(query.filter().expect("valid filter").species, None);
}
