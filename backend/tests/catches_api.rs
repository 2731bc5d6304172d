//! End-to-end tests for the catch endpoints over the in-memory store.

#[path = "support/http.rs"]
mod http;

use std::collections::HashSet;

use actix_web::test;
use fishing_backend::test_support::test_app;
use futures::future::join_all;
use http::{World, call, cors, create_location, create_session, delete, get, id_of, post, put, register};
use rstest::rstest;
use serde_json::{Value, json};

#[actix_web::test]
async fn created_catch_is_fetched_unchanged_until_deleted() {
    let world = World::new();
    let app = test::init_service(test_app(world.state, cors())).await;
    let cookie = register(&app, "angler").await;

    let (status, created) = call(
        &app,
        Some(&cookie),
        post("/api/v1/catches", json!({"species": "bass", "weight": 2.3})),
    )
    .await;
    assert_eq!(status, 201);
    assert_eq!(created["species"], json!("bass"));
    assert_eq!(created["weight"], json!(2.3));
    let uri = format!("/api/v1/catches/{}", id_of(&created));

    let (status, fetched) = call(&app, Some(&cookie), get(&uri)).await;
    assert_eq!(status, 200);
    assert_eq!(fetched, created);

    let (status, body) = call(&app, Some(&cookie), delete(&uri)).await;
    assert_eq!(status, 204);
    assert_eq!(body, Value::Null);

    let (status, error) = call(&app, Some(&cookie), get(&uri)).await;
    assert_eq!(status, 404);
    assert_eq!(error["error"], json!("NotFoundError"));
}

#[actix_web::test]
async fn invalid_catch_leaves_the_store_untouched() {
    let world = World::new();
    let store = world.store.clone();
    let app = test::init_service(test_app(world.state, cors())).await;
    let cookie = register(&app, "angler").await;

    let (status, error) = call(
        &app,
        Some(&cookie),
        post("/api/v1/catches", json!({"species": "", "weight": 1.0})),
    )
    .await;
    assert_eq!(status, 400);
    assert_eq!(error["error"], json!("ValidationError"));
    assert_eq!(store.catch_count(), 0);

    let (_, page) = call(&app, Some(&cookie), get("/api/v1/catches")).await;
    assert_eq!(page["total"], json!(0));
}

#[rstest]
#[case::update(true)]
#[case::delete(false)]
#[actix_web::test]
async fn unknown_ids_are_not_found(#[case] update: bool) {
    let world = World::new();
    let app = test::init_service(test_app(world.state, cors())).await;
    let cookie = register(&app, "angler").await;
    let uri = "/api/v1/catches/3fa85f64-5717-4562-b3fc-2c963f66afa6";

    let req = if update {
        put(uri, json!({"released": true}))
    } else {
        delete(uri)
    };
    let (status, error) = call(&app, Some(&cookie), req).await;
    assert_eq!(status, 404);
    assert_eq!(error["error"], json!("NotFoundError"));
}

#[actix_web::test]
async fn concurrent_creates_get_distinct_ids() {
    let world = World::new();
    let store = world.store.clone();
    let app = test::init_service(test_app(world.state, cors())).await;
    let cookie = register(&app, "angler").await;

    let requests = (0..16).map(|n| {
        call(
            &app,
            Some(&cookie),
            post("/api/v1/catches", json!({"species": format!("roach {n}")})),
        )
    });
    let responses = join_all(requests).await;

    let ids: HashSet<String> = responses
        .iter()
        .map(|(status, body)| {
            assert_eq!(*status, 201);
            id_of(body)
        })
        .collect();
    assert_eq!(ids.len(), 16);
    assert_eq!(store.catch_count(), 16);
}

#[actix_web::test]
async fn page_totals_follow_the_filters() {
    let world = World::new();
    let app = test::init_service(test_app(world.state, cors())).await;
    let cookie = register(&app, "angler").await;
    let location = create_location(&app, &cookie, "Mill Pond").await;
    let session = create_session(&app, &cookie, &location, "06:00", "08:00").await;

    for n in 0..7 {
        let body = json!({
            "species": if n % 2 == 0 { "Common Carp" } else { "tench" },
            "sessionId": session,
            "released": n < 3,
        });
        let (status, _) = call(&app, Some(&cookie), post("/api/v1/catches", body)).await;
        assert_eq!(status, 201);
    }

    let (_, first) = call(&app, Some(&cookie), get("/api/v1/catches?perPage=5")).await;
    assert_eq!(first["total"], json!(7));
    assert_eq!(first["pages"], json!(2));
    assert_eq!(first["items"].as_array().map(Vec::len), Some(5));

    let (_, carp) = call(&app, Some(&cookie), get("/api/v1/catches?species=carp&perPage=2")).await;
    assert_eq!(carp["total"], json!(4));
    assert_eq!(carp["pages"], json!(2));

    let (_, past_end) = call(&app, Some(&cookie), get("/api/v1/catches?page=9")).await;
    assert_eq!(past_end["total"], json!(7));
    assert_eq!(past_end["items"], json!([]));

    let (status, in_session) = call(
        &app,
        Some(&cookie),
        get(&format!("/api/v1/sessions/{session}/catches")),
    )
    .await;
    assert_eq!(status, 200);
    assert_eq!(in_session.as_array().map(Vec::len), Some(7));
}

#[actix_web::test]
async fn moving_a_catch_between_sessions_checks_ownership() {
    let world = World::new();
    let app = test::init_service(test_app(world.state, cors())).await;
    let owner = register(&app, "owner").await;
    let other = register(&app, "other").await;
    let location = create_location(&app, &owner, "Weir").await;
    let session = create_session(&app, &owner, &location, "05:00", "07:00").await;
    let foreign_location = create_location(&app, &other, "Weir").await;
    let foreign_session =
        create_session(&app, &other, &foreign_location, "05:00", "07:00").await;

    let (_, created) = call(
        &app,
        Some(&owner),
        post("/api/v1/catches", json!({"species": "chub"})),
    )
    .await;
    let uri = format!("/api/v1/catches/{}", id_of(&created));

    let (status, moved) = call(&app, Some(&owner), put(&uri, json!({"sessionId": session}))).await;
    assert_eq!(status, 200);
    assert_eq!(moved["sessionId"], json!(session));

    let (status, _) = call(
        &app,
        Some(&owner),
        put(&uri, json!({"sessionId": foreign_session})),
    )
    .await;
    assert_eq!(status, 404);

    let (status, detached) = call(&app, Some(&owner), put(&uri, json!({"sessionId": null}))).await;
    assert_eq!(status, 200);
    assert_eq!(detached["sessionId"], Value::Null);
}
