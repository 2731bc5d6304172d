//! Shared HTTP helpers for end-to-end tests over the in-memory store.

#![allow(dead_code, reason = "each test binary uses a different subset")]

use std::sync::Arc;

use actix_http::Request;
use actix_web::body::MessageBody;
use actix_web::cookie::Cookie;
use actix_web::dev::{Service, ServiceResponse};
use actix_web::test::{self, TestRequest};
use fishing_backend::inbound::http::session_config::SESSION_COOKIE_NAME;
use fishing_backend::inbound::http::state::HttpState;
use fishing_backend::middleware::CorsPolicy;
use fishing_backend::test_support::{InMemoryStore, MutableClock, http_state};
use serde_json::{Value, json};

pub const ALLOWED_ORIGIN: &str = "http://localhost:5173";

/// Store, clock and wired services for one test.
pub struct World {
    pub store: Arc<InMemoryStore>,
    pub clock: Arc<MutableClock>,
    pub state: HttpState,
}

impl World {
    pub fn new() -> Self {
        let store = Arc::new(InMemoryStore::new());
        let clock = Arc::new(MutableClock::fixed());
        let state = http_state(&store, clock.clone());
        Self {
            store,
            clock,
            state,
        }
    }
}

pub fn cors() -> CorsPolicy {
    CorsPolicy::from_origins(["http://localhost:3000", ALLOWED_ORIGIN]).expect("valid origins")
}

/// Send `req`, optionally with a session cookie, and decode the JSON body.
pub async fn call<S, B>(app: &S, cookie: Option<&Cookie<'static>>, req: TestRequest) -> (u16, Value)
where
    S: Service<Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
    B: MessageBody,
{
    let req = match cookie {
        Some(cookie) => req.cookie(cookie.clone()),
        None => req,
    };
    let res = test::call_service(app, req.to_request()).await;
    let status = res.status().as_u16();
    let bytes = test::read_body(res).await;
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).expect("JSON body")
    };
    (status, body)
}

/// Register `username` and return the session cookie.
pub async fn register<S, B>(app: &S, username: &str) -> Cookie<'static>
where
    S: Service<Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
    B: MessageBody,
{
    let req = TestRequest::post()
        .uri("/api/v1/auth/register")
        .set_json(json!({
            "email": format!("{username}@example.org"),
            "username": username,
            "password": "tightlines",
        }))
        .to_request();
    let res = test::call_service(app, req).await;
    assert_eq!(res.status().as_u16(), 201, "registration should succeed");
    res.response()
        .cookies()
        .find(|cookie| cookie.name() == SESSION_COOKIE_NAME)
        .expect("session cookie")
        .into_owned()
}

pub fn post(uri: &str, body: Value) -> TestRequest {
    TestRequest::post().uri(uri).set_json(body)
}

pub fn put(uri: &str, body: Value) -> TestRequest {
    TestRequest::put().uri(uri).set_json(body)
}

pub fn get(uri: &str) -> TestRequest {
    TestRequest::get().uri(uri)
}

pub fn delete(uri: &str) -> TestRequest {
    TestRequest::delete().uri(uri)
}

/// The `id` of a created resource.
pub fn id_of(body: &Value) -> String {
    body["id"].as_str().expect("resource id").to_owned()
}

/// Create a location named `name` and return its id.
pub async fn create_location<S, B>(app: &S, cookie: &Cookie<'static>, name: &str) -> String
where
    S: Service<Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
    B: MessageBody,
{
    let (status, body) = call(
        app,
        Some(cookie),
        post(
            "/api/v1/locations",
            json!({"name": name, "latitude": 52.2, "longitude": 0.12}),
        ),
    )
    .await;
    assert_eq!(status, 201, "location should be created: {body}");
    id_of(&body)
}

/// Create a session at `location_id` and return its id.
pub async fn create_session<S, B>(
    app: &S,
    cookie: &Cookie<'static>,
    location_id: &str,
    start: &str,
    end: &str,
) -> String
where
    S: Service<Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
    B: MessageBody,
{
    let (status, body) = call(
        app,
        Some(cookie),
        post(
            "/api/v1/sessions",
            json!({
                "locationId": location_id,
                "date": "2026-03-14",
                "startTime": start,
                "endTime": end,
            }),
        ),
    )
    .await;
    assert_eq!(status, 201, "session should be created: {body}");
    id_of(&body)
}
