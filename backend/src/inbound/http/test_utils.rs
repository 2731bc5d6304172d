//! Test helpers for inbound HTTP components.

use std::sync::Arc;

use actix_session::{SessionMiddleware, storage::CookieSessionStore};
use actix_web::body::MessageBody;
use actix_web::cookie::{Cookie, Key};
use actix_web::dev::{Service, ServiceResponse};
use actix_web::test;
use serde_json::{Value, json};

use super::session_config::{SESSION_COOKIE_NAME, SessionSettings, session_middleware};
use crate::middleware::CorsPolicy;
use crate::test_support::{InMemoryStore, MutableClock, http_state};

/// Production session middleware with a fresh key and the `Secure` flag
/// off so plain-HTTP test requests round-trip the cookie.
pub fn test_session_middleware() -> SessionMiddleware<CookieSessionStore> {
    session_middleware(&SessionSettings {
        key: Key::generate(),
        cookie_secure: false,
    })
}

pub const TEST_ORIGIN: &str = "http://localhost:3000";

/// Store, clock and state for one handler test.
pub struct Harness {
    pub store: Arc<InMemoryStore>,
    pub clock: Arc<MutableClock>,
    pub state: super::state::HttpState,
}

impl Harness {
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

    pub fn cors() -> CorsPolicy {
        CorsPolicy::from_origins([TEST_ORIGIN]).expect("valid test origin")
    }
}

/// Extract the session cookie a response sets.
pub fn session_cookie<B>(res: &ServiceResponse<B>) -> Cookie<'static> {
    res.response()
        .cookies()
        .find(|cookie| cookie.name() == SESSION_COOKIE_NAME)
        .expect("session cookie")
        .into_owned()
}

/// Register `username` and return its session cookie.
pub async fn sign_up<S, B>(app: &S, username: &str) -> Cookie<'static>
where
    S: Service<actix_http::Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
    B: MessageBody,
{
    let req = test::TestRequest::post()
        .uri("/api/v1/auth/register")
        .set_json(json!({
            "email": format!("{username}@example.org"),
            "username": username,
            "password": "tightlines",
        }))
        .to_request();
    let res = test::call_service(app, req).await;
    assert_eq!(res.status().as_u16(), 201, "registration should succeed");
    session_cookie(&res)
}

/// Read a JSON body and return it with the status code.
pub async fn status_and_json<B>(res: ServiceResponse<B>) -> (u16, Value)
where
    B: MessageBody,
{
    let status = res.status().as_u16();
    let bytes = test::read_body(res).await;
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).expect("JSON body")
    };
    (status, body)
}
