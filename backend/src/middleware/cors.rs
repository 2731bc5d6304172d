//! Allow-list CORS policy.
//!
//! [`CorsPolicy`] is parsed once at startup from configuration and turned
//! into an [`actix_cors::Cors`] middleware per worker. Browsers only see
//! `Access-Control-Allow-*` headers for origins on the list; a pre-flight
//! from any other origin is rejected and carries no CORS headers. Simple
//! requests from unknown origins still reach the handlers, so the browser is
//! the one refusing to expose the response. Requests without an `Origin`
//! header pass through untouched.

use std::collections::BTreeSet;

use actix_cors::Cors;
use actix_web::http::header;
use url::Url;

/// Methods advertised to pre-flight requests.
pub const DEFAULT_METHODS: &[&str] = &["GET", "POST", "PUT", "DELETE", "OPTIONS"];
/// Pre-flight cache lifetime in seconds.
pub const DEFAULT_MAX_AGE_SECS: usize = 3600;
/// Response header exposed to browser scripts.
pub const TRACE_ID_HEADER: &str = "trace-id";

/// Rejected CORS configuration.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CorsConfigError {
    #[error("allowed origin '{0}' is not an absolute http(s) origin")]
    InvalidOrigin(String),
    #[error("allowed origin list is empty")]
    NoOrigins,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum AllowedOrigins {
    Any,
    List(BTreeSet<String>),
}

/// Normalise an origin to `scheme://host[:port]`, dropping default ports,
/// paths and trailing slashes.
fn normalise_origin(raw: &str) -> Option<String> {
    let url = Url::parse(raw.trim()).ok()?;
    if !matches!(url.scheme(), "http" | "https") {
        return None;
    }
    let origin = url.origin();
    origin
        .is_tuple()
        .then(|| origin.ascii_serialization())
}

/// Immutable CORS policy.
///
/// # Examples
/// ```
/// use fishing_backend::middleware::cors::CorsPolicy;
///
/// let policy = CorsPolicy::from_origins(["http://localhost:3000/"]).unwrap();
/// assert!(policy.allows("http://localhost:3000"));
/// assert!(!policy.allows("https://evil.example"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CorsPolicy {
    origins: AllowedOrigins,
    max_age: usize,
}

impl CorsPolicy {
    /// Build a policy with the default methods, headers and max-age. A lone
    /// `*` entry allows every origin.
    ///
    /// # Errors
    /// Returns [`CorsConfigError`] for an empty list or an entry that is not
    /// an http(s) origin.
    pub fn from_origins<I, S>(origins: I) -> Result<Self, CorsConfigError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut list = BTreeSet::new();
        let mut any = false;
        for raw in origins {
            let raw = raw.as_ref().trim();
            if raw.is_empty() {
                continue;
            }
            if raw == "*" {
                any = true;
                continue;
            }
            let origin =
                normalise_origin(raw).ok_or_else(|| CorsConfigError::InvalidOrigin(raw.to_owned()))?;
            list.insert(origin);
        }
        let origins = if any {
            AllowedOrigins::Any
        } else if list.is_empty() {
            return Err(CorsConfigError::NoOrigins);
        } else {
            AllowedOrigins::List(list)
        };
        Ok(Self {
            origins,
            max_age: DEFAULT_MAX_AGE_SECS,
        })
    }

    /// Override the pre-flight cache lifetime.
    #[must_use]
    pub fn with_max_age(mut self, seconds: usize) -> Self {
        self.max_age = seconds;
        self
    }

    /// Whether a request from `origin` may read responses.
    pub fn allows(&self, origin: &str) -> bool {
        match &self.origins {
            AllowedOrigins::Any => true,
            AllowedOrigins::List(list) => {
                normalise_origin(origin).is_some_and(|origin| list.contains(&origin))
            }
        }
    }

    /// Build the middleware for one worker.
    ///
    /// An explicit list echoes the caller's origin and allows credentials so
    /// the session cookie travels; the wildcard sends `*` without them.
    ///
    /// # Examples
    /// ```
    /// use actix_web::App;
    /// use fishing_backend::middleware::cors::CorsPolicy;
    ///
    /// let policy = CorsPolicy::from_origins(["*"]).unwrap();
    /// let _app = App::new().wrap(policy.middleware());
    /// ```
    pub fn middleware(&self) -> Cors {
        let base = Cors::default()
            .allowed_methods(DEFAULT_METHODS.iter().copied())
            .allowed_headers([
                header::CONTENT_TYPE,
                header::AUTHORIZATION,
                header::HeaderName::from_static(TRACE_ID_HEADER),
            ])
            .expose_headers([header::HeaderName::from_static(TRACE_ID_HEADER)])
            .max_age(self.max_age)
            .block_on_origin_mismatch(false);
        match &self.origins {
            AllowedOrigins::Any => base.allow_any_origin().send_wildcard(),
            AllowedOrigins::List(list) => list
                .iter()
                .fold(base, |cors, origin| cors.allowed_origin(origin))
                .supports_credentials(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::http::Method;
    use actix_web::http::header::HeaderValue;
    use actix_web::{App, HttpResponse, web};
    use rstest::rstest;

    fn policy() -> CorsPolicy {
        CorsPolicy::from_origins(["http://localhost:3000", "https://app.example.org/"])
            .expect("valid origins")
    }

    #[rstest]
    #[case("http://localhost:3000", true)]
    #[case("https://app.example.org", true)]
    #[case("https://app.example.org:443", true)]
    #[case("http://localhost:3001", false)]
    #[case("http://app.example.org", false)]
    #[case("null", false)]
    fn allow_list_compares_normalised_origins(#[case] origin: &str, #[case] allowed: bool) {
        assert_eq!(policy().allows(origin), allowed);
    }

    #[rstest]
    #[case(&["ftp://files.example.org"])]
    #[case(&["not a url"])]
    fn invalid_origins_are_rejected(#[case] origins: &[&str]) {
        assert!(matches!(
            CorsPolicy::from_origins(origins.iter().copied()),
            Err(CorsConfigError::InvalidOrigin(_))
        ));
    }

    #[rstest]
    fn blank_lists_are_rejected() {
        assert_eq!(
            CorsPolicy::from_origins([" ", ""]),
            Err(CorsConfigError::NoOrigins)
        );
    }

    macro_rules! app {
        ($policy:expr) => {
            actix_web::test::init_service(
                App::new()
                    .wrap($policy.middleware())
                    .route("/ping", web::get().to(|| async { HttpResponse::Ok().body("pong") })),
            )
            .await
        };
    }

    fn preflight(origin: &str) -> actix_web::test::TestRequest {
        actix_web::test::TestRequest::default()
            .method(Method::OPTIONS)
            .uri("/ping")
            .insert_header((header::ORIGIN, origin))
            .insert_header((header::ACCESS_CONTROL_REQUEST_METHOD, "GET"))
    }

    fn get_from(origin: &str) -> actix_web::test::TestRequest {
        actix_web::test::TestRequest::get()
            .uri("/ping")
            .insert_header((header::ORIGIN, origin))
    }

    #[actix_web::test]
    async fn preflight_from_allowed_origin_is_answered() {
        let app = app!(policy());
        let res =
            actix_web::test::call_service(&app, preflight("http://localhost:3000").to_request())
                .await;

        assert!(res.status().is_success());
        let headers = res.headers();
        assert_eq!(
            headers.get(header::ACCESS_CONTROL_ALLOW_ORIGIN),
            Some(&HeaderValue::from_static("http://localhost:3000"))
        );
        assert_eq!(
            headers.get(header::ACCESS_CONTROL_ALLOW_CREDENTIALS),
            Some(&HeaderValue::from_static("true"))
        );
        assert!(headers.contains_key(header::ACCESS_CONTROL_ALLOW_METHODS));
        assert_eq!(
            headers.get(header::ACCESS_CONTROL_MAX_AGE),
            Some(&HeaderValue::from_static("3600"))
        );
    }

    #[actix_web::test]
    async fn preflight_from_unknown_origin_is_refused() {
        let app = app!(policy());
        let res =
            actix_web::test::call_service(&app, preflight("https://evil.example").to_request())
                .await;

        assert!(res.status().is_client_error());
        assert!(!res.headers().contains_key(header::ACCESS_CONTROL_ALLOW_ORIGIN));
    }

    #[actix_web::test]
    async fn simple_request_from_unknown_origin_gets_no_cors_headers() {
        let app = app!(policy());
        let res =
            actix_web::test::call_service(&app, get_from("https://evil.example").to_request())
                .await;

        assert!(res.status().is_success());
        assert!(!res.headers().contains_key(header::ACCESS_CONTROL_ALLOW_ORIGIN));
    }

    #[rstest]
    #[case("http://localhost:3000")]
    #[case("https://evil.example")]
    #[actix_web::test]
    async fn responses_vary_on_origin_for_every_caller(#[case] origin: &str) {
        let app = app!(policy());
        let res = actix_web::test::call_service(&app, get_from(origin).to_request()).await;

        let vary = res
            .headers()
            .get_all(header::VARY)
            .filter_map(|value| value.to_str().ok())
            .collect::<Vec<_>>()
            .join(",");
        assert!(vary.contains("Origin"), "vary was {vary:?}");
    }

    #[actix_web::test]
    async fn simple_request_from_allowed_origin_exposes_trace_id() {
        let app = app!(policy());
        let res =
            actix_web::test::call_service(&app, get_from("http://localhost:3000").to_request())
                .await;

        assert_eq!(
            res.headers().get(header::ACCESS_CONTROL_ALLOW_ORIGIN),
            Some(&HeaderValue::from_static("http://localhost:3000"))
        );
        let exposed = res
            .headers()
            .get(header::ACCESS_CONTROL_EXPOSE_HEADERS)
            .and_then(|value| value.to_str().ok())
            .unwrap_or_default()
            .to_ascii_lowercase();
        assert!(exposed.contains(TRACE_ID_HEADER));
    }

    #[actix_web::test]
    async fn requests_without_origin_pass_through() {
        let app = app!(policy());
        let req = actix_web::test::TestRequest::get().uri("/ping").to_request();
        let res = actix_web::test::call_service(&app, req).await;

        assert!(res.status().is_success());
        assert!(!res.headers().contains_key(header::ACCESS_CONTROL_ALLOW_ORIGIN));
    }

    #[actix_web::test]
    async fn wildcard_allows_any_origin_without_credentials() {
        let app = app!(CorsPolicy::from_origins(["*"]).expect("wildcard"));
        let res = actix_web::test::call_service(
            &app,
            get_from("https://anywhere.example").to_request(),
        )
        .await;

        assert_eq!(
            res.headers().get(header::ACCESS_CONTROL_ALLOW_ORIGIN),
            Some(&HeaderValue::from_static("*"))
        );
        assert!(!res
            .headers()
            .contains_key(header::ACCESS_CONTROL_ALLOW_CREDENTIALS));
    }
}
