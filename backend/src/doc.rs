//! OpenAPI documentation configuration.
//!
//! [`ApiDoc`] registers every handler under `/api/v1`, the health checks, the
//! request and response bodies, and the session cookie security scheme. The
//! document backs Swagger UI in debug builds and is printed by the
//! `openapi-dump` binary.

use utoipa::openapi::security::{ApiKey, ApiKeyValue, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::domain::{BaitStats, LocationStats, MonthlyStats, OverviewStats, SpeciesStats};
use crate::inbound::http::accounts::{
    ChangePasswordRequest, LoginRequest, RegisterRequest, UserResponse,
};
use crate::inbound::http::catches::{
    CatchPageSchema, CatchResponse, CreateCatchRequest, UpdateCatchRequest,
};
use crate::inbound::http::fishing_sessions::{
    CreateSessionRequest, SessionPageSchema, SessionResponse, SessionWithCatchesResponse,
    UpdateSessionRequest,
};
use crate::inbound::http::locations::{
    CreateLocationRequest, LocationResponse, UpdateLocationRequest,
};
use crate::inbound::http::schemas::{ErrorCodeSchema, ErrorSchema};
use crate::inbound::http::session_config::SESSION_COOKIE_NAME;
use crate::inbound::http::stats::RecentActivityResponse;

/// Enrich the generated document with the session cookie security scheme.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);

        components.add_security_scheme(
            "SessionCookie",
            SecurityScheme::ApiKey(ApiKey::Cookie(ApiKeyValue::with_description(
                SESSION_COOKIE_NAME,
                "Session cookie issued by POST /api/v1/auth/register or /api/v1/auth/login.",
            ))),
        );
    }
}

/// OpenAPI document for the REST API.
#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "Fishing log API",
        description = "Session-authenticated CRUD over fishing locations, sessions and catches, with statistics."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    security(("SessionCookie" = [])),
    paths(
        crate::inbound::http::accounts::register,
        crate::inbound::http::accounts::login,
        crate::inbound::http::accounts::logout,
        crate::inbound::http::accounts::current_user,
        crate::inbound::http::accounts::change_password,
        crate::inbound::http::locations::list_locations,
        crate::inbound::http::locations::create_location,
        crate::inbound::http::locations::get_location,
        crate::inbound::http::locations::update_location,
        crate::inbound::http::locations::delete_location,
        crate::inbound::http::fishing_sessions::list_sessions,
        crate::inbound::http::fishing_sessions::create_session,
        crate::inbound::http::fishing_sessions::get_session,
        crate::inbound::http::fishing_sessions::update_session,
        crate::inbound::http::fishing_sessions::delete_session,
        crate::inbound::http::fishing_sessions::list_session_catches,
        crate::inbound::http::catches::list_catches,
        crate::inbound::http::catches::create_catch,
        crate::inbound::http::catches::get_catch,
        crate::inbound::http::catches::update_catch,
        crate::inbound::http::catches::delete_catch,
        crate::inbound::http::stats::overview,
        crate::inbound::http::stats::species,
        crate::inbound::http::stats::locations,
        crate::inbound::http::stats::baits,
        crate::inbound::http::stats::monthly,
        crate::inbound::http::stats::recent,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        ErrorSchema,
        ErrorCodeSchema,
        RegisterRequest,
        LoginRequest,
        ChangePasswordRequest,
        UserResponse,
        CreateLocationRequest,
        UpdateLocationRequest,
        LocationResponse,
        CreateSessionRequest,
        UpdateSessionRequest,
        SessionResponse,
        SessionWithCatchesResponse,
        SessionPageSchema,
        CreateCatchRequest,
        UpdateCatchRequest,
        CatchResponse,
        CatchPageSchema,
        OverviewStats,
        SpeciesStats,
        LocationStats,
        BaitStats,
        MonthlyStats,
        RecentActivityResponse,
    )),
    tags(
        (name = "accounts", description = "Registration, sign-in and password changes"),
        (name = "locations", description = "Named fishing spots"),
        (name = "sessions", description = "Outings at a location"),
        (name = "catches", description = "Individual fish"),
        (name = "stats", description = "Aggregates over the caller's log"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    //! Tests verifying the generated document's coverage.

    use super::*;
    use rstest::rstest;
    use utoipa::openapi::RefOr;
    use utoipa::openapi::schema::Schema;

    fn schema_fields(name: &str) -> Vec<String> {
        let doc = ApiDoc::openapi();
        let schemas = &doc.components.as_ref().expect("components").schemas;
        match schemas.get(name) {
            Some(RefOr::T(Schema::Object(obj))) => obj.properties.keys().cloned().collect(),
            Some(_) => panic!("{name} is not an inline object schema"),
            None => panic!("{name} is not registered"),
        }
    }

    #[rstest]
    #[case("/api/v1/auth/register")]
    #[case("/api/v1/locations/{id}")]
    #[case("/api/v1/sessions/{id}/catches")]
    #[case("/api/v1/catches")]
    #[case("/api/v1/stats/recent")]
    #[case("/health/ready")]
    fn documents_paths(#[case] path: &str) {
        let doc = ApiDoc::openapi();
        assert!(doc.paths.paths.contains_key(path), "missing {path}");
    }

    #[rstest]
    fn catch_schema_uses_wire_names() {
        let fields = schema_fields("CatchResponse");
        for field in ["sessionId", "photoUrl", "createdAt", "released"] {
            assert!(fields.iter().any(|name| name == field), "missing {field}");
        }
    }

    #[rstest]
    fn error_schema_is_registered() {
        let fields = schema_fields("crate.domain.Error");
        assert!(fields.iter().any(|name| name == "error"));
        assert!(fields.iter().any(|name| name == "message"));
    }

    #[rstest]
    fn session_cookie_scheme_is_registered() {
        let doc = ApiDoc::openapi();
        let components = doc.components.expect("components");
        assert!(components.security_schemes.contains_key("SessionCookie"));
    }
}
