//! Fishing session API handlers.
//!
//! ```text
//! GET /api/v1/sessions?page=1&perPage=10&locationId=<uuid>
//! POST /api/v1/sessions {"locationId":"<uuid>","date":"2026-03-14","startTime":"22:00","endTime":"02:00"}
//! GET /api/v1/sessions/{id}
//! PUT /api/v1/sessions/{id} {"notes":null}
//! DELETE /api/v1/sessions/{id}
//! GET /api/v1/sessions/{id}/catches
//! ```

use actix_web::{HttpResponse, delete, get, post, put, web};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use crate::domain::ports::{FishingSessionFilter, FishingSessionWithCatches};
use crate::domain::{
    FishingSession, FishingSessionDetails, FishingSessionDraft, FishingSessionPatch,
    FishingSessionSummary,
};
use crate::inbound::http::ApiResult;
use crate::inbound::http::body::JsonBody;
use crate::inbound::http::catches::CatchResponse;
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{
    FieldName, double_option, page_request, parse_date, parse_optional_uuid, parse_time,
    parse_uuid, require,
};

/// Page size used when `perPage` is absent.
pub const DEFAULT_SESSIONS_PER_PAGE: u32 = 10;

const LOCATION_ID: FieldName = FieldName::new("locationId");
const DATE: FieldName = FieldName::new("date");
const START_TIME: FieldName = FieldName::new("startTime");
const END_TIME: FieldName = FieldName::new("endTime");

const TIME_FORMAT: &str = "%H:%M";

/// Create body. Dates are `YYYY-MM-DD`, times `HH:MM`.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateSessionRequest {
    pub location_id: Option<String>,
    #[schema(example = "2026-03-14")]
    pub date: Option<String>,
    #[schema(example = "22:00")]
    pub start_time: Option<String>,
    #[schema(example = "02:00")]
    pub end_time: Option<String>,
    pub weather_conditions: Option<String>,
    pub temperature_celsius: Option<f64>,
    pub notes: Option<String>,
}

impl CreateSessionRequest {
    fn parse(self) -> ApiResult<FishingSessionDetails> {
        let location_id = require(self.location_id, LOCATION_ID)?;
        let date = require(self.date, DATE)?;
        let start_time = require(self.start_time, START_TIME)?;
        let end_time = require(self.end_time, END_TIME)?;
        let draft = FishingSessionDraft {
            location_id: parse_uuid(&location_id, LOCATION_ID)?,
            date: parse_date(&date, DATE)?,
            start_time: parse_time(&start_time, START_TIME)?,
            end_time: parse_time(&end_time, END_TIME)?,
            weather_conditions: self.weather_conditions,
            temperature_celsius: self.temperature_celsius,
            notes: self.notes,
        };
        Ok(FishingSessionDetails::try_from(draft)?)
    }
}

/// Merge-style update body. Changing the date or either time recomputes
/// the duration.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateSessionRequest {
    pub location_id: Option<String>,
    pub date: Option<String>,
    pub start_time: Option<String>,
    pub end_time: Option<String>,
    #[serde(default, deserialize_with = "double_option")]
    #[schema(value_type = Option<String>)]
    pub weather_conditions: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    #[schema(value_type = Option<f64>)]
    pub temperature_celsius: Option<Option<f64>>,
    #[serde(default, deserialize_with = "double_option")]
    #[schema(value_type = Option<String>)]
    pub notes: Option<Option<String>>,
}

impl UpdateSessionRequest {
    fn parse(self) -> ApiResult<FishingSessionPatch> {
        Ok(FishingSessionPatch {
            location_id: parse_optional_uuid(self.location_id.as_deref(), LOCATION_ID)?,
            date: self
                .date
                .as_deref()
                .map(|raw| parse_date(raw, DATE))
                .transpose()?,
            start_time: self
                .start_time
                .as_deref()
                .map(|raw| parse_time(raw, START_TIME))
                .transpose()?,
            end_time: self
                .end_time
                .as_deref()
                .map(|raw| parse_time(raw, END_TIME))
                .transpose()?,
            weather_conditions: self.weather_conditions,
            temperature_celsius: self.temperature_celsius,
            notes: self.notes,
        })
    }
}

/// Listing filters and paging.
#[derive(Debug, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct SessionListQuery {
    /// One-based page number.
    pub page: Option<u32>,
    /// Page size, 1 to 100.
    pub per_page: Option<u32>,
    /// Only sessions held at this location.
    pub location_id: Option<String>,
}

/// Session as returned to clients. Listings and single reads carry the
/// location name and catch count; the recent-activity feed omits them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SessionResponse {
    pub id: Uuid,
    pub owner: Uuid,
    pub location_id: Uuid,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location_name: Option<String>,
    pub date: NaiveDate,
    #[schema(example = "22:00")]
    pub start_time: String,
    #[schema(example = "02:00")]
    pub end_time: String,
    pub duration_minutes: i32,
    pub weather_conditions: Option<String>,
    pub temperature_celsius: Option<f64>,
    pub notes: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub catches_count: Option<u64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<FishingSession> for SessionResponse {
    fn from(session: FishingSession) -> Self {
        let details = &session.details;
        Self {
            id: session.id,
            owner: *session.owner.as_uuid(),
            location_id: details.location_id(),
            location_name: None,
            date: details.date(),
            start_time: details.start_time().format(TIME_FORMAT).to_string(),
            end_time: details.end_time().format(TIME_FORMAT).to_string(),
            duration_minutes: details.duration_minutes(),
            weather_conditions: details.weather_conditions().map(str::to_owned),
            temperature_celsius: details.temperature_celsius(),
            notes: details.notes().map(str::to_owned),
            catches_count: None,
            created_at: session.created_at,
            updated_at: session.updated_at,
        }
    }
}

impl From<FishingSessionSummary> for SessionResponse {
    fn from(summary: FishingSessionSummary) -> Self {
        Self {
            location_name: Some(summary.location_name),
            catches_count: Some(summary.catches_count),
            ..Self::from(summary.session)
        }
    }
}

/// Single session read including its catches, oldest first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SessionWithCatchesResponse {
    #[serde(flatten)]
    pub session: SessionResponse,
    pub catches: Vec<CatchResponse>,
}

impl From<FishingSessionWithCatches> for SessionWithCatchesResponse {
    fn from(value: FishingSessionWithCatches) -> Self {
        Self {
            session: SessionResponse::from(value.summary),
            catches: value.catches.into_iter().map(CatchResponse::from).collect(),
        }
    }
}

/// Page envelope of sessions, for the OpenAPI document.
#[derive(ToSchema)]
#[schema(rename_all = "camelCase")]
pub struct SessionPageSchema {
    pub items: Vec<SessionResponse>,
    pub total: u64,
    pub pages: u64,
    pub current_page: u32,
    pub per_page: u32,
}

/// Page through the caller's sessions, latest first.
#[utoipa::path(
    get,
    path = "/api/v1/sessions",
    params(SessionListQuery),
    responses(
        (status = 200, description = "Sessions", body = SessionPageSchema),
        (status = 400, description = "Invalid query", body = ErrorSchema),
        (status = 401, description = "Not signed in", body = ErrorSchema)
    ),
    tags = ["sessions"],
    operation_id = "listSessions"
)]
#[get("/sessions")]
pub async fn list_sessions(
    state: web::Data<HttpState>,
    session: SessionContext,
    query: web::Query<SessionListQuery>,
) -> ApiResult<HttpResponse> {
    let owner = session.require_user_id()?;
    let query = query.into_inner();
    let filter = FishingSessionFilter {
        location_id: parse_optional_uuid(query.location_id.as_deref(), LOCATION_ID)?,
    };
    let page = page_request(query.page, query.per_page, DEFAULT_SESSIONS_PER_PAGE)?;
    let sessions = state
        .sessions_query
        .list_sessions(&owner, filter, page)
        .await?;
    Ok(HttpResponse::Ok().json(sessions.map(SessionResponse::from)))
}

/// Record a session at one of the caller's locations.
#[utoipa::path(
    post,
    path = "/api/v1/sessions",
    request_body = CreateSessionRequest,
    responses(
        (status = 201, description = "Session created", body = SessionResponse),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Not signed in", body = ErrorSchema),
        (status = 404, description = "Unknown location", body = ErrorSchema)
    ),
    tags = ["sessions"],
    operation_id = "createSession"
)]
#[post("/sessions")]
pub async fn create_session(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: JsonBody<CreateSessionRequest>,
) -> ApiResult<HttpResponse> {
    let owner = session.require_user_id()?;
    let details = payload.into_inner().parse()?;
    let created = state.sessions.create_session(&owner, details).await?;
    Ok(HttpResponse::Created().json(SessionResponse::from(created)))
}

/// Fetch one session with its catches.
#[utoipa::path(
    get,
    path = "/api/v1/sessions/{id}",
    params(("id" = Uuid, Path, description = "Session id")),
    responses(
        (status = 200, description = "Session", body = SessionWithCatchesResponse),
        (status = 401, description = "Not signed in", body = ErrorSchema),
        (status = 404, description = "Unknown session", body = ErrorSchema)
    ),
    tags = ["sessions"],
    operation_id = "getSession"
)]
#[get("/sessions/{id}")]
pub async fn get_session(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<Uuid>,
) -> ApiResult<web::Json<SessionWithCatchesResponse>> {
    let owner = session.require_user_id()?;
    let found = state
        .sessions_query
        .get_session(&owner, path.into_inner())
        .await?;
    Ok(web::Json(SessionWithCatchesResponse::from(found)))
}

/// Merge new attributes into a session.
#[utoipa::path(
    put,
    path = "/api/v1/sessions/{id}",
    params(("id" = Uuid, Path, description = "Session id")),
    request_body = UpdateSessionRequest,
    responses(
        (status = 200, description = "Session updated", body = SessionResponse),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Not signed in", body = ErrorSchema),
        (status = 404, description = "Unknown session or location", body = ErrorSchema)
    ),
    tags = ["sessions"],
    operation_id = "updateSession"
)]
#[put("/sessions/{id}")]
pub async fn update_session(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<Uuid>,
    payload: JsonBody<UpdateSessionRequest>,
) -> ApiResult<web::Json<SessionResponse>> {
    let owner = session.require_user_id()?;
    let patch = payload.into_inner().parse()?;
    let updated = state
        .sessions
        .update_session(&owner, path.into_inner(), patch)
        .await?;
    Ok(web::Json(SessionResponse::from(updated)))
}

/// Remove a session and every catch logged in it.
#[utoipa::path(
    delete,
    path = "/api/v1/sessions/{id}",
    params(("id" = Uuid, Path, description = "Session id")),
    responses(
        (status = 204, description = "Session and its catches deleted"),
        (status = 401, description = "Not signed in", body = ErrorSchema),
        (status = 404, description = "Unknown session", body = ErrorSchema)
    ),
    tags = ["sessions"],
    operation_id = "deleteSession"
)]
#[delete("/sessions/{id}")]
pub async fn delete_session(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<Uuid>,
) -> ApiResult<HttpResponse> {
    let owner = session.require_user_id()?;
    state
        .sessions
        .delete_session(&owner, path.into_inner())
        .await?;
    Ok(HttpResponse::NoContent().finish())
}

/// List the catches logged in one session.
#[utoipa::path(
    get,
    path = "/api/v1/sessions/{id}/catches",
    params(("id" = Uuid, Path, description = "Session id")),
    responses(
        (status = 200, description = "Catches", body = [CatchResponse]),
        (status = 401, description = "Not signed in", body = ErrorSchema),
        (status = 404, description = "Unknown session", body = ErrorSchema)
    ),
    tags = ["sessions"],
    operation_id = "listSessionCatches"
)]
#[get("/sessions/{id}/catches")]
pub async fn list_session_catches(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<Uuid>,
) -> ApiResult<web::Json<Vec<CatchResponse>>> {
    let owner = session.require_user_id()?;
    let catches = state
        .sessions_query
        .list_session_catches(&owner, path.into_inner())
        .await?;
    Ok(web::Json(
        catches.into_iter().map(CatchResponse::from).collect(),
    ))
}
