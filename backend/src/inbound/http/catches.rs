//! Catch API handlers.
//!
//! ```text
//! GET /api/v1/catches?page=1&perPage=20&species=perch&released=true
//! POST /api/v1/catches {"species":"bass","weight":2.3}
//! GET /api/v1/catches/{id}
//! PUT /api/v1/catches/{id} {"released":true,"photoUrl":null}
//! DELETE /api/v1/catches/{id}
//! ```

use actix_web::{HttpResponse, delete, get, post, put, web};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use crate::domain::{Catch, CatchDetails, CatchDraft, CatchFilter, CatchPatch};
use crate::inbound::http::ApiResult;
use crate::inbound::http::body::JsonBody;
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{
    FieldName, double_option, page_request, parse_optional_uuid, parse_uuid, require,
};

/// Page size used when `perPage` is absent.
pub const DEFAULT_CATCHES_PER_PAGE: u32 = 20;

const SESSION_ID: FieldName = FieldName::new("sessionId");
const SPECIES: FieldName = FieldName::new("species");

/// Create body. Only `species` is required.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateCatchRequest {
    #[schema(example = "3fa85f64-5717-4562-b3fc-2c963f66afa6")]
    pub session_id: Option<String>,
    #[schema(example = "bass")]
    pub species: Option<String>,
    #[schema(example = 2.3)]
    pub weight: Option<f64>,
    pub length: Option<f64>,
    pub bait: Option<String>,
    pub released: Option<bool>,
    pub photo_url: Option<String>,
}

impl CreateCatchRequest {
    fn parse(self) -> ApiResult<CatchDetails> {
        let draft = CatchDraft {
            session_id: parse_optional_uuid(self.session_id.as_deref(), SESSION_ID)?,
            species: require(self.species, SPECIES)?,
            weight: self.weight,
            length: self.length,
            bait: self.bait,
            released: self.released.unwrap_or(false),
            photo_url: self.photo_url,
        };
        Ok(CatchDetails::try_from(draft)?)
    }
}

/// Merge-style update body. `null` clears an optional attribute.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCatchRequest {
    #[serde(default, deserialize_with = "double_option")]
    #[schema(value_type = Option<String>)]
    pub session_id: Option<Option<String>>,
    pub species: Option<String>,
    #[serde(default, deserialize_with = "double_option")]
    #[schema(value_type = Option<f64>)]
    pub weight: Option<Option<f64>>,
    #[serde(default, deserialize_with = "double_option")]
    #[schema(value_type = Option<f64>)]
    pub length: Option<Option<f64>>,
    #[serde(default, deserialize_with = "double_option")]
    #[schema(value_type = Option<String>)]
    pub bait: Option<Option<String>>,
    pub released: Option<bool>,
    #[serde(default, deserialize_with = "double_option")]
    #[schema(value_type = Option<String>)]
    pub photo_url: Option<Option<String>>,
}

impl UpdateCatchRequest {
    fn parse(self) -> ApiResult<CatchPatch> {
        let session_id = match self.session_id {
            Some(Some(raw)) => Some(Some(parse_uuid(&raw, SESSION_ID)?)),
            Some(None) => Some(None),
            None => None,
        };
        Ok(CatchPatch {
            session_id,
            species: self.species,
            weight: self.weight,
            length: self.length,
            bait: self.bait,
            released: self.released,
            photo_url: self.photo_url,
        })
    }
}

/// Listing filters and paging.
#[derive(Debug, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct CatchListQuery {
    /// One-based page number.
    pub page: Option<u32>,
    /// Page size, 1 to 100.
    pub per_page: Option<u32>,
    /// Only catches of this session.
    pub session_id: Option<String>,
    /// Case-insensitive substring of the species.
    pub species: Option<String>,
    /// Only released (or only kept) fish.
    pub released: Option<bool>,
}

impl CatchListQuery {
    fn filter(&self) -> ApiResult<CatchFilter> {
        Ok(CatchFilter {
            session_id: parse_optional_uuid(self.session_id.as_deref(), SESSION_ID)?,
            species: self
                .species
                .as_deref()
                .map(str::trim)
                .filter(|needle| !needle.is_empty())
                .map(str::to_owned),
            released: self.released,
        })
    }
}

/// Catch as returned to clients.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CatchResponse {
    pub id: Uuid,
    pub owner: Uuid,
    pub session_id: Option<Uuid>,
    pub species: String,
    pub weight: Option<f64>,
    pub length: Option<f64>,
    pub bait: Option<String>,
    pub released: bool,
    pub photo_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Catch> for CatchResponse {
    fn from(catch: Catch) -> Self {
        let details = &catch.details;
        Self {
            id: catch.id,
            owner: *catch.owner.as_uuid(),
            session_id: details.session_id(),
            species: details.species().to_owned(),
            weight: details.weight(),
            length: details.length(),
            bait: details.bait().map(str::to_owned),
            released: details.released(),
            photo_url: details.photo_url().map(str::to_owned),
            created_at: catch.created_at,
            updated_at: catch.updated_at,
        }
    }
}

/// Page envelope of catches, for the OpenAPI document.
#[derive(ToSchema)]
#[schema(rename_all = "camelCase")]
pub struct CatchPageSchema {
    pub items: Vec<CatchResponse>,
    pub total: u64,
    pub pages: u64,
    pub current_page: u32,
    pub per_page: u32,
}

/// Page through the caller's catches, newest first.
#[utoipa::path(
    get,
    path = "/api/v1/catches",
    params(CatchListQuery),
    responses(
        (status = 200, description = "Catches", body = CatchPageSchema),
        (status = 400, description = "Invalid query", body = ErrorSchema),
        (status = 401, description = "Not signed in", body = ErrorSchema)
    ),
    tags = ["catches"],
    operation_id = "listCatches"
)]
#[get("/catches")]
pub async fn list_catches(
    state: web::Data<HttpState>,
    session: SessionContext,
    query: web::Query<CatchListQuery>,
) -> ApiResult<HttpResponse> {
    let owner = session.require_user_id()?;
    let query = query.into_inner();
    let filter = query.filter()?;
    let page = page_request(query.page, query.per_page, DEFAULT_CATCHES_PER_PAGE)?;
    let catches = state
        .catches_query
        .list_catches(&owner, &filter, page)
        .await?;
    Ok(HttpResponse::Ok().json(catches.map(CatchResponse::from)))
}

/// Log a catch, optionally inside one of the caller's sessions.
#[utoipa::path(
    post,
    path = "/api/v1/catches",
    request_body = CreateCatchRequest,
    responses(
        (status = 201, description = "Catch created", body = CatchResponse),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Not signed in", body = ErrorSchema),
        (status = 404, description = "Unknown session", body = ErrorSchema)
    ),
    tags = ["catches"],
    operation_id = "createCatch"
)]
#[post("/catches")]
pub async fn create_catch(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: JsonBody<CreateCatchRequest>,
) -> ApiResult<HttpResponse> {
    let owner = session.require_user_id()?;
    let details = payload.into_inner().parse()?;
    let catch = state.catches.create_catch(&owner, details).await?;
    Ok(HttpResponse::Created().json(CatchResponse::from(catch)))
}

/// Fetch one catch.
#[utoipa::path(
    get,
    path = "/api/v1/catches/{id}",
    params(("id" = Uuid, Path, description = "Catch id")),
    responses(
        (status = 200, description = "Catch", body = CatchResponse),
        (status = 401, description = "Not signed in", body = ErrorSchema),
        (status = 404, description = "Unknown catch", body = ErrorSchema)
    ),
    tags = ["catches"],
    operation_id = "getCatch"
)]
#[get("/catches/{id}")]
pub async fn get_catch(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<Uuid>,
) -> ApiResult<web::Json<CatchResponse>> {
    let owner = session.require_user_id()?;
    let catch = state
        .catches_query
        .get_catch(&owner, path.into_inner())
        .await?;
    Ok(web::Json(CatchResponse::from(catch)))
}

/// Merge new attributes into a catch.
#[utoipa::path(
    put,
    path = "/api/v1/catches/{id}",
    params(("id" = Uuid, Path, description = "Catch id")),
    request_body = UpdateCatchRequest,
    responses(
        (status = 200, description = "Catch updated", body = CatchResponse),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Not signed in", body = ErrorSchema),
        (status = 404, description = "Unknown catch or session", body = ErrorSchema)
    ),
    tags = ["catches"],
    operation_id = "updateCatch"
)]
#[put("/catches/{id}")]
pub async fn update_catch(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<Uuid>,
    payload: JsonBody<UpdateCatchRequest>,
) -> ApiResult<web::Json<CatchResponse>> {
    let owner = session.require_user_id()?;
    let patch = payload.into_inner().parse()?;
    let catch = state
        .catches
        .update_catch(&owner, path.into_inner(), patch)
        .await?;
    Ok(web::Json(CatchResponse::from(catch)))
}

/// Remove a catch.
#[utoipa::path(
    delete,
    path = "/api/v1/catches/{id}",
    params(("id" = Uuid, Path, description = "Catch id")),
    responses(
        (status = 204, description = "Catch deleted"),
        (status = 401, description = "Not signed in", body = ErrorSchema),
        (status = 404, description = "Unknown catch", body = ErrorSchema)
    ),
    tags = ["catches"],
    operation_id = "deleteCatch"
)]
#[delete("/catches/{id}")]
pub async fn delete_catch(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<Uuid>,
) -> ApiResult<HttpResponse> {
    let owner = session.require_user_id()?;
    state
        .catches
        .delete_catch(&owner, path.into_inner())
        .await?;
    Ok(HttpResponse::NoContent().finish())
}

#[cfg(test)]
#[path = "catches_tests.rs"]
mod tests;
