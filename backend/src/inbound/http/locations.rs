//! Location API handlers.
//!
//! ```text
//! GET /api/v1/locations
//! POST /api/v1/locations {"name":"Mill Pond","latitude":51.5,"longitude":-0.12}
//! GET /api/v1/locations/{id}
//! PUT /api/v1/locations/{id} {"description":null}
//! DELETE /api/v1/locations/{id}
//! ```

use actix_web::{HttpResponse, delete, get, post, put, web};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::domain::{Location, LocationDetails, LocationDraft, LocationPatch};
use crate::inbound::http::ApiResult;
use crate::inbound::http::body::JsonBody;
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{FieldName, double_option, require};

const NAME: FieldName = FieldName::new("name");
const LATITUDE: FieldName = FieldName::new("latitude");
const LONGITUDE: FieldName = FieldName::new("longitude");

/// Create body.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateLocationRequest {
    #[schema(example = "Mill Pond")]
    pub name: Option<String>,
    #[schema(example = 51.5)]
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub description: Option<String>,
}

impl CreateLocationRequest {
    fn parse(self) -> ApiResult<LocationDetails> {
        let draft = LocationDraft {
            name: require(self.name, NAME)?,
            latitude: require(self.latitude, LATITUDE)?,
            longitude: require(self.longitude, LONGITUDE)?,
            description: self.description,
        };
        Ok(LocationDetails::try_from(draft)?)
    }
}

/// Merge-style update body. Absent fields stay unchanged; an explicit
/// `null` description clears it.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateLocationRequest {
    pub name: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    #[serde(default, deserialize_with = "double_option")]
    #[schema(value_type = Option<String>)]
    pub description: Option<Option<String>>,
}

impl From<UpdateLocationRequest> for LocationPatch {
    fn from(request: UpdateLocationRequest) -> Self {
        Self {
            name: request.name,
            latitude: request.latitude,
            longitude: request.longitude,
            description: request.description,
        }
    }
}

/// Location as returned to clients.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LocationResponse {
    pub id: Uuid,
    pub owner: Uuid,
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Location> for LocationResponse {
    fn from(location: Location) -> Self {
        let details = &location.details;
        Self {
            id: location.id,
            owner: *location.owner.as_uuid(),
            name: details.name().to_owned(),
            latitude: details.latitude(),
            longitude: details.longitude(),
            description: details.description().map(str::to_owned),
            created_at: location.created_at,
            updated_at: location.updated_at,
        }
    }
}

/// List the caller's locations ordered by name.
#[utoipa::path(
    get,
    path = "/api/v1/locations",
    responses(
        (status = 200, description = "Locations", body = [LocationResponse]),
        (status = 401, description = "Not signed in", body = ErrorSchema)
    ),
    tags = ["locations"],
    operation_id = "listLocations"
)]
#[get("/locations")]
pub async fn list_locations(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<web::Json<Vec<LocationResponse>>> {
    let owner = session.require_user_id()?;
    let locations = state.locations_query.list_locations(&owner).await?;
    Ok(web::Json(
        locations.into_iter().map(LocationResponse::from).collect(),
    ))
}

/// Record a new location.
#[utoipa::path(
    post,
    path = "/api/v1/locations",
    request_body = CreateLocationRequest,
    responses(
        (status = 201, description = "Location created", body = LocationResponse),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Not signed in", body = ErrorSchema),
        (status = 409, description = "Name already used", body = ErrorSchema)
    ),
    tags = ["locations"],
    operation_id = "createLocation"
)]
#[post("/locations")]
pub async fn create_location(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: JsonBody<CreateLocationRequest>,
) -> ApiResult<HttpResponse> {
    let owner = session.require_user_id()?;
    let details = payload.into_inner().parse()?;
    let location = state.locations.create_location(&owner, details).await?;
    Ok(HttpResponse::Created().json(LocationResponse::from(location)))
}

/// Fetch one location.
#[utoipa::path(
    get,
    path = "/api/v1/locations/{id}",
    params(("id" = Uuid, Path, description = "Location id")),
    responses(
        (status = 200, description = "Location", body = LocationResponse),
        (status = 401, description = "Not signed in", body = ErrorSchema),
        (status = 404, description = "Unknown location", body = ErrorSchema)
    ),
    tags = ["locations"],
    operation_id = "getLocation"
)]
#[get("/locations/{id}")]
pub async fn get_location(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<Uuid>,
) -> ApiResult<web::Json<LocationResponse>> {
    let owner = session.require_user_id()?;
    let location = state
        .locations_query
        .get_location(&owner, path.into_inner())
        .await?;
    Ok(web::Json(LocationResponse::from(location)))
}

/// Merge new attributes into a location.
#[utoipa::path(
    put,
    path = "/api/v1/locations/{id}",
    params(("id" = Uuid, Path, description = "Location id")),
    request_body = UpdateLocationRequest,
    responses(
        (status = 200, description = "Location updated", body = LocationResponse),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Not signed in", body = ErrorSchema),
        (status = 404, description = "Unknown location", body = ErrorSchema),
        (status = 409, description = "Name already used", body = ErrorSchema)
    ),
    tags = ["locations"],
    operation_id = "updateLocation"
)]
#[put("/locations/{id}")]
pub async fn update_location(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<Uuid>,
    payload: JsonBody<UpdateLocationRequest>,
) -> ApiResult<web::Json<LocationResponse>> {
    let owner = session.require_user_id()?;
    let patch = LocationPatch::from(payload.into_inner());
    let location = state
        .locations
        .update_location(&owner, path.into_inner(), patch)
        .await?;
    Ok(web::Json(LocationResponse::from(location)))
}

/// Remove a location that no session refers to.
#[utoipa::path(
    delete,
    path = "/api/v1/locations/{id}",
    params(("id" = Uuid, Path, description = "Location id")),
    responses(
        (status = 204, description = "Location deleted"),
        (status = 401, description = "Not signed in", body = ErrorSchema),
        (status = 404, description = "Unknown location", body = ErrorSchema),
        (status = 409, description = "Sessions still use the location", body = ErrorSchema)
    ),
    tags = ["locations"],
    operation_id = "deleteLocation"
)]
#[delete("/locations/{id}")]
pub async fn delete_location(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<Uuid>,
) -> ApiResult<HttpResponse> {
    let owner = session.require_user_id()?;
    state
        .locations
        .delete_location(&owner, path.into_inner())
        .await?;
    Ok(HttpResponse::NoContent().finish())
}
