//! Account API handlers.
//!
//! ```text
//! POST /api/v1/auth/register {"email":"angler@example.org","username":"angler","password":"tightlines"}
//! POST /api/v1/auth/login {"email":"angler@example.org","password":"tightlines"}
//! POST /api/v1/auth/logout
//! GET /api/v1/auth/me
//! POST /api/v1/auth/change-password {"currentPassword":"tightlines","newPassword":"bentrod42"}
//! ```

use actix_web::{HttpResponse, get, post, web};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{LoginCredentials, PasswordChange, Registration, User};
use crate::inbound::http::ApiResult;
use crate::inbound::http::body::JsonBody;
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{FieldName, credentials_error, require};

const EMAIL: FieldName = FieldName::new("email");
const USERNAME: FieldName = FieldName::new("username");
const PASSWORD: FieldName = FieldName::new("password");
const CURRENT_PASSWORD: FieldName = FieldName::new("currentPassword");
const NEW_PASSWORD: FieldName = FieldName::new("newPassword");

/// Registration body.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub email: Option<String>,
    pub username: Option<String>,
    pub password: Option<String>,
}

impl RegisterRequest {
    fn parse(self) -> ApiResult<Registration> {
        let email = require(self.email, EMAIL)?;
        let username = require(self.username, USERNAME)?;
        let password = require(self.password, PASSWORD)?;
        Registration::try_from_parts(&email, &username, &password)
            .map_err(|err| credentials_error(err, PASSWORD))
    }
}

/// Login body.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    pub email: Option<String>,
    pub password: Option<String>,
}

impl LoginRequest {
    fn parse(self) -> ApiResult<LoginCredentials> {
        let email = require(self.email, EMAIL)?;
        let password = require(self.password, PASSWORD)?;
        LoginCredentials::try_from_parts(&email, &password)
            .map_err(|err| credentials_error(err, PASSWORD))
    }
}

/// Password change body.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ChangePasswordRequest {
    pub current_password: Option<String>,
    pub new_password: Option<String>,
}

impl ChangePasswordRequest {
    fn parse(self) -> ApiResult<PasswordChange> {
        let current = require(self.current_password, CURRENT_PASSWORD)?;
        let replacement = require(self.new_password, NEW_PASSWORD)?;
        let field = if current.is_empty() {
            CURRENT_PASSWORD
        } else {
            NEW_PASSWORD
        };
        PasswordChange::try_from_parts(&current, &replacement)
            .map_err(|err| credentials_error(err, field))
    }
}

/// Account as returned to clients.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    #[schema(example = "3fa85f64-5717-4562-b3fc-2c963f66afa6")]
    pub id: String,
    #[schema(example = "angler@example.org")]
    pub email: String,
    #[schema(example = "angler")]
    pub username: String,
    pub created_at: DateTime<Utc>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id.to_string(),
            email: user.email.into(),
            username: user.username.into(),
            created_at: user.created_at,
        }
    }
}

/// Create an account and sign it in.
#[utoipa::path(
    post,
    path = "/api/v1/auth/register",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "Account created", body = UserResponse,
            headers(("Set-Cookie" = String, description = "Session cookie"))),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 409, description = "Email or username taken", body = ErrorSchema),
        (status = 503, description = "Store unavailable", body = ErrorSchema)
    ),
    tags = ["accounts"],
    operation_id = "register",
    security([])
)]
#[post("/auth/register")]
pub async fn register(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: JsonBody<RegisterRequest>,
) -> ApiResult<HttpResponse> {
    let registration = payload.into_inner().parse()?;
    let user = state.accounts.register(registration).await?;
    session.persist_user(&user.id)?;
    Ok(HttpResponse::Created().json(UserResponse::from(user)))
}

/// Authenticate and establish a session.
#[utoipa::path(
    post,
    path = "/api/v1/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Signed in", body = UserResponse,
            headers(("Set-Cookie" = String, description = "Session cookie"))),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Invalid credentials", body = ErrorSchema)
    ),
    tags = ["accounts"],
    operation_id = "login",
    security([])
)]
#[post("/auth/login")]
pub async fn login(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: JsonBody<LoginRequest>,
) -> ApiResult<web::Json<UserResponse>> {
    let credentials = payload.into_inner().parse()?;
    let user = state.accounts.login(credentials).await?;
    session.persist_user(&user.id)?;
    Ok(web::Json(UserResponse::from(user)))
}

/// End the current session. Succeeds whether or not one exists.
#[utoipa::path(
    post,
    path = "/api/v1/auth/logout",
    responses((status = 204, description = "Signed out")),
    tags = ["accounts"],
    operation_id = "logout",
    security([])
)]
#[post("/auth/logout")]
pub async fn logout(session: SessionContext) -> HttpResponse {
    session.forget();
    HttpResponse::NoContent().finish()
}

/// Return the signed-in account.
#[utoipa::path(
    get,
    path = "/api/v1/auth/me",
    responses(
        (status = 200, description = "Current account", body = UserResponse),
        (status = 401, description = "Not signed in", body = ErrorSchema)
    ),
    tags = ["accounts"],
    operation_id = "currentUser"
)]
#[get("/auth/me")]
pub async fn current_user(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<web::Json<UserResponse>> {
    let user_id = session.require_user_id()?;
    let user = state.accounts.current_user(&user_id).await?;
    Ok(web::Json(UserResponse::from(user)))
}

/// Replace the signed-in account's password.
#[utoipa::path(
    post,
    path = "/api/v1/auth/change-password",
    request_body = ChangePasswordRequest,
    responses(
        (status = 204, description = "Password changed"),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Not signed in or wrong current password", body = ErrorSchema)
    ),
    tags = ["accounts"],
    operation_id = "changePassword"
)]
#[post("/auth/change-password")]
pub async fn change_password(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: JsonBody<ChangePasswordRequest>,
) -> ApiResult<HttpResponse> {
    let user_id = session.require_user_id()?;
    let change = payload.into_inner().parse()?;
    state.accounts.change_password(&user_id, change).await?;
    Ok(HttpResponse::NoContent().finish())
}

#[cfg(test)]
#[path = "accounts_tests.rs"]
mod tests;
