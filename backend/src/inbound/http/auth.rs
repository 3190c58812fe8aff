//! Account API handlers.
//!
//! ```text
//! POST /api/auth/register {"name":"Alice","email":"a@b.c","password":"..."}
//! POST /api/auth/login    {"email":"a@b.c","password":"..."}
//! GET  /api/auth/profile
//! ```

use actix_web::{HttpResponse, get, post, web};
use serde::{Deserialize, Serialize};

use crate::domain::{
    AuthenticatedAccount, Credentials, EmailAddress, Error, RegisterAccount, User, UserId,
    UserRole,
};
use crate::inbound::http::ApiResult;
use crate::inbound::http::bearer::AuthUser;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{invalid_field, require};

/// Registration request body.
#[derive(Debug, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    /// Display name.
    pub name: Option<String>,
    /// Login email.
    pub email: Option<String>,
    /// Plaintext password (hashed before storage).
    pub password: Option<String>,
}

/// Login request body.
#[derive(Debug, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    /// Login email.
    pub email: Option<String>,
    /// Plaintext password.
    pub password: Option<String>,
}

/// Account payload with the session token, answered by register and
/// login.
#[derive(Debug, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SessionResponse {
    /// Account id.
    pub id: UserId,
    /// Display name.
    pub name: String,
    /// Login email.
    pub email: EmailAddress,
    /// Granted role.
    pub role: UserRole,
    /// Bearer token for subsequent requests.
    pub token: String,
}

impl From<AuthenticatedAccount> for SessionResponse {
    fn from(account: AuthenticatedAccount) -> Self {
        Self {
            id: account.user.id,
            name: account.user.name,
            email: account.user.email,
            role: account.user.role,
            token: account.token,
        }
    }
}

/// Account profile without credentials.
#[derive(Debug, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProfileResponse {
    /// Account id.
    pub id: UserId,
    /// Display name.
    pub name: String,
    /// Login email.
    pub email: EmailAddress,
    /// Granted role.
    pub role: UserRole,
}

impl From<User> for ProfileResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            name: user.name,
            email: user.email,
            role: user.role,
        }
    }
}

/// Register a new account.
#[utoipa::path(
    post,
    path = "/api/auth/register",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "Account created", body = SessionResponse),
        (status = 400, description = "Invalid request or email already registered", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["auth"],
    operation_id = "register",
    security(())
)]
#[post("/register")]
pub async fn register(
    state: web::Data<HttpState>,
    payload: web::Json<RegisterRequest>,
) -> ApiResult<HttpResponse> {
    let payload = payload.into_inner();
    let name = require(payload.name, "name")?;
    let email = require(payload.email, "email")?;
    let password = require(payload.password, "password")?;
    let email =
        EmailAddress::new(&email).map_err(|err| invalid_field("email", err.to_string()))?;
    let account = state
        .accounts
        .register(RegisterAccount {
            name,
            email,
            password,
        })
        .await?;
    Ok(HttpResponse::Created().json(SessionResponse::from(account)))
}

/// Authenticate and issue a bearer token.
#[utoipa::path(
    post,
    path = "/api/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login success", body = SessionResponse),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Invalid credentials", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["auth"],
    operation_id = "login",
    security(())
)]
#[post("/login")]
pub async fn login(
    state: web::Data<HttpState>,
    payload: web::Json<LoginRequest>,
) -> ApiResult<web::Json<SessionResponse>> {
    let payload = payload.into_inner();
    let email = require(payload.email, "email")?;
    let password = require(payload.password, "password")?;
    let credentials = Credentials::try_from_parts(&email, &password)
        .map_err(|err| Error::invalid_request(err.to_string()))?;
    let account = state.accounts.login(&credentials).await?;
    Ok(web::Json(SessionResponse::from(account)))
}

/// Fetch the calling account's profile.
#[utoipa::path(
    get,
    path = "/api/auth/profile",
    responses(
        (status = 200, description = "Profile", body = ProfileResponse),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 404, description = "Not found", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["auth"],
    operation_id = "profile"
)]
#[get("/profile")]
pub async fn profile(
    state: web::Data<HttpState>,
    auth: AuthUser,
) -> ApiResult<web::Json<ProfileResponse>> {
    let user = state.accounts.profile(auth.user_id()).await?;
    Ok(web::Json(ProfileResponse::from(user)))
}
