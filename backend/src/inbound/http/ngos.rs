//! NGO directory API handlers.
//!
//! ```text
//! POST /api/ngos/register
//! GET  /api/ngos/profile
//! PUT  /api/ngos/profile
//! GET  /api/ngos/stats
//! GET  /api/ngos/search?city=&serviceArea=   (public)
//! GET  /api/ngos?verificationStatus=&city=   (admin)
//! GET  /api/ngos/{id}                        (public)
//! PUT  /api/ngos/{id}/verify                 (admin)
//! ```
//!
//! Literal segments are registered before the `{id}` routes.

use std::str::FromStr;

use actix_web::{HttpResponse, get, post, put, web};
use chrono::{DateTime, Utc};
use pagination::Page;
use serde::{Deserialize, Serialize};

use crate::domain::{
    Capacity, ContactPerson, Error, ListNgos, NgoId, NgoProfile, NgoView, PostalAddress,
    SearchNgos, UserSummary, VerificationStatus,
};
use crate::inbound::http::ApiResult;
use crate::inbound::http::bearer::AuthUser;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{invalid_field, page_request, require};

/// NGO registration / profile replacement request body.
#[derive(Debug, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NgoRequest {
    /// Organisation name.
    pub organization_name: Option<String>,
    /// Globally unique registration number.
    pub registration_number: Option<String>,
    /// Optional free-form description.
    pub description: Option<String>,
    /// Contact person.
    pub contact_person: Option<ContactPerson>,
    /// Postal address.
    pub address: Option<PostalAddress>,
    /// Service-area labels used by directory search.
    #[serde(default)]
    pub service_areas: Vec<String>,
    /// Declared pickup capacity; defaults when omitted.
    pub capacity: Option<Capacity>,
}

impl NgoRequest {
    fn into_profile(self) -> Result<NgoProfile, Error> {
        Ok(NgoProfile {
            organization_name: require(self.organization_name, "organizationName")?,
            registration_number: require(self.registration_number, "registrationNumber")?,
            description: self.description,
            contact_person: require(self.contact_person, "contactPerson")?,
            address: require(self.address, "address")?,
            service_areas: self.service_areas,
            capacity: self.capacity.unwrap_or_default(),
        })
    }
}

/// Verification transition request body.
#[derive(Debug, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct VerifyRequest {
    /// Target verification status (`pending`, `verified`, `rejected`).
    pub status: Option<String>,
}

/// Query parameters for the public directory search.
#[derive(Debug, Deserialize, utoipa::IntoParams)]
#[serde(rename_all = "camelCase")]
pub struct SearchQuery {
    /// Case-insensitive substring filter on the address city.
    pub city: Option<String>,
    /// Case-insensitive substring filter over service-area labels.
    pub service_area: Option<String>,
    /// 1-based page number.
    pub page: Option<u32>,
    /// Page size, clamped to 100.
    pub limit: Option<u32>,
}

/// Query parameters for the administrative directory listing.
#[derive(Debug, Deserialize, utoipa::IntoParams)]
#[serde(rename_all = "camelCase")]
pub struct ListQuery {
    /// Exact verification-status filter.
    pub verification_status: Option<String>,
    /// Case-insensitive substring filter on the address city.
    pub city: Option<String>,
    /// 1-based page number.
    pub page: Option<u32>,
    /// Page size, clamped to 100.
    pub limit: Option<u32>,
}

/// NGO record with its owner summary, as answered by every NGO
/// endpoint.
#[derive(Debug, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NgoResponse {
    /// Profile id.
    pub id: NgoId,
    /// Owner summary, when the account still exists.
    pub user: Option<UserSummary>,
    /// Profile fields.
    #[serde(flatten)]
    pub profile: NgoProfile,
    /// Administrative approval state.
    pub verification_status: VerificationStatus,
    /// Active flag.
    pub is_active: bool,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last mutation timestamp.
    pub updated_at: DateTime<Utc>,
}

impl From<NgoView> for NgoResponse {
    fn from(view: NgoView) -> Self {
        let NgoView { ngo, user } = view;
        Self {
            id: ngo.id,
            user,
            profile: ngo.profile,
            verification_status: ngo.verification_status,
            is_active: ngo.is_active,
            created_at: ngo.created_at,
            updated_at: ngo.updated_at,
        }
    }
}

/// Claim statistics for the caller's NGO.
#[derive(Debug, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StatsResponse {
    /// Donations ever claimed.
    pub total_claimed: u64,
    /// Currently awaiting pickup.
    pub pending_pickups: u64,
    /// Donations that reached delivery.
    pub completed_deliveries: u64,
}

fn parse_id(raw: &str) -> Result<NgoId, Error> {
    NgoId::from_str(raw).map_err(|_| Error::not_found("NGO not found"))
}

/// Register an NGO profile for the calling user.
#[utoipa::path(
    post,
    path = "/api/ngos/register",
    request_body = NgoRequest,
    responses(
        (status = 201, description = "NGO registered", body = NgoResponse),
        (status = 400, description = "Invalid request or duplicate", body = Error),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["ngos"],
    operation_id = "registerNgo"
)]
#[post("/register")]
pub async fn register(
    state: web::Data<HttpState>,
    auth: AuthUser,
    payload: web::Json<NgoRequest>,
) -> ApiResult<HttpResponse> {
    let fields = payload.into_inner().into_profile()?;
    let view = state.ngos.register(auth.user_id(), fields).await?;
    Ok(HttpResponse::Created().json(NgoResponse::from(view)))
}

/// Fetch the calling user's NGO profile.
#[utoipa::path(
    get,
    path = "/api/ngos/profile",
    responses(
        (status = 200, description = "NGO profile", body = NgoResponse),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 404, description = "No profile", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["ngos"],
    operation_id = "ngoProfile"
)]
#[get("/profile")]
pub async fn profile(
    state: web::Data<HttpState>,
    auth: AuthUser,
) -> ApiResult<web::Json<NgoResponse>> {
    let view = state.ngos.profile(auth.user_id()).await?;
    Ok(web::Json(NgoResponse::from(view)))
}

/// Replace the calling user's NGO profile while unverified.
#[utoipa::path(
    put,
    path = "/api/ngos/profile",
    request_body = NgoRequest,
    responses(
        (status = 200, description = "Profile updated", body = NgoResponse),
        (status = 400, description = "Invalid request or verified profile", body = Error),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 404, description = "No profile", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["ngos"],
    operation_id = "updateNgoProfile"
)]
#[put("/profile")]
pub async fn update_profile(
    state: web::Data<HttpState>,
    auth: AuthUser,
    payload: web::Json<NgoRequest>,
) -> ApiResult<web::Json<NgoResponse>> {
    let fields = payload.into_inner().into_profile()?;
    let view = state.ngos.update_profile(auth.user_id(), fields).await?;
    Ok(web::Json(NgoResponse::from(view)))
}

/// Claim statistics for the calling user's NGO.
#[utoipa::path(
    get,
    path = "/api/ngos/stats",
    responses(
        (status = 200, description = "Statistics", body = StatsResponse),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 404, description = "No profile", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["ngos"],
    operation_id = "ngoStats"
)]
#[get("/stats")]
pub async fn stats(
    state: web::Data<HttpState>,
    auth: AuthUser,
) -> ApiResult<web::Json<StatsResponse>> {
    let stats = state.donations.stats_for_caller(auth.user_id()).await?;
    Ok(web::Json(StatsResponse {
        total_claimed: stats.total_claimed,
        pending_pickups: stats.pending_pickups,
        completed_deliveries: stats.completed_deliveries,
    }))
}

/// Public directory search over active, verified NGOs.
#[utoipa::path(
    get,
    path = "/api/ngos/search",
    params(SearchQuery),
    responses(
        (status = 200, description = "NGOs page", body = Page<NgoResponse>),
        (status = 400, description = "Invalid request", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["ngos"],
    operation_id = "searchNgos",
    security(())
)]
#[get("/search")]
pub async fn search(
    state: web::Data<HttpState>,
    query: web::Query<SearchQuery>,
) -> ApiResult<web::Json<Page<NgoResponse>>> {
    let query = query.into_inner();
    let page = page_request(query.page, query.limit)?;
    let filter = SearchNgos {
        city: query.city,
        service_area: query.service_area,
    };
    let result = state.ngos.search(filter, page).await?;
    Ok(web::Json(result.map(NgoResponse::from)))
}

/// Administrative unscoped directory listing.
#[utoipa::path(
    get,
    path = "/api/ngos",
    params(ListQuery),
    responses(
        (status = 200, description = "NGOs page", body = Page<NgoResponse>),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 403, description = "Administrator role required", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["ngos"],
    operation_id = "listNgos"
)]
#[get("")]
pub async fn list(
    state: web::Data<HttpState>,
    auth: AuthUser,
    query: web::Query<ListQuery>,
) -> ApiResult<web::Json<Page<NgoResponse>>> {
    let query = query.into_inner();
    let page = page_request(query.page, query.limit)?;
    let verification_status = query
        .verification_status
        .as_deref()
        .map(VerificationStatus::from_str)
        .transpose()
        .map_err(|err| invalid_field("verificationStatus", err.to_string()))?;
    let filter = ListNgos {
        verification_status,
        city: query.city,
    };
    let result = state.ngos.list(auth.role(), filter, page).await?;
    Ok(web::Json(result.map(NgoResponse::from)))
}

/// Fetch one NGO profile.
#[utoipa::path(
    get,
    path = "/api/ngos/{id}",
    params(("id" = String, Path, description = "NGO id")),
    responses(
        (status = 200, description = "NGO", body = NgoResponse),
        (status = 404, description = "Not found", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["ngos"],
    operation_id = "getNgo",
    security(())
)]
#[get("/{id}")]
pub async fn get(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<web::Json<NgoResponse>> {
    let id = parse_id(&path)?;
    let view = state.ngos.get(id).await?;
    Ok(web::Json(NgoResponse::from(view)))
}

/// Administrative verification transition.
#[utoipa::path(
    put,
    path = "/api/ngos/{id}/verify",
    params(("id" = String, Path, description = "NGO id")),
    request_body = VerifyRequest,
    responses(
        (status = 200, description = "Verification updated", body = NgoResponse),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 403, description = "Administrator role required", body = Error),
        (status = 404, description = "Not found", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["ngos"],
    operation_id = "verifyNgo"
)]
#[put("/{id}/verify")]
pub async fn verify(
    state: web::Data<HttpState>,
    auth: AuthUser,
    path: web::Path<String>,
    payload: web::Json<VerifyRequest>,
) -> ApiResult<web::Json<NgoResponse>> {
    let id = parse_id(&path)?;
    let status = require(payload.into_inner().status, "status")?;
    let status = VerificationStatus::from_str(&status)
        .map_err(|err| invalid_field("status", err.to_string()))?;
    let view = state.ngos.set_verification(auth.role(), id, status).await?;
    Ok(web::Json(NgoResponse::from(view)))
}
