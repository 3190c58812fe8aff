//! Food-donation API handlers.
//!
//! ```text
//! POST   /api/food-donations
//! GET    /api/food-donations?status=&donorType=&city=&showAll=&page=&limit=
//! GET    /api/food-donations/my-donations
//! GET    /api/food-donations/ngo-claimed
//! GET    /api/food-donations/{id}
//! PUT    /api/food-donations/{id}
//! DELETE /api/food-donations/{id}
//! POST   /api/food-donations/{id}/claim
//! PUT    /api/food-donations/{id}/status
//! ```
//!
//! The literal segments (`my-donations`, `ngo-claimed`) are registered
//! before the `{id}` routes so they are never swallowed by the id
//! matcher.

use std::str::FromStr;

use actix_web::{HttpResponse, delete, get, post, put, web};
use chrono::{DateTime, Utc};
use pagination::Page;
use serde::{Deserialize, Serialize};

use crate::domain::{
    DonationDraft, DonationId, DonationStatus, DonationView, DonorType, Error, FoodItem,
    ListDonations, NgoSummary, PickupWindow, PostalAddress, UserSummary,
};
use crate::inbound::http::ApiResult;
use crate::inbound::http::bearer::AuthUser;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{invalid_field, page_request, require};

/// Donation create/replace request body.
#[derive(Debug, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DonationRequest {
    /// Donor category (`restaurant`, `individual`, `catering`,
    /// `grocery`).
    pub donor_type: Option<String>,
    /// Items offered; at least one required.
    pub food_items: Option<Vec<FoodItem>>,
    /// Pickup address.
    pub pickup_address: Option<PostalAddress>,
    /// Pickup window.
    pub pickup_time: Option<PickupWindow>,
    /// Free-form pickup instructions.
    pub special_instructions: Option<String>,
}

impl DonationRequest {
    fn into_draft(self) -> Result<DonationDraft, Error> {
        let donor_type = require(self.donor_type, "donorType")?;
        let donor_type = DonorType::from_str(&donor_type)
            .map_err(|err| invalid_field("donorType", err.to_string()))?;
        Ok(DonationDraft {
            donor_type,
            food_items: require(self.food_items, "foodItems")?,
            pickup_address: require(self.pickup_address, "pickupAddress")?,
            pickup_time: require(self.pickup_time, "pickupTime")?,
            special_instructions: self.special_instructions,
        })
    }
}

/// Status-advance request body.
#[derive(Debug, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StatusRequest {
    /// Target lifecycle state.
    pub status: Option<String>,
}

/// Query parameters for the public listing.
#[derive(Debug, Deserialize, utoipa::IntoParams)]
#[serde(rename_all = "camelCase")]
pub struct ListQuery {
    /// Exact status filter (ignored unless `showAll`).
    pub status: Option<String>,
    /// Exact donor-category filter.
    pub donor_type: Option<String>,
    /// Case-insensitive substring filter on the pickup city.
    pub city: Option<String>,
    /// Include finished donations.
    pub show_all: Option<bool>,
    /// 1-based page number.
    pub page: Option<u32>,
    /// Page size, clamped to 100.
    pub limit: Option<u32>,
}

/// Pagination-only query parameters.
#[derive(Debug, Deserialize, utoipa::IntoParams)]
pub struct PageQuery {
    /// 1-based page number.
    pub page: Option<u32>,
    /// Page size, clamped to 100.
    pub limit: Option<u32>,
}

/// Donation record with donor and claimant summaries, as answered by
/// every donation endpoint.
#[derive(Debug, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DonationResponse {
    /// Listing id.
    pub id: DonationId,
    /// Donor summary, when the account still exists.
    pub donor: Option<UserSummary>,
    /// Donor category.
    pub donor_type: DonorType,
    /// Items offered.
    pub food_items: Vec<FoodItem>,
    /// Pickup address.
    pub pickup_address: PostalAddress,
    /// Pickup window.
    pub pickup_time: PickupWindow,
    /// Free-form pickup instructions.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub special_instructions: Option<String>,
    /// Lifecycle state.
    pub status: DonationStatus,
    /// Claimant summary, when claimed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub claimed_by: Option<NgoSummary>,
    /// Claim timestamp, when claimed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub claimed_at: Option<DateTime<Utc>>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last mutation timestamp.
    pub updated_at: DateTime<Utc>,
}

impl From<DonationView> for DonationResponse {
    fn from(view: DonationView) -> Self {
        let DonationView {
            donation,
            donor,
            claimed_by,
        } = view;
        Self {
            id: donation.id,
            donor,
            donor_type: donation.donor_type,
            food_items: donation.food_items,
            pickup_address: donation.pickup_address,
            pickup_time: donation.pickup_time,
            special_instructions: donation.special_instructions,
            status: donation.status,
            claimed_by,
            claimed_at: donation.claimed_at,
            created_at: donation.created_at,
            updated_at: donation.updated_at,
        }
    }
}

fn parse_id(raw: &str) -> Result<DonationId, Error> {
    DonationId::from_str(raw).map_err(|_| Error::not_found("food donation not found"))
}

/// Create a donation listing.
#[utoipa::path(
    post,
    path = "/api/food-donations",
    request_body = DonationRequest,
    responses(
        (status = 201, description = "Donation listed", body = DonationResponse),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["food-donations"],
    operation_id = "createDonation"
)]
#[post("")]
pub async fn create(
    state: web::Data<HttpState>,
    auth: AuthUser,
    payload: web::Json<DonationRequest>,
) -> ApiResult<HttpResponse> {
    let draft = payload.into_inner().into_draft()?;
    let view = state.donations.create(auth.user_id(), draft).await?;
    Ok(HttpResponse::Created().json(DonationResponse::from(view)))
}

/// List donations with filters and pagination.
#[utoipa::path(
    get,
    path = "/api/food-donations",
    params(ListQuery),
    responses(
        (status = 200, description = "Donations page", body = Page<DonationResponse>),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["food-donations"],
    operation_id = "listDonations"
)]
#[get("")]
pub async fn list(
    state: web::Data<HttpState>,
    _auth: AuthUser,
    query: web::Query<ListQuery>,
) -> ApiResult<web::Json<Page<DonationResponse>>> {
    let query = query.into_inner();
    let page = page_request(query.page, query.limit)?;
    let status = query
        .status
        .as_deref()
        .map(DonationStatus::from_str)
        .transpose()
        .map_err(|err| invalid_field("status", err.to_string()))?;
    let donor_type = query
        .donor_type
        .as_deref()
        .map(DonorType::from_str)
        .transpose()
        .map_err(|err| invalid_field("donorType", err.to_string()))?;
    let filter = ListDonations {
        status,
        donor_type,
        city: query.city,
        show_all: query.show_all.unwrap_or(false),
    };
    let result = state.donations.list(filter, page).await?;
    Ok(web::Json(result.map(DonationResponse::from)))
}

/// List the calling donor's own donations.
#[utoipa::path(
    get,
    path = "/api/food-donations/my-donations",
    params(PageQuery),
    responses(
        (status = 200, description = "Donations page", body = Page<DonationResponse>),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["food-donations"],
    operation_id = "myDonations"
)]
#[get("/my-donations")]
pub async fn my_donations(
    state: web::Data<HttpState>,
    auth: AuthUser,
    query: web::Query<PageQuery>,
) -> ApiResult<web::Json<Page<DonationResponse>>> {
    let page = page_request(query.page, query.limit)?;
    let result = state.donations.my_donations(auth.user_id(), page).await?;
    Ok(web::Json(result.map(DonationResponse::from)))
}

/// List donations claimed by the calling user's NGO.
#[utoipa::path(
    get,
    path = "/api/food-donations/ngo-claimed",
    params(PageQuery),
    responses(
        (status = 200, description = "Donations page", body = Page<DonationResponse>),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 403, description = "Caller has no NGO profile", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["food-donations"],
    operation_id = "ngoClaimedDonations"
)]
#[get("/ngo-claimed")]
pub async fn ngo_claimed(
    state: web::Data<HttpState>,
    auth: AuthUser,
    query: web::Query<PageQuery>,
) -> ApiResult<web::Json<Page<DonationResponse>>> {
    let page = page_request(query.page, query.limit)?;
    let result = state.donations.claimed_by_ngo(auth.user_id(), page).await?;
    Ok(web::Json(result.map(DonationResponse::from)))
}

/// Fetch one donation.
#[utoipa::path(
    get,
    path = "/api/food-donations/{id}",
    params(("id" = String, Path, description = "Donation id")),
    responses(
        (status = 200, description = "Donation", body = DonationResponse),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 404, description = "Not found", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["food-donations"],
    operation_id = "getDonation"
)]
#[get("/{id}")]
pub async fn get(
    state: web::Data<HttpState>,
    _auth: AuthUser,
    path: web::Path<String>,
) -> ApiResult<web::Json<DonationResponse>> {
    let id = parse_id(&path)?;
    let view = state.donations.get(id).await?;
    Ok(web::Json(DonationResponse::from(view)))
}

/// Replace an available donation's fields.
#[utoipa::path(
    put,
    path = "/api/food-donations/{id}",
    params(("id" = String, Path, description = "Donation id")),
    request_body = DonationRequest,
    responses(
        (status = 200, description = "Donation updated", body = DonationResponse),
        (status = 400, description = "Invalid request or no longer available", body = Error),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 403, description = "Not the donor", body = Error),
        (status = 404, description = "Not found", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["food-donations"],
    operation_id = "updateDonation"
)]
#[put("/{id}")]
pub async fn update(
    state: web::Data<HttpState>,
    auth: AuthUser,
    path: web::Path<String>,
    payload: web::Json<DonationRequest>,
) -> ApiResult<web::Json<DonationResponse>> {
    let id = parse_id(&path)?;
    let draft = payload.into_inner().into_draft()?;
    let view = state.donations.edit(id, auth.user_id(), draft).await?;
    Ok(web::Json(DonationResponse::from(view)))
}

/// Delete an available donation.
#[utoipa::path(
    delete,
    path = "/api/food-donations/{id}",
    params(("id" = String, Path, description = "Donation id")),
    responses(
        (status = 200, description = "Donation deleted"),
        (status = 400, description = "No longer available", body = Error),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 403, description = "Not the donor", body = Error),
        (status = 404, description = "Not found", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["food-donations"],
    operation_id = "deleteDonation"
)]
#[delete("/{id}")]
pub async fn remove(
    state: web::Data<HttpState>,
    auth: AuthUser,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let id = parse_id(&path)?;
    state.donations.delete(id, auth.user_id()).await?;
    Ok(HttpResponse::Ok().json(serde_json::json!({ "message": "donation removed" })))
}

/// Claim an available donation for the caller's verified NGO.
#[utoipa::path(
    post,
    path = "/api/food-donations/{id}/claim",
    params(("id" = String, Path, description = "Donation id")),
    responses(
        (status = 200, description = "Donation claimed", body = DonationResponse),
        (status = 400, description = "Not available", body = Error),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 403, description = "No verified NGO profile", body = Error),
        (status = 404, description = "Not found", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["food-donations"],
    operation_id = "claimDonation"
)]
#[post("/{id}/claim")]
pub async fn claim(
    state: web::Data<HttpState>,
    auth: AuthUser,
    path: web::Path<String>,
) -> ApiResult<web::Json<DonationResponse>> {
    let id = parse_id(&path)?;
    let view = state.donations.claim(id, auth.user_id()).await?;
    Ok(web::Json(DonationResponse::from(view)))
}

/// Advance a donation along the lifecycle.
#[utoipa::path(
    put,
    path = "/api/food-donations/{id}/status",
    params(("id" = String, Path, description = "Donation id")),
    request_body = StatusRequest,
    responses(
        (status = 200, description = "Status advanced", body = DonationResponse),
        (status = 400, description = "Invalid transition", body = Error),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 403, description = "Not a party to this donation", body = Error),
        (status = 404, description = "Not found", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["food-donations"],
    operation_id = "updateDonationStatus"
)]
#[put("/{id}/status")]
pub async fn advance_status(
    state: web::Data<HttpState>,
    auth: AuthUser,
    path: web::Path<String>,
    payload: web::Json<StatusRequest>,
) -> ApiResult<web::Json<DonationResponse>> {
    let id = parse_id(&path)?;
    let status = require(payload.into_inner().status, "status")?;
    let view = state
        .donations
        .advance_status(id, auth.user_id(), &status)
        .await?;
    Ok(web::Json(DonationResponse::from(view)))
}
