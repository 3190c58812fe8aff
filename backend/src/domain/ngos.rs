//! NGO directory service: registration, profile, verification, search.
//!
//! Public search only ever surfaces active, verified organisations;
//! the unscoped directory listing and the verification transition are
//! administrator-only.

use std::sync::Arc;

use chrono::Utc;
use pagination::{Page, PageRequest};
use serde_json::json;
use tracing::info;

use super::error::Error;
use super::id::{NgoId, UserId};
use super::ngo::{Ngo, NgoProfile, VerificationStatus};
use super::policy;
use super::ports::{
    NgoQuery, NgoRepository, NgoRepositoryError, UserRepository, UserRepositoryError,
};
use super::user::{UserRole, UserSummary};

/// Filters accepted by the public directory search.
#[derive(Debug, Clone, Default)]
pub struct SearchNgos {
    /// Substring filter on the address city.
    pub city: Option<String>,
    /// Substring filter over the service-area labels.
    pub service_area: Option<String>,
}

/// Filters accepted by the administrative directory listing.
#[derive(Debug, Clone, Default)]
pub struct ListNgos {
    /// Exact verification-status filter.
    pub verification_status: Option<VerificationStatus>,
    /// Substring filter on the address city.
    pub city: Option<String>,
}

/// NGO with its owning account resolved for display.
#[derive(Debug, Clone, PartialEq)]
pub struct NgoView {
    /// The profile itself.
    pub ngo: Ngo,
    /// Resolved owner summary, when the account still exists.
    pub user: Option<UserSummary>,
}

/// Driving service for NGO operations.
pub struct NgosService {
    ngos: Arc<dyn NgoRepository>,
    users: Arc<dyn UserRepository>,
}

impl NgosService {
    /// Create a service over the NGO and user stores.
    pub fn new(ngos: Arc<dyn NgoRepository>, users: Arc<dyn UserRepository>) -> Self {
        Self { ngos, users }
    }

    fn map_store_error(error: NgoRepositoryError) -> Error {
        match error {
            NgoRepositoryError::DuplicateRegistrationNumber {
                registration_number,
            } => Error::conflict("registration number is already in use")
                .with_details(json!({ "registrationNumber": registration_number })),
            NgoRepositoryError::DuplicateOwner => {
                Error::conflict("user already has an NGO profile")
            }
            NgoRepositoryError::Missing => Error::not_found("NGO not found"),
            NgoRepositoryError::Storage { message } => {
                Error::internal(format!("NGO store failed: {message}"))
            }
        }
    }

    fn map_user_error(error: UserRepositoryError) -> Error {
        Error::internal(format!("user store failed: {error}"))
    }

    async fn view(&self, ngo: Ngo) -> Result<NgoView, Error> {
        let user = self
            .users
            .find_by_id(ngo.user)
            .await
            .map_err(Self::map_user_error)?
            .as_ref()
            .map(UserSummary::from);
        Ok(NgoView { ngo, user })
    }

    async fn view_page(&self, page: Page<Ngo>) -> Result<Page<NgoView>, Error> {
        let mut items = Vec::with_capacity(page.items.len());
        for ngo in page.items {
            items.push(self.view(ngo).await?);
        }
        Ok(Page {
            items,
            total_pages: page.total_pages,
            current_page: page.current_page,
            total: page.total,
        })
    }

    /// Register a profile for `caller`, entering the `pending` state.
    pub async fn register(&self, caller: UserId, profile: NgoProfile) -> Result<NgoView, Error> {
        let ngo = Ngo::register(caller, profile, Utc::now())
            .map_err(|err| Error::invalid_request(err.to_string()))?;
        self.ngos
            .insert(&ngo)
            .await
            .map_err(Self::map_store_error)?;
        info!(ngo_id = %ngo.id, user_id = %caller, "NGO registered");
        self.view(ngo).await
    }

    /// Fetch the caller's own profile.
    pub async fn profile(&self, caller: UserId) -> Result<NgoView, Error> {
        let ngo = self
            .ngos
            .find_by_user(caller)
            .await
            .map_err(Self::map_store_error)?
            .ok_or_else(|| Error::not_found("NGO profile not found"))?;
        self.view(ngo).await
    }

    /// Replace the caller's profile fields while still unverified.
    pub async fn update_profile(
        &self,
        caller: UserId,
        profile: NgoProfile,
    ) -> Result<NgoView, Error> {
        let mut ngo = self
            .ngos
            .find_by_user(caller)
            .await
            .map_err(Self::map_store_error)?
            .ok_or_else(|| Error::not_found("NGO profile not found"))?;
        policy::ngo_profile_mutable_by(&ngo, caller)?;
        ngo.update_profile(profile, Utc::now())
            .map_err(|err| Error::invalid_request(err.to_string()))?;
        self.ngos
            .update(&ngo)
            .await
            .map_err(Self::map_store_error)?;
        self.view(ngo).await
    }

    /// Fetch one profile by id.
    pub async fn get(&self, id: NgoId) -> Result<NgoView, Error> {
        let ngo = self
            .ngos
            .find_by_id(id)
            .await
            .map_err(Self::map_store_error)?
            .ok_or_else(|| Error::not_found("NGO not found"))?;
        self.view(ngo).await
    }

    /// Public directory search over active, verified organisations.
    pub async fn search(
        &self,
        filter: SearchNgos,
        page: PageRequest,
    ) -> Result<Page<NgoView>, Error> {
        let query = NgoQuery {
            verification_status: Some(VerificationStatus::Verified),
            is_active: Some(true),
            city: filter.city,
            service_area: filter.service_area,
        };
        let result = self
            .ngos
            .find_page(&query, page)
            .await
            .map_err(Self::map_store_error)?;
        self.view_page(result).await
    }

    /// Administrative unscoped directory listing.
    pub async fn list(
        &self,
        caller_role: UserRole,
        filter: ListNgos,
        page: PageRequest,
    ) -> Result<Page<NgoView>, Error> {
        policy::require_admin(caller_role)?;
        let query = NgoQuery {
            verification_status: filter.verification_status,
            is_active: None,
            city: filter.city,
            service_area: None,
        };
        let result = self
            .ngos
            .find_page(&query, page)
            .await
            .map_err(Self::map_store_error)?;
        self.view_page(result).await
    }

    /// Administrative verification-status transition.
    pub async fn set_verification(
        &self,
        caller_role: UserRole,
        id: NgoId,
        status: VerificationStatus,
    ) -> Result<NgoView, Error> {
        policy::require_admin(caller_role)?;
        let mut ngo = self
            .ngos
            .find_by_id(id)
            .await
            .map_err(Self::map_store_error)?
            .ok_or_else(|| Error::not_found("NGO not found"))?;
        ngo.set_verification(status, Utc::now());
        self.ngos
            .update(&ngo)
            .await
            .map_err(Self::map_store_error)?;
        info!(ngo_id = %id, %status, "NGO verification updated");
        self.view(ngo).await
    }
}
