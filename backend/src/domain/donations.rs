//! Donation lifecycle service.
//!
//! Owns every state transition of a listing. The claim path runs a
//! policy pre-check for precise error reporting, then delegates the
//! decisive update to the store's conditional claim so concurrent
//! claimants race on a single atomic operation rather than on a
//! read-then-write window.

use std::str::FromStr;
use std::sync::Arc;

use chrono::Utc;
use pagination::{Page, PageRequest};
use tracing::{info, warn};

use super::donation::{DonationDraft, DonationStatus, DonationView, DonorType, FoodDonation};
use super::error::Error;
use super::id::{DonationId, UserId};
use super::ngo::NgoSummary;
use super::policy;
use super::ports::{
    ClaimOutcome, DonationOrder, DonationQuery, DonationRepository, DonationRepositoryError,
    NgoDonationStats, NgoRepository, NgoRepositoryError, UserRepository, UserRepositoryError,
};
use super::user::UserSummary;

/// Filters accepted by the public listing endpoint.
#[derive(Debug, Clone, Default)]
pub struct ListDonations {
    /// Requested status filter, already parsed.
    pub status: Option<DonationStatus>,
    /// Donor-category filter.
    pub donor_type: Option<DonorType>,
    /// Substring filter on the pickup city.
    pub city: Option<String>,
    /// When false, the listing narrows to open records regardless of
    /// the requested status.
    pub show_all: bool,
}

/// Driving service for donation listings.
pub struct DonationsService {
    donations: Arc<dyn DonationRepository>,
    ngos: Arc<dyn NgoRepository>,
    users: Arc<dyn UserRepository>,
}

impl DonationsService {
    /// Create a service over the three stores a view needs.
    pub fn new(
        donations: Arc<dyn DonationRepository>,
        ngos: Arc<dyn NgoRepository>,
        users: Arc<dyn UserRepository>,
    ) -> Self {
        Self {
            donations,
            ngos,
            users,
        }
    }

    fn map_store_error(error: DonationRepositoryError) -> Error {
        match error {
            DonationRepositoryError::Missing => Error::not_found("food donation not found"),
            DonationRepositoryError::Storage { message } => {
                Error::internal(format!("donation store failed: {message}"))
            }
        }
    }

    fn map_ngo_error(error: NgoRepositoryError) -> Error {
        Error::internal(format!("NGO store failed: {error}"))
    }

    fn map_user_error(error: UserRepositoryError) -> Error {
        Error::internal(format!("user store failed: {error}"))
    }

    /// Resolve donor and claimant summaries for display.
    ///
    /// Dangling references degrade to `None` rather than failing the
    /// read.
    async fn view(&self, donation: FoodDonation) -> Result<DonationView, Error> {
        let donor = self
            .users
            .find_by_id(donation.donor)
            .await
            .map_err(Self::map_user_error)?
            .as_ref()
            .map(UserSummary::from);
        let claimed_by = match donation.claimed_by {
            Some(ngo_id) => self
                .ngos
                .find_by_id(ngo_id)
                .await
                .map_err(Self::map_ngo_error)?
                .as_ref()
                .map(NgoSummary::from),
            None => None,
        };
        Ok(DonationView {
            donation,
            donor,
            claimed_by,
        })
    }

    async fn view_page(&self, page: Page<FoodDonation>) -> Result<Page<DonationView>, Error> {
        let mut items = Vec::with_capacity(page.items.len());
        for donation in page.items {
            items.push(self.view(donation).await?);
        }
        Ok(Page {
            items,
            total_pages: page.total_pages,
            current_page: page.current_page,
            total: page.total,
        })
    }

    async fn fetch(&self, id: DonationId) -> Result<FoodDonation, Error> {
        self.donations
            .find_by_id(id)
            .await
            .map_err(Self::map_store_error)?
            .ok_or_else(|| Error::not_found("food donation not found"))
    }

    /// Create a listing owned by `donor`.
    pub async fn create(
        &self,
        donor: UserId,
        draft: DonationDraft,
    ) -> Result<DonationView, Error> {
        let donation = FoodDonation::create(donor, draft, Utc::now())
            .map_err(|err| Error::invalid_request(err.to_string()))?;
        self.donations
            .insert(&donation)
            .await
            .map_err(Self::map_store_error)?;
        info!(donation_id = %donation.id, donor_id = %donor, "donation listed");
        self.view(donation).await
    }

    /// Fetch one listing with its resolved summaries.
    pub async fn get(&self, id: DonationId) -> Result<DonationView, Error> {
        let donation = self.fetch(id).await?;
        self.view(donation).await
    }

    /// Public paginated listing.
    ///
    /// Without `show_all`, the result narrows to `available` and
    /// `claimed` records and any requested status filter is ignored.
    pub async fn list(
        &self,
        filter: ListDonations,
        page: PageRequest,
    ) -> Result<Page<DonationView>, Error> {
        let statuses = if filter.show_all {
            filter.status.map(|s| vec![s])
        } else {
            Some(vec![DonationStatus::Available, DonationStatus::Claimed])
        };
        let query = DonationQuery {
            statuses,
            donor_type: filter.donor_type,
            city: filter.city,
            donor: None,
            claimed_by: None,
            order: DonationOrder::CreatedDesc,
        };
        let result = self
            .donations
            .find_page(&query, page)
            .await
            .map_err(Self::map_store_error)?;
        self.view_page(result).await
    }

    /// Listings owned by the calling donor, newest first.
    pub async fn my_donations(
        &self,
        donor: UserId,
        page: PageRequest,
    ) -> Result<Page<DonationView>, Error> {
        let query = DonationQuery {
            donor: Some(donor),
            order: DonationOrder::CreatedDesc,
            ..DonationQuery::default()
        };
        let result = self
            .donations
            .find_page(&query, page)
            .await
            .map_err(Self::map_store_error)?;
        self.view_page(result).await
    }

    /// Listings claimed by the calling user's NGO, most recent claim
    /// first. The caller must hold an NGO profile.
    pub async fn claimed_by_ngo(
        &self,
        caller: UserId,
        page: PageRequest,
    ) -> Result<Page<DonationView>, Error> {
        let ngo = self
            .ngos
            .find_by_user(caller)
            .await
            .map_err(Self::map_ngo_error)?
            .ok_or_else(|| Error::forbidden("only NGOs can view claimed donations"))?;
        let query = DonationQuery {
            claimed_by: Some(ngo.id),
            order: DonationOrder::ClaimedDesc,
            ..DonationQuery::default()
        };
        let result = self
            .donations
            .find_page(&query, page)
            .await
            .map_err(Self::map_store_error)?;
        self.view_page(result).await
    }

    /// Replace the editable fields of an `available` listing.
    pub async fn edit(
        &self,
        id: DonationId,
        actor: UserId,
        draft: DonationDraft,
    ) -> Result<DonationView, Error> {
        let mut donation = self.fetch(id).await?;
        policy::donation_mutable_by(&donation, actor)?;
        donation
            .apply_draft(draft, Utc::now())
            .map_err(|err| Error::invalid_request(err.to_string()))?;
        self.donations
            .update(&donation)
            .await
            .map_err(Self::map_store_error)?;
        self.view(donation).await
    }

    /// Delete an `available` listing.
    pub async fn delete(&self, id: DonationId, actor: UserId) -> Result<(), Error> {
        let donation = self.fetch(id).await?;
        policy::donation_mutable_by(&donation, actor)?;
        let removed = self
            .donations
            .delete(id)
            .await
            .map_err(Self::map_store_error)?;
        if !removed {
            return Err(Error::not_found("food donation not found"));
        }
        info!(donation_id = %id, donor_id = %actor, "donation deleted");
        Ok(())
    }

    /// Claim an available listing for the caller's verified NGO.
    ///
    /// The policy pre-check gives precise errors; the store's
    /// conditional update then decides the race, so a loser that
    /// passed the pre-check still observes `invalid_state`.
    pub async fn claim(&self, id: DonationId, caller: UserId) -> Result<DonationView, Error> {
        let donation = self.fetch(id).await?;
        let ngo = self
            .ngos
            .find_by_user(caller)
            .await
            .map_err(Self::map_ngo_error)?;
        policy::donation_claimable_by(&donation, ngo.as_ref())?;
        let ngo = ngo.ok_or_else(|| Error::forbidden("only NGOs can claim donations"))?;

        match self
            .donations
            .claim_if_available(id, ngo.id, Utc::now())
            .await
            .map_err(Self::map_store_error)?
        {
            ClaimOutcome::Claimed(claimed) => {
                info!(donation_id = %id, ngo_id = %ngo.id, "donation claimed");
                self.view(claimed).await
            }
            ClaimOutcome::Unavailable(status) => {
                warn!(donation_id = %id, ngo_id = %ngo.id, %status, "claim lost the race");
                Err(Error::invalid_state("donation is not available for claiming"))
            }
            ClaimOutcome::Missing => Err(Error::not_found("food donation not found")),
        }
    }

    /// Advance a listing along the lifecycle.
    ///
    /// Permitted to the owning donor and to the user behind the
    /// claiming NGO; every transition must be forward-only.
    pub async fn advance_status(
        &self,
        id: DonationId,
        actor: UserId,
        status: &str,
    ) -> Result<DonationView, Error> {
        let next = DonationStatus::from_str(status)
            .map_err(|err| Error::invalid_request(err.to_string()))?;
        let mut donation = self.fetch(id).await?;
        let claimant_owner = match donation.claimed_by {
            Some(ngo_id) => self
                .ngos
                .find_by_id(ngo_id)
                .await
                .map_err(Self::map_ngo_error)?
                .map(|ngo| ngo.user),
            None => None,
        };
        policy::donation_status_advanceable_by(&donation, actor, claimant_owner)?;
        donation
            .advance(next, Utc::now())
            .map_err(|err| Error::invalid_state(err.to_string()))?;
        self.donations
            .update(&donation)
            .await
            .map_err(Self::map_store_error)?;
        info!(donation_id = %id, status = %next, "donation status advanced");
        self.view(donation).await
    }

    /// Aggregate claim counts for the caller's NGO.
    pub async fn stats_for_caller(&self, caller: UserId) -> Result<NgoDonationStats, Error> {
        let ngo = self
            .ngos
            .find_by_user(caller)
            .await
            .map_err(Self::map_ngo_error)?
            .ok_or_else(|| Error::not_found("NGO profile not found"))?;
        self.donations
            .stats_for_ngo(ngo.id)
            .await
            .map_err(Self::map_store_error)
    }
}
