//! Persistence port for donation listings.
//!
//! The claim operation is deliberately a single conditional update at
//! the store level (update-if-status-is-still-available) rather than a
//! read-then-write pair, so two concurrent claims can never both
//! succeed.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use pagination::{Page, PageRequest};
use thiserror::Error;

use crate::domain::donation::{DonationStatus, DonorType, FoodDonation};
use crate::domain::id::{DonationId, NgoId, UserId};

/// Errors surfaced by the donation persistence adapter.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DonationRepositoryError {
    /// The targeted record no longer exists.
    #[error("donation record is missing")]
    Missing,
    /// Storage-level failure bubbling up from the adapter.
    #[error("donation storage failed: {message}")]
    Storage {
        /// Adapter-provided description.
        message: String,
    },
}

impl DonationRepositoryError {
    /// Helper for adapter storage failures.
    pub fn storage(message: impl Into<String>) -> Self {
        Self::Storage {
            message: message.into(),
        }
    }
}

/// Result of the store-level conditional claim update.
#[derive(Debug, Clone, PartialEq)]
pub enum ClaimOutcome {
    /// This caller won: the record now carries the claim.
    Claimed(FoodDonation),
    /// The record was no longer `available`; carries the observed status.
    Unavailable(DonationStatus),
    /// The record does not exist.
    Missing,
}

/// Sort order for listing queries.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DonationOrder {
    /// Newest listings first.
    #[default]
    CreatedDesc,
    /// Most recently claimed first.
    ClaimedDesc,
}

/// Listing filter translated to store query clauses.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DonationQuery {
    /// Status filter; `None` means any, otherwise membership in the set.
    pub statuses: Option<Vec<DonationStatus>>,
    /// Exact donor-type filter.
    pub donor_type: Option<DonorType>,
    /// Case-insensitive substring filter on the pickup-address city.
    pub city: Option<String>,
    /// Restrict to listings owned by this donor.
    pub donor: Option<UserId>,
    /// Restrict to listings claimed by this NGO.
    pub claimed_by: Option<NgoId>,
    /// Sort order.
    pub order: DonationOrder,
}

/// Aggregate counts for an NGO's claimed donations.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NgoDonationStats {
    /// Donations ever claimed by the NGO.
    pub total_claimed: u64,
    /// Currently in `claimed` status, awaiting pickup.
    pub pending_pickups: u64,
    /// Donations that reached `delivered`.
    pub completed_deliveries: u64,
}

/// Store operations over donation records.
#[async_trait]
pub trait DonationRepository: Send + Sync {
    /// Insert a new listing.
    async fn insert(&self, donation: &FoodDonation) -> Result<(), DonationRepositoryError>;

    /// Fetch a listing by id.
    async fn find_by_id(
        &self,
        id: DonationId,
    ) -> Result<Option<FoodDonation>, DonationRepositoryError>;

    /// Replace a stored listing; fails with
    /// [`DonationRepositoryError::Missing`] when the record vanished.
    async fn update(&self, donation: &FoodDonation) -> Result<(), DonationRepositoryError>;

    /// Remove a listing. Returns whether a record was deleted.
    async fn delete(&self, id: DonationId) -> Result<bool, DonationRepositoryError>;

    /// Atomically set `status=claimed`, `claimed_by`, and `claimed_at`
    /// iff the record's status is still `available`. Exactly one of
    /// two concurrent callers observes [`ClaimOutcome::Claimed`].
    async fn claim_if_available(
        &self,
        id: DonationId,
        ngo: NgoId,
        at: DateTime<Utc>,
    ) -> Result<ClaimOutcome, DonationRepositoryError>;

    /// Run a listing query.
    async fn find_page(
        &self,
        query: &DonationQuery,
        page: PageRequest,
    ) -> Result<Page<FoodDonation>, DonationRepositoryError>;

    /// Aggregate claim counts for one NGO.
    async fn stats_for_ngo(
        &self,
        ngo: NgoId,
    ) -> Result<NgoDonationStats, DonationRepositoryError>;
}
