//! Persistence port for NGO profiles and the directory queries.

use async_trait::async_trait;
use pagination::{Page, PageRequest};
use thiserror::Error;

use crate::domain::id::{NgoId, UserId};
use crate::domain::ngo::{Ngo, VerificationStatus};

/// Errors surfaced by the NGO persistence adapter.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NgoRepositoryError {
    /// An NGO with this registration number already exists.
    #[error("registration number {registration_number} is already in use")]
    DuplicateRegistrationNumber {
        /// The offending registration number.
        registration_number: String,
    },
    /// The owning user already has an NGO profile.
    #[error("user already has an NGO profile")]
    DuplicateOwner,
    /// The targeted record no longer exists.
    #[error("NGO record is missing")]
    Missing,
    /// Storage-level failure bubbling up from the adapter.
    #[error("NGO storage failed: {message}")]
    Storage {
        /// Adapter-provided description.
        message: String,
    },
}

impl NgoRepositoryError {
    /// Helper for adapter storage failures.
    pub fn storage(message: impl Into<String>) -> Self {
        Self::Storage {
            message: message.into(),
        }
    }
}

/// Directory filter translated to store query clauses.
///
/// String filters are case-insensitive substring matches; all present
/// clauses are combined with AND. Results are ordered newest first.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NgoQuery {
    /// Exact verification-status filter.
    pub verification_status: Option<VerificationStatus>,
    /// Exact active-flag filter.
    pub is_active: Option<bool>,
    /// Substring filter on the address city.
    pub city: Option<String>,
    /// Substring filter over the service-area labels.
    pub service_area: Option<String>,
}

/// Store operations over NGO records.
#[async_trait]
pub trait NgoRepository: Send + Sync {
    /// Insert a new profile, enforcing registration-number and
    /// one-profile-per-user uniqueness.
    async fn insert(&self, ngo: &Ngo) -> Result<(), NgoRepositoryError>;

    /// Fetch a profile by id.
    async fn find_by_id(&self, id: NgoId) -> Result<Option<Ngo>, NgoRepositoryError>;

    /// Fetch the profile owned by a user, if any.
    async fn find_by_user(&self, user: UserId) -> Result<Option<Ngo>, NgoRepositoryError>;

    /// Replace a stored profile; fails with [`NgoRepositoryError::Missing`]
    /// when the record vanished.
    async fn update(&self, ngo: &Ngo) -> Result<(), NgoRepositoryError>;

    /// Run a directory query, newest first.
    async fn find_page(
        &self,
        query: &NgoQuery,
        page: PageRequest,
    ) -> Result<Page<Ngo>, NgoRepositoryError>;
}
