//! NGO profile model and verification lifecycle.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::address::{AddressValidationError, PostalAddress};
use super::id::{NgoId, UserId};

/// Administrative approval state of an NGO profile.
///
/// Only `verified` NGOs may claim donations or appear in the public
/// directory search.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum VerificationStatus {
    /// Awaiting administrative review (initial state).
    Pending,
    /// Approved; profile fields become immutable.
    Verified,
    /// Rejected by an administrator.
    Rejected,
}

impl FromStr for VerificationStatus {
    type Err = NgoValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "verified" => Ok(Self::Verified),
            "rejected" => Ok(Self::Rejected),
            _ => Err(NgoValidationError::InvalidVerificationStatus),
        }
    }
}

impl fmt::Display for VerificationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pending => f.write_str("pending"),
            Self::Verified => f.write_str("verified"),
            Self::Rejected => f.write_str("rejected"),
        }
    }
}

/// Contact person attached to an NGO profile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ContactPerson {
    /// Contact name.
    pub name: String,
    /// Contact phone number.
    pub phone: String,
    /// Contact email.
    pub email: String,
}

/// Pickup capacity declared at registration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Capacity {
    /// Pickups the NGO can run per day.
    pub daily_pickups: u32,
    /// Storage size category (free-form label, e.g. "Medium").
    pub storage_capacity: String,
}

impl Default for Capacity {
    fn default() -> Self {
        Self {
            daily_pickups: 10,
            storage_capacity: "Medium".into(),
        }
    }
}

/// Validation errors raised while building or patching an NGO profile.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum NgoValidationError {
    /// Organisation name was missing or blank.
    #[error("organization name is required")]
    MissingOrganizationName,
    /// Registration number was missing or blank.
    #[error("registration number is required")]
    MissingRegistrationNumber,
    /// Contact person was incomplete.
    #[error("contact person name, phone, and email are required")]
    IncompleteContactPerson,
    /// Address failed validation.
    #[error(transparent)]
    Address(#[from] AddressValidationError),
    /// Verification status string was not a known value.
    #[error("verification status must be pending, verified, or rejected")]
    InvalidVerificationStatus,
}

/// Profile fields supplied at registration and by profile updates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NgoProfile {
    /// Organisation name.
    pub organization_name: String,
    /// Globally unique registration number.
    pub registration_number: String,
    /// Optional free-form description.
    pub description: Option<String>,
    /// Contact person.
    pub contact_person: ContactPerson,
    /// Postal address.
    pub address: PostalAddress,
    /// Service-area labels used by directory search.
    pub service_areas: Vec<String>,
    /// Declared pickup capacity.
    pub capacity: Capacity,
}

impl NgoProfile {
    /// Validate required profile fields.
    pub fn validate(&self) -> Result<(), NgoValidationError> {
        if self.organization_name.trim().is_empty() {
            return Err(NgoValidationError::MissingOrganizationName);
        }
        if self.registration_number.trim().is_empty() {
            return Err(NgoValidationError::MissingRegistrationNumber);
        }
        let contact = &self.contact_person;
        if contact.name.trim().is_empty()
            || contact.phone.trim().is_empty()
            || contact.email.trim().is_empty()
        {
            return Err(NgoValidationError::IncompleteContactPerson);
        }
        self.address.validate()?;
        Ok(())
    }

    /// Case-insensitive substring match over the service-area labels.
    pub fn serves_area(&self, needle: &str) -> bool {
        let needle = needle.to_lowercase();
        self.service_areas
            .iter()
            .any(|area| area.to_lowercase().contains(&needle))
    }
}

/// Registered relief organisation.
///
/// ## Invariants
/// - `profile.registration_number` is unique across all NGOs.
/// - At most one NGO per owning user.
/// - A verified profile is immutable except through
///   [`Ngo::set_verification`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ngo {
    /// Profile identifier.
    pub id: NgoId,
    /// Owning user (one-to-one, exclusive).
    pub user: UserId,
    /// Profile fields.
    pub profile: NgoProfile,
    /// Administrative approval state.
    pub verification_status: VerificationStatus,
    /// Active flag; inactive NGOs are hidden from search.
    pub is_active: bool,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last mutation timestamp.
    pub updated_at: DateTime<Utc>,
}

impl Ngo {
    /// Register a new profile in the `pending`, active state.
    pub fn register(
        user: UserId,
        profile: NgoProfile,
        now: DateTime<Utc>,
    ) -> Result<Self, NgoValidationError> {
        profile.validate()?;
        Ok(Self {
            id: NgoId::random(),
            user,
            profile,
            verification_status: VerificationStatus::Pending,
            is_active: true,
            created_at: now,
            updated_at: now,
        })
    }

    /// Whether the NGO may claim donations.
    pub fn is_verified(&self) -> bool {
        self.verification_status == VerificationStatus::Verified
    }

    /// Replace the profile fields, bumping `updated_at`.
    ///
    /// Callers must have already checked the profile-mutate capability;
    /// this only validates the replacement fields.
    pub fn update_profile(
        &mut self,
        profile: NgoProfile,
        now: DateTime<Utc>,
    ) -> Result<(), NgoValidationError> {
        profile.validate()?;
        self.profile = profile;
        self.updated_at = now;
        Ok(())
    }

    /// Apply an administrative verification-status change.
    pub fn set_verification(&mut self, status: VerificationStatus, now: DateTime<Utc>) {
        self.verification_status = status;
        self.updated_at = now;
    }
}

/// Claimant details embedded in donation listings for display.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NgoSummary {
    /// NGO profile id.
    pub id: NgoId,
    /// Organisation name.
    pub organization_name: String,
}

impl From<&Ngo> for NgoSummary {
    fn from(ngo: &Ngo) -> Self {
        Self {
            id: ngo.id,
            organization_name: ngo.profile.organization_name.clone(),
        }
    }
}
