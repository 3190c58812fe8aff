//! Food donation listing model and status lifecycle.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::address::{AddressValidationError, PostalAddress};
use super::id::{DonationId, NgoId, UserId};
use super::ngo::NgoSummary;
use super::user::UserSummary;

/// Category of the donating party.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum DonorType {
    /// Restaurant surplus.
    Restaurant,
    /// Private individual.
    Individual,
    /// Catering leftovers.
    Catering,
    /// Grocery stock.
    Grocery,
}

impl FromStr for DonorType {
    type Err = DonationValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "restaurant" => Ok(Self::Restaurant),
            "individual" => Ok(Self::Individual),
            "catering" => Ok(Self::Catering),
            "grocery" => Ok(Self::Grocery),
            _ => Err(DonationValidationError::InvalidDonorType),
        }
    }
}

impl fmt::Display for DonorType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Restaurant => f.write_str("restaurant"),
            Self::Individual => f.write_str("individual"),
            Self::Catering => f.write_str("catering"),
            Self::Grocery => f.write_str("grocery"),
        }
    }
}

/// Lifecycle state of a donation listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum DonationStatus {
    /// Listed and claimable (initial state).
    Available,
    /// Reserved by a verified NGO.
    Claimed,
    /// Collected by the claiming NGO.
    PickedUp,
    /// Delivered to recipients (terminal).
    Delivered,
    /// Expired before delivery (terminal).
    Expired,
}

impl DonationStatus {
    /// Terminal states admit no further transitions.
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Delivered | Self::Expired)
    }

    /// Forward-only transition check for the status-advance operation.
    ///
    /// `claimed` is only reachable through the claim operation, never
    /// through status advance; `expired` is reachable from any
    /// non-terminal state.
    pub fn can_advance_to(self, next: Self) -> bool {
        match (self, next) {
            (Self::Claimed, Self::PickedUp) | (Self::PickedUp, Self::Delivered) => true,
            (current, Self::Expired) => !current.is_terminal(),
            _ => false,
        }
    }
}

impl FromStr for DonationStatus {
    type Err = DonationValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "available" => Ok(Self::Available),
            "claimed" => Ok(Self::Claimed),
            "picked_up" => Ok(Self::PickedUp),
            "delivered" => Ok(Self::Delivered),
            "expired" => Ok(Self::Expired),
            _ => Err(DonationValidationError::InvalidStatus),
        }
    }
}

impl fmt::Display for DonationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Available => f.write_str("available"),
            Self::Claimed => f.write_str("claimed"),
            Self::PickedUp => f.write_str("picked_up"),
            Self::Delivered => f.write_str("delivered"),
            Self::Expired => f.write_str("expired"),
        }
    }
}

/// One line of surplus food in a listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FoodItem {
    /// Item name.
    pub name: String,
    /// Amount in `unit`s; must be positive.
    pub quantity: f64,
    /// Measurement unit (kg, trays, boxes, ...).
    pub unit: String,
    /// Expiry timestamp. No in-the-past check is applied at creation.
    pub expiry_date: DateTime<Utc>,
    /// Optional free-form description.
    pub description: Option<String>,
}

/// Pickup time window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PickupWindow {
    /// Window opens.
    pub start: DateTime<Utc>,
    /// Window closes; must be after `start`.
    pub end: DateTime<Utc>,
}

/// Validation errors for donation drafts.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DonationValidationError {
    /// Donor type string was not a known category.
    #[error("donor type must be restaurant, individual, catering, or grocery")]
    InvalidDonorType,
    /// Status string was not a known lifecycle state.
    #[error("status must be available, claimed, picked_up, delivered, or expired")]
    InvalidStatus,
    /// The food item list was empty.
    #[error("at least one food item is required")]
    NoItems,
    /// An item was missing its name.
    #[error("food item {index} is missing a name")]
    MissingItemName {
        /// Zero-based item index.
        index: usize,
    },
    /// An item had a non-positive quantity.
    #[error("food item {index} must have a positive quantity")]
    NonPositiveQuantity {
        /// Zero-based item index.
        index: usize,
    },
    /// An item was missing its unit.
    #[error("food item {index} is missing a unit")]
    MissingItemUnit {
        /// Zero-based item index.
        index: usize,
    },
    /// Pickup address failed validation.
    #[error(transparent)]
    Address(#[from] AddressValidationError),
    /// Requested a lifecycle move the state machine forbids.
    #[error("cannot move a {from} donation to {to}")]
    InvalidTransition {
        /// Current state of the listing.
        from: DonationStatus,
        /// Requested next state.
        to: DonationStatus,
    },
    /// The pickup window closed before it opened.
    #[error("pickup window must end after it starts")]
    WindowEndsBeforeStart,
}

/// Validated field set for creating or replacing a donation listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DonationDraft {
    /// Donor category.
    pub donor_type: DonorType,
    /// Ordered food items.
    pub food_items: Vec<FoodItem>,
    /// Pickup location.
    pub pickup_address: PostalAddress,
    /// Pickup window.
    pub pickup_time: PickupWindow,
    /// Optional instructions for the collector.
    pub special_instructions: Option<String>,
}

impl DonationDraft {
    /// Validate the draft field constraints shared by create and edit.
    pub fn validate(&self) -> Result<(), DonationValidationError> {
        if self.food_items.is_empty() {
            return Err(DonationValidationError::NoItems);
        }
        for (index, item) in self.food_items.iter().enumerate() {
            if item.name.trim().is_empty() {
                return Err(DonationValidationError::MissingItemName { index });
            }
            if item.quantity <= 0.0 {
                return Err(DonationValidationError::NonPositiveQuantity { index });
            }
            if item.unit.trim().is_empty() {
                return Err(DonationValidationError::MissingItemUnit { index });
            }
        }
        self.pickup_address.validate()?;
        if self.pickup_time.end <= self.pickup_time.start {
            return Err(DonationValidationError::WindowEndsBeforeStart);
        }
        Ok(())
    }
}

/// Surplus-food listing.
///
/// ## Invariants
/// - `claimed_by` and `claimed_at` are both `None` iff `status` is
///   `available`; once set they are never cleared.
/// - Full edits and deletion are only legal while `available`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FoodDonation {
    /// Listing identifier.
    pub id: DonationId,
    /// Owning donor (weak back-reference).
    pub donor: UserId,
    /// Donor category.
    pub donor_type: DonorType,
    /// Ordered food items.
    pub food_items: Vec<FoodItem>,
    /// Pickup location.
    pub pickup_address: PostalAddress,
    /// Pickup window.
    pub pickup_time: PickupWindow,
    /// Optional instructions for the collector.
    pub special_instructions: Option<String>,
    /// Lifecycle state.
    pub status: DonationStatus,
    /// Claiming NGO, set together with `claimed_at`.
    pub claimed_by: Option<NgoId>,
    /// Claim timestamp.
    pub claimed_at: Option<DateTime<Utc>>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last mutation timestamp.
    pub updated_at: DateTime<Utc>,
}

impl FoodDonation {
    /// Create a listing in the `available` state from a validated draft.
    pub fn create(
        donor: UserId,
        draft: DonationDraft,
        now: DateTime<Utc>,
    ) -> Result<Self, DonationValidationError> {
        draft.validate()?;
        Ok(Self {
            id: DonationId::random(),
            donor,
            donor_type: draft.donor_type,
            food_items: draft.food_items,
            pickup_address: draft.pickup_address,
            pickup_time: draft.pickup_time,
            special_instructions: draft.special_instructions,
            status: DonationStatus::Available,
            claimed_by: None,
            claimed_at: None,
            created_at: now,
            updated_at: now,
        })
    }

    /// Replace the editable fields from a validated draft.
    ///
    /// Callers must have already checked the mutate capability (owner
    /// and `available`); lifecycle fields are untouched.
    pub fn apply_draft(
        &mut self,
        draft: DonationDraft,
        now: DateTime<Utc>,
    ) -> Result<(), DonationValidationError> {
        draft.validate()?;
        self.donor_type = draft.donor_type;
        self.food_items = draft.food_items;
        self.pickup_address = draft.pickup_address;
        self.pickup_time = draft.pickup_time;
        self.special_instructions = draft.special_instructions;
        self.updated_at = now;
        Ok(())
    }

    /// Move the listing to `next`, enforcing forward-only transitions.
    pub fn advance(
        &mut self,
        next: DonationStatus,
        now: DateTime<Utc>,
    ) -> Result<(), DonationValidationError> {
        if !self.status.can_advance_to(next) {
            return Err(DonationValidationError::InvalidTransition {
                from: self.status,
                to: next,
            });
        }
        self.status = next;
        self.updated_at = now;
        Ok(())
    }

    /// Whether the claim invariant holds for this record.
    pub fn claim_invariant_holds(&self) -> bool {
        let unclaimed = self.claimed_by.is_none() && self.claimed_at.is_none();
        match self.status {
            DonationStatus::Available => unclaimed,
            _ => self.claimed_by.is_some() && self.claimed_at.is_some(),
        }
    }
}

/// Donation with its owner and claimant resolved for display.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DonationView {
    /// The listing itself.
    pub donation: FoodDonation,
    /// Resolved donor summary, when the account still exists.
    pub donor: Option<UserSummary>,
    /// Resolved claimant summary, when claimed.
    pub claimed_by: Option<NgoSummary>,
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use chrono::Duration;
    use rstest::rstest;

    pub(crate) fn draft() -> DonationDraft {
        let now = Utc::now();
        DonationDraft {
            donor_type: DonorType::Restaurant,
            food_items: vec![FoodItem {
                name: "Bread".into(),
                quantity: 12.0,
                unit: "loaves".into(),
                expiry_date: now + Duration::days(1),
                description: None,
            }],
            pickup_address: PostalAddress {
                street: "1 Main St".into(),
                city: "Springfield".into(),
                state: "IL".into(),
                zip_code: "62701".into(),
            },
            pickup_time: PickupWindow {
                start: now + Duration::hours(1),
                end: now + Duration::hours(3),
            },
            special_instructions: None,
        }
    }

    #[rstest]
    #[case(DonationStatus::Claimed, DonationStatus::PickedUp, true)]
    #[case(DonationStatus::PickedUp, DonationStatus::Delivered, true)]
    #[case(DonationStatus::Available, DonationStatus::Expired, true)]
    #[case(DonationStatus::Claimed, DonationStatus::Expired, true)]
    #[case(DonationStatus::PickedUp, DonationStatus::Expired, true)]
    #[case(DonationStatus::Available, DonationStatus::Claimed, false)]
    #[case(DonationStatus::Available, DonationStatus::PickedUp, false)]
    #[case(DonationStatus::Claimed, DonationStatus::Delivered, false)]
    #[case(DonationStatus::Delivered, DonationStatus::Expired, false)]
    #[case(DonationStatus::Expired, DonationStatus::Expired, false)]
    #[case(DonationStatus::PickedUp, DonationStatus::Claimed, false)]
    #[case(DonationStatus::Claimed, DonationStatus::Available, false)]
    fn advance_is_forward_only(
        #[case] from: DonationStatus,
        #[case] to: DonationStatus,
        #[case] allowed: bool,
    ) {
        assert_eq!(from.can_advance_to(to), allowed);
    }

    #[test]
    fn create_starts_available_and_unclaimed() {
        let donation =
            FoodDonation::create(UserId::random(), draft(), Utc::now()).expect("valid draft");
        assert_eq!(donation.status, DonationStatus::Available);
        assert!(donation.claimed_by.is_none());
        assert!(donation.claimed_at.is_none());
        assert!(donation.claim_invariant_holds());
    }

    #[test]
    fn empty_item_list_is_rejected() {
        let mut d = draft();
        d.food_items.clear();
        assert_eq!(d.validate(), Err(DonationValidationError::NoItems));
    }

    #[rstest]
    #[case(0.0)]
    #[case(-2.0)]
    fn non_positive_quantity_is_rejected(#[case] quantity: f64) {
        let mut d = draft();
        d.food_items[0].quantity = quantity;
        assert_eq!(
            d.validate(),
            Err(DonationValidationError::NonPositiveQuantity { index: 0 })
        );
    }

    #[test]
    fn inverted_pickup_window_is_rejected() {
        let mut d = draft();
        d.pickup_time.end = d.pickup_time.start - Duration::minutes(1);
        assert_eq!(
            d.validate(),
            Err(DonationValidationError::WindowEndsBeforeStart)
        );
    }

    #[test]
    fn statuses_round_trip_through_strings() {
        for status in [
            DonationStatus::Available,
            DonationStatus::Claimed,
            DonationStatus::PickedUp,
            DonationStatus::Delivered,
            DonationStatus::Expired,
        ] {
            let parsed: DonationStatus = status.to_string().parse().expect("round trip");
            assert_eq!(parsed, status);
        }
    }
}
