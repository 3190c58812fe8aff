//! Authorization policy: capability checks over actors and records.
//!
//! Every check is a pure function of the actor identity, the actor's
//! NGO profile when relevant, and the target record. Outcomes are
//! distinct: capability denied is [`ErrorCode::Forbidden`]; record in
//! the wrong lifecycle state is [`ErrorCode::InvalidState`]. Absence
//! checks (`NotFound`) happen before these are consulted.
//!
//! [`ErrorCode::Forbidden`]: super::error::ErrorCode::Forbidden
//! [`ErrorCode::InvalidState`]: super::error::ErrorCode::InvalidState

use super::donation::{DonationStatus, FoodDonation};
use super::error::Error;
use super::id::UserId;
use super::ngo::Ngo;
use super::task::Task;
use super::user::UserRole;

/// May `actor` edit or delete `donation`?
///
/// Ownership is checked before lifecycle state, so a non-owner is
/// always told `forbidden` regardless of the donation's status.
pub fn donation_mutable_by(donation: &FoodDonation, actor: UserId) -> Result<(), Error> {
    if donation.donor != actor {
        return Err(Error::forbidden("not authorized to modify this donation"));
    }
    if donation.status != DonationStatus::Available {
        return Err(Error::invalid_state(
            "cannot modify a donation that is no longer available",
        ));
    }
    Ok(())
}

/// May the holder of `ngo` claim `donation`?
///
/// The lifecycle gate is checked first, then the claimant's
/// verification.
pub fn donation_claimable_by(donation: &FoodDonation, ngo: Option<&Ngo>) -> Result<(), Error> {
    if donation.status != DonationStatus::Available {
        return Err(Error::invalid_state(
            "donation is not available for claiming",
        ));
    }
    let ngo = ngo.ok_or_else(|| Error::forbidden("only NGOs can claim donations"))?;
    if !ngo.is_verified() {
        return Err(Error::forbidden(
            "NGO must be verified to claim donations",
        ));
    }
    Ok(())
}

/// May `actor` advance the status of `donation`?
///
/// Allowed for the owning donor or the user linked to the claiming
/// NGO. `claimant_owner` is that linked user, when the donation has a
/// claimant whose profile still resolves.
pub fn donation_status_advanceable_by(
    donation: &FoodDonation,
    actor: UserId,
    claimant_owner: Option<UserId>,
) -> Result<(), Error> {
    if donation.donor == actor || claimant_owner == Some(actor) {
        return Ok(());
    }
    Err(Error::forbidden("not authorized to update this donation"))
}

/// May `actor` mutate the NGO `profile`?
///
/// Owners may edit their profile only until it is verified; the
/// verified state is immutable except through the verification
/// transition itself.
pub fn ngo_profile_mutable_by(ngo: &Ngo, actor: UserId) -> Result<(), Error> {
    if ngo.user != actor {
        return Err(Error::forbidden("not authorized to modify this NGO profile"));
    }
    if ngo.is_verified() {
        return Err(Error::invalid_state("cannot update a verified NGO profile"));
    }
    Ok(())
}

/// Require the administrative role.
pub fn require_admin(role: UserRole) -> Result<(), Error> {
    if role.is_admin() {
        Ok(())
    } else {
        Err(Error::forbidden("administrator role required"))
    }
}

/// May `actor` read or mutate `task`? Ownership only.
pub fn task_owned_by(task: &Task, actor: UserId) -> Result<(), Error> {
    if task.user == actor {
        Ok(())
    } else {
        Err(Error::forbidden("not authorized to access this task"))
    }
}
