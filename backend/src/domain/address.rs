//! Postal address value object shared by NGO profiles and donation
//! pickup locations.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Postal address with the four fields the directory filters on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PostalAddress {
    /// Street line.
    pub street: String,
    /// City, matched case-insensitively by directory and listing search.
    pub city: String,
    /// State or region.
    pub state: String,
    /// Postal code.
    pub zip_code: String,
}

/// Address field that failed validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum AddressValidationError {
    /// Street was missing or blank.
    #[error("street is required")]
    MissingStreet,
    /// City was missing or blank.
    #[error("city is required")]
    MissingCity,
    /// State was missing or blank.
    #[error("state is required")]
    MissingState,
    /// Zip code was missing or blank.
    #[error("zip code is required")]
    MissingZipCode,
}

impl PostalAddress {
    /// Validate that every required field is present and non-blank.
    pub fn validate(&self) -> Result<(), AddressValidationError> {
        if self.street.trim().is_empty() {
            return Err(AddressValidationError::MissingStreet);
        }
        if self.city.trim().is_empty() {
            return Err(AddressValidationError::MissingCity);
        }
        if self.state.trim().is_empty() {
            return Err(AddressValidationError::MissingState);
        }
        if self.zip_code.trim().is_empty() {
            return Err(AddressValidationError::MissingZipCode);
        }
        Ok(())
    }

    /// Case-insensitive substring match on the city field.
    pub fn city_matches(&self, needle: &str) -> bool {
        self.city.to_lowercase().contains(&needle.to_lowercase())
    }
}
