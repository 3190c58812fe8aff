//! User account model.

use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

use chrono::{DateTime, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};

use super::id::UserId;

/// Validation errors returned by the account value constructors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum UserValidationError {
    /// Name was missing or blank once trimmed.
    #[error("name must not be empty")]
    EmptyName,
    /// Email failed the shape check.
    #[error("email address is not valid")]
    InvalidEmail,
    /// Role string did not name a known role.
    #[error("role must be user or admin")]
    InvalidRole,
}

static EMAIL_RE: OnceLock<Regex> = OnceLock::new();

fn email_regex() -> &'static Regex {
    EMAIL_RE.get_or_init(|| {
        // Shape check only; deliverability is the mail system's problem.
        let pattern = r"^[^@\s]+@[^@\s]+\.[^@\s]+$";
        Regex::new(pattern)
            .unwrap_or_else(|error| panic!("email regex failed to compile: {error}"))
    })
}

/// Unique, validated email address.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(try_from = "String", into = "String")]
#[schema(value_type = String, format = Email)]
pub struct EmailAddress(String);

impl EmailAddress {
    /// Validate and construct an email address. Input is trimmed and
    /// lowercased so uniqueness checks are case-insensitive.
    pub fn new(raw: impl AsRef<str>) -> Result<Self, UserValidationError> {
        let normalized = raw.as_ref().trim().to_lowercase();
        if !email_regex().is_match(&normalized) {
            return Err(UserValidationError::InvalidEmail);
        }
        Ok(Self(normalized))
    }

    /// Borrow the address as a string slice.
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for EmailAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<EmailAddress> for String {
    fn from(value: EmailAddress) -> Self {
        value.0
    }
}

impl TryFrom<String> for EmailAddress {
    type Error = UserValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Role marker carried in the bearer token.
///
/// Registration always issues [`UserRole::User`]; the admin role gates
/// NGO verification and the unscoped directory listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    /// Ordinary account: may donate, register an NGO, manage tasks.
    User,
    /// Administrative account.
    Admin,
}

impl UserRole {
    /// Whether this role carries administrative capability.
    pub fn is_admin(self) -> bool {
        matches!(self, Self::Admin)
    }
}

impl FromStr for UserRole {
    type Err = UserValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "user" => Ok(Self::User),
            "admin" => Ok(Self::Admin),
            _ => Err(UserValidationError::InvalidRole),
        }
    }
}

impl fmt::Display for UserRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::User => f.write_str("user"),
            Self::Admin => f.write_str("admin"),
        }
    }
}

/// User account record.
///
/// The credential is stored as an argon2id PHC string and never leaves
/// the domain layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    /// Account identifier.
    pub id: UserId,
    /// Display name shown on donation listings.
    pub name: String,
    /// Unique login email.
    pub email: EmailAddress,
    /// Argon2id PHC hash of the password.
    pub password_hash: String,
    /// Role marker.
    pub role: UserRole,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last mutation timestamp.
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Construct a fresh account with the [`UserRole::User`] role.
    pub fn new(
        name: impl Into<String>,
        email: EmailAddress,
        password_hash: String,
        now: DateTime<Utc>,
    ) -> Result<Self, UserValidationError> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(UserValidationError::EmptyName);
        }
        Ok(Self {
            id: UserId::random(),
            name,
            email,
            password_hash,
            role: UserRole::User,
            created_at: now,
            updated_at: now,
        })
    }
}

/// Owner details embedded in donation and NGO views for display.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, utoipa::ToSchema)]
pub struct UserSummary {
    /// Donor account id.
    pub id: UserId,
    /// Donor display name.
    pub name: String,
    /// Donor contact email.
    pub email: EmailAddress,
}

impl From<&User> for UserSummary {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            name: user.name.clone(),
            email: user.email.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("alice@example.com", true)]
    #[case("  Alice@Example.Com  ", true)]
    #[case("no-at-sign", false)]
    #[case("two@at@signs.com", false)]
    #[case("spaces in@local.com", false)]
    #[case("nodot@host", false)]
    fn email_shape_check(#[case] raw: &str, #[case] ok: bool) {
        assert_eq!(EmailAddress::new(raw).is_ok(), ok);
    }

    #[test]
    fn email_normalises_case() {
        let email = EmailAddress::new("Alice@Example.COM").expect("valid");
        assert_eq!(email.as_str(), "alice@example.com");
    }

    #[test]
    fn new_accounts_get_user_role() {
        let email = EmailAddress::new("bob@example.com").expect("valid");
        let user = User::new("Bob", email, "$argon2id$stub".into(), Utc::now()).expect("valid");
        assert_eq!(user.role, UserRole::User);
        assert!(!user.role.is_admin());
    }

    #[test]
    fn blank_name_is_rejected() {
        let email = EmailAddress::new("bob@example.com").expect("valid");
        let result = User::new("   ", email, "$argon2id$stub".into(), Utc::now());
        assert_eq!(result, Err(UserValidationError::EmptyName));
    }
}
