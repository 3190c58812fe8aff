//! Credential handling: password hashing and bearer tokens.
//!
//! Passwords are hashed with Argon2id and stored as PHC-format
//! strings. Authenticated sessions are stateless HS256 bearer tokens
//! carrying the user id and role, verified on every protected route.

use std::str::FromStr;

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use zeroize::Zeroizing;

use super::error::Error;
use super::id::UserId;
use super::user::UserRole;

/// Domain error returned when login payload values are invalid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum CredentialValidationError {
    /// Email was missing or blank once trimmed.
    #[error("email must not be empty")]
    EmptyEmail,
    /// Password was blank.
    #[error("password must not be empty")]
    EmptyPassword,
    /// Password was shorter than the minimum.
    #[error("password must be at least {PASSWORD_MIN_LEN} characters")]
    PasswordTooShort,
}

/// Minimum accepted password length at registration.
pub const PASSWORD_MIN_LEN: usize = 8;

/// Validated login credentials.
///
/// ## Invariants
/// - `email` is trimmed and non-empty.
/// - `password` is non-empty and keeps caller-provided whitespace to
///   avoid surprising credential comparisons.
#[derive(Debug, Clone)]
pub struct Credentials {
    email: String,
    password: Zeroizing<String>,
}

impl Credentials {
    /// Construct credentials from raw email/password inputs.
    pub fn try_from_parts(email: &str, password: &str) -> Result<Self, CredentialValidationError> {
        let normalized = email.trim();
        if normalized.is_empty() {
            return Err(CredentialValidationError::EmptyEmail);
        }
        if password.is_empty() {
            return Err(CredentialValidationError::EmptyPassword);
        }
        Ok(Self {
            email: normalized.to_owned(),
            password: Zeroizing::new(password.to_owned()),
        })
    }

    /// Email string used for the account lookup.
    pub fn email(&self) -> &str {
        self.email.as_str()
    }

    /// Password string provided by the caller.
    pub fn password(&self) -> &str {
        self.password.as_str()
    }
}

/// Hash a password with Argon2id, returning a PHC-format string.
pub fn hash_password(password: &str) -> Result<String, Error> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|err| Error::internal(format!("failed to hash password: {err}")))?;
    Ok(hash.to_string())
}

/// Verify a password against a stored PHC-format hash.
///
/// Returns `Ok(false)` on mismatch; `Err` only when the stored hash is
/// malformed.
pub fn verify_password(password: &str, hash: &str) -> Result<bool, Error> {
    let parsed =
        PasswordHash::new(hash).map_err(|err| Error::internal(format!("invalid hash: {err}")))?;
    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok())
}

/// JWT claim set carried by bearer tokens.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Subject: the user id.
    pub sub: String,
    /// Role marker granted at issue time.
    pub role: UserRole,
    /// Issued-at (seconds since epoch).
    pub iat: i64,
    /// Expiry (seconds since epoch), validated on decode.
    pub exp: i64,
}

/// Verified token identity handed to handlers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TokenIdentity {
    /// Authenticated user id.
    pub user_id: UserId,
    /// Role carried by the token.
    pub role: UserRole,
}

/// Issues and verifies HS256 bearer tokens.
pub struct TokenSigner {
    encoding: EncodingKey,
    decoding: DecodingKey,
    ttl: Duration,
}

impl TokenSigner {
    /// Build a signer from the shared secret and token lifetime.
    pub fn new(secret: &[u8], ttl: Duration) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
            ttl,
        }
    }

    /// Issue a signed, time-limited token for the given identity.
    pub fn issue(
        &self,
        user_id: UserId,
        role: UserRole,
        now: DateTime<Utc>,
    ) -> Result<String, Error> {
        let claims = Claims {
            sub: user_id.to_string(),
            role,
            iat: now.timestamp(),
            exp: (now + self.ttl).timestamp(),
        };
        encode(&Header::default(), &claims, &self.encoding)
            .map_err(|err| Error::internal(format!("failed to sign token: {err}")))
    }

    /// Verify a token's signature and expiry and extract its identity.
    pub fn verify(&self, token: &str) -> Result<TokenIdentity, Error> {
        let data = decode::<Claims>(token, &self.decoding, &Validation::default())
            .map_err(|_| Error::unauthorized("invalid or expired token"))?;
        let user_id = UserId::from_str(&data.claims.sub)
            .map_err(|_| Error::unauthorized("invalid token subject"))?;
        Ok(TokenIdentity {
            user_id,
            role: data.claims.role,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn signer() -> TokenSigner {
        TokenSigner::new(b"test-secret", Duration::minutes(30))
    }

    #[test]
    fn password_hash_verifies_and_rejects() {
        let hash = hash_password("correct horse battery").expect("hash");
        assert!(hash.starts_with("$argon2id$"));
        assert!(verify_password("correct horse battery", &hash).expect("verify"));
        assert!(!verify_password("wrong", &hash).expect("verify"));
    }

    #[test]
    fn tokens_round_trip_identity() {
        let user_id = UserId::random();
        let token = signer()
            .issue(user_id, UserRole::Admin, Utc::now())
            .expect("issue");
        let identity = signer().verify(&token).expect("verify");
        assert_eq!(identity.user_id, user_id);
        assert_eq!(identity.role, UserRole::Admin);
    }

    #[test]
    fn expired_tokens_are_rejected() {
        let issued = Utc::now() - Duration::hours(2);
        let token = signer()
            .issue(UserId::random(), UserRole::User, issued)
            .expect("issue");
        let err = signer().verify(&token).expect_err("expired");
        assert_eq!(err.code(), crate::domain::ErrorCode::Unauthorized);
    }

    #[test]
    fn foreign_signature_is_rejected() {
        let token = signer()
            .issue(UserId::random(), UserRole::User, Utc::now())
            .expect("issue");
        let other = TokenSigner::new(b"different-secret", Duration::minutes(30));
        assert!(other.verify(&token).is_err());
    }

    #[test]
    fn blank_credentials_are_rejected() {
        assert_eq!(
            Credentials::try_from_parts("  ", "pw").unwrap_err(),
            CredentialValidationError::EmptyEmail
        );
        assert_eq!(
            Credentials::try_from_parts("a@b.c", "").unwrap_err(),
            CredentialValidationError::EmptyPassword
        );
    }
}
