//! Account service: registration, login, and profile lookup.
//!
//! Passwords never leave this module unhashed; login failures collapse
//! to a single `unauthorized` answer so callers cannot probe which
//! emails are registered.

use std::sync::Arc;

use chrono::Utc;
use serde_json::json;
use tracing::info;

use super::auth::{self, Credentials, TokenSigner};
use super::error::Error;
use super::id::UserId;
use super::ports::{UserRepository, UserRepositoryError};
use super::user::{EmailAddress, User, UserRole};

/// Input for [`AccountsService::register`].
#[derive(Debug, Clone)]
pub struct RegisterAccount {
    /// Display name.
    pub name: String,
    /// Login email, normalized by [`EmailAddress`].
    pub email: EmailAddress,
    /// Raw password, hashed before storage.
    pub password: String,
}

/// Successful login: the account plus its bearer token.
#[derive(Debug, Clone)]
pub struct AuthenticatedAccount {
    /// The authenticated account.
    pub user: User,
    /// Signed bearer token for subsequent requests.
    pub token: String,
}

/// Driving service for account operations.
pub struct AccountsService {
    users: Arc<dyn UserRepository>,
    signer: Arc<TokenSigner>,
}

impl AccountsService {
    /// Create a service over the user store and token signer.
    pub fn new(users: Arc<dyn UserRepository>, signer: Arc<TokenSigner>) -> Self {
        Self { users, signer }
    }

    fn map_store_error(error: UserRepositoryError) -> Error {
        match error {
            UserRepositoryError::EmailTaken { email } => {
                Error::conflict("email is already registered")
                    .with_details(json!({ "email": email }))
            }
            UserRepositoryError::Storage { message } => {
                Error::internal(format!("user store failed: {message}"))
            }
        }
    }

    /// Register a new account and issue its first token.
    pub async fn register(&self, request: RegisterAccount) -> Result<AuthenticatedAccount, Error> {
        if request.password.len() < auth::PASSWORD_MIN_LEN {
            return Err(Error::invalid_request(format!(
                "password must be at least {} characters",
                auth::PASSWORD_MIN_LEN
            )));
        }
        let now = Utc::now();
        let hash = auth::hash_password(&request.password)?;
        let user = User::new(request.name, request.email, hash, now)
            .map_err(|err| Error::invalid_request(err.to_string()))?;
        self.users
            .insert(&user)
            .await
            .map_err(Self::map_store_error)?;
        info!(user_id = %user.id, "account registered");
        let token = self.signer.issue(user.id, user.role, now)?;
        Ok(AuthenticatedAccount { user, token })
    }

    /// Authenticate credentials and issue a token.
    ///
    /// Unknown email and wrong password are indistinguishable to the
    /// caller.
    pub async fn login(&self, credentials: &Credentials) -> Result<AuthenticatedAccount, Error> {
        let email = EmailAddress::new(credentials.email())
            .map_err(|_| Error::unauthorized("invalid email or password"))?;
        let user = self
            .users
            .find_by_email(&email)
            .await
            .map_err(Self::map_store_error)?
            .ok_or_else(|| Error::unauthorized("invalid email or password"))?;
        if !auth::verify_password(credentials.password(), &user.password_hash)? {
            return Err(Error::unauthorized("invalid email or password"));
        }
        let token = self.signer.issue(user.id, user.role, Utc::now())?;
        Ok(AuthenticatedAccount { user, token })
    }

    /// Fetch the account behind an authenticated identity.
    pub async fn profile(&self, user_id: UserId) -> Result<User, Error> {
        self.users
            .find_by_id(user_id)
            .await
            .map_err(Self::map_store_error)?
            .ok_or_else(|| Error::not_found("user not found"))
    }

    /// Create the administrative account at startup when absent.
    ///
    /// Idempotent: an existing account with the email is left as-is.
    pub async fn ensure_admin(&self, email: EmailAddress, password: &str) -> Result<(), Error> {
        if self
            .users
            .find_by_email(&email)
            .await
            .map_err(Self::map_store_error)?
            .is_some()
        {
            return Ok(());
        }
        let now = Utc::now();
        let hash = auth::hash_password(password)?;
        let mut admin = User::new("Administrator", email, hash, now)
            .map_err(|err| Error::invalid_request(err.to_string()))?;
        admin.role = UserRole::Admin;
        self.users
            .insert(&admin)
            .await
            .map_err(Self::map_store_error)?;
        info!(user_id = %admin.id, "administrator account seeded");
        Ok(())
    }
}
