//! Persistence port for user accounts.

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::id::UserId;
use crate::domain::user::{EmailAddress, User};

/// Errors surfaced by the user persistence adapter.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UserRepositoryError {
    /// The email is already registered to another account.
    #[error("email {email} is already registered")]
    EmailTaken {
        /// The offending email address.
        email: String,
    },
    /// Storage-level failure bubbling up from the adapter.
    #[error("user storage failed: {message}")]
    Storage {
        /// Adapter-provided description.
        message: String,
    },
}

impl UserRepositoryError {
    /// Helper for adapter storage failures.
    pub fn storage(message: impl Into<String>) -> Self {
        Self::Storage {
            message: message.into(),
        }
    }
}

/// Store operations over user records.
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Insert a new account, enforcing email uniqueness.
    async fn insert(&self, user: &User) -> Result<(), UserRepositoryError>;

    /// Fetch an account by id.
    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, UserRepositoryError>;

    /// Fetch an account by its unique email.
    async fn find_by_email(
        &self,
        email: &EmailAddress,
    ) -> Result<Option<User>, UserRepositoryError>;
}
