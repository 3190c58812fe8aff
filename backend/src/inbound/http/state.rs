//! Shared HTTP adapter state.
//!
//! Handlers accept this state via `actix_web::web::Data`, so they only
//! depend on the domain services and stay testable without I/O.

use std::sync::Arc;

use crate::domain::{AccountsService, DonationsService, NgosService, TasksService, TokenSigner};

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    /// Account registration, login, and profile lookup.
    pub accounts: Arc<AccountsService>,
    /// Donation lifecycle operations.
    pub donations: Arc<DonationsService>,
    /// NGO directory operations.
    pub ngos: Arc<NgosService>,
    /// Ownership-scoped task CRUD.
    pub tasks: Arc<TasksService>,
    /// Bearer-token verifier used by the auth extractor.
    pub signer: Arc<TokenSigner>,
}
