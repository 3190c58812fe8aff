//! Driven ports: how the domain talks to the entity store.
//!
//! Each repository trait exposes strongly typed errors so adapters map
//! their failures into predictable variants instead of returning
//! `anyhow::Result`. The store behind these ports is the single
//! serialization point; no other shared mutable state exists between
//! requests.

pub mod donation_repository;
pub mod ngo_repository;
pub mod task_repository;
pub mod user_repository;

pub use donation_repository::{
    ClaimOutcome, DonationOrder, DonationQuery, DonationRepository, DonationRepositoryError,
    NgoDonationStats,
};
pub use ngo_repository::{NgoQuery, NgoRepository, NgoRepositoryError};
pub use task_repository::{TaskRepository, TaskRepositoryError};
pub use user_repository::{UserRepository, UserRepositoryError};
