//! Domain model and services for the donation coordination backend.
//!
//! Purpose: strongly typed entities, policy checks, and driving
//! services, all independent of HTTP and storage. Adapters speak to
//! this layer through the [`ports`] traits and the [`Error`] type;
//! serde contracts are documented on each type.

pub mod accounts;
pub mod address;
pub mod auth;
pub mod donation;
pub mod donations;
pub mod error;
pub mod id;
pub mod ngo;
pub mod ngos;
pub mod policy;
pub mod ports;
pub mod task;
pub mod tasks;
pub mod user;

pub use self::accounts::{AccountsService, AuthenticatedAccount, RegisterAccount};
pub use self::address::PostalAddress;
pub use self::auth::{Credentials, TokenIdentity, TokenSigner};
pub use self::donation::{
    DonationDraft, DonationStatus, DonationView, DonorType, FoodDonation, FoodItem, PickupWindow,
};
pub use self::donations::{DonationsService, ListDonations};
pub use self::error::{Error, ErrorCode};
pub use self::id::{DonationId, NgoId, TaskId, UserId};
pub use self::ngo::{Capacity, ContactPerson, Ngo, NgoProfile, NgoSummary, VerificationStatus};
pub use self::ngos::{ListNgos, NgoView, NgosService, SearchNgos};
pub use self::task::{Task, TaskDraft};
pub use self::tasks::TasksService;
pub use self::user::{EmailAddress, User, UserRole, UserSummary};
