//! HTTP inbound adapter exposing the REST endpoints.

pub mod auth;
pub mod bearer;
pub mod donations;
pub mod error;
pub mod health;
pub mod ngos;
pub mod routes;
pub mod state;
pub mod tasks;
pub mod validation;

pub use error::ApiResult;
pub use routes::configure_api;
pub use state::HttpState;
