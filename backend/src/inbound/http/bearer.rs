//! Bearer-token extractor for protected routes.
//!
//! Handlers take [`AuthUser`] as an argument; extraction fails with a
//! 401 before the handler body runs when the `Authorization` header is
//! missing, malformed, or carries an invalid or expired token.

use actix_web::dev::Payload;
use actix_web::{FromRequest, HttpRequest, web};
use futures_util::future::{Ready, ready};

use crate::domain::{Error, TokenIdentity, UserId, UserRole};
use crate::inbound::http::state::HttpState;

const BEARER_PREFIX: &str = "Bearer ";

/// Verified identity of the calling user.
#[derive(Debug, Clone, Copy)]
pub struct AuthUser(pub TokenIdentity);

impl AuthUser {
    /// Authenticated user id.
    pub fn user_id(&self) -> UserId {
        self.0.user_id
    }

    /// Role carried by the token.
    pub fn role(&self) -> UserRole {
        self.0.role
    }
}

fn extract(req: &HttpRequest) -> Result<AuthUser, Error> {
    let state = req
        .app_data::<web::Data<HttpState>>()
        .ok_or_else(|| Error::internal("HTTP state is not configured"))?;
    let header = req
        .headers()
        .get(actix_web::http::header::AUTHORIZATION)
        .ok_or_else(|| Error::unauthorized("missing authorization header"))?;
    let value = header
        .to_str()
        .map_err(|_| Error::unauthorized("malformed authorization header"))?;
    let token = value
        .strip_prefix(BEARER_PREFIX)
        .ok_or_else(|| Error::unauthorized("authorization header must use the Bearer scheme"))?;
    let identity = state.signer.verify(token.trim())?;
    Ok(AuthUser(identity))
}

impl FromRequest for AuthUser {
    type Error = Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(extract(req))
    }
}
