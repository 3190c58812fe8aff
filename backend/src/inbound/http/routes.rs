//! API route registration.
//!
//! All REST handlers hang off one `/api` scope. Routes with literal
//! segments are registered before their sibling `{id}` routes so that
//! `GET /api/food-donations/my-donations` is never captured as an id.

use actix_web::{HttpRequest, web};

use crate::domain::Error;
use crate::inbound::http::{auth, donations, ngos, tasks};

fn payload_error(message: String, _req: &HttpRequest) -> actix_web::Error {
    Error::invalid_request(message).into()
}

/// Register the `/api` scope and its body and query error handlers.
///
/// Malformed JSON bodies and undecodable query strings answer with the
/// same error payload shape as domain failures instead of the default
/// plain-text 400.
pub fn configure_api(cfg: &mut web::ServiceConfig) {
    let json = web::JsonConfig::default()
        .error_handler(|err, req| payload_error(err.to_string(), req));
    let query = web::QueryConfig::default()
        .error_handler(|err, req| payload_error(err.to_string(), req));

    cfg.service(
        web::scope("/api")
            .app_data(json)
            .app_data(query)
            .service(
                web::scope("/auth")
                    .service(auth::register)
                    .service(auth::login)
                    .service(auth::profile),
            )
            .service(
                web::scope("/food-donations")
                    .service(donations::create)
                    .service(donations::list)
                    .service(donations::my_donations)
                    .service(donations::ngo_claimed)
                    .service(donations::claim)
                    .service(donations::advance_status)
                    .service(donations::get)
                    .service(donations::update)
                    .service(donations::remove),
            )
            .service(
                web::scope("/ngos")
                    .service(ngos::register)
                    .service(ngos::profile)
                    .service(ngos::update_profile)
                    .service(ngos::stats)
                    .service(ngos::search)
                    .service(ngos::list)
                    .service(ngos::verify)
                    .service(ngos::get),
            )
            .service(
                web::scope("/tasks")
                    .service(tasks::create)
                    .service(tasks::list)
                    .service(tasks::get)
                    .service(tasks::update)
                    .service(tasks::remove),
            ),
    );
}
