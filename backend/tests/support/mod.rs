//! Shared fixtures for the HTTP API tests.
//!
//! Each test builds a real application over the in-memory store, so
//! requests exercise the full stack: routing, extractors, services, and
//! the persistence adapter.

#![allow(dead_code)]

use actix_web::dev::{ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::http::header;
use actix_web::{App, test as actix_test, web};
use backend::Trace;
use backend::domain::EmailAddress;
use backend::inbound::http::{HttpState, configure_api};
use backend::server::{ServerConfig, build_state};
use chrono::{Duration, Utc};
use serde_json::{Value, json};

pub const PASSWORD: &str = "hunter2hunter2";

/// Build the HTTP state over a fresh in-memory store.
pub fn test_state() -> HttpState {
    let config = ServerConfig::new(
        "127.0.0.1:0".parse().expect("loopback address"),
        b"integration-secret",
        Duration::minutes(30),
    );
    build_state(&config)
}

/// Build the application under test over `state`.
pub fn test_app(
    state: HttpState,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    App::new()
        .app_data(web::Data::new(state))
        .wrap(Trace)
        .configure(configure_api)
}

/// Register an account and return the session response body.
pub async fn register(
    app: &impl actix_web::dev::Service<
        actix_http::Request,
        Response = ServiceResponse,
        Error = actix_web::Error,
    >,
    name: &str,
    email: &str,
) -> Value {
    let request = actix_test::TestRequest::post()
        .uri("/api/auth/register")
        .set_json(json!({ "name": name, "email": email, "password": PASSWORD }))
        .to_request();
    let response = actix_test::call_service(app, request).await;
    assert_eq!(response.status().as_u16(), 201, "registration should succeed");
    actix_test::read_body_json(response).await
}

/// Register an account and return just its bearer token.
pub async fn register_token(
    app: &impl actix_web::dev::Service<
        actix_http::Request,
        Response = ServiceResponse,
        Error = actix_web::Error,
    >,
    name: &str,
    email: &str,
) -> String {
    token_of(&register(app, name, email).await)
}

/// Seed the administrator account and return its bearer token.
pub async fn admin_token(
    state: &HttpState,
    app: &impl actix_web::dev::Service<
        actix_http::Request,
        Response = ServiceResponse,
        Error = actix_web::Error,
    >,
) -> String {
    let email = EmailAddress::new("admin@example.com").expect("valid email");
    state
        .accounts
        .ensure_admin(email, PASSWORD)
        .await
        .expect("seed admin");

    let request = actix_test::TestRequest::post()
        .uri("/api/auth/login")
        .set_json(json!({ "email": "admin@example.com", "password": PASSWORD }))
        .to_request();
    let response = actix_test::call_service(app, request).await;
    assert_eq!(response.status().as_u16(), 200, "admin login should succeed");
    let body: Value = actix_test::read_body_json(response).await;
    token_of(&body)
}

/// Extract the token field from a session response body.
pub fn token_of(session: &Value) -> String {
    session
        .get("token")
        .and_then(Value::as_str)
        .expect("session token")
        .to_owned()
}

/// Authorization header tuple for `token`.
pub fn bearer(token: &str) -> (header::HeaderName, String) {
    (header::AUTHORIZATION, format!("Bearer {token}"))
}

/// Valid donation request body with the given pickup city.
pub fn donation_body(city: &str) -> Value {
    let now = Utc::now();
    json!({
        "donorType": "restaurant",
        "foodItems": [{
            "name": "Vegetable curry",
            "quantity": 12.0,
            "unit": "trays",
            "expiryDate": now + Duration::days(1),
            "description": "Mildly spiced"
        }],
        "pickupAddress": {
            "street": "1 Market Row",
            "city": city,
            "state": "Greater Manchester",
            "zipCode": "M1 1AA"
        },
        "pickupTime": {
            "start": now + Duration::hours(1),
            "end": now + Duration::hours(3)
        },
        "specialInstructions": "Ring the service bell"
    })
}

/// Valid NGO registration body with the given registration number and
/// city.
pub fn ngo_body(registration_number: &str, city: &str) -> Value {
    json!({
        "organizationName": "Plates for People",
        "registrationNumber": registration_number,
        "description": "Redistributes restaurant surplus",
        "contactPerson": {
            "name": "Priya Shah",
            "phone": "+44 161 555 0192",
            "email": "priya@platesforpeople.example"
        },
        "address": {
            "street": "88 Canal Street",
            "city": city,
            "state": "Greater Manchester",
            "zipCode": "M1 6FB"
        },
        "serviceAreas": ["Northern Quarter", "Ancoats"],
        "capacity": { "dailyPickups": 6, "storageCapacity": "Medium" }
    })
}
