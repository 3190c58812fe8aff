//! End-to-end tests for account registration, login, and profile.

mod support;

use actix_web::test as actix_test;
use serde_json::{Value, json};

use support::{PASSWORD, bearer, register, register_token, test_app, test_state};

#[actix_web::test]
async fn register_issues_token_and_user_role() {
    let app = actix_test::init_service(test_app(test_state())).await;

    let session = register(&app, "Alice", "alice@example.com").await;
    assert_eq!(session.get("name").and_then(Value::as_str), Some("Alice"));
    assert_eq!(
        session.get("email").and_then(Value::as_str),
        Some("alice@example.com")
    );
    assert_eq!(session.get("role").and_then(Value::as_str), Some("user"));
    assert!(
        session
            .get("token")
            .and_then(Value::as_str)
            .is_some_and(|t| !t.is_empty())
    );
}

#[actix_web::test]
async fn duplicate_email_is_rejected() {
    let app = actix_test::init_service(test_app(test_state())).await;
    register(&app, "Alice", "alice@example.com").await;

    let request = actix_test::TestRequest::post()
        .uri("/api/auth/register")
        .set_json(json!({
            "name": "Also Alice",
            "email": "alice@example.com",
            "password": PASSWORD
        }))
        .to_request();
    let response = actix_test::call_service(&app, request).await;
    assert_eq!(response.status().as_u16(), 400);

    let body: Value = actix_test::read_body_json(response).await;
    assert_eq!(body.get("code").and_then(Value::as_str), Some("conflict"));
}

#[actix_web::test]
async fn missing_password_names_the_field() {
    let app = actix_test::init_service(test_app(test_state())).await;

    let request = actix_test::TestRequest::post()
        .uri("/api/auth/register")
        .set_json(json!({ "name": "Alice", "email": "alice@example.com" }))
        .to_request();
    let response = actix_test::call_service(&app, request).await;
    assert_eq!(response.status().as_u16(), 400);

    let body: Value = actix_test::read_body_json(response).await;
    assert_eq!(
        body.get("code").and_then(Value::as_str),
        Some("invalid_request")
    );
    assert_eq!(
        body.pointer("/details/field").and_then(Value::as_str),
        Some("password")
    );
}

#[actix_web::test]
async fn login_with_wrong_password_is_unauthorized() {
    let app = actix_test::init_service(test_app(test_state())).await;
    register(&app, "Alice", "alice@example.com").await;

    let request = actix_test::TestRequest::post()
        .uri("/api/auth/login")
        .set_json(json!({ "email": "alice@example.com", "password": "not-the-password" }))
        .to_request();
    let response = actix_test::call_service(&app, request).await;
    assert_eq!(response.status().as_u16(), 401);

    let body: Value = actix_test::read_body_json(response).await;
    assert_eq!(
        body.get("code").and_then(Value::as_str),
        Some("unauthorized")
    );
}

#[actix_web::test]
async fn login_returns_a_usable_token() {
    let app = actix_test::init_service(test_app(test_state())).await;
    register(&app, "Alice", "alice@example.com").await;

    let request = actix_test::TestRequest::post()
        .uri("/api/auth/login")
        .set_json(json!({ "email": "alice@example.com", "password": PASSWORD }))
        .to_request();
    let response = actix_test::call_service(&app, request).await;
    assert_eq!(response.status().as_u16(), 200);
    let session: Value = actix_test::read_body_json(response).await;
    let token = session
        .get("token")
        .and_then(Value::as_str)
        .expect("token")
        .to_owned();

    let request = actix_test::TestRequest::get()
        .uri("/api/auth/profile")
        .insert_header(bearer(&token))
        .to_request();
    let response = actix_test::call_service(&app, request).await;
    assert_eq!(response.status().as_u16(), 200);

    let profile: Value = actix_test::read_body_json(response).await;
    assert_eq!(
        profile.get("email").and_then(Value::as_str),
        Some("alice@example.com")
    );
    assert!(profile.get("token").is_none(), "profile must not echo tokens");
}

#[actix_web::test]
async fn profile_without_token_is_unauthorized() {
    let app = actix_test::init_service(test_app(test_state())).await;

    let request = actix_test::TestRequest::get()
        .uri("/api/auth/profile")
        .to_request();
    let response = actix_test::call_service(&app, request).await;
    assert_eq!(response.status().as_u16(), 401);
}

#[actix_web::test]
async fn garbage_token_is_unauthorized() {
    let app = actix_test::init_service(test_app(test_state())).await;
    register_token(&app, "Alice", "alice@example.com").await;

    let request = actix_test::TestRequest::get()
        .uri("/api/auth/profile")
        .insert_header(bearer("not.a.jwt"))
        .to_request();
    let response = actix_test::call_service(&app, request).await;
    assert_eq!(response.status().as_u16(), 401);
}

#[actix_web::test]
async fn error_responses_carry_a_trace_id() {
    let app = actix_test::init_service(test_app(test_state())).await;

    let request = actix_test::TestRequest::get()
        .uri("/api/auth/profile")
        .to_request();
    let response = actix_test::call_service(&app, request).await;
    assert!(response.headers().contains_key("trace-id"));

    let body: Value = actix_test::read_body_json(response).await;
    assert!(
        body.get("traceId")
            .and_then(Value::as_str)
            .is_some_and(|id| !id.is_empty())
    );
}

#[actix_web::test]
async fn malformed_json_body_uses_the_error_schema() {
    let app = actix_test::init_service(test_app(test_state())).await;

    let request = actix_test::TestRequest::post()
        .uri("/api/auth/register")
        .insert_header(("content-type", "application/json"))
        .set_payload("{not json")
        .to_request();
    let response = actix_test::call_service(&app, request).await;
    assert_eq!(response.status().as_u16(), 400);

    let body: Value = actix_test::read_body_json(response).await;
    assert_eq!(
        body.get("code").and_then(Value::as_str),
        Some("invalid_request")
    );
}
