//! End-to-end tests for the NGO directory and verification endpoints.

mod support;

use actix_web::dev::ServiceResponse;
use actix_web::test as actix_test;
use serde_json::{Value, json};

use support::{admin_token, bearer, ngo_body, register_token, test_app, test_state};

async fn register_ngo(
    app: &impl actix_web::dev::Service<
        actix_http::Request,
        Response = ServiceResponse,
        Error = actix_web::Error,
    >,
    token: &str,
    registration_number: &str,
    city: &str,
) -> Value {
    let request = actix_test::TestRequest::post()
        .uri("/api/ngos/register")
        .insert_header(bearer(token))
        .set_json(ngo_body(registration_number, city))
        .to_request();
    let response = actix_test::call_service(app, request).await;
    assert_eq!(response.status().as_u16(), 201, "registration should succeed");
    actix_test::read_body_json(response).await
}

#[actix_web::test]
async fn registration_starts_pending_and_active() {
    let app = actix_test::init_service(test_app(test_state())).await;
    let token = register_token(&app, "Priya", "priya@example.com").await;

    let profile = register_ngo(&app, &token, "REG-100", "Manchester").await;
    assert_eq!(
        profile.get("verificationStatus").and_then(Value::as_str),
        Some("pending")
    );
    assert_eq!(profile.get("isActive").and_then(Value::as_bool), Some(true));
    assert_eq!(
        profile.get("organizationName").and_then(Value::as_str),
        Some("Plates for People")
    );
    assert_eq!(
        profile.pointer("/user/name").and_then(Value::as_str),
        Some("Priya")
    );
}

#[actix_web::test]
async fn duplicate_registration_number_is_rejected() {
    let app = actix_test::init_service(test_app(test_state())).await;
    let first = register_token(&app, "Priya", "priya@example.com").await;
    let second = register_token(&app, "Omar", "omar@example.com").await;

    register_ngo(&app, &first, "REG-100", "Manchester").await;

    let request = actix_test::TestRequest::post()
        .uri("/api/ngos/register")
        .insert_header(bearer(&second))
        .set_json(ngo_body("REG-100", "Leeds"))
        .to_request();
    let response = actix_test::call_service(&app, request).await;
    assert_eq!(response.status().as_u16(), 400);

    let error: Value = actix_test::read_body_json(response).await;
    assert_eq!(error.get("code").and_then(Value::as_str), Some("conflict"));
    assert_eq!(
        error
            .pointer("/details/registrationNumber")
            .and_then(Value::as_str),
        Some("REG-100")
    );
}

#[actix_web::test]
async fn one_profile_per_user() {
    let app = actix_test::init_service(test_app(test_state())).await;
    let token = register_token(&app, "Priya", "priya@example.com").await;
    register_ngo(&app, &token, "REG-100", "Manchester").await;

    let request = actix_test::TestRequest::post()
        .uri("/api/ngos/register")
        .insert_header(bearer(&token))
        .set_json(ngo_body("REG-200", "Leeds"))
        .to_request();
    let response = actix_test::call_service(&app, request).await;
    assert_eq!(response.status().as_u16(), 400);

    let error: Value = actix_test::read_body_json(response).await;
    assert_eq!(error.get("code").and_then(Value::as_str), Some("conflict"));
}

#[actix_web::test]
async fn profile_is_editable_until_verified() {
    let state = test_state();
    let app = actix_test::init_service(test_app(state.clone())).await;
    let token = register_token(&app, "Priya", "priya@example.com").await;
    let profile = register_ngo(&app, &token, "REG-100", "Manchester").await;
    let id = profile.get("id").and_then(Value::as_str).expect("ngo id");

    let mut updated = ngo_body("REG-100", "Salford");
    updated["organizationName"] = json!("Plates for People North");
    let request = actix_test::TestRequest::put()
        .uri("/api/ngos/profile")
        .insert_header(bearer(&token))
        .set_json(&updated)
        .to_request();
    let response = actix_test::call_service(&app, request).await;
    assert_eq!(response.status().as_u16(), 200);
    let body: Value = actix_test::read_body_json(response).await;
    assert_eq!(
        body.get("organizationName").and_then(Value::as_str),
        Some("Plates for People North")
    );

    let admin = admin_token(&state, &app).await;
    let request = actix_test::TestRequest::put()
        .uri(&format!("/api/ngos/{id}/verify"))
        .insert_header(bearer(&admin))
        .set_json(json!({ "status": "verified" }))
        .to_request();
    assert_eq!(
        actix_test::call_service(&app, request).await.status().as_u16(),
        200
    );

    // Verified profiles are locked.
    let request = actix_test::TestRequest::put()
        .uri("/api/ngos/profile")
        .insert_header(bearer(&token))
        .set_json(&updated)
        .to_request();
    let response = actix_test::call_service(&app, request).await;
    assert_eq!(response.status().as_u16(), 400);
    let error: Value = actix_test::read_body_json(response).await;
    assert_eq!(
        error.get("code").and_then(Value::as_str),
        Some("invalid_state")
    );
}

#[actix_web::test]
async fn search_shows_only_verified_active_ngos() {
    let state = test_state();
    let app = actix_test::init_service(test_app(state.clone())).await;
    let verified = register_token(&app, "Priya", "priya@example.com").await;
    let pending = register_token(&app, "Omar", "omar@example.com").await;

    let profile = register_ngo(&app, &verified, "REG-100", "Manchester").await;
    register_ngo(&app, &pending, "REG-200", "Manchester").await;

    let id = profile.get("id").and_then(Value::as_str).expect("ngo id");
    let admin = admin_token(&state, &app).await;
    let request = actix_test::TestRequest::put()
        .uri(&format!("/api/ngos/{id}/verify"))
        .insert_header(bearer(&admin))
        .set_json(json!({ "status": "verified" }))
        .to_request();
    assert_eq!(
        actix_test::call_service(&app, request).await.status().as_u16(),
        200
    );

    // No token: the directory search is public.
    let request = actix_test::TestRequest::get()
        .uri("/api/ngos/search?city=manchester")
        .to_request();
    let response = actix_test::call_service(&app, request).await;
    assert_eq!(response.status().as_u16(), 200);
    let page: Value = actix_test::read_body_json(response).await;
    let items = page.get("items").and_then(Value::as_array).expect("items");
    assert_eq!(items.len(), 1);
    assert_eq!(items[0].get("id").and_then(Value::as_str), Some(id));

    let request = actix_test::TestRequest::get()
        .uri("/api/ngos/search?serviceArea=ancoats")
        .to_request();
    let response = actix_test::call_service(&app, request).await;
    let page: Value = actix_test::read_body_json(response).await;
    assert_eq!(page.get("total").and_then(Value::as_u64), Some(1));
}

#[actix_web::test]
async fn admin_listing_sees_everything() {
    let state = test_state();
    let app = actix_test::init_service(test_app(state.clone())).await;
    let first = register_token(&app, "Priya", "priya@example.com").await;
    let second = register_token(&app, "Omar", "omar@example.com").await;
    register_ngo(&app, &first, "REG-100", "Manchester").await;
    register_ngo(&app, &second, "REG-200", "Leeds").await;

    // Ordinary users are turned away.
    let request = actix_test::TestRequest::get()
        .uri("/api/ngos")
        .insert_header(bearer(&first))
        .to_request();
    let response = actix_test::call_service(&app, request).await;
    assert_eq!(response.status().as_u16(), 403);

    let admin = admin_token(&state, &app).await;
    let request = actix_test::TestRequest::get()
        .uri("/api/ngos")
        .insert_header(bearer(&admin))
        .to_request();
    let response = actix_test::call_service(&app, request).await;
    assert_eq!(response.status().as_u16(), 200);
    let page: Value = actix_test::read_body_json(response).await;
    assert_eq!(page.get("total").and_then(Value::as_u64), Some(2));

    let request = actix_test::TestRequest::get()
        .uri("/api/ngos?verificationStatus=pending&city=leeds")
        .insert_header(bearer(&admin))
        .to_request();
    let response = actix_test::call_service(&app, request).await;
    let page: Value = actix_test::read_body_json(response).await;
    assert_eq!(page.get("total").and_then(Value::as_u64), Some(1));
}

#[actix_web::test]
async fn verification_is_admin_only_and_validated() {
    let state = test_state();
    let app = actix_test::init_service(test_app(state.clone())).await;
    let token = register_token(&app, "Priya", "priya@example.com").await;
    let profile = register_ngo(&app, &token, "REG-100", "Manchester").await;
    let id = profile.get("id").and_then(Value::as_str).expect("ngo id");

    let request = actix_test::TestRequest::put()
        .uri(&format!("/api/ngos/{id}/verify"))
        .insert_header(bearer(&token))
        .set_json(json!({ "status": "verified" }))
        .to_request();
    let response = actix_test::call_service(&app, request).await;
    assert_eq!(response.status().as_u16(), 403);

    let admin = admin_token(&state, &app).await;
    let request = actix_test::TestRequest::put()
        .uri(&format!("/api/ngos/{id}/verify"))
        .insert_header(bearer(&admin))
        .set_json(json!({ "status": "approved" }))
        .to_request();
    let response = actix_test::call_service(&app, request).await;
    assert_eq!(response.status().as_u16(), 400);

    let request = actix_test::TestRequest::put()
        .uri(&format!("/api/ngos/{id}/verify"))
        .insert_header(bearer(&admin))
        .set_json(json!({ "status": "rejected" }))
        .to_request();
    let response = actix_test::call_service(&app, request).await;
    assert_eq!(response.status().as_u16(), 200);
    let body: Value = actix_test::read_body_json(response).await;
    assert_eq!(
        body.get("verificationStatus").and_then(Value::as_str),
        Some("rejected")
    );
}

#[actix_web::test]
async fn profile_lookup_by_id_is_public() {
    let app = actix_test::init_service(test_app(test_state())).await;
    let token = register_token(&app, "Priya", "priya@example.com").await;
    let profile = register_ngo(&app, &token, "REG-100", "Manchester").await;
    let id = profile.get("id").and_then(Value::as_str).expect("ngo id");

    let request = actix_test::TestRequest::get()
        .uri(&format!("/api/ngos/{id}"))
        .to_request();
    let response = actix_test::call_service(&app, request).await;
    assert_eq!(response.status().as_u16(), 200);

    let request = actix_test::TestRequest::get()
        .uri("/api/ngos/not-a-uuid")
        .to_request();
    let response = actix_test::call_service(&app, request).await;
    assert_eq!(response.status().as_u16(), 404);
}

#[actix_web::test]
async fn missing_profile_is_not_found() {
    let app = actix_test::init_service(test_app(test_state())).await;
    let token = register_token(&app, "Priya", "priya@example.com").await;

    let request = actix_test::TestRequest::get()
        .uri("/api/ngos/profile")
        .insert_header(bearer(&token))
        .to_request();
    let response = actix_test::call_service(&app, request).await;
    assert_eq!(response.status().as_u16(), 404);
}
