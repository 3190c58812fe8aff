//! OpenAPI documentation configuration.
//!
//! [`ApiDoc`] generates the OpenAPI specification for the REST API. It
//! registers every inbound path, the shared schemas, and the bearer
//! token security scheme used by authenticated endpoints. The generated
//! document backs Swagger UI in debug builds.

use utoipa::openapi::security::{Http, HttpAuthScheme, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::domain::{
    Capacity, ContactPerson, DonationId, DonationStatus, DonorType, EmailAddress, Error,
    ErrorCode, FoodItem, NgoId, NgoProfile, NgoSummary, PickupWindow, PostalAddress, Task, TaskId,
    UserId, UserRole, UserSummary, VerificationStatus,
};
use crate::inbound::http::auth::{LoginRequest, ProfileResponse, RegisterRequest, SessionResponse};
use crate::inbound::http::donations::{DonationRequest, DonationResponse, StatusRequest};
use crate::inbound::http::ngos::{NgoRequest, NgoResponse, StatsResponse, VerifyRequest};
use crate::inbound::http::tasks::TaskRequest;
use pagination::Page;

/// Enrich the generated document with the bearer token security scheme.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);

        components.add_security_scheme(
            "BearerToken",
            SecurityScheme::Http(
                Http::builder()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .description(Some("Token issued by POST /api/auth/login."))
                    .build(),
            ),
        );
    }
}

/// OpenAPI document for the REST API.
#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "Food donation coordination API",
        description = "HTTP interface for donors, NGOs, and administrators \
                       coordinating surplus food donations."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    security(("BearerToken" = [])),
    paths(
        crate::inbound::http::auth::register,
        crate::inbound::http::auth::login,
        crate::inbound::http::auth::profile,
        crate::inbound::http::donations::create,
        crate::inbound::http::donations::list,
        crate::inbound::http::donations::my_donations,
        crate::inbound::http::donations::ngo_claimed,
        crate::inbound::http::donations::get,
        crate::inbound::http::donations::update,
        crate::inbound::http::donations::remove,
        crate::inbound::http::donations::claim,
        crate::inbound::http::donations::advance_status,
        crate::inbound::http::ngos::register,
        crate::inbound::http::ngos::profile,
        crate::inbound::http::ngos::update_profile,
        crate::inbound::http::ngos::stats,
        crate::inbound::http::ngos::search,
        crate::inbound::http::ngos::list,
        crate::inbound::http::ngos::get,
        crate::inbound::http::ngos::verify,
        crate::inbound::http::tasks::create,
        crate::inbound::http::tasks::list,
        crate::inbound::http::tasks::get,
        crate::inbound::http::tasks::update,
        crate::inbound::http::tasks::remove,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        Error,
        ErrorCode,
        UserId,
        NgoId,
        DonationId,
        TaskId,
        EmailAddress,
        UserRole,
        UserSummary,
        NgoSummary,
        PostalAddress,
        DonorType,
        DonationStatus,
        FoodItem,
        PickupWindow,
        VerificationStatus,
        ContactPerson,
        Capacity,
        NgoProfile,
        Task,
        RegisterRequest,
        LoginRequest,
        SessionResponse,
        ProfileResponse,
        DonationRequest,
        StatusRequest,
        DonationResponse,
        NgoRequest,
        VerifyRequest,
        NgoResponse,
        StatsResponse,
        TaskRequest,
        Page<DonationResponse>,
        Page<NgoResponse>,
        Page<Task>,
    )),
    tags(
        (name = "auth", description = "Account registration and sessions"),
        (name = "food-donations", description = "Donation listing and lifecycle"),
        (name = "ngos", description = "NGO directory and verification"),
        (name = "tasks", description = "Personal task management"),
        (name = "health", description = "Liveness and readiness probes")
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use utoipa::OpenApi;
    use utoipa::openapi::RefOr;
    use utoipa::openapi::schema::Schema;

    use super::*;

    fn assert_object_schema_has_field(schema: &RefOr<Schema>, field: &str) {
        match schema {
            RefOr::T(Schema::Object(obj)) => {
                assert!(
                    obj.properties.contains_key(field),
                    "schema should have field '{field}'"
                );
            }
            _ => panic!("expected Object schema"),
        }
    }

    #[test]
    fn error_schema_has_required_fields() {
        let doc = ApiDoc::openapi();
        let schemas = &doc.components.as_ref().expect("components").schemas;
        let error_schema = schemas.get("Error").expect("Error schema");

        assert_object_schema_has_field(error_schema, "code");
        assert_object_schema_has_field(error_schema, "message");
    }

    #[test]
    fn every_donation_path_is_registered() {
        let doc = ApiDoc::openapi();
        for path in [
            "/api/food-donations",
            "/api/food-donations/my-donations",
            "/api/food-donations/ngo-claimed",
            "/api/food-donations/{id}",
            "/api/food-donations/{id}/claim",
            "/api/food-donations/{id}/status",
        ] {
            assert!(
                doc.paths.paths.contains_key(path),
                "missing path '{path}'"
            );
        }
    }

    #[test]
    fn ngo_and_task_paths_are_registered() {
        let doc = ApiDoc::openapi();
        for path in [
            "/api/ngos/register",
            "/api/ngos/profile",
            "/api/ngos/stats",
            "/api/ngos/search",
            "/api/ngos",
            "/api/ngos/{id}",
            "/api/ngos/{id}/verify",
            "/api/tasks",
            "/api/tasks/{id}",
            "/health/ready",
            "/health/live",
        ] {
            assert!(
                doc.paths.paths.contains_key(path),
                "missing path '{path}'"
            );
        }
    }
}
