//! OpenAPI documentation and schema generation
//!
//! Uses utoipa for compile-time spec generation.

use utoipa::OpenApi;

/// OpenAPI documentation for the e-filing facade
///
/// Served at `/openapi.json`; the Swagger UI at `/swagger-ui` reads its own
/// copy from `/api-docs/openapi.json`.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "evict-efile API",
        version = "0.1.0",
        description = "Internal facade for Tyler/uslegalpro e-filing: authentication, payment accounts and filing submission",
        license(
            name = "MIT OR Apache-2.0"
        )
    ),
    servers(
        (url = "http://localhost:6790", description = "Local development server")
    ),
    paths(
        // Tyler e-filing
        crate::api::routes::authenticate,
        crate::api::routes::payment_accounts,
        crate::api::routes::submit_filing,

        // System
        crate::api::routes::health_check,
        crate::api::routes::openapi_spec,
    ),
    components(schemas(
        crate::types::PaymentAccount,
        crate::types::PartyRole,
        crate::types::Address,
        crate::types::Party,
        crate::types::CaseFiling,
        crate::types::FilingReceipt,
        crate::types::SubmissionResult,
        crate::payments::PaymentAccounts,
        crate::classify::ErrorKind,

        crate::api::routes::AuthenticateResponse,

        crate::error::ApiError,
    )),
    tags(
        (name = "tyler", description = "Tyler e-filing - Authentication, payment accounts and submission"),
        (name = "system", description = "System endpoints - Health checks and OpenAPI spec"),
    )
)]
pub struct ApiDoc;
