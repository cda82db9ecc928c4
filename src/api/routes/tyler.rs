//! Tyler e-filing handlers: authenticate, payment accounts, submit.

use crate::api::AppState;
use crate::api::routes::AuthenticateResponse;
use crate::attachments::{Attachment, mime_type_for};
use crate::error::ApiError;
use crate::types::CaseFiling;
use axum::{
    Json,
    extract::{Multipart, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};

/// POST /api/tyler/authenticate - Obtain a provider token
#[utoipa::path(
    post,
    path = "/api/tyler/authenticate",
    tag = "tyler",
    responses(
        (status = 200, description = "Authenticated", body = AuthenticateResponse),
        (status = 401, description = "Credentials missing or rejected", body = crate::error::ApiError),
        (status = 502, description = "Provider failure", body = crate::error::ApiError),
        (status = 504, description = "Provider unreachable", body = crate::error::ApiError)
    )
)]
pub async fn authenticate(State(state): State<AppState>) -> Response {
    match state.service.authenticate().await {
        Ok(token) => Json(AuthenticateResponse {
            success: true,
            token: token.value,
            expires: token.expires_at,
        })
        .into_response(),
        Err(e) => e.into_response(),
    }
}

/// GET /api/tyler/payment-accounts - List payment accounts
///
/// Always succeeds; `fallback` marks the demo account substituted when the
/// provider could not be reached.
#[utoipa::path(
    get,
    path = "/api/tyler/payment-accounts",
    tag = "tyler",
    responses(
        (status = 200, description = "Payment accounts, or the fallback demo account", body = crate::payments::PaymentAccounts)
    )
)]
pub async fn payment_accounts(State(state): State<AppState>) -> impl IntoResponse {
    Json(state.service.payment_accounts().await)
}

/// POST /api/tyler/submit - Submit a filing
///
/// Multipart form: one `case` part holding the [`CaseFiling`] JSON and one or
/// more `file` parts holding PDF or DOCX documents.
#[utoipa::path(
    post,
    path = "/api/tyler/submit",
    tag = "tyler",
    request_body(content = Vec<u8>, description = "Multipart form with a `case` JSON part and `file` parts", content_type = "multipart/form-data"),
    responses(
        (status = 201, description = "Filing accepted", body = crate::types::SubmissionResult),
        (status = 400, description = "Malformed request", body = crate::error::ApiError),
        (status = 401, description = "Authentication failed", body = crate::error::ApiError),
        (status = 402, description = "No usable payment account", body = crate::error::ApiError),
        (status = 422, description = "Filing or document rejected", body = crate::error::ApiError),
        (status = 502, description = "Provider failure", body = crate::error::ApiError),
        (status = 504, description = "Provider unreachable", body = crate::error::ApiError)
    )
)]
pub async fn submit_filing(State(state): State<AppState>, mut multipart: Multipart) -> Response {
    let mut case_json: Option<Vec<u8>> = None;
    let mut attachments: Vec<Attachment> = Vec::new();

    loop {
        let field = match multipart.next_field().await {
            Ok(Some(field)) => field,
            Ok(None) => break,
            Err(e) => {
                return ApiError::validation(
                    "invalid_multipart",
                    format!("Failed to read upload: {}", e),
                )
                .into_response();
            }
        };

        let name = field.name().unwrap_or("").to_string();
        match name.as_str() {
            "case" => match field.bytes().await {
                Ok(bytes) => case_json = Some(bytes.to_vec()),
                Err(e) => {
                    return ApiError::validation(
                        "invalid_case",
                        format!("Failed to read case metadata: {}", e),
                    )
                    .into_response();
                }
            },
            "file" => {
                let file_name = field.file_name().unwrap_or("document").to_string();
                let mime_type = upload_mime_type(&file_name, field.content_type());
                match field.bytes().await {
                    Ok(bytes) => {
                        attachments.push(Attachment::from_bytes(file_name, mime_type, bytes.to_vec()))
                    }
                    Err(e) => {
                        return ApiError::validation(
                            "invalid_file",
                            format!("Failed to read file \"{}\": {}", file_name, e),
                        )
                        .into_response();
                    }
                }
            }
            _ => {}
        }
    }

    let case: CaseFiling = match case_json {
        Some(bytes) => match serde_json::from_slice(&bytes) {
            Ok(case) => case,
            Err(e) => {
                return ApiError::validation(
                    "invalid_case",
                    format!("Invalid case metadata JSON: {}", e),
                )
                .into_response();
            }
        },
        None => {
            return ApiError::validation("missing_case", "No case metadata provided in 'case' field")
                .into_response();
        }
    };

    if attachments.is_empty() {
        return ApiError::validation("missing_file", "No document provided in 'file' field")
            .into_response();
    }

    match state.service.submit(&case, attachments).await {
        Ok(result) => (StatusCode::CREATED, Json(result)).into_response(),
        Err(e) => e.into_response(),
    }
}

/// Browsers often label DOCX uploads as octet-stream; trust the extension then
fn upload_mime_type(file_name: &str, declared: Option<&str>) -> String {
    match declared {
        Some(mime) if !mime.is_empty() && mime != "application/octet-stream" => mime.to_string(),
        declared => {
            let inferred: Option<&str> = mime_type_for(file_name);
            inferred
                .or(declared)
                .unwrap_or("application/octet-stream")
                .to_string()
        }
    }
}
