//! Provider JSON wire format
//!
//! Every provider response is an envelope `{message_code, message, item}`; a
//! call succeeded only when the HTTP status is a success AND `message_code`
//! is 0.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::attachments::EncodedAttachment;
use crate::classify::{classify_code, classify_status};
use crate::error::{Error, ErrorCode, Result};
use crate::types::{FilingReceipt, Party, PaymentAccount};

use super::traits::{FilingRequest, FilingResponse};

#[derive(Debug, Deserialize)]
pub(crate) struct Envelope<T> {
    #[serde(default)]
    pub message_code: Option<i64>,
    #[serde(default)]
    pub message: Option<String>,
    pub item: Option<T>,
}

/// Request body wrapper: `{data: ...}`
#[derive(Debug, Serialize)]
pub(crate) struct Data<T> {
    pub data: T,
}

#[derive(Debug, Serialize)]
pub(crate) struct AuthenticateBody<'a> {
    pub username: &'a str,
    pub password: &'a str,
}

#[derive(Debug, Deserialize)]
pub(crate) struct AuthItem {
    #[serde(default)]
    pub auth_token: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct AccountItem {
    pub id: serde_json::Value,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub account_name: Option<String>,
}

impl From<AccountItem> for PaymentAccount {
    fn from(item: AccountItem) -> Self {
        let id = id_string(&item.id);
        let name = item
            .name
            .or(item.account_name)
            .unwrap_or_else(|| id.clone());
        PaymentAccount { id, name }
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct FilingBody<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub case_number: Option<&'a str>,
    pub court_location: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub case_category: Option<&'a str>,
    pub case_type: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client_matter_number: Option<&'a str>,
    pub payment_account_id: &'a str,
    pub parties: &'a [Party],
    pub filings: Vec<DocumentBody<'a>>,
}

#[derive(Debug, Serialize)]
pub(crate) struct DocumentBody<'a> {
    pub code: &'a str,
    pub description: &'a str,
    pub file_name: &'a str,
    pub content_type: &'a str,
    pub file: &'a str,
}

impl<'a> FilingBody<'a> {
    pub fn from_request(request: &'a FilingRequest) -> Self {
        let case = &request.case;
        let filings = request
            .documents
            .iter()
            .map(|doc: &'a EncodedAttachment| DocumentBody {
                code: &case.filing_code,
                description: case.filing_description.as_deref().unwrap_or(&doc.name),
                file_name: &doc.name,
                content_type: &doc.mime_type,
                file: &doc.content_base64,
            })
            .collect();

        FilingBody {
            case_number: case.case_number.as_deref(),
            court_location: &case.court_location,
            case_category: case.case_category.as_deref(),
            case_type: &case.case_type,
            client_matter_number: case.client_matter_number.as_deref(),
            payment_account_id: &request.payment_account_id,
            parties: &case.parties,
            filings,
        }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct FilingItem {
    #[serde(default)]
    pub envelope_id: Option<serde_json::Value>,
    #[serde(default)]
    pub filings: Vec<FilingReceiptItem>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct FilingReceiptItem {
    pub id: serde_json::Value,
    #[serde(default)]
    pub status: Option<String>,
}

impl From<FilingItem> for FilingResponse {
    fn from(item: FilingItem) -> Self {
        FilingResponse {
            envelope_id: item.envelope_id.as_ref().map(id_string),
            filings: item
                .filings
                .into_iter()
                .map(|f| FilingReceipt {
                    id: id_string(&f.id),
                    status: f.status.unwrap_or_else(|| "submitted".to_string()),
                })
                .collect(),
        }
    }
}

/// Provider ids arrive as strings or numbers
fn id_string(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Interpret a provider response body
///
/// Returns the envelope's `item` on success. Failures are classified: a
/// non-zero `message_code` through the code table, a non-success status
/// without a code through the status rules, anything else as an
/// unexpected response.
pub(crate) fn interpret<T: DeserializeOwned>(
    status: u16,
    body: &str,
    url: &str,
) -> Result<Option<T>> {
    let success = (200..300).contains(&status);
    let envelope = serde_json::from_str::<Envelope<T>>(body);

    match envelope {
        Ok(Envelope {
            message_code: Some(0),
            item,
            ..
        }) if success => Ok(item),
        Ok(Envelope {
            message_code: Some(code),
            message,
            ..
        }) if code != 0 => Err(classify_code(code, message.unwrap_or_default())),
        _ if !success => Err(classify_status(
            status,
            format!("provider returned HTTP {} for '{}'", status, url),
        )),
        Ok(_) => Err(Error::Unexpected {
            code: ErrorCode::Local("invalid_response"),
            message: format!("provider response from '{}' has no success code", url),
        }),
        Err(e) => Err(Error::Unexpected {
            code: ErrorCode::Local("invalid_response"),
            message: format!("invalid response from '{}': {}", url, e),
        }),
    }
}
