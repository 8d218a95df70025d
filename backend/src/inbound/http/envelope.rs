//! Uniform result envelope returned by every POI endpoint.
//!
//! Success bodies carry `statusCode`, `statusMessage`, `resultData` and
//! `resultCnt`. Error bodies add `errorCode` and `errorMessage`, which mirror
//! the status fields. The HTTP status always equals `statusCode`.

use actix_web::HttpResponse;
use actix_web::http::StatusCode;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::ToSchema;

use crate::domain::ErrorCode;

/// Outcome category of an operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnvelopeStatus {
    /// The operation succeeded.
    Success,
    /// The caller sent bad input.
    CallerError,
    /// The operation failed inside the service or a backing store.
    SystemError,
}

impl EnvelopeStatus {
    /// Numeric status code carried in the body.
    #[must_use]
    pub fn code(self) -> u16 {
        match self {
            Self::Success => 200,
            Self::CallerError => 400,
            Self::SystemError => 500,
        }
    }
}

impl From<ErrorCode> for EnvelopeStatus {
    fn from(code: ErrorCode) -> Self {
        match code {
            ErrorCode::InvalidRequest => Self::CallerError,
            ErrorCode::ServiceUnavailable | ErrorCode::InternalError => Self::SystemError,
        }
    }
}

/// Response wrapper shared by upload, list and search.
///
/// # Examples
/// ```
/// use poi_backend::inbound::http::envelope::{EnvelopeStatus, ResultEnvelope};
/// use serde_json::json;
///
/// let envelope = ResultEnvelope::build(
///     EnvelopeStatus::CallerError,
///     "Please upload a file.",
///     json!({}),
///     0,
/// );
/// assert_eq!(envelope.status_code, 400);
/// assert_eq!(envelope.error_code, Some(400));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ResultEnvelope {
    /// 200 on success, 400 for caller errors, 500 for system errors.
    #[schema(example = 200)]
    pub status_code: u16,
    /// Human-readable outcome.
    #[schema(example = "Retrieved 2 POI records.")]
    pub status_message: String,
    /// Mirrors `statusCode` on errors.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_code: Option<u16>,
    /// Mirrors `statusMessage` on errors.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
    /// Operation payload.
    #[schema(value_type = Object)]
    pub result_data: Value,
    /// Number of items in the payload.
    #[schema(example = 2)]
    pub result_cnt: usize,
}

impl ResultEnvelope {
    /// Build an envelope for any outcome.
    pub fn build(
        status: EnvelopeStatus,
        message: impl Into<String>,
        result_data: Value,
        result_cnt: usize,
    ) -> Self {
        let status_message = message.into();
        let (error_code, error_message) = match status {
            EnvelopeStatus::Success => (None, None),
            EnvelopeStatus::CallerError | EnvelopeStatus::SystemError => {
                (Some(status.code()), Some(status_message.clone()))
            }
        };
        Self {
            status_code: status.code(),
            status_message,
            error_code,
            error_message,
            result_data,
            result_cnt,
        }
    }

    /// Build a success envelope.
    pub fn success(message: impl Into<String>, result_data: Value, result_cnt: usize) -> Self {
        Self::build(EnvelopeStatus::Success, message, result_data, result_cnt)
    }

    /// Render as an HTTP response whose status matches `statusCode`.
    pub fn into_response(self) -> HttpResponse {
        let status =
            StatusCode::from_u16(self.status_code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        HttpResponse::build(status).json(self)
    }
}
