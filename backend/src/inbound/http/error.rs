//! HTTP adapter mapping for domain errors.
//!
//! Domain errors render as the error form of the result envelope. Details
//! are returned only for caller errors; system errors keep them in the logs.

use actix_web::{HttpResponse, ResponseError, http::StatusCode};
use serde_json::{Value, json};
use tracing::error;

use crate::domain::{Error, TRACE_ID_HEADER};

use super::envelope::{EnvelopeStatus, ResultEnvelope};

/// Convenient result alias for HTTP handlers.
pub type ApiResult<T> = Result<T, Error>;

fn status_for(error: &Error) -> EnvelopeStatus {
    EnvelopeStatus::from(error.code())
}

fn envelope_for(error: &Error) -> ResultEnvelope {
    let status = status_for(error);
    let result_data = match status {
        EnvelopeStatus::CallerError => error.details().cloned().unwrap_or_else(|| json!({})),
        EnvelopeStatus::Success | EnvelopeStatus::SystemError => Value::Object(Default::default()),
    };
    ResultEnvelope::build(status, error.message(), result_data, 0)
}

impl ResponseError for Error {
    fn status_code(&self) -> StatusCode {
        StatusCode::from_u16(status_for(self).code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
    }

    fn error_response(&self) -> HttpResponse {
        let mut builder = HttpResponse::build(self.status_code());
        if let Some(id) = self.trace_id() {
            builder.insert_header((TRACE_ID_HEADER, id.to_owned()));
        }

        builder.json(envelope_for(self))
    }
}

impl From<actix_web::Error> for Error {
    fn from(err: actix_web::Error) -> Self {
        // Do not leak implementation details to clients.
        error!(error = %err, "actix error promoted to domain error");
        Error::internal("Internal server error")
    }
}
