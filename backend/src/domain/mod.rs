//! Domain primitives, services and ports.
//!
//! Purpose: define the POI model and the ingestion pipeline (row parsing,
//! validation, chunked replacement) plus the read services, independent of
//! HTTP and storage. Adapters live in `inbound` and `outbound`.
//!
//! Public surface:
//! - Error (alias to `error::Error`): transport-agnostic error payload.
//! - ErrorCode (alias to `error::ErrorCode`): stable error identifier.
//! - Poi, CandidatePoi, PoiId: stored and pre-validation POI shapes.
//! - parse_row, validate_candidates: pure pipeline stages.
//! - PoiReplaceService, PoiQueryService, PoiUploadService: orchestration.

pub mod error;
pub mod ports;

mod poi;
mod poi_query_service;
mod poi_replace;
mod poi_row;
mod poi_upload_service;
mod poi_validation;
mod trace_id;
mod upload;

pub use self::error::{Error, ErrorCode};
pub use self::poi::{CandidatePoi, Poi, PoiId, TITLE_MAX_CHARS};
pub use self::poi_query_service::PoiQueryService;
pub use self::poi_replace::{INSERT_CHUNK_SIZE, PoiReplaceService, ReplaceError};
pub use self::poi_row::{CellValue, SheetRow, parse_row};
pub use self::poi_upload_service::{PoiUploadService, VALIDATION_FAILED_MESSAGE};
pub use self::poi_validation::{
    RejectionReason, RowDiagnostic, ValidationReport, rejection_reasons, validate_candidates,
};
pub use self::trace_id::{TRACE_ID_HEADER, TraceId};
pub use self::upload::UploadedWorkbook;

/// Convenient API result alias.
///
/// # Examples
/// ```
/// use poi_backend::domain::{ApiResult, Error};
///
/// fn handler() -> ApiResult<()> {
///     Err(Error::invalid_request("no file was uploaded"))
/// }
/// assert!(handler().is_err());
/// ```
pub type ApiResult<T> = Result<T, Error>;
