//! POI ingestion and read endpoints.
//!
//! ```text
//! POST /api/upload-excel          multipart field `excelFile`
//! GET  /api/poi
//! GET  /api/poi/search?searchText=
//! ```

use std::io::Write;

use actix_multipart::{Field, Multipart};
use actix_web::{HttpResponse, get, post, web};
use futures_util::TryStreamExt;
use serde::{Deserialize, Serialize};
use serde_json::json;
use sha2::{Digest, Sha256};
use tempfile::TempPath;
use tracing::{debug, error, info};
use utoipa::{IntoParams, ToSchema};

use crate::domain::ports::{ListingOutcome, PoiListing};
use crate::domain::{Error, Poi, UploadedWorkbook};
use crate::inbound::http::ApiResult;
use crate::inbound::http::envelope::ResultEnvelope;
use crate::inbound::http::state::{HttpState, UploadPolicy};

/// Multipart field carrying the workbook.
pub const UPLOAD_FIELD: &str = "excelFile";

/// Content types accepted for uploads.
pub const SPREADSHEET_CONTENT_TYPES: [&str; 2] = [
    "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
    "application/vnd.ms-excel",
];

/// Message returned when reads find no collection.
pub const MISSING_COLLECTION_MESSAGE: &str =
    "The POI table does not exist. Please upload a spreadsheet first.";

/// Message returned for blank search text.
pub const BLANK_SEARCH_MESSAGE: &str = "Please enter a search term.";

const RESPONSE_ENCODING_MESSAGE: &str = "Failed to prepare the response.";

/// Multipart body accepted by the upload endpoint.
#[derive(Debug, ToSchema)]
#[allow(dead_code, reason = "OpenAPI schema only")]
pub struct UploadForm {
    /// Spreadsheet file (xlsx or xls).
    #[schema(rename = "excelFile", value_type = String, format = Binary)]
    excel_file: Vec<u8>,
}

/// Payload of a successful upload.
#[derive(Debug, Serialize, ToSchema)]
pub struct UploadResult {
    /// Number of stored records.
    #[schema(example = 1500)]
    pub count: usize,
    /// Name of the uploaded file.
    #[schema(example = "seoul-pois.xlsx")]
    pub filename: String,
    /// Diagnostics for skipped rows.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub errors: Option<Vec<String>>,
}

/// Query parameters for title search.
#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct SearchParams {
    /// Substring to look for in POI titles.
    #[serde(rename = "searchText")]
    #[param(rename = "searchText", example = "경복궁")]
    pub search_text: Option<String>,
}

/// Replace every stored POI with the rows of an uploaded spreadsheet.
#[utoipa::path(
    post,
    path = "/api/upload-excel",
    request_body(content = UploadForm, content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "Collection replaced", body = ResultEnvelope),
        (status = 400, description = "Missing file, wrong type or every row rejected", body = ResultEnvelope),
        (status = 500, description = "Decoding or storage failed", body = ResultEnvelope)
    ),
    tags = ["pois"],
    operation_id = "uploadExcel"
)]
#[post("/upload-excel")]
pub async fn upload_excel(
    state: web::Data<HttpState>,
    payload: Multipart,
) -> ApiResult<HttpResponse> {
    let workbook = receive_workbook(payload, &state.upload_policy).await?;
    let outcome = state.uploads.upload(workbook).await?;

    let mut message = format!(
        "{} POI records were updated successfully.",
        outcome.stored_count
    );
    if !outcome.diagnostics.is_empty() {
        message.push_str(&format!(" ({} rows had errors)", outcome.diagnostics.len()));
    }
    let result = UploadResult {
        count: outcome.stored_count,
        filename: outcome.file_name,
        errors: (!outcome.diagnostics.is_empty()).then_some(outcome.diagnostics),
    };
    let data = serde_json::to_value(result).map_err(encoding_failure)?;
    Ok(ResultEnvelope::success(message, data, outcome.stored_count).into_response())
}

/// List every stored POI.
#[utoipa::path(
    get,
    path = "/api/poi",
    responses(
        (status = 200, description = "Stored POIs, or an empty list before the first upload", body = ResultEnvelope),
        (status = 500, description = "Storage failed", body = ResultEnvelope)
    ),
    tags = ["pois"],
    operation_id = "listPois"
)]
#[get("/poi")]
pub async fn list_pois(state: web::Data<HttpState>) -> ApiResult<HttpResponse> {
    let listing = state.pois.list_all().await?;
    listing_response(listing)
}

/// Search stored POIs by title substring.
#[utoipa::path(
    get,
    path = "/api/poi/search",
    params(SearchParams),
    responses(
        (status = 200, description = "Matching POIs; empty for blank search text", body = ResultEnvelope),
        (status = 500, description = "Storage failed", body = ResultEnvelope)
    ),
    tags = ["pois"],
    operation_id = "searchPois"
)]
#[get("/poi/search")]
pub async fn search_pois(
    state: web::Data<HttpState>,
    params: web::Query<SearchParams>,
) -> ApiResult<HttpResponse> {
    let text = params.into_inner().search_text.unwrap_or_default();
    let listing = state.pois.search_by_title(&text).await?;
    listing_response(listing)
}

fn listing_message(outcome: &ListingOutcome, count: usize) -> String {
    match outcome {
        ListingOutcome::Listed => format!("Retrieved {count} POI records."),
        ListingOutcome::Searched { term } => format!("\"{term}\" search results: {count}"),
        ListingOutcome::BlankSearch => BLANK_SEARCH_MESSAGE.to_owned(),
        ListingOutcome::CollectionMissing => MISSING_COLLECTION_MESSAGE.to_owned(),
    }
}

fn listing_response(listing: PoiListing) -> ApiResult<HttpResponse> {
    let PoiListing { pois, outcome } = listing;
    let count = pois.len();
    let message = listing_message(&outcome, count);
    let data = serde_json::to_value::<Vec<Poi>>(pois).map_err(encoding_failure)?;
    Ok(ResultEnvelope::success(message, data, count).into_response())
}

fn encoding_failure(err: serde_json::Error) -> Error {
    error!(error = %err, "failed to encode response data");
    Error::internal(RESPONSE_ENCODING_MESSAGE)
}

async fn receive_workbook(
    mut payload: Multipart,
    policy: &UploadPolicy,
) -> Result<UploadedWorkbook, Error> {
    while let Some(field) = payload.try_next().await.map_err(|err| {
        debug!(error = %err, "malformed multipart payload");
        Error::invalid_request("The upload request is malformed.")
    })? {
        if field.name() != Some(UPLOAD_FIELD) {
            continue;
        }
        return buffer_field(field, policy).await;
    }
    Err(Error::invalid_request("No file was uploaded."))
}

async fn buffer_field(mut field: Field, policy: &UploadPolicy) -> Result<UploadedWorkbook, Error> {
    let content_type = field
        .content_type()
        .map(|mime| mime.essence_str().to_owned())
        .unwrap_or_default();
    if !SPREADSHEET_CONTENT_TYPES.contains(&content_type.as_str()) {
        return Err(Error::invalid_request("Only Excel files are allowed."));
    }
    let file_name = field
        .content_disposition()
        .and_then(|disposition| disposition.get_filename())
        .unwrap_or("upload.xlsx")
        .to_owned();

    let mut bytes = Vec::new();
    let mut hasher = Sha256::new();
    while let Some(chunk) = field.try_next().await.map_err(|err| {
        debug!(error = %err, "upload stream interrupted");
        Error::invalid_request("The upload request is malformed.")
    })? {
        if bytes.len() + chunk.len() > policy.max_bytes {
            return Err(Error::invalid_request(format!(
                "The uploaded file exceeds the {} byte limit.",
                policy.max_bytes
            )));
        }
        hasher.update(&chunk);
        bytes.extend_from_slice(&chunk);
    }
    let fingerprint = hex::encode(hasher.finalize());
    info!(
        file_name = %file_name,
        size = bytes.len(),
        fingerprint = %fingerprint,
        "received spreadsheet upload"
    );

    let path = persist_upload(bytes, policy).await?;
    Ok(UploadedWorkbook::temporary(path, file_name).with_fingerprint(fingerprint))
}

async fn persist_upload(bytes: Vec<u8>, policy: &UploadPolicy) -> Result<TempPath, Error> {
    let dir = policy.dir.clone();
    web::block(move || -> std::io::Result<TempPath> {
        let mut file = tempfile::Builder::new()
            .prefix("poi-upload-")
            .tempfile_in(&dir)?;
        file.write_all(&bytes)?;
        file.flush()?;
        Ok(file.into_temp_path())
    })
    .await
    .map_err(|err| {
        error!(error = %err, "upload buffering task failed");
        Error::internal("Failed to store the uploaded file.")
    })?
    .map_err(|err| {
        error!(error = %err, "failed to buffer upload");
        Error::internal("Failed to store the uploaded file.")
    })
}
