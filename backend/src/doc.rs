//! OpenAPI documentation configuration.
//!
//! This module defines the [`ApiDoc`] struct which generates the OpenAPI
//! specification for the REST API. It registers:
//!
//! - **Paths**: the POI upload and read endpoints plus health probes
//! - **Schemas**: the [`ResultEnvelope`] wrapper every POI endpoint returns,
//!   the upload payload and the stored [`Poi`] shape
//!
//! The generated specification is served by Swagger UI in debug builds.

use crate::domain::Poi;
use crate::inbound::http::envelope::ResultEnvelope;
use crate::inbound::http::pois::{UploadForm, UploadResult};
use utoipa::OpenApi;

/// OpenAPI document for the REST API.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "POI ingestion API",
        description = "Bulk replacement of points of interest from spreadsheets, with listing and title search.",
        license(
            name = "ISC",
            url = "https://opensource.org/license/isc-license-txt"
        )
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    paths(
        crate::inbound::http::pois::upload_excel,
        crate::inbound::http::pois::list_pois,
        crate::inbound::http::pois::search_pois,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(ResultEnvelope, UploadResult, UploadForm, Poi)),
    tags(
        (name = "pois", description = "Spreadsheet ingestion and POI reads"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;
