//! POI ingestion backend library modules.
//!
//! The crate follows a hexagonal layout: [`domain`] owns the ingestion
//! pipeline and its ports, [`outbound`] adapts storage and spreadsheet
//! decoding, and [`inbound`] exposes the HTTP surface.

pub mod doc;
pub mod domain;
pub mod inbound;
pub mod middleware;
pub mod outbound;
pub mod settings;

/// Public OpenAPI surface used by Swagger UI and tooling.
pub use doc::ApiDoc;
pub use domain::TraceId;
pub use middleware::Trace;
