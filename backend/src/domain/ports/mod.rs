//! Domain ports and supporting types for the hexagonal boundary.
//!
//! Driven ports (`PoiRepository`, `WorkbookSource`) are implemented by
//! outbound adapters. Driving ports (`PoiUploadCommand`, `PoiQuery`) are
//! implemented by domain services and consumed by inbound adapters.

mod macros;
pub(crate) use macros::define_port_error;

mod poi_query;
mod poi_repository;
mod poi_upload_command;
mod workbook_source;

#[cfg(test)]
pub use poi_query::MockPoiQuery;
pub use poi_query::{FixturePoiQuery, ListingOutcome, PoiListing, PoiQuery};
#[cfg(test)]
pub use poi_repository::MockPoiRepository;
pub use poi_repository::{FixturePoiRepository, PoiRepository, PoiRepositoryError};
#[cfg(test)]
pub use poi_upload_command::MockPoiUploadCommand;
pub use poi_upload_command::{FixturePoiUploadCommand, PoiUploadCommand, PoiUploadOutcome};
#[cfg(test)]
pub use workbook_source::MockWorkbookSource;
pub use workbook_source::{FixtureWorkbookSource, WorkbookSource, WorkbookSourceError};

#[cfg(test)]
mod tests;
