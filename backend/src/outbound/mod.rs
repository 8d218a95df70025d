//! Outbound adapters implementing domain ports for external infrastructure.
//!
//! - **persistence**: PostgreSQL-backed POI repository using Diesel
//! - **workbook**: spreadsheet decoding with `calamine`
//! - **memory**: process-local POI store for runs without a database
//!
//! Adapters are thin translators that convert between domain types and
//! infrastructure-specific representations. They contain no business logic.

pub mod memory;
pub mod persistence;
pub mod workbook;
