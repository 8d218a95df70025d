//! Driven port for the persisted POI collection.
//!
//! The collection is created lazily by the first [`PoiRepository::delete_all`].
//! Reads against a store that was never loaded report
//! [`PoiRepositoryError::MissingCollection`] so callers can degrade instead
//! of failing.

use async_trait::async_trait;

use crate::domain::{CandidatePoi, Poi};

use super::define_port_error;

define_port_error! {
    /// Errors raised by POI persistence adapters.
    pub enum PoiRepositoryError {
        /// Repository connection could not be established.
        Connection =>
            "poi persistence connection failed: {message}",
        /// Query or mutation failed during execution.
        Query =>
            "poi persistence query failed: {message}",
        /// The POI collection has not been created yet.
        MissingCollection =>
            "poi collection does not exist: {message}",
    }
}

/// Port for reading and replacing the POI collection.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PoiRepository: Send + Sync {
    /// Remove every stored POI, creating the collection first if needed.
    ///
    /// Returns the number of removed rows.
    async fn delete_all(&self) -> Result<u64, PoiRepositoryError>;

    /// Insert one chunk of accepted records and return the affected count.
    async fn insert_chunk(&self, records: &[CandidatePoi]) -> Result<u64, PoiRepositoryError>;

    /// Every stored POI in store-defined order.
    async fn list_all(&self) -> Result<Vec<Poi>, PoiRepositoryError>;

    /// POIs whose title contains `text` as a literal substring.
    async fn search_by_title(&self, text: &str) -> Result<Vec<Poi>, PoiRepositoryError>;

    /// Confirm the backing store answers. Process-local stores always do.
    async fn ping(&self) -> Result<(), PoiRepositoryError> {
        Ok(())
    }
}

/// Fixture implementation for tests that do not exercise persistence.
#[derive(Debug, Clone, Copy, Default)]
pub struct FixturePoiRepository;

#[async_trait]
impl PoiRepository for FixturePoiRepository {
    async fn delete_all(&self) -> Result<u64, PoiRepositoryError> {
        Ok(0)
    }

    async fn insert_chunk(&self, records: &[CandidatePoi]) -> Result<u64, PoiRepositoryError> {
        Ok(records.len() as u64)
    }

    async fn list_all(&self) -> Result<Vec<Poi>, PoiRepositoryError> {
        Ok(Vec::new())
    }

    async fn search_by_title(&self, _text: &str) -> Result<Vec<Poi>, PoiRepositoryError> {
        Ok(Vec::new())
    }
}
