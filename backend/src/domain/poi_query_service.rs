//! POI read operations.
//!
//! Both reads tolerate a collection that was never created: the store's
//! missing-collection failure becomes an empty listing marked
//! [`ListingOutcome::CollectionMissing`]. Every other store failure is an
//! error.

use std::sync::Arc;
use std::time::Instant;

use async_trait::async_trait;
use tracing::{error, info, warn};

use crate::domain::Error;
use crate::domain::Poi;
use crate::domain::ports::{ListingOutcome, PoiListing, PoiQuery, PoiRepository, PoiRepositoryError};

/// Domain service implementing [`PoiQuery`].
#[derive(Clone)]
pub struct PoiQueryService<R: ?Sized> {
    repository: Arc<R>,
}

impl<R> PoiQueryService<R>
where
    R: PoiRepository + ?Sized,
{
    /// Create a query service over the given repository.
    pub fn new(repository: Arc<R>) -> Self {
        Self { repository }
    }
}

#[async_trait]
impl<R> PoiQuery for PoiQueryService<R>
where
    R: PoiRepository + ?Sized,
{
    async fn list_all(&self) -> Result<PoiListing, Error> {
        let started = Instant::now();
        let result = self.repository.list_all().await;
        into_listing(result, ListingOutcome::Listed, started)
    }

    async fn search_by_title(&self, text: &str) -> Result<PoiListing, Error> {
        let term = text.trim();
        if term.is_empty() {
            return Ok(PoiListing::empty(ListingOutcome::BlankSearch));
        }

        let started = Instant::now();
        let result = self.repository.search_by_title(term).await;
        into_listing(
            result,
            ListingOutcome::Searched {
                term: term.to_owned(),
            },
            started,
        )
    }
}

fn into_listing(
    result: Result<Vec<Poi>, PoiRepositoryError>,
    outcome: ListingOutcome,
    started: Instant,
) -> Result<PoiListing, Error> {
    let elapsed_ms = started.elapsed().as_millis();
    match result {
        Ok(pois) => {
            info!(count = pois.len(), elapsed_ms, outcome = ?outcome, "POI read completed");
            Ok(PoiListing { pois, outcome })
        }
        Err(PoiRepositoryError::MissingCollection { message }) => {
            warn!(elapsed_ms, %message, "POI collection missing; returning empty listing");
            Ok(PoiListing::empty(ListingOutcome::CollectionMissing))
        }
        Err(error) => Err(map_repository_error(error)),
    }
}

fn map_repository_error(error: PoiRepositoryError) -> Error {
    error!(error = %error, "POI read failed");
    match error {
        PoiRepositoryError::Connection { .. } => {
            Error::service_unavailable("The POI store is unavailable.")
        }
        PoiRepositoryError::Query { .. } | PoiRepositoryError::MissingCollection { .. } => {
            Error::internal("Failed to read POI data.")
        }
    }
}
