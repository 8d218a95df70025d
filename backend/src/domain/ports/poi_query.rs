//! Driving port for POI read operations.
//!
//! Inbound adapters use this port to list and search POIs without importing
//! persistence details.

use async_trait::async_trait;

use crate::domain::{Error, Poi};

/// How a listing was produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListingOutcome {
    /// Every stored POI.
    Listed,
    /// POIs matching the trimmed search term.
    Searched {
        /// Term sent to the store.
        term: String,
    },
    /// The search text was blank; the store was not queried.
    BlankSearch,
    /// Nothing has been loaded yet.
    CollectionMissing,
}

/// POIs returned by a read together with how they were produced.
#[derive(Debug, Clone, PartialEq)]
pub struct PoiListing {
    /// Matching POIs.
    pub pois: Vec<Poi>,
    /// Read outcome.
    pub outcome: ListingOutcome,
}

impl PoiListing {
    /// Listing with no rows for the given outcome.
    #[must_use]
    pub fn empty(outcome: ListingOutcome) -> Self {
        Self {
            pois: Vec::new(),
            outcome,
        }
    }
}

/// Driving port for POI reads.
///
/// # Examples
///
/// ```rust,no_run
/// # async fn example() -> Result<(), poi_backend::domain::Error> {
/// use poi_backend::domain::ports::{FixturePoiQuery, PoiQuery};
///
/// let listing = FixturePoiQuery.list_all().await?;
/// assert!(listing.pois.is_empty());
/// # Ok(())
/// # }
/// ```
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PoiQuery: Send + Sync {
    /// Every stored POI.
    async fn list_all(&self) -> Result<PoiListing, Error>;

    /// POIs whose title contains the trimmed `text`.
    async fn search_by_title(&self, text: &str) -> Result<PoiListing, Error>;
}

/// Fixture query that always returns empty listings.
#[derive(Debug, Clone, Copy, Default)]
pub struct FixturePoiQuery;

#[async_trait]
impl PoiQuery for FixturePoiQuery {
    async fn list_all(&self) -> Result<PoiListing, Error> {
        Ok(PoiListing::empty(ListingOutcome::Listed))
    }

    async fn search_by_title(&self, text: &str) -> Result<PoiListing, Error> {
        let term = text.trim();
        if term.is_empty() {
            return Ok(PoiListing::empty(ListingOutcome::BlankSearch));
        }
        Ok(PoiListing::empty(ListingOutcome::Searched {
            term: term.to_owned(),
        }))
    }
}
