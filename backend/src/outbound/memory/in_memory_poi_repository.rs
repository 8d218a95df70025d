//! Process-local POI store used when no database is configured.
//!
//! Mirrors the PostgreSQL adapter's observable behaviour: reads report a
//! missing collection until the first `delete_all`, listings are ordered by
//! creation time then title, and search is a case-sensitive substring match.

use std::sync::{Arc, RwLock};

use async_trait::async_trait;
use mockable::{Clock, DefaultClock};

use crate::domain::ports::{PoiRepository, PoiRepositoryError};
use crate::domain::{CandidatePoi, Poi};

/// In-memory implementation of [`PoiRepository`].
#[derive(Clone)]
pub struct InMemoryPoiRepository {
    collection: Arc<RwLock<Option<Vec<Poi>>>>,
    clock: Arc<dyn Clock>,
}

impl Default for InMemoryPoiRepository {
    fn default() -> Self {
        Self::new(Arc::new(DefaultClock))
    }
}

impl InMemoryPoiRepository {
    /// Create an empty store without a collection.
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            collection: Arc::new(RwLock::new(None)),
            clock,
        }
    }

    fn read_collection(&self) -> Result<Vec<Poi>, PoiRepositoryError> {
        let guard = self
            .collection
            .read()
            .map_err(|_| PoiRepositoryError::query("poi store lock poisoned"))?;
        guard
            .clone()
            .ok_or_else(|| PoiRepositoryError::missing_collection("relation \"poi\" does not exist"))
    }
}

#[async_trait]
impl PoiRepository for InMemoryPoiRepository {
    async fn delete_all(&self) -> Result<u64, PoiRepositoryError> {
        let mut guard = self
            .collection
            .write()
            .map_err(|_| PoiRepositoryError::query("poi store lock poisoned"))?;
        let removed = guard.replace(Vec::new()).map_or(0, |pois| pois.len());
        Ok(removed as u64)
    }

    async fn insert_chunk(&self, records: &[CandidatePoi]) -> Result<u64, PoiRepositoryError> {
        let created_at = self.clock.utc();
        let mut guard = self
            .collection
            .write()
            .map_err(|_| PoiRepositoryError::query("poi store lock poisoned"))?;
        let pois = guard.as_mut().ok_or_else(|| {
            PoiRepositoryError::missing_collection("relation \"poi\" does not exist")
        })?;
        pois.extend(records.iter().map(|record| Poi {
            id: record.id,
            title: record.title.clone(),
            latitude: record.latitude,
            longitude: record.longitude,
            created_at,
        }));
        Ok(records.len() as u64)
    }

    async fn list_all(&self) -> Result<Vec<Poi>, PoiRepositoryError> {
        let mut pois = self.read_collection()?;
        pois.sort_by(|a, b| {
            a.created_at
                .cmp(&b.created_at)
                .then_with(|| a.title.cmp(&b.title))
        });
        Ok(pois)
    }

    async fn search_by_title(&self, text: &str) -> Result<Vec<Poi>, PoiRepositoryError> {
        let mut pois = self.list_all().await?;
        pois.retain(|poi| poi.title.contains(text));
        Ok(pois)
    }
}
