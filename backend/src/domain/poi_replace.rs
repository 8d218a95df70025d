//! Batch replacement of the stored POI collection.
//!
//! A replace deletes every stored POI and then inserts the accepted set in
//! fixed-size chunks, one chunk at a time, in input order. The first failing
//! chunk stops the run. Chunks that were already inserted stay persisted and
//! the deleted rows are not restored.

use std::sync::Arc;

use thiserror::Error;
use tracing::debug;

use crate::domain::CandidatePoi;
use crate::domain::ports::{PoiRepository, PoiRepositoryError};

/// Number of records submitted per insert call.
pub const INSERT_CHUNK_SIZE: usize = 1000;

/// Failures raised while replacing the collection.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReplaceError {
    /// No records were supplied; the store was not touched.
    #[error("no accepted records to store")]
    EmptyInput,
    /// Clearing the collection failed; nothing was inserted.
    #[error("failed to clear stored POIs: {source}")]
    DeleteFailed {
        /// Store failure.
        source: PoiRepositoryError,
    },
    /// An insert chunk failed; later chunks were not issued.
    #[error("insert chunk {chunk_index} failed after {inserted_before} records were stored: {source}")]
    ChunkFailed {
        /// 1-based index of the failing chunk.
        chunk_index: usize,
        /// Records stored by earlier chunks.
        inserted_before: usize,
        /// Store failure.
        source: PoiRepositoryError,
    },
}

impl ReplaceError {
    /// Underlying store failure, if any.
    #[must_use]
    pub fn repository_error(&self) -> Option<&PoiRepositoryError> {
        match self {
            Self::EmptyInput => None,
            Self::DeleteFailed { source } | Self::ChunkFailed { source, .. } => Some(source),
        }
    }
}

/// Replaces the whole POI collection with a new accepted set.
#[derive(Clone)]
pub struct PoiReplaceService<R: ?Sized> {
    repository: Arc<R>,
}

impl<R> PoiReplaceService<R>
where
    R: PoiRepository + ?Sized,
{
    /// Create a replace service over the given repository.
    pub fn new(repository: Arc<R>) -> Self {
        Self { repository }
    }

    /// Delete every stored POI, then insert `records` chunk by chunk.
    ///
    /// Returns the number of supplied records on success. The count reported
    /// back by the store for each chunk is logged but not reconciled.
    ///
    /// # Errors
    /// - [`ReplaceError::EmptyInput`] when `records` is empty.
    /// - [`ReplaceError::DeleteFailed`] when clearing the store fails.
    /// - [`ReplaceError::ChunkFailed`] on the first failing insert.
    pub async fn replace_all(&self, records: &[CandidatePoi]) -> Result<usize, ReplaceError> {
        if records.is_empty() {
            return Err(ReplaceError::EmptyInput);
        }

        let deleted = self
            .repository
            .delete_all()
            .await
            .map_err(|source| ReplaceError::DeleteFailed { source })?;
        debug!(deleted, "cleared stored POIs");

        let mut inserted_before = 0;
        for (index, chunk) in records.chunks(INSERT_CHUNK_SIZE).enumerate() {
            let chunk_index = index + 1;
            let affected = self.repository.insert_chunk(chunk).await.map_err(|source| {
                ReplaceError::ChunkFailed {
                    chunk_index,
                    inserted_before,
                    source,
                }
            })?;
            inserted_before += chunk.len();
            debug!(
                chunk_index,
                chunk_len = chunk.len(),
                affected,
                inserted = inserted_before,
                "inserted POI chunk"
            );
        }

        Ok(records.len())
    }
}
