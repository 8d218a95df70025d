//! Shared HTTP adapter state.
//!
//! HTTP handlers accept this state via `actix_web::web::Data` so they only
//! depend on domain ports (use-cases) and remain testable without I/O.

use std::path::PathBuf;
use std::sync::Arc;

use crate::domain::ports::{FixturePoiQuery, FixturePoiUploadCommand, PoiQuery, PoiUploadCommand};

/// Default upload size limit: 20 MiB.
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 20 * 1024 * 1024;

/// Where uploads are buffered and how large they may be.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadPolicy {
    /// Directory receiving temporary upload files.
    pub dir: PathBuf,
    /// Maximum accepted file size in bytes.
    pub max_bytes: usize,
}

impl Default for UploadPolicy {
    fn default() -> Self {
        Self {
            dir: std::env::temp_dir(),
            max_bytes: DEFAULT_MAX_UPLOAD_BYTES,
        }
    }
}

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub uploads: Arc<dyn PoiUploadCommand>,
    pub pois: Arc<dyn PoiQuery>,
    pub upload_policy: UploadPolicy,
}

impl HttpState {
    /// Construct state from port implementations.
    ///
    /// # Examples
    /// ```
    /// use std::sync::Arc;
    /// use poi_backend::domain::ports::{FixturePoiQuery, FixturePoiUploadCommand};
    /// use poi_backend::inbound::http::state::{HttpState, UploadPolicy};
    ///
    /// let state = HttpState::new(
    ///     Arc::new(FixturePoiUploadCommand),
    ///     Arc::new(FixturePoiQuery),
    ///     UploadPolicy::default(),
    /// );
    /// assert_eq!(state.upload_policy.max_bytes, 20 * 1024 * 1024);
    /// ```
    pub fn new(
        uploads: Arc<dyn PoiUploadCommand>,
        pois: Arc<dyn PoiQuery>,
        upload_policy: UploadPolicy,
    ) -> Self {
        Self {
            uploads,
            pois,
            upload_policy,
        }
    }
}

impl Default for HttpState {
    fn default() -> Self {
        Self::new(
            Arc::new(FixturePoiUploadCommand),
            Arc::new(FixturePoiQuery),
            UploadPolicy::default(),
        )
    }
}
