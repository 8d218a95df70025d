//! Service configuration loaded via OrthoConfig.
//!
//! Values come from command-line arguments, `POI_*` environment variables and
//! configuration files, in that order of precedence. The listener port
//! carries an attribute default; the remaining fields are optional and their
//! accessors supply the defaults.

use std::net::{AddrParseError, IpAddr, SocketAddr};
use std::path::PathBuf;

use ortho_config::OrthoConfig;
use serde::Deserialize;

use crate::inbound::http::state::{DEFAULT_MAX_UPLOAD_BYTES, UploadPolicy};

const DEFAULT_BIND_HOST: &str = "0.0.0.0";
const DEFAULT_POOL_MAX_SIZE: u32 = 10;

/// Runtime settings for the HTTP service.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "POI")]
pub struct ServiceSettings {
    /// Interface the HTTP listener binds to.
    pub bind_host: Option<String>,
    /// TCP port the HTTP listener binds to.
    #[ortho_config(default = 8080)]
    pub port: u16,
    /// PostgreSQL connection URL. Without one the service keeps POIs in memory.
    pub database_url: Option<String>,
    /// Directory receiving buffered uploads.
    pub upload_dir: Option<PathBuf>,
    /// Largest accepted upload in bytes.
    pub max_upload_bytes: Option<usize>,
    /// Upper bound on pooled database connections.
    pub pool_max_size: Option<u32>,
}

impl ServiceSettings {
    /// Socket address for the HTTP listener.
    ///
    /// # Errors
    /// Returns [`AddrParseError`] when `bind_host` is not an IP address.
    pub fn bind_addr(&self) -> Result<SocketAddr, AddrParseError> {
        let host: IpAddr = self
            .bind_host
            .as_deref()
            .map_or(DEFAULT_BIND_HOST, str::trim)
            .parse()?;
        Ok(SocketAddr::new(host, self.port))
    }

    /// Configured database URL, ignoring blank values.
    #[must_use]
    pub fn database_url(&self) -> Option<&str> {
        self.database_url
            .as_deref()
            .map(str::trim)
            .filter(|url| !url.is_empty())
    }

    /// Upload buffering policy.
    #[must_use]
    pub fn upload_policy(&self) -> UploadPolicy {
        UploadPolicy {
            dir: self.upload_dir.clone().unwrap_or_else(std::env::temp_dir),
            max_bytes: self.max_upload_bytes.unwrap_or(DEFAULT_MAX_UPLOAD_BYTES),
        }
    }

    /// Maximum database pool size.
    #[must_use]
    pub fn pool_max_size(&self) -> u32 {
        self.pool_max_size.unwrap_or(DEFAULT_POOL_MAX_SIZE)
    }
}
