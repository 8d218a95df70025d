//! Driving port for replacing the POI collection from an uploaded workbook.

use async_trait::async_trait;

use crate::domain::{Error, UploadedWorkbook};

/// Result of a successful upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PoiUploadOutcome {
    /// Number of accepted records now stored.
    pub stored_count: usize,
    /// File name supplied by the client.
    pub file_name: String,
    /// Diagnostics for rows that were skipped.
    pub diagnostics: Vec<String>,
}

/// Driving port for the upload pipeline.
///
/// Implementations release the workbook on every path before returning.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PoiUploadCommand: Send + Sync {
    /// Parse, validate and store the workbook contents.
    async fn upload(&self, workbook: UploadedWorkbook) -> Result<PoiUploadOutcome, Error>;
}

/// Fixture command that stores nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct FixturePoiUploadCommand;

#[async_trait]
impl PoiUploadCommand for FixturePoiUploadCommand {
    async fn upload(&self, workbook: UploadedWorkbook) -> Result<PoiUploadOutcome, Error> {
        let file_name = workbook.file_name().to_owned();
        workbook.release();
        Ok(PoiUploadOutcome {
            stored_count: 0,
            file_name,
            diagnostics: Vec::new(),
        })
    }
}
