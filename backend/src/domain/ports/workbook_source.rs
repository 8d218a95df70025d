//! Driven port for decoding spreadsheet files into labelled rows.

use std::path::Path;

use async_trait::async_trait;

use crate::domain::SheetRow;

use super::define_port_error;

define_port_error! {
    /// Errors raised while reading a workbook.
    pub enum WorkbookSourceError {
        /// The file could not be read.
        Read =>
            "workbook read failed: {message}",
        /// The file is not a readable spreadsheet or has no sheet.
        Decode =>
            "workbook decode failed: {message}",
    }
}

/// Port for turning the first sheet of a workbook into rows.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait WorkbookSource: Send + Sync {
    /// Decode data rows of the first sheet, labelled by its header row.
    async fn read_rows(&self, path: &Path) -> Result<Vec<SheetRow>, WorkbookSourceError>;
}

/// Fixture source that yields no rows.
#[derive(Debug, Clone, Copy, Default)]
pub struct FixtureWorkbookSource;

#[async_trait]
impl WorkbookSource for FixtureWorkbookSource {
    async fn read_rows(&self, _path: &Path) -> Result<Vec<SheetRow>, WorkbookSourceError> {
        Ok(Vec::new())
    }
}
