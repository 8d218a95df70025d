//! Spreadsheet artifacts handed to the upload pipeline.
//!
//! Uploaded files live in temporary storage and must be removed on every exit
//! path. [`UploadedWorkbook::release`] deletes them explicitly; dropping the
//! value deletes them as a backstop. Workbooks opened from an existing path
//! (the CLI loader) are never deleted.

use std::path::{Path, PathBuf};

use tempfile::TempPath;
use tracing::{debug, warn};

#[derive(Debug)]
enum Artifact {
    Temporary(TempPath),
    Existing(PathBuf),
}

/// A spreadsheet file awaiting decoding.
///
/// # Examples
/// ```
/// use poi_backend::domain::UploadedWorkbook;
///
/// let workbook = UploadedWorkbook::existing("/data/pois.xlsx");
/// assert_eq!(workbook.file_name(), "pois.xlsx");
/// workbook.release();
/// ```
#[derive(Debug)]
pub struct UploadedWorkbook {
    artifact: Artifact,
    file_name: String,
    fingerprint: Option<String>,
}

impl UploadedWorkbook {
    /// Wrap a temporary upload that is deleted on release.
    pub fn temporary(path: TempPath, file_name: impl Into<String>) -> Self {
        Self {
            artifact: Artifact::Temporary(path),
            file_name: file_name.into(),
            fingerprint: None,
        }
    }

    /// Wrap a workbook that already exists on disk and must be kept.
    pub fn existing(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let file_name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();
        Self {
            artifact: Artifact::Existing(path),
            file_name,
            fingerprint: None,
        }
    }

    /// Attach the hex SHA-256 digest of the file contents.
    #[must_use]
    pub fn with_fingerprint(mut self, fingerprint: impl Into<String>) -> Self {
        self.fingerprint = Some(fingerprint.into());
        self
    }

    /// Location of the file on disk.
    #[must_use]
    pub fn path(&self) -> &Path {
        match &self.artifact {
            Artifact::Temporary(path) => path,
            Artifact::Existing(path) => path,
        }
    }

    /// File name supplied by the client.
    #[must_use]
    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    /// Hex SHA-256 digest, when the intake computed one.
    #[must_use]
    pub fn fingerprint(&self) -> Option<&str> {
        self.fingerprint.as_deref()
    }

    /// Delete temporary storage. Failures are logged, never surfaced.
    pub fn release(self) {
        match self.artifact {
            Artifact::Temporary(path) => {
                let shown = path.display().to_string();
                match path.close() {
                    Ok(()) => debug!(path = %shown, "released upload artifact"),
                    Err(error) => {
                        warn!(path = %shown, error = %error, "failed to release upload artifact");
                    }
                }
            }
            Artifact::Existing(_) => {}
        }
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for upload artifact handling.
    use super::*;
    use rstest::rstest;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[rstest]
    fn release_deletes_temporary_files() {
        let mut file = NamedTempFile::new().expect("temp file");
        file.write_all(b"sheet").expect("write temp file");
        let path = file.into_temp_path();
        let location = path.to_path_buf();

        let workbook = UploadedWorkbook::temporary(path, "pois.xlsx");
        assert_eq!(workbook.path(), location.as_path());
        workbook.release();

        assert!(!location.exists());
    }

    #[rstest]
    fn dropping_deletes_temporary_files() {
        let path = NamedTempFile::new().expect("temp file").into_temp_path();
        let location = path.to_path_buf();

        drop(UploadedWorkbook::temporary(path, "pois.xlsx"));

        assert!(!location.exists());
    }

    #[rstest]
    fn release_keeps_existing_files() {
        let file = NamedTempFile::new().expect("temp file");
        let workbook = UploadedWorkbook::existing(file.path());
        workbook.release();
        assert!(file.path().exists());
    }

    #[rstest]
    fn fingerprint_is_optional() {
        let workbook = UploadedWorkbook::existing("/tmp/a.xlsx");
        assert!(workbook.fingerprint().is_none());
        let workbook = workbook.with_fingerprint("abc123");
        assert_eq!(workbook.fingerprint(), Some("abc123"));
    }
}
