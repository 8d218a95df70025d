//! Upload pipeline: decode, parse, validate, replace.
//!
//! The uploaded artifact is released as soon as decoding finishes, whether
//! or not decoding succeeded. Partially invalid uploads still replace the
//! collection with their accepted rows; an upload whose every row is
//! rejected leaves the store untouched.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::json;
use tracing::{error, info, warn};

use crate::domain::ports::{
    PoiRepository, PoiRepositoryError, PoiUploadCommand, PoiUploadOutcome, WorkbookSource,
    WorkbookSourceError,
};
use crate::domain::{
    Error, PoiReplaceService, ReplaceError, UploadedWorkbook, parse_row, validate_candidates,
};

/// Message returned when every row of an upload is rejected.
pub const VALIDATION_FAILED_MESSAGE: &str = "Data validation failed";

/// Domain service implementing [`PoiUploadCommand`].
#[derive(Clone)]
pub struct PoiUploadService<W: ?Sized, R: ?Sized> {
    source: Arc<W>,
    replace: PoiReplaceService<R>,
}

impl<W, R> PoiUploadService<W, R>
where
    W: WorkbookSource + ?Sized,
    R: PoiRepository + ?Sized,
{
    /// Create an upload service from a workbook decoder and a POI store.
    pub fn new(source: Arc<W>, repository: Arc<R>) -> Self {
        Self {
            source,
            replace: PoiReplaceService::new(repository),
        }
    }
}

#[async_trait]
impl<W, R> PoiUploadCommand for PoiUploadService<W, R>
where
    W: WorkbookSource + ?Sized,
    R: PoiRepository + ?Sized,
{
    async fn upload(&self, workbook: UploadedWorkbook) -> Result<PoiUploadOutcome, Error> {
        let file_name = workbook.file_name().to_owned();
        info!(
            file_name = %file_name,
            fingerprint = workbook.fingerprint().unwrap_or("-"),
            "processing POI upload"
        );

        let decoded = self.source.read_rows(workbook.path()).await;
        workbook.release();
        let rows = decoded.map_err(|err| map_source_error(&file_name, err))?;
        if rows.is_empty() {
            return Err(Error::invalid_request(
                "The spreadsheet contains no data rows.",
            ));
        }

        let candidates = rows.iter().map(parse_row).collect();
        let report = validate_candidates(candidates);
        let diagnostics = report.diagnostic_lines();
        if !diagnostics.is_empty() {
            warn!(
                file_name = %file_name,
                valid = report.accepted.len(),
                invalid = diagnostics.len(),
                errors = ?diagnostics,
                "upload contains rejected rows"
            );
        }
        if report.all_rejected() {
            return Err(Error::invalid_request(VALIDATION_FAILED_MESSAGE)
                .with_details(json!({ "errors": diagnostics })));
        }

        let stored_count = self
            .replace
            .replace_all(&report.accepted)
            .await
            .map_err(|err| map_replace_error(report.accepted.len(), err))?;
        info!(file_name = %file_name, stored_count, "replaced POI collection");

        Ok(PoiUploadOutcome {
            stored_count,
            file_name,
            diagnostics,
        })
    }
}

fn map_source_error(file_name: &str, err: WorkbookSourceError) -> Error {
    error!(file_name = %file_name, error = %err, "failed to decode uploaded workbook");
    Error::internal("Failed to read the uploaded spreadsheet.")
}

fn map_replace_error(record_count: usize, err: ReplaceError) -> Error {
    error!(record_count, error = %err, "POI replace failed");
    match err {
        ReplaceError::EmptyInput => Error::invalid_request("No valid POI records to store."),
        ReplaceError::DeleteFailed {
            source: PoiRepositoryError::Connection { .. },
        }
        | ReplaceError::ChunkFailed {
            source: PoiRepositoryError::Connection { .. },
            ..
        } => Error::service_unavailable("The POI store is unavailable."),
        ReplaceError::DeleteFailed { .. } | ReplaceError::ChunkFailed { .. } => {
            Error::internal("Failed to update POI data.")
        }
    }
}

#[cfg(test)]
mod tests {
    //! Unit coverage for the upload pipeline.
    use super::*;
    use crate::domain::ports::{MockPoiRepository, MockWorkbookSource};
    use crate::domain::{CellValue, ErrorCode, SheetRow};
    use rstest::rstest;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn row(title: &str, latitude: f64, longitude: f64) -> SheetRow {
        SheetRow::new()
            .with("title", CellValue::from(title))
            .with("latitude", CellValue::from(latitude))
            .with("longitude", CellValue::from(longitude))
    }

    fn temporary_workbook() -> (UploadedWorkbook, std::path::PathBuf) {
        let mut file = NamedTempFile::new().expect("temp file");
        file.write_all(b"xlsx").expect("write temp file");
        let path = file.into_temp_path();
        let location = path.to_path_buf();
        (UploadedWorkbook::temporary(path, "seoul.xlsx"), location)
    }

    fn source_returning(rows: Vec<SheetRow>) -> MockWorkbookSource {
        let mut source = MockWorkbookSource::new();
        source
            .expect_read_rows()
            .times(1)
            .return_once(move |_| Ok(rows));
        source
    }

    fn make_service(
        source: MockWorkbookSource,
        repository: MockPoiRepository,
    ) -> PoiUploadService<MockWorkbookSource, MockPoiRepository> {
        PoiUploadService::new(Arc::new(source), Arc::new(repository))
    }

    #[rstest]
    #[tokio::test]
    async fn stores_accepted_rows_and_reports_diagnostics() {
        let source = source_returning(vec![
            row("경복궁", 37.5796, 126.977),
            row("", 37.5, 127.0),
            row("N Seoul Tower", 37.5512, 126.9882),
        ]);
        let mut repository = MockPoiRepository::new();
        repository.expect_delete_all().times(1).returning(|| Ok(0));
        repository
            .expect_insert_chunk()
            .times(1)
            .withf(|chunk| chunk.len() == 2)
            .returning(|chunk| Ok(chunk.len() as u64));
        let (workbook, location) = temporary_workbook();

        let outcome = make_service(source, repository)
            .upload(workbook)
            .await
            .expect("upload succeeds");

        assert_eq!(outcome.stored_count, 2);
        assert_eq!(outcome.file_name, "seoul.xlsx");
        assert_eq!(outcome.diagnostics, vec!["Row 2: title is empty".to_owned()]);
        assert!(!location.exists());
    }

    #[rstest]
    #[tokio::test]
    async fn all_rejected_rows_leave_store_untouched() {
        let source = source_returning(vec![row("", 0.0, 0.0), row("Plaza", 91.0, 127.0)]);
        let mut repository = MockPoiRepository::new();
        repository.expect_delete_all().times(0);
        repository.expect_insert_chunk().times(0);
        let (workbook, location) = temporary_workbook();

        let error = make_service(source, repository)
            .upload(workbook)
            .await
            .expect_err("all rows rejected");

        assert_eq!(error.code(), ErrorCode::InvalidRequest);
        assert_eq!(error.message(), VALIDATION_FAILED_MESSAGE);
        assert_eq!(
            error.details(),
            Some(&json!({
                "errors": [
                    "Row 1: title is empty, latitude is invalid, longitude is invalid",
                    "Row 2: latitude is out of range",
                ]
            }))
        );
        assert!(!location.exists());
    }

    #[rstest]
    #[tokio::test]
    async fn decode_failure_releases_artifact_and_is_internal() {
        let mut source = MockWorkbookSource::new();
        source
            .expect_read_rows()
            .times(1)
            .returning(|_| Err(WorkbookSourceError::decode("zip header missing")));
        let mut repository = MockPoiRepository::new();
        repository.expect_delete_all().times(0);
        let (workbook, location) = temporary_workbook();

        let error = make_service(source, repository)
            .upload(workbook)
            .await
            .expect_err("decode failure propagates");

        assert_eq!(error.code(), ErrorCode::InternalError);
        assert!(!error.message().contains("zip"));
        assert!(!location.exists());
    }

    #[rstest]
    #[tokio::test]
    async fn empty_sheet_is_a_caller_error() {
        let source = source_returning(Vec::new());
        let mut repository = MockPoiRepository::new();
        repository.expect_delete_all().times(0);
        let (workbook, _location) = temporary_workbook();

        let error = make_service(source, repository)
            .upload(workbook)
            .await
            .expect_err("empty sheet rejected");

        assert_eq!(error.code(), ErrorCode::InvalidRequest);
    }

    #[rstest]
    #[case(PoiRepositoryError::connection("refused"), ErrorCode::ServiceUnavailable)]
    #[case(PoiRepositoryError::query("disk full"), ErrorCode::InternalError)]
    #[tokio::test]
    async fn store_failures_map_to_system_errors(
        #[case] failure: PoiRepositoryError,
        #[case] expected: ErrorCode,
    ) {
        let source = source_returning(vec![row("Jongno", 37.57, 126.98)]);
        let mut repository = MockPoiRepository::new();
        repository.expect_delete_all().return_once(move || Err(failure));
        repository.expect_insert_chunk().times(0);
        let (workbook, _location) = temporary_workbook();

        let error = make_service(source, repository)
            .upload(workbook)
            .await
            .expect_err("store failure propagates");

        assert_eq!(error.code(), expected);
    }
}
