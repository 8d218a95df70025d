//! Behaviour-driven tests for the spreadsheet replace pipeline.

use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use poi_backend::domain::ports::{
    PoiRepository, PoiRepositoryError, PoiUploadCommand, PoiUploadOutcome, WorkbookSource,
    WorkbookSourceError,
};
use poi_backend::domain::{
    CandidatePoi, CellValue, Error, ErrorCode, Poi, PoiUploadService, SheetRow, UploadedWorkbook,
};
use poi_backend::outbound::memory::InMemoryPoiRepository;
use rstest::fixture;
use rstest_bdd::Slot;
use rstest_bdd_macros::{ScenarioState, given, scenario, then, when};
use serde_json::Value;
use tokio::runtime::Runtime;

/// Workbook source that returns rows prepared by the scenario.
#[derive(Default)]
struct ScriptedWorkbookSource {
    rows: Mutex<Vec<SheetRow>>,
}

impl ScriptedWorkbookSource {
    fn push(&self, row: SheetRow) {
        self.rows.lock().expect("rows lock").push(row);
    }
}

#[async_trait]
impl WorkbookSource for ScriptedWorkbookSource {
    async fn read_rows(&self, _path: &std::path::Path) -> Result<Vec<SheetRow>, WorkbookSourceError> {
        Ok(self.rows.lock().expect("rows lock").clone())
    }
}

/// In-memory store that can be told to fail a given insert chunk.
#[derive(Default)]
struct FlakyRepository {
    inner: InMemoryPoiRepository,
    chunks: AtomicUsize,
    failing_chunk: AtomicUsize,
}

#[async_trait]
impl PoiRepository for FlakyRepository {
    async fn delete_all(&self) -> Result<u64, PoiRepositoryError> {
        self.inner.delete_all().await
    }

    async fn insert_chunk(&self, records: &[CandidatePoi]) -> Result<u64, PoiRepositoryError> {
        let chunk = self.chunks.fetch_add(1, Ordering::SeqCst) + 1;
        if chunk == self.failing_chunk.load(Ordering::SeqCst) {
            return Err(PoiRepositoryError::query("value too long for type"));
        }
        self.inner.insert_chunk(records).await
    }

    async fn list_all(&self) -> Result<Vec<Poi>, PoiRepositoryError> {
        self.inner.list_all().await
    }

    async fn search_by_title(&self, text: &str) -> Result<Vec<Poi>, PoiRepositoryError> {
        self.inner.search_by_title(text).await
    }
}

#[derive(Clone)]
struct RuntimeHandle(Arc<Runtime>);

#[derive(Default, ScenarioState)]
struct ReplaceWorld {
    runtime: Slot<RuntimeHandle>,
    repository: Slot<Arc<FlakyRepository>>,
    source: Slot<Arc<ScriptedWorkbookSource>>,
    last_result: Slot<Result<PoiUploadOutcome, Error>>,
}

impl ReplaceWorld {
    fn runtime(&self) -> Arc<Runtime> {
        if let Some(handle) = self.runtime.get() {
            return handle.0;
        }
        let runtime = Arc::new(Runtime::new().expect("create runtime"));
        self.runtime.set(RuntimeHandle(runtime.clone()));
        runtime
    }

    fn repository(&self) -> Arc<FlakyRepository> {
        if let Some(repository) = self.repository.get() {
            return repository;
        }
        let repository = Arc::new(FlakyRepository::default());
        self.repository.set(repository.clone());
        repository
    }

    fn source(&self) -> Arc<ScriptedWorkbookSource> {
        if let Some(source) = self.source.get() {
            return source;
        }
        let source = Arc::new(ScriptedWorkbookSource::default());
        self.source.set(source.clone());
        source
    }

    fn stored(&self) -> Vec<Poi> {
        let repository = self.repository();
        self.runtime()
            .block_on(repository.list_all())
            .expect("list stored POIs")
    }

    fn result(&self) -> Result<PoiUploadOutcome, Error> {
        self.last_result.get().expect("upload result should be set")
    }
}

fn row(title: &str, latitude: f64, longitude: f64) -> SheetRow {
    SheetRow::new()
        .with("title", CellValue::from(title))
        .with("latitude", CellValue::from(latitude))
        .with("longitude", CellValue::from(longitude))
}

fn error_lines(error: &Error) -> Vec<String> {
    error
        .details()
        .and_then(|details| details.get("errors"))
        .and_then(Value::as_array)
        .map(|lines| {
            lines
                .iter()
                .filter_map(Value::as_str)
                .map(str::to_owned)
                .collect()
        })
        .unwrap_or_default()
}

#[fixture]
fn world() -> ReplaceWorld {
    ReplaceWorld::default()
}

#[given("a store holding {count} POIs")]
fn a_store_holding_pois(world: &ReplaceWorld, count: usize) {
    let repository = world.repository();
    let seed: Vec<CandidatePoi> = (0..count)
        .map(|index| CandidatePoi::new(format!("Existing {index}"), 37.5, 127.0))
        .collect();
    world.runtime().block_on(async {
        repository.inner.delete_all().await.expect("create collection");
        repository.inner.insert_chunk(&seed).await.expect("seed store");
    });
}

#[given("a spreadsheet with {count} valid rows")]
fn a_spreadsheet_with_valid_rows(world: &ReplaceWorld, count: usize) {
    let source = world.source();
    for index in 0..count {
        source.push(row(&format!("Landmark {index}"), 37.57, 126.98));
    }
}

#[given("the spreadsheet has a row without a title")]
fn the_spreadsheet_has_a_row_without_a_title(world: &ReplaceWorld) {
    world.source().push(row("   ", 37.57, 126.98));
}

#[given("the store rejects insert chunk {chunk}")]
fn the_store_rejects_insert_chunk(world: &ReplaceWorld, chunk: usize) {
    world
        .repository()
        .failing_chunk
        .store(chunk, Ordering::SeqCst);
}

#[when("the spreadsheet is uploaded")]
fn the_spreadsheet_is_uploaded(world: &ReplaceWorld) {
    let repository = world.repository();
    let command = PoiUploadService::new(world.source(), repository);
    let workbook = UploadedWorkbook::existing(PathBuf::from("fixtures/pois.xlsx"));
    let result = world.runtime().block_on(command.upload(workbook));
    world.last_result.set(result);
}

#[then("the upload reports {count} stored records")]
fn the_upload_reports_stored_records(world: &ReplaceWorld, count: usize) {
    let outcome = world.result().expect("upload should succeed");
    assert_eq!(outcome.stored_count, count);
    assert_eq!(outcome.file_name, "pois.xlsx");
}

#[then("the store holds {count} POIs")]
fn the_store_holds_pois(world: &ReplaceWorld, count: usize) {
    assert_eq!(world.stored().len(), count);
}

#[then("the store received {count} insert chunks")]
fn the_store_received_insert_chunks(world: &ReplaceWorld, count: usize) {
    assert_eq!(world.repository().chunks.load(Ordering::SeqCst), count);
}

#[then("the upload reports the diagnostic {line}")]
fn the_upload_reports_the_diagnostic(world: &ReplaceWorld, line: String) {
    let outcome = world.result().expect("upload should succeed");
    assert_eq!(outcome.diagnostics, vec![line.trim_matches('"').to_owned()]);
}

#[then("the upload fails as a caller error")]
fn the_upload_fails_as_a_caller_error(world: &ReplaceWorld) {
    let error = world.result().expect_err("upload should fail");
    assert_eq!(error.code(), ErrorCode::InvalidRequest);
}

#[then("the upload fails as a system error")]
fn the_upload_fails_as_a_system_error(world: &ReplaceWorld) {
    let error = world.result().expect_err("upload should fail");
    assert_eq!(error.code(), ErrorCode::InternalError);
    assert!(error.details().is_none());
}

#[then("the failure lists the diagnostic {line}")]
fn the_failure_lists_the_diagnostic(world: &ReplaceWorld, line: String) {
    let error = world.result().expect_err("upload should fail");
    assert_eq!(error_lines(&error), vec![line.trim_matches('"').to_owned()]);
}

#[scenario(
    path = "tests/features/poi_replace.feature",
    name = "Large uploads replace the collection in chunks"
)]
fn large_uploads_replace_the_collection_in_chunks(world: ReplaceWorld) {
    let _ = world;
}

#[scenario(
    path = "tests/features/poi_replace.feature",
    name = "Rejected rows are skipped and reported"
)]
fn rejected_rows_are_skipped_and_reported(world: ReplaceWorld) {
    let _ = world;
}

#[scenario(
    path = "tests/features/poi_replace.feature",
    name = "A spreadsheet without valid rows leaves the store untouched"
)]
fn a_spreadsheet_without_valid_rows_leaves_the_store_untouched(world: ReplaceWorld) {
    let _ = world;
}

#[scenario(
    path = "tests/features/poi_replace.feature",
    name = "A failing chunk keeps earlier chunks"
)]
fn a_failing_chunk_keeps_earlier_chunks(world: ReplaceWorld) {
    let _ = world;
}
