//! Regression coverage for port fixtures and error types.

use super::*;
use crate::domain::{CandidatePoi, UploadedWorkbook};
use rstest::rstest;
use std::path::Path;

#[rstest]
#[case(PoiRepositoryError::connection("refused"), "poi persistence connection failed: refused")]
#[case(PoiRepositoryError::query("syntax"), "poi persistence query failed: syntax")]
#[case(
    PoiRepositoryError::missing_collection("relation \"poi\" does not exist"),
    "poi collection does not exist: relation \"poi\" does not exist"
)]
fn repository_errors_render_messages(#[case] error: PoiRepositoryError, #[case] expected: &str) {
    assert_eq!(error.to_string(), expected);
}

#[rstest]
fn only_missing_collection_is_flagged() {
    assert!(PoiRepositoryError::missing_collection("gone").is_missing_collection());
    assert!(!PoiRepositoryError::query("gone").is_missing_collection());
}

#[rstest]
#[tokio::test]
async fn fixture_repository_reports_chunk_length() {
    let records = vec![
        CandidatePoi::new("A", 1.0, 1.0),
        CandidatePoi::new("B", 2.0, 2.0),
    ];
    let inserted = FixturePoiRepository
        .insert_chunk(&records)
        .await
        .expect("fixture insert succeeds");
    assert_eq!(inserted, 2);
}

#[rstest]
#[case("  ", ListingOutcome::BlankSearch)]
#[case(" 남산 ", ListingOutcome::Searched { term: "남산".to_owned() })]
#[tokio::test]
async fn fixture_query_trims_search_text(#[case] text: &str, #[case] expected: ListingOutcome) {
    let listing = FixturePoiQuery
        .search_by_title(text)
        .await
        .expect("fixture search succeeds");
    assert_eq!(listing.outcome, expected);
    assert!(listing.pois.is_empty());
}

#[rstest]
#[tokio::test]
async fn fixture_upload_echoes_file_name() {
    let outcome = FixturePoiUploadCommand
        .upload(UploadedWorkbook::existing("/srv/sheets/seoul.xlsx"))
        .await
        .expect("fixture upload succeeds");
    assert_eq!(outcome.file_name, "seoul.xlsx");
    assert_eq!(outcome.stored_count, 0);
}

#[rstest]
#[tokio::test]
async fn fixture_workbook_source_yields_no_rows() {
    let rows = FixtureWorkbookSource
        .read_rows(Path::new("missing.xlsx"))
        .await
        .expect("fixture read succeeds");
    assert!(rows.is_empty());
}
