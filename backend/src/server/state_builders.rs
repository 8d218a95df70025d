//! Builders wiring POI ports to their adapters.

use std::sync::Arc;

use actix_web::web;

use poi_backend::domain::ports::{PoiRepository, WorkbookSource};
use poi_backend::domain::{PoiQueryService, PoiUploadService};
use poi_backend::inbound::http::state::{HttpState, UploadPolicy};
use poi_backend::outbound::memory::InMemoryPoiRepository;
use poi_backend::outbound::persistence::{DbPool, DieselPoiRepository};
use poi_backend::outbound::workbook::CalamineWorkbookSource;
use tracing::{info, warn};

use super::ServerConfig;

/// Pick the POI store: PostgreSQL when a pool is configured, memory otherwise.
pub(super) fn build_poi_repository(pool: Option<&DbPool>) -> Arc<dyn PoiRepository> {
    match pool {
        Some(pool) => {
            info!("using PostgreSQL POI store");
            Arc::new(DieselPoiRepository::new(pool.clone()))
        }
        None => {
            warn!("no database configured; POIs are kept in memory");
            Arc::new(InMemoryPoiRepository::default())
        }
    }
}

/// Assemble handler state from a repository and workbook decoder.
fn build_state_with(
    repository: Arc<dyn PoiRepository>,
    source: Arc<dyn WorkbookSource>,
    upload_policy: UploadPolicy,
) -> HttpState {
    HttpState::new(
        Arc::new(PoiUploadService::new(source, repository.clone())),
        Arc::new(PoiQueryService::new(repository)),
        upload_policy,
    )
}

pub(super) fn build_http_state(
    config: &ServerConfig,
    repository: Arc<dyn PoiRepository>,
) -> web::Data<HttpState> {
    web::Data::new(build_state_with(
        repository,
        Arc::new(CalamineWorkbookSource),
        config.upload_policy.clone(),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use poi_backend::domain::ports::{FixtureWorkbookSource, ListingOutcome};
    use poi_backend::domain::{CandidatePoi, UploadedWorkbook};
    use rstest::rstest;

    #[rstest]
    #[tokio::test]
    async fn memory_state_reports_missing_collection_before_first_upload() {
        let config = ServerConfig::new("127.0.0.1:0".parse().expect("addr"));
        let state = build_http_state(&config, build_poi_repository(config.db_pool.as_ref()));
        let listing = state.pois.list_all().await.expect("listing");
        assert_eq!(listing.outcome, ListingOutcome::CollectionMissing);
        assert!(listing.pois.is_empty());
    }

    #[rstest]
    #[tokio::test]
    async fn upload_and_query_share_one_repository() {
        let repository: Arc<dyn PoiRepository> = Arc::new(InMemoryPoiRepository::default());
        repository.delete_all().await.expect("create collection");
        repository
            .insert_chunk(&[CandidatePoi::new("Seoul Tower", 37.55, 126.98)])
            .await
            .expect("seed");
        let state = build_state_with(
            repository,
            Arc::new(FixtureWorkbookSource),
            UploadPolicy::default(),
        );

        let listing = state.pois.list_all().await.expect("listing");
        assert_eq!(listing.pois.len(), 1);

        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("empty.xlsx");
        std::fs::write(&path, b"").expect("write");
        let error = state
            .uploads
            .upload(UploadedWorkbook::existing(path))
            .await
            .expect_err("no rows is a caller error");
        assert_eq!(error.code(), poi_backend::domain::ErrorCode::InvalidRequest);
    }
}
