//! Liveness and readiness probes.
//!
//! Readiness requires both the startup flag and a reachable POI store. The
//! store is attached once the server has picked its repository; until then
//! only the flag is consulted.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, OnceLock};

use actix_web::{HttpResponse, get, http::header, web};
use tracing::warn;

use crate::domain::ports::PoiRepository;

/// Probe state shared between the server and the health handlers.
pub struct HealthState {
    ready: AtomicBool,
    live: AtomicBool,
    store: OnceLock<Arc<dyn PoiRepository>>,
}

impl Default for HealthState {
    fn default() -> Self {
        Self {
            ready: AtomicBool::new(false),
            live: AtomicBool::new(true),
            store: OnceLock::new(),
        }
    }
}

impl HealthState {
    /// Live but not yet ready.
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach the POI store readiness should ping.
    ///
    /// Returns `false` when a store was already attached; the first one is
    /// kept.
    pub fn watch_store(&self, store: Arc<dyn PoiRepository>) -> bool {
        self.store.set(store).is_ok()
    }

    pub fn mark_ready(&self) {
        self.ready.store(true, Ordering::Release);
    }

    /// Fail liveness so orchestrators stop routing during shutdown.
    pub fn mark_unhealthy(&self) {
        self.live.store(false, Ordering::Release);
    }

    pub fn is_ready(&self) -> bool {
        self.ready.load(Ordering::Acquire)
    }

    pub fn is_alive(&self) -> bool {
        self.live.load(Ordering::Acquire)
    }

    /// Startup flag and, when attached, a successful store ping.
    pub async fn check_ready(&self) -> bool {
        if !self.is_ready() {
            return false;
        }
        let Some(store) = self.store.get() else {
            return true;
        };
        match store.ping().await {
            Ok(()) => true,
            Err(error) => {
                warn!(%error, "poi store failed readiness ping");
                false
            }
        }
    }
}

fn probe_response(passing: bool) -> HttpResponse {
    let mut response = if passing {
        HttpResponse::Ok()
    } else {
        HttpResponse::ServiceUnavailable()
    };
    response
        .insert_header((header::CACHE_CONTROL, "no-store"))
        .finish()
}

/// Readiness probe: 200 once wired and the POI store answers, 503 otherwise.
#[utoipa::path(
    get,
    path = "/health/ready",
    tags = ["health"],
    responses(
        (status = 200, description = "Pipeline wired and POI store reachable"),
        (status = 503, description = "Starting up or POI store unreachable")
    )
)]
#[get("/health/ready")]
pub async fn ready(state: web::Data<HealthState>) -> HttpResponse {
    probe_response(state.check_ready().await)
}

/// Liveness probe: 200 while alive, 503 once draining.
#[utoipa::path(
    get,
    path = "/health/live",
    tags = ["health"],
    responses(
        (status = 200, description = "Server is alive"),
        (status = 503, description = "Server is shutting down")
    )
)]
#[get("/health/live")]
pub async fn live(state: web::Data<HealthState>) -> HttpResponse {
    probe_response(state.is_alive())
}
