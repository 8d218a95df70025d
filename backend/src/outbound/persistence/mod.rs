//! PostgreSQL persistence adapters using Diesel.
//!
//! The POI adapter issues raw SQL through `diesel::sql_query` over
//! `diesel-async` connections checked out from a `bb8` pool. Row structs in
//! `models.rs` are internal and never reach the domain; every database
//! failure is mapped to `PoiRepositoryError`.
//!
//! # Example
//!
//! ```ignore
//! use poi_backend::outbound::persistence::{DbPool, DieselPoiRepository, PoolConfig};
//!
//! let pool = DbPool::new(PoolConfig::new("postgres://localhost/poi")).await?;
//! let repository = DieselPoiRepository::new(pool);
//! ```

pub(crate) mod diesel_helpers;
mod diesel_poi_repository;
mod models;
mod pool;

pub use diesel_poi_repository::DieselPoiRepository;
pub use pool::{DbPool, PoolConfig, PoolError};
