//! HTTP inbound adapter exposing REST endpoints.

pub mod envelope;
pub mod error;
pub mod health;
pub mod pois;
pub mod state;

pub use error::ApiResult;
