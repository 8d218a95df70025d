//! Request middleware.
//!
//! Purpose: request lifecycle concerns shared by every route. Today that is
//! trace identifier propagation.

pub mod trace;

pub use trace::Trace;
