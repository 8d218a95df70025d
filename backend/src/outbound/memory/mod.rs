//! In-process adapters for development runs without external services.

mod in_memory_poi_repository;

pub use in_memory_poi_repository::InMemoryPoiRepository;
