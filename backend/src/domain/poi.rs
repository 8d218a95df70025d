//! Point of interest entity and its pre-persistence candidate form.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

/// Maximum number of characters accepted in a POI title.
pub const TITLE_MAX_CHARS: usize = 500;

/// Opaque POI identifier, generated once and never reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(transparent)]
#[schema(value_type = String, format = Uuid)]
pub struct PoiId(Uuid);

impl PoiId {
    /// Generate a fresh random identifier.
    #[must_use]
    #[rustfmt::skip]
    pub fn random() -> Self { Self(Uuid::new_v4()) }

    /// Wrap an identifier read back from storage.
    #[must_use]
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Access the inner UUID.
    #[must_use]
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl std::fmt::Display for PoiId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A persisted point of interest.
///
/// ## Invariants
/// - Every stored POI passed row validation during the load that created it.
/// - `created_at` is assigned by the store and never changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Poi {
    /// Store-wide unique identifier.
    pub id: PoiId,
    /// Display name shown on the map.
    #[schema(example = "경복궁")]
    pub title: String,
    /// Latitude in decimal degrees.
    #[schema(example = 37.579617)]
    pub latitude: f64,
    /// Longitude in decimal degrees.
    #[schema(example = 126.977041)]
    pub longitude: f64,
    /// Insert timestamp set by the store.
    pub created_at: DateTime<Utc>,
}

/// Unvalidated POI produced from one spreadsheet row.
///
/// Candidates never reach storage directly: the validator either accepts
/// them unchanged or turns them into a row diagnostic.
#[derive(Debug, Clone, PartialEq)]
pub struct CandidatePoi {
    /// Identifier generated at parse time.
    pub id: PoiId,
    /// Trimmed title text.
    pub title: String,
    /// Parsed latitude; `0.0` when absent or non-numeric.
    pub latitude: f64,
    /// Parsed longitude; `0.0` when absent or non-numeric.
    pub longitude: f64,
}

impl CandidatePoi {
    /// Build a candidate with a freshly generated identifier.
    pub fn new(title: impl Into<String>, latitude: f64, longitude: f64) -> Self {
        Self {
            id: PoiId::random(),
            title: title.into(),
            latitude,
            longitude,
        }
    }
}
