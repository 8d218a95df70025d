//! Internal Diesel row structs for raw POI queries.
//!
//! These types are implementation details of the persistence layer and must
//! never be exposed to the domain.

use chrono::{DateTime, Utc};
use diesel::QueryableByName;
use diesel::sql_types::{Double, Timestamptz, Uuid as SqlUuid, Varchar};
use uuid::Uuid;

use crate::domain::{Poi, PoiId};

/// Row read from the `poi` table.
///
/// Coordinates are stored as `DECIMAL` and cast to `float8` in the select
/// list.
#[derive(Debug, Clone, QueryableByName)]
pub(crate) struct PoiRow {
    #[diesel(sql_type = SqlUuid)]
    pub id: Uuid,
    #[diesel(sql_type = Varchar)]
    pub title: String,
    #[diesel(sql_type = Double)]
    pub latitude: f64,
    #[diesel(sql_type = Double)]
    pub longitude: f64,
    #[diesel(sql_type = Timestamptz)]
    pub created_at: DateTime<Utc>,
}

impl From<PoiRow> for Poi {
    fn from(row: PoiRow) -> Self {
        Self {
            id: PoiId::from_uuid(row.id),
            title: row.title,
            latitude: row.latitude,
            longitude: row.longitude,
            created_at: row.created_at,
        }
    }
}
