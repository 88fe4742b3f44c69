//! Document shapes written to the store.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::types::{GeoPoint, MarkerStatus, MergedConstituency, ResolvedWard};

/// `constituencies/{id}`. Geometry is a GeoJSON string: the store cannot hold
/// arrays nested as deeply as MultiPolygon coordinates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConstituencyRecord {
    pub id: String,
    pub name: String,
    pub geometry: String,
    pub center: GeoPoint,
    pub total_population: f64,
    pub division_name: Option<String>,
    pub district_name: Option<String>,
}

impl ConstituencyRecord {
    pub fn from_merged(c: &MergedConstituency) -> Result<Self, serde_json::Error> {
        Ok(Self {
            id: c.id.clone(),
            name: c.name.clone(),
            geometry: c.geometry.to_geojson_string()?,
            center: c.center,
            total_population: c.total_population,
            division_name: c.division_name.clone(),
            district_name: c.district_name.clone(),
        })
    }
}

/// `wards/{id}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WardRecord {
    pub id: String,
    pub name: String,
    pub constituency_ids: Vec<String>,
    pub thana: Option<String>,
    pub district: Option<String>,
    pub geometry: String,
    pub status: MarkerStatus,
    pub activity_log: Vec<Value>,
}

impl WardRecord {
    pub fn from_resolved(w: &ResolvedWard) -> Result<Self, serde_json::Error> {
        Ok(Self {
            id: w.id.clone(),
            name: w.name.clone(),
            constituency_ids: w.constituency_ids.clone(),
            thana: w.thana.clone(),
            district: w.district.clone(),
            geometry: w.geometry.to_geojson_string()?,
            status: w.status,
            activity_log: Vec::new(),
        })
    }
}
