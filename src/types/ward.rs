use geoshape::Boundary;
use serde::{Deserialize, Serialize};

/// One raw ward polygon as loaded.
#[derive(Debug, Clone, PartialEq)]
pub struct RawWard {
    pub index: usize,
    pub name: String,
    /// Parent sub-district (thana) label.
    pub thana: Option<String>,
    pub district: Option<String>,
    pub geometry: Boundary,
}

/// Canvassing status of a ward or campaign area.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MarkerStatus {
    #[default]
    Pending,
    Visited,
    Absent,
    Completed,
}

/// A ward with the constituencies it overlaps.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedWard {
    pub id: String,
    pub name: String,
    pub thana: Option<String>,
    pub district: Option<String>,
    pub geometry: Boundary,
    /// Empty when the ward overlaps no constituency; several when it straddles a boundary.
    pub constituency_ids: Vec<String>,
    pub status: MarkerStatus,
}

impl ResolvedWard {
    #[inline] pub fn is_matched(&self) -> bool { !self.constituency_ids.is_empty() }
}
