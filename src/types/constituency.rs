use ahash::AHashMap;
use geoshape::Boundary;

use super::GeoPoint;

/// One raw constituency boundary piece, before merging.
#[derive(Debug, Clone, PartialEq)]
pub struct RawFragment {
    /// Position of the feature in its source document.
    pub index: usize,
    /// Constituency name; fragments sharing it are merged.
    pub label: String,
    pub geometry: Boundary,
    /// Total population of the fragment, 0 when absent.
    pub population: f64,
    pub division: Option<String>,
    pub district: Option<String>,
}

/// A constituency with all of its fragments unioned into one boundary.
#[derive(Debug, Clone, PartialEq)]
pub struct MergedConstituency {
    pub id: String,
    pub name: String,
    pub geometry: Boundary,
    pub center: GeoPoint,
    pub total_population: f64,
    pub division_name: Option<String>,
    pub district_name: Option<String>,
    pub fragment_count: usize,
    /// The union failed and `geometry` is only the first fragment.
    pub degraded: bool,
}

/// Merged constituencies keyed by id, iterated in first-seen order.
#[derive(Debug, Clone, Default)]
pub struct Constituencies {
    items: Vec<MergedConstituency>,
    by_id: AHashMap<String, usize>,
}

impl Constituencies {
    pub fn new() -> Self { Self::default() }

    /// Add a constituency. Returns false (and keeps the existing one) if the id is taken.
    pub(crate) fn insert(&mut self, constituency: MergedConstituency) -> bool {
        if self.by_id.contains_key(&constituency.id) {
            return false;
        }
        self.by_id.insert(constituency.id.clone(), self.items.len());
        self.items.push(constituency);
        true
    }

    #[inline] pub fn len(&self) -> usize { self.items.len() }

    #[inline] pub fn is_empty(&self) -> bool { self.items.is_empty() }

    /// Look up a constituency by id.
    pub fn get(&self, id: &str) -> Option<&MergedConstituency> {
        self.by_id.get(id).map(|&i| &self.items[i])
    }

    /// Constituency at insertion position `idx`.
    #[inline] pub fn at(&self, idx: usize) -> Option<&MergedConstituency> { self.items.get(idx) }

    pub fn iter(&self) -> impl Iterator<Item = &MergedConstituency> { self.items.iter() }

    pub fn ids(&self) -> impl Iterator<Item = &str> { self.items.iter().map(|c| c.id.as_str()) }
}

impl<'a> IntoIterator for &'a Constituencies {
    type Item = &'a MergedConstituency;
    type IntoIter = std::slice::Iter<'a, MergedConstituency>;

    fn into_iter(self) -> Self::IntoIter { self.items.iter() }
}
