//! Constituency merger: unions the fragments of each constituency.

use ahash::AHashMap;
use geoshape::{union_all, Boundary, GeometryError};
use tracing::{debug, info, warn};

use crate::common::{slugify, SlugRegistry};
use crate::types::{Constituencies, GeoPoint, MergedConstituency, RawFragment};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MergeOptions {
    /// Center for constituencies whose centroid cannot be computed.
    pub default_center: GeoPoint,
}

impl Default for MergeOptions {
    fn default() -> Self { Self { default_center: GeoPoint::CAPITAL } }
}

/// All fragments sharing one label, in source order.
#[derive(Debug, Clone, PartialEq)]
pub struct FragmentGroup {
    pub label: String,
    pub fragments: Vec<RawFragment>,
}

#[derive(Debug, Clone)]
pub struct MergeOutcome {
    pub constituencies: Constituencies,
    /// Constituencies whose union failed and fell back to their first fragment.
    pub union_fallbacks: usize,
}

/// Group fragments by exact label, groups ordered by first appearance.
pub fn group_fragments(fragments: Vec<RawFragment>) -> Vec<FragmentGroup> {
    let (groups, _) = fragments.into_iter().fold(
        (Vec::<FragmentGroup>::new(), AHashMap::<String, usize>::new()),
        |(mut groups, mut index), fragment| {
            match index.get(&fragment.label) {
                Some(&i) => groups[i].fragments.push(fragment),
                None => {
                    index.insert(fragment.label.clone(), groups.len());
                    groups.push(FragmentGroup { label: fragment.label.clone(), fragments: vec![fragment] });
                }
            }
            (groups, index)
        },
    );
    groups
}

/// Merge fragments into one constituency per distinct label.
pub fn merge_constituencies(fragments: Vec<RawFragment>, options: &MergeOptions) -> MergeOutcome {
    let groups = group_fragments(fragments);
    info!(constituencies = groups.len(), "grouped constituency fragments");

    let mut ids = SlugRegistry::new();
    let mut constituencies = Constituencies::new();
    let mut union_fallbacks = 0;

    for group in groups {
        let base = slugify(&group.label);
        let id = ids.claim(&base);
        if id != base {
            warn!(label = %group.label, slug = %base, id = %id, "constituency slug collision, id suffixed");
        }

        let merged = merge_group(id, group, options);
        if merged.degraded {
            union_fallbacks += 1;
        }
        constituencies.insert(merged);
    }

    if union_fallbacks > 0 {
        warn!(union_fallbacks, "some constituencies use a single fragment as their boundary");
    }
    MergeOutcome { constituencies, union_fallbacks }
}

/// Build one constituency from a non-empty group.
pub(crate) fn merge_group(id: String, group: FragmentGroup, options: &MergeOptions) -> MergedConstituency {
    let FragmentGroup { label, fragments } = group;
    debug!(constituency = %label, fragments = fragments.len(), "merging constituency");

    let (geometry, degraded) = match union_fragments(&fragments) {
        Ok(geometry) => (geometry, false),
        Err(e) => {
            warn!(constituency = %label, error = %e, "union failed, using first fragment");
            (fragments[0].geometry.clone(), true)
        }
    };

    let center = geometry.centroid().map(GeoPoint::from).unwrap_or_else(|| {
        warn!(constituency = %label, "no centroid, using default center");
        options.default_center
    });

    MergedConstituency {
        id,
        total_population: fragments.iter().map(|f| f.population).sum(),
        division_name: fragments[0].division.clone(),
        district_name: fragments[0].district.clone(),
        fragment_count: fragments.len(),
        name: label,
        geometry,
        center,
        degraded,
    }
}

/// Union of the fragment geometries; a lone fragment is returned as is.
fn union_fragments(fragments: &[RawFragment]) -> Result<Boundary, GeometryError> {
    match fragments {
        [only] => Ok(only.geometry.clone()),
        _ => union_all(fragments.iter().map(|f| &f.geometry)),
    }
}
