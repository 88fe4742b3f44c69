//! Spatial matcher: assigns each ward to every constituency it overlaps by
//! more than a fixed fraction of the ward's own area.

use geo::Rect;
use geoshape::{AreaMetric, Boundary};
use rstar::{RTree, RTreeObject, AABB};
use tracing::{debug, info, warn};

use crate::common::{slugify, SlugRegistry};
use crate::config::DEFAULT_OVERLAP_THRESHOLD;
use crate::types::{Constituencies, MarkerStatus, RawWard, ResolvedWard};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MatchOptions {
    /// Strict lower bound on overlap area as a fraction of ward area.
    pub overlap_threshold: f64,
    pub area_metric: AreaMetric,
}

impl Default for MatchOptions {
    fn default() -> Self {
        Self { overlap_threshold: DEFAULT_OVERLAP_THRESHOLD, area_metric: AreaMetric::Planar }
    }
}

#[derive(Debug, Clone)]
pub struct MatchOutcome {
    /// One entry per input ward, in input order.
    pub wards: Vec<ResolvedWard>,
    pub matched: usize,
    pub unmatched: usize,
    /// Ward/constituency pairs whose intersection could not be computed.
    pub skipped_pairs: usize,
}

/// `overlap > threshold * ward_area`; an overlap of exactly the threshold does not match.
#[inline]
pub fn exceeds_threshold(overlap: f64, ward_area: f64, threshold: f64) -> bool {
    overlap > threshold * ward_area
}

// ---------------------------------------------------------------------------
// Candidate index
// ---------------------------------------------------------------------------

/// A constituency bounding box in the R-tree, by insertion position.
#[derive(Debug, Clone)]
struct BoundingBox {
    idx: usize,
    bbox: Rect<f64>,
}

impl RTreeObject for BoundingBox {
    type Envelope = AABB<[f64; 2]>;

    fn envelope(&self) -> Self::Envelope {
        AABB::from_corners(self.bbox.min().into(), self.bbox.max().into())
    }
}

/// R-tree over constituency bounding boxes. Pairs whose boxes are disjoint
/// have zero overlap, so skipping them never changes an assignment.
pub struct ConstituencyIndex<'a> {
    constituencies: &'a Constituencies,
    rtree: RTree<BoundingBox>,
}

impl<'a> ConstituencyIndex<'a> {
    pub fn new(constituencies: &'a Constituencies) -> Self {
        let boxes = constituencies.iter().enumerate()
            .filter_map(|(idx, c)| c.geometry.bounds().map(|bbox| BoundingBox { idx, bbox }))
            .collect();
        Self { constituencies, rtree: RTree::bulk_load(boxes) }
    }

    /// Insertion positions of constituencies whose box meets `bounds`, ascending.
    pub fn candidates(&self, bounds: Rect<f64>) -> Vec<usize> {
        let envelope = AABB::from_corners(bounds.min().into(), bounds.max().into());
        let mut hits: Vec<usize> = self.rtree
            .locate_in_envelope_intersecting(&envelope)
            .map(|bb| bb.idx)
            .collect();
        hits.sort_unstable();
        hits
    }

    /// Constituencies overlapping `ward` above the threshold, in insertion order.
    /// Also returns how many pairs failed to intersect.
    pub fn assign(&self, ward: &Boundary, options: &MatchOptions) -> (Vec<String>, usize) {
        let Some(bounds) = ward.bounds() else { return (Vec::new(), 0) };
        let ward_area = ward.area(options.area_metric);

        let mut assigned = Vec::new();
        let mut skipped = 0;
        for idx in self.candidates(bounds) {
            let Some(constituency) = self.constituencies.at(idx) else { continue };
            match ward.intersection_area(&constituency.geometry, options.area_metric) {
                Ok(overlap) if exceeds_threshold(overlap, ward_area, options.overlap_threshold) => {
                    assigned.push(constituency.id.clone());
                }
                Ok(_) => {}
                Err(e) => {
                    debug!(constituency = %constituency.id, error = %e, "intersection failed, pair skipped");
                    skipped += 1;
                }
            }
        }
        (assigned, skipped)
    }
}

// ---------------------------------------------------------------------------
// Matching
// ---------------------------------------------------------------------------

/// Resolve every ward against the merged constituencies.
pub fn match_wards(wards: Vec<RawWard>, constituencies: &Constituencies, options: &MatchOptions) -> MatchOutcome {
    let index = ConstituencyIndex::new(constituencies);
    let mut ids = SlugRegistry::new();
    let mut outcome = MatchOutcome {
        wards: Vec::with_capacity(wards.len()),
        matched: 0,
        unmatched: 0,
        skipped_pairs: 0,
    };

    for ward in wards {
        let (constituency_ids, skipped) = index.assign(&ward.geometry, options);
        outcome.skipped_pairs += skipped;

        let base = ward_slug(&ward.name, ward.thana.as_deref());
        let id = ids.claim(&base);
        if id != base {
            warn!(ward = %ward.name, slug = %base, id = %id, "ward slug collision, id suffixed");
        }

        let resolved = ResolvedWard {
            id,
            name: ward.name,
            thana: ward.thana,
            district: ward.district,
            geometry: ward.geometry,
            constituency_ids,
            status: MarkerStatus::Pending,
        };
        if resolved.is_matched() {
            outcome.matched += 1;
            debug!(ward = %resolved.id, constituencies = ?resolved.constituency_ids, "matched ward");
        } else {
            outcome.unmatched += 1;
            warn!(ward = %resolved.name, id = %resolved.id, "could not match ward to any constituency");
        }
        outcome.wards.push(resolved);
    }

    info!(matched = outcome.matched, unmatched = outcome.unmatched, skipped_pairs = outcome.skipped_pairs, "matched wards");
    outcome
}

/// Ward ids include the parent label so same-named wards in different thanas differ.
pub fn ward_slug(name: &str, thana: Option<&str>) -> String {
    slugify(&format!("{name}-{}", thana.unwrap_or("")))
}
