use geo::{Area, BoundingRect, Centroid, ChamberlainDuquetteArea, Coord, MultiPolygon, Point, Polygon, Rect};
use serde::{Deserialize, Serialize};

use crate::GeometryError;

/// How areas are measured.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AreaMetric {
    /// Shoelace area in squared coordinate units.
    #[default]
    Planar,
    /// Chamberlain-Duquette area on the WGS84 sphere, in m². Coordinates must be lon/lat.
    Spherical,
}

/// An areal geometry: exactly one of the two GeoJSON areal shapes.
#[derive(Debug, Clone, PartialEq)]
pub enum Boundary {
    Polygon(Polygon<f64>),
    MultiPolygon(MultiPolygon<f64>),
}

impl Boundary {
    /// Build a boundary from a MultiPolygon, collapsing a single member to a Polygon.
    pub fn from_multi_polygon(mut mp: MultiPolygon<f64>) -> Self {
        if mp.0.len() == 1 {
            if let Some(polygon) = mp.0.pop() {
                return Boundary::Polygon(polygon);
            }
        }
        Boundary::MultiPolygon(mp)
    }

    /// GeoJSON type name of this variant.
    pub fn type_name(&self) -> &'static str {
        match self {
            Boundary::Polygon(_) => "Polygon",
            Boundary::MultiPolygon(_) => "MultiPolygon",
        }
    }

    /// Number of member polygons (1 for a Polygon).
    pub fn num_polygons(&self) -> usize {
        match self {
            Boundary::Polygon(_) => 1,
            Boundary::MultiPolygon(mp) => mp.0.len(),
        }
    }

    /// True when there is no exterior ring with any coordinates.
    pub fn is_empty(&self) -> bool {
        self.polygons().all(|p| p.exterior().0.is_empty())
    }

    /// Iterate over the member polygons.
    pub fn polygons(&self) -> impl Iterator<Item = &Polygon<f64>> {
        let slice: &[Polygon<f64>] = match self {
            Boundary::Polygon(p) => std::slice::from_ref(p),
            Boundary::MultiPolygon(mp) => &mp.0,
        };
        slice.iter()
    }

    /// Copy into a MultiPolygon, the common operand type for boolean operations.
    pub fn to_multi_polygon(&self) -> MultiPolygon<f64> {
        match self {
            Boundary::Polygon(p) => MultiPolygon(vec![p.clone()]),
            Boundary::MultiPolygon(mp) => mp.clone(),
        }
    }

    /// Area under the given metric; always non-negative.
    pub fn area(&self, metric: AreaMetric) -> f64 {
        match (self, metric) {
            (Boundary::Polygon(p), AreaMetric::Planar) => p.unsigned_area(),
            (Boundary::MultiPolygon(mp), AreaMetric::Planar) => mp.unsigned_area(),
            (Boundary::Polygon(p), AreaMetric::Spherical) => p.chamberlain_duquette_unsigned_area(),
            (Boundary::MultiPolygon(mp), AreaMetric::Spherical) => mp.chamberlain_duquette_unsigned_area(),
        }
    }

    /// Area-weighted centroid, or None for empty or non-finite geometry.
    pub fn centroid(&self) -> Option<Point<f64>> {
        let point = match self {
            Boundary::Polygon(p) => p.centroid(),
            Boundary::MultiPolygon(mp) => mp.centroid(),
        }?;
        (point.x().is_finite() && point.y().is_finite()).then_some(point)
    }

    /// Axis-aligned bounding rectangle, or None if empty.
    pub fn bounds(&self) -> Option<Rect<f64>> {
        match self {
            Boundary::Polygon(p) => p.bounding_rect(),
            Boundary::MultiPolygon(mp) => mp.bounding_rect(),
        }
    }

    /// Reject coordinates that would poison the boolean operations.
    pub(crate) fn check_finite(&self) -> Result<(), GeometryError> {
        let finite = |c: &Coord<f64>| c.x.is_finite() && c.y.is_finite();
        let ok = self.polygons().all(|p| {
            p.exterior().0.iter().all(finite)
                && p.interiors().iter().all(|ring| ring.0.iter().all(finite))
        });
        if ok {
            Ok(())
        } else {
            Err(GeometryError::InvalidGeometry("non-finite coordinate".into()))
        }
    }
}

impl From<Polygon<f64>> for Boundary {
    fn from(polygon: Polygon<f64>) -> Self {
        Boundary::Polygon(polygon)
    }
}

impl From<MultiPolygon<f64>> for Boundary {
    fn from(mp: MultiPolygon<f64>) -> Self {
        Boundary::MultiPolygon(mp)
    }
}
