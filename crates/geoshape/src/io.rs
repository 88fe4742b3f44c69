use geo::{Coord, LineString, MultiPolygon, Polygon};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{Boundary, GeometryError};

type Position = Vec<f64>;
type Ring = Vec<Position>;

/// Wire form of the two supported GeoJSON geometry objects.
#[derive(Debug, Serialize, Deserialize)]
#[serde(tag = "type", content = "coordinates")]
enum GeometryJson {
    Polygon(Vec<Ring>),
    MultiPolygon(Vec<Vec<Ring>>),
}

impl Boundary {
    /// Decode a GeoJSON geometry object (`{"type": ..., "coordinates": ...}`).
    pub fn from_geojson(value: &Value) -> Result<Self, GeometryError> {
        let ty = value.get("type").and_then(Value::as_str)
            .ok_or_else(|| GeometryError::InvalidGeometry("missing geometry type".into()))?;
        if ty != "Polygon" && ty != "MultiPolygon" {
            return Err(GeometryError::UnsupportedType(ty.to_string()));
        }

        let wire = GeometryJson::deserialize(value)
            .map_err(|e| GeometryError::InvalidGeometry(e.to_string()))?;

        match wire {
            GeometryJson::Polygon(rings) => Ok(Boundary::Polygon(parse_polygon(&rings)?)),
            GeometryJson::MultiPolygon(polygons) => {
                if polygons.is_empty() {
                    return Err(GeometryError::InvalidGeometry("MultiPolygon has no polygons".into()));
                }
                let polygons = polygons.iter()
                    .map(|rings| parse_polygon(rings))
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(Boundary::MultiPolygon(MultiPolygon(polygons)))
            }
        }
    }

    /// Decode a GeoJSON geometry from its string encoding.
    pub fn from_geojson_str(s: &str) -> Result<Self, GeometryError> {
        let value: Value = serde_json::from_str(s)
            .map_err(|e| GeometryError::InvalidGeometry(e.to_string()))?;
        Self::from_geojson(&value)
    }

    /// Encode as a compact GeoJSON string, keeping the Polygon/MultiPolygon variant.
    pub fn to_geojson_string(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(&self.to_wire())
    }

    fn to_wire(&self) -> GeometryJson {
        match self {
            Boundary::Polygon(p) => GeometryJson::Polygon(polygon_rings(p)),
            Boundary::MultiPolygon(mp) => GeometryJson::MultiPolygon(mp.0.iter().map(polygon_rings).collect()),
        }
    }
}

fn polygon_rings(polygon: &Polygon<f64>) -> Vec<Ring> {
    std::iter::once(polygon.exterior())
        .chain(polygon.interiors())
        .map(|ring| ring.coords().map(|c| vec![c.x, c.y]).collect())
        .collect()
}

/// First ring is the exterior, the rest are holes.
fn parse_polygon(rings: &[Ring]) -> Result<Polygon<f64>, GeometryError> {
    let (exterior, interiors) = rings.split_first()
        .ok_or_else(|| GeometryError::InvalidGeometry("polygon has no rings".into()))?;
    let interiors = interiors.iter()
        .map(|ring| parse_ring(ring))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(Polygon::new(parse_ring(exterior)?, interiors))
}

/// Parse one linear ring, closing it if the source left it open.
/// Altitude and any further ordinates are dropped.
fn parse_ring(positions: &[Position]) -> Result<LineString<f64>, GeometryError> {
    let mut coords = positions.iter()
        .map(|p| match p.as_slice() {
            [x, y, ..] => Ok(Coord { x: *x, y: *y }),
            _ => Err(GeometryError::InvalidGeometry(format!("position with {} ordinates", p.len()))),
        })
        .collect::<Result<Vec<_>, _>>()?;

    if let (Some(&first), Some(&last)) = (coords.first(), coords.last()) {
        if first != last {
            coords.push(first);
        }
    }

    // A closed ring needs three distinct corners.
    if coords.len() < 4 {
        return Err(GeometryError::InvalidGeometry(format!("ring with {} positions", coords.len())));
    }
    Ok(LineString(coords))
}
