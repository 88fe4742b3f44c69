// Integration tests for GeoJSON geometry decoding and encoding.

use geoshape::{AreaMetric, Boundary, GeometryError};
use serde_json::json;

#[test]
fn decodes_polygon_and_closes_open_ring() {
    let b = Boundary::from_geojson(&json!({
        "type": "Polygon",
        "coordinates": [[[0.0, 0.0], [4.0, 0.0], [4.0, 4.0], [0.0, 4.0]]]
    })).unwrap();
    let Boundary::Polygon(p) = &b else { panic!("expected polygon") };
    assert_eq!(p.exterior().0.len(), 5);
    assert!((b.area(AreaMetric::Planar) - 16.0).abs() < 1e-12);
}

#[test]
fn decodes_multipolygon_with_hole_and_altitude() {
    let b = Boundary::from_geojson(&json!({
        "type": "MultiPolygon",
        "coordinates": [
            [
                [[0, 0, 5], [10, 0, 5], [10, 10, 5], [0, 10, 5], [0, 0, 5]],
                [[2, 2], [4, 2], [4, 4], [2, 4], [2, 2]]
            ],
            [[[20, 20], [21, 20], [21, 21], [20, 21], [20, 20]]]
        ]
    })).unwrap();
    assert_eq!(b.num_polygons(), 2);
    assert!((b.area(AreaMetric::Planar) - 97.0).abs() < 1e-12);
}

#[test]
fn rejects_point_geometry() {
    let err = Boundary::from_geojson(&json!({"type": "Point", "coordinates": [1.0, 2.0]})).unwrap_err();
    assert_eq!(err, GeometryError::UnsupportedType("Point".into()));
}

#[test]
fn rejects_degenerate_ring() {
    let err = Boundary::from_geojson(&json!({
        "type": "Polygon",
        "coordinates": [[[0.0, 0.0], [1.0, 1.0]]]
    })).unwrap_err();
    assert!(matches!(err, GeometryError::InvalidGeometry(_)));
}

#[test]
fn rejects_missing_type() {
    let err = Boundary::from_geojson(&json!({"coordinates": []})).unwrap_err();
    assert!(matches!(err, GeometryError::InvalidGeometry(_)));
}

#[test]
fn string_encoding_keeps_variant_and_coordinates() {
    let source = json!({
        "type": "Polygon",
        "coordinates": [[[90.0, 23.0], [90.5, 23.0], [90.5, 23.5], [90.0, 23.0]]]
    });
    let encoded = Boundary::from_geojson(&source).unwrap().to_geojson_string().unwrap();
    let reparsed: serde_json::Value = serde_json::from_str(&encoded).unwrap();
    assert_eq!(reparsed, source);
}
