// Integration tests for the boolean operations on Boundary:
//   union, union_all, intersection, intersection_area.

use geo::{polygon, MultiPolygon, Polygon};
use geoshape::{union_all, AreaMetric, Boundary};

const EPS: f64 = 1e-9;

fn rect(x0: f64, y0: f64, x1: f64, y1: f64) -> Boundary {
    let p: Polygon<f64> = polygon![(x: x0, y: y0), (x: x1, y: y0), (x: x1, y: y1), (x: x0, y: y1), (x: x0, y: y0)];
    Boundary::Polygon(p)
}

#[test]
fn union_of_adjacent_squares_is_one_polygon() {
    let merged = rect(0.0, 0.0, 1.0, 1.0).union(&rect(1.0, 0.0, 2.0, 1.0)).unwrap();
    assert_eq!(merged.type_name(), "Polygon");
    assert!((merged.area(AreaMetric::Planar) - 2.0).abs() < EPS);
}

#[test]
fn union_of_disjoint_squares_is_multipolygon() {
    let merged = rect(0.0, 0.0, 1.0, 1.0).union(&rect(5.0, 5.0, 7.0, 7.0)).unwrap();
    assert_eq!(merged.type_name(), "MultiPolygon");
    assert_eq!(merged.num_polygons(), 2);
    assert!((merged.area(AreaMetric::Planar) - 5.0).abs() < EPS);
}

#[test]
fn union_of_overlapping_squares_counts_overlap_once() {
    let merged = rect(0.0, 0.0, 2.0, 2.0).union(&rect(1.0, 1.0, 3.0, 3.0)).unwrap();
    assert!((merged.area(AreaMetric::Planar) - 7.0).abs() < EPS);
}

#[test]
fn union_all_is_order_independent_in_area() {
    let parts = [rect(0.0, 0.0, 1.0, 1.0), rect(1.0, 0.0, 2.0, 1.0), rect(0.0, 1.0, 2.0, 2.0)];
    let forward = union_all(parts.iter()).unwrap();
    let backward = union_all(parts.iter().rev()).unwrap();
    assert!((forward.area(AreaMetric::Planar) - 4.0).abs() < EPS);
    assert!((backward.area(AreaMetric::Planar) - 4.0).abs() < EPS);
}

#[test]
fn union_all_of_one_returns_it_unchanged() {
    let only = rect(0.0, 0.0, 3.0, 1.0);
    assert_eq!(union_all([&only]).unwrap(), only);
}

#[test]
fn union_with_empty_input_fails_cleanly() {
    let empty = Boundary::MultiPolygon(MultiPolygon(vec![]));
    assert!(empty.union(&empty).is_err());
}

#[test]
fn intersection_of_disjoint_boxes_is_none() {
    let a = rect(0.0, 0.0, 1.0, 1.0);
    let b = rect(3.0, 3.0, 4.0, 4.0);
    assert!(a.intersection(&b).unwrap().is_none());
    assert_eq!(a.intersection_area(&b, AreaMetric::Planar).unwrap(), 0.0);
}

#[test]
fn intersection_area_of_partial_overlap() {
    let a = rect(0.0, 0.0, 10.0, 10.0);
    let b = rect(8.0, 0.0, 20.0, 10.0);
    let area = a.intersection_area(&b, AreaMetric::Planar).unwrap();
    assert!((area - 20.0).abs() < EPS);
}

#[test]
fn intersection_of_touching_boxes_has_no_area() {
    let a = rect(0.0, 0.0, 1.0, 1.0);
    let b = rect(1.0, 0.0, 2.0, 1.0);
    let area = a.intersection_area(&b, AreaMetric::Planar).unwrap();
    assert!(area.abs() < EPS);
}

#[test]
fn intersection_with_multipolygon_sums_members() {
    let multi = rect(0.0, 0.0, 1.0, 1.0).union(&rect(2.0, 0.0, 3.0, 1.0)).unwrap();
    let band = rect(0.5, 0.0, 2.5, 1.0);
    let area = band.intersection_area(&multi, AreaMetric::Planar).unwrap();
    assert!((area - 1.0).abs() < EPS);
}
