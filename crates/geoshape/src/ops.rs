use std::any::Any;
use std::panic::{self, AssertUnwindSafe};

use geo::{BooleanOps, Intersects};

use crate::{AreaMetric, Boundary, GeometryError};

// ---------------------------------------------------------------------------
// Boolean operations
// ---------------------------------------------------------------------------

impl Boundary {
    /// Set union of two boundaries. Disjoint inputs yield a MultiPolygon.
    pub fn union(&self, other: &Boundary) -> Result<Boundary, GeometryError> {
        self.check_finite()?;
        other.check_finite()?;
        let (a, b) = (self.to_multi_polygon(), other.to_multi_polygon());
        let merged = guarded("union", || a.union(&b))?;
        if merged.0.is_empty() {
            return Err(GeometryError::EmptyResult { op: "union" });
        }
        Ok(Boundary::from_multi_polygon(merged))
    }

    /// Overlap of two boundaries, or None if they share no area.
    pub fn intersection(&self, other: &Boundary) -> Result<Option<Boundary>, GeometryError> {
        self.check_finite()?;
        other.check_finite()?;
        match (self.bounds(), other.bounds()) {
            (Some(a), Some(b)) if a.intersects(&b) => {}
            _ => return Ok(None),
        }
        let (a, b) = (self.to_multi_polygon(), other.to_multi_polygon());
        let clipped = guarded("intersection", || a.intersection(&b))?;
        if clipped.0.is_empty() {
            Ok(None)
        } else {
            Ok(Some(Boundary::from_multi_polygon(clipped)))
        }
    }

    /// Area of the overlap between two boundaries; zero when disjoint.
    pub fn intersection_area(&self, other: &Boundary, metric: AreaMetric) -> Result<f64, GeometryError> {
        Ok(self.intersection(other)?.map_or(0.0, |overlap| overlap.area(metric)))
    }
}

/// Union of a sequence of boundaries, folded pairwise in order.
/// A single input is returned unchanged; an empty input is an error.
pub fn union_all<'a>(boundaries: impl IntoIterator<Item = &'a Boundary>) -> Result<Boundary, GeometryError> {
    let mut iter = boundaries.into_iter();
    let first = iter.next().ok_or(GeometryError::EmptyResult { op: "union" })?;
    iter.try_fold(first.clone(), |acc, next| acc.union(next))
}

// ---------------------------------------------------------------------------
// Panic containment
// ---------------------------------------------------------------------------

/// Run a geo boolean op, converting a panic on degenerate input into an error.
fn guarded<T>(op: &'static str, f: impl FnOnce() -> T) -> Result<T, GeometryError> {
    panic::catch_unwind(AssertUnwindSafe(f))
        .map_err(|payload| GeometryError::OperationFailed { op, message: panic_message(payload.as_ref()) })
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "panic in geometry library".to_string()
    }
}
