//! Areal boundaries (Polygon or MultiPolygon) and the handful of planar
//! operations needed to reconcile them: area, union, intersection, centroid.
//!
//! The hard computational geometry is delegated to [`geo`]; this crate only
//! narrows it to one variant type and turns library panics on degenerate
//! input into recoverable [`GeometryError`]s.

pub mod boundary;
pub mod io;
pub mod ops;

pub use boundary::{AreaMetric, Boundary};
pub use ops::union_all;

/// Failures of a geometry operation or of geometry decoding.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum GeometryError {
    /// The input geometry is structurally unusable (bad JSON, short rings, NaN).
    #[error("invalid geometry: {0}")]
    InvalidGeometry(String),
    /// The geometry type is not Polygon or MultiPolygon.
    #[error("unsupported geometry type: {0}")]
    UnsupportedType(String),
    /// The underlying boolean operation panicked.
    #[error("{op} failed: {message}")]
    OperationFailed { op: &'static str, message: String },
    /// The operation produced no polygons where some were required.
    #[error("{op} produced an empty result")]
    EmptyResult { op: &'static str },
}
