mod constituency;
mod geo_point;
mod ward;

pub use constituency::{Constituencies, MergedConstituency, RawFragment};
pub use geo_point::GeoPoint;
pub use ward::{MarkerStatus, RawWard, ResolvedWard};
