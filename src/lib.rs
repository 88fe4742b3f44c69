#![doc = "wardseed public API"]
//! Prepares constituency and ward boundaries for a door-to-door campaign map:
//! merges constituency fragments, matches wards to the constituencies they
//! overlap, and seeds a document store with the results.

mod common;
pub mod config;
mod error;
pub mod load;
pub mod matcher;
pub mod merge;
pub mod pipeline;
pub mod records;
pub mod store;
mod types;
pub mod writer;

#[doc(inline)]
pub use common::{slugify, SlugRegistry};

#[doc(inline)]
pub use config::PipelineConfig;

#[doc(inline)]
pub use error::{PipelineError, Result};

#[doc(inline)]
pub use pipeline::{Pipeline, PipelineInputs, Prepared, RunReport};

#[doc(inline)]
pub use types::{Constituencies, GeoPoint, MarkerStatus, MergedConstituency, RawFragment, RawWard, ResolvedWard};

pub use geoshape::{AreaMetric, Boundary, GeometryError};
