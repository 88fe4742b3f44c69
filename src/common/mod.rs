mod fs;
mod slug;

pub(crate) use fs::*;
pub use slug::{slugify, SlugRegistry};
