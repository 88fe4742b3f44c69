mod disk;
#[cfg(feature = "firestore")]
mod firestore;
mod mem;

use anyhow::Result;
use serde_json::Value;

pub use disk::DiskStore;
#[cfg(feature = "firestore")]
pub use firestore::FirestoreStore;
pub use mem::MemStore;

/// A full-document write (create or overwrite) of `collection/id`.
#[derive(Debug, Clone, PartialEq)]
pub struct WriteOp {
    pub collection: String,
    pub id: String,
    pub data: Value,
}

impl WriteOp {
    /// Store path of the document, e.g. "wards/ward-1-ramna".
    pub fn path(&self) -> String { format!("{}/{}", self.collection, self.id) }
}

/// Writes committed together as one unit.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WriteBatch {
    ops: Vec<WriteOp>,
}

impl WriteBatch {
    pub fn new() -> Self { Self::default() }

    pub fn set(&mut self, collection: impl Into<String>, id: impl Into<String>, data: Value) {
        self.ops.push(WriteOp { collection: collection.into(), id: id.into(), data });
    }

    #[inline] pub fn len(&self) -> usize { self.ops.len() }

    #[inline] pub fn is_empty(&self) -> bool { self.ops.is_empty() }

    pub fn ops(&self) -> &[WriteOp] { &self.ops }
}

/// Write side of the external document store.
///
/// `commit` applies the whole batch or fails; callers do not open a new batch
/// until the previous commit has returned.
pub trait DocumentStore {
    fn commit(&mut self, batch: &WriteBatch) -> Result<()>;
}

impl<S: DocumentStore + ?Sized> DocumentStore for &mut S {
    fn commit(&mut self, batch: &WriteBatch) -> Result<()> { (**self).commit(batch) }
}

impl<S: DocumentStore + ?Sized> DocumentStore for Box<S> {
    fn commit(&mut self, batch: &WriteBatch) -> Result<()> { (**self).commit(batch) }
}
