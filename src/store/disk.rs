use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use super::{DocumentStore, WriteBatch};
use crate::common::write_atomic;

/// Directory-backed store: each document is `<root>/<collection>/<id>.json`.
///
/// Every file is replaced atomically, but a batch is not: a failed commit may
/// leave earlier documents of the batch written.
pub struct DiskStore {
    root: PathBuf,
}

impl DiskStore {
    pub fn new(root: impl Into<PathBuf>) -> Self { Self { root: root.into() } }

    pub fn root(&self) -> &Path { &self.root }

    fn full(&self, collection: &str, id: &str) -> PathBuf {
        self.root.join(collection).join(format!("{id}.json"))
    }
}

impl DocumentStore for DiskStore {
    fn commit(&mut self, batch: &WriteBatch) -> Result<()> {
        for op in batch.ops() {
            let path = self.full(&op.collection, &op.id);
            let bytes = serde_json::to_vec_pretty(&op.data)
                .with_context(|| format!("[DiskStore::commit] encode {}", op.path()))?;
            write_atomic(&path, &bytes)
                .with_context(|| format!("[DiskStore::commit] write {}", op.path()))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use serde_json::{json, Value};

    use super::*;

    #[test]
    fn documents_land_under_collection_dirs() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = DiskStore::new(dir.path());
        assert_eq!(store.root(), dir.path());

        let mut batch = WriteBatch::new();
        batch.set("constituencies", "dhaka-10", json!({"id": "dhaka-10"}));
        batch.set("wards", "ward-1-ramna", json!({"id": "ward-1-ramna", "constituencyIds": []}));
        store.commit(&batch).unwrap();

        let text = std::fs::read_to_string(dir.path().join("wards").join("ward-1-ramna.json")).unwrap();
        let doc: Value = serde_json::from_str(&text).unwrap();
        assert_eq!(doc["constituencyIds"], json!([]));
        assert!(dir.path().join("constituencies").join("dhaka-10.json").is_file());
    }
}
