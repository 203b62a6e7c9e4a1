//! Directory-backed document store
//!
//! One JSON object per record at `<root>/<id>.json`. The object's fields are
//! the record's attributes. If the object carries an `id` field, that value
//! (stringified) is the record's id; otherwise the file stem is.
//!
//! Ids that cannot name a file inside the root (empty, containing a path
//! separator, or a dot-segment) have no stored record and are reported as
//! missing.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use sift_core::{CancelToken, Document, RecordType, SiftError, SiftResult};

const EXTENSION: &str = "json";

/// Document store rooted at a directory.
#[derive(Debug, Clone)]
pub struct DirectoryStore {
    root: PathBuf,
}

impl DirectoryStore {
    /// Open a store rooted at `root`. The directory must exist.
    pub fn open(root: impl Into<PathBuf>) -> SiftResult<Self> {
        let root = root.into();
        if !root.is_dir() {
            return Err(SiftError::storage(format!(
                "{} is not a directory",
                root.display()
            )));
        }
        Ok(Self { root })
    }

    /// Root directory
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Write a document to `<root>/<id>.json`.
    pub fn put(&self, doc: &Document) -> SiftResult<()> {
        let path = self
            .path_for(&doc.id)
            .ok_or_else(|| SiftError::invalid_input(format!("invalid record id '{}'", doc.id)))?;
        let body = serde_json::to_vec_pretty(&doc.attributes)?;
        std::fs::write(path, body)?;
        Ok(())
    }

    fn path_for(&self, id: &str) -> Option<PathBuf> {
        if id.is_empty() || id == "." || id == ".." || id.contains(['/', '\\', '\0']) {
            return None;
        }
        Some(self.root.join(format!("{}.{}", id, EXTENSION)))
    }

    pub(crate) fn fetch(
        &self,
        record_type: &RecordType,
        ids: &[String],
        cancel: &CancelToken,
    ) -> SiftResult<Vec<Document>> {
        let mut docs = Vec::with_capacity(ids.len());
        for id in ids {
            cancel.check()?;
            let Some(path) = self.path_for(id) else {
                tracing::warn!(target: "sift::backend", record_type = %record_type, id = %id, "id cannot name a stored record");
                continue;
            };
            let bytes = match std::fs::read(&path) {
                Ok(b) => b,
                Err(e) if e.kind() == ErrorKind::NotFound => continue,
                Err(e) => {
                    return Err(SiftError::storage(format!("{}: {}", path.display(), e)));
                }
            };
            let value: serde_json::Value = serde_json::from_slice(&bytes).map_err(|e| {
                SiftError::serialization(format!("{}: {}", path.display(), e))
            })?;
            let serde_json::Value::Object(attributes) = value else {
                return Err(SiftError::serialization(format!(
                    "{}: record is not a JSON object",
                    path.display()
                )));
            };
            let stored_id = match attributes.get("id") {
                Some(serde_json::Value::String(s)) => s.clone(),
                Some(serde_json::Value::Number(n)) => n.to_string(),
                _ => id.clone(),
            };
            docs.push(Document {
                record_type: record_type.clone(),
                id: stored_id,
                attributes,
            });
        }
        Ok(docs)
    }
}
