//! Canvas records and the key-value persistence boundary.
//!
//! A [`CanvasRecord`] is the unit that gets stored: viewport, node list, z
//! counter, and a last-modified stamp. The storage technology is someone
//! else's problem; it only has to implement [`CanvasStore`]. Records are
//! stored as MessagePack blobs (named fields, so optional node sizes survive)
//! and can also be exchanged as JSON with the browser host.
//!
//! [`CanvasLibrary`] adds multi-canvas management on top of a store.

use crate::id::NodeId;
use crate::model::Node;
use crate::store::Store;
use crate::transform::ViewTransform;
use kurbo::Vec2;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use thiserror::Error;

const KEY_PREFIX: &str = "canvas:";

#[derive(Debug, Error)]
pub enum PersistError {
    #[error("canvas '{0}' not found")]
    NotFound(String),
    #[error("canvas '{0}' already exists")]
    AlreadyExists(String),
    #[error("failed to encode canvas: {0}")]
    Encode(#[from] rmp_serde::encode::Error),
    #[error("failed to decode canvas: {0}")]
    Decode(#[from] rmp_serde::decode::Error),
    #[error("invalid canvas json: {0}")]
    Json(#[from] serde_json::Error),
    #[error("storage backend error: {0}")]
    Backend(String),
}

/// The persisted shape of one canvas.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CanvasRecord {
    pub name: String,
    pub pan: Vec2,
    pub scale: f64,
    pub fields: Vec<Node>,
    pub z_index_counter: u64,
    /// Milliseconds since the Unix epoch, supplied by the host clock.
    #[serde(default)]
    pub last_modified: u64,
}

impl CanvasRecord {
    pub fn empty(name: &str) -> Self {
        Self {
            name: name.to_string(),
            pan: Vec2::ZERO,
            scale: 1.0,
            fields: Vec::new(),
            z_index_counter: 0,
            last_modified: 0,
        }
    }

    /// Capture the active canvas from the store.
    pub fn capture(name: &str, store: &Store, now_ms: u64) -> Self {
        Self {
            name: name.to_string(),
            pan: store.pan(),
            scale: store.scale(),
            fields: store.nodes().to_vec(),
            z_index_counter: store.z_counter(),
            last_modified: now_ms,
        }
    }

    /// Swap this record into the store as the active canvas.
    pub fn restore_into(&self, store: &mut Store) {
        store.replace_canvas(
            ViewTransform::new(self.pan, self.scale),
            self.fields.clone(),
            self.z_index_counter,
        );
    }

    pub fn node_ids(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.fields.iter().map(|n| n.id)
    }

    pub fn encode(&self) -> Result<Vec<u8>, PersistError> {
        Ok(rmp_serde::to_vec_named(self)?)
    }

    pub fn decode(bytes: &[u8]) -> Result<Self, PersistError> {
        Ok(rmp_serde::from_slice(bytes)?)
    }

    pub fn to_json(&self) -> Result<String, PersistError> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn from_json(json: &str) -> Result<Self, PersistError> {
        Ok(serde_json::from_str(json)?)
    }
}

/// Key-value storage for encoded canvases.
pub trait CanvasStore {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, PersistError>;
    fn put(&mut self, key: &str, value: Vec<u8>) -> Result<(), PersistError>;
    fn remove(&mut self, key: &str) -> Result<bool, PersistError>;
    fn keys(&self) -> Result<Vec<String>, PersistError>;
}

/// In-process store, used headless and in tests.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: HashMap<String, Vec<u8>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl CanvasStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, PersistError> {
        Ok(self.entries.get(key).cloned())
    }

    fn put(&mut self, key: &str, value: Vec<u8>) -> Result<(), PersistError> {
        self.entries.insert(key.to_string(), value);
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<bool, PersistError> {
        Ok(self.entries.remove(key).is_some())
    }

    fn keys(&self) -> Result<Vec<String>, PersistError> {
        Ok(self.entries.keys().cloned().collect())
    }
}

/// Summary row for canvas pickers.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CanvasSummary {
    pub name: String,
    pub node_count: usize,
    pub last_modified: u64,
}

/// Named canvases over a [`CanvasStore`], with one of them active.
pub struct CanvasLibrary<S> {
    backend: S,
    active: Option<String>,
}

impl<S: CanvasStore> CanvasLibrary<S> {
    pub fn new(backend: S) -> Self {
        Self {
            backend,
            active: None,
        }
    }

    pub fn active(&self) -> Option<&str> {
        self.active.as_deref()
    }

    pub fn backend(&self) -> &S {
        &self.backend
    }

    fn key(name: &str) -> String {
        format!("{KEY_PREFIX}{name}")
    }

    pub fn exists(&self, name: &str) -> Result<bool, PersistError> {
        Ok(self.backend.get(&Self::key(name))?.is_some())
    }

    pub fn load(&self, name: &str) -> Result<CanvasRecord, PersistError> {
        let bytes = self
            .backend
            .get(&Self::key(name))?
            .ok_or_else(|| PersistError::NotFound(name.to_string()))?;
        CanvasRecord::decode(&bytes)
    }

    pub fn save(&mut self, record: &CanvasRecord) -> Result<(), PersistError> {
        let bytes = record.encode()?;
        log::debug!(
            "saving canvas '{}' ({} nodes, {} bytes)",
            record.name,
            record.fields.len(),
            bytes.len()
        );
        self.backend.put(&Self::key(&record.name), bytes)
    }

    /// Create an empty canvas. Fails if the name is taken.
    pub fn create(&mut self, name: &str, now_ms: u64) -> Result<CanvasRecord, PersistError> {
        if self.exists(name)? {
            return Err(PersistError::AlreadyExists(name.to_string()));
        }
        let mut record = CanvasRecord::empty(name);
        record.last_modified = now_ms;
        self.save(&record)?;
        Ok(record)
    }

    /// Persist the store as the active canvas (no-op without one).
    pub fn save_active(&mut self, store: &Store, now_ms: u64) -> Result<(), PersistError> {
        let Some(name) = self.active.clone() else {
            return Ok(());
        };
        self.save(&CanvasRecord::capture(&name, store, now_ms))
    }

    /// Save the current canvas, then load `name` into the store.
    pub fn switch_to(
        &mut self,
        name: &str,
        store: &mut Store,
        now_ms: u64,
    ) -> Result<(), PersistError> {
        let record = self.load(name)?;
        self.save_active(store, now_ms)?;
        record.restore_into(store);
        self.active = Some(name.to_string());
        log::debug!("switched to canvas '{name}'");
        Ok(())
    }

    pub fn rename(&mut self, from: &str, to: &str) -> Result<(), PersistError> {
        if self.exists(to)? {
            return Err(PersistError::AlreadyExists(to.to_string()));
        }
        let mut record = self.load(from)?;
        record.name = to.to_string();
        self.save(&record)?;
        self.backend.remove(&Self::key(from))?;
        if self.active.as_deref() == Some(from) {
            self.active = Some(to.to_string());
        }
        Ok(())
    }

    pub fn delete(&mut self, name: &str) -> Result<bool, PersistError> {
        if self.active.as_deref() == Some(name) {
            self.active = None;
        }
        self.backend.remove(&Self::key(name))
    }

    /// All canvases, most recently modified first.
    pub fn list(&self) -> Result<Vec<CanvasSummary>, PersistError> {
        let mut out = Vec::new();
        for key in self.backend.keys()? {
            let Some(name) = key.strip_prefix(KEY_PREFIX) else {
                continue;
            };
            let record = self.load(name)?;
            out.push(CanvasSummary {
                name: record.name,
                node_count: record.fields.len(),
                last_modified: record.last_modified,
            });
        }
        out.sort_by(|a, b| {
            b.last_modified
                .cmp(&a.last_modified)
                .then_with(|| a.name.cmp(&b.name))
        });
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::NodeKind;
    use kurbo::Size;
    use pretty_assertions::assert_eq;

    fn sample_record() -> CanvasRecord {
        let mut img = Node::new(NodeId::intern("persist_img"), NodeKind::Image, 10.0, 20.0);
        img.set_size(Size::new(300.0, 200.0));
        img.content = "https://example.org/cat.png".into();
        img.z_index = 4;
        let math = Node::new(NodeId::intern("persist_math"), NodeKind::Math, -5.0, 0.5);
        CanvasRecord {
            name: "notes".into(),
            pan: Vec2::new(12.0, -3.0),
            scale: 1.5,
            fields: vec![img, math],
            z_index_counter: 4,
            last_modified: 1_700_000_000_000,
        }
    }

    #[test]
    fn msgpack_preserves_optional_sizes() {
        let record = sample_record();
        let back = CanvasRecord::decode(&record.encode().unwrap()).unwrap();
        assert_eq!(back, record);
        assert_eq!(back.fields[1].width, None);
    }

    #[test]
    fn json_shape_uses_camel_case() {
        let json: serde_json::Value =
            serde_json::from_str(&sample_record().to_json().unwrap()).unwrap();
        assert_eq!(json["zIndexCounter"], 4);
        assert_eq!(json["pan"]["x"], 12.0);
        assert_eq!(json["fields"][0]["type"], "image");
    }

    #[test]
    fn library_create_switch_and_list() {
        let mut lib = CanvasLibrary::new(MemoryStore::new());
        let mut store = Store::default();
        lib.save(&sample_record()).unwrap();
        lib.create("scratch", 5).unwrap();

        lib.switch_to("notes", &mut store, 10).unwrap();
        assert_eq!(lib.active(), Some("notes"));
        assert_eq!(store.nodes().len(), 2);
        assert_eq!(store.scale(), 1.5);

        store.set_scale(2.0);
        lib.switch_to("scratch", &mut store, 20).unwrap();
        assert!(store.nodes().is_empty());
        assert_eq!(lib.load("notes").unwrap().scale, 2.0);

        let names: Vec<_> = lib.list().unwrap().into_iter().map(|s| s.name).collect();
        assert_eq!(names, vec!["notes".to_string(), "scratch".to_string()]);
    }

    #[test]
    fn create_rejects_existing_name() {
        let mut lib = CanvasLibrary::new(MemoryStore::new());
        lib.create("a", 0).unwrap();
        assert!(matches!(
            lib.create("a", 1),
            Err(PersistError::AlreadyExists(_))
        ));
    }

    #[test]
    fn rename_moves_record_and_active() {
        let mut lib = CanvasLibrary::new(MemoryStore::new());
        let mut store = Store::default();
        lib.create("old", 0).unwrap();
        lib.switch_to("old", &mut store, 0).unwrap();
        lib.rename("old", "new").unwrap();
        assert_eq!(lib.active(), Some("new"));
        assert!(!lib.exists("old").unwrap());
        assert_eq!(lib.load("new").unwrap().name, "new");
    }

    #[test]
    fn missing_canvas_is_not_found() {
        let lib = CanvasLibrary::new(MemoryStore::new());
        assert!(matches!(lib.load("nope"), Err(PersistError::NotFound(_))));
    }
}
