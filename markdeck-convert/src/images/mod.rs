//! Stored images
//!
//!     Images pasted or dropped into the editor are persisted outside the document and referenced
//!     from markdown as `![alt](stored:<id>)`. The conversion core only ever reads them: the
//!     forward pass looks records up by id to embed their data URL, and the reverse pass scans
//!     them by payload when it has to recover an id from rendered HTML.
//!
//!     The [`ImageStore`] trait is the seam to whatever persists the records. [`MemoryImageStore`]
//!     is the in-process implementation, loadable from the JSON array the editor writes.

pub mod reverse_map;

pub use reverse_map::ReverseImageMap;

use crate::error::ImageStoreError;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::Path;

/// Scheme prefix of a stored-image reference in markdown.
pub const STORED_SCHEME: &str = "stored:";

/// Scheme prefix used for references whose image is missing from the store.
pub const NOT_FOUND_SCHEME: &str = "image-not-found:";

/// A persisted image record.
///
/// Field names follow the editor's persisted JSON (`type`, `uploadedAt`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredImage {
    /// Opaque identifier, assigned at upload and never reused.
    pub id: String,
    /// Self-contained payload as a `data:` URL.
    pub data: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub size: u64,
    #[serde(default)]
    pub width: u32,
    #[serde(default)]
    pub height: u32,
    #[serde(rename = "type", default)]
    pub mime_type: String,
    #[serde(rename = "uploadedAt", default, skip_serializing_if = "Option::is_none")]
    pub uploaded_at: Option<String>,
}

impl StoredImage {
    /// Create a record with only the fields the conversion core interprets.
    pub fn new(id: impl Into<String>, data: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            data: data.into(),
            name: String::new(),
            size: 0,
            width: 0,
            height: 0,
            mime_type: String::new(),
            uploaded_at: None,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }
}

/// Read access to persisted images.
///
/// Implementations must be cheap to query repeatedly: the forward pass calls
/// [`ImageStore::get_image`] once per stored reference on every render.
pub trait ImageStore {
    /// Look up a record by id.
    fn get_image(&self, id: &str) -> Option<&StoredImage>;

    /// Every record in the store, used by the reverse pass as a fallback scan.
    fn list_images(&self) -> Vec<&StoredImage>;

    /// Find the id of the image whose payload equals `data`.
    ///
    /// Two records with byte-identical payloads are indistinguishable here; the
    /// first one listed wins.
    fn find_by_data(&self, data: &str) -> Option<&str> {
        self.list_images()
            .into_iter()
            .find(|image| image.data == data)
            .map(|image| image.id.as_str())
    }
}

/// In-memory image store preserving insertion order.
#[derive(Debug, Clone, Default)]
pub struct MemoryImageStore {
    images: Vec<StoredImage>,
    index: HashMap<String, usize>,
}

impl MemoryImageStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a record, replacing any existing record with the same id.
    pub fn insert(&mut self, image: StoredImage) {
        match self.index.get(&image.id) {
            Some(&position) => self.images[position] = image,
            None => {
                self.index.insert(image.id.clone(), self.images.len());
                self.images.push(image);
            }
        }
    }

    /// Remove a record by id, returning it if it existed.
    pub fn remove(&mut self, id: &str) -> Option<StoredImage> {
        let position = self.index.remove(id)?;
        let removed = self.images.remove(position);
        for slot in self.index.values_mut() {
            if *slot > position {
                *slot -= 1;
            }
        }
        Some(removed)
    }

    pub fn len(&self) -> usize {
        self.images.len()
    }

    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }

    /// Parse the persisted JSON array of image records.
    pub fn from_json(json: &str) -> Result<Self, ImageStoreError> {
        let records: Vec<StoredImage> = serde_json::from_str(json)?;
        Ok(records.into_iter().collect())
    }

    /// Load a store from a JSON file on disk.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ImageStoreError> {
        let json = fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// Serialize the store back to the persisted JSON shape.
    pub fn to_json(&self) -> Result<String, ImageStoreError> {
        Ok(serde_json::to_string_pretty(&self.images)?)
    }
}

impl FromIterator<StoredImage> for MemoryImageStore {
    fn from_iter<T: IntoIterator<Item = StoredImage>>(iter: T) -> Self {
        let mut store = MemoryImageStore::new();
        for image in iter {
            store.insert(image);
        }
        store
    }
}

impl ImageStore for MemoryImageStore {
    fn get_image(&self, id: &str) -> Option<&StoredImage> {
        self.index.get(id).map(|&position| &self.images[position])
    }

    fn list_images(&self) -> Vec<&StoredImage> {
        self.images.iter().collect()
    }
}
