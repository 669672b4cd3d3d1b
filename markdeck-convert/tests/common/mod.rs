//! Shared fixtures for the integration tests.

use markdeck_convert::MemoryImageStore;

pub const CAT_DATA: &str =
    "data:image/png;base64,iVBORw0KGgoAAAANSUhEUgAAAAEAAAABCAYAAAAfFcSJAAAADUlEQVR42mNk";
pub const DOG_DATA: &str = "data:image/jpeg;base64,/9j/4AAQSkZJRgABAQAAAQABAAD";

pub const KITCHENSINK_MD: &str = include_str!("fixtures/kitchensink.md");

/// Image store with `cat`, `dog` and `dog-copy` (same payload as `dog`).
pub fn fixture_store() -> MemoryImageStore {
    MemoryImageStore::from_json(include_str!("fixtures/images.json"))
        .expect("fixture image store must parse")
}
