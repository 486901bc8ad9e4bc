//! Storage module for uploaded report photos
//!
//! Writes photo blobs under a local media root with dated, collision-free
//! keys; the database only ever stores the relative key.

mod photo_store;

pub use photo_store::PhotoStore;
