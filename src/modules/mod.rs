//! Modules layer - Infrastructure components
//!
//! Contains the per-user session scratch store and the media blob store.

pub mod session;
pub mod storage;
