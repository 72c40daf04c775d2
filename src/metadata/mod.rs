//! Static airport and checkpoint metadata
//!
//! This module defines the metadata store seam and its in-memory
//! implementation, loaded from a JSON airport list.

pub mod store;

// Re-export commonly used types
pub use store::{InMemoryMetadataStore, MetadataStore};
