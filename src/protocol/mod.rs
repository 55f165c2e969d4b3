//! Singer protocol types
//!
//! Messages written to stdout during a sync and the catalog produced by
//! discovery.

mod catalog;
mod message;

pub use catalog::{Catalog, CatalogEntry, MetadataEntry};
pub use message::Message;
