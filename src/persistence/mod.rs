//! Persistence of the center blob.
//!
//! The whole [`CenterStore`](crate::store::CenterStore) is saved as one JSON
//! document. A remote [`DocumentStore`] holds the primary copy and a
//! [`LocalCache`] holds a fallback copy; both see the identical shape.

mod bootstrap;
mod document_store;
mod export;
mod local_cache;

pub use bootstrap::{BlobKeys, Bootstrapped, LoadSource, bootstrap};
pub use document_store::{DirectoryDocumentStore, DocumentStore, InMemoryDocumentStore};
pub use export::{export_file_name, export_snapshot};
pub use local_cache::{JsonFileCache, LocalCache, MemoryCache};
#[cfg(test)]
pub(crate) use local_cache::testing;
