//! Main document store interface for interacting with document backends.
//!
//! [`DocumentStore`] is the client handle application wiring code creates once
//! and hands to every accessor. It is cheap to clone; all clones share the same
//! backend.
//!
//! - [`DocumentStore`] - Store bound to a specific backend implementation
//! - [`DynDocumentStore`] - Store over a backend selected at runtime
//!
//! # Example
//!
//! ```ignore
//! use doccrud::store::DocumentStore;
//!
//! let store = DocumentStore::new(backend);
//! let users = store.accessor::<User>("users");
//! ```

use std::sync::Arc;

use crate::{
    accessor::CollectionAccessor,
    backend::{DynStoreBackend, StoreBackend},
    collection::CollectionRef,
    document::Document,
    error::{DocumentStoreError, DocumentStoreResult},
};

/// A document store bound to a specific backend implementation.
///
/// # Type Parameters
///
/// * `B` - The backend implementation type
#[derive(Debug)]
pub struct DocumentStore<B: StoreBackend> {
    backend: Arc<B>,
}

/// A document store whose backend is chosen at runtime.
pub type DynDocumentStore = DocumentStore<Box<dyn DynStoreBackend>>;

impl<B: StoreBackend> DocumentStore<B> {
    /// Creates a new document store with the given backend.
    pub fn new(backend: B) -> Self {
        Self { backend: Arc::new(backend) }
    }

    /// Returns the underlying backend.
    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Resolves a handle to the collection at `path`.
    ///
    /// This is a local operation; nothing is sent to the backend.
    pub fn collection(&self, path: &str) -> CollectionRef<B> {
        CollectionRef::new(path.to_string(), Arc::clone(&self.backend))
    }

    /// Creates an accessor for documents of type `T` stored at `path`.
    pub fn accessor<T: Document>(&self, path: &str) -> CollectionAccessor<T, B> {
        CollectionAccessor::new(path, self)
    }

    /// Shuts down the backend.
    ///
    /// # Errors
    ///
    /// Returns [`DocumentStoreError::Shutdown`] while other clones of this store,
    /// accessors or collection handles still hold the backend.
    pub async fn shutdown(self) -> DocumentStoreResult<()> {
        match Arc::try_unwrap(self.backend) {
            Ok(backend) => backend.shutdown().await,
            Err(backend) => Err(DocumentStoreError::Shutdown(format!(
                "backend still referenced by {} other handle(s)",
                Arc::strong_count(&backend) - 1
            ))),
        }
    }
}

impl DynDocumentStore {
    /// Creates a store over a type-erased backend.
    pub fn new_dyn<B: StoreBackend + 'static>(backend: B) -> Self {
        DocumentStore::new(Box::new(backend) as Box<dyn DynStoreBackend>)
    }
}

impl<B: StoreBackend> Clone for DocumentStore<B> {
    fn clone(&self) -> Self {
        Self { backend: Arc::clone(&self.backend) }
    }
}
