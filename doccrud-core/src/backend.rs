//! Storage backend abstraction for the document store.
//!
//! This module defines the capability surface a document database client has to
//! offer so that [`CollectionAccessor`](crate::accessor::CollectionAccessor) can
//! be built on top of it. Every operation is addressed by collection path and,
//! where relevant, by document identifier.
//!
//! # Traits
//!
//! - [`StoreBackend`]: The core trait for storage backends
//! - [`DynStoreBackend`]: A trait for dynamic dispatch over backend implementations
//! - [`StoreBackendBuilder`]: Factory trait for creating backend instances
//!
//! # Examples
//!
//! ```ignore
//! use doccrud::backend::StoreBackend;
//! use bson::doc;
//!
//! let backend = MyBackendImpl::new();
//!
//! let id = backend.add_document("users", doc! { "name": "Alice" }).await?;
//! let snapshot = backend.get_document("users", &id).await?;
//! assert!(snapshot.exists());
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

use async_trait::async_trait;
use futures::stream::BoxStream;
use std::fmt::Debug;

use crate::{
    document::{DocumentSnapshot, Fields},
    error::DocumentStoreResult,
};

/// A live view over a collection.
///
/// The first item is the current content of the collection; every later item is
/// the full content again after a change. Dropping the stream unsubscribes.
pub type DocumentStream = BoxStream<'static, DocumentStoreResult<Vec<DocumentSnapshot>>>;

/// Abstract interface for document storage backends.
///
/// # Thread Safety
///
/// All implementations must be thread-safe and support concurrent access from multiple
/// async tasks.
///
/// # Error Handling
///
/// Operations return [`DocumentStoreResult<T>`](crate::error::DocumentStoreResult).
/// A missing document is not an error for [`get_document`](Self::get_document) or
/// [`delete_document`](Self::delete_document).
#[async_trait]
pub trait StoreBackend: Send + Sync + Debug {
    /// Opens a live view of every document in a collection.
    ///
    /// Snapshots are delivered in the backend's natural order. The returned stream
    /// must yield the current content as its first item without waiting for a change.
    ///
    /// # Arguments
    ///
    /// * `collection` - The collection path
    async fn value_changes(&self, collection: &str) -> DocumentStoreResult<DocumentStream>;

    /// Fetches the current snapshot of a single document.
    ///
    /// # Arguments
    ///
    /// * `collection` - The collection path
    /// * `id` - The document identifier
    ///
    /// # Returns
    ///
    /// A snapshot whose [`exists`](DocumentSnapshot::exists) reports whether a document
    /// was found.
    async fn get_document(&self, collection: &str, id: &str) -> DocumentStoreResult<DocumentSnapshot>;

    /// Writes a document at an explicit identifier, replacing whatever was stored there.
    ///
    /// # Arguments
    ///
    /// * `collection` - The collection path
    /// * `id` - The document identifier
    /// * `fields` - The complete new content of the document
    async fn set_document(&self, collection: &str, id: &str, fields: Fields) -> DocumentStoreResult<()>;

    /// Adds a document under an identifier generated by the backend.
    ///
    /// # Returns
    ///
    /// The generated identifier.
    async fn add_document(&self, collection: &str, fields: Fields) -> DocumentStoreResult<String>;

    /// Merges top-level fields into an existing document.
    ///
    /// Fields not named in `fields` are left untouched.
    ///
    /// # Errors
    ///
    /// Returns [`DocumentNotFound`](crate::error::DocumentStoreError::DocumentNotFound)
    /// when no document exists at `id`.
    async fn update_document(&self, collection: &str, id: &str, fields: Fields) -> DocumentStoreResult<()>;

    /// Deletes a document. Deleting a missing document succeeds.
    async fn delete_document(&self, collection: &str, id: &str) -> DocumentStoreResult<()>;

    /// Cleanly shuts down the backend, releasing all resources.
    ///
    /// The default implementation is a no-op, but backends with external connections
    /// should override this.
    async fn shutdown(self) -> DocumentStoreResult<()>
    where
        Self: Sized,
    {
        Ok(())
    }
}

/// Object-safe mirror of [`StoreBackend`], implemented for every backend.
#[async_trait]
pub trait DynStoreBackend: Send + Sync + Debug {
    async fn value_changes(&self, collection: &str) -> DocumentStoreResult<DocumentStream>;
    async fn get_document(&self, collection: &str, id: &str) -> DocumentStoreResult<DocumentSnapshot>;
    async fn set_document(&self, collection: &str, id: &str, fields: Fields) -> DocumentStoreResult<()>;
    async fn add_document(&self, collection: &str, fields: Fields) -> DocumentStoreResult<String>;
    async fn update_document(&self, collection: &str, id: &str, fields: Fields) -> DocumentStoreResult<()>;
    async fn delete_document(&self, collection: &str, id: &str) -> DocumentStoreResult<()>;
    async fn shutdown_boxed(self: Box<Self>) -> DocumentStoreResult<()>;
}

#[async_trait]
impl<B: StoreBackend + 'static> DynStoreBackend for B {
    async fn value_changes(&self, collection: &str) -> DocumentStoreResult<DocumentStream> {
        StoreBackend::value_changes(self, collection).await
    }

    async fn get_document(&self, collection: &str, id: &str) -> DocumentStoreResult<DocumentSnapshot> {
        StoreBackend::get_document(self, collection, id).await
    }

    async fn set_document(&self, collection: &str, id: &str, fields: Fields) -> DocumentStoreResult<()> {
        StoreBackend::set_document(self, collection, id, fields).await
    }

    async fn add_document(&self, collection: &str, fields: Fields) -> DocumentStoreResult<String> {
        StoreBackend::add_document(self, collection, fields).await
    }

    async fn update_document(&self, collection: &str, id: &str, fields: Fields) -> DocumentStoreResult<()> {
        StoreBackend::update_document(self, collection, id, fields).await
    }

    async fn delete_document(&self, collection: &str, id: &str) -> DocumentStoreResult<()> {
        StoreBackend::delete_document(self, collection, id).await
    }

    async fn shutdown_boxed(self: Box<Self>) -> DocumentStoreResult<()> {
        StoreBackend::shutdown(*self).await
    }
}

#[async_trait]
impl StoreBackend for Box<dyn DynStoreBackend> {
    async fn value_changes(&self, collection: &str) -> DocumentStoreResult<DocumentStream> {
        DynStoreBackend::value_changes(&**self, collection).await
    }

    async fn get_document(&self, collection: &str, id: &str) -> DocumentStoreResult<DocumentSnapshot> {
        DynStoreBackend::get_document(&**self, collection, id).await
    }

    async fn set_document(&self, collection: &str, id: &str, fields: Fields) -> DocumentStoreResult<()> {
        DynStoreBackend::set_document(&**self, collection, id, fields).await
    }

    async fn add_document(&self, collection: &str, fields: Fields) -> DocumentStoreResult<String> {
        DynStoreBackend::add_document(&**self, collection, fields).await
    }

    async fn update_document(&self, collection: &str, id: &str, fields: Fields) -> DocumentStoreResult<()> {
        DynStoreBackend::update_document(&**self, collection, id, fields).await
    }

    async fn delete_document(&self, collection: &str, id: &str) -> DocumentStoreResult<()> {
        DynStoreBackend::delete_document(&**self, collection, id).await
    }

    async fn shutdown(self) -> DocumentStoreResult<()> {
        DynStoreBackend::shutdown_boxed(self).await
    }
}

#[async_trait]
pub trait StoreBackendBuilder {
    type Backend: StoreBackend;

    async fn build(self) -> DocumentStoreResult<Self::Backend>;
}
