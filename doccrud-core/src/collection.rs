//! Collection and document handles.
//!
//! A [`CollectionRef`] is a locally resolved reference to one collection of a
//! backend; creating one performs no I/O. A [`DocumentRef`] narrows it further
//! to a single identifier. Both are thin: every method forwards to the backend
//! with the handle's path filled in.
//!
//! # Example
//!
//! ```ignore
//! use bson::doc;
//!
//! # async fn example(store: &doccrud::store::DocumentStore<impl doccrud::backend::StoreBackend>) -> doccrud::error::DocumentStoreResult<()> {
//! let users = store.collection("users");
//! let id = users.add(doc! { "name": "Alice" }).await?;
//! let snapshot = users.doc(&id).get().await?;
//! assert!(snapshot.exists());
//! # Ok(()) }
//! ```

use std::sync::Arc;

use crate::{
    backend::{DocumentStream, StoreBackend},
    document::{DocumentSnapshot, Fields},
    error::DocumentStoreResult,
};

/// A reference to a collection with shared access to its backend.
///
/// # Type Parameters
///
/// * `B` - The storage backend type
#[derive(Debug)]
pub struct CollectionRef<B: StoreBackend> {
    path: String,
    backend: Arc<B>,
}

impl<B: StoreBackend> CollectionRef<B> {
    /// Creates a new collection reference (internal use).
    pub(crate) fn new(path: String, backend: Arc<B>) -> Self {
        Self { path, backend }
    }

    /// Returns the path of this collection.
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Returns a reference to the document at `id` within this collection.
    pub fn doc(&self, id: impl Into<String>) -> DocumentRef<'_, B> {
        DocumentRef { collection: self, id: id.into() }
    }

    /// Opens a live view of every document in the collection.
    ///
    /// # Errors
    ///
    /// Returns a [`DocumentStoreError`](crate::error::DocumentStoreError) if the view cannot be opened.
    pub async fn value_changes(&self) -> DocumentStoreResult<DocumentStream> {
        self.backend.value_changes(&self.path).await
    }

    /// Adds a document under a backend-generated identifier and returns it.
    ///
    /// # Errors
    ///
    /// Returns a [`DocumentStoreError`](crate::error::DocumentStoreError) if the write fails.
    pub async fn add(&self, fields: Fields) -> DocumentStoreResult<String> {
        self.backend.add_document(&self.path, fields).await
    }
}

impl<B: StoreBackend> Clone for CollectionRef<B> {
    fn clone(&self) -> Self {
        Self {
            path: self.path.clone(),
            backend: Arc::clone(&self.backend),
        }
    }
}

/// A reference to a single document of a collection.
#[derive(Debug)]
pub struct DocumentRef<'a, B: StoreBackend> {
    collection: &'a CollectionRef<B>,
    id: String,
}

impl<'a, B: StoreBackend> DocumentRef<'a, B> {
    /// Returns the document identifier.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Returns the full path of the document, `<collection>/<id>`.
    pub fn path(&self) -> String {
        format!("{}/{}", self.collection.path, self.id)
    }

    /// Fetches the current snapshot of the document.
    pub async fn get(&self) -> DocumentStoreResult<DocumentSnapshot> {
        self.collection
            .backend
            .get_document(&self.collection.path, &self.id)
            .await
    }

    /// Replaces the document with `fields`, creating it if needed.
    pub async fn set(&self, fields: Fields) -> DocumentStoreResult<()> {
        self.collection
            .backend
            .set_document(&self.collection.path, &self.id, fields)
            .await
    }

    /// Merges `fields` into the existing document.
    pub async fn update(&self, fields: Fields) -> DocumentStoreResult<()> {
        self.collection
            .backend
            .update_document(&self.collection.path, &self.id, fields)
            .await
    }

    /// Deletes the document.
    pub async fn delete(&self) -> DocumentStoreResult<()> {
        self.collection
            .backend
            .delete_document(&self.collection.path, &self.id)
            .await
    }
}
