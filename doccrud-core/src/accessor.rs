//! Typed CRUD access to a single collection.
//!
//! [`CollectionAccessor`] binds one document type to one collection path and
//! exposes the five operations applications use: [`list_all`](CollectionAccessor::list_all),
//! [`get_by_id`](CollectionAccessor::get_by_id), [`create`](CollectionAccessor::create),
//! [`update`](CollectionAccessor::update) and [`delete`](CollectionAccessor::delete).
//!
//! Every operation is an `async fn`; building the future does nothing until it
//! is awaited.
//!
//! Reads and `create` report failures through [`DocumentStoreResult`]. `update`
//! and `delete` always resolve to a message string instead, see [`messages`].
//!
//! # Example
//!
//! ```ignore
//! use doccrud::prelude::*;
//! use serde::{Serialize, Deserialize};
//!
//! #[derive(Debug, Clone, Serialize, Deserialize)]
//! pub struct User {
//!     #[serde(default, skip_serializing_if = "Option::is_none")]
//!     pub id: Option<String>,
//!     pub name: String,
//! }
//!
//! pub struct UserService(CollectionAccessor<User, InMemoryStore>);
//!
//! impl UserService {
//!     pub fn new(store: &DocumentStore<InMemoryStore>) -> Self {
//!         Self(CollectionAccessor::new("users", store))
//!     }
//! }
//! ```

use futures::StreamExt;
use serde::Serialize;
use std::{fmt, marker::PhantomData};

use crate::{
    backend::StoreBackend,
    collection::CollectionRef,
    document::{Document, DocumentExt, Fields, ID_FIELD, fields_of},
    error::{DocumentStoreError, DocumentStoreResult},
    store::DocumentStore,
};

/// Outcome messages returned by [`CollectionAccessor::update`] and [`CollectionAccessor::delete`].
pub mod messages {
    /// Returned by `update` on success.
    pub const UPDATE_SUCCESS: &str = "Registro alterado com sucesso!";
    /// Prefix of the message returned by `update` on failure.
    pub const UPDATE_FAILURE_PREFIX: &str = "Erro ao alterar registro: ";
    /// Returned by `delete` on success.
    pub const DELETE_SUCCESS: &str = "Registro excluído com sucesso!";
    /// Prefix of the message returned by `delete` on failure.
    pub const DELETE_FAILURE_PREFIX: &str = "Erro ao excluir registro: ";
}

/// CRUD operations for documents of type `T` in one collection.
///
/// The collection path and handle are fixed at construction. The accessor keeps
/// no per-operation state, so one instance can serve any number of concurrent
/// calls and is typically created once and kept for the life of the application.
///
/// # Type Parameters
///
/// * `T` - The document shape
/// * `B` - The storage backend type
pub struct CollectionAccessor<T: Document, B: StoreBackend> {
    path: String,
    collection: CollectionRef<B>,
    _marker: PhantomData<fn() -> T>,
}

impl<T: Document, B: StoreBackend> CollectionAccessor<T, B> {
    /// Binds a new accessor to the collection at `path`.
    ///
    /// Resolving the collection handle is local; no request reaches the backend.
    pub fn new(path: impl Into<String>, store: &DocumentStore<B>) -> Self {
        let path = path.into();
        let collection = store.collection(&path);

        Self { path, collection, _marker: PhantomData }
    }

    /// Returns the collection path this accessor is bound to.
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Lists every document of the collection, each with its `id` set.
    ///
    /// Only the first snapshot of the collection's live view is used; the view
    /// is dropped as soon as it arrives. Documents keep the backend's order.
    ///
    /// # Errors
    ///
    /// Backend and deserialization failures are returned unchanged.
    /// [`DocumentStoreError::ViewClosed`] is returned if the view ends without
    /// producing a snapshot.
    pub async fn list_all(&self) -> DocumentStoreResult<Vec<T>> {
        tracing::debug!(collection = %self.path, "listing documents");

        let snapshots = self
            .collection
            .value_changes()
            .await?
            .next()
            .await
            .ok_or_else(|| DocumentStoreError::ViewClosed(self.path.clone()))??;

        snapshots
            .into_iter()
            .map(|snapshot| T::from_fields(snapshot.into_fields()))
            .collect()
    }

    /// Fetches the document at `id`, with `id` set to the requested identifier.
    ///
    /// A missing document is not an error: the stored fields are simply empty, so
    /// the result holds nothing but `id`. Callers that care about existence must
    /// check for it themselves.
    ///
    /// # Errors
    ///
    /// Backend failures are returned unchanged, as is a deserialization failure
    /// when `T` cannot be built from the fetched fields.
    pub async fn get_by_id(&self, id: &str) -> DocumentStoreResult<T> {
        tracing::debug!(collection = %self.path, id, "fetching document");

        let snapshot = self.collection.doc(id).get().await?;

        T::from_fields(snapshot.into_fields())
    }

    /// Creates a document.
    ///
    /// With an `id`, the value is written at that identifier, replacing any
    /// existing document in full, and a copy of `value` is returned as is.
    /// Without one (or with an empty one) the backend generates the identifier and
    /// the returned document is `value` with `id` filled in; an `id` already set
    /// on `value` takes precedence.
    ///
    /// The result is assembled locally, not read back from the store.
    ///
    /// # Errors
    ///
    /// Serialization and backend failures are returned unchanged.
    pub async fn create(&self, value: &T, id: Option<&str>) -> DocumentStoreResult<T> {
        let fields = value.to_fields()?;

        match id.filter(|id| !id.is_empty()) {
            Some(id) => {
                tracing::debug!(collection = %self.path, id, "writing document");

                self.collection.doc(id).set(fields).await?;

                Ok(value.clone())
            }
            None => {
                tracing::debug!(collection = %self.path, "adding document");

                let generated = self.collection.add(fields.clone()).await?;
                let mut created = Fields::new();
                created.insert(ID_FIELD, generated);
                for (key, value) in fields {
                    created.insert(key, value);
                }

                T::from_fields(created)
            }
        }
    }

    /// Merges the fields of `value` into the document at `id`.
    ///
    /// Resolves to [`messages::UPDATE_SUCCESS`] or, on any failure, to
    /// [`messages::UPDATE_FAILURE_PREFIX`] followed by the error text. The failure
    /// is never reported as an `Err`.
    pub async fn update<P>(&self, id: &str, value: &P) -> String
    where
        P: Serialize + Sync + ?Sized,
    {
        tracing::debug!(collection = %self.path, id, "updating document");

        let result = match fields_of(value) {
            Ok(fields) => self.collection.doc(id).update(fields).await,
            Err(err) => Err(err),
        };

        recover(result, messages::UPDATE_SUCCESS, messages::UPDATE_FAILURE_PREFIX, &self.path, id)
    }

    /// Deletes the document at `id`.
    ///
    /// Resolves to [`messages::DELETE_SUCCESS`] or, on any failure, to
    /// [`messages::DELETE_FAILURE_PREFIX`] followed by the error text. The failure
    /// is never reported as an `Err`.
    pub async fn delete(&self, id: &str) -> String {
        tracing::debug!(collection = %self.path, id, "deleting document");

        let result = self.collection.doc(id).delete().await;

        recover(result, messages::DELETE_SUCCESS, messages::DELETE_FAILURE_PREFIX, &self.path, id)
    }
}

fn recover(
    result: DocumentStoreResult<()>,
    success: &str,
    failure_prefix: &str,
    collection: &str,
    id: &str,
) -> String {
    match result {
        Ok(()) => success.to_string(),
        Err(err) => {
            tracing::warn!(collection, id, error = %err, "write failed, reporting as message");
            format!("{failure_prefix}{err}")
        }
    }
}

impl<T: Document, B: StoreBackend> fmt::Debug for CollectionAccessor<T, B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CollectionAccessor")
            .field("path", &self.path)
            .field("document", &std::any::type_name::<T>())
            .finish_non_exhaustive()
    }
}
