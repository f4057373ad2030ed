//! In-memory storage implementation for document stores.
//!
//! Documents live in per-collection ordered maps guarded by async-aware
//! read-write locks. Live collection views are fed through unbounded channels.

use async_trait::async_trait;
use futures::{
    StreamExt,
    channel::mpsc::{UnboundedSender, unbounded},
};
use mea::rwlock::RwLock;
use std::{
    collections::{BTreeMap, HashMap},
    sync::Arc,
};

use doccrud_core::{
    backend::{DocumentStream, StoreBackend, StoreBackendBuilder},
    document::{DocumentSnapshot, Fields},
    error::{DocumentStoreError, DocumentStoreResult},
};

type CollectionMap = BTreeMap<String, Fields>;
type StoreMap = HashMap<String, CollectionMap>;
type Snapshots = Vec<DocumentSnapshot>;
type WatcherMap = HashMap<String, Vec<UnboundedSender<DocumentStoreResult<Snapshots>>>>;

/// Thread-safe in-memory document storage backend.
///
/// `InMemoryStore` is cloneable and uses `Arc`-wrapped internal state; clones
/// share the same data. Documents of a collection are kept ordered by
/// identifier, which is also the order live views deliver them in.
///
/// Updating a missing document fails with
/// [`DocumentNotFound`](DocumentStoreError::DocumentNotFound); deleting one succeeds.
///
/// # Example
///
/// ```ignore
/// use doccrud_memory::InMemoryStore;
/// use doccrud::backend::StoreBackend;
/// use bson::doc;
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let store = InMemoryStore::new();
///
///     let id = store.add_document("users", doc! { "name": "Alice" }).await?;
///     let snapshot = store.get_document("users", &id).await?;
///     assert!(snapshot.exists());
///
///     Ok(())
/// }
/// ```
#[derive(Default, Clone, Debug)]
pub struct InMemoryStore {
    /// collection path -> (document id -> fields)
    store: Arc<RwLock<StoreMap>>,
    /// collection path -> open live views
    watchers: Arc<RwLock<WatcherMap>>,
}

impl InMemoryStore {
    /// Creates a new empty in-memory document store.
    pub fn new() -> Self {
        Self {
            store: Arc::new(RwLock::new(StoreMap::new())),
            watchers: Arc::new(RwLock::new(WatcherMap::new())),
        }
    }

    /// Creates a builder for constructing an `InMemoryStore`.
    pub fn builder() -> InMemoryStoreBuilder {
        InMemoryStoreBuilder::default()
    }

    /// Number of live views currently open on `collection`.
    pub async fn open_views(&self, collection: &str) -> usize {
        self.watchers
            .read()
            .await
            .get(collection)
            .map(|senders| senders.iter().filter(|sender| !sender.is_closed()).count())
            .unwrap_or(0)
    }

    fn snapshots(collection_map: Option<&CollectionMap>) -> Snapshots {
        collection_map
            .map(|documents| {
                documents
                    .iter()
                    .map(|(id, fields)| DocumentSnapshot::found(id.clone(), fields.clone()))
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Applies `mutate` to the store and pushes the new content of `collection`
    /// to its views.
    ///
    /// Views are notified while the store lock is still held so that every view
    /// observes writes in the order they were applied.
    async fn write<R: Send>(
        &self,
        collection: &str,
        mutate: impl FnOnce(&mut StoreMap) -> DocumentStoreResult<R> + Send,
    ) -> DocumentStoreResult<R> {
        let mut store = self.store.write().await;
        let result = mutate(&mut store)?;

        let mut watchers = self.watchers.write().await;
        if let Some(senders) = watchers.get_mut(collection) {
            let content = Self::snapshots(store.get(collection));
            senders.retain(|sender| sender.unbounded_send(Ok(content.clone())).is_ok());
        }

        Ok(result)
    }

    fn generate_id() -> String {
        uuid::Uuid::new_v4().simple().to_string()
    }
}

#[async_trait]
impl StoreBackend for InMemoryStore {
    async fn value_changes(&self, collection: &str) -> DocumentStoreResult<DocumentStream> {
        let store = self.store.read().await;
        let (sender, receiver) = unbounded();

        sender
            .unbounded_send(Ok(Self::snapshots(store.get(collection))))
            .map_err(|e| DocumentStoreError::Backend(e.to_string()))?;

        let mut watchers = self.watchers.write().await;
        let senders = watchers.entry(collection.to_string()).or_default();
        // One-shot readers drop their view right away; clear those out here too
        senders.retain(|open| !open.is_closed());
        senders.push(sender);

        tracing::trace!(collection, "opened live view");

        Ok(receiver.boxed())
    }

    async fn get_document(&self, collection: &str, id: &str) -> DocumentStoreResult<DocumentSnapshot> {
        let store = self.store.read().await;

        Ok(
            match store
                .get(collection)
                .and_then(|documents| documents.get(id))
            {
                Some(fields) => DocumentSnapshot::found(id, fields.clone()),
                None => DocumentSnapshot::missing(id),
            }
        )
    }

    async fn set_document(&self, collection: &str, id: &str, fields: Fields) -> DocumentStoreResult<()> {
        self.write(collection, |store| {
            store
                .entry(collection.to_string())
                .or_default()
                .insert(id.to_string(), fields);
            Ok(())
        })
        .await
    }

    async fn add_document(&self, collection: &str, fields: Fields) -> DocumentStoreResult<String> {
        self.write(collection, |store| {
            let id = Self::generate_id();
            store
                .entry(collection.to_string())
                .or_default()
                .insert(id.clone(), fields);
            Ok(id)
        })
        .await
    }

    async fn update_document(&self, collection: &str, id: &str, fields: Fields) -> DocumentStoreResult<()> {
        self.write(collection, |store| {
            let existing = store
                .get_mut(collection)
                .and_then(|documents| documents.get_mut(id))
                .ok_or_else(|| {
                    DocumentStoreError::DocumentNotFound(id.to_string(), collection.to_string())
                })?;

            // Top-level merge: named fields are replaced, the rest are kept
            for (key, value) in fields {
                existing.insert(key, value);
            }

            Ok(())
        })
        .await
    }

    async fn delete_document(&self, collection: &str, id: &str) -> DocumentStoreResult<()> {
        self.write(collection, |store| {
            if let Some(documents) = store.get_mut(collection) {
                documents.remove(id);
            }
            Ok(())
        })
        .await
    }
}

/// Builder for constructing [`InMemoryStore`] instances.
///
/// # Example
///
/// ```ignore
/// use doccrud_memory::InMemoryStore;
/// use doccrud::backend::StoreBackendBuilder;
///
/// let store = InMemoryStore::builder().build().await.unwrap();
/// ```
#[derive(Default)]
pub struct InMemoryStoreBuilder;

#[async_trait]
impl StoreBackendBuilder for InMemoryStoreBuilder {
    type Backend = InMemoryStore;

    async fn build(self) -> DocumentStoreResult<Self::Backend> {
        Ok(InMemoryStore::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bson::doc;
    use doccrud_core::store::DocumentStore;
    use std::time::Duration;

    #[tokio::test]
    async fn set_replaces_whole_document() {
        let store = InMemoryStore::new();
        store
            .set_document("users", "u1", doc! { "name": "Ana", "age": 30 })
            .await
            .unwrap();
        store
            .set_document("users", "u1", doc! { "name": "Bia" })
            .await
            .unwrap();

        let snapshot = store.get_document("users", "u1").await.unwrap();

        assert_eq!(snapshot.data(), Some(&doc! { "name": "Bia" }));
    }

    #[tokio::test]
    async fn update_merges_top_level_fields() {
        let store = InMemoryStore::new();
        store
            .set_document("users", "u1", doc! { "name": "Ana", "age": 30 })
            .await
            .unwrap();

        store
            .update_document("users", "u1", doc! { "age": 31 })
            .await
            .unwrap();

        let snapshot = store.get_document("users", "u1").await.unwrap();
        assert_eq!(snapshot.data(), Some(&doc! { "name": "Ana", "age": 31 }));
    }

    #[tokio::test]
    async fn update_of_missing_document_fails() {
        let store = InMemoryStore::new();

        let result = store.update_document("users", "ghost", doc! { "a": 1 }).await;

        assert!(matches!(
            result,
            Err(DocumentStoreError::DocumentNotFound(id, collection)) if id == "ghost" && collection == "users"
        ));
    }

    #[tokio::test]
    async fn delete_of_missing_document_succeeds() {
        let store = InMemoryStore::new();

        store.delete_document("users", "ghost").await.unwrap();
        store.delete_document("users", "ghost").await.unwrap();
    }

    #[tokio::test]
    async fn add_generates_distinct_ids() {
        let store = InMemoryStore::new();

        let first = store.add_document("users", doc! {}).await.unwrap();
        let second = store.add_document("users", doc! {}).await.unwrap();

        assert_ne!(first, second);
        assert_eq!(first.len(), 32);
        assert!(store.get_document("users", &first).await.unwrap().exists());
    }

    #[tokio::test]
    async fn collections_are_isolated() {
        let store = InMemoryStore::new();
        store.set_document("users", "x", doc! { "a": 1 }).await.unwrap();

        assert!(!store.get_document("orders", "x").await.unwrap().exists());
    }

    #[tokio::test]
    async fn live_view_emits_current_content_then_changes() {
        let store = InMemoryStore::new();
        store.set_document("users", "b", doc! { "n": 2 }).await.unwrap();
        store.set_document("users", "a", doc! { "n": 1 }).await.unwrap();

        let mut view = store.value_changes("users").await.unwrap();

        let first = view.next().await.unwrap().unwrap();
        let ids: Vec<_> = first.iter().map(|s| s.id().to_string()).collect();
        assert_eq!(ids, vec!["a", "b"]);

        store.delete_document("users", "a").await.unwrap();

        let second = tokio::time::timeout(Duration::from_secs(1), view.next())
            .await
            .unwrap()
            .unwrap()
            .unwrap();
        assert_eq!(second, vec![DocumentSnapshot::found("b", doc! { "n": 2 })]);
    }

    #[tokio::test]
    async fn dropped_views_are_pruned_on_next_write() {
        let store = InMemoryStore::new();
        let view = store.value_changes("users").await.unwrap();
        assert_eq!(store.open_views("users").await, 1);

        drop(view);
        store.set_document("users", "a", doc! {}).await.unwrap();

        assert_eq!(store.open_views("users").await, 0);
        assert!(store.watchers.read().await["users"].is_empty());
    }

    #[tokio::test]
    async fn repeated_listings_do_not_accumulate_views() {
        let store = InMemoryStore::new();
        store.set_document("users", "a", doc! { "n": 1 }).await.unwrap();
        let users = DocumentStore::new(store.clone()).accessor::<Fields>("users");

        for _ in 0..100 {
            assert_eq!(users.list_all().await.unwrap().len(), 1);
        }

        // Only the sender of the latest listing is still tracked
        assert_eq!(store.watchers.read().await["users"].len(), 1);

        store.set_document("users", "b", doc! { "n": 2 }).await.unwrap();
        assert!(store.watchers.read().await["users"].is_empty());
    }

    #[tokio::test]
    async fn failed_update_and_delete_leave_no_collection_behind() {
        let store = InMemoryStore::new();

        assert!(store.update_document("ghosts", "x", doc! { "a": 1 }).await.is_err());
        store.delete_document("ghosts", "x").await.unwrap();

        assert!(!store.store.read().await.contains_key("ghosts"));
    }

    #[tokio::test]
    async fn clones_share_data() {
        let store = InMemoryStore::builder().build().await.unwrap();
        let clone = store.clone();

        clone.set_document("users", "a", doc! { "n": 1 }).await.unwrap();

        assert!(store.get_document("users", "a").await.unwrap().exists());
    }
}
