use async_trait::async_trait;
use bson::{Bson, Document, doc};
use futures::{StreamExt, TryStreamExt, stream};
use mongodb::{Client, Collection as MongoCollection, options::ClientOptions};

use doccrud_core::{
    backend::{DocumentStream, StoreBackend, StoreBackendBuilder},
    document::{DocumentSnapshot, Fields},
    error::{DocumentStoreError, DocumentStoreResult},
};

use crate::sanitizer::FieldNames;

fn backend_error(err: mongodb::error::Error) -> DocumentStoreError {
    DocumentStoreError::Backend(err.to_string())
}

#[derive(Debug, Clone)]
pub struct MongoDbStore {
    client: Client,
    database: String,
}

impl MongoDbStore {
    pub fn new(client: Client, database: String) -> Self {
        Self { client, database }
    }

    pub fn builder(dsn: &str, database: &str) -> MongoDbStoreBuilder {
        MongoDbStoreBuilder::new(dsn, database)
    }

    fn get_collection(&self, collection: &str) -> MongoCollection<Document> {
        self.client
            .database(&self.database)
            .collection(&FieldNames::escape(collection))
    }

    fn prepare_document(id: &str, fields: Fields) -> Document {
        let mut document = doc! { "_id": id };
        for (key, value) in FieldNames::escape_fields(fields) {
            // The identifier lives in `_id`; an `id` field is kept as ordinary data
            if key != "_id" {
                document.insert(key, value);
            }
        }
        document
    }

    fn restore_document(mut document: Document) -> DocumentStoreResult<DocumentSnapshot> {
        let id = match document.remove("_id") {
            Some(Bson::String(id)) => id,
            Some(other) => other.to_string(),
            None => {
                return Err(DocumentStoreError::InvalidDocument(
                    "stored document has no _id".into(),
                ));
            }
        };

        Ok(DocumentSnapshot::found(id, FieldNames::restore_fields(document)))
    }

    async fn read_all(collection: MongoCollection<Document>) -> DocumentStoreResult<Vec<DocumentSnapshot>> {
        collection
            .find(doc! {})
            .sort(doc! { "_id": 1 })
            .await
            .map_err(backend_error)?
            .try_collect::<Vec<Document>>()
            .await
            .map_err(backend_error)?
            .into_iter()
            .map(Self::restore_document)
            .collect()
    }

    async fn shutdown(self) -> DocumentStoreResult<()> {
        self.client.shutdown().await;

        Ok(())
    }
}

#[async_trait]
impl StoreBackend for MongoDbStore {
    /// The first emission is a plain read. The change stream behind later
    /// emissions is only opened once a second item is polled, so one-shot
    /// consumers work against standalone servers too.
    async fn value_changes(&self, collection: &str) -> DocumentStoreResult<DocumentStream> {
        let handle = self.get_collection(collection);
        let initial = Self::read_all(handle.clone()).await?;

        let changes = stream::once(async move {
            let events = handle.watch().await.map_err(backend_error)?;
            let rereads = events
                .map_err(backend_error)
                .and_then(move |_event| Self::read_all(handle.clone()));

            Ok::<_, DocumentStoreError>(rereads)
        })
        .try_flatten();

        Ok(stream::once(async move { Ok(initial) })
            .chain(changes)
            .boxed())
    }

    async fn get_document(&self, collection: &str, id: &str) -> DocumentStoreResult<DocumentSnapshot> {
        match self
            .get_collection(collection)
            .find_one(doc! { "_id": id })
            .await
            .map_err(backend_error)?
        {
            Some(document) => Self::restore_document(document),
            None => Ok(DocumentSnapshot::missing(id)),
        }
    }

    async fn set_document(&self, collection: &str, id: &str, fields: Fields) -> DocumentStoreResult<()> {
        self.get_collection(collection)
            .replace_one(doc! { "_id": id }, Self::prepare_document(id, fields))
            .upsert(true)
            .await
            .map_err(backend_error)?;

        Ok(())
    }

    async fn add_document(&self, collection: &str, fields: Fields) -> DocumentStoreResult<String> {
        let id = uuid::Uuid::new_v4().simple().to_string();

        self.get_collection(collection)
            .insert_one(Self::prepare_document(&id, fields))
            .await
            .map_err(backend_error)?;

        Ok(id)
    }

    async fn update_document(&self, collection: &str, id: &str, fields: Fields) -> DocumentStoreResult<()> {
        let mut changes = FieldNames::escape_fields(fields);
        changes.remove("_id");

        let result = self
            .get_collection(collection)
            .update_one(doc! { "_id": id }, doc! { "$set": changes })
            .await
            .map_err(backend_error)?;

        if result.matched_count == 0 {
            return Err(DocumentStoreError::DocumentNotFound(id.to_string(), collection.to_string()));
        }

        Ok(())
    }

    async fn delete_document(&self, collection: &str, id: &str) -> DocumentStoreResult<()> {
        self.get_collection(collection)
            .delete_one(doc! { "_id": id })
            .await
            .map_err(backend_error)?;

        Ok(())
    }

    async fn shutdown(self) -> DocumentStoreResult<()> {
        self.shutdown().await
    }
}

pub struct MongoDbStoreBuilder {
    dsn: String,
    database: String,
}

impl MongoDbStoreBuilder {
    pub fn new(dsn: &str, database: &str) -> Self {
        Self {
            dsn: dsn.to_string(),
            database: database.to_string(),
        }
    }
}

#[async_trait]
impl StoreBackendBuilder for MongoDbStoreBuilder {
    type Backend = MongoDbStore;

    async fn build(self) -> DocumentStoreResult<Self::Backend> {
        let options = ClientOptions::parse(&self.dsn)
            .await
            .map_err(|e| DocumentStoreError::Initialization(e.to_string()))?;
        let client = Client::with_options(options)
            .map_err(|e| DocumentStoreError::Initialization(e.to_string()))?;

        tracing::info!(database = %self.database, "connected to MongoDB");

        Ok(MongoDbStore::new(client, self.database))
    }
}
