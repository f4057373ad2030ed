//! Typed CRUD accessors over a single document collection.
//!
//! This crate is the primary entry point for users of doccrud. It re-exports the
//! core types from `doccrud-core`, the backends, and a serde-driven
//! [`config::StoreConfig`] for choosing a backend at runtime.
//!
//! # Features
//!
//! - **One accessor per collection** - [`CollectionAccessor`](accessor::CollectionAccessor)
//!   binds a document type to a collection path and offers `list_all`, `get_by_id`,
//!   `create`, `update` and `delete`
//! - **Serde documents** - Any cloneable serde type is a document; an optional `id`
//!   field receives the document identifier
//! - **Multiple backends** - In-memory and MongoDB, behind one [`backend::StoreBackend`] trait
//!
//! # Quick Start
//!
//! ```ignore
//! use doccrud::{prelude::*, memory::InMemoryStore};
//! use serde::{Serialize, Deserialize};
//!
//! #[derive(Debug, Clone, Serialize, Deserialize)]
//! pub struct User {
//!     #[serde(default, skip_serializing_if = "Option::is_none")]
//!     pub id: Option<String>,
//!     #[serde(default)]
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
//!
//! #[tokio::main]
//! async fn main() {
//!     let store = DocumentStore::new(InMemoryStore::builder().build().await.unwrap());
//!     let users = UserService::new(&store);
//!
//!     // Generated identifier
//!     let ana = users.0.create(&User { id: None, name: "Ana".into() }, None).await.unwrap();
//!     let id = ana.id.clone().unwrap();
//!
//!     // Partial update, reported as a message
//!     let message = users.0.update(&id, &bson::doc! { "name": "Ana Maria" }).await;
//!     assert_eq!(message, "Registro alterado com sucesso!");
//!
//!     // One-shot listing
//!     println!("{:?}", users.0.list_all().await.unwrap());
//!
//!     assert_eq!(users.0.delete(&id).await, "Registro excluído com sucesso!");
//! }
//! ```
//!
//! # Dynamic Dispatch
//!
//! A backend chosen at runtime is wrapped in a [`store::DynDocumentStore`]; accessors
//! work the same way on it.
//!
//! ```ignore
//! use doccrud::prelude::*;
//!
//! let store = StoreConfig::from_json_str(r#"{ "backend": "memory" }"#)?.connect().await?;
//! let users = store.accessor::<User>("users");
//! ```
//!
//! # Backends
//!
//! - [`memory`] - In-memory storage for development and testing
//! - `mongodb` - Persistent MongoDB backend (requires `mongodb` feature)

pub mod config;
pub mod prelude;

pub use doccrud_core::{accessor, backend, collection, document, error, store};

// Re-export BSON types for convenience
pub use bson;

/// In-memory storage backend implementations.
pub mod memory {
    pub use doccrud_memory::{InMemoryStore, InMemoryStoreBuilder};
}

/// MongoDB storage backend implementations.
///
/// This module is only available when the `mongodb` feature is enabled.
#[cfg(feature = "mongodb")]
pub mod mongodb {
    pub use doccrud_mongodb::{MongoDbStore, MongoDbStoreBuilder};
}
