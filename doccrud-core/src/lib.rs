//! Typed CRUD accessors over a single document collection.
//!
//! This crate is the core of the doccrud project and provides:
//!
//! - **Collection accessor** ([`accessor`]) - Generic list/get/create/update/delete over one collection
//! - **Document traits** ([`document`]) - Conversions between document types and stored field maps
//! - **Store backend abstraction** ([`backend`]) - The capabilities a document database client must offer
//! - **Collection handles** ([`collection`]) - Locally resolved references to collections and documents
//! - **Document store** ([`store`]) - The client handle accessors are created from
//! - **Error handling** ([`error`]) - Error types and result types
//!
//! # Example
//!
//! ```ignore
//! use doccrud::{prelude::*, memory::InMemoryStore};
//! use serde::{Serialize, Deserialize};
//!
//! #[derive(Debug, Clone, Serialize, Deserialize)]
//! pub struct User {
//!     #[serde(default, skip_serializing_if = "Option::is_none")]
//!     pub id: Option<String>,
//!     pub name: String,
//! }
//!
//! let store = DocumentStore::new(InMemoryStore::new());
//! let users = store.accessor::<User>("users");
//!
//! let created = users.create(&User { id: None, name: "Ana".into() }, None).await?;
//! let message = users.update(created.id.as_deref().unwrap(), &bson::doc! { "name": "Ana Maria" }).await;
//! ```

#[allow(unused_extern_crates)]
extern crate self as doccrud_core;

pub mod accessor;
pub mod backend;
pub mod collection;
pub mod document;
pub mod error;
pub mod store;
