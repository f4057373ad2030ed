//! In-memory document storage backend for doccrud.
//!
//! This crate provides a thread-safe, in-memory implementation of the `StoreBackend` trait.
//! It uses async-aware read-write locks for concurrent access and is meant for development,
//! testing, and small single-process deployments.
//!
//! # Features
//!
//! - **Thread-safe access** - Concurrent reads and writes using async-aware RwLock
//! - **Live views** - Collection views receive the full content again after every write
//! - **Stable order** - Documents are listed by identifier
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
//!     pub name: String,
//! }
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let store = DocumentStore::new(InMemoryStore::builder().build().await?);
//!     let users = store.accessor::<User>("users");
//!
//!     let ana = users.create(&User { id: None, name: "Ana".into() }, None).await?;
//!     println!("created {:?}", ana.id);
//!
//!     Ok(())
//! }
//! ```

#[allow(unused_extern_crates)]
extern crate self as doccrud_memory;

pub mod store;

pub use store::{InMemoryStore, InMemoryStoreBuilder};
