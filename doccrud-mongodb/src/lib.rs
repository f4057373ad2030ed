//! MongoDB backend implementation for doccrud.
//!
//! This crate provides a MongoDB-based implementation of the `StoreBackend` trait,
//! persisting every collection path as a MongoDB collection.
//!
//! To use this backend, include the `mongodb` feature in your `Cargo.toml`:
//!
//! ```toml
//! [dependencies]
//! doccrud = { version = "x.y.z", features = ["mongodb"] }
//! ```
//!
//! # Storage layout
//!
//! - Document identifiers are stored as string `_id` values and never appear in
//!   the returned fields
//! - Field names containing `.`, `$` or NUL are escaped before writing
//! - Generated identifiers are created client side, so `add` costs a single insert
//! - Live views start with a plain read; a change stream (which needs a replica
//!   set) is only opened when a consumer asks for more than the first snapshot
//!
//! # Example
//!
//! ```ignore
//! use doccrud::{backend::StoreBackendBuilder, mongodb::MongoDbStore};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let store = MongoDbStore::builder("mongodb://localhost:27017", "my_database")
//!         .build()
//!         .await?;
//!
//!     Ok(())
//! }
//! ```

#[allow(unused_extern_crates)]
extern crate self as doccrud_mongodb;

pub mod store;
pub(crate) mod sanitizer;

pub use store::{MongoDbStore, MongoDbStoreBuilder};
