//! Convenient re-exports of commonly used types from doccrud.
//!
//! ```ignore
//! use doccrud::prelude::*;
//! ```

pub use doccrud_core::{
    accessor::{CollectionAccessor, messages},
    backend::{DocumentStream, DynStoreBackend, StoreBackend, StoreBackendBuilder},
    collection::{CollectionRef, DocumentRef},
    document::{Document, DocumentExt, DocumentSnapshot, Fields, ID_FIELD},
    error::{DocumentStoreError, DocumentStoreResult},
    store::{DocumentStore, DynDocumentStore},
};

pub use crate::config::StoreConfig;
