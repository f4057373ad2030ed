//! Store configuration.
//!
//! [`StoreConfig`] describes which backend to use and how to reach it. It is
//! plain serde data, so it can be embedded in whatever configuration file an
//! application already loads, and turned into a ready [`DynDocumentStore`] with
//! [`StoreConfig::connect`].
//!
//! ```ignore
//! use doccrud::config::StoreConfig;
//!
//! let config = StoreConfig::from_json_str(r#"{ "backend": "memory" }"#)?;
//! let store = config.connect().await?;
//! let users = store.accessor::<User>("users");
//! ```
//!
//! With the `mongodb` feature:
//!
//! ```json
//! { "backend": "mongodb", "dsn": "mongodb://localhost:27017", "database": "app" }
//! ```

use serde::{Deserialize, Serialize};

use doccrud_core::{
    backend::StoreBackendBuilder,
    error::DocumentStoreResult,
    store::{DocumentStore, DynDocumentStore},
};
use doccrud_memory::InMemoryStoreBuilder;

/// Backend selection and connection settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "backend", rename_all = "lowercase")]
pub enum StoreConfig {
    /// In-process store; contents are lost when the process exits.
    #[default]
    Memory,
    /// MongoDB server or cluster.
    #[cfg(feature = "mongodb")]
    Mongodb {
        /// Connection string, e.g. `mongodb://localhost:27017`.
        dsn: String,
        /// Database holding the collections.
        database: String,
    },
}

impl StoreConfig {
    /// Parses a configuration from JSON.
    ///
    /// # Errors
    ///
    /// Returns a serialization error for malformed JSON or an unknown backend.
    pub fn from_json_str(json: &str) -> DocumentStoreResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Builds the configured backend and wraps it in a store.
    ///
    /// # Errors
    ///
    /// Returns an initialization error if the backend cannot be set up.
    pub async fn connect(self) -> DocumentStoreResult<DynDocumentStore> {
        tracing::debug!(config = ?self, "building document store");

        match self {
            StoreConfig::Memory => Ok(DocumentStore::new_dyn(InMemoryStoreBuilder.build().await?)),
            #[cfg(feature = "mongodb")]
            StoreConfig::Mongodb { dsn, database } => Ok(DocumentStore::new_dyn(
                doccrud_mongodb::MongoDbStoreBuilder::new(&dsn, &database)
                    .build()
                    .await?,
            )),
        }
    }
}
