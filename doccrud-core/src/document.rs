//! Core traits and types for document representation and serialization.
//!
//! Documents are application-defined serde types. The store never inspects their
//! shape: they travel through the backends as [`Fields`], an ordered map of BSON
//! values, and are only converted back into the concrete type at the edges.

use bson::{Bson, de::deserialize_from_bson, ser::serialize_to_bson};
use serde::{Serialize, de::DeserializeOwned};
use serde_json::{Value, from_value, to_value};

use crate::error::{DocumentStoreError, DocumentStoreResult};

/// The field map a document is stored as.
pub type Fields = bson::Document;

/// Name of the field document identifiers are merged into.
pub const ID_FIELD: &str = "id";

/// Marker trait for every type that can be stored as a document.
///
/// It is implemented automatically for any cloneable serde type, so document
/// shapes only need the usual derives. Carrying an `id` field is optional; when
/// present it should be an `Option<String>` (or `String`) named `id`.
///
/// # Example
///
/// ```ignore
/// use serde::{Serialize, Deserialize};
///
/// #[derive(Debug, Clone, Serialize, Deserialize)]
/// pub struct User {
///     #[serde(default, skip_serializing_if = "Option::is_none")]
///     pub id: Option<String>,
///     pub name: String,
/// }
/// ```
pub trait Document: Serialize + DeserializeOwned + Send + Sync + Clone + 'static {}

impl<T> Document for T where T: Serialize + DeserializeOwned + Send + Sync + Clone + 'static {}

/// Extension trait providing conversions between documents and their field maps.
///
/// This trait is automatically implemented for all types that implement [`Document`].
pub trait DocumentExt: Document {
    /// Converts this document to the field map written to a backend.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails or the value is not a map.
    fn to_fields(&self) -> DocumentStoreResult<Fields>;

    /// Creates a document from a field map read from a backend.
    ///
    /// # Errors
    ///
    /// Returns an error if the fields do not deserialize into `Self`.
    fn from_fields(fields: Fields) -> DocumentStoreResult<Self>;

    /// Converts this document to a JSON value.
    fn to_json(&self) -> DocumentStoreResult<Value>;

    /// Creates a document from a JSON value.
    fn from_json(value: Value) -> DocumentStoreResult<Self>;
}

impl<D: Document> DocumentExt for D {
    fn to_fields(&self) -> DocumentStoreResult<Fields> {
        fields_of(self)
    }

    fn from_fields(fields: Fields) -> DocumentStoreResult<Self> {
        Ok(deserialize_from_bson(Bson::Document(fields))?)
    }

    fn to_json(&self) -> DocumentStoreResult<Value> {
        Ok(to_value(self)?)
    }

    fn from_json(value: Value) -> DocumentStoreResult<Self> {
        Ok(from_value(value)?)
    }
}

/// Serializes any value into a field map suitable for writing.
///
/// A top-level `id` holding `null` is dropped so unset identifiers never reach
/// the store.
///
/// # Errors
///
/// Returns [`DocumentStoreError::InvalidDocument`] when the value does not
/// serialize to a map.
pub fn fields_of<S: Serialize + ?Sized>(value: &S) -> DocumentStoreResult<Fields> {
    match serialize_to_bson(value)? {
        Bson::Document(mut fields) => {
            if matches!(fields.get(ID_FIELD), Some(Bson::Null)) {
                fields.remove(ID_FIELD);
            }
            Ok(fields)
        }
        other => Err(DocumentStoreError::InvalidDocument(format!(
            "expected a map of fields, got {:?}",
            other.element_type()
        ))),
    }
}

/// Returns `fields` with the identifier field set to `id`, overwriting any
/// existing value.
pub fn with_id(mut fields: Fields, id: &str) -> Fields {
    fields.insert(ID_FIELD, id);
    fields
}

/// The state of a single document as read from a backend.
#[derive(Debug, Clone, PartialEq)]
pub struct DocumentSnapshot {
    id: String,
    data: Option<Fields>,
}

impl DocumentSnapshot {
    /// Snapshot of a stored document.
    pub fn found(id: impl Into<String>, data: Fields) -> Self {
        Self { id: id.into(), data: Some(data) }
    }

    /// Snapshot of an identifier with no document behind it.
    pub fn missing(id: impl Into<String>) -> Self {
        Self { id: id.into(), data: None }
    }

    /// The document identifier.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Whether a document exists at this identifier.
    pub fn exists(&self) -> bool {
        self.data.is_some()
    }

    /// The stored fields, if the document exists.
    pub fn data(&self) -> Option<&Fields> {
        self.data.as_ref()
    }

    /// Consumes the snapshot, returning the stored fields (empty when missing)
    /// with the identifier merged in.
    pub fn into_fields(self) -> Fields {
        with_id(self.data.unwrap_or_default(), &self.id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bson::doc;
    use serde::Deserialize;

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    struct Note {
        id: Option<String>,
        text: String,
    }

    #[test]
    fn unset_id_is_not_written() {
        let note = Note { id: None, text: "hi".into() };
        assert_eq!(note.to_fields().unwrap(), doc! { "text": "hi" });
    }

    #[test]
    fn set_id_is_written() {
        let note = Note { id: Some("n1".into()), text: "hi".into() };
        assert_eq!(note.to_fields().unwrap(), doc! { "id": "n1", "text": "hi" });
    }

    #[test]
    fn scalars_are_not_documents() {
        assert!(matches!(fields_of(&42), Err(DocumentStoreError::InvalidDocument(_))));
    }

    #[test]
    fn snapshot_id_overrides_stored_id() {
        let snapshot = DocumentSnapshot::found("real", doc! { "id": "stale", "text": "x" });
        assert_eq!(snapshot.into_fields(), doc! { "id": "real", "text": "x" });
    }

    #[test]
    fn missing_snapshot_is_only_its_id() {
        let snapshot = DocumentSnapshot::missing("gone");
        assert!(!snapshot.exists());
        assert_eq!(snapshot.into_fields(), doc! { "id": "gone" });
    }
}
