//! Field name escaping for MongoDB.
//!
//! MongoDB rejects or misinterprets field names containing `.` (path separator),
//! `$` (operator prefix) or NUL. Names are escaped on the way in and restored on
//! the way out; values are left untouched.

use bson::{Bson, Document};

/// Escape sequences, applied in order when escaping and in reverse when restoring.
const ESCAPES: [(&str, &str); 4] = [
    ("%", "%25"),
    (".", "%2E"),
    ("$", "%24"),
    ("\0", "%00"),
];

pub(crate) struct FieldNames;

impl FieldNames {
    pub(crate) fn escape(name: &str) -> String {
        ESCAPES
            .iter()
            .fold(name.to_string(), |name, (raw, escaped)| name.replace(raw, escaped))
    }

    pub(crate) fn restore(name: &str) -> String {
        ESCAPES
            .iter()
            .rev()
            .fold(name.to_string(), |name, (raw, escaped)| name.replace(escaped, raw))
    }

    /// Escapes every key of `fields`, recursing into nested documents and arrays.
    pub(crate) fn escape_fields(fields: Document) -> Document {
        Self::map_keys(fields, &Self::escape)
    }

    /// Inverse of [`escape_fields`](Self::escape_fields).
    pub(crate) fn restore_fields(fields: Document) -> Document {
        Self::map_keys(fields, &Self::restore)
    }

    fn map_keys(fields: Document, rename: &dyn Fn(&str) -> String) -> Document {
        fields
            .into_iter()
            .map(|(key, value)| (rename(&key), Self::map_value(value, rename)))
            .collect()
    }

    fn map_value(value: Bson, rename: &dyn Fn(&str) -> String) -> Bson {
        match value {
            Bson::Document(nested) => Bson::Document(Self::map_keys(nested, rename)),
            Bson::Array(items) => Bson::Array(
                items
                    .into_iter()
                    .map(|item| Self::map_value(item, rename))
                    .collect(),
            ),
            other => other,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bson::doc;

    #[test]
    fn escapes_reserved_characters_in_keys_only() {
        let escaped = FieldNames::escape_fields(doc! {
            "a.b": "x.y",
            "$set": { "c$": [ { "d.e": 1 } ] },
        });

        assert_eq!(escaped, doc! {
            "a%2Eb": "x.y",
            "%24set": { "c%24": [ { "d%2Ee": 1 } ] },
        });
    }

    #[test]
    fn restore_undoes_escape() {
        let original = doc! { "50%.off": { "$": "keep" }, "plain": 1 };

        let restored = FieldNames::restore_fields(FieldNames::escape_fields(original.clone()));

        assert_eq!(restored, original);
    }
}
