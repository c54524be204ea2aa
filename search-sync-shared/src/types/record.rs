//! Record types for the search sync layer.
//!
//! A record is an application entity that lives in the source-of-truth store and
//! is mirrored into the search index. This module defines how records are
//! identified, which index they belong to, and what gets sent to the index.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

/// Opaque record identity.
///
/// Integer and string keys are both carried as strings, which is also how the
/// search backend reports `_id` values on hits.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordId(String);

impl RecordId {
    /// Create an identity from any string-like key.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Borrow the identity as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns true if the identity is the empty string.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for RecordId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for RecordId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl From<i64> for RecordId {
    fn from(id: i64) -> Self {
        Self(id.to_string())
    }
}

impl From<u64> for RecordId {
    fn from(id: u64) -> Self {
        Self(id.to_string())
    }
}

/// Descriptor for a kind of record.
///
/// Resolves the default index for searches and flushes. Aggregate types span
/// several backing tables (for example a combined "everything" search) and can
/// only be mapped eagerly, since a single store cursor cannot serve them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordType {
    /// Name of the record type, also used as the backing table name.
    pub name: String,
    /// Default index that documents of this type are written to.
    pub index_name: String,
    /// Whether this type is a synthetic aggregate over several sources.
    #[serde(default)]
    pub is_aggregate: bool,
}

impl RecordType {
    /// Create a descriptor for a record type backed by a single table.
    ///
    /// # Example
    ///
    /// ```
    /// use search_sync_shared::RecordType;
    ///
    /// let posts = RecordType::new("posts", "posts_v1");
    /// assert!(!posts.is_aggregate);
    /// ```
    pub fn new(name: impl Into<String>, index_name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            index_name: index_name.into(),
            is_aggregate: false,
        }
    }

    /// Create a descriptor for a synthetic type spanning several sources.
    pub fn aggregate(name: impl Into<String>, index_name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            index_name: index_name.into(),
            is_aggregate: true,
        }
    }
}

/// Anything that can be written to the search index.
///
/// Identity and index name must be derivable from the record alone so that a
/// batch can mix records bound for different indices.
pub trait Searchable: Send + Sync {
    /// The record's identity, or `None` if it has not been assigned one yet.
    fn identity(&self) -> Option<RecordId>;

    /// The index this record is written to.
    fn index_name(&self) -> &str;

    /// The key-value document stored in the index for this record.
    fn searchable_document(&self) -> Value;
}

/// A record as loaded from the record store or rebuilt from a hit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredRecord {
    pub id: RecordId,
    pub index_name: String,
    pub document: Map<String, Value>,
}

impl StoredRecord {
    pub fn new(
        id: impl Into<RecordId>,
        index_name: impl Into<String>,
        document: Map<String, Value>,
    ) -> Self {
        Self {
            id: id.into(),
            index_name: index_name.into(),
            document,
        }
    }

    /// Build a record from a document carrying its own identity under `key_field`.
    ///
    /// String and numeric keys are accepted; anything else yields `None`.
    pub fn from_keyed_document(
        document: Map<String, Value>,
        key_field: &str,
        index_name: impl Into<String>,
    ) -> Option<Self> {
        let id = match document.get(key_field)? {
            Value::String(s) => RecordId::new(s.clone()),
            Value::Number(n) => RecordId::new(n.to_string()),
            _ => return None,
        };
        Some(Self::new(id, index_name, document))
    }
}

impl Searchable for StoredRecord {
    fn identity(&self) -> Option<RecordId> {
        if self.id.is_empty() {
            None
        } else {
            Some(self.id.clone())
        }
    }

    fn index_name(&self) -> &str {
        &self.index_name
    }

    fn searchable_document(&self) -> Value {
        Value::Object(self.document.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn document(value: Value) -> Map<String, Value> {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn test_record_id_conversions() {
        assert_eq!(RecordId::from(42i64).as_str(), "42");
        assert_eq!(RecordId::from(7u64).to_string(), "7");
        assert_eq!(RecordId::from("abc"), RecordId::new("abc"));
    }

    #[test]
    fn test_record_id_serializes_transparently() {
        let json = serde_json::to_string(&RecordId::from(5i64)).unwrap();
        assert_eq!(json, "\"5\"");
    }

    #[test]
    fn test_record_type_constructors() {
        let single = RecordType::new("posts", "posts");
        assert!(!single.is_aggregate);

        let combined = RecordType::aggregate("everything", "posts,users");
        assert!(combined.is_aggregate);
        assert_eq!(combined.index_name, "posts,users");
    }

    #[test]
    fn test_stored_record_is_searchable() {
        let record = StoredRecord::new(3i64, "posts", document(json!({"title": "Hello"})));

        assert_eq!(record.identity(), Some(RecordId::from(3i64)));
        assert_eq!(Searchable::index_name(&record), "posts");
        assert_eq!(record.searchable_document(), json!({"title": "Hello"}));
        assert_eq!(record.document.get("title"), Some(&json!("Hello")));
    }

    #[test]
    fn test_from_keyed_document() {
        let record =
            StoredRecord::from_keyed_document(document(json!({"id": 9, "title": "Hi"})), "id", "posts")
                .unwrap();
        assert_eq!(record.id, RecordId::from("9"));
        assert_eq!(record.document.get("title"), Some(&json!("Hi")));

        let slugged =
            StoredRecord::from_keyed_document(document(json!({"slug": "hi"})), "slug", "posts").unwrap();
        assert_eq!(slugged.id, RecordId::from("hi"));

        assert!(StoredRecord::from_keyed_document(document(json!({"title": "Hi"})), "id", "posts").is_none());
        assert!(StoredRecord::from_keyed_document(document(json!({"id": null})), "id", "posts").is_none());
    }

    #[test]
    fn test_stored_record_without_identity() {
        let record = StoredRecord::new("", "posts", Map::new());
        assert!(record.identity().is_none());
    }
}
