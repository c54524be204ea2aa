//! Bulk payload construction.

use search_sync_shared::{RecordId, Searchable};
use serde_json::{json, Value};

use crate::errors::SearchSyncError;

/// Kind of bulk write applied to every record of a batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BulkAction {
    Index,
    Delete,
}

impl BulkAction {
    /// The action name used in control lines and bulk response items.
    pub fn as_str(&self) -> &'static str {
        match self {
            BulkAction::Index => "index",
            BulkAction::Delete => "delete",
        }
    }
}

/// A single bulk instruction.
#[derive(Debug, Clone, PartialEq)]
pub enum BulkOperation {
    /// Index (create or replace) a document.
    Index {
        index: String,
        id: RecordId,
        document: Value,
    },
    /// Delete a document.
    Delete { index: String, id: RecordId },
}

impl BulkOperation {
    /// Identity of the record this operation targets.
    pub fn id(&self) -> &RecordId {
        match self {
            BulkOperation::Index { id, .. } | BulkOperation::Delete { id, .. } => id,
        }
    }

    /// Index this operation writes to.
    pub fn index(&self) -> &str {
        match self {
            BulkOperation::Index { index, .. } | BulkOperation::Delete { index, .. } => index,
        }
    }

    pub fn action(&self) -> BulkAction {
        match self {
            BulkOperation::Index { .. } => BulkAction::Index,
            BulkOperation::Delete { .. } => BulkAction::Delete,
        }
    }

    /// Convert to bulk request lines: a control line, plus the document for index operations.
    pub fn to_bulk_lines(&self) -> Vec<Value> {
        match self {
            BulkOperation::Index {
                index,
                id,
                document,
            } => vec![
                json!({ "index": { "_index": index, "_id": id } }),
                document.clone(),
            ],
            BulkOperation::Delete { index, id } => {
                vec![json!({ "delete": { "_index": index, "_id": id } })]
            }
        }
    }
}

/// An ordered batch of bulk operations.
///
/// Order is kept so that response items can be correlated 1:1 with the
/// operations that produced them.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BulkRequest {
    operations: Vec<BulkOperation>,
}

impl BulkRequest {
    /// Build a batch indexing every record.
    pub fn index<R: Searchable>(records: &[R]) -> Result<Self, SearchSyncError> {
        Self::build(records, BulkAction::Index)
    }

    /// Build a batch deleting every record.
    pub fn delete<R: Searchable>(records: &[R]) -> Result<Self, SearchSyncError> {
        Self::build(records, BulkAction::Delete)
    }

    /// Build a batch applying `action` to every record.
    ///
    /// Records may target different indices. A record without an identity or
    /// index name fails the whole batch before any operation is produced.
    ///
    /// # Returns
    ///
    /// * `Ok(BulkRequest)` - One operation per record, in input order
    /// * `Err(SearchSyncError::Precondition)` - If a record has no identity or index name
    pub fn build<R: Searchable>(records: &[R], action: BulkAction) -> Result<Self, SearchSyncError> {
        let mut operations = Vec::with_capacity(records.len());

        for (position, record) in records.iter().enumerate() {
            let id = record
                .identity()
                .filter(|id| !id.is_empty())
                .ok_or_else(|| {
                    SearchSyncError::precondition(format!(
                        "record at position {} has no identity",
                        position
                    ))
                })?;

            let index = record.index_name();
            if index.is_empty() {
                return Err(SearchSyncError::precondition(format!(
                    "record {} has no index name",
                    id
                )));
            }

            operations.push(match action {
                BulkAction::Index => BulkOperation::Index {
                    index: index.to_string(),
                    id,
                    document: record.searchable_document(),
                },
                BulkAction::Delete => BulkOperation::Delete {
                    index: index.to_string(),
                    id,
                },
            });
        }

        Ok(Self { operations })
    }

    pub fn operations(&self) -> &[BulkOperation] {
        &self.operations
    }

    pub fn len(&self) -> usize {
        self.operations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.operations.is_empty()
    }

    /// All payload lines, in order.
    pub fn lines(&self) -> Vec<Value> {
        self.operations
            .iter()
            .flat_map(BulkOperation::to_bulk_lines)
            .collect()
    }
}
