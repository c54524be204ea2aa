//! Eager, in-memory mapping of hits.

use search_sync_shared::{Hit, RecordId, SearchResultSet, StoredRecord};

use crate::errors::SearchSyncError;
use crate::search::ResultTransform;

/// Reference to a hit that the caller hydrates later.
#[derive(Debug, Clone, PartialEq)]
pub struct HitRef {
    pub id: RecordId,
    pub index: String,
    pub score: Option<f64>,
}

impl From<&Hit> for HitRef {
    fn from(hit: &Hit) -> Self {
        Self {
            id: hit.id.clone(),
            index: hit.index.clone(),
            score: hit.score,
        }
    }
}

/// One element of an eagerly mapped result.
#[derive(Debug, Clone, PartialEq)]
pub enum MappedRecord {
    /// Record built by the query's transform.
    Record(StoredRecord),
    /// Identity placeholder, when no transform was given.
    Placeholder(HitRef),
}

impl MappedRecord {
    pub fn id(&self) -> &RecordId {
        match self {
            MappedRecord::Record(record) => &record.id,
            MappedRecord::Placeholder(hit) => &hit.id,
        }
    }
}

/// Map every hit, in hit order.
///
/// With a transform each hit becomes the transform's record; the first failing
/// transform fails the whole mapping. Without one each hit becomes a
/// placeholder keeping its identity and score.
pub fn map_hits(
    results: &SearchResultSet,
    transform: Option<&ResultTransform>,
) -> Result<Vec<MappedRecord>, SearchSyncError> {
    match transform {
        Some(transform) => results
            .hits
            .iter()
            .map(|hit| transform(hit).map(MappedRecord::Record))
            .collect(),
        None => Ok(results
            .hits
            .iter()
            .map(|hit| MappedRecord::Placeholder(HitRef::from(hit)))
            .collect()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Map};
    use std::sync::Arc;

    fn hit(id: &str, score: f64, title: &str) -> Hit {
        let mut source = Map::new();
        source.insert("title".to_string(), json!(title));
        Hit {
            id: RecordId::from(id),
            index: "posts".to_string(),
            score: Some(score),
            source,
        }
    }

    fn results() -> SearchResultSet {
        SearchResultSet::new(
            vec![hit("5", 3.0, "five"), hit("3", 2.0, "three"), hit("9", 1.0, "nine")],
            Some(3),
        )
    }

    #[test]
    fn test_placeholders_keep_order_and_score() {
        let mapped = map_hits(&results(), None).unwrap();

        let ids: Vec<&str> = mapped.iter().map(|m| m.id().as_str()).collect();
        assert_eq!(ids, vec!["5", "3", "9"]);
        assert_eq!(
            mapped[0],
            MappedRecord::Placeholder(HitRef {
                id: RecordId::from("5"),
                index: "posts".to_string(),
                score: Some(3.0),
            })
        );
    }

    #[test]
    fn test_transform_builds_records_in_order() {
        let transform: ResultTransform = Arc::new(|hit: &Hit| -> Result<StoredRecord, SearchSyncError> {
            Ok(StoredRecord::new(hit.id.clone(), "posts", hit.source.clone()))
        });

        let mapped = map_hits(&results(), Some(&transform)).unwrap();

        let titles: Vec<_> = mapped
            .iter()
            .map(|m| match m {
                MappedRecord::Record(record) => record.document["title"].clone(),
                MappedRecord::Placeholder(_) => panic!("expected a record"),
            })
            .collect();
        assert_eq!(titles, vec![json!("five"), json!("three"), json!("nine")]);
    }

    #[test]
    fn test_failing_transform_fails_mapping() {
        let transform: ResultTransform = Arc::new(|_: &Hit| -> Result<StoredRecord, SearchSyncError> {
            Err(SearchSyncError::precondition("no title"))
        });

        assert!(map_hits(&results(), Some(&transform)).is_err());
    }

    #[test]
    fn test_empty_results_map_to_empty_list() {
        assert!(map_hits(&SearchResultSet::empty(), None).unwrap().is_empty());
    }
}
