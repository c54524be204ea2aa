//! Reading search responses into result sets.

use search_sync_shared::{Hit, RecordId, SearchResultSet};
use serde_json::{Map, Value};

use crate::errors::SearchSyncError;

/// Parse a raw search response into hits, keeping backend order.
///
/// Every hit needs an `_id`. The total count is read from `hits.total.value`
/// (or a bare `hits.total` number) but a missing total is not an error here;
/// it only fails when asked for through [`total_count`].
pub fn parse_search_response(raw: &Value) -> Result<SearchResultSet, SearchSyncError> {
    let hits_section = raw
        .get("hits")
        .ok_or_else(|| SearchSyncError::malformed_response("search response has no `hits`"))?;

    let raw_hits = hits_section
        .get("hits")
        .and_then(Value::as_array)
        .ok_or_else(|| SearchSyncError::malformed_response("search response has no `hits.hits` list"))?;

    let hits = raw_hits
        .iter()
        .enumerate()
        .map(|(position, hit)| parse_hit(position, hit))
        .collect::<Result<Vec<_>, _>>()?;

    let total = match hits_section.get("total") {
        Some(Value::Object(total)) => total.get("value").and_then(Value::as_u64),
        Some(Value::Number(total)) => total.as_u64(),
        _ => None,
    };

    Ok(SearchResultSet {
        hits,
        total,
        took_ms: raw.get("took").and_then(Value::as_u64),
    })
}

fn parse_hit(position: usize, hit: &Value) -> Result<Hit, SearchSyncError> {
    let id = match hit.get("_id") {
        Some(Value::String(id)) => RecordId::new(id.clone()),
        Some(Value::Number(id)) => RecordId::new(id.to_string()),
        _ => {
            return Err(SearchSyncError::malformed_response(format!(
                "hit at position {} has no `_id`",
                position
            )))
        }
    };

    Ok(Hit {
        id,
        index: hit
            .get("_index")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string(),
        score: hit.get("_score").and_then(Value::as_f64),
        source: hit
            .get("_source")
            .and_then(Value::as_object)
            .cloned()
            .unwrap_or_else(Map::new),
    })
}

/// The total number of matching documents.
///
/// # Returns
///
/// * `Ok(u64)` - The backend-reported total
/// * `Err(SearchSyncError::MalformedResponse)` - If the response carried no total
pub fn total_count(results: &SearchResultSet) -> Result<u64, SearchSyncError> {
    results
        .total
        .ok_or_else(|| SearchSyncError::malformed_response("search response has no `hits.total.value`"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_keeps_hit_order_and_total() {
        let raw = json!({
            "took": 4,
            "hits": {
                "total": { "value": 42, "relation": "eq" },
                "hits": [
                    { "_index": "posts", "_id": "5", "_score": 3.2, "_source": { "title": "five" } },
                    { "_index": "posts", "_id": "3", "_score": 2.1, "_source": { "title": "three" } },
                    { "_index": "posts", "_id": "9", "_score": 1.0 }
                ]
            }
        });

        let results = parse_search_response(&raw).unwrap();

        assert_eq!(
            results.identities(),
            vec![RecordId::from("5"), RecordId::from("3"), RecordId::from("9")]
        );
        assert_eq!(results.hits[0].score, Some(3.2));
        assert_eq!(results.hits[1].source["title"], json!("three"));
        assert!(results.hits[2].source.is_empty());
        assert_eq!(results.took_ms, Some(4));
        assert_eq!(total_count(&results).unwrap(), 42);
    }

    #[test]
    fn test_missing_total_fails_only_when_requested() {
        let raw = json!({ "hits": { "hits": [] } });

        let results = parse_search_response(&raw).unwrap();
        assert!(results.is_empty());
        assert!(matches!(
            total_count(&results),
            Err(SearchSyncError::MalformedResponse(_))
        ));
    }

    #[test]
    fn test_bare_total_number_is_accepted() {
        let raw = json!({ "hits": { "total": 7, "hits": [] } });
        assert_eq!(total_count(&parse_search_response(&raw).unwrap()).unwrap(), 7);
    }

    #[test]
    fn test_null_score_when_sorted() {
        let raw = json!({ "hits": { "hits": [ { "_id": 1, "_score": null } ] } });
        let results = parse_search_response(&raw).unwrap();

        assert_eq!(results.hits[0].id, RecordId::from("1"));
        assert!(results.hits[0].score.is_none());
    }

    #[test]
    fn test_hit_without_id_is_malformed() {
        let raw = json!({ "hits": { "hits": [ { "_score": 1.0 } ] } });
        assert!(matches!(
            parse_search_response(&raw),
            Err(SearchSyncError::MalformedResponse(_))
        ));
    }

    #[test]
    fn test_missing_hits_is_malformed() {
        assert!(matches!(
            parse_search_response(&json!({ "took": 1 })),
            Err(SearchSyncError::MalformedResponse(_))
        ));
    }
}
