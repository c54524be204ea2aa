//! Lazy, order-preserving hydration of hits from the record store.

use futures::stream::{self, BoxStream, StreamExt};
use search_sync_shared::{RecordId, RecordType, SearchResultSet, StoredRecord};
use std::collections::{BTreeMap, HashMap, VecDeque};
use std::sync::Arc;
use tracing::debug;

use crate::errors::SearchSyncError;
use crate::interfaces::{RecordCursor, RecordStore};

/// Hydrated records in search relevance order.
pub type RecordStream = BoxStream<'static, Result<StoredRecord, SearchSyncError>>;

/// Hydrate the hits of `results` from `store`, lazily and in hit order.
///
/// Zero hits yield an empty stream without touching the store. Otherwise hit
/// identities are split into pages of the store's page size, and one cursor is
/// opened per page, only once the previous page has been fully emitted.
/// Records the store returns for identities outside the page are dropped, the
/// rest are re-ordered to match the hits, and hits the store no longer has are
/// skipped when the page's cursor runs out. At most one page of records is
/// buffered at any time.
///
/// # Returns
///
/// * `Ok(RecordStream)` - The ordered stream; a store failure ends it with that error
/// * `Err(SearchSyncError::NotSupportedForAggregateType)` - If `record_type` is an aggregate
pub async fn map_hits_lazy(
    store: Arc<dyn RecordStore>,
    record_type: &RecordType,
    results: &SearchResultSet,
) -> Result<RecordStream, SearchSyncError> {
    if record_type.is_aggregate {
        return Err(SearchSyncError::not_supported_for_aggregate(&record_type.name));
    }

    if results.is_empty() {
        return Ok(stream::empty().boxed());
    }

    let ids = results.identities();
    let mut positions = HashMap::with_capacity(ids.len());
    for (position, id) in ids.iter().enumerate() {
        positions.entry(id.clone()).or_insert(position);
    }

    let page_size = store.page_size().max(1);
    let pages: VecDeque<Vec<RecordId>> = ids.chunks(page_size).map(<[RecordId]>::to_vec).collect();

    debug!(
        record_type = %record_type.name,
        hits = ids.len(),
        pages = pages.len(),
        "Starting lazy mapping"
    );

    Ok(reorder(Reorder {
        store,
        record_type: record_type.clone(),
        pages,
        positions,
        cursor: None,
        parked: BTreeMap::new(),
        next: 0,
        page_end: 0,
        failed: false,
    }))
}

struct Reorder {
    store: Arc<dyn RecordStore>,
    record_type: RecordType,
    pages: VecDeque<Vec<RecordId>>,
    positions: HashMap<RecordId, usize>,
    /// Cursor of the current page; `None` once it is exhausted.
    cursor: Option<RecordCursor>,
    parked: BTreeMap<usize, StoredRecord>,
    next: usize,
    /// First position past the current page.
    page_end: usize,
    failed: bool,
}

fn reorder(state: Reorder) -> RecordStream {
    stream::unfold(state, |mut state| async move {
        if state.failed {
            return None;
        }

        loop {
            if let Some(record) = state.parked.remove(&state.next) {
                state.next += 1;
                return Some((Ok(record), state));
            }

            let Some(cursor) = state.cursor.as_mut() else {
                // Remaining gaps in this page are hits the store no longer has.
                if let Some((position, record)) = state.parked.pop_first() {
                    state.next = position + 1;
                    return Some((Ok(record), state));
                }

                let page = state.pages.pop_front()?;
                state.next = state.page_end;
                state.page_end += page.len();

                debug!(
                    first = state.next,
                    len = page.len(),
                    "Opening record cursor for page"
                );
                match state.store.cursor_by_identities(&state.record_type, page).await {
                    Ok(cursor) => state.cursor = Some(cursor),
                    Err(e) => {
                        state.failed = true;
                        return Some((Err(e), state));
                    }
                }
                continue;
            };

            match cursor.next().await {
                Some(Ok(record)) => match state.positions.get(&record.id).copied() {
                    Some(position) if position >= state.next && position < state.page_end => {
                        state.parked.entry(position).or_insert(record);
                    }
                    Some(_) => {
                        debug!(id = %record.id, "Dropping record outside the current page");
                    }
                    None => {
                        debug!(id = %record.id, "Dropping record outside the hit set");
                    }
                },
                Some(Err(e)) => {
                    state.failed = true;
                    state.parked.clear();
                    return Some((Err(e), state));
                }
                None => state.cursor = None,
            }
        }
    })
    .boxed()
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use futures::TryStreamExt;
    use search_sync_shared::Hit;
    use serde_json::Map;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    /// Store holding a fixed list of records, answering in the list's order.
    struct MockStore {
        records: Vec<StoredRecord>,
        page_size: usize,
        /// Return every stored record, not only the requested ones.
        unfiltered: bool,
        fail_after: Option<usize>,
        calls: AtomicUsize,
        yielded: Arc<AtomicUsize>,
        requested: Mutex<Vec<Vec<RecordId>>>,
    }

    impl MockStore {
        fn new(ids: &[&str]) -> Self {
            Self {
                records: ids
                    .iter()
                    .map(|id| StoredRecord::new(*id, "posts", Map::new()))
                    .collect(),
                page_size: 500,
                unfiltered: false,
                fail_after: None,
                calls: AtomicUsize::new(0),
                yielded: Arc::new(AtomicUsize::new(0)),
                requested: Mutex::new(Vec::new()),
            }
        }

        fn with_page_size(mut self, page_size: usize) -> Self {
            self.page_size = page_size;
            self
        }

        fn unfiltered(mut self) -> Self {
            self.unfiltered = true;
            self
        }

        fn failing_after(mut self, count: usize) -> Self {
            self.fail_after = Some(count);
            self
        }
    }

    #[async_trait]
    impl RecordStore for MockStore {
        async fn cursor_by_identities(
            &self,
            _record_type: &RecordType,
            ids: Vec<RecordId>,
        ) -> Result<RecordCursor, SearchSyncError> {
            self.calls.fetch_add(1, Ordering::SeqCst);

            let mut items: Vec<Result<StoredRecord, SearchSyncError>> = self
                .records
                .iter()
                .filter(|record| self.unfiltered || ids.contains(&record.id))
                .cloned()
                .map(Ok)
                .collect();
            if let Some(count) = self.fail_after {
                items.truncate(count);
                items.push(Err(SearchSyncError::record_store("connection reset")));
            }
            self.requested.lock().unwrap().push(ids);

            let yielded = self.yielded.clone();
            Ok(stream::iter(items)
                .inspect(move |_| {
                    yielded.fetch_add(1, Ordering::SeqCst);
                })
                .boxed())
        }

        fn page_size(&self) -> usize {
            self.page_size
        }
    }

    fn results(ids: &[&str]) -> SearchResultSet {
        let hits = ids
            .iter()
            .map(|id| Hit {
                id: RecordId::from(*id),
                index: "posts".to_string(),
                score: Some(1.0),
                source: Map::new(),
            })
            .collect();
        SearchResultSet::new(hits, Some(ids.len() as u64))
    }

    fn posts() -> RecordType {
        RecordType::new("posts", "posts")
    }

    async fn collect_ids(stream: RecordStream) -> Vec<String> {
        stream
            .map_ok(|record| record.id.to_string())
            .try_collect()
            .await
            .unwrap()
    }

    fn numbered(count: usize) -> Vec<String> {
        (0..count).map(|i| i.to_string()).collect()
    }

    fn as_refs(ids: &[String]) -> Vec<&str> {
        ids.iter().map(String::as_str).collect()
    }

    #[tokio::test]
    async fn test_zero_hits_skip_the_store() {
        let store = Arc::new(MockStore::new(&["1"]));

        let stream = map_hits_lazy(store.clone(), &posts(), &SearchResultSet::empty())
            .await
            .unwrap();

        assert!(collect_ids(stream).await.is_empty());
        assert_eq!(store.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_store_order_is_replaced_by_hit_order() {
        let store = Arc::new(MockStore::new(&["3", "9", "5"]));

        let stream = map_hits_lazy(store.clone(), &posts(), &results(&["5", "3", "9"]))
            .await
            .unwrap();

        assert_eq!(collect_ids(stream).await, vec!["5", "3", "9"]);
        assert_eq!(
            *store.requested.lock().unwrap(),
            vec![vec![RecordId::from("5"), RecordId::from("3"), RecordId::from("9")]]
        );
    }

    #[tokio::test]
    async fn test_records_missing_from_store_are_skipped() {
        let store = Arc::new(MockStore::new(&["3", "5"]));

        let stream = map_hits_lazy(store, &posts(), &results(&["5", "3", "9"]))
            .await
            .unwrap();

        assert_eq!(collect_ids(stream).await, vec!["5", "3"]);
    }

    #[tokio::test]
    async fn test_records_outside_hit_set_are_dropped() {
        let store = Arc::new(MockStore::new(&["7", "3", "5", "3"]).unfiltered());

        let stream = map_hits_lazy(store, &posts(), &results(&["5", "3"]))
            .await
            .unwrap();

        assert_eq!(collect_ids(stream).await, vec!["5", "3"]);
    }

    #[tokio::test]
    async fn test_aggregate_type_is_rejected() {
        let store = Arc::new(MockStore::new(&["1"]));
        let everything = RecordType::aggregate("everything", "posts,users");

        let result = map_hits_lazy(store.clone(), &everything, &results(&["1"])).await;

        assert!(matches!(
            result,
            Err(SearchSyncError::NotSupportedForAggregateType(_))
        ));
        assert_eq!(store.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_store_failure_ends_the_stream() {
        let store = Arc::new(MockStore::new(&["1", "2", "3"]).failing_after(1));

        let stream = map_hits_lazy(store, &posts(), &results(&["1", "2", "3"]))
            .await
            .unwrap();
        let items: Vec<Result<StoredRecord, SearchSyncError>> = stream.collect().await;

        assert_eq!(items.len(), 2);
        assert_eq!(items[0].as_ref().unwrap().id, RecordId::from("1"));
        assert!(matches!(items[1], Err(SearchSyncError::RecordStoreError(_))));
    }

    #[tokio::test]
    async fn test_identities_are_requested_one_page_at_a_time() {
        let ids = numbered(250);
        let store = Arc::new(MockStore::new(&as_refs(&ids)).with_page_size(100));

        let stream = map_hits_lazy(store.clone(), &posts(), &results(&as_refs(&ids)))
            .await
            .unwrap();

        assert_eq!(collect_ids(stream).await, ids);
        let pages: Vec<usize> = store.requested.lock().unwrap().iter().map(Vec::len).collect();
        assert_eq!(pages, vec![100, 100, 50]);
    }

    #[tokio::test]
    async fn test_buffer_stays_within_a_page_when_a_hit_is_missing() {
        let ids = numbered(1000);
        // The store lost the top hit and answers the rest in order.
        let stored: Vec<&str> = as_refs(&ids).into_iter().skip(1).collect();
        let store = Arc::new(MockStore::new(&stored).with_page_size(100));
        let yielded = store.yielded.clone();

        let mut stream = map_hits_lazy(store, &posts(), &results(&as_refs(&ids)))
            .await
            .unwrap();

        let mut emitted = Vec::new();
        while let Some(record) = stream.next().await {
            let record = record.unwrap();
            let read = yielded.load(Ordering::SeqCst);
            assert!(
                read <= emitted.len() + 100,
                "store was {} records ahead when emitting {}",
                read - emitted.len(),
                record.id
            );
            if emitted.is_empty() {
                assert!(read <= 100, "first record emitted after reading {}", read);
            }
            emitted.push(record.id.to_string());
        }

        assert_eq!(emitted, ids[1..].to_vec());
    }

    #[tokio::test]
    async fn test_reverse_ordered_store_is_bounded_per_page() {
        let ids = numbered(300);
        let mut reversed = as_refs(&ids);
        reversed.reverse();
        let store = Arc::new(MockStore::new(&reversed).with_page_size(100));
        let yielded = store.yielded.clone();

        let mut stream = map_hits_lazy(store, &posts(), &results(&as_refs(&ids)))
            .await
            .unwrap();

        let mut emitted = 0;
        while let Some(record) = stream.next().await {
            record.unwrap();
            assert!(yielded.load(Ordering::SeqCst) <= emitted + 100);
            emitted += 1;
        }
        assert_eq!(emitted, 300);
    }
}
