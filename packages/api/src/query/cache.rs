//! The cache table. Pure bookkeeping: it never spawns or awaits anything, so
//! [`QueryClient`](super::QueryClient) can drive it under a plain mutex.

use std::collections::HashMap;
use std::sync::Arc;

use futures::future::{BoxFuture, Shared};
use serde_json::Value;
use tokio::sync::watch;

use super::key::QueryKey;
use crate::endpoint::{Endpoint, ResourceType};
use crate::error::ApiError;

pub(crate) type FetchResult = Result<Arc<Value>, ApiError>;
pub(crate) type SharedFetch = Shared<BoxFuture<'static, FetchResult>>;

/// What subscribers of one entry observe.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EntrySnapshot {
    pub data: Option<Arc<Value>>,
    pub error: Option<ApiError>,
    pub is_fetching: bool,
}

struct InFlight {
    id: u64,
    future: SharedFetch,
    /// Invalidated while this request was running; its result may be stale.
    invalidated: bool,
}

struct Entry {
    endpoint: Endpoint,
    state: watch::Sender<EntrySnapshot>,
    in_flight: Option<InFlight>,
    subscribers: usize,
}

impl Entry {
    fn new(endpoint: Endpoint) -> Self {
        let (state, _) = watch::channel(EntrySnapshot::default());
        Self {
            endpoint,
            state,
            in_flight: None,
            subscribers: 0,
        }
    }
}

#[derive(Default)]
pub(crate) struct QueryCache {
    entries: HashMap<QueryKey, Entry>,
    next_fetch_id: u64,
}

impl QueryCache {
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn contains(&self, key: &QueryKey) -> bool {
        self.entries.contains_key(key)
    }

    pub fn snapshot(&self, key: &QueryKey) -> Option<EntrySnapshot> {
        self.entries.get(key).map(|e| e.state.borrow().clone())
    }

    pub fn subscribers(&self, key: &QueryKey) -> usize {
        self.entries.get(key).map_or(0, |e| e.subscribers)
    }

    /// Register a subscriber, creating the entry if needed.
    pub fn subscribe(&mut self, key: &QueryKey, endpoint: &Endpoint) -> watch::Receiver<EntrySnapshot> {
        let entry = self
            .entries
            .entry(key.clone())
            .or_insert_with(|| Entry::new(endpoint.clone()));
        entry.subscribers += 1;
        entry.state.subscribe()
    }

    /// Drop a subscriber. The entry is evicted once nobody is subscribed and
    /// nothing is in flight; a running request still completes and settles.
    pub fn unsubscribe(&mut self, key: &QueryKey) {
        let Some(entry) = self.entries.get_mut(key) else {
            return;
        };
        entry.subscribers = entry.subscribers.saturating_sub(1);
        if entry.subscribers == 0 && entry.in_flight.is_none() {
            self.entries.remove(key);
            tracing::debug!("Evicted {}", key);
        }
    }

    /// Whether a subscriber needs a request started: no data, no error and
    /// nothing in flight.
    pub fn needs_fetch(&self, key: &QueryKey) -> bool {
        self.entries.get(key).map_or(true, |e| {
            let state = e.state.borrow();
            e.in_flight.is_none() && state.data.is_none() && state.error.is_none()
        })
    }

    pub fn in_flight(&self, key: &QueryKey) -> Option<SharedFetch> {
        self.entries
            .get(key)?
            .in_flight
            .as_ref()
            .map(|f| f.future.clone())
    }

    pub fn next_fetch_id(&mut self) -> u64 {
        self.next_fetch_id += 1;
        self.next_fetch_id
    }

    /// Record a started request. Existing data stays visible while it runs.
    pub fn begin(&mut self, key: &QueryKey, endpoint: &Endpoint, id: u64, future: SharedFetch) {
        let entry = self
            .entries
            .entry(key.clone())
            .or_insert_with(|| Entry::new(endpoint.clone()));
        entry.in_flight = Some(InFlight {
            id,
            future,
            invalidated: false,
        });
        entry.state.send_if_modified(|s| !std::mem::replace(&mut s.is_fetching, true));
    }

    /// Apply the outcome of request `id`. Results of requests that were
    /// superseded by a reset are dropped. An entry nobody subscribes to (lazy
    /// fetches, screens that left mid-request) is evicted here; its joiners
    /// already hold the result through the shared future. Returns the
    /// endpoint to fetch again when the entry was invalidated mid-flight and
    /// is still subscribed.
    pub fn settle(&mut self, key: &QueryKey, id: u64, result: &FetchResult) -> Option<Endpoint> {
        let entry = self.entries.get_mut(key)?;
        if entry.in_flight.as_ref().map(|f| f.id) != Some(id) {
            tracing::debug!("Discarding superseded result for {}", key);
            return None;
        }
        let invalidated = entry.in_flight.take().is_some_and(|f| f.invalidated);

        if entry.subscribers == 0 {
            self.entries.remove(key);
            tracing::debug!("Evicted {} after settling unsubscribed", key);
            return None;
        }

        entry.state.send_modify(|s| {
            s.is_fetching = false;
            match result {
                Ok(data) => {
                    s.data = Some(data.clone());
                    s.error = None;
                }
                Err(e) => s.error = Some(e.clone()),
            }
        });

        invalidated.then(|| entry.endpoint.clone())
    }

    /// Mark every entry of the given resource types stale. Subscribed entries
    /// are returned for refetching (or flagged, if a request is already
    /// running); unsubscribed entries are evicted.
    pub fn invalidate(&mut self, resources: &[ResourceType]) -> Vec<Endpoint> {
        let mut refetch = Vec::new();
        self.entries.retain(|key, entry| {
            if !resources.contains(&key.resource()) {
                return true;
            }
            if let Some(in_flight) = entry.in_flight.as_mut() {
                in_flight.invalidated = true;
                return true;
            }
            if entry.subscribers == 0 {
                tracing::debug!("Evicted {} on invalidation", key);
                return false;
            }
            refetch.push(entry.endpoint.clone());
            true
        });
        refetch
    }

    /// Forget every payload. Subscribed entries stay registered but empty so
    /// their handles keep working; in-flight results are discarded.
    pub fn reset(&mut self) {
        self.entries.retain(|_, entry| {
            entry.in_flight = None;
            entry.state.send_replace(EntrySnapshot::default());
            entry.subscribers > 0
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::FutureExt;
    use serde_json::json;

    fn pending() -> SharedFetch {
        futures::future::pending::<FetchResult>().boxed().shared()
    }

    fn key(endpoint: &Endpoint) -> QueryKey {
        QueryKey::for_endpoint(endpoint)
    }

    #[test]
    fn test_unsubscribe_to_zero_evicts() {
        let mut cache = QueryCache::default();
        let endpoint = Endpoint::OwnTickets;
        let k = key(&endpoint);
        let _a = cache.subscribe(&k, &endpoint);
        let _b = cache.subscribe(&k, &endpoint);
        assert_eq!(cache.subscribers(&k), 2);

        cache.unsubscribe(&k);
        assert!(cache.contains(&k));
        cache.unsubscribe(&k);
        assert!(!cache.contains(&k));
    }

    #[test]
    fn test_in_flight_entry_survives_unsubscribe() {
        let mut cache = QueryCache::default();
        let endpoint = Endpoint::OwnPapers;
        let k = key(&endpoint);
        let _rx = cache.subscribe(&k, &endpoint);
        let id = cache.next_fetch_id();
        cache.begin(&k, &endpoint, id, pending());
        cache.unsubscribe(&k);
        assert!(cache.contains(&k));

        assert_eq!(cache.settle(&k, id, &Ok(Arc::new(json!([1])))), None);
        assert!(!cache.contains(&k));
    }

    #[test]
    fn test_unsubscribed_settle_evicts() {
        let mut cache = QueryCache::default();
        for i in 0..50 {
            let endpoint = Endpoint::Conference { id: format!("c{i}") };
            let k = key(&endpoint);
            let id = cache.next_fetch_id();
            cache.begin(&k, &endpoint, id, pending());
            cache.settle(&k, id, &Err(ApiError::Network("down".into())));
        }
        assert_eq!(cache.len(), 0);
    }

    #[test]
    fn test_settle_keeps_previous_data_on_error() {
        let mut cache = QueryCache::default();
        let endpoint = Endpoint::OwnTickets;
        let k = key(&endpoint);
        let _rx = cache.subscribe(&k, &endpoint);

        let first = cache.next_fetch_id();
        cache.begin(&k, &endpoint, first, pending());
        cache.settle(&k, first, &Ok(Arc::new(json!(["a"]))));

        let second = cache.next_fetch_id();
        cache.begin(&k, &endpoint, second, pending());
        let during = cache.snapshot(&k).unwrap();
        assert!(during.is_fetching);
        assert_eq!(during.data, Some(Arc::new(json!(["a"]))));

        cache.settle(&k, second, &Err(ApiError::Network("down".into())));
        let after = cache.snapshot(&k).unwrap();
        assert!(!after.is_fetching);
        assert!(after.error.is_some());
        assert_eq!(after.data, Some(Arc::new(json!(["a"]))));
    }

    #[test]
    fn test_invalidate_refetches_only_tagged_entries() {
        let mut cache = QueryCache::default();
        let tickets = Endpoint::OwnTickets;
        let categories = Endpoint::ConferenceCategories;

        let mut receivers = Vec::new();
        for endpoint in [&tickets, &categories] {
            receivers.push(cache.subscribe(&key(endpoint), endpoint));
            let id = cache.next_fetch_id();
            cache.begin(&key(endpoint), endpoint, id, pending());
            cache.settle(&key(endpoint), id, &Ok(Arc::new(json!([]))));
        }
        assert_eq!(cache.len(), 2);

        let refetch = cache.invalidate(Endpoint::CreatePayment.invalidates());
        assert_eq!(refetch, vec![tickets.clone()]);
        assert!(cache.contains(&key(&tickets)));
        assert!(cache.contains(&key(&categories)));
    }

    #[test]
    fn test_invalidated_mid_flight_refetches_after_settle() {
        let mut cache = QueryCache::default();
        let endpoint = Endpoint::OwnFavorites;
        let k = key(&endpoint);
        let _rx = cache.subscribe(&k, &endpoint);
        let id = cache.next_fetch_id();
        cache.begin(&k, &endpoint, id, pending());

        assert!(cache.invalidate(&[ResourceType::Favorite]).is_empty());
        let again = cache.settle(&k, id, &Ok(Arc::new(json!([]))));
        assert_eq!(again, Some(endpoint));
    }

    #[test]
    fn test_reset_discards_in_flight_result() {
        let mut cache = QueryCache::default();
        let endpoint = Endpoint::OwnTickets;
        let k = key(&endpoint);
        let rx = cache.subscribe(&k, &endpoint);
        let id = cache.next_fetch_id();
        cache.begin(&k, &endpoint, id, pending());

        cache.reset();
        cache.settle(&k, id, &Ok(Arc::new(json!(["old user's tickets"]))));
        assert_eq!(*rx.borrow(), EntrySnapshot::default());
        assert!(cache.needs_fetch(&k));
    }
}
