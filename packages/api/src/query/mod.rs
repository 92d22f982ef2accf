//! # Resource cache and query layer
//!
//! [`QueryClient`] sits between screens and [`ApiClient`]. It keeps one cache
//! entry per [`QueryKey`] and guarantees at most one request in flight per
//! key: concurrent callers join the running request and all resolve with the
//! same result.
//!
//! | Operation | Behavior |
//! |-----------|----------|
//! | [`query`](QueryClient::query) | Eager. Subscribes and starts a request unless data is cached or `skip` is set. Returns a [`QueryHandle`]. |
//! | [`fetch`](QueryClient::fetch) | Lazy. Issues (or joins) a request and resolves with its data or rejects with its error. |
//! | [`mutate`](QueryClient::mutate) | Uncached call; on success invalidates [`Endpoint::invalidates`]. |
//! | [`invalidate`](QueryClient::invalidate) | Subscribed entries refetch, unsubscribed ones are evicted. |
//! | [`reset`](QueryClient::reset) | Drops every payload (logout). Results still in flight are discarded. |
//!
//! Requests run on spawned tasks, so a screen that goes away mid-request does
//! not cancel it. An entry lives only while something subscribes to it or a
//! request for it is running. Refetching keeps the previous data visible until the new
//! response replaces it.
//!
//! Errors reach screens already reduced by [`ApiError::display_message`].

mod cache;
mod key;

use std::marker::PhantomData;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use futures::FutureExt;
use serde::de::DeserializeOwned;
use tokio::sync::watch;

pub use cache::EntrySnapshot;
pub use key::QueryKey;

use cache::{FetchResult, QueryCache, SharedFetch};

use crate::client::ApiClient;
use crate::endpoint::{Endpoint, ResourceType};
use crate::error::ApiError;
use crate::transport::RequestBody;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct QueryOptions {
    /// Subscribe without requesting, e.g. while a required parameter is unknown.
    pub skip: bool,
}

impl QueryOptions {
    pub fn skip_if(skip: bool) -> Self {
        Self { skip }
    }
}

/// What a screen renders for one query.
#[derive(Debug, Clone, PartialEq)]
pub struct QueryState<T> {
    pub data: Option<T>,
    /// No data yet and a request is running.
    pub is_loading: bool,
    pub is_fetching: bool,
    pub error: Option<String>,
}

impl<T> Default for QueryState<T> {
    fn default() -> Self {
        Self {
            data: None,
            is_loading: false,
            is_fetching: false,
            error: None,
        }
    }
}

impl<T> QueryState<T> {
    fn from_snapshot(snapshot: &EntrySnapshot) -> Self
    where
        T: DeserializeOwned,
    {
        let decoded = snapshot
            .data
            .as_deref()
            .map(|value| T::deserialize(value).map_err(|e| ApiError::Decode(e.to_string())));
        let (data, decode_error) = match decoded {
            Some(Ok(data)) => (Some(data), None),
            Some(Err(e)) => (None, Some(e)),
            None => (None, None),
        };
        let error = snapshot
            .error
            .as_ref()
            .or(decode_error.as_ref())
            .map(ApiError::display_message);
        Self {
            is_loading: data.is_none() && snapshot.is_fetching,
            is_fetching: snapshot.is_fetching,
            data,
            error,
        }
    }

    pub fn has_error(&self) -> bool {
        self.error.is_some()
    }
}

#[derive(Clone)]
pub struct QueryClient {
    api: ApiClient,
    cache: Arc<Mutex<QueryCache>>,
}

impl QueryClient {
    pub fn new(api: ApiClient) -> Self {
        Self {
            api,
            cache: Arc::new(Mutex::new(QueryCache::default())),
        }
    }

    pub fn api(&self) -> &ApiClient {
        &self.api
    }

    fn lock(&self) -> MutexGuard<'_, QueryCache> {
        self.cache.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Subscribe to `endpoint`, starting a request if nothing is cached.
    pub fn query<T: DeserializeOwned>(&self, endpoint: Endpoint, options: QueryOptions) -> QueryHandle<T> {
        let key = QueryKey::for_endpoint(&endpoint);
        let (rx, needs_fetch) = {
            let mut cache = self.lock();
            let rx = cache.subscribe(&key, &endpoint);
            (rx, cache.needs_fetch(&key))
        };
        if needs_fetch && !options.skip {
            self.spawn_fetch(&endpoint);
        }
        QueryHandle {
            client: self.clone(),
            key,
            endpoint,
            rx,
            _marker: PhantomData,
        }
    }

    /// Request `endpoint` now, joining a request already in flight for the
    /// same key.
    pub async fn fetch<T: DeserializeOwned>(&self, endpoint: Endpoint) -> Result<T, ApiError> {
        let value = self.start_fetch(&endpoint).await?;
        T::deserialize(value.as_ref()).map_err(|e| ApiError::Decode(e.to_string()))
    }

    /// Perform a write and invalidate what it affects.
    pub async fn mutate<T: DeserializeOwned>(
        &self,
        endpoint: Endpoint,
        body: RequestBody,
    ) -> Result<T, ApiError> {
        let value = self.api.request(&endpoint, body).await?;
        self.invalidate(endpoint.invalidates());
        T::deserialize(value).map_err(|e| ApiError::Decode(e.to_string()))
    }

    pub fn invalidate(&self, resources: &[ResourceType]) {
        if resources.is_empty() {
            return;
        }
        let refetch = self.lock().invalidate(resources);
        tracing::debug!("Invalidated {:?}, refetching {} entries", resources, refetch.len());
        for endpoint in refetch {
            self.spawn_fetch(&endpoint);
        }
    }

    pub fn reset(&self) {
        self.lock().reset();
        tracing::debug!("Query cache reset");
    }

    /// Number of entries currently held.
    pub fn cached_entries(&self) -> usize {
        self.lock().len()
    }

    pub fn is_cached(&self, endpoint: &Endpoint) -> bool {
        self.lock().contains(&QueryKey::for_endpoint(endpoint))
    }

    pub fn subscriber_count(&self, endpoint: &Endpoint) -> usize {
        self.lock().subscribers(&QueryKey::for_endpoint(endpoint))
    }

    fn start_fetch(&self, endpoint: &Endpoint) -> SharedFetch {
        let key = QueryKey::for_endpoint(endpoint);
        let mut cache = self.lock();
        if let Some(running) = cache.in_flight(&key) {
            tracing::debug!("Joining in-flight request for {}", key);
            return running;
        }

        let id = cache.next_fetch_id();
        let task = {
            let this = self.clone();
            let key = key.clone();
            let endpoint = endpoint.clone();
            tokio::spawn(async move {
                let result: FetchResult = this
                    .api
                    .request(&endpoint, RequestBody::Empty)
                    .await
                    .map(Arc::new);
                let again = this.lock().settle(&key, id, &result);
                if let Some(endpoint) = again {
                    this.spawn_fetch(&endpoint);
                }
                result
            })
        };
        let future = async move {
            task.await
                .unwrap_or_else(|e| Err(ApiError::Network(format!("request task failed: {e}"))))
        }
        .boxed()
        .shared();

        tracing::debug!("Fetching {}", key);
        cache.begin(&key, endpoint, id, future.clone());
        future
    }

    /// Start (or join) a request without waiting for it.
    fn spawn_fetch(&self, endpoint: &Endpoint) {
        let _ = self.start_fetch(endpoint);
    }

    fn unsubscribe(&self, key: &QueryKey) {
        self.lock().unsubscribe(key);
    }
}

impl std::fmt::Debug for QueryClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("QueryClient")
            .field("api", &self.api)
            .finish_non_exhaustive()
    }
}

/// A live subscription to one query. Dropping it unsubscribes.
pub struct QueryHandle<T> {
    client: QueryClient,
    key: QueryKey,
    endpoint: Endpoint,
    rx: watch::Receiver<EntrySnapshot>,
    _marker: PhantomData<fn() -> T>,
}

impl<T: DeserializeOwned> QueryHandle<T> {
    pub fn state(&self) -> QueryState<T> {
        QueryState::from_snapshot(&self.rx.borrow())
    }

    /// Request again, keeping the current data until the response arrives.
    pub fn refetch(&self) {
        self.client.spawn_fetch(&self.endpoint);
    }

    /// Receiver that wakes on every change to this query's entry.
    pub fn watch(&self) -> watch::Receiver<EntrySnapshot> {
        self.rx.clone()
    }

    /// Wait for the next change. Returns `false` once the entry is gone.
    pub async fn changed(&mut self) -> bool {
        self.rx.changed().await.is_ok()
    }

    pub fn key(&self) -> &QueryKey {
        &self.key
    }

    pub fn endpoint(&self) -> &Endpoint {
        &self.endpoint
    }
}

impl<T> Drop for QueryHandle<T> {
    fn drop(&mut self) {
        self.client.unsubscribe(&self.key);
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::client::tests::client;
    use crate::transport::testing::{ok, ScriptedTransport};
    use crate::transport::HttpResponse;
    use serde_json::{json, Value};
    use store::Ticket;

    fn tickets_transport() -> ScriptedTransport {
        let transport = ScriptedTransport::new();
        transport.delay(Duration::from_millis(20)).fallback(|req| {
            let body = if req.url.ends_with("/Payment/create-payment") {
                ok(json!({ "paymentUrl": "https://pay.test/1" }))
            } else {
                ok(json!([{ "ticketId": "t1", "conferenceName": "RustConf" }]))
            };
            Ok(HttpResponse { status: 200, body: body.to_string() })
        });
        transport
    }

    async fn settled<T: DeserializeOwned>(handle: &mut QueryHandle<T>) -> QueryState<T> {
        while handle.state().is_fetching {
            assert!(handle.changed().await);
        }
        handle.state()
    }

    #[tokio::test]
    async fn test_concurrent_fetches_share_one_request() {
        let transport = tickets_transport();
        let queries = QueryClient::new(client(&transport));

        let results = futures::future::join_all(
            (0..5).map(|_| queries.fetch::<Vec<Ticket>>(Endpoint::OwnTickets)),
        )
        .await;

        assert_eq!(transport.count(), 1);
        let first = results[0].as_ref().unwrap();
        for result in &results {
            assert_eq!(result.as_ref().unwrap(), first);
        }
    }

    #[tokio::test]
    async fn test_eager_handles_share_one_request() {
        let transport = tickets_transport();
        let queries = QueryClient::new(client(&transport));

        let mut a = queries.query::<Vec<Ticket>>(Endpoint::OwnTickets, QueryOptions::default());
        let mut b = queries.query::<Vec<Ticket>>(Endpoint::OwnTickets, QueryOptions::default());
        assert!(a.state().is_loading);

        let a_state = settled(&mut a).await;
        let b_state = settled(&mut b).await;
        assert_eq!(transport.count(), 1);
        assert_eq!(a_state.data, b_state.data);
        assert_eq!(a_state.data.unwrap()[0].conference_name, "RustConf");
        assert_eq!(queries.subscriber_count(&Endpoint::OwnTickets), 2);
    }

    #[tokio::test]
    async fn test_skip_does_not_request() {
        let transport = tickets_transport();
        let queries = QueryClient::new(client(&transport));

        let handle = queries.query::<Vec<Ticket>>(Endpoint::OwnTickets, QueryOptions::skip_if(true));
        tokio::time::sleep(Duration::from_millis(30)).await;
        assert_eq!(transport.count(), 0);
        let state = handle.state();
        assert!(!state.is_loading);
        assert_eq!(state.data, None);
    }

    #[tokio::test]
    async fn test_refetch_keeps_previous_data_visible() {
        let transport = tickets_transport();
        let queries = QueryClient::new(client(&transport));
        let mut handle = queries.query::<Vec<Ticket>>(Endpoint::OwnTickets, QueryOptions::default());
        settled(&mut handle).await;

        handle.refetch();
        let during = handle.state();
        assert!(during.is_fetching);
        assert!(!during.is_loading);
        assert!(during.data.is_some());

        let after = settled(&mut handle).await;
        assert!(after.data.is_some());
        assert_eq!(transport.count(), 2);
    }

    #[tokio::test]
    async fn test_unmount_mid_flight_still_completes() {
        let transport = tickets_transport();
        let queries = QueryClient::new(client(&transport));

        let handle = queries.query::<Vec<Ticket>>(Endpoint::OwnTickets, QueryOptions::default());
        drop(handle);
        assert!(queries.is_cached(&Endpoint::OwnTickets));

        tokio::time::sleep(Duration::from_millis(60)).await;
        assert_eq!(transport.count(), 1);
        assert!(!queries.is_cached(&Endpoint::OwnTickets));
    }

    #[tokio::test]
    async fn test_lazy_fetch_leaves_no_entry_behind() {
        let transport = tickets_transport();
        let queries = QueryClient::new(client(&transport));

        for i in 0..50 {
            let _: Value = queries
                .fetch(Endpoint::Conference { id: format!("c{i}") })
                .await
                .unwrap();
        }
        assert_eq!(transport.count(), 50);
        assert_eq!(queries.cached_entries(), 0);
    }

    #[tokio::test]
    async fn test_lazy_fetch_rejects_with_error() {
        let transport = ScriptedTransport::new();
        transport.push_json(404, json!({ "Message": "Conference not found" }));
        let queries = QueryClient::new(client(&transport));

        let err = queries
            .fetch::<Value>(Endpoint::ResearchConference { id: "c9".into() })
            .await
            .unwrap_err();
        assert_eq!(err.status(), Some(404));
        assert_eq!(err.display_message(), "Conference not found");
        assert_eq!(queries.cached_entries(), 0);
    }

    #[tokio::test]
    async fn test_mutation_invalidates_tagged_entries() {
        let transport = tickets_transport();
        let queries = QueryClient::new(client(&transport));

        let mut tickets = queries.query::<Vec<Ticket>>(Endpoint::OwnTickets, QueryOptions::default());
        settled(&mut tickets).await;
        let mut categories = queries.query::<Value>(Endpoint::ConferenceCategories, QueryOptions::default());
        assert!(settled(&mut categories).await.data.is_some_and(|c| c.is_array()));
        assert_eq!(transport.count(), 2);

        let payment: Value = queries
            .mutate(Endpoint::CreatePayment, RequestBody::Json(json!({ "conferenceId": "c1" })))
            .await
            .unwrap();
        assert_eq!(payment["paymentUrl"], "https://pay.test/1");

        // Subscribed tickets refetch; categories are not tagged by a payment.
        assert!(tickets.state().is_fetching);
        settled(&mut tickets).await;
        assert_eq!(transport.count_path("/Ticket/get-own-tickets"), 2);
        assert!(queries.is_cached(&Endpoint::ConferenceCategories));
    }

    #[tokio::test]
    async fn test_error_is_reduced_for_display() {
        let transport = ScriptedTransport::new();
        transport.push_json(500, json!({ "Message": "Database unavailable" }));
        let queries = QueryClient::new(client(&transport));

        let mut handle = queries.query::<Vec<Ticket>>(Endpoint::OwnTickets, QueryOptions::default());
        let state = settled(&mut handle).await;
        assert_eq!(state.error.as_deref(), Some("Database unavailable"));
        assert_eq!(state.data, None);
        assert!(!state.is_loading);
    }

    #[tokio::test]
    async fn test_reset_drops_payloads() {
        let transport = tickets_transport();
        let queries = QueryClient::new(client(&transport));
        let mut handle = queries.query::<Vec<Ticket>>(Endpoint::OwnTickets, QueryOptions::default());
        settled(&mut handle).await;

        queries.reset();
        assert_eq!(handle.state().data, None);
        assert_eq!(queries.cached_entries(), 1);
    }
}
