//! Hooks bridging the [`QueryClient`] cache into Dioxus signals.
//!
//! | Hook | Use |
//! |------|-----|
//! | [`use_query`] | Subscribe a component to an endpoint; re-subscribes when the endpoint changes |
//! | [`use_lazy_query`] | Fetch an endpoint on demand, joining any request already in flight |
//! | [`use_mutation`] | Run a write operation with `pending` and `error` signals |
//!
//! The handle a query holds lives in the component's scope, so unmounting
//! the component unsubscribes it from the cache.

use std::future::Future;
use std::rc::Rc;

use api::{ApiError, Endpoint, QueryClient, QueryHandle, QueryOptions, QueryState};
use dioxus::prelude::*;
use serde::de::DeserializeOwned;

pub fn use_query_client() -> QueryClient {
    use_context::<QueryClient>()
}

/// Reactive view of one query.
pub struct UseQuery<T: 'static> {
    state: Signal<QueryState<T>>,
    handle: Signal<Option<Rc<QueryHandle<T>>>>,
}

impl<T: 'static> Clone for UseQuery<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T: 'static> Copy for UseQuery<T> {}

impl<T: Clone + 'static> UseQuery<T> {
    /// Current state; reading it subscribes the component.
    pub fn state(&self) -> QueryState<T> {
        self.state.read().clone()
    }

    pub fn data(&self) -> Option<T> {
        self.state.read().data.clone()
    }
}

impl<T: DeserializeOwned + 'static> UseQuery<T> {
    /// Request again; current data stays visible until the response lands.
    pub fn refetch(&self) {
        if let Some(handle) = self.handle.peek().as_ref() {
            handle.refetch();
        }
    }
}

/// Subscribe to the endpoint returned by `endpoint`. Returning `None` skips
/// the query (for example while a route parameter is not known yet). Signals
/// read inside `endpoint` are tracked, so changing a page number or search
/// term moves the subscription to the new key.
pub fn use_query<T>(endpoint: impl FnMut() -> Option<Endpoint> + 'static) -> UseQuery<T>
where
    T: DeserializeOwned + Clone + PartialEq + 'static,
{
    let client = use_query_client();
    let mut state = use_signal(QueryState::<T>::default);
    let mut handle = use_signal(|| None::<Rc<QueryHandle<T>>>);
    let endpoint = use_memo(endpoint);

    use_effect(move || {
        let Some(endpoint) = endpoint() else {
            handle.set(None);
            state.set(QueryState::default());
            return;
        };

        let query = Rc::new(client.query::<T>(endpoint, QueryOptions::default()));
        state.set(query.state());
        let mut rx = query.watch();
        let current = Rc::downgrade(&query);
        // Replacing the handle drops the previous subscription.
        handle.set(Some(query));

        spawn(async move {
            while rx.changed().await.is_ok() {
                let Some(query) = current.upgrade() else {
                    break;
                };
                let next = query.state();
                if *state.peek() != next {
                    state.set(next);
                }
            }
        });
    });

    UseQuery { state, handle }
}

/// On-demand query: nothing is requested until [`UseLazyQuery::fetch`].
/// The cache only dedups the request; the entry is gone once it settles, so
/// the result is kept here.
pub struct UseLazyQuery<T: 'static> {
    client: Signal<QueryClient>,
    state: Signal<QueryState<T>>,
}

impl<T: 'static> Clone for UseLazyQuery<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T: 'static> Copy for UseLazyQuery<T> {}

impl<T: DeserializeOwned + Clone + 'static> UseLazyQuery<T> {
    pub fn state(&self) -> QueryState<T> {
        self.state.read().clone()
    }

    /// Fetch `endpoint` and return the decoded data, or `None` on failure
    /// (the message is kept in the state).
    pub async fn fetch(mut self, endpoint: Endpoint) -> Option<T> {
        let client = self.client.peek().clone();
        self.state.with_mut(|s| {
            s.is_fetching = true;
            s.is_loading = s.data.is_none();
            s.error = None;
        });
        let result = client.fetch::<T>(endpoint).await;
        self.state.with_mut(|s| {
            s.is_fetching = false;
            s.is_loading = false;
            match &result {
                Ok(data) => s.data = Some(data.clone()),
                Err(e) => s.error = Some(e.display_message()),
            }
        });
        result.ok()
    }
}

pub fn use_lazy_query<T: 'static>() -> UseLazyQuery<T> {
    let client = use_query_client();
    UseLazyQuery {
        client: use_signal(move || client),
        state: use_signal(QueryState::default),
    }
}

/// State of a write operation started through [`use_mutation`].
pub struct UseMutation {
    pending: Signal<bool>,
    error: Signal<Option<String>>,
}

impl Clone for UseMutation {
    fn clone(&self) -> Self {
        *self
    }
}

impl Copy for UseMutation {}

impl UseMutation {
    pub fn pending(&self) -> bool {
        (self.pending)()
    }

    pub fn error(&self) -> Option<String> {
        (self.error)()
    }

    pub fn clear_error(&mut self) {
        self.error.set(None);
    }

    /// Run `operation`, tracking it in `pending` and recording its error.
    /// Calls made while a previous one is pending are ignored.
    pub async fn run<T, F>(mut self, operation: F) -> Option<T>
    where
        F: Future<Output = Result<T, ApiError>>,
    {
        if *self.pending.peek() {
            return None;
        }
        self.pending.set(true);
        self.error.set(None);
        let result = operation.await;
        self.pending.set(false);
        match result {
            Ok(value) => Some(value),
            Err(e) => {
                tracing::warn!("Mutation failed: {}", e);
                self.error.set(Some(e.display_message()));
                None
            }
        }
    }
}

pub fn use_mutation() -> UseMutation {
    UseMutation {
        pending: use_signal(|| false),
        error: use_signal(|| None),
    }
}
