//! # Resource client
//!
//! [`ApiClient`] turns an [`Endpoint`] plus a [`RequestBody`] into one HTTP
//! exchange against the configured base URL and returns the normalized
//! [`Envelope`]. It attaches the persisted access token as a bearer header and
//! handles an expired token with exactly one silent refresh.
//!
//! ## Request lifecycle
//!
//! Each call walks the [`RequestState`] machine:
//!
//! ```text
//! Idle -> InFlight -> Success
//!                  -> Failed
//!                  -> RefreshingAuth -> Failed            (refresh rejected)
//!                                    -> Retrying -> Success
//!                                                -> Failed
//! ```
//!
//! `Retrying` has no path back to `RefreshingAuth`, so a second 401 is surfaced
//! as-is. Whenever the session is found to be dead (refresh rejected, or the
//! retry also answered 401) the persisted tokens and the [`SessionStore`] are
//! cleared before the original error is returned.
//!
//! Concurrent 401s share a refresh: refreshes are serialized by a lock, and a
//! caller that acquires it after another has already rotated the token simply
//! retries with the new one.

use std::sync::Arc;
use std::time::Duration;

use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{json, Value};
use store::{ApiConfig, SessionStore, TokenStorage};
use tokio::sync::Mutex;

use crate::endpoint::Endpoint;
use crate::envelope::Envelope;
use crate::error::{ApiError, ErrorBody};
use crate::jwt;
use crate::transport::{HttpRequest, HttpResponse, RequestBody, ReqwestTransport, Transport};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestState {
    Idle,
    InFlight,
    RefreshingAuth,
    Retrying,
    Success,
    Failed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestEvent {
    Send,
    Succeeded,
    Failed,
    Unauthorized { refreshable: bool },
    Refreshed,
    RefreshFailed,
}

impl RequestState {
    /// Pure transition function. Terminal states absorb every event.
    pub fn on(self, event: RequestEvent) -> RequestState {
        use RequestEvent as E;
        use RequestState as S;
        match (self, event) {
            (S::Idle, E::Send) => S::InFlight,
            (S::InFlight, E::Succeeded) => S::Success,
            (S::InFlight, E::Unauthorized { refreshable: true }) => S::RefreshingAuth,
            (S::InFlight, E::Failed | E::Unauthorized { refreshable: false }) => S::Failed,
            (S::RefreshingAuth, E::Refreshed) => S::Retrying,
            (S::RefreshingAuth, E::RefreshFailed) => S::Failed,
            (S::Retrying, E::Succeeded) => S::Success,
            (S::Retrying, E::Failed | E::Unauthorized { .. }) => S::Failed,
            (state, _) => state,
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, RequestState::Success | RequestState::Failed)
    }
}

/// Token pair returned by login and refresh.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenPair {
    #[serde(alias = "token")]
    pub access_token: String,
    #[serde(default)]
    pub refresh_token: String,
}

struct Inner {
    base_url: String,
    timeout: Duration,
    transport: Arc<dyn Transport>,
    tokens: TokenStorage,
    session: SessionStore,
    refresh_lock: Mutex<()>,
}

#[derive(Clone)]
pub struct ApiClient {
    inner: Arc<Inner>,
}

impl ApiClient {
    /// Client over the real network.
    pub fn new(
        config: &ApiConfig,
        tokens: TokenStorage,
        session: SessionStore,
    ) -> Result<Self, ApiError> {
        let transport = ReqwestTransport::new()?;
        Ok(Self::with_transport(config, transport, tokens, session))
    }

    pub fn with_transport(
        config: &ApiConfig,
        transport: impl Transport + 'static,
        tokens: TokenStorage,
        session: SessionStore,
    ) -> Self {
        Self {
            inner: Arc::new(Inner {
                base_url: config.base_url.trim_end_matches('/').to_string(),
                timeout: config.timeout(),
                transport: Arc::new(transport),
                tokens,
                session,
                refresh_lock: Mutex::new(()),
            }),
        }
    }

    pub fn tokens(&self) -> &TokenStorage {
        &self.inner.tokens
    }

    pub fn session(&self) -> &SessionStore {
        &self.inner.session
    }

    pub fn base_url(&self) -> &str {
        &self.inner.base_url
    }

    /// Perform `endpoint` and return the envelope's `data`.
    pub async fn request(&self, endpoint: &Endpoint, body: RequestBody) -> Result<Value, ApiError> {
        self.envelope(endpoint, body).await?.into_data()
    }

    pub async fn request_as<T: DeserializeOwned>(
        &self,
        endpoint: &Endpoint,
        body: RequestBody,
    ) -> Result<T, ApiError> {
        self.envelope(endpoint, body).await?.decode()?.into_data()
    }

    /// Perform `endpoint`, driving the request state machine to completion.
    pub async fn envelope(
        &self,
        endpoint: &Endpoint,
        body: RequestBody,
    ) -> Result<Envelope<Value>, ApiError> {
        let mut token = self.inner.tokens.access_token().await;
        let mut state = RequestState::Idle.on(RequestEvent::Send);

        loop {
            let result = self.send_once(endpoint, &body, token.clone()).await;
            let previous = state;
            state = state.on(match &result {
                Ok(_) => RequestEvent::Succeeded,
                Err(e) if e.is_unauthorized() => RequestEvent::Unauthorized {
                    refreshable: endpoint.allows_refresh(),
                },
                Err(_) => RequestEvent::Failed,
            });
            tracing::debug!("{} {:?} -> {:?}", endpoint, previous, state);

            match state {
                RequestState::RefreshingAuth => match self.refresh(token.as_deref()).await {
                    Ok(fresh) => {
                        state = state.on(RequestEvent::Refreshed);
                        tracing::debug!("{} retrying with refreshed token", endpoint);
                        token = Some(fresh);
                    }
                    Err(e) => {
                        let failed = state.on(RequestEvent::RefreshFailed);
                        tracing::debug!("{} {:?} -> {:?}", endpoint, state, failed);
                        tracing::warn!("Token refresh failed, signing out: {}", e);
                        self.clear_local_auth().await;
                        return result;
                    }
                },
                RequestState::Failed => {
                    if previous == RequestState::Retrying
                        && result.as_ref().is_err_and(ApiError::is_unauthorized)
                    {
                        tracing::warn!("{} still unauthorized after refresh, signing out", endpoint);
                        self.clear_local_auth().await;
                    }
                    return result;
                }
                _ => return result,
            }
        }
    }

    async fn send_once(
        &self,
        endpoint: &Endpoint,
        body: &RequestBody,
        bearer: Option<String>,
    ) -> Result<Envelope<Value>, ApiError> {
        let request = HttpRequest {
            method: endpoint.method(),
            url: format!("{}{}", self.inner.base_url, endpoint.path()),
            query: endpoint.query(),
            bearer,
            body: body.clone(),
        };

        let response =
            match tokio::time::timeout(self.inner.timeout, self.inner.transport.send(request)).await
            {
                Ok(response) => response?,
                Err(_) => return Err(ApiError::Timeout(self.inner.timeout)),
            };
        parse_response(response)
    }

    /// Obtain a usable access token after `stale` was rejected.
    async fn refresh(&self, stale: Option<&str>) -> Result<String, ApiError> {
        let _guard = self.inner.refresh_lock.lock().await;

        let current = self.inner.tokens.access_token().await;
        if let Some(current) = current.filter(|c| Some(c.as_str()) != stale) {
            tracing::debug!("Token already refreshed by a concurrent request");
            return Ok(current);
        }

        let refresh_token = self.inner.tokens.refresh_token().await.ok_or(ApiError::Http {
            status: 401,
            body: ErrorBody::Text("no refresh token".into()),
        })?;
        let body = RequestBody::Json(json!({ "refreshToken": refresh_token }));
        let pair: TokenPair = self
            .send_once(&Endpoint::RefreshToken, &body, None)
            .await?
            .decode()?
            .into_data()?;
        let refresh_token = if pair.refresh_token.is_empty() {
            refresh_token
        } else {
            pair.refresh_token
        };

        self.store_tokens(&pair.access_token, &refresh_token).await?;
        tracing::info!("Access token refreshed");
        Ok(pair.access_token)
    }

    /// Persist a token pair and publish it, together with the user decoded
    /// from the access token, to the session.
    pub(crate) async fn store_tokens(
        &self,
        access_token: &str,
        refresh_token: &str,
    ) -> Result<store::User, ApiError> {
        let user = jwt::decode_user(access_token)?;
        let tokens = &self.inner.tokens;
        tokens.save_tokens(access_token, refresh_token).await?;
        if let Err(e) = tokens.save_user(&user).await {
            tracing::warn!("Failed to persist user: {}", e);
        }
        self.inner.session.set_token(access_token, refresh_token);
        self.inner.session.set_user(user.clone());
        Ok(user)
    }

    pub(crate) async fn clear_local_auth(&self) {
        self.inner.tokens.clear().await;
        self.inner.session.clear_auth();
    }
}

fn parse_response(response: HttpResponse) -> Result<Envelope<Value>, ApiError> {
    if !response.is_success() {
        return Err(ApiError::Http {
            status: response.status,
            body: ErrorBody::parse(&response.body),
        });
    }
    if response.body.trim().is_empty() {
        return Ok(Envelope {
            success: true,
            message: String::new(),
            data: Some(Value::Null),
            errors: Default::default(),
        });
    }
    let envelope: Envelope<Value> =
        serde_json::from_str(&response.body).map_err(|e| ApiError::Decode(e.to_string()))?;
    envelope.into_result()
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.inner.base_url)
            .field("timeout", &self.inner.timeout)
            .finish_non_exhaustive()
    }
}
