//! # API crate: the ConfHub client core
//!
//! Everything the app shell needs to talk to the conference backend. Screens
//! never build HTTP requests themselves: they declare an [`Endpoint`] and go
//! through the [`QueryClient`], which deduplicates, caches and invalidates.
//!
//! ## Modules
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`endpoint`] | Route catalogue: method, path, query string, resource type, invalidations |
//! | [`transport`] | `Transport` seam, multipart forms, the `reqwest` implementation |
//! | [`client`] | `ApiClient`: bearer auth, envelope normalization, single silent token refresh |
//! | [`envelope`] | `{ success, message, data, errors }` wrapper and paginated pages |
//! | [`error`] | `ApiError` and the one function that turns any error into display text |
//! | [`query`] | Cache table, in-flight dedup, eager handles, lazy fetch, tag invalidation |
//! | [`auth`] | Login, register, forget password, profile update, logout, session restore |
//! | [`actions`] | Ticket purchase, favorites, paper submission |
//!
//! ## Wiring
//!
//! ```no_run
//! # async fn wire() -> Result<(), api::ApiError> {
//! use api::{ApiClient, QueryClient};
//! use store::{AppConfig, MemoryStore, SessionStore, TokenStorage};
//!
//! let config = AppConfig::default();
//! let tokens = TokenStorage::new(MemoryStore::new());
//! let session = SessionStore::new();
//! let api = ApiClient::new(&config.api, tokens, session)?;
//! api::auth::restore_session(&api).await;
//! let queries = QueryClient::new(api);
//! # let _ = queries;
//! # Ok(())
//! # }
//! ```

pub mod actions;
pub mod auth;
pub mod client;
pub mod endpoint;
pub mod envelope;
pub mod error;
pub mod jwt;
pub mod query;
pub mod transport;

pub use client::{ApiClient, RequestState, TokenPair};
pub use endpoint::{ConferenceQuery, Endpoint, Method, ResourceType};
pub use envelope::{Envelope, Paginated};
pub use error::{ApiError, ErrorBody, GENERIC_ERROR_MESSAGE};
pub use query::{QueryClient, QueryHandle, QueryKey, QueryOptions, QueryState};
pub use transport::{FilePart, MultipartForm, RequestBody, ReqwestTransport, Transport};

pub use store::{
    Conference, ConferenceCategory, Paper, Session, SessionStore, Ticket, TokenStorage,
    Transaction, User,
};
