//! This crate contains all shared UI for the workspace: the session
//! provider, the query hooks and the controls the list screens share.

use dioxus::prelude::*;

mod storage;
pub use storage::make_token_storage;

mod session;
pub use session::{use_session, LogoutButton, SessionError, SessionProvider};

mod query;
pub use query::{
    use_lazy_query, use_mutation, use_query, use_query_client, UseLazyQuery, UseMutation,
    UseQuery,
};

mod file_picker;
pub use file_picker::{mime_for, FilePicker};

mod status;
pub use status::QueryStatus;

mod list_controls;
pub use list_controls::{Badge, Chip, ChipGroup, Pager, SearchBar, SortSelect};

pub const CONFHUB_CSS: Asset = asset!("/assets/confhub.css");
