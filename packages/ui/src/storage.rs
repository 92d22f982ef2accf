//! Shared token storage constructor for all platforms.
//!
//! Returns a [`store::TokenStorage`] backed by [`store::FileStore`] under the
//! configured data directory, or the platform data dir when none is set:
//! `<data_dir>/confhub/kv/{accessToken,refreshToken,user}`.

use store::{AppConfig, FileStore, TokenStorage};

/// Create the persisted token storage for this device.
pub fn make_token_storage(config: &AppConfig) -> TokenStorage {
    let base = config.storage.resolved_data_dir();
    tracing::debug!("Token storage at {}", base.display());
    TokenStorage::new(FileStore::new(base))
}
