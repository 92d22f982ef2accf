pub mod config;
pub mod kv;
pub mod models;
pub mod session;
pub mod tokens;
pub mod validation;
pub mod views;

mod file_store;
mod memory;
pub use file_store::FileStore;
pub use memory::MemoryStore;

pub use config::{ApiConfig, AppConfig, ConfigError, StorageConfig};
pub use kv::{KeyValueStore, StorageError};
pub use models::{
    CheckIn, Conference, ConferenceCategory, ConferencePrice, ConferenceSession, Paper,
    PaperFeedback, PaperPhase, Ticket, Transaction, User,
};
pub use session::{Session, SessionStore};
pub use tokens::TokenStorage;
pub use validation::ValidationError;
