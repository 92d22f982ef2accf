//! # Domain models for the conference client
//!
//! Every entity here is an immutable snapshot of a backend payload. The client
//! never edits one in place: a mutation goes to the server and the affected
//! queries are fetched again.
//!
//! | Module | Types |
//! |--------|-------|
//! | [`user`] | [`User`] decoded from token claims |
//! | [`conference`] | [`Conference`], [`ConferencePrice`], [`ConferenceSession`], [`ConferenceCategory`] |
//! | [`ticket`] | [`Ticket`], [`CheckIn`] |
//! | [`transaction`] | [`Transaction`] |
//! | [`paper`] | [`Paper`], [`PaperPhase`], [`PaperFeedback`] |
//!
//! All payloads are camelCase JSON. Optional fields default rather than fail, and
//! timestamps go through [`datetime::flexible`].

pub mod conference;
pub mod datetime;
pub mod paper;
pub mod ticket;
pub mod transaction;
pub mod user;

pub use conference::{Conference, ConferenceCategory, ConferencePrice, ConferenceSession};
pub use paper::{Paper, PaperFeedback, PaperPhase};
pub use ticket::{CheckIn, Ticket};
pub use transaction::Transaction;
pub use user::User;
