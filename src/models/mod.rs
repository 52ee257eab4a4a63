// file: src/models/mod.rs
// description: data models module exports
// reference: internal module structure

pub mod outcome;
pub mod user;

pub use outcome::{BatchOutcome, NO_MATCHES_SENTINEL, SearchAnswer};
pub use user::UserRecord;
