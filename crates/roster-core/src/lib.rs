//! Roster Core Library
//!
//! Error taxonomy, the storage port every backend implements, and the
//! validation rules applied before a record reaches a store.

// Re-export pure types from roster-types
pub use roster_types::*;

pub mod error;
pub mod ports;
pub mod validation;

pub use error::{Result, RosterError};
pub use ports::UserStore;
pub use validation::{validate_for_create, validate_for_update};
