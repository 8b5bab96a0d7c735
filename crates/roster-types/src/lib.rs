//! Roster Types - Pure data definitions
//!
//! This crate contains only plain serde types with no async runtime or
//! storage dependencies, shared by the core and server crates.

pub mod auth;
pub mod user;

pub use auth::*;
pub use user::*;
