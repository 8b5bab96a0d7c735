//! Payload validation
//!
//! Runs before a record is handed to a store, so both backends only ever
//! see payloads that passed the same rules.

use crate::{Result, RosterError};
use roster_types::{NewUser, User};

pub fn validate_for_create(user: &NewUser) -> Result<()> {
    validate_email(&user.email)
}

/// Checks the merged record of a full or partial update.
pub fn validate_for_update(user: &User) -> Result<()> {
    validate_email(&user.email)
}

fn validate_email(email: &str) -> Result<()> {
    let email = email.trim();
    if email.is_empty() {
        return Err(RosterError::Validation("email is required".to_string()));
    }
    if !email.contains('@') {
        return Err(RosterError::Validation(format!(
            "invalid email address: {}",
            email
        )));
    }
    Ok(())
}
