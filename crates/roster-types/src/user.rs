//! User types

use chrono::{DateTime, SubsecRound, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// User account
///
/// `id` and `created_at` are assigned once by the store and never change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    /// Stored as given. Never written out in responses.
    #[serde(default, skip_serializing)]
    pub password: String,
    pub created_at: DateTime<Utc>,
}

impl User {
    /// Build a fresh record with a new UUID v4 identifier.
    ///
    /// `created_at` is truncated to microseconds, the precision the
    /// persistent backend keeps.
    pub fn new(new_user: NewUser) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            first_name: new_user.first_name,
            last_name: new_user.last_name,
            email: new_user.email,
            password: new_user.password,
            created_at: Utc::now().trunc_subsecs(6),
        }
    }

    /// Merge the fields present in `patch` into this record.
    ///
    /// Fields left as `None` keep their current value.
    pub fn apply_patch(mut self, patch: UserPatch) -> Self {
        if let Some(first_name) = patch.first_name {
            self.first_name = first_name;
        }
        if let Some(last_name) = patch.last_name {
            self.last_name = last_name;
        }
        if let Some(email) = patch.email {
            self.email = email;
        }
        if let Some(password) = patch.password {
            self.password = password;
        }
        self
    }

    /// Replace every mutable field with the values of `new_user`.
    pub fn replace_with(mut self, new_user: NewUser) -> Self {
        self.first_name = new_user.first_name;
        self.last_name = new_user.last_name;
        self.email = new_user.email;
        self.password = new_user.password;
        self
    }
}

/// User creation request
///
/// There is no identifier field: ids are always assigned by the store.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewUser {
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

/// Partial user update
///
/// Unknown keys are dropped by serde. A recognized key holding anything
/// other than a JSON string is treated as absent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserPatch {
    #[serde(default, deserialize_with = "string_or_none")]
    pub first_name: Option<String>,
    #[serde(default, deserialize_with = "string_or_none")]
    pub last_name: Option<String>,
    #[serde(default, deserialize_with = "string_or_none")]
    pub email: Option<String>,
    #[serde(default, deserialize_with = "string_or_none")]
    pub password: Option<String>,
}

impl UserPatch {
    pub fn is_empty(&self) -> bool {
        self.first_name.is_none()
            && self.last_name.is_none()
            && self.email.is_none()
            && self.password.is_none()
    }
}

fn string_or_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(value.as_str().map(str::to_owned))
}
