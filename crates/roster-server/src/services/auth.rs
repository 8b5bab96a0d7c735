//! Authentication service
//!
//! A single configured credential. A successful login yields an HS256 JWT
//! valid for 72 hours.

use anyhow::Result;
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

const TOKEN_TTL_HOURS: i64 = 72;

pub struct AuthService {
    jwt_secret: String,
    login_email: String,
    login_password: String,
}

impl AuthService {
    pub fn new(jwt_secret: String, login_email: String, login_password: String) -> Self {
        Self {
            jwt_secret,
            login_email,
            login_password,
        }
    }

    pub fn login(&self, email: &str, password: &str) -> Result<String> {
        if email != self.login_email || password != self.login_password {
            anyhow::bail!("Invalid credentials");
        }

        let now = Utc::now();
        let claims = Claims {
            name: "Jon Snow".to_string(),
            admin: true,
            iat: now.timestamp(),
            exp: (now + Duration::hours(TOKEN_TTL_HOURS)).timestamp(),
        };

        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.jwt_secret.as_bytes()),
        )?;

        Ok(token)
    }

    pub fn validate_token(&self, token: &str) -> Result<Claims> {
        let token_data = decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.jwt_secret.as_bytes()),
            &Validation::default(),
        )?;

        Ok(token_data.claims)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub name: String,
    pub admin: bool,
    pub iat: i64, // issued at
    pub exp: i64, // expiration time
}
