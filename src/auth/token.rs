//! HS256 session tokens.

use std::time::Duration;

use anyhow::{Context, Result};
use chrono::Utc;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::config::AuthConfig;
use crate::models::User;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Claims {
    /// User id.
    pub sub: String,
    pub username: String,
    pub email: String,
    pub iat: i64,
    pub exp: i64,
}

/// Signing material and cookie policy for session tokens.
#[derive(Clone)]
pub struct SessionKeys {
    encoding: EncodingKey,
    decoding: DecodingKey,
    ttl: Duration,
    secure_cookies: bool,
}

impl SessionKeys {
    pub fn new(config: &AuthConfig) -> Self {
        let secret = config.jwt_secret.as_bytes();

        SessionKeys {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
            ttl: config.session_ttl,
            secure_cookies: config.secure_cookies,
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    pub fn secure_cookies(&self) -> bool {
        self.secure_cookies
    }

    pub fn issue(&self, user: &User) -> Result<String> {
        let now = Utc::now().timestamp();
        let exp = i64::try_from(self.ttl.as_secs())
            .ok()
            .and_then(|ttl| now.checked_add(ttl))
            .context("session lifetime is out of range")?;
        let claims = Claims {
            sub: user.id.to_string(),
            username: user.username.clone(),
            email: user.email.clone(),
            iat: now,
            exp,
        };

        self.sign(&claims)
    }

    pub(crate) fn sign(&self, claims: &Claims) -> Result<String> {
        encode(&Header::default(), claims, &self.encoding).context("failed to sign session token")
    }

    /// Signature, expiry and subject format are all checked.
    pub fn verify(&self, token: &str) -> Result<(Uuid, Claims)> {
        let data = decode::<Claims>(token, &self.decoding, &Validation::default())
            .context("invalid session token")?;
        let user_id = Uuid::parse_str(&data.claims.sub).context("session token subject is not a user id")?;
        Ok((user_id, data.claims))
    }
}
