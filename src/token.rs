use anyhow::Context;
use chrono::{Duration, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    error::{AppError, AppResult},
    models::User,
};

#[derive(Debug, Deserialize, Serialize)]
pub struct Claims {
    pub sub: String,
    pub exp: usize,
}

/// Issues bearer tokens and resolves them back to a user UUID.
///
/// Tokens are HS256 JWTs; the subject is the user's public UUID, so a token
/// never carries the surrogate id or the role. The role is read from the store
/// on every request.
#[derive(Clone)]
pub struct TokenService {
    encoding: EncodingKey,
    decoding: DecodingKey,
    ttl: Duration,
}

impl TokenService {
    pub fn new(secret: &str, ttl_hours: i64) -> anyhow::Result<Self> {
        let ttl = Duration::try_hours(ttl_hours)
            .filter(|ttl| *ttl > Duration::zero())
            .with_context(|| format!("token lifetime of {ttl_hours} hours is out of range"))?;
        Ok(Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            ttl,
        })
    }

    pub fn issue(&self, user: &User) -> AppResult<String> {
        let expiration = Utc::now()
            .checked_add_signed(self.ttl)
            .ok_or_else(|| AppError::Internal(anyhow::anyhow!("Failed to set expiration")))?;

        let claims = Claims {
            sub: user.uuid.to_string(),
            exp: expiration.timestamp() as usize,
        };

        encode(&Header::default(), &claims, &self.encoding)
            .map_err(|e| AppError::Internal(anyhow::anyhow!(e.to_string())))
    }

    /// `None` for malformed, tampered, or expired tokens.
    pub fn verify(&self, token: &str) -> Option<Uuid> {
        let decoded = decode::<Claims>(token, &self.decoding, &Validation::default())
            .map_err(|err| tracing::debug!(error = %err, "bearer token rejected"))
            .ok()?;
        Uuid::parse_str(&decoded.claims.sub).ok()
    }
}
