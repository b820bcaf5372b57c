//! Bearer token issuing and validation (HS256 JWT)

use std::time::Duration;

use chrono::Utc;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use fintrack_core::models::Role;

/// Identity attached to every authenticated request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthUser {
    pub id: i64,
    pub role: Role,
}

impl AuthUser {
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    /// User ID
    sub: String,
    role: Role,
    /// Expiry as a unix timestamp
    exp: i64,
}

/// Sign a token for `user_id` valid for `ttl`
pub fn issue_token(
    user_id: i64,
    role: Role,
    secret: &str,
    ttl: Duration,
) -> jsonwebtoken::errors::Result<String> {
    let ttl_secs = i64::try_from(ttl.as_secs()).unwrap_or(i64::MAX);
    let claims = Claims {
        sub: user_id.to_string(),
        role,
        exp: Utc::now().timestamp().saturating_add(ttl_secs),
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
}

/// Verify signature and expiry, returning the identity the token carries
pub fn decode_token(token: &str, secret: &str) -> jsonwebtoken::errors::Result<AuthUser> {
    let data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )?;

    let id = data
        .claims
        .sub
        .parse()
        .map_err(|_| jsonwebtoken::errors::ErrorKind::InvalidSubject)?;

    Ok(AuthUser {
        id,
        role: data.claims.role,
    })
}
