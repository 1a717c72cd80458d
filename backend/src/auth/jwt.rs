//! JWT token generation and validation
//!
//! Keys are derived once from the configured secret and shared through
//! `AppState`.

use anyhow::Result;
use chrono::{Duration, Utc};
use foodgram_shared::AuthError;
use jsonwebtoken::{
    decode, encode, errors::ErrorKind, DecodingKey, EncodingKey, Header, Validation,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

/// Which flow a token was issued for
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum TokenKind {
    Access,
    Refresh,
}

/// JWT claims
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (user ID)
    pub sub: String,
    /// Expiration time (Unix timestamp)
    pub exp: i64,
    /// Issued at (Unix timestamp)
    pub iat: i64,
    pub token_type: TokenKind,
}

impl Claims {
    /// Parse the subject back into a user id
    pub fn user_id(&self) -> Result<Uuid, AuthError> {
        Uuid::parse_str(&self.sub).map_err(|_| AuthError::InvalidToken)
    }
}

#[derive(Clone)]
struct JwtKeys {
    encoding: Arc<EncodingKey>,
    decoding: Arc<DecodingKey>,
}

/// JWT service for token operations
#[derive(Clone)]
pub struct JwtService {
    keys: JwtKeys,
    access_token_expiry_secs: i64,
    refresh_token_expiry_secs: i64,
}

impl JwtService {
    /// Create a new JWT service with pre-computed keys
    ///
    /// Call this once at application startup and store in AppState.
    pub fn new(secret: &str, access_token_expiry_secs: i64, refresh_token_expiry_secs: i64) -> Self {
        Self {
            keys: JwtKeys {
                encoding: Arc::new(EncodingKey::from_secret(secret.as_bytes())),
                decoding: Arc::new(DecodingKey::from_secret(secret.as_bytes())),
            },
            access_token_expiry_secs,
            refresh_token_expiry_secs,
        }
    }

    #[inline]
    pub fn generate_access_token(&self, user_id: Uuid) -> Result<String> {
        self.generate_token(user_id, TokenKind::Access, self.access_token_expiry_secs)
    }

    #[inline]
    pub fn generate_refresh_token(&self, user_id: Uuid) -> Result<String> {
        self.generate_token(user_id, TokenKind::Refresh, self.refresh_token_expiry_secs)
    }

    fn generate_token(&self, user_id: Uuid, kind: TokenKind, expiry_secs: i64) -> Result<String> {
        let now = Utc::now();
        let exp = now + Duration::seconds(expiry_secs);

        let claims = Claims {
            sub: user_id.to_string(),
            exp: exp.timestamp(),
            iat: now.timestamp(),
            token_type: kind,
        };

        encode(&Header::default(), &claims, &self.keys.encoding)
            .map_err(|e| anyhow::anyhow!("Failed to generate {:?} token: {}", kind, e))
    }

    /// Validate signature and expiry, then check the token kind
    pub fn validate(&self, token: &str, expected: TokenKind) -> Result<Claims, AuthError> {
        let claims = decode::<Claims>(token, &self.keys.decoding, &Validation::default())
            .map_err(|e| match e.kind() {
                ErrorKind::ExpiredSignature => AuthError::TokenExpired,
                _ => AuthError::InvalidToken,
            })?
            .claims;

        if claims.token_type != expected {
            return Err(AuthError::InvalidToken);
        }
        Ok(claims)
    }

    #[inline]
    pub fn validate_access_token(&self, token: &str) -> Result<Claims, AuthError> {
        self.validate(token, TokenKind::Access)
    }

    #[inline]
    pub fn validate_refresh_token(&self, token: &str) -> Result<Claims, AuthError> {
        self.validate(token, TokenKind::Refresh)
    }

    #[inline]
    pub fn access_token_expiry_secs(&self) -> i64 {
        self.access_token_expiry_secs
    }
}
