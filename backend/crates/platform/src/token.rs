//! JWT access/refresh token issuance and verification
//!
//! Both tokens are HS256 JWTs signed with the same secret, distinguished by
//! a `token_use` claim so a refresh token can never be replayed as an access
//! token (or vice versa). Expiry is distinguished from any other validation
//! failure so clients know when to attempt a refresh.

use chrono::Utc;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// Default access token lifetime: 7 days (long for an "access" token, but
/// the platform's frontend relies on it; configurable via `AuthConfig`).
pub const DEFAULT_ACCESS_TTL_SECS: i64 = 7 * 24 * 60 * 60;

/// Refresh token lifetime is fixed at 30 days.
pub const REFRESH_TTL_SECS: i64 = 30 * 24 * 60 * 60;

/// Discriminator claim separating the two token flavors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TokenUse {
    Access,
    Refresh,
}

/// Claims embedded in every issued token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenClaims {
    /// Subject - user ID (UUID string).
    pub sub: String,
    /// Role code at issuance time (informational; the middleware reloads
    /// the user, so a stale role here cannot widen access).
    pub role: String,
    /// Access/refresh discriminator.
    pub token_use: TokenUse,
    /// Issued-at (Unix timestamp).
    pub iat: i64,
    /// Expiration (Unix timestamp).
    pub exp: i64,
}

impl TokenClaims {
    /// Parse the subject back into a UUID.
    pub fn user_id(&self) -> Result<Uuid, TokenError> {
        self.sub
            .parse()
            .map_err(|_| TokenError::Invalid("malformed subject".to_string()))
    }
}

/// An access/refresh token pair.
#[derive(Debug, Clone)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
}

/// Token verification/issuance errors.
#[derive(Debug, Clone, Error)]
pub enum TokenError {
    /// Signature valid but the token has expired.
    #[error("Token expired")]
    Expired,

    /// Malformed token, bad signature, or unparseable claims.
    #[error("Invalid token: {0}")]
    Invalid(String),

    /// Structurally valid token presented for the wrong use
    /// (e.g. an access token at the refresh endpoint).
    #[error("Token presented for wrong use")]
    WrongUse,
}

/// Issues and verifies the platform's token pairs.
#[derive(Clone)]
pub struct TokenService {
    encoding: EncodingKey,
    decoding: DecodingKey,
    access_ttl_secs: i64,
}

impl TokenService {
    pub fn new(secret: &str, access_ttl_secs: i64) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            access_ttl_secs,
        }
    }

    /// Issue an access + refresh pair for a user.
    pub fn issue_pair(&self, user_id: Uuid, role: &str) -> Result<TokenPair, TokenError> {
        let now = Utc::now().timestamp();

        let access = self.encode(TokenClaims {
            sub: user_id.to_string(),
            role: role.to_string(),
            token_use: TokenUse::Access,
            iat: now,
            exp: now + self.access_ttl_secs,
        })?;

        let refresh = self.encode(TokenClaims {
            sub: user_id.to_string(),
            role: role.to_string(),
            token_use: TokenUse::Refresh,
            iat: now,
            exp: now + REFRESH_TTL_SECS,
        })?;

        Ok(TokenPair {
            access_token: access,
            refresh_token: refresh,
        })
    }

    /// Verify signature and expiry, returning the claims.
    pub fn verify(&self, token: &str) -> Result<TokenClaims, TokenError> {
        let validation = Validation::new(Algorithm::HS256);

        jsonwebtoken::decode::<TokenClaims>(token, &self.decoding, &validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                jsonwebtoken::errors::ErrorKind::ExpiredSignature => TokenError::Expired,
                _ => TokenError::Invalid(e.to_string()),
            })
    }

    /// Verify an access token; refuses refresh tokens.
    pub fn verify_access(&self, token: &str) -> Result<TokenClaims, TokenError> {
        let claims = self.verify(token)?;
        if claims.token_use != TokenUse::Access {
            return Err(TokenError::WrongUse);
        }
        Ok(claims)
    }

    /// Verify a refresh token; refuses access tokens.
    pub fn verify_refresh(&self, token: &str) -> Result<TokenClaims, TokenError> {
        let claims = self.verify(token)?;
        if claims.token_use != TokenUse::Refresh {
            return Err(TokenError::WrongUse);
        }
        Ok(claims)
    }

    fn encode(&self, claims: TokenClaims) -> Result<String, TokenError> {
        jsonwebtoken::encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
            .map_err(|e| TokenError::Invalid(e.to_string()))
    }
}
