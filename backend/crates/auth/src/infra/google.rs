//! Google ID Token Verification
//!
//! Verifies the RS256 signature of a Google ID token against Google's
//! published JWKS, plus issuer and audience. Keys are cached and
//! refreshed when an unknown `kid` shows up or the cache goes stale.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use jsonwebtoken::{Algorithm, DecodingKey, Validation};
use serde::Deserialize;
use tokio::sync::RwLock;

use crate::application::google::{GoogleClaims, IdTokenVerifier};

const GOOGLE_JWKS_URL: &str = "https://www.googleapis.com/oauth2/v3/certs";
const GOOGLE_ISSUERS: [&str; 2] = ["https://accounts.google.com", "accounts.google.com"];
const KEY_CACHE_TTL: Duration = Duration::from_secs(60 * 60);

#[derive(Debug, Deserialize)]
struct JwkSet {
    keys: Vec<Jwk>,
}

#[derive(Debug, Deserialize)]
struct Jwk {
    kid: String,
    n: String,
    e: String,
}

#[derive(Debug, Deserialize)]
struct IdTokenPayload {
    sub: String,
    email: Option<String>,
    given_name: Option<String>,
    family_name: Option<String>,
}

struct CachedKeys {
    keys: HashMap<String, (String, String)>,
    fetched_at: Instant,
}

/// JWKS-backed verifier for Google ID tokens.
pub struct GoogleJwksVerifier {
    http: reqwest::Client,
    client_id: String,
    cache: Arc<RwLock<Option<CachedKeys>>>,
}

impl GoogleJwksVerifier {
    pub fn new(client_id: String) -> Self {
        Self {
            http: reqwest::Client::new(),
            client_id,
            cache: Arc::new(RwLock::new(None)),
        }
    }

    async fn rsa_components(&self, kid: &str) -> Result<(String, String), String> {
        {
            let cache = self.cache.read().await;
            if let Some(cached) = cache.as_ref() {
                if cached.fetched_at.elapsed() < KEY_CACHE_TTL {
                    if let Some(components) = cached.keys.get(kid) {
                        return Ok(components.clone());
                    }
                }
            }
        }

        // Miss or stale: refetch the key set.
        let jwks: JwkSet = self
            .http
            .get(GOOGLE_JWKS_URL)
            .send()
            .await
            .map_err(|e| format!("JWKS fetch failed: {e}"))?
            .json()
            .await
            .map_err(|e| format!("JWKS parse failed: {e}"))?;

        let keys: HashMap<String, (String, String)> = jwks
            .keys
            .into_iter()
            .map(|k| (k.kid, (k.n, k.e)))
            .collect();

        let components = keys.get(kid).cloned();
        *self.cache.write().await = Some(CachedKeys {
            keys,
            fetched_at: Instant::now(),
        });

        components.ok_or_else(|| format!("no JWKS key for kid {kid}"))
    }
}

impl IdTokenVerifier for GoogleJwksVerifier {
    async fn verify(&self, id_token: &str) -> Result<GoogleClaims, String> {
        let header = jsonwebtoken::decode_header(id_token)
            .map_err(|e| format!("malformed token header: {e}"))?;
        let kid = header.kid.ok_or("token header missing kid")?;

        let (n, e) = self.rsa_components(&kid).await?;
        let key = DecodingKey::from_rsa_components(&n, &e)
            .map_err(|e| format!("bad JWKS key material: {e}"))?;

        let mut validation = Validation::new(Algorithm::RS256);
        validation.set_audience(&[self.client_id.as_str()]);
        validation.set_issuer(&GOOGLE_ISSUERS);

        let payload = jsonwebtoken::decode::<IdTokenPayload>(id_token, &key, &validation)
            .map_err(|e| format!("token verification failed: {e}"))?
            .claims;

        let email = payload.email.ok_or("token carries no email claim")?;

        Ok(GoogleClaims {
            sub: payload.sub,
            email,
            given_name: payload.given_name,
            family_name: payload.family_name,
        })
    }
}
