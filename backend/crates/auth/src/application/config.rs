//! Application Configuration
//!
//! Configuration for the Auth application layer, loaded from the
//! environment at startup.

use kernel::error::app_error::{AppError, AppResult};
use platform::token::{DEFAULT_ACCESS_TTL_SECS, TokenService};

use crate::domain::value_object::email::Email;

/// Auth application configuration
#[derive(Debug, Clone)]
pub struct AuthConfig {
    /// HS256 signing secret for access/refresh tokens
    pub jwt_secret: String,
    /// Access token lifetime in seconds
    pub access_ttl_secs: i64,
    /// The bootstrap admin account; it cannot be modified or suspended
    /// through the admin API by anyone but itself.
    pub primary_admin_email: Email,
    /// Expected `aud` claim on Google ID tokens
    pub google_client_id: Option<String>,
}

impl AuthConfig {
    /// Load from environment. `JWT_SECRET` is mandatory; everything else
    /// has a default.
    pub fn from_env() -> AppResult<Self> {
        let jwt_secret = std::env::var("JWT_SECRET")
            .map_err(|_| AppError::internal("JWT_SECRET must be set"))?;

        let access_ttl_secs = match std::env::var("ACCESS_TOKEN_TTL_SECS") {
            Ok(raw) => raw
                .parse()
                .map_err(|_| AppError::internal("ACCESS_TOKEN_TTL_SECS must be an integer"))?,
            Err(_) => DEFAULT_ACCESS_TTL_SECS,
        };

        let primary_admin_email = Email::new(
            std::env::var("PRIMARY_ADMIN_EMAIL").unwrap_or_else(|_| "admin@freip.com".to_string()),
        )?;

        let google_client_id = std::env::var("GOOGLE_CLIENT_ID").ok();

        Ok(Self {
            jwt_secret,
            access_ttl_secs,
            primary_admin_email,
            google_client_id,
        })
    }

    /// Build the token service from this config.
    pub fn token_service(&self) -> TokenService {
        TokenService::new(&self.jwt_secret, self.access_ttl_secs)
    }

    pub fn is_primary_admin(&self, email: &Email) -> bool {
        *email == self.primary_admin_email
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> AuthConfig {
        AuthConfig {
            jwt_secret: "test-secret".to_string(),
            access_ttl_secs: DEFAULT_ACCESS_TTL_SECS,
            primary_admin_email: Email::new("admin@freip.com").unwrap(),
            google_client_id: None,
        }
    }

    #[test]
    fn test_primary_admin_check() {
        let config = config();
        assert!(config.is_primary_admin(&Email::new("Admin@FREIP.com").unwrap()));
        assert!(!config.is_primary_admin(&Email::new("other@freip.com").unwrap()));
    }
}
