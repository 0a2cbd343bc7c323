//! Shared-secret JWT adapter for bearer token validation.
//!
//! Tokens are issued by the external login service and signed with HS256.
//! The actor handle is the login name, read from the `name` claim with
//! `sub` as fallback.
//!
//! # Example
//!
//! ```ignore
//! let validator = JwtSessionValidator::new(&config.auth.jwt_secret)
//!     .with_issuer("trip-login")
//!     .with_leeway(30);
//! let user = validator.validate("eyJ...").await?;
//! ```

use async_trait::async_trait;
use jsonwebtoken::{decode, errors::ErrorKind, Algorithm, DecodingKey, Validation};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};

use crate::domain::foundation::{ActorHandle, AuthError, AuthenticatedUser};
use crate::ports::SessionValidator;

/// Claims read from a login token.
#[derive(Debug, Serialize, Deserialize)]
struct LoginClaims {
    sub: String,

    /// Login handle
    #[serde(default)]
    name: Option<String>,

    /// Human readable name, for logs only
    #[serde(default)]
    display_name: Option<String>,

    exp: i64,
}

/// HS256 session validator.
pub struct JwtSessionValidator {
    decoding_key: DecodingKey,
    issuer: Option<String>,
    audience: Option<String>,
    leeway_secs: u64,
}

impl JwtSessionValidator {
    pub fn new(secret: &SecretString) -> Self {
        Self {
            decoding_key: DecodingKey::from_secret(secret.expose_secret().as_bytes()),
            issuer: None,
            audience: None,
            leeway_secs: 60,
        }
    }

    /// Require the `iss` claim to match.
    pub fn with_issuer(mut self, issuer: impl Into<String>) -> Self {
        self.issuer = Some(issuer.into());
        self
    }

    /// Require the `aud` claim to contain `audience`.
    pub fn with_audience(mut self, audience: impl Into<String>) -> Self {
        self.audience = Some(audience.into());
        self
    }

    /// Clock skew tolerated on `exp`.
    pub fn with_leeway(mut self, leeway_secs: u64) -> Self {
        self.leeway_secs = leeway_secs;
        self
    }

    fn validation(&self) -> Validation {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = self.leeway_secs;
        validation.validate_exp = true;

        if let Some(issuer) = &self.issuer {
            validation.set_issuer(&[issuer]);
        }
        match &self.audience {
            Some(audience) => validation.set_audience(&[audience]),
            None => validation.validate_aud = false,
        }

        validation
    }
}

#[async_trait]
impl SessionValidator for JwtSessionValidator {
    async fn validate(&self, token: &str) -> Result<AuthenticatedUser, AuthError> {
        let data = decode::<LoginClaims>(token, &self.decoding_key, &self.validation()).map_err(
            |e| match e.kind() {
                ErrorKind::ExpiredSignature => {
                    tracing::debug!("Token expired");
                    AuthError::TokenExpired
                }
                ErrorKind::InvalidIssuer | ErrorKind::InvalidAudience => {
                    tracing::warn!("Token issued for another party: {}", e);
                    AuthError::InvalidToken
                }
                _ => {
                    tracing::warn!("Token validation failed: {}", e);
                    AuthError::InvalidToken
                }
            },
        )?;

        let claims = data.claims;
        let login = claims.name.unwrap_or(claims.sub);
        let handle = ActorHandle::new(login).map_err(|_| {
            tracing::warn!("Token carries a blank login handle");
            AuthError::InvalidToken
        })?;

        Ok(AuthenticatedUser::new(handle, claims.display_name))
    }
}

impl std::fmt::Debug for JwtSessionValidator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtSessionValidator")
            .field("issuer", &self.issuer)
            .field("audience", &self.audience)
            .field("leeway_secs", &self.leeway_secs)
            .finish_non_exhaustive()
    }
}
