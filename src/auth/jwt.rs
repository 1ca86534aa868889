//! JWT token issuance and parsing
//!
//! Tokens are HS256-signed and carry the login id as subject plus the role
//! set held at issuance. Signature, structure and expiry failures are
//! distinct error kinds: an expired token is routine, a bad signature may
//! indicate tampering, and callers log them differently.

use crate::{config::AppConfig, error::AppError};
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use secrecy::ExposeSecret;
use serde::{Deserialize, Serialize};

use crate::models::user::Role;

/// JWT claims
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct Claims {
    /// Subject (login id)
    pub sub: String,

    /// Roles held at issuance
    pub roles: Vec<String>,

    /// Issued at (unix seconds)
    pub iat: i64,

    /// Expiration (unix seconds)
    pub exp: i64,
}

/// Token-level failure kinds
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum TokenError {
    /// Structurally not a token we can read
    #[error("malformed token")]
    Malformed,

    /// Structure is fine but the signature does not verify
    #[error("bad token signature")]
    BadSignature,

    /// Signature verifies but the token is past its expiry
    #[error("expired token")]
    Expired,
}

/// JWT service
///
/// Holds the process-wide signing keys, derived once from config at
/// startup. A missing or short secret is fatal here, never per request.
pub struct JwtService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    token_validity_secs: u64,
}

impl JwtService {
    /// Create JWT service from config
    pub fn from_config(config: &AppConfig) -> Result<Self, AppError> {
        let secret = config.security.jwt_secret.expose_secret();

        // HS256 needs at least 32 bytes of key material
        if secret.len() < 32 {
            return Err(AppError::Config("JWT secret too short (min 32 chars)".to_string()));
        }

        let encoding_key = EncodingKey::from_secret(secret.as_bytes());
        let decoding_key = DecodingKey::from_secret(secret.as_bytes());

        Ok(Self {
            encoding_key,
            decoding_key,
            token_validity_secs: config.security.token_validity_secs,
        })
    }

    /// Configured validity, for `expires_in` style responses
    pub fn validity_secs(&self) -> u64 {
        self.token_validity_secs
    }

    /// Issue a token with the configured validity
    pub fn issue(&self, login_id: &str, roles: &[Role]) -> Result<String, AppError> {
        self.issue_with_validity(
            login_id,
            roles,
            Duration::seconds(self.token_validity_secs as i64),
        )
    }

    /// Issue a token with an explicit validity
    pub fn issue_with_validity(
        &self,
        login_id: &str,
        roles: &[Role],
        validity: Duration,
    ) -> Result<String, AppError> {
        let now = Utc::now();
        let expiration = now + validity;

        let claims = Claims {
            sub: login_id.to_string(),
            roles: roles.iter().map(|r| r.as_str().to_string()).collect(),
            iat: now.timestamp(),
            exp: expiration.timestamp(),
        };

        encode(&Header::default(), &claims, &self.encoding_key).map_err(|e| {
            tracing::error!("Failed to encode token: {:?}", e);
            AppError::Internal
        })
    }

    /// Verify signature and expiry, returning the claims
    pub fn parse(&self, token: &str) -> Result<Claims, TokenError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;

        decode::<Claims>(token, &self.decoding_key, &validation)
            .map(|data| data.claims)
            .map_err(classify_error)
    }

    /// Remaining validity of a signature-checked token
    ///
    /// Expiry is NOT enforced: the result may be zero or negative, which
    /// callers treat as "already expired, nothing left to revoke". Used to
    /// size revocation TTLs so an entry never outlives its token.
    pub fn remaining_validity(&self, token: &str) -> Result<Duration, TokenError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        validation.validate_exp = false;

        let claims = decode::<Claims>(token, &self.decoding_key, &validation)
            .map(|data| data.claims)
            .map_err(classify_error)?;

        Ok(Duration::seconds(claims.exp - Utc::now().timestamp()))
    }
}

/// 将 jsonwebtoken 的错误归类为三种令牌级失败
fn classify_error(e: jsonwebtoken::errors::Error) -> TokenError {
    use jsonwebtoken::errors::ErrorKind;

    match e.kind() {
        ErrorKind::ExpiredSignature => TokenError::Expired,
        ErrorKind::InvalidSignature => TokenError::BadSignature,
        _ => TokenError::Malformed,
    }
}
