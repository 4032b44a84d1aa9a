//! JWT issuance, verification and refresh-token fingerprinting.
//!
//! Access and refresh tokens are HS256 JWTs signed with distinct secrets.
//! The database never stores a raw refresh token, only its SHA-256
//! fingerprint, so a leaked database dump yields nothing replayable.

use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::AuthConfig;

#[derive(Debug, Error)]
pub enum TokenError {
    /// Signature mismatch, expiry, or malformed input.
    #[error("invalid or expired token")]
    Invalid,
    /// Signing failed; only plausible on key misconfiguration.
    #[error("token signing failed")]
    Signing,
}

#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    /// The user's email.
    sub: String,
    iat: i64,
    exp: i64,
    /// Unique token id; two tokens minted in the same second must still
    /// differ, or rotating a fresh session would be a no-op.
    jti: String,
}

/// Issues and verifies the access/refresh token pair.
#[derive(Clone)]
pub struct TokenSigner {
    access_secret: String,
    refresh_secret: String,
    access_lifetime: i64,
    refresh_lifetime: i64,
}

impl TokenSigner {
    pub fn new(
        access_secret: String,
        refresh_secret: String,
        access_lifetime: i64,
        refresh_lifetime: i64,
    ) -> Self {
        Self {
            access_secret,
            refresh_secret,
            access_lifetime,
            refresh_lifetime,
        }
    }

    pub fn from_config(auth: &AuthConfig) -> Self {
        Self::new(
            auth.access_token_secret.clone(),
            auth.refresh_token_secret.clone(),
            auth.access_token_lifetime,
            auth.refresh_token_lifetime,
        )
    }

    /// Sign a short-lived access token asserting `email`.
    pub fn issue_access_token(&self, email: &str) -> Result<String, TokenError> {
        issue(email, &self.access_secret, self.access_lifetime)
    }

    /// Sign a long-lived refresh token asserting `email`.
    pub fn issue_refresh_token(&self, email: &str) -> Result<String, TokenError> {
        issue(email, &self.refresh_secret, self.refresh_lifetime)
    }

    /// Validate signature and expiry of an access token, returning the email.
    pub fn verify_access_token(&self, token: &str) -> Result<String, TokenError> {
        verify(token, &self.access_secret)
    }

    /// Validate signature and expiry of a refresh token, returning the email.
    pub fn verify_refresh_token(&self, token: &str) -> Result<String, TokenError> {
        verify(token, &self.refresh_secret)
    }
}

fn issue(email: &str, secret: &str, lifetime: i64) -> Result<String, TokenError> {
    let now = time::OffsetDateTime::now_utc().unix_timestamp();
    let claims = Claims {
        sub: email.to_string(),
        iat: now,
        exp: now + lifetime,
        jti: uuid::Uuid::new_v4().to_string(),
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| {
        tracing::error!("failed to sign token: {e}");
        TokenError::Signing
    })
}

fn verify(token: &str, secret: &str) -> Result<String, TokenError> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.validate_exp = true;
    // The default 60s leeway would double the 1-minute access window.
    validation.leeway = 0;

    let token_data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &validation,
    )
    .map_err(|_| TokenError::Invalid)?;

    Ok(token_data.claims.sub)
}

/// Deterministic one-way fingerprint of a token, as stored in
/// `credential.refresh_token_hash`.
pub fn fingerprint(token: &str) -> String {
    use base64::Engine;
    use sha2::{Digest, Sha256};

    let digest = Sha256::digest(token.as_bytes());
    base64::engine::general_purpose::STANDARD.encode(digest)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn signer() -> TokenSigner {
        TokenSigner::new(
            "test-access-secret-0123456789abcdef".into(),
            "test-refresh-secret-0123456789abcdef".into(),
            60,
            86400 * 7,
        )
    }

    #[test]
    fn access_token_round_trip() {
        let signer = signer();
        let token = signer.issue_access_token("a@x.com").expect("issue");
        let email = signer.verify_access_token(&token).expect("verify");
        assert_eq!(email, "a@x.com");
    }

    #[test]
    fn refresh_token_round_trip() {
        let signer = signer();
        let token = signer.issue_refresh_token("a@x.com").expect("issue");
        let email = signer.verify_refresh_token(&token).expect("verify");
        assert_eq!(email, "a@x.com");
    }

    #[test]
    fn tokens_do_not_verify_across_secrets() {
        let signer = signer();
        let access = signer.issue_access_token("a@x.com").expect("issue");
        let refresh = signer.issue_refresh_token("a@x.com").expect("issue");

        assert!(signer.verify_refresh_token(&access).is_err());
        assert!(signer.verify_access_token(&refresh).is_err());
    }

    #[test]
    fn expired_tokens_are_rejected() {
        let expired = TokenSigner::new(
            "test-access-secret-0123456789abcdef".into(),
            "test-refresh-secret-0123456789abcdef".into(),
            -60,
            -60,
        );
        let access = expired.issue_access_token("a@x.com").expect("issue");
        let refresh = expired.issue_refresh_token("a@x.com").expect("issue");

        assert!(matches!(
            expired.verify_access_token(&access),
            Err(TokenError::Invalid)
        ));
        assert!(matches!(
            expired.verify_refresh_token(&refresh),
            Err(TokenError::Invalid)
        ));
    }

    #[test]
    fn malformed_tokens_are_rejected() {
        let signer = signer();
        assert!(signer.verify_access_token("not-a-jwt").is_err());
        assert!(signer.verify_refresh_token("").is_err());
    }

    #[test]
    fn same_second_tokens_are_distinct() {
        let signer = signer();
        let a = signer.issue_refresh_token("a@x.com").expect("issue");
        let b = signer.issue_refresh_token("a@x.com").expect("issue");
        assert_ne!(a, b);
    }

    #[test]
    fn fingerprint_is_deterministic_and_distinct() {
        let a = fingerprint("token-a");
        assert_eq!(a, fingerprint("token-a"));
        assert_ne!(a, fingerprint("token-b"));
        // Never the raw token
        assert_ne!(a, "token-a");
    }
}
