use chrono::{DateTime, Utc};
use jsonwebtoken::{Algorithm, Header};
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, error};

use crate::repos::user_repo::UserRecord;
use crate::services::auth::claims::TokenClaims;
use crate::services::auth::error::TokenError;
use crate::services::auth::header::bearer_header_value;
use crate::services::auth::signing_key::SigningKey;

/// Mints HS512 access/refresh token pairs.
#[derive(Clone)]
pub struct TokenIssuer {
    key: Arc<SigningKey>,
    access_ttl_seconds: u64,
    refresh_ttl_seconds: u64,
}

impl std::fmt::Debug for TokenIssuer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenIssuer")
            .field("key", &self.key)
            .field("access_ttl_seconds", &self.access_ttl_seconds)
            .field("refresh_ttl_seconds", &self.refresh_ttl_seconds)
            .finish()
    }
}

impl TokenIssuer {
    pub fn new(key: Arc<SigningKey>, access_ttl_seconds: u64, refresh_ttl_seconds: u64) -> Self {
        Self {
            key,
            access_ttl_seconds,
            refresh_ttl_seconds,
        }
    }

    pub fn access_ttl_seconds(&self) -> u64 {
        self.access_ttl_seconds
    }

    pub fn refresh_ttl_seconds(&self) -> u64 {
        self.refresh_ttl_seconds
    }

    /// Issue a token pair for an already-resolved user.
    pub fn issue_token_pair(
        &self,
        user: &UserRecord,
        authorities: &str,
    ) -> Result<IssuedTokenPair, TokenError> {
        self.issue_token_pair_at(user, authorities, Utc::now())
    }

    /// Same as [`issue_token_pair`](Self::issue_token_pair) with an explicit clock.
    pub fn issue_token_pair_at(
        &self,
        user: &UserRecord,
        authorities: &str,
        now: DateTime<Utc>,
    ) -> Result<IssuedTokenPair, TokenError> {
        let issued_at = now.timestamp();

        let access_token = self.sign(&TokenClaims {
            user_seq: user.user_seq,
            user_email: &user.user_email,
            auth: authorities,
            exp: expires_at(issued_at, self.access_ttl_seconds)?,
        })?;

        let refresh_token = self.sign(&TokenClaims {
            user_seq: user.user_seq,
            user_email: &user.user_email,
            auth: authorities,
            exp: expires_at(issued_at, self.refresh_ttl_seconds)?,
        })?;

        debug!(
            user_seq = user.user_seq,
            access_ttl_seconds = self.access_ttl_seconds,
            refresh_ttl_seconds = self.refresh_ttl_seconds,
            "Issued token pair"
        );

        Ok(IssuedTokenPair {
            access_token,
            refresh_token,
            token_type: "Bearer",
            expires_in: self.access_ttl_seconds,
        })
    }

    fn sign<T: Serialize>(&self, claims: &T) -> Result<String, TokenError> {
        let mut header = Header::new(Algorithm::HS512);
        header.typ = Some("JWT".to_string());
        jsonwebtoken::encode(&header, claims, self.key.encoding_key()).map_err(|e| {
            error!(error = %e, "failed to sign JWT");
            TokenError::Signing(e)
        })
    }
}

fn expires_at(issued_at: i64, ttl_seconds: u64) -> Result<i64, TokenError> {
    i64::try_from(ttl_seconds)
        .ok()
        .and_then(|ttl| issued_at.checked_add(ttl))
        .ok_or_else(|| {
            error!(ttl_seconds, "token lifetime overflows exp");
            TokenError::ExpiryOutOfRange { ttl_seconds }
        })
}

/// Access + refresh token minted together.
///
/// Handlers map this into the HTTP response and decide where the access
/// token goes (body, `Authorization` header, or both).
#[derive(Clone)]
pub struct IssuedTokenPair {
    pub access_token: String,
    pub refresh_token: String,
    pub token_type: &'static str,
    /// Seconds until the access token expires.
    pub expires_in: u64,
}

impl std::fmt::Debug for IssuedTokenPair {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IssuedTokenPair")
            .field("token_type", &self.token_type)
            .field("expires_in", &self.expires_in)
            .finish_non_exhaustive()
    }
}

impl IssuedTokenPair {
    /// `Bearer <access_token>`, ready for an `Authorization` header.
    pub fn authorization_header_value(&self) -> String {
        bearer_header_value(&self.access_token)
    }
}
