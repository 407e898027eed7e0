use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use chrono::{DateTime, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{Algorithm, Validation};
use serde_json::{Map, Value};
use std::sync::Arc;
use tracing::{debug, info};

use crate::services::auth::claims::{Claims, EXPIRATION_CLAIM};
use crate::services::auth::error::TokenError;
use crate::services::auth::header::bearer_token;
use crate::services::auth::principal::Principal;
use crate::services::auth::signing_key::SigningKey;

const ACCEPTED_ALG: &str = "HS512";

/// Verifies HS512 tokens and turns them into claims or principals.
///
/// Checks run in a fixed order, so each failure has exactly one kind:
/// 1. structure (three segments, decodable JSON header) -> `Malformed`
/// 2. algorithm is HS512 and a signature is present -> `UnsupportedFormat`
/// 3. signature -> `BadSignature`
/// 4. payload decodes, `exp` present -> `Malformed` / `InvalidClaim`
/// 5. `exp` is in the future -> `Expired`
#[derive(Clone)]
pub struct TokenVerifier {
    key: Arc<SigningKey>,
    validation: Validation,
}

impl std::fmt::Debug for TokenVerifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Do not print key material
        f.debug_struct("TokenVerifier")
            .field("key", &self.key)
            .field("validation", &self.validation)
            .finish()
    }
}

impl TokenVerifier {
    pub fn new(key: Arc<SigningKey>) -> Self {
        let mut validation = Validation::new(Algorithm::HS512);
        // Expiry is checked by verify_at, at millisecond precision and without
        // leeway, so the claims of an expired token can still be handed back.
        validation.validate_exp = false;
        validation.validate_aud = false;
        validation.leeway = 0;
        validation.set_required_spec_claims(&[EXPIRATION_CLAIM]);

        Self { key, validation }
    }

    /// Verify signature and expiry, returning the full claim set.
    pub fn verify(&self, token: &str) -> Result<Claims, TokenError> {
        self.verify_at(token, Utc::now())
    }

    pub fn verify_at(&self, token: &str, now: DateTime<Utc>) -> Result<Claims, TokenError> {
        let claims = self.decode_signed(token)?;
        let exp = claims.expires_at()?;

        if now.timestamp_millis() >= exp.saturating_mul(1000) {
            return Err(TokenError::Expired);
        }

        Ok(claims)
    }

    /// Claims of a correctly signed token, even when it has expired.
    ///
    /// Refresh and audit paths use this to learn whose token was presented.
    /// Every other failure kind is still reported.
    pub fn claims(&self, token: &str) -> Result<Claims, TokenError> {
        self.decode_signed(token)
    }

    /// Boolean projection of [`verify`](Self::verify); logs why a token was rejected.
    pub fn validate(&self, token: &str) -> bool {
        match self.verify(token) {
            Ok(_) => true,
            Err(err) => {
                match &err {
                    TokenError::BadSignature => info!("invalid JWT signature"),
                    TokenError::Expired => info!("expired JWT token"),
                    TokenError::UnsupportedFormat => info!("unsupported JWT token"),
                    TokenError::Malformed | TokenError::InvalidClaim(_) => {
                        info!(error = %err, "malformed JWT token")
                    }
                    _ => info!(error = %err, "JWT validation failed"),
                }
                false
            }
        }
    }

    /// Verify `token` and rebuild the principal it represents.
    pub fn build_principal(&self, token: &str) -> Result<Principal, TokenError> {
        let claims = self.verify(token)?;

        Ok(Principal {
            user_seq: claims.user_seq()?,
            credential: token.to_string(),
            authorities: claims.authorities()?,
        })
    }

    /// Verify the bearer token in an `Authorization` header value and build its principal.
    pub fn authenticate(&self, authorization: Option<&str>) -> Result<Principal, TokenError> {
        let token = bearer_token(authorization)?;
        self.build_principal(token)
    }

    /// `userSeq` of the bearer token in an `Authorization` header value.
    pub fn extract_user_seq(&self, authorization: Option<&str>) -> Result<i64, TokenError> {
        let token = bearer_token(authorization)?;
        self.verify(token)?.user_seq()
    }

    fn decode_signed(&self, token: &str) -> Result<Claims, TokenError> {
        check_structure(token)?;

        let data = jsonwebtoken::decode::<Map<String, Value>>(
            token,
            self.key.decoding_key(),
            &self.validation,
        )
        .map_err(|e| {
            debug!(error = %e, "JWT decode failed");
            classify(e.kind())
        })?;

        Ok(Claims::new(data.claims))
    }
}

/// Structural checks done before touching the signature, so that unsigned
/// or foreign-algorithm tokens are reported as unsupported.
fn check_structure(token: &str) -> Result<(), TokenError> {
    let mut parts = token.split('.');
    let (Some(header), Some(_payload), Some(signature), None) =
        (parts.next(), parts.next(), parts.next(), parts.next())
    else {
        return Err(TokenError::Malformed);
    };

    let header_bytes = URL_SAFE_NO_PAD
        .decode(header)
        .map_err(|_| TokenError::Malformed)?;
    let header: Value =
        serde_json::from_slice(&header_bytes).map_err(|_| TokenError::Malformed)?;

    match header.get("alg").and_then(Value::as_str) {
        Some(ACCEPTED_ALG) => {}
        Some(_) => return Err(TokenError::UnsupportedFormat),
        None => return Err(TokenError::Malformed),
    }

    if signature.is_empty() {
        return Err(TokenError::UnsupportedFormat);
    }

    Ok(())
}

fn classify(kind: &ErrorKind) -> TokenError {
    match kind {
        ErrorKind::InvalidSignature => TokenError::BadSignature,
        ErrorKind::ExpiredSignature => TokenError::Expired,
        ErrorKind::InvalidAlgorithm
        | ErrorKind::InvalidAlgorithmName
        | ErrorKind::MissingAlgorithm => TokenError::UnsupportedFormat,
        ErrorKind::MissingRequiredClaim(claim) if claim == EXPIRATION_CLAIM => {
            TokenError::InvalidClaim(EXPIRATION_CLAIM)
        }
        _ => TokenError::Malformed,
    }
}
