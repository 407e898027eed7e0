use thiserror::Error;

use crate::repos::error::RepoError;

/// Errors produced while minting, verifying or reading session tokens.
///
/// Verification failures are kept apart so callers can tell an expired
/// token from a forged one. Use [`TokenError::is_verification_failure`]
/// when the reason does not matter.
#[derive(Debug, Error)]
pub enum TokenError {
    /// Signature does not verify against the process key.
    #[error("invalid JWT signature")]
    BadSignature,

    /// Signature is valid but `exp` is in the past.
    #[error("expired JWT token")]
    Expired,

    /// Token uses an algorithm or structure this service does not accept.
    #[error("unsupported JWT token")]
    UnsupportedFormat,

    /// Token string fails basic structural parsing.
    #[error("malformed JWT token")]
    Malformed,

    /// Token verified, but a required claim is missing or has the wrong type.
    #[error("missing or invalid '{0}' claim")]
    InvalidClaim(&'static str),

    /// `Authorization` header is absent or does not start with `Bearer `.
    #[error("invalid authorization header")]
    InvalidHeader,

    #[error("user not found")]
    UserNotFound,

    #[error("user lookup failed")]
    UserLookup(#[from] RepoError),

    #[error("failed to sign JWT")]
    Signing(#[source] jsonwebtoken::errors::Error),

    /// `now + ttl` does not fit a JWT `exp`.
    #[error("token lifetime of {ttl_seconds}s is out of range")]
    ExpiryOutOfRange { ttl_seconds: u64 },
}

impl TokenError {
    /// True for every failure that means "reject the presented token".
    pub fn is_verification_failure(&self) -> bool {
        matches!(
            self,
            Self::BadSignature
                | Self::Expired
                | Self::UnsupportedFormat
                | Self::Malformed
                | Self::InvalidClaim(_)
        )
    }

    /// Structural and claim-level parse failures.
    pub fn is_malformed(&self) -> bool {
        matches!(self, Self::Malformed | Self::InvalidClaim(_))
    }
}
