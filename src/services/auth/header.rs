use crate::services::auth::error::TokenError;

pub const BEARER_PREFIX: &str = "Bearer ";

/// Strip the `Bearer ` prefix from an `Authorization` header value.
///
/// The prefix is case-sensitive with exactly one trailing space.
pub fn bearer_token(header: Option<&str>) -> Result<&str, TokenError> {
    header
        .and_then(|h| h.strip_prefix(BEARER_PREFIX))
        .ok_or(TokenError::InvalidHeader)
}

/// `Authorization` header value carrying `token`.
pub fn bearer_header_value(token: &str) -> String {
    format!("{BEARER_PREFIX}{token}")
}
