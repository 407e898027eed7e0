use serde::Serialize;
use serde_json::{Map, Value};

use crate::services::auth::error::TokenError;

pub const USER_SEQ_CLAIM: &str = "userSeq";
pub const USER_EMAIL_CLAIM: &str = "userEmail";
pub const AUTHORITIES_CLAIM: &str = "auth";
pub const EXPIRATION_CLAIM: &str = "exp";

/// Claim set written into both access and refresh tokens.
#[derive(Debug, Serialize)]
pub(crate) struct TokenClaims<'a> {
    #[serde(rename = "userSeq")]
    pub user_seq: i64,
    #[serde(rename = "userEmail")]
    pub user_email: &'a str,
    pub auth: &'a str,
    pub exp: i64,
}

/// Claims recovered from a token whose signature verified.
///
/// Kept as a loose map so tokens minted elsewhere with extra claims still
/// decode; the typed accessors enforce the claims this service relies on.
#[derive(Debug, Clone, PartialEq)]
pub struct Claims(Map<String, Value>);

impl Claims {
    pub fn new(map: Map<String, Value>) -> Self {
        Self(map)
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.0.get(name)
    }

    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }

    pub fn into_map(self) -> Map<String, Value> {
        self.0
    }

    /// `userSeq` as an integer. A string holding a number is accepted too.
    pub fn user_seq(&self) -> Result<i64, TokenError> {
        let invalid = || TokenError::InvalidClaim(USER_SEQ_CLAIM);
        match self.0.get(USER_SEQ_CLAIM) {
            Some(Value::Number(n)) => n.as_i64().ok_or_else(invalid),
            Some(Value::String(s)) => s.trim().parse().map_err(|_| invalid()),
            _ => Err(invalid()),
        }
    }

    pub fn user_email(&self) -> Result<&str, TokenError> {
        self.0
            .get(USER_EMAIL_CLAIM)
            .and_then(Value::as_str)
            .ok_or(TokenError::InvalidClaim(USER_EMAIL_CLAIM))
    }

    /// Raw comma-joined `auth` claim, exactly as minted.
    pub fn authorities_raw(&self) -> Result<&str, TokenError> {
        self.0
            .get(AUTHORITIES_CLAIM)
            .and_then(Value::as_str)
            .ok_or(TokenError::InvalidClaim(AUTHORITIES_CLAIM))
    }

    /// `auth` split into individual authorities.
    pub fn authorities(&self) -> Result<Vec<String>, TokenError> {
        self.authorities_raw().map(split_authorities)
    }

    /// `exp` in seconds since the epoch.
    pub fn expires_at(&self) -> Result<i64, TokenError> {
        self.0
            .get(EXPIRATION_CLAIM)
            .and_then(Value::as_i64)
            .ok_or(TokenError::InvalidClaim(EXPIRATION_CLAIM))
    }
}

/// Split a comma-joined authority list.
///
/// Segments are trimmed and empty ones dropped, so `""` yields no
/// authorities rather than one empty-string authority.
pub fn split_authorities(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}
