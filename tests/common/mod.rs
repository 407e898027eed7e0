#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::Arc;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;

use eyeson_auth::app::build_token_service;
use eyeson_auth::config::Config;
use eyeson_auth::repos::user_repo::{InMemoryUserRepo, UserRecord};
use eyeson_auth::services::auth::TokenService;

pub const ANGEL_SEQ: i64 = 17;
pub const ANGEL_EMAIL: &str = "angel@eyeson.kr";
pub const BLIND_SEQ: i64 = 42;
pub const BLIND_EMAIL: &str = "blind@eyeson.kr";

pub fn test_secret() -> String {
    STANDARD.encode([0x2au8; 64])
}

pub fn other_secret() -> String {
    STANDARD.encode([0x17u8; 64])
}

pub fn test_config(secret: &str, access_ttl: u64, refresh_ttl: u64) -> Config {
    let env: HashMap<&str, String> = HashMap::from([
        ("DATABASE_URL", "postgres://localhost/eyeson_test".to_string()),
        ("JWT_SECRET", secret.to_string()),
        ("ACCESS_TOKEN_VALIDITY_IN_SECONDS", access_ttl.to_string()),
        ("REFRESH_TOKEN_VALIDITY_IN_SECONDS", refresh_ttl.to_string()),
    ]);
    Config::from_lookup(|key| env.get(key).cloned()).unwrap()
}

pub fn test_users() -> InMemoryUserRepo {
    InMemoryUserRepo::with_users([
        UserRecord {
            user_seq: ANGEL_SEQ,
            user_email: ANGEL_EMAIL.to_string(),
        },
        UserRecord {
            user_seq: BLIND_SEQ,
            user_email: BLIND_EMAIL.to_string(),
        },
    ])
}

pub fn token_service_with(secret: &str, access_ttl: u64, refresh_ttl: u64) -> TokenService {
    let config = test_config(secret, access_ttl, refresh_ttl);
    build_token_service(&config, Arc::new(test_users())).unwrap()
}

pub fn token_service() -> TokenService {
    token_service_with(&test_secret(), 1800, 1_209_600)
}
