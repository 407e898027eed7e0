/*
 * Responsibility
 * - Router に紐づける共有コンテキスト (AppState)
 * - Clone 前提で持つ (内部は Arc)
 */
use std::sync::Arc;

use crate::services::auth::TokenService;

#[derive(Clone, Debug)]
pub struct AppState {
    pub tokens: Arc<TokenService>,
}

impl AppState {
    pub fn new(tokens: Arc<TokenService>) -> Self {
        Self { tokens }
    }
}
