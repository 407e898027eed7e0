use serde::Deserialize;

#[derive(Clone, Deserialize)]
pub struct RefreshRequest {
    pub refresh_token: String,
}
