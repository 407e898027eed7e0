use serde::{Deserialize, Serialize};

use crate::services::auth::Principal;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PrincipalResponse {
    pub user_seq: i64,
    pub authorities: Vec<String>,
}

impl From<Principal> for PrincipalResponse {
    fn from(p: Principal) -> Self {
        Self {
            user_seq: p.user_seq,
            authorities: p.authorities,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserSeqResponse {
    pub user_seq: i64,
}
