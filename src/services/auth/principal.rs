use std::collections::BTreeSet;

/// Authenticated principal reconstructed from a verified token.
///
/// Never stored; rebuilt per request.
#[derive(Clone, PartialEq, Eq)]
pub struct Principal {
    pub user_seq: i64,
    pub credential: String,
    pub authorities: Vec<String>,
}

// The credential is a live bearer token; keep it out of logs.
impl std::fmt::Debug for Principal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Principal")
            .field("user_seq", &self.user_seq)
            .field("authorities", &self.authorities)
            .finish()
    }
}

impl Principal {
    pub fn has_authority(&self, authority: &str) -> bool {
        self.authorities.iter().any(|a| a == authority)
    }

    pub fn authority_set(&self) -> BTreeSet<&str> {
        self.authorities.iter().map(String::as_str).collect()
    }
}
