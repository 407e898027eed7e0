use std::sync::Arc;
use tracing::{debug, error, info, warn};

use crate::repos::user_repo::UserLookup;
use crate::services::auth::{
    error::TokenError,
    token_issuer::{IssuedTokenPair, TokenIssuer},
    token_verifier::TokenVerifier,
};

/// Service that resolves users and orchestrates token-pair issuance.
///
/// - TokenIssuer signs the access/refresh pair.
/// - TokenVerifier checks presented tokens (refresh flow, bearer auth).
/// - UserLookup resolves the user record behind an email.
#[derive(Clone)]
pub struct TokenService {
    issuer: TokenIssuer,
    verifier: TokenVerifier,
    users: Arc<dyn UserLookup>,
}

impl std::fmt::Debug for TokenService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenService")
            .field("issuer", &self.issuer)
            .finish_non_exhaustive()
    }
}

impl TokenService {
    pub fn new(issuer: TokenIssuer, verifier: TokenVerifier, users: Arc<dyn UserLookup>) -> Self {
        Self {
            issuer,
            verifier,
            users,
        }
    }

    pub fn verifier(&self) -> &TokenVerifier {
        &self.verifier
    }

    pub fn issuer(&self) -> &TokenIssuer {
        &self.issuer
    }

    /// Issue a new token pair for the user registered under `email`.
    ///
    /// `authorities` is the comma-joined role list written into the `auth` claim.
    /// An unknown email is reported as `UserNotFound`.
    pub async fn create_token_pair(
        &self,
        email: &str,
        authorities: &str,
    ) -> Result<IssuedTokenPair, TokenError> {
        let user = self
            .users
            .find_by_email(email)
            .await
            .map_err(|e| {
                error!(error = %e, "Failed to look up user by email");
                TokenError::UserLookup(e)
            })?
            .ok_or_else(|| {
                debug!("No user registered for email");
                TokenError::UserNotFound
            })?;

        self.issuer.issue_token_pair(&user, authorities)
    }

    /// Exchange a refresh token for a fresh pair.
    ///
    /// - verify the refresh token (signature + expiry)
    /// - re-resolve the user by the `userEmail` claim, so deleted users cannot refresh
    /// - issue a new pair carrying the same `auth` claim
    pub async fn refresh(&self, refresh_token: &str) -> Result<IssuedTokenPair, TokenError> {
        let claims = match self.verifier.verify(refresh_token) {
            Ok(claims) => claims,
            Err(TokenError::Expired) => {
                // Signature already checked; recover the claims only to record whose token it was.
                if let Ok(expired) = self.verifier.claims(refresh_token) {
                    info!(user_seq = ?expired.user_seq().ok(), "Rejected expired refresh token");
                }
                return Err(TokenError::Expired);
            }
            Err(err) => {
                warn!(error = %err, "Rejected refresh token");
                return Err(err);
            }
        };

        let email = claims.user_email()?;
        let authorities = claims.authorities_raw()?;

        self.create_token_pair(email, authorities).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::repos::user_repo::{InMemoryUserRepo, UserRecord};
    use crate::services::auth::signing_key::SigningKey;

    fn service_with_ttls(access: u64, refresh: u64) -> TokenService {
        let key = Arc::new(SigningKey::from_bytes(&[3u8; 64]).unwrap());
        let users = InMemoryUserRepo::with_users([UserRecord {
            user_seq: 5,
            user_email: "angel@eyeson.kr".to_string(),
        }]);
        TokenService::new(
            TokenIssuer::new(key.clone(), access, refresh),
            TokenVerifier::new(key),
            Arc::new(users),
        )
    }

    fn service() -> TokenService {
        service_with_ttls(1800, 1_209_600)
    }

    #[tokio::test]
    async fn create_token_pair_for_known_user() {
        let svc = service();
        let pair = svc
            .create_token_pair("angel@eyeson.kr", "ROLE_USER")
            .await
            .unwrap();

        let claims = svc.verifier().verify(&pair.access_token).unwrap();
        assert_eq!(claims.user_seq().unwrap(), 5);
        assert_eq!(claims.user_email().unwrap(), "angel@eyeson.kr");
        assert_eq!(claims.authorities_raw().unwrap(), "ROLE_USER");

        let refresh = svc.verifier().verify(&pair.refresh_token).unwrap();
        assert!(refresh.expires_at().unwrap() > claims.expires_at().unwrap());
    }

    #[tokio::test]
    async fn unknown_email_is_user_not_found() {
        let err = service()
            .create_token_pair("nobody@eyeson.kr", "ROLE_USER")
            .await
            .unwrap_err();
        assert!(matches!(err, TokenError::UserNotFound));
    }

    #[tokio::test]
    async fn refresh_issues_new_pair_with_same_authorities() {
        let svc = service();
        let pair = svc
            .create_token_pair("angel@eyeson.kr", "ROLE_USER,ROLE_ANGEL")
            .await
            .unwrap();

        let refreshed = svc.refresh(&pair.refresh_token).await.unwrap();
        let principal = svc
            .verifier()
            .build_principal(&refreshed.access_token)
            .unwrap();
        assert_eq!(principal.user_seq, 5);
        assert_eq!(principal.authorities, vec!["ROLE_USER", "ROLE_ANGEL"]);
    }

    #[tokio::test]
    async fn expired_refresh_token_is_rejected() {
        let svc = service_with_ttls(0, 0);
        let pair = svc
            .create_token_pair("angel@eyeson.kr", "ROLE_USER")
            .await
            .unwrap();

        let err = svc.refresh(&pair.refresh_token).await.unwrap_err();
        assert!(matches!(err, TokenError::Expired));
    }

    #[tokio::test]
    async fn refresh_for_removed_user_is_user_not_found() {
        let key = Arc::new(SigningKey::from_bytes(&[3u8; 64]).unwrap());
        let issuer = TokenIssuer::new(key.clone(), 1800, 3600);
        let ghost = UserRecord {
            user_seq: 99,
            user_email: "ghost@eyeson.kr".to_string(),
        };
        let pair = issuer.issue_token_pair(&ghost, "ROLE_USER").unwrap();

        let svc = TokenService::new(
            issuer,
            TokenVerifier::new(key),
            Arc::new(InMemoryUserRepo::default()),
        );
        let err = svc.refresh(&pair.refresh_token).await.unwrap_err();
        assert!(matches!(err, TokenError::UserNotFound));
    }

    #[tokio::test]
    async fn refresh_rejects_garbage() {
        let err = service().refresh("not.a.token").await.unwrap_err();
        assert!(matches!(err, TokenError::Malformed));
    }
}
