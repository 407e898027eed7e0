mod common;

use std::collections::BTreeSet;

use eyeson_auth::services::auth::TokenError;

use common::{ANGEL_EMAIL, ANGEL_SEQ, BLIND_EMAIL, BLIND_SEQ};

#[tokio::test]
async fn test_minted_access_token_verifies_with_matching_claims() {
    let tokens = common::token_service();

    for (email, seq, auth) in [
        (ANGEL_EMAIL, ANGEL_SEQ, "ROLE_USER"),
        (BLIND_EMAIL, BLIND_SEQ, "ROLE_USER,ROLE_BLIND"),
    ] {
        let pair = tokens.create_token_pair(email, auth).await.unwrap();
        let claims = tokens.verifier().verify(&pair.access_token).unwrap();

        assert_eq!(claims.user_seq().unwrap(), seq);
        assert_eq!(claims.user_email().unwrap(), email);
        assert_eq!(claims.authorities_raw().unwrap(), auth);
    }
}

#[tokio::test]
async fn test_refresh_token_outlives_access_token() {
    let tokens = common::token_service();
    let pair = tokens
        .create_token_pair(ANGEL_EMAIL, "ROLE_USER")
        .await
        .unwrap();

    let access = tokens.verifier().verify(&pair.access_token).unwrap();
    let refresh = tokens.verifier().verify(&pair.refresh_token).unwrap();

    assert_ne!(pair.access_token, pair.refresh_token);
    assert!(refresh.expires_at().unwrap() > access.expires_at().unwrap());
    assert_eq!(refresh.user_seq().unwrap(), ANGEL_SEQ);
}

#[tokio::test]
async fn test_unknown_email_is_user_not_found() {
    let tokens = common::token_service();
    let err = tokens
        .create_token_pair("stranger@eyeson.kr", "ROLE_USER")
        .await
        .unwrap_err();

    assert!(matches!(err, TokenError::UserNotFound));
}

#[tokio::test]
async fn test_zero_ttl_token_is_expired() {
    let tokens = common::token_service_with(&common::test_secret(), 0, 0);
    let pair = tokens
        .create_token_pair(ANGEL_EMAIL, "ROLE_USER")
        .await
        .unwrap();

    let err = tokens.verifier().verify(&pair.access_token).unwrap_err();
    assert!(matches!(err, TokenError::Expired));
    assert!(!tokens.verifier().validate(&pair.access_token));

    // claims stay readable through the degraded path
    let claims = tokens.verifier().claims(&pair.access_token).unwrap();
    assert_eq!(claims.user_seq().unwrap(), ANGEL_SEQ);
}

#[tokio::test]
async fn test_token_from_different_key_is_bad_signature() {
    let ours = common::token_service();
    let theirs = common::token_service_with(&common::other_secret(), 1800, 3600);

    let pair = theirs
        .create_token_pair(ANGEL_EMAIL, "ROLE_ADMIN")
        .await
        .unwrap();

    let err = ours.verifier().verify(&pair.access_token).unwrap_err();
    assert!(matches!(err, TokenError::BadSignature));
}

#[test]
fn test_malformed_token_is_malformed() {
    let tokens = common::token_service();
    let err = tokens.verifier().verify("not.a.token").unwrap_err();

    assert!(matches!(err, TokenError::Malformed));
    assert!(!tokens.verifier().validate("not.a.token"));
}

#[tokio::test]
async fn test_extract_user_seq_from_authorization_header() {
    let tokens = common::token_service();
    let pair = tokens
        .create_token_pair(BLIND_EMAIL, "ROLE_USER")
        .await
        .unwrap();

    let verifier = tokens.verifier();
    assert!(matches!(
        verifier.extract_user_seq(Some("Token abc")),
        Err(TokenError::InvalidHeader)
    ));
    assert_eq!(
        verifier
            .extract_user_seq(Some(&pair.authorization_header_value()))
            .unwrap(),
        BLIND_SEQ
    );
}

#[tokio::test]
async fn test_principal_authorities_match_comma_split_input() {
    let tokens = common::token_service();

    for auth in ["ROLE_USER", "ROLE_USER,ROLE_ADMIN", "ROLE_ANGEL,ROLE_USER,ROLE_ADMIN"] {
        let pair = tokens.create_token_pair(ANGEL_EMAIL, auth).await.unwrap();
        let principal = tokens
            .verifier()
            .build_principal(&pair.access_token)
            .unwrap();

        let expected: BTreeSet<&str> = auth.split(',').collect();
        assert_eq!(principal.authority_set(), expected);
        assert_eq!(principal.user_seq, ANGEL_SEQ);
        assert_eq!(principal.credential, pair.access_token);
    }
}

#[tokio::test]
async fn test_refresh_flow_issues_new_pair() {
    let tokens = common::token_service();
    let pair = tokens
        .create_token_pair(BLIND_EMAIL, "ROLE_USER,ROLE_BLIND")
        .await
        .unwrap();

    let refreshed = tokens.refresh(&pair.refresh_token).await.unwrap();
    let principal = tokens
        .verifier()
        .build_principal(&refreshed.access_token)
        .unwrap();

    assert_eq!(principal.user_seq, BLIND_SEQ);
    assert!(principal.has_authority("ROLE_BLIND"));
}
