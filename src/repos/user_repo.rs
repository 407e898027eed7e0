/*
 * Responsibility
 * - users テーブルから email でユーザーを引く (token 発行前の存在確認)
 * - token 側が読むのは user_seq / user_email の 2 列だけ
 */
use async_trait::async_trait;
use sqlx::{FromRow, PgPool};
use std::collections::HashMap;

use crate::repos::error::RepoResult;

/// The two user fields a token is minted from.
#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
pub struct UserRecord {
    pub user_seq: i64,
    pub user_email: String,
}

/// Minimal lookup interface the token service depends on.
///
/// `Ok(None)` means "no such user"; `Err(_)` is a backend failure.
#[async_trait]
pub trait UserLookup: Send + Sync {
    async fn find_by_email(&self, email: &str) -> RepoResult<Option<UserRecord>>;
}

#[derive(Clone, Debug)]
pub struct PgUserRepo {
    pool: PgPool,
}

impl PgUserRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserLookup for PgUserRepo {
    async fn find_by_email(&self, email: &str) -> RepoResult<Option<UserRecord>> {
        let row = sqlx::query_as::<_, UserRecord>(
            r#"
            SELECT user_seq, user_email
            FROM users
            WHERE user_email = $1
            "#,
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row)
    }
}

/// Map-backed lookup for tests and local runs without Postgres.
#[derive(Clone, Debug, Default)]
pub struct InMemoryUserRepo {
    by_email: HashMap<String, UserRecord>,
}

impl InMemoryUserRepo {
    pub fn with_users(users: impl IntoIterator<Item = UserRecord>) -> Self {
        let by_email = users
            .into_iter()
            .map(|u| (u.user_email.clone(), u))
            .collect();
        Self { by_email }
    }

    pub fn insert(&mut self, user: UserRecord) {
        self.by_email.insert(user.user_email.clone(), user);
    }
}

#[async_trait]
impl UserLookup for InMemoryUserRepo {
    async fn find_by_email(&self, email: &str) -> RepoResult<Option<UserRecord>> {
        Ok(self.by_email.get(email).cloned())
    }
}
