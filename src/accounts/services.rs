use sha2::{Digest, Sha256};
use sqlx::SqlitePool;

use crate::accounts::repo_types::{Profile, User};
use crate::history::repo_types::QueryLog;

/// Deterministic one-way digest used for both storage and comparison.
pub fn digest_password(plain: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(plain.as_bytes());
    format!("{:x}", hasher.finalize())
}

/// Store the digest under a new username; false when it is already taken.
/// Empty usernames and passwords pass through; rejecting them is the
/// caller's concern.
pub async fn register(db: &SqlitePool, username: &str, password: &str) -> anyhow::Result<bool> {
    User::create(db, username, &digest_password(password)).await
}

/// Credential check. On a match, stamps `last_login`; the returned row still
/// carries the previous login stamp.
pub async fn login(
    db: &SqlitePool,
    username: &str,
    password: &str,
) -> anyhow::Result<Option<User>> {
    let user = User::find_by_credentials(db, username, &digest_password(password)).await?;
    if user.is_some() {
        User::touch_login(db, username).await?;
    }
    Ok(user)
}

/// Unconditional overwrite keyed only on the username; knowing the username
/// is the whole identity proof. An unknown username is a no-op.
pub async fn reset_password(
    db: &SqlitePool,
    username: &str,
    new_password: &str,
) -> anyhow::Result<()> {
    User::update_password(db, username, &digest_password(new_password)).await
}

pub async fn fetch_profile(db: &SqlitePool, username: &str) -> anyhow::Result<Option<Profile>> {
    User::fetch_profile(db, username).await
}

/// Pass-through; the `age` range and the gender/language value sets are the
/// caller's to validate.
pub async fn update_profile(
    db: &SqlitePool,
    username: &str,
    age: i64,
    gender: &str,
    language: &str,
) -> anyhow::Result<()> {
    User::update_profile(db, username, age, gender, language).await
}

/// Remove the account and its chat-log rows. There is no foreign key; the
/// cleanup is explicit.
pub async fn delete_account(db: &SqlitePool, username: &str) -> anyhow::Result<()> {
    User::delete(db, username).await?;
    QueryLog::delete_for_user(db, username).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use sqlx::sqlite::SqlitePoolOptions;

    use crate::db;

    async fn test_pool() -> SqlitePool {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .expect("in-memory pool");
        db::init_schema(&pool).await.expect("schema init");
        pool
    }

    #[test]
    fn digest_is_deterministic_hex() {
        let a = digest_password("secret123");
        let b = digest_password("secret123");
        assert_eq!(a, b);
        assert_eq!(a.len(), 64);
        assert!(a.chars().all(|c| c.is_ascii_hexdigit()));
        assert_ne!(a, digest_password("secret124"));
    }

    #[tokio::test]
    async fn register_is_first_writer_wins() {
        let pool = test_pool().await;
        assert!(register(&pool, "alice", "secret123").await.expect("register"));
        assert!(!register(&pool, "alice", "other").await.expect("second register"));
    }

    #[tokio::test]
    async fn login_accepts_only_matching_credentials() {
        let pool = test_pool().await;
        register(&pool, "alice", "secret123").await.expect("register");

        assert!(login(&pool, "alice", "secret123")
            .await
            .expect("login")
            .is_some());
        assert!(login(&pool, "alice", "wrong").await.expect("login").is_none());
        // An unknown user fails the same way as a wrong password.
        assert!(login(&pool, "mallory", "secret123")
            .await
            .expect("login")
            .is_none());
    }

    #[tokio::test]
    async fn login_stamps_last_login() {
        let pool = test_pool().await;
        register(&pool, "alice", "secret123").await.expect("register");

        let before = fetch_profile(&pool, "alice")
            .await
            .expect("fetch")
            .expect("row");
        assert!(before.account_created.is_some());
        assert!(before.last_login.is_none());

        login(&pool, "alice", "secret123").await.expect("login");

        let after = fetch_profile(&pool, "alice")
            .await
            .expect("fetch")
            .expect("row");
        assert!(after.last_login.is_some());
        assert_eq!(before.account_created, after.account_created);
        assert!(after.last_profile_update.is_none());
    }

    #[tokio::test]
    async fn reset_password_swaps_which_login_succeeds() {
        let pool = test_pool().await;
        register(&pool, "alice", "secret123").await.expect("register");

        reset_password(&pool, "alice", "newpass").await.expect("reset");

        assert!(login(&pool, "alice", "secret123")
            .await
            .expect("login")
            .is_none());
        assert!(login(&pool, "alice", "newpass")
            .await
            .expect("login")
            .is_some());
    }

    #[tokio::test]
    async fn reset_password_for_unknown_user_is_a_noop() {
        let pool = test_pool().await;
        reset_password(&pool, "ghost", "whatever").await.expect("reset");
        assert!(login(&pool, "ghost", "whatever")
            .await
            .expect("login")
            .is_none());
    }

    #[tokio::test]
    async fn profile_update_overwrites_fields_and_stamps() {
        let pool = test_pool().await;
        register(&pool, "alice", "secret123").await.expect("register");

        let before = fetch_profile(&pool, "alice")
            .await
            .expect("fetch")
            .expect("row");
        assert!(before.last_profile_update.is_none());

        update_profile(&pool, "alice", 25, "Female", "Hindi")
            .await
            .expect("update");

        let after = fetch_profile(&pool, "alice")
            .await
            .expect("fetch")
            .expect("row");
        assert_eq!(after.age, Some(25));
        assert_eq!(after.gender.as_deref(), Some("Female"));
        assert_eq!(after.language.as_deref(), Some("Hindi"));
        assert!(after.last_profile_update.is_some());
        assert_eq!(before.account_created, after.account_created);
    }

    #[tokio::test]
    async fn delete_account_removes_user_and_logs() {
        let pool = test_pool().await;
        register(&pool, "alice", "secret123").await.expect("register");
        QueryLog::append(&pool, "alice", "hi", "hello")
            .await
            .expect("append");

        delete_account(&pool, "alice").await.expect("delete");

        assert!(login(&pool, "alice", "secret123")
            .await
            .expect("login")
            .is_none());
        assert!(QueryLog::list_by_user(&pool, "alice")
            .await
            .expect("list")
            .is_empty());

        // Deleting again is a no-op, not an error.
        delete_account(&pool, "alice").await.expect("second delete");
    }

    #[tokio::test]
    async fn registration_scenario_end_to_end() {
        let pool = test_pool().await;

        assert!(register(&pool, "alice", "secret123").await.expect("register"));
        assert!(!register(&pool, "alice", "other").await.expect("collision"));
        assert!(login(&pool, "alice", "secret123")
            .await
            .expect("login")
            .is_some());
        assert!(login(&pool, "alice", "wrong").await.expect("login").is_none());

        reset_password(&pool, "alice", "newpass").await.expect("reset");
        assert!(login(&pool, "alice", "secret123")
            .await
            .expect("login")
            .is_none());
        assert!(login(&pool, "alice", "newpass")
            .await
            .expect("login")
            .is_some());
    }
}
