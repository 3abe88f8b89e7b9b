use sqlx::SqlitePool;

use crate::accounts::repo_types::{Profile, User};
use crate::db::now_stamp;

impl User {
    /// Insert a new user with `account_created` stamped; false when the
    /// username is already taken.
    pub async fn create(db: &SqlitePool, username: &str, digest: &str) -> anyhow::Result<bool> {
        let result = sqlx::query(
            r#"
            INSERT INTO users (username, password, account_created)
            VALUES (?1, ?2, ?3)
            "#,
        )
        .bind(username)
        .bind(digest)
        .bind(now_stamp())
        .execute(db)
        .await;

        match result {
            Ok(_) => Ok(true),
            Err(sqlx::Error::Database(e)) if e.is_unique_violation() => Ok(false),
            Err(e) => Err(e.into()),
        }
    }

    /// Exact match on username and digest. An unknown username and a wrong
    /// digest produce the same `None`.
    pub async fn find_by_credentials(
        db: &SqlitePool,
        username: &str,
        digest: &str,
    ) -> anyhow::Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, username, password, age, gender, language,
                   account_created, last_login, last_profile_update
            FROM users
            WHERE username = ?1 AND password = ?2
            "#,
        )
        .bind(username)
        .bind(digest)
        .fetch_optional(db)
        .await?;
        Ok(user)
    }

    pub async fn fetch_profile(
        db: &SqlitePool,
        username: &str,
    ) -> anyhow::Result<Option<Profile>> {
        let profile = sqlx::query_as::<_, Profile>(
            r#"
            SELECT age, gender, language, account_created, last_login, last_profile_update
            FROM users
            WHERE username = ?1
            "#,
        )
        .bind(username)
        .fetch_optional(db)
        .await?;
        Ok(profile)
    }

    /// Overwrite all three profile fields and stamp `last_profile_update`.
    /// No partial update.
    pub async fn update_profile(
        db: &SqlitePool,
        username: &str,
        age: i64,
        gender: &str,
        language: &str,
    ) -> anyhow::Result<()> {
        sqlx::query(
            r#"
            UPDATE users
            SET age = ?1, gender = ?2, language = ?3, last_profile_update = ?4
            WHERE username = ?5
            "#,
        )
        .bind(age)
        .bind(gender)
        .bind(language)
        .bind(now_stamp())
        .bind(username)
        .execute(db)
        .await?;
        Ok(())
    }

    /// Overwrite the stored digest; touches no other column. Matching zero
    /// rows is not an error.
    pub async fn update_password(
        db: &SqlitePool,
        username: &str,
        digest: &str,
    ) -> anyhow::Result<()> {
        sqlx::query("UPDATE users SET password = ?1 WHERE username = ?2")
            .bind(digest)
            .bind(username)
            .execute(db)
            .await?;
        Ok(())
    }

    /// Stamp `last_login`; invoked only after a successful credential match.
    pub async fn touch_login(db: &SqlitePool, username: &str) -> anyhow::Result<()> {
        sqlx::query("UPDATE users SET last_login = ?1 WHERE username = ?2")
            .bind(now_stamp())
            .bind(username)
            .execute(db)
            .await?;
        Ok(())
    }

    /// Idempotent removal; deleting an absent user is a no-op.
    pub async fn delete(db: &SqlitePool, username: &str) -> anyhow::Result<()> {
        sqlx::query("DELETE FROM users WHERE username = ?1")
            .bind(username)
            .execute(db)
            .await?;
        Ok(())
    }

    pub async fn list_all(db: &SqlitePool) -> anyhow::Result<Vec<User>> {
        let users = sqlx::query_as::<_, User>(
            r#"
            SELECT id, username, password, age, gender, language,
                   account_created, last_login, last_profile_update
            FROM users
            ORDER BY id
            "#,
        )
        .fetch_all(db)
        .await?;
        Ok(users)
    }
}
