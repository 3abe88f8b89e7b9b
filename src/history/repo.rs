use sqlx::SqlitePool;

use crate::db::now_stamp;
use crate::history::repo_types::QueryLog;

impl QueryLog {
    /// Append one exchange with the insertion time stamped.
    pub async fn append(
        db: &SqlitePool,
        username: &str,
        user_message: &str,
        bot_response: &str,
    ) -> anyhow::Result<()> {
        sqlx::query(
            r#"
            INSERT INTO query_log (username, user_message, bot_response, timestamp)
            VALUES (?1, ?2, ?3, ?4)
            "#,
        )
        .bind(username)
        .bind(user_message)
        .bind(bot_response)
        .bind(now_stamp())
        .execute(db)
        .await?;
        Ok(())
    }

    pub async fn list_by_user(db: &SqlitePool, username: &str) -> anyhow::Result<Vec<QueryLog>> {
        let rows = sqlx::query_as::<_, QueryLog>(
            r#"
            SELECT id, username, user_message, bot_response, timestamp
            FROM query_log
            WHERE username = ?1
            ORDER BY id
            "#,
        )
        .bind(username)
        .fetch_all(db)
        .await?;
        Ok(rows)
    }

    pub async fn list_all(db: &SqlitePool) -> anyhow::Result<Vec<QueryLog>> {
        let rows = sqlx::query_as::<_, QueryLog>(
            r#"
            SELECT id, username, user_message, bot_response, timestamp
            FROM query_log
            ORDER BY id
            "#,
        )
        .fetch_all(db)
        .await?;
        Ok(rows)
    }

    /// Remove every row for a user; part of account-deletion cleanup, since
    /// there is no foreign key to cascade.
    pub async fn delete_for_user(db: &SqlitePool, username: &str) -> anyhow::Result<()> {
        sqlx::query("DELETE FROM query_log WHERE username = ?1")
            .bind(username)
            .execute(db)
            .await?;
        Ok(())
    }
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

    #[tokio::test]
    async fn append_and_list_preserve_insertion_order() {
        let pool = test_pool().await;

        QueryLog::append(&pool, "alice", "hi", "hello").await.expect("append");
        QueryLog::append(&pool, "alice", "how are you", "fine").await.expect("append");
        QueryLog::append(&pool, "bob", "hey", "hi bob").await.expect("append");

        let entries = QueryLog::list_by_user(&pool, "alice").await.expect("list");
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].user_message.as_deref(), Some("hi"));
        assert_eq!(entries[1].user_message.as_deref(), Some("how are you"));
        assert!(entries.iter().all(|e| e.timestamp.is_some()));

        let all = QueryLog::list_all(&pool).await.expect("list all");
        assert_eq!(all.len(), 3);
    }

    #[tokio::test]
    async fn delete_for_user_removes_only_that_user() {
        let pool = test_pool().await;

        QueryLog::append(&pool, "alice", "hi", "hello").await.expect("append");
        QueryLog::append(&pool, "bob", "hey", "hi bob").await.expect("append");

        QueryLog::delete_for_user(&pool, "alice").await.expect("delete");

        assert!(QueryLog::list_by_user(&pool, "alice")
            .await
            .expect("list")
            .is_empty());
        assert_eq!(QueryLog::list_all(&pool).await.expect("list all").len(), 1);

        // Unknown users delete cleanly.
        QueryLog::delete_for_user(&pool, "ghost").await.expect("delete");
    }
}
