use anyhow::Result;

use super::schema::Database;

/// Key under which the session token is persisted.
pub const SESSION_TOKEN_KEY: &str = "session.token";

impl Database {
    /// Read a state value by key, `None` if unset.
    pub async fn get_state(&self, key: &str) -> Result<Option<String>> {
        let row: Option<(String,)> = sqlx::query_as("SELECT value FROM client_state WHERE key = ?")
            .bind(key)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.map(|(value,)| value))
    }

    /// Insert or replace a state value.
    pub async fn set_state(&self, key: &str, value: &str) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO client_state (key, value, updated_at)
            VALUES (?, ?, datetime('now'))
            ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at
        "#,
        )
        .bind(key)
        .bind(value)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Delete a state value. Deleting a missing key is not an error.
    pub async fn delete_state(&self, key: &str) -> Result<()> {
        sqlx::query("DELETE FROM client_state WHERE key = ?")
            .bind(key)
            .execute(&self.pool)
            .await?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use crate::storage::Database;

    async fn test_db() -> Database {
        Database::open(":memory:").await.unwrap()
    }

    #[tokio::test]
    async fn test_get_missing_state() {
        let db = test_db().await;
        assert_eq!(db.get_state("session.token").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_set_then_get() {
        let db = test_db().await;
        db.set_state("session.token", "tok123").await.unwrap();
        assert_eq!(
            db.get_state("session.token").await.unwrap(),
            Some("tok123".to_string())
        );
    }

    #[tokio::test]
    async fn test_set_overwrites() {
        let db = test_db().await;
        db.set_state("session.token", "old").await.unwrap();
        db.set_state("session.token", "new").await.unwrap();
        assert_eq!(
            db.get_state("session.token").await.unwrap().as_deref(),
            Some("new")
        );

        let row: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM client_state")
            .fetch_one(&db.pool)
            .await
            .unwrap();
        assert_eq!(row.0, 1);
    }

    #[tokio::test]
    async fn test_delete_state() {
        let db = test_db().await;
        db.set_state("session.token", "tok").await.unwrap();
        db.delete_state("session.token").await.unwrap();
        assert_eq!(db.get_state("session.token").await.unwrap(), None);

        // Deleting again is a no-op
        db.delete_state("session.token").await.unwrap();
    }
}
