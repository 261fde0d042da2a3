//! Operator list

use sqlx::SqlitePool;

/// All operator names, alphabetically
pub async fn list_users(pool: &SqlitePool) -> sqlx::Result<Vec<String>> {
    sqlx::query_scalar("SELECT name FROM users ORDER BY name")
        .fetch_all(pool)
        .await
}

/// Insert any missing operators; existing names are left alone
pub async fn ensure_users(pool: &SqlitePool, names: &[String]) -> sqlx::Result<u64> {
    let mut inserted = 0;
    for name in names.iter().map(|n| n.trim()).filter(|n| !n.is_empty()) {
        inserted += sqlx::query("INSERT OR IGNORE INTO users (name) VALUES (?)")
            .bind(name)
            .execute(pool)
            .await?
            .rows_affected();
    }
    Ok(inserted)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::init_in_memory;

    #[tokio::test]
    async fn test_ensure_users_is_idempotent() {
        let pool = init_in_memory().await.unwrap();
        let names = vec!["Julius".to_string(), "Jakob".to_string(), "  ".to_string()];

        assert_eq!(ensure_users(&pool, &names).await.unwrap(), 2);
        assert_eq!(ensure_users(&pool, &names).await.unwrap(), 0);

        assert_eq!(list_users(&pool).await.unwrap(), vec!["Jakob", "Julius"]);
    }
}
