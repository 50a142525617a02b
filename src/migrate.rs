use anyhow::Result;
use sqlx::SqlitePool;

/// Create the `strings` table and its index. Safe to run repeatedly.
pub async fn run_migrations(pool: &SqlitePool) -> Result<()> {
    // properties holds the JSON-encoded property bundle
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS strings (
            id TEXT PRIMARY KEY,
            value TEXT NOT NULL,
            properties TEXT NOT NULL,
            created_at TEXT NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query("CREATE INDEX IF NOT EXISTS idx_strings_value ON strings(value)")
        .execute(pool)
        .await?;
    sqlx::query("CREATE INDEX IF NOT EXISTS idx_strings_created_at ON strings(created_at)")
        .execute(pool)
        .await?;

    Ok(())
}
