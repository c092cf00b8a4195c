use sqlx::{PgPool, SqlitePool};

use crate::db::seed::{DEFAULT_WORDS, SYSTEM_USERNAME, SYSTEM_USER_ID};
use crate::db::{Database, DbPool};

const POSTGRES_SCHEMA_SQL: &str = include_str!("../../sql/postgres_schema.sql");
const SQLITE_SCHEMA_SQL: &str = include_str!("../../sql/sqlite_schema.sql");

/// Creates the tables, the system user and the default pool. Safe to run on
/// every startup.
pub async fn initialize(db: &Database) -> Result<(), sqlx::Error> {
    let result = match db.pool() {
        DbPool::Postgres(pool) => initialize_postgres(pool).await,
        DbPool::Sqlite(pool) => initialize_sqlite(pool).await,
    };

    match &result {
        Ok(()) => tracing::info!(
            backend = db.pool().backend_name(),
            default_words = DEFAULT_WORDS.len(),
            "database schema initialized"
        ),
        Err(err) => tracing::error!(error = %err, "database schema initialization failed"),
    }

    result
}

async fn initialize_postgres(pool: &PgPool) -> Result<(), sqlx::Error> {
    let mut tx = pool.begin().await?;

    for stmt in split_sql_statements(POSTGRES_SCHEMA_SQL) {
        sqlx::query(&stmt).execute(&mut *tx).await?;
    }

    sqlx::query(
        "INSERT INTO users (user_id, username) VALUES ($1, $2) ON CONFLICT (user_id) DO NOTHING",
    )
    .bind(SYSTEM_USER_ID)
    .bind(SYSTEM_USERNAME)
    .execute(&mut *tx)
    .await?;

    for (russian, english) in DEFAULT_WORDS {
        sqlx::query(
            r#"
            INSERT INTO words (user_id, russian, english)
            VALUES ($1, $2, $3)
            ON CONFLICT (user_id, russian, english) DO NOTHING
            "#,
        )
        .bind(SYSTEM_USER_ID)
        .bind(*russian)
        .bind(*english)
        .execute(&mut *tx)
        .await?;
    }

    tx.commit().await
}

async fn initialize_sqlite(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    let mut tx = pool.begin().await?;

    for stmt in split_sql_statements(SQLITE_SCHEMA_SQL) {
        sqlx::query(&stmt).execute(&mut *tx).await?;
    }

    sqlx::query(
        "INSERT INTO users (user_id, username) VALUES (?, ?) ON CONFLICT (user_id) DO NOTHING",
    )
    .bind(SYSTEM_USER_ID)
    .bind(SYSTEM_USERNAME)
    .execute(&mut *tx)
    .await?;

    for (russian, english) in DEFAULT_WORDS {
        sqlx::query(
            r#"
            INSERT INTO words (user_id, russian, english)
            VALUES (?, ?, ?)
            ON CONFLICT (user_id, russian, english) DO NOTHING
            "#,
        )
        .bind(SYSTEM_USER_ID)
        .bind(*russian)
        .bind(*english)
        .execute(&mut *tx)
        .await?;
    }

    tx.commit().await
}

/// Splits a schema script on `;` outside quotes and drops `--` comment lines.
pub fn split_sql_statements(sql: &str) -> Vec<String> {
    let mut statements = Vec::new();
    let mut current = String::new();
    let mut in_single_quote = false;
    let mut in_double_quote = false;

    for line in sql.lines() {
        if line.trim_start().starts_with("--") {
            continue;
        }

        for ch in line.chars() {
            match ch {
                '\'' if !in_double_quote => in_single_quote = !in_single_quote,
                '"' if !in_single_quote => in_double_quote = !in_double_quote,
                ';' if !in_single_quote && !in_double_quote => {
                    let stmt = current.trim();
                    if !stmt.is_empty() {
                        statements.push(stmt.to_string());
                    }
                    current.clear();
                    continue;
                }
                _ => {}
            }
            current.push(ch);
        }
        current.push('\n');
    }

    let tail = current.trim();
    if !tail.is_empty() {
        statements.push(tail.to_string());
    }

    statements
}
