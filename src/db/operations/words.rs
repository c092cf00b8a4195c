use chrono::NaiveDateTime;

use crate::db::seed::SYSTEM_USER_ID;
use crate::db::{Database, DbPool};

#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct WordPair {
    pub word_id: i32,
    pub user_id: i64,
    pub russian: String,
    pub english: String,
    pub added_at: Option<NaiveDateTime>,
}

impl WordPair {
    pub fn is_default_pool(&self) -> bool {
        self.user_id == SYSTEM_USER_ID
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveOutcome {
    Saved,
    Duplicate,
}

pub async fn save_word(
    db: &Database,
    user_id: i64,
    russian: &str,
    english: &str,
) -> Result<SaveOutcome, sqlx::Error> {
    let inserted = match db.pool() {
        DbPool::Postgres(pool) => {
            let mut tx = pool.begin().await?;
            sqlx::query("INSERT INTO users (user_id) VALUES ($1) ON CONFLICT DO NOTHING")
                .bind(user_id)
                .execute(&mut *tx)
                .await?;
            let result = sqlx::query(
                r#"
                INSERT INTO words (user_id, russian, english)
                VALUES ($1, $2, $3)
                ON CONFLICT (user_id, russian, english) DO NOTHING
                "#,
            )
            .bind(user_id)
            .bind(russian)
            .bind(english)
            .execute(&mut *tx)
            .await?;
            tx.commit().await?;
            result.rows_affected()
        }
        DbPool::Sqlite(pool) => {
            let mut tx = pool.begin().await?;
            sqlx::query("INSERT INTO users (user_id) VALUES (?) ON CONFLICT DO NOTHING")
                .bind(user_id)
                .execute(&mut *tx)
                .await?;
            let result = sqlx::query(
                r#"
                INSERT INTO words (user_id, russian, english)
                VALUES (?, ?, ?)
                ON CONFLICT (user_id, russian, english) DO NOTHING
                "#,
            )
            .bind(user_id)
            .bind(russian)
            .bind(english)
            .execute(&mut *tx)
            .await?;
            tx.commit().await?;
            result.rows_affected()
        }
    };

    Ok(if inserted > 0 {
        SaveOutcome::Saved
    } else {
        SaveOutcome::Duplicate
    })
}

pub async fn random_word(db: &Database, user_id: i64) -> Result<Option<WordPair>, sqlx::Error> {
    match db.pool() {
        DbPool::Postgres(pool) => {
            sqlx::query_as::<_, WordPair>(
                r#"
                SELECT word_id, user_id, russian, english, added_at
                FROM words
                WHERE user_id IN ($1, $2)
                ORDER BY RANDOM()
                LIMIT 1
                "#,
            )
            .bind(user_id)
            .bind(SYSTEM_USER_ID)
            .fetch_optional(pool)
            .await
        }
        DbPool::Sqlite(pool) => {
            sqlx::query_as::<_, WordPair>(
                r#"
                SELECT word_id, user_id, russian, english, added_at
                FROM words
                WHERE user_id IN (?, ?)
                ORDER BY RANDOM()
                LIMIT 1
                "#,
            )
            .bind(user_id)
            .bind(SYSTEM_USER_ID)
            .fetch_optional(pool)
            .await
        }
    }
}

pub async fn other_words(
    db: &Database,
    user_id: i64,
    exclude_english: &str,
    limit: i64,
) -> Result<Vec<String>, sqlx::Error> {
    match db.pool() {
        DbPool::Postgres(pool) => {
            sqlx::query_scalar::<_, String>(
                r#"
                SELECT english FROM words
                WHERE user_id IN ($1, $2)
                AND english != $3
                ORDER BY RANDOM()
                LIMIT $4
                "#,
            )
            .bind(user_id)
            .bind(SYSTEM_USER_ID)
            .bind(exclude_english)
            .bind(limit)
            .fetch_all(pool)
            .await
        }
        DbPool::Sqlite(pool) => {
            sqlx::query_scalar::<_, String>(
                r#"
                SELECT english FROM words
                WHERE user_id IN (?, ?)
                AND english != ?
                ORDER BY RANDOM()
                LIMIT ?
                "#,
            )
            .bind(user_id)
            .bind(SYSTEM_USER_ID)
            .bind(exclude_english)
            .bind(limit)
            .fetch_all(pool)
            .await
        }
    }
}

pub async fn delete_word(db: &Database, user_id: i64, word_id: i32) -> Result<bool, sqlx::Error> {
    let result = match db.pool() {
        DbPool::Postgres(pool) => {
            sqlx::query(
                r#"
                DELETE FROM words
                WHERE user_id = $1 AND word_id = $2 AND user_id != $3
                "#,
            )
            .bind(user_id)
            .bind(word_id)
            .bind(SYSTEM_USER_ID)
            .execute(pool)
            .await?
            .rows_affected()
        }
        DbPool::Sqlite(pool) => {
            sqlx::query(
                r#"
                DELETE FROM words
                WHERE user_id = ? AND word_id = ? AND user_id != ?
                "#,
            )
            .bind(user_id)
            .bind(word_id)
            .bind(SYSTEM_USER_ID)
            .execute(pool)
            .await?
            .rows_affected()
        }
    };

    Ok(result > 0)
}

pub async fn user_words(db: &Database, user_id: i64) -> Result<Vec<WordPair>, sqlx::Error> {
    match db.pool() {
        DbPool::Postgres(pool) => {
            sqlx::query_as::<_, WordPair>(
                r#"
                SELECT word_id, user_id, russian, english, added_at
                FROM words
                WHERE user_id = $1 AND user_id != $2
                ORDER BY added_at DESC, word_id DESC
                "#,
            )
            .bind(user_id)
            .bind(SYSTEM_USER_ID)
            .fetch_all(pool)
            .await
        }
        DbPool::Sqlite(pool) => {
            sqlx::query_as::<_, WordPair>(
                r#"
                SELECT word_id, user_id, russian, english, added_at
                FROM words
                WHERE user_id = ? AND user_id != ?
                ORDER BY added_at DESC, word_id DESC
                "#,
            )
            .bind(user_id)
            .bind(SYSTEM_USER_ID)
            .fetch_all(pool)
            .await
        }
    }
}
