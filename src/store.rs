use std::future::Future;

use thiserror::Error;

use crate::db::operations::{self, SaveOutcome, WordPair};
use crate::db::Database;

/// How many wrong answers a quiz round asks for.
pub const DISTRACTOR_LIMIT: i64 = 3;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("{operation} failed: {source}")]
    Database {
        operation: &'static str,
        #[source]
        source: sqlx::Error,
    },
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Read/write access to users and word pairs. Implementations log every fault
/// before returning it; callers decide which safe default to fall back to.
pub trait WordStore: Send + Sync + 'static {
    fn save_word(
        &self,
        user_id: i64,
        russian: &str,
        english: &str,
    ) -> impl Future<Output = StoreResult<SaveOutcome>> + Send;

    /// One row from the user's words plus the default pool, uniformly at random.
    fn random_word(&self, user_id: i64) -> impl Future<Output = StoreResult<Option<WordPair>>> + Send;

    fn other_words(
        &self,
        user_id: i64,
        exclude_english: &str,
        limit: i64,
    ) -> impl Future<Output = StoreResult<Vec<String>>> + Send;

    fn delete_word(&self, user_id: i64, word_id: i32) -> impl Future<Output = StoreResult<bool>> + Send;

    /// The user's own words, newest first. Never includes the default pool.
    fn user_words(&self, user_id: i64) -> impl Future<Output = StoreResult<Vec<WordPair>>> + Send;
}

#[derive(Clone)]
pub struct SqlWordStore {
    db: Database,
}

impl SqlWordStore {
    pub fn new(db: Database) -> Self {
        Self { db }
    }
}

impl WordStore for SqlWordStore {
    async fn save_word(&self, user_id: i64, russian: &str, english: &str) -> StoreResult<SaveOutcome> {
        let result = operations::save_word(&self.db, user_id, russian, english).await;
        if let Ok(outcome) = &result {
            tracing::debug!(user_id, russian, english, ?outcome, "save word");
        }
        logged("save_word", user_id, result)
    }

    async fn random_word(&self, user_id: i64) -> StoreResult<Option<WordPair>> {
        logged("random_word", user_id, operations::random_word(&self.db, user_id).await)
    }

    async fn other_words(&self, user_id: i64, exclude_english: &str, limit: i64) -> StoreResult<Vec<String>> {
        let result = operations::other_words(&self.db, user_id, exclude_english, limit).await;
        logged("other_words", user_id, result)
    }

    async fn delete_word(&self, user_id: i64, word_id: i32) -> StoreResult<bool> {
        let result = operations::delete_word(&self.db, user_id, word_id).await;
        logged("delete_word", user_id, result)
    }

    async fn user_words(&self, user_id: i64) -> StoreResult<Vec<WordPair>> {
        logged("user_words", user_id, operations::user_words(&self.db, user_id).await)
    }
}

fn logged<T>(operation: &'static str, user_id: i64, result: Result<T, sqlx::Error>) -> StoreResult<T> {
    result.map_err(|source| {
        tracing::error!(operation, user_id, error = %source, "word store query failed");
        StoreError::Database { operation, source }
    })
}
