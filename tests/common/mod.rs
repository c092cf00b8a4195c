#![allow(dead_code)]

use std::sync::atomic::{AtomicBool, AtomicI32, Ordering};
use std::sync::Arc;

use parking_lot::Mutex;
use tempfile::TempDir;

use slova_bot::db::config::DbConfig;
use slova_bot::db::operations::{SaveOutcome, WordPair};
use slova_bot::db::{schema, Database, DbPool};
use slova_bot::dialogue::{DialogueController, Keyboard, Messenger, Reply, TransportError};
use slova_bot::session::SessionStore;
use slova_bot::store::{SqlWordStore, StoreError, StoreResult, WordStore};

/// A freshly initialized SQLite database that lives as long as the guard.
pub struct TestDb {
    pub db: Database,
    _dir: TempDir,
}

pub async fn create_test_db() -> TestDb {
    let dir = TempDir::new().expect("failed to create temp dir");
    let config = DbConfig::sqlite(dir.path().join("slova.db"));
    let db = Database::connect(&config).await.expect("failed to open sqlite db");
    schema::initialize(&db).await.expect("failed to initialize schema");
    TestDb { db, _dir: dir }
}

/// Row count for one owner, read straight from the table.
pub async fn count_words(db: &Database, user_id: i64) -> i64 {
    let count = match db.pool() {
        DbPool::Postgres(pool) => {
            sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM words WHERE user_id = $1")
                .bind(user_id)
                .fetch_one(pool)
                .await
        }
        DbPool::Sqlite(pool) => {
            sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM words WHERE user_id = ?")
                .bind(user_id)
                .fetch_one(pool)
                .await
        }
    };
    count.expect("failed to count words")
}

pub async fn create_test_store() -> (SqlWordStore, TestDb) {
    let test_db = create_test_db().await;
    (SqlWordStore::new(test_db.db.clone()), test_db)
}

pub async fn create_test_controller() -> (DialogueController<SqlWordStore>, TestDb) {
    let (store, test_db) = create_test_store().await;
    (DialogueController::new(store, Arc::new(SessionStore::new())), test_db)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Sent {
    Message { chat_id: i64, reply: Reply },
    CallbackAnswer { callback_id: String, toast: Option<String> },
    Deleted { chat_id: i64, message_id: i32 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Failure {
    None,
    Unreachable,
    /// Only the next send fails.
    NextRequest,
    /// The given number of requests succeed, then one fails.
    AfterRequests(usize),
}

pub struct RecordingMessenger {
    sent: Mutex<Vec<Sent>>,
    next_id: AtomicI32,
    failure: Mutex<Failure>,
}

impl RecordingMessenger {
    pub fn new() -> Self {
        Self {
            sent: Mutex::new(Vec::new()),
            next_id: AtomicI32::new(100),
            failure: Mutex::new(Failure::None),
        }
    }

    pub fn fail_with(&self, failure: Failure) {
        *self.failure.lock() = failure;
    }

    pub fn take(&self) -> Vec<Sent> {
        std::mem::take(&mut *self.sent.lock())
    }

    pub fn texts(&self) -> Vec<String> {
        self.take()
            .into_iter()
            .filter_map(|sent| match sent {
                Sent::Message { reply, .. } => Some(reply.text),
                _ => None,
            })
            .collect()
    }

    fn check_failure(&self, chat_id: i64) -> Result<(), TransportError> {
        let mut failure = self.failure.lock();
        match *failure {
            Failure::None => Ok(()),
            Failure::Unreachable => Err(TransportError::ChatUnreachable { chat_id }),
            Failure::NextRequest | Failure::AfterRequests(0) => {
                *failure = Failure::None;
                Err(TransportError::Request("Bad Gateway".to_string()))
            }
            Failure::AfterRequests(left) => {
                *failure = Failure::AfterRequests(left - 1);
                Ok(())
            }
        }
    }
}

impl Messenger for RecordingMessenger {
    async fn send(&self, chat_id: i64, reply: Reply) -> Result<i32, TransportError> {
        self.check_failure(chat_id)?;
        self.sent.lock().push(Sent::Message { chat_id, reply });
        Ok(self.next_id.fetch_add(1, Ordering::SeqCst))
    }

    async fn answer_callback(&self, callback_id: &str, toast: Option<&str>) -> Result<(), TransportError> {
        self.check_failure(0)?;
        self.sent.lock().push(Sent::CallbackAnswer {
            callback_id: callback_id.to_string(),
            toast: toast.map(str::to_string),
        });
        Ok(())
    }

    async fn delete_message(&self, chat_id: i64, message_id: i32) -> Result<(), TransportError> {
        self.check_failure(chat_id)?;
        self.sent.lock().push(Sent::Deleted { chat_id, message_id });
        Ok(())
    }
}

pub fn keyboard_of(sent: &Sent) -> Option<&Keyboard> {
    match sent {
        Sent::Message { reply, .. } => Some(&reply.keyboard),
        _ => None,
    }
}

/// Store whose every query fails, except `random_word` when a word is given.
pub struct BrokenStore {
    pub word: Option<WordPair>,
}

fn broken(operation: &'static str) -> StoreError {
    StoreError::Database {
        operation,
        source: sqlx::Error::PoolTimedOut,
    }
}

impl WordStore for BrokenStore {
    async fn save_word(&self, _user_id: i64, _russian: &str, _english: &str) -> StoreResult<SaveOutcome> {
        Err(broken("save_word"))
    }

    async fn random_word(&self, _user_id: i64) -> StoreResult<Option<WordPair>> {
        match &self.word {
            Some(word) => Ok(Some(word.clone())),
            None => Err(broken("random_word")),
        }
    }

    async fn other_words(&self, _user_id: i64, _exclude: &str, _limit: i64) -> StoreResult<Vec<String>> {
        Err(broken("other_words"))
    }

    async fn delete_word(&self, _user_id: i64, _word_id: i32) -> StoreResult<bool> {
        Err(broken("delete_word"))
    }

    async fn user_words(&self, _user_id: i64) -> StoreResult<Vec<WordPair>> {
        Err(broken("user_words"))
    }
}

/// Store holding a single word that can be drawn once. Later draws find
/// nothing, as if the dictionary had just been emptied.
pub struct SingleDrawStore {
    word: WordPair,
    drawn: AtomicBool,
}

impl SingleDrawStore {
    pub fn new(word: WordPair) -> Self {
        Self {
            word,
            drawn: AtomicBool::new(false),
        }
    }
}

impl WordStore for SingleDrawStore {
    async fn save_word(&self, _user_id: i64, _russian: &str, _english: &str) -> StoreResult<SaveOutcome> {
        Ok(SaveOutcome::Duplicate)
    }

    async fn random_word(&self, _user_id: i64) -> StoreResult<Option<WordPair>> {
        if self.drawn.swap(true, Ordering::SeqCst) {
            Ok(None)
        } else {
            Ok(Some(self.word.clone()))
        }
    }

    async fn other_words(&self, _user_id: i64, _exclude: &str, _limit: i64) -> StoreResult<Vec<String>> {
        Ok(vec!["Red".to_string(), "Blue".to_string()])
    }

    async fn delete_word(&self, _user_id: i64, _word_id: i32) -> StoreResult<bool> {
        Ok(false)
    }

    async fn user_words(&self, _user_id: i64) -> StoreResult<Vec<WordPair>> {
        Ok(Vec::new())
    }
}
