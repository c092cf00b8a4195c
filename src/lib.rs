pub mod config;
pub mod db;
pub mod dialogue;
pub mod logging;
pub mod session;
pub mod store;
pub mod telegram;
pub mod workers;

use std::sync::Arc;

use crate::db::Database;
use crate::dialogue::DialogueController;
use crate::session::SessionStore;
use crate::store::SqlWordStore;

/// Runs schema initialization and wires the store and sessions into a
/// controller.
pub async fn create_controller(
    db: Database,
    sessions: Arc<SessionStore>,
) -> Result<DialogueController<SqlWordStore>, sqlx::Error> {
    db::schema::initialize(&db).await?;
    Ok(DialogueController::new(SqlWordStore::new(db), sessions))
}
