use std::future::Future;

use thiserror::Error;

use crate::dialogue::reply::Reply;

#[derive(Debug, Error)]
pub enum TransportError {
    /// The chat is gone or has blocked the bot; nothing more can be sent.
    #[error("chat {chat_id} is unreachable")]
    ChatUnreachable { chat_id: i64 },
    #[error("transport request failed: {0}")]
    Request(String),
}

/// Outbound side of the chat platform.
pub trait Messenger: Send + Sync {
    /// Sends a message and returns its id.
    fn send(&self, chat_id: i64, reply: Reply) -> impl Future<Output = Result<i32, TransportError>> + Send;

    fn answer_callback(
        &self,
        callback_id: &str,
        toast: Option<&str>,
    ) -> impl Future<Output = Result<(), TransportError>> + Send;

    fn delete_message(&self, chat_id: i64, message_id: i32) -> impl Future<Output = Result<(), TransportError>> + Send;
}
