use std::sync::Arc;

use teloxide::prelude::*;
use teloxide::types::{
    InlineKeyboardButton, InlineKeyboardMarkup, KeyboardButton, KeyboardMarkup, KeyboardRemove, MessageId,
    ParseMode, ReplyMarkup,
};
use teloxide::{ApiError, RequestError};

use crate::dialogue::{CallbackEvent, DialogueController, Keyboard, Messenger, Reply, TextEvent, TransportError};
use crate::store::WordStore;

#[derive(Clone)]
pub struct TelegramMessenger {
    bot: Bot,
}

impl TelegramMessenger {
    pub fn new(bot: Bot) -> Self {
        Self { bot }
    }
}

impl Messenger for TelegramMessenger {
    async fn send(&self, chat_id: i64, reply: Reply) -> Result<i32, TransportError> {
        let mut request = self
            .bot
            .send_message(ChatId(chat_id), reply.text)
            .parse_mode(ParseMode::Html);
        if let Some(markup) = reply_markup(reply.keyboard) {
            request = request.reply_markup(markup);
        }

        let message = request.await.map_err(|err| transport_error(chat_id, err))?;
        Ok(message.id.0)
    }

    async fn answer_callback(&self, callback_id: &str, toast: Option<&str>) -> Result<(), TransportError> {
        let mut request = self.bot.answer_callback_query(callback_id.to_string());
        if let Some(text) = toast {
            request = request.text(text);
        }
        request.await.map(|_| ()).map_err(|err| transport_error(0, err))
    }

    async fn delete_message(&self, chat_id: i64, message_id: i32) -> Result<(), TransportError> {
        self.bot
            .delete_message(ChatId(chat_id), MessageId(message_id))
            .await
            .map(|_| ())
            .map_err(|err| transport_error(chat_id, err))
    }
}

fn reply_markup(keyboard: Keyboard) -> Option<ReplyMarkup> {
    match keyboard {
        Keyboard::Keep => None,
        Keyboard::Remove => Some(ReplyMarkup::KeyboardRemove(KeyboardRemove::new())),
        Keyboard::Reply(rows) => {
            let rows = rows
                .into_iter()
                .map(|row| row.into_iter().map(KeyboardButton::new).collect::<Vec<_>>());
            Some(ReplyMarkup::Keyboard(KeyboardMarkup::new(rows).resize_keyboard()))
        }
        Keyboard::Inline(buttons) => {
            let rows = buttons
                .into_iter()
                .map(|button| vec![InlineKeyboardButton::callback(button.label, button.action.token())]);
            Some(ReplyMarkup::InlineKeyboard(InlineKeyboardMarkup::new(rows)))
        }
    }
}

fn transport_error(chat_id: i64, err: RequestError) -> TransportError {
    match err {
        RequestError::Api(
            ApiError::BotBlocked | ApiError::ChatNotFound | ApiError::UserDeactivated | ApiError::BotKicked,
        ) => TransportError::ChatUnreachable { chat_id },
        other => TransportError::Request(other.to_string()),
    }
}

/// Long-polls Telegram until Ctrl+C, feeding every update to the controller.
pub async fn run<S: WordStore>(bot: Bot, controller: Arc<DialogueController<S>>) {
    let handler = dptree::entry()
        .branch(Update::filter_message().endpoint(on_message::<S>))
        .branch(Update::filter_callback_query().endpoint(on_callback::<S>));

    tracing::info!("bot started");

    Dispatcher::builder(bot, handler)
        .dependencies(dptree::deps![controller])
        .enable_ctrlc_handler()
        .build()
        .dispatch()
        .await;

    tracing::info!("bot dispatcher stopped");
}

async fn on_message<S: WordStore>(
    bot: Bot,
    msg: Message,
    controller: Arc<DialogueController<S>>,
) -> ResponseResult<()> {
    let Some(text) = msg.text() else {
        return Ok(());
    };

    let chat_id = msg.chat.id.0;
    let user_id = msg
        .from
        .as_ref()
        .map(|user| user.id.0 as i64)
        .unwrap_or(chat_id);

    let messenger = TelegramMessenger::new(bot);
    controller
        .handle_text(&messenger, TextEvent { chat_id, user_id, text })
        .await;
    Ok(())
}

async fn on_callback<S: WordStore>(
    bot: Bot,
    query: CallbackQuery,
    controller: Arc<DialogueController<S>>,
) -> ResponseResult<()> {
    let user_id = query.from.id.0 as i64;
    let (chat_id, message_id) = match query.message.as_ref() {
        Some(message) => (message.chat().id.0, Some(message.id().0)),
        None => (user_id, None),
    };

    let messenger = TelegramMessenger::new(bot);
    controller
        .handle_callback(
            &messenger,
            CallbackEvent {
                callback_id: &query.id,
                chat_id,
                user_id,
                message_id,
                data: query.data.as_deref().unwrap_or_default(),
            },
        )
        .await;
    Ok(())
}
