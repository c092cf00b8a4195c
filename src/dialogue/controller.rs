use std::sync::Arc;

use rand::seq::IndexedRandom;
use thiserror::Error;

use crate::db::operations::SaveOutcome;
use crate::dialogue::menu::{parse_word_pair, Input, MenuButton, PairError};
use crate::dialogue::messenger::{Messenger, TransportError};
use crate::dialogue::quiz::{self, QuizRound, Verdict};
use crate::dialogue::reply::{
    add_word_keyboard, delete_keyboard, main_menu_keyboard, quiz_keyboard, CallbackAction, Keyboard, Reply,
};
use crate::dialogue::texts;
use crate::session::{DialogueState, Mode, SessionGuard, SessionStore};
use crate::store::WordStore;

#[derive(Debug, Clone, Copy)]
pub struct TextEvent<'a> {
    pub chat_id: i64,
    pub user_id: i64,
    pub text: &'a str,
}

#[derive(Debug, Clone, Copy)]
pub struct CallbackEvent<'a> {
    pub callback_id: &'a str,
    pub chat_id: i64,
    pub user_id: i64,
    /// The message holding the inline keyboard, when still accessible.
    pub message_id: Option<i32>,
    pub data: &'a str,
}

#[derive(Debug, Error)]
pub enum DialogueError {
    #[error(transparent)]
    Transport(#[from] TransportError),
}

type HandlerResult = Result<(), DialogueError>;

/// Routes inbound events through the idle / adding_word / quiz state machine.
pub struct DialogueController<S> {
    store: S,
    sessions: Arc<SessionStore>,
}

impl<S: WordStore> DialogueController<S> {
    pub fn new(store: S, sessions: Arc<SessionStore>) -> Self {
        Self { store, sessions }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn sessions(&self) -> &Arc<SessionStore> {
        &self.sessions
    }

    pub async fn handle_text<M: Messenger>(&self, messenger: &M, event: TextEvent<'_>) {
        let mut session = self.sessions.lock(event.chat_id).await;

        if let Err(err) = self.dispatch_text(messenger, &mut session, event).await {
            report_failure(
                messenger,
                event.chat_id,
                &err,
                texts::GENERIC_ERROR,
                "text handler failed",
            )
            .await;
        }
    }

    pub async fn handle_callback<M: Messenger>(&self, messenger: &M, event: CallbackEvent<'_>) {
        // Held only to serialize with text events; the callback channel never
        // reads or writes the dialogue state.
        let _session = self.sessions.lock(event.chat_id).await;

        let mut answered = false;
        if let Err(err) = self.dispatch_callback(messenger, event, &mut answered).await {
            let reachable = report_failure(
                messenger,
                event.chat_id,
                &err,
                texts::CALLBACK_FAILED,
                "callback handler failed",
            )
            .await;
            if !reachable {
                return;
            }
            // Telegram accepts a single answer per query.
            if !answered {
                if let Err(err) = messenger
                    .answer_callback(event.callback_id, Some(texts::DELETE_FAILED_TOAST))
                    .await
                {
                    tracing::warn!(error = %err, "failed to answer callback query");
                }
            }
            if let Err(err) = self.send_main_menu(messenger, event.chat_id).await {
                tracing::warn!(chat_id = event.chat_id, error = %err, "failed to re-show main menu");
            }
        }
    }

    async fn dispatch_text<M: Messenger>(
        &self,
        messenger: &M,
        session: &mut SessionGuard,
        event: TextEvent<'_>,
    ) -> HandlerResult {
        let input = Input::classify(event.text);
        tracing::debug!(
            chat_id = event.chat_id,
            user_id = event.user_id,
            mode = ?session.mode(),
            ?input,
            "text received"
        );

        match input {
            Input::Start => self.show_main_menu(messenger, session, event.user_id).await,
            Input::Menu(button) if button.is_exit() => {
                self.show_main_menu(messenger, session, event.user_id).await
            }
            Input::Menu(MenuButton::AddWord) => self.start_adding_word(messenger, session, event.user_id).await,
            Input::Menu(MenuButton::Dictionary) => self.show_dictionary(messenger, session, event.user_id).await,
            Input::Menu(MenuButton::DeleteWord) => self.show_delete_menu(messenger, session, event.user_id).await,
            Input::Menu(MenuButton::Study) => {
                session.clear();
                self.start_quiz(messenger, session, event.user_id).await
            }
            Input::Menu(MenuButton::Skip) if session.mode() == Mode::Quiz => {
                self.skip_question(messenger, session, event.user_id).await
            }
            Input::Menu(button) => {
                self.handle_free_text(messenger, session, event, button.label())
                    .await
            }
            Input::FreeText(text) => self.handle_free_text(messenger, session, event, &text).await,
        }
    }

    async fn handle_free_text<M: Messenger>(
        &self,
        messenger: &M,
        session: &mut SessionGuard,
        event: TextEvent<'_>,
        text: &str,
    ) -> HandlerResult {
        match session.get().cloned() {
            Some(DialogueState::AddingWord) => self.add_word(messenger, session, event.user_id, text).await,
            Some(DialogueState::Quiz(round)) => {
                self.check_answer(messenger, session, event.user_id, &round, text)
                    .await
            }
            None => {
                tracing::warn!(
                    chat_id = event.chat_id,
                    user_id = event.user_id,
                    text,
                    "unknown message"
                );
                messenger
                    .send(session.chat_id(), Reply::text(texts::unknown_command()))
                    .await?;
                Ok(())
            }
        }
    }

    async fn show_main_menu<M: Messenger>(
        &self,
        messenger: &M,
        session: &mut SessionGuard,
        user_id: i64,
    ) -> HandlerResult {
        session.clear();
        self.send_main_menu(messenger, session.chat_id()).await?;
        tracing::info!(user_id, "user opened main menu");
        Ok(())
    }

    async fn send_main_menu<M: Messenger>(&self, messenger: &M, chat_id: i64) -> HandlerResult {
        messenger
            .send(chat_id, Reply::text(texts::WELCOME).with_keyboard(main_menu_keyboard()))
            .await?;
        Ok(())
    }

    async fn start_adding_word<M: Messenger>(
        &self,
        messenger: &M,
        session: &mut SessionGuard,
        user_id: i64,
    ) -> HandlerResult {
        messenger
            .send(
                session.chat_id(),
                Reply::text(texts::ADD_WORD_PROMPT).with_keyboard(add_word_keyboard()),
            )
            .await?;
        session.set(DialogueState::AddingWord);
        tracing::info!(user_id, "user started adding a word");
        Ok(())
    }

    async fn add_word<M: Messenger>(
        &self,
        messenger: &M,
        session: &mut SessionGuard,
        user_id: i64,
        text: &str,
    ) -> HandlerResult {
        let chat_id = session.chat_id();

        let (russian, english) = match parse_word_pair(text) {
            Ok(pair) => pair,
            Err(PairError::MissingDash) => {
                messenger.send(chat_id, Reply::text(texts::BAD_FORMAT)).await?;
                return Ok(());
            }
            Err(PairError::EmptySide) => {
                messenger
                    .send(chat_id, Reply::text(texts::BOTH_FIELDS_REQUIRED))
                    .await?;
                return Ok(());
            }
        };

        let reply = match self.store.save_word(user_id, &russian, &english).await {
            Ok(SaveOutcome::Saved) => {
                tracing::info!(user_id, %russian, %english, "word added");
                texts::word_saved(&russian, &english)
            }
            Ok(SaveOutcome::Duplicate) => texts::word_duplicate(&russian, &english),
            Err(_) => texts::GENERIC_ERROR.to_string(),
        };

        session.clear();
        messenger
            .send(chat_id, Reply::text(reply).with_keyboard(Keyboard::Remove))
            .await?;
        self.show_main_menu(messenger, session, user_id).await
    }

    async fn show_dictionary<M: Messenger>(
        &self,
        messenger: &M,
        session: &mut SessionGuard,
        user_id: i64,
    ) -> HandlerResult {
        session.clear();
        let words = self.store.user_words(user_id).await.unwrap_or_default();

        let text = if words.is_empty() {
            texts::DICTIONARY_EMPTY.to_string()
        } else {
            texts::word_list(&words)
        };
        messenger.send(session.chat_id(), Reply::text(text)).await?;

        tracing::info!(user_id, words = words.len(), "user viewed dictionary");
        Ok(())
    }

    async fn show_delete_menu<M: Messenger>(
        &self,
        messenger: &M,
        session: &mut SessionGuard,
        user_id: i64,
    ) -> HandlerResult {
        session.clear();
        let words = self.store.user_words(user_id).await.unwrap_or_default();

        let reply = if words.is_empty() {
            Reply::text(texts::DICTIONARY_EMPTY)
        } else {
            Reply::text(texts::PICK_TO_DELETE).with_keyboard(delete_keyboard(&words))
        };
        messenger.send(session.chat_id(), reply).await?;

        tracing::info!(user_id, "user opened delete menu");
        Ok(())
    }

    async fn start_quiz<M: Messenger>(
        &self,
        messenger: &M,
        session: &mut SessionGuard,
        user_id: i64,
    ) -> HandlerResult {
        let chat_id = session.chat_id();

        let Some(mut round) = quiz::next_round(&self.store, user_id).await else {
            messenger.send(chat_id, Reply::text(texts::NOTHING_TO_STUDY)).await?;
            return Ok(());
        };

        let message_id = messenger
            .send(
                chat_id,
                Reply::text(texts::quiz_question(&round.prompt)).with_keyboard(quiz_keyboard(&round.choices)),
            )
            .await?;
        round.message_id = Some(message_id);
        session.set(DialogueState::Quiz(round));
        Ok(())
    }

    async fn skip_question<M: Messenger>(
        &self,
        messenger: &M,
        session: &mut SessionGuard,
        user_id: i64,
    ) -> HandlerResult {
        if let Some(DialogueState::Quiz(round)) = session.clear() {
            tracing::info!(user_id, word = %round.prompt, "question skipped");
            messenger
                .send(
                    session.chat_id(),
                    Reply::text(texts::quiz_skipped(&round.correct)).with_keyboard(Keyboard::Remove),
                )
                .await?;
        }
        self.start_quiz(messenger, session, user_id).await
    }

    async fn check_answer<M: Messenger>(
        &self,
        messenger: &M,
        session: &mut SessionGuard,
        user_id: i64,
        round: &QuizRound,
        answer: &str,
    ) -> HandlerResult {
        let chat_id = session.chat_id();
        let verdict = round.evaluate(answer);
        tracing::info!(user_id, word = %round.prompt, answer, ?verdict, "quiz answer");

        match verdict {
            Verdict::NotAnOption => {
                messenger.send(chat_id, Reply::text(texts::quiz_pick_option())).await?;
                Ok(())
            }
            Verdict::Incorrect => {
                messenger
                    .send(chat_id, Reply::text(texts::quiz_wrong(&round.prompt)))
                    .await?;
                Ok(())
            }
            Verdict::Correct => {
                let praise = texts::PRAISE
                    .choose(&mut rand::rng())
                    .copied()
                    .unwrap_or(texts::PRAISE[0]);
                session.clear();
                messenger
                    .send(chat_id, Reply::text(praise).with_keyboard(Keyboard::Remove))
                    .await?;
                self.start_quiz(messenger, session, user_id).await
            }
        }
    }

    async fn dispatch_callback<M: Messenger>(
        &self,
        messenger: &M,
        event: CallbackEvent<'_>,
        answered: &mut bool,
    ) -> HandlerResult {
        let chat_id = event.chat_id;

        match CallbackAction::parse(event.data) {
            Some(CallbackAction::Delete(word_id)) => {
                let deleted = self
                    .store
                    .delete_word(event.user_id, word_id)
                    .await
                    .unwrap_or(false);

                if deleted {
                    tracing::info!(user_id = event.user_id, word_id, "word deleted");
                    messenger
                        .answer_callback(event.callback_id, Some(texts::DELETED_TOAST))
                        .await?;
                    *answered = true;
                    remove_keyboard_message(messenger, chat_id, event.message_id).await;
                    messenger.send(chat_id, Reply::text(texts::DELETED)).await?;
                } else {
                    tracing::warn!(user_id = event.user_id, word_id, "word not deleted");
                    messenger
                        .answer_callback(event.callback_id, Some(texts::DELETE_FAILED_TOAST))
                        .await?;
                    *answered = true;
                    messenger.send(chat_id, Reply::text(texts::DELETE_FAILED)).await?;
                }
            }
            Some(CallbackAction::CancelDelete) => {
                remove_keyboard_message(messenger, chat_id, event.message_id).await;
                messenger.answer_callback(event.callback_id, None).await?;
                *answered = true;
            }
            None => {
                tracing::warn!(user_id = event.user_id, data = event.data, "unknown callback payload");
                messenger
                    .answer_callback(event.callback_id, Some(texts::DELETE_FAILED_TOAST))
                    .await?;
                *answered = true;
                messenger.send(chat_id, Reply::text(texts::CALLBACK_FAILED)).await?;
            }
        }

        self.send_main_menu(messenger, chat_id).await
    }
}

async fn remove_keyboard_message<M: Messenger>(messenger: &M, chat_id: i64, message_id: Option<i32>) {
    let Some(message_id) = message_id else {
        return;
    };
    if let Err(err) = messenger.delete_message(chat_id, message_id).await {
        tracing::warn!(chat_id, message_id, error = %err, "failed to delete keyboard message");
    }
}

/// Logs a handler failure and makes one attempt at an apology. Returns
/// whether the chat is still reachable.
async fn report_failure<M: Messenger>(
    messenger: &M,
    chat_id: i64,
    err: &DialogueError,
    apology: &str,
    context: &'static str,
) -> bool {
    match err {
        DialogueError::Transport(TransportError::ChatUnreachable { .. }) => {
            tracing::warn!(chat_id, error = %err, "{context}: chat unreachable, bot may be blocked");
            false
        }
        DialogueError::Transport(TransportError::Request(_)) => {
            tracing::error!(chat_id, error = %err, "{context}");
            if let Err(err) = messenger.send(chat_id, Reply::text(apology)).await {
                tracing::error!(chat_id, error = %err, "failed to send apology");
            }
            true
        }
    }
}
