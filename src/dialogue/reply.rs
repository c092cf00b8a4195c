use crate::db::operations::WordPair;
use crate::dialogue::menu::MenuButton;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Keyboard {
    /// Leave whatever keyboard the chat currently shows.
    Keep,
    Remove,
    Reply(Vec<Vec<String>>),
    Inline(Vec<InlineButton>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InlineButton {
    pub label: String,
    pub action: CallbackAction,
}

/// Outbound message; `text` is Telegram HTML.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    pub text: String,
    pub keyboard: Keyboard,
}

impl Reply {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            keyboard: Keyboard::Keep,
        }
    }

    pub fn with_keyboard(mut self, keyboard: Keyboard) -> Self {
        self.keyboard = keyboard;
        self
    }
}

pub fn main_menu_keyboard() -> Keyboard {
    Keyboard::Reply(vec![
        labels(&[MenuButton::Study, MenuButton::Dictionary]),
        labels(&[MenuButton::AddWord, MenuButton::DeleteWord]),
    ])
}

pub fn add_word_keyboard() -> Keyboard {
    Keyboard::Reply(vec![labels(&[MenuButton::Cancel, MenuButton::MainMenu])])
}

pub fn quiz_keyboard(choices: &[String]) -> Keyboard {
    let mut rows: Vec<Vec<String>> = choices.chunks(2).map(|row| row.to_vec()).collect();
    rows.push(labels(&[MenuButton::Skip, MenuButton::MainMenu]));
    Keyboard::Reply(rows)
}

pub fn delete_keyboard(words: &[WordPair]) -> Keyboard {
    let mut buttons: Vec<InlineButton> = words
        .iter()
        .map(|word| InlineButton {
            label: format!("{} - {}", word.russian, word.english),
            action: CallbackAction::Delete(word.word_id),
        })
        .collect();
    buttons.push(InlineButton {
        label: MenuButton::Cancel.label().to_string(),
        action: CallbackAction::CancelDelete,
    });
    Keyboard::Inline(buttons)
}

fn labels(buttons: &[MenuButton]) -> Vec<String> {
    buttons.iter().map(|b| b.label().to_string()).collect()
}

/// Payload carried by inline buttons: `delete_<wordId>` or `cancel_delete`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallbackAction {
    Delete(i32),
    CancelDelete,
}

impl CallbackAction {
    pub fn token(self) -> String {
        match self {
            CallbackAction::Delete(word_id) => format!("delete_{word_id}"),
            CallbackAction::CancelDelete => "cancel_delete".to_string(),
        }
    }

    pub fn parse(token: &str) -> Option<Self> {
        if token == "cancel_delete" {
            return Some(CallbackAction::CancelDelete);
        }
        token
            .strip_prefix("delete_")
            .and_then(|id| id.parse::<i32>().ok())
            .map(CallbackAction::Delete)
    }
}
