#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MenuButton {
    Study,
    Dictionary,
    AddWord,
    DeleteWord,
    MainMenu,
    Skip,
    Cancel,
}

impl MenuButton {
    pub const ALL: [MenuButton; 7] = [
        MenuButton::Study,
        MenuButton::Dictionary,
        MenuButton::AddWord,
        MenuButton::DeleteWord,
        MenuButton::MainMenu,
        MenuButton::Skip,
        MenuButton::Cancel,
    ];

    pub const fn label(self) -> &'static str {
        match self {
            MenuButton::Study => "Учить слова 🚀",
            MenuButton::Dictionary => "Мой словарь 📚",
            MenuButton::AddWord => "Добавить слово ➕",
            MenuButton::DeleteWord => "Удалить слово 🔙",
            MenuButton::MainMenu => "Главное меню ◀️",
            MenuButton::Skip => "Пропустить ➡️",
            MenuButton::Cancel => "Отмена ❌",
        }
    }

    pub fn from_label(text: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|button| button.label() == text)
    }

    /// Buttons that leave whatever mode the chat is in.
    pub fn is_exit(self) -> bool {
        matches!(self, MenuButton::MainMenu | MenuButton::Cancel)
    }
}

/// A raw inbound text after classification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Input {
    Start,
    Menu(MenuButton),
    FreeText(String),
}

impl Input {
    pub fn classify(raw: &str) -> Self {
        let cleaned = clean_text(raw);
        if is_start_command(&cleaned) {
            return Input::Start;
        }
        match MenuButton::from_label(&cleaned) {
            Some(button) => Input::Menu(button),
            None => Input::FreeText(cleaned),
        }
    }
}

fn is_start_command(text: &str) -> bool {
    let command = text.split_whitespace().next().unwrap_or_default();
    // Telegram appends the bot name in group chats: /start@slova_bot
    command == "/start" || command.starts_with("/start@")
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PairError {
    MissingDash,
    EmptySide,
}

/// Parses `Русский - English`, splitting on the first dash only.
pub fn parse_word_pair(text: &str) -> Result<(String, String), PairError> {
    let (russian, english) = text.split_once('-').ok_or(PairError::MissingDash)?;
    let (russian, english) = (russian.trim(), english.trim());
    if russian.is_empty() || english.is_empty() {
        return Err(PairError::EmptySide);
    }
    Ok((russian.to_string(), english.to_string()))
}

/// Trims whitespace, then surrounding single and double quotes.
pub fn clean_text(text: &str) -> String {
    text.trim()
        .trim_matches('\'')
        .trim_matches('"')
        .to_string()
}

/// Comparison form for quiz answers.
pub fn normalize_answer(text: &str) -> String {
    clean_text(text).to_lowercase()
}
