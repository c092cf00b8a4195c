use teloxide::utils::html;

use crate::db::operations::WordPair;
use crate::dialogue::menu::MenuButton;

pub const WELCOME: &str = "<b>Добро пожаловать! 🎉</b>\n\n\
    Я помогу тебе учить английские слова! 📖\n\
    Выбери опцию в меню ниже, чтобы начать.";

pub const ADD_WORD_PROMPT: &str = "📝 Введите слово в формате: <b>Русский - English</b>\n\
    Пример: <i>Дом - House</i>";

pub const BAD_FORMAT: &str = "❌ Неверный формат! Используйте: <b>Русский - English</b>\n\
    Пример: <i>Дом - House</i>";

pub const BOTH_FIELDS_REQUIRED: &str = "❌ Оба поля должны быть заполнены!";

pub const DICTIONARY_EMPTY: &str = "📭 Ваш личный словарь пуст!";

pub const NOTHING_TO_STUDY: &str = "📭 Ваш словарь пуст! Добавьте слова или используйте общие слова.";

pub const PICK_TO_DELETE: &str = "🗑️ Выберите слово для удаления:";

pub const DELETED_TOAST: &str = "✅ Слово удалено!";
pub const DELETED: &str = "Слово успешно удалено!";
pub const DELETE_FAILED_TOAST: &str = "❌ Ошибка при удалении!";
pub const DELETE_FAILED: &str = "❌ Ошибка при удалении слова.";
pub const CALLBACK_FAILED: &str = "❌ Произошла ошибка. Попробуйте еще раз.";

pub const GENERIC_ERROR: &str = "⚠️ Произошла ошибка. Попробуйте снова.";

pub const PRAISE: [&str; 3] = ["✅ Отлично!", "👍 Молодец!", "🎯 В точку!"];

pub fn word_saved(russian: &str, english: &str) -> String {
    format!(
        "✅ Слово добавлено: <b>{} - {}</b>",
        html::escape(russian),
        html::escape(english)
    )
}

pub fn word_duplicate(russian: &str, english: &str) -> String {
    format!(
        "⚠️ Слово <b>{} - {}</b> уже есть в вашем словаре!",
        html::escape(russian),
        html::escape(english)
    )
}

pub fn word_list(words: &[WordPair]) -> String {
    let mut text = String::from("📚 <b>Ваши слова:</b>\n\n");
    for word in words {
        text.push_str(&format!(
            "• {} - {}\n",
            html::escape(&word.russian),
            html::escape(&word.english)
        ));
    }
    text
}

pub fn quiz_question(prompt: &str) -> String {
    format!("Как переводится слово: <b>{}</b>?", html::escape(prompt))
}

pub fn quiz_skipped(correct: &str) -> String {
    format!("⏭️ Пропущено! Правильный ответ: <b>{}</b>", html::escape(correct))
}

pub fn quiz_wrong(prompt: &str) -> String {
    format!("❌ Неверно! Попробуйте еще раз для слова: <b>{}</b>", html::escape(prompt))
}

pub fn quiz_pick_option() -> String {
    format!(
        "🤔 Пожалуйста, выберите один из предложенных вариантов или используйте кнопки:\n• {}\n• {}",
        MenuButton::Skip.label(),
        MenuButton::MainMenu.label()
    )
}

pub fn unknown_command() -> String {
    format!(
        "🤔 Неизвестная команда. Используйте кнопки меню:\n• {}\n• {}\n• {}\n• {}",
        MenuButton::Study.label(),
        MenuButton::Dictionary.label(),
        MenuButton::AddWord.label(),
        MenuButton::DeleteWord.label()
    )
}
