/// Owner of the shared default pool.
pub const SYSTEM_USER_ID: i64 = 0;

pub const SYSTEM_USERNAME: &str = "system";

/// Colours, pronouns and a few everyday nouns every user starts with.
pub const DEFAULT_WORDS: &[(&str, &str)] = &[
    ("Красный", "Red"),
    ("Синий", "Blue"),
    ("Зеленый", "Green"),
    ("Я", "I"),
    ("Ты", "You"),
    ("Он", "He"),
    ("Она", "She"),
    ("Дом", "House"),
    ("Книга", "Book"),
    ("Вода", "Water"),
];
