use rand::seq::SliceRandom;
use rand::Rng;

use crate::dialogue::menu::{clean_text, normalize_answer};
use crate::store::{WordStore, DISTRACTOR_LIMIT};

/// One outstanding quiz question for a chat.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuizRound {
    pub word_id: i32,
    pub prompt: String,
    pub correct: String,
    pub choices: Vec<String>,
    /// Message carrying the question, once it has been sent.
    pub message_id: Option<i32>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Correct,
    Incorrect,
    NotAnOption,
}

impl QuizRound {
    pub fn new<R: Rng + ?Sized>(
        word_id: i32,
        prompt: &str,
        correct: &str,
        distractors: Vec<String>,
        rng: &mut R,
    ) -> Self {
        let correct = clean_text(correct);
        let choices = build_choices(&correct, distractors, rng);
        Self {
            word_id,
            prompt: prompt.to_string(),
            correct,
            choices,
            message_id: None,
        }
    }

    pub fn evaluate(&self, answer: &str) -> Verdict {
        let answer = normalize_answer(answer);
        let offered = self
            .choices
            .iter()
            .any(|choice| normalize_answer(choice) == answer);

        if !offered {
            Verdict::NotAnOption
        } else if normalize_answer(&self.correct) == answer {
            Verdict::Correct
        } else {
            Verdict::Incorrect
        }
    }
}

/// The correct answer plus up to three distractors in random order. Choices
/// that only differ by case or padding are offered once.
pub fn build_choices<R: Rng + ?Sized>(correct: &str, distractors: Vec<String>, rng: &mut R) -> Vec<String> {
    let mut choices = vec![clean_text(correct)];

    for distractor in distractors {
        if choices.len() > DISTRACTOR_LIMIT as usize {
            break;
        }
        let distractor = clean_text(&distractor);
        let key = normalize_answer(&distractor);
        if distractor.is_empty() || choices.iter().any(|c| normalize_answer(c) == key) {
            continue;
        }
        choices.push(distractor);
    }

    choices.shuffle(rng);
    choices
}

/// Picks a prompt and its distractors. `None` means there is nothing to ask,
/// either because the dictionary is empty or the store could not be read.
pub async fn next_round<S: WordStore>(store: &S, user_id: i64) -> Option<QuizRound> {
    let word = match store.random_word(user_id).await {
        Ok(Some(word)) => word,
        Ok(None) | Err(_) => return None,
    };

    // A failed lookup still lets the user answer a one-choice round.
    let distractors = match store.other_words(user_id, &word.english, DISTRACTOR_LIMIT).await {
        Ok(words) => words,
        Err(_) => Vec::new(),
    };

    let round = QuizRound::new(
        word.word_id,
        &word.russian,
        &word.english,
        distractors,
        &mut rand::rng(),
    );

    tracing::info!(
        user_id,
        word = %round.prompt,
        correct = %round.correct,
        choices = ?round.choices,
        "quiz round started"
    );

    Some(round)
}
