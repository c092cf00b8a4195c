use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use parking_lot::Mutex;
use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};

use crate::dialogue::quiz::QuizRound;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Idle,
    AddingWord,
    Quiz,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DialogueState {
    AddingWord,
    Quiz(QuizRound),
}

impl DialogueState {
    pub fn mode(&self) -> Mode {
        match self {
            DialogueState::AddingWord => Mode::AddingWord,
            DialogueState::Quiz(_) => Mode::Quiz,
        }
    }
}

#[derive(Debug)]
struct Slot {
    state: Option<DialogueState>,
    touched_at: Instant,
}

impl Default for Slot {
    fn default() -> Self {
        Self {
            state: None,
            touched_at: Instant::now(),
        }
    }
}

/// Dialogue state per chat. Holding a [`SessionGuard`] serializes every
/// other event for the same chat; different chats never wait on each other.
#[derive(Default)]
pub struct SessionStore {
    slots: Mutex<HashMap<i64, Arc<AsyncMutex<Slot>>>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn lock(&self, chat_id: i64) -> SessionGuard {
        let slot = {
            let mut slots = self.slots.lock();
            Arc::clone(slots.entry(chat_id).or_default())
        };

        let mut slot = slot.lock_owned().await;
        slot.touched_at = Instant::now();

        SessionGuard { chat_id, slot }
    }

    pub async fn mode(&self, chat_id: i64) -> Mode {
        self.lock(chat_id).await.mode()
    }

    /// Drops slots nobody is using that have not been touched within `ttl`.
    pub fn sweep_idle(&self, ttl: Duration) -> usize {
        let mut slots = self.slots.lock();
        let before = slots.len();

        slots.retain(|_, slot| {
            // Handlers clone the Arc under this same lock, so a count of one
            // means no handler is waiting on or holding the slot.
            if Arc::strong_count(slot) > 1 {
                return true;
            }
            match slot.try_lock() {
                Ok(inner) => inner.touched_at.elapsed() < ttl,
                Err(_) => true,
            }
        });

        before - slots.len()
    }

    pub fn len(&self) -> usize {
        self.slots.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

pub struct SessionGuard {
    chat_id: i64,
    slot: OwnedMutexGuard<Slot>,
}

impl SessionGuard {
    pub fn chat_id(&self) -> i64 {
        self.chat_id
    }

    pub fn get(&self) -> Option<&DialogueState> {
        self.slot.state.as_ref()
    }

    pub fn mode(&self) -> Mode {
        self.get().map_or(Mode::Idle, DialogueState::mode)
    }

    pub fn set(&mut self, state: DialogueState) {
        self.slot.state = Some(state);
    }

    pub fn clear(&mut self) -> Option<DialogueState> {
        self.slot.state.take()
    }
}
