pub mod controller;
pub mod menu;
pub mod messenger;
pub mod quiz;
pub mod reply;
pub mod texts;

pub use controller::{CallbackEvent, DialogueController, DialogueError, TextEvent};
pub use menu::{Input, MenuButton};
pub use messenger::{Messenger, TransportError};
pub use reply::{CallbackAction, InlineButton, Keyboard, Reply};
