use std::sync::Arc;

pub mod dispatch;
pub mod messenger;
pub mod planner;

pub use dispatch::{classify, event_handler, handle_command, Command};
pub use messenger::{ChannelMessenger, Messenger, SentMessage};
pub use planner::Planner;

/// Shared data handed to every event
#[derive(Debug)]
pub struct BotData {
    pub planner: Arc<Planner>,
}

impl BotData {
    pub fn new(planner: Planner) -> Self {
        Self {
            planner: Arc::new(planner),
        }
    }
}
