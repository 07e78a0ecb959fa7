use super::messenger::{ChannelMessenger, Messenger};
use super::planner::Planner;
use super::BotData;
use crate::components::planning::SelectionSession;
use crate::error::{BotResult, Error};
use poise::serenity_prelude as serenity;
use std::sync::Arc;
use tracing::{error, info};

/// Message answered with [`TRIVIAL_REPLY`], compared case-insensitively
pub const TRIVIAL_TRIGGER: &str = "uwu";
pub const TRIVIAL_REPLY: &str = "https://i.imgur.com/zlLz40v.mp4";

pub const PLANNING_PROMPT: &str = "!planning";
pub const PLANNING_TODAY: &str = "!planning today";

/// What an inbound message asks for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Ignore,
    TrivialReply,
    PlanningToday,
    PlanningPrompt,
}

/// Classify a message; the first matching rule wins
pub fn classify(content: &str, from_bot: bool) -> Command {
    if from_bot {
        return Command::Ignore;
    }
    if content.to_lowercase() == TRIVIAL_TRIGGER {
        return Command::TrivialReply;
    }
    if !content.starts_with(PLANNING_PROMPT) {
        return Command::Ignore;
    }

    match content {
        PLANNING_TODAY => Command::PlanningToday,
        PLANNING_PROMPT => Command::PlanningPrompt,
        _ => Command::Ignore,
    }
}

/// Carry out a command for `issuer`
pub async fn handle_command<M>(
    command: Command,
    planner: &Planner,
    messenger: &M,
    issuer: u64,
) -> BotResult<()>
where
    M: Messenger + ?Sized,
{
    match command {
        Command::Ignore => {}
        Command::TrivialReply => {
            messenger.send_text(TRIVIAL_REPLY).await?;
        }
        Command::PlanningToday => {
            planner.send_planning(messenger, planner.today()).await?;
        }
        Command::PlanningPrompt => {
            let session = SelectionSession::new(planner.today(), issuer);
            planner.run_selection(messenger, session).await?;
        }
    }

    Ok(())
}

/// Gateway event entry point
pub async fn event_handler(
    ctx: &serenity::Context,
    event: &serenity::FullEvent,
    _framework: poise::FrameworkContext<'_, BotData, Error>,
    data: &BotData,
) -> BotResult<()> {
    let serenity::FullEvent::Message { new_message } = event else {
        return Ok(());
    };

    let command = classify(&new_message.content, new_message.author.bot);
    if command == Command::Ignore {
        return Ok(());
    }

    info!(
        "{:?} requested by {} in channel {}",
        command, new_message.author.name, new_message.channel_id
    );

    let messenger = ChannelMessenger::new(ctx, new_message.channel_id);
    let planner = Arc::clone(&data.planner);
    let issuer = new_message.author.id.get();

    if command == Command::PlanningPrompt {
        // The prompt waits for reactions; keep it off the gateway dispatch
        tokio::spawn(async move {
            if let Err(e) = handle_command(command, &planner, &messenger, issuer).await {
                error!("Date selection failed: {:?}", e);
            }
        });
        return Ok(());
    }

    handle_command(command, &planner, &messenger, issuer).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify() {
        assert_eq!(classify("uwu", false), Command::TrivialReply);
        assert_eq!(classify("UwU", false), Command::TrivialReply);
        assert_eq!(classify("!planning today", false), Command::PlanningToday);
        assert_eq!(classify("!planning", false), Command::PlanningPrompt);
    }

    #[test]
    fn test_classify_ignores_everything_else() {
        assert_eq!(classify("uwu", true), Command::Ignore);
        assert_eq!(classify("!planning", true), Command::Ignore);
        assert_eq!(classify("!planning tomorrow", false), Command::Ignore);
        assert_eq!(classify("!planning Today", false), Command::Ignore);
        assert_eq!(classify("!Planning", false), Command::Ignore);
        assert_eq!(classify("uwu uwu", false), Command::Ignore);
        assert_eq!(classify("hello", false), Command::Ignore);
    }
}
