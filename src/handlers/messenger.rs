use crate::components::planning::{EmbedPayload, ReactionEvent};
use crate::error::BotResult;
use async_trait::async_trait;
use futures::future;
use futures::stream::{BoxStream, StreamExt};
use poise::serenity_prelude::{
    self as serenity, ChannelId, CreateMessage, MessageId, Reaction, ReactionCollector,
    ReactionType,
};

/// Identifier of a message the bot has sent
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SentMessage(pub u64);

/// What the planning flows need from the chat connection
#[async_trait]
pub trait Messenger: Send + Sync {
    async fn send_text(&self, content: &str) -> BotResult<SentMessage>;
    async fn send_embed(&self, embed: &EmbedPayload) -> BotResult<SentMessage>;
    async fn react(&self, message: SentMessage, marker: &str) -> BotResult<()>;
    async fn delete(&self, message: SentMessage) -> BotResult<()>;

    /// Reactions added to `message` from now on
    fn reactions(&self, message: SentMessage) -> BoxStream<'static, ReactionEvent>;
}

/// Messenger bound to one Discord channel
#[derive(Clone)]
pub struct ChannelMessenger {
    ctx: serenity::Context,
    channel_id: ChannelId,
}

impl ChannelMessenger {
    pub fn new(ctx: &serenity::Context, channel_id: ChannelId) -> Self {
        Self {
            ctx: ctx.clone(),
            channel_id,
        }
    }
}

#[async_trait]
impl Messenger for ChannelMessenger {
    async fn send_text(&self, content: &str) -> BotResult<SentMessage> {
        let message = self.channel_id.say(&self.ctx.http, content).await?;
        Ok(SentMessage(message.id.get()))
    }

    async fn send_embed(&self, embed: &EmbedPayload) -> BotResult<SentMessage> {
        let message = self
            .channel_id
            .send_message(
                &self.ctx.http,
                CreateMessage::new().embed(embed.to_create_embed()),
            )
            .await?;
        Ok(SentMessage(message.id.get()))
    }

    async fn react(&self, message: SentMessage, marker: &str) -> BotResult<()> {
        self.channel_id
            .create_reaction(
                &self.ctx.http,
                MessageId::new(message.0),
                ReactionType::Unicode(marker.to_string()),
            )
            .await?;
        Ok(())
    }

    async fn delete(&self, message: SentMessage) -> BotResult<()> {
        self.channel_id
            .delete_message(&self.ctx.http, MessageId::new(message.0))
            .await?;
        Ok(())
    }

    fn reactions(&self, message: SentMessage) -> BoxStream<'static, ReactionEvent> {
        ReactionCollector::new(&self.ctx.shard)
            .channel_id(self.channel_id)
            .message_id(MessageId::new(message.0))
            .stream()
            .filter_map(|reaction| future::ready(reaction_event(&reaction)))
            .boxed()
    }
}

/// Unicode reactions with a known author; custom emoji never match a marker
fn reaction_event(reaction: &Reaction) -> Option<ReactionEvent> {
    let user_id = reaction.user_id?.get();
    match &reaction.emoji {
        ReactionType::Unicode(name) => Some(ReactionEvent {
            user_id,
            marker: name.clone(),
        }),
        _ => None,
    }
}
