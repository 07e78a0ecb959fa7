use super::messenger::{Messenger, SentMessage};
use crate::components::planning::embeds::{planning_embed, selection_embed};
use crate::components::planning::time::today_in;
use crate::components::planning::{EmbedPayload, PlanningSource, SelectionOutcome, SelectionSession};
use crate::error::BotResult;
use chrono::{NaiveDate, Utc};
use chrono_tz::Tz;
use rust_i18n::t;
use std::fmt;
use std::sync::Arc;
use tracing::{error, info};

/// Runs planning lookups and the date selection flow against a messenger
pub struct Planner {
    source: Arc<dyn PlanningSource>,
    timezone: Tz,
}

impl fmt::Debug for Planner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Planner")
            .field("timezone", &self.timezone)
            .finish()
    }
}

impl Planner {
    pub fn new(source: Arc<dyn PlanningSource>, timezone: Tz) -> Self {
        Self { source, timezone }
    }

    /// Current date in the bot's time zone
    pub fn today(&self) -> NaiveDate {
        today_in(self.timezone)
    }

    /// Fetch, filter and compose the planning of `date`.
    ///
    /// Feed failures end up in the embed, never in the return value.
    pub async fn embed_for(&self, date: NaiveDate) -> EmbedPayload {
        let lookup = self.source.events_on(date).await;
        planning_embed(date, &lookup, self.timezone, Utc::now())
    }

    /// Post the planning of `date`
    pub async fn send_planning<M>(&self, messenger: &M, date: NaiveDate) -> BotResult<()>
    where
        M: Messenger + ?Sized,
    {
        let embed = self.embed_for(date).await;
        messenger.send_embed(&embed).await?;
        Ok(())
    }

    /// Post the date prompt and act on the issuer's choice
    pub async fn run_selection<M>(
        &self,
        messenger: &M,
        session: SelectionSession,
    ) -> BotResult<SelectionOutcome>
    where
        M: Messenger + ?Sized,
    {
        let prompt = selection_embed(&session.options(), session.timeout().as_secs(), Utc::now());
        let prompt_message = messenger.send_embed(&prompt).await?;

        // Listen before the markers go up so no reaction is missed
        let reactions = messenger.reactions(prompt_message);
        for marker in session.markers() {
            messenger.react(prompt_message, marker).await?;
        }

        let outcome = session.wait(reactions).await;
        info!("Date selection ended: {:?}", outcome);

        match outcome {
            // The prompt goes away even when the answer could not be sent
            SelectionOutcome::Resolved(date) => {
                let sent = self.send_planning(messenger, date).await;
                delete_prompt(messenger, prompt_message).await;
                sent?;
            }
            SelectionOutcome::Invalid => {
                let sent = messenger.send_text(&t!("selection_invalid")).await;
                delete_prompt(messenger, prompt_message).await;
                sent?;
            }
            SelectionOutcome::TimedOut => {
                delete_prompt(messenger, prompt_message).await;
                messenger.send_text(&t!("selection_timeout")).await?;
            }
        }

        Ok(outcome)
    }
}

/// Deletion failures are only logged
async fn delete_prompt<M>(messenger: &M, message: SentMessage)
where
    M: Messenger + ?Sized,
{
    if let Err(e) = messenger.delete(message).await {
        error!("Failed to delete selection prompt: {:?}", e);
    }
}
