use super::feed::fetch_events_on;
use super::models::PlanningEvent;
use crate::config::Config;
use crate::error::{BotResult, FeedError, FeedResult};
use chrono::NaiveDate;
use reqwest::Client;
use std::sync::Arc;
use tokio::sync::{mpsc, oneshot, RwLock};
use tracing::{error, info};

/// The feed actor that serves calendar lookups
pub struct FeedActor {
    config: Arc<RwLock<Config>>,
    client: Client,
    command_rx: mpsc::Receiver<FeedCommand>,
}

/// Commands that can be sent to the feed actor
pub enum FeedCommand {
    EventsOn(NaiveDate, oneshot::Sender<FeedResult<Vec<PlanningEvent>>>),
    Shutdown,
}

/// Handle for communicating with the feed actor
#[derive(Clone)]
pub struct FeedActorHandle {
    command_tx: mpsc::Sender<FeedCommand>,
}

impl FeedActorHandle {
    /// Events starting on `date`, fetched fresh from the feed
    pub async fn events_on(&self, date: NaiveDate) -> FeedResult<Vec<PlanningEvent>> {
        let (response_tx, response_rx) = oneshot::channel();
        self.command_tx
            .send(FeedCommand::EventsOn(date, response_tx))
            .await
            .map_err(|e| FeedError::Unavailable(format!("Actor mailbox error: {}", e)))?;

        response_rx
            .await
            .map_err(|_| FeedError::Unavailable("Response channel closed".to_string()))?
    }

    /// Shutdown the actor
    pub async fn shutdown(&self) -> BotResult<()> {
        let _ = self.command_tx.send(FeedCommand::Shutdown).await;
        Ok(())
    }
}

impl FeedActor {
    /// Create a new actor and return its handle
    pub fn new(config: Arc<RwLock<Config>>) -> (Self, FeedActorHandle) {
        let (command_tx, command_rx) = mpsc::channel(32);

        let actor = Self {
            config,
            client: Client::new(),
            command_rx,
        };

        (actor, FeedActorHandle { command_tx })
    }

    /// Start the actor's processing loop
    pub async fn run(&mut self) {
        info!("Feed actor started");

        while let Some(cmd) = self.command_rx.recv().await {
            match cmd {
                FeedCommand::EventsOn(date, response_tx) => {
                    let result = self.events_on(date).await;
                    match &result {
                        Err(e) if e.is_fetch() => {
                            error!("Failed to fetch planning for {}: {}", date, e)
                        }
                        Err(e) => error!("Feed for {} is not valid iCalendar: {}", date, e),
                        Ok(_) => {}
                    }
                    let _ = response_tx.send(result);
                }
                FeedCommand::Shutdown => {
                    info!("Feed actor shutting down");
                    break;
                }
            }
        }

        info!("Feed actor shut down");
    }

    async fn events_on(&self, date: NaiveDate) -> FeedResult<Vec<PlanningEvent>> {
        let (url, tz) = {
            let config = self.config.read().await;
            (config.feed_url(), config.tz())
        };
        let url = url.map_err(|e| FeedError::Unavailable(e.to_string()))?;

        fetch_events_on(&self.client, &url, tz, date).await
    }
}
