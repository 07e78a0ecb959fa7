use super::actor::{FeedActor, FeedActorHandle};
use super::models::PlanningEvent;
use crate::config::Config;
use crate::error::{BotResult, FeedResult};
use async_trait::async_trait;
use chrono::NaiveDate;
use std::sync::Arc;
use tokio::sync::RwLock;
use tokio::task::JoinHandle;

/// Anything that can list the events of a given day
#[async_trait]
pub trait PlanningSource: Send + Sync {
    async fn events_on(&self, date: NaiveDate) -> FeedResult<Vec<PlanningEvent>>;
}

/// Handle for interacting with the feed actor
#[derive(Clone)]
pub struct FeedHandle {
    actor_handle: FeedActorHandle,
    _actor_task: Arc<JoinHandle<()>>,
}

impl FeedHandle {
    /// Create a new FeedHandle and spawn the actor
    pub fn new(config: Arc<RwLock<Config>>) -> Self {
        let (mut actor, handle) = FeedActor::new(config);

        let actor_task = tokio::spawn(async move {
            actor.run().await;
        });

        Self {
            actor_handle: handle,
            _actor_task: Arc::new(actor_task),
        }
    }

    /// Shutdown the actor
    pub async fn shutdown(&self) -> BotResult<()> {
        self.actor_handle.shutdown().await
    }
}

#[async_trait]
impl PlanningSource for FeedHandle {
    async fn events_on(&self, date: NaiveDate) -> FeedResult<Vec<PlanningEvent>> {
        self.actor_handle.events_on(date).await
    }
}
