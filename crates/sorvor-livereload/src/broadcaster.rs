//! Reload broadcaster actor.
//!
//! A single task owns the subscriber set. Every mutation and every publish
//! reaches it as a [`Command`] on one FIFO queue, so membership changes and
//! fan-out are serialized in arrival order and no caller ever touches the
//! set directly.
//!
//! Each subscriber gets a bounded queue. Fan-out never waits on a slow
//! reader: a subscriber whose queue is full is evicted (its stream ends and
//! the browser reconnects on its own).
//!
//! # Example
//!
//! ```no_run
//! use sorvor_livereload::{Broadcaster, BroadcasterOptions, Message};
//!
//! # async fn run() -> sorvor_livereload::Result<()> {
//! let broadcaster = Broadcaster::start(BroadcasterOptions::default());
//!
//! let mut subscription = broadcaster.subscribe().await?;
//! broadcaster.reload().await?;
//!
//! assert_eq!(subscription.recv().await, Some(Message::Reload));
//! broadcaster.shutdown();
//! # Ok(())
//! # }
//! ```

use crate::error::{LiveReloadError, Result};
use crate::message::Message;
use crate::subscription::Subscription;
use std::collections::HashMap;
use std::time::Duration;
use tokio::sync::mpsc::{self, error::TrySendError};
use tokio::sync::oneshot;
use tokio::time::{self, Instant, MissedTickBehavior};

/// Identifier handed out to each subscriber, unique for the broadcaster's lifetime.
pub type SubscriberId = u64;

/// Default heartbeat period.
pub const DEFAULT_HEARTBEAT: Duration = Duration::from_secs(60);

/// Default number of undelivered messages a subscriber may hold.
pub const DEFAULT_QUEUE_CAPACITY: usize = 16;

/// Broadcaster tuning.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BroadcasterOptions {
    /// Period between `waiting` heartbeats; `None` disables the heartbeat.
    /// The first heartbeat fires one full period after start.
    pub heartbeat: Option<Duration>,
    /// Per-subscriber queue capacity (at least 1)
    pub queue_capacity: usize,
}

impl Default for BroadcasterOptions {
    fn default() -> Self {
        Self {
            heartbeat: Some(DEFAULT_HEARTBEAT),
            queue_capacity: DEFAULT_QUEUE_CAPACITY,
        }
    }
}

pub(crate) enum Command {
    Subscribe {
        reply: oneshot::Sender<(SubscriberId, mpsc::Receiver<Message>)>,
    },
    Unsubscribe {
        id: SubscriberId,
    },
    Publish {
        message: Message,
        delivered: oneshot::Sender<usize>,
    },
    Count {
        reply: oneshot::Sender<usize>,
    },
    Shutdown,
}

/// Handle to the broadcaster actor.
///
/// Cheap to clone; all clones talk to the same actor. The actor stops on
/// [`shutdown`](Broadcaster::shutdown) or once every handle is gone.
#[derive(Debug, Clone)]
pub struct Broadcaster {
    commands: mpsc::UnboundedSender<Command>,
}

impl Broadcaster {
    /// Spawn the actor (and the heartbeat, if enabled) on the current tokio runtime.
    pub fn start(options: BroadcasterOptions) -> Self {
        let (commands, inbox) = mpsc::unbounded_channel();
        let capacity = options.queue_capacity.max(1);

        tokio::spawn(run_actor(inbox, capacity));

        if let Some(period) = options.heartbeat.filter(|period| !period.is_zero()) {
            tokio::spawn(run_heartbeat(commands.downgrade(), period));
        }

        Self { commands }
    }

    /// Register a new subscriber.
    ///
    /// The returned [`Subscription`] receives every message published after
    /// this call returns, and unsubscribes itself when dropped.
    pub async fn subscribe(&self) -> Result<Subscription> {
        let (reply, response) = oneshot::channel();
        self.send(Command::Subscribe { reply })?;
        let (id, receiver) = response.await.map_err(|_| LiveReloadError::Closed)?;
        Ok(Subscription::new(id, receiver, self.clone()))
    }

    /// Remove a subscriber and close its stream.
    ///
    /// Unknown or already-removed ids are ignored, so calling this more than
    /// once for the same subscriber is harmless.
    pub fn unsubscribe(&self, id: SubscriberId) {
        let _ = self.send(Command::Unsubscribe { id });
    }

    /// Deliver `message` to every current subscriber.
    ///
    /// Returns once the message has been queued for each of them, with the
    /// number of subscribers that accepted it.
    pub async fn publish(&self, message: Message) -> Result<usize> {
        let (delivered, response) = oneshot::channel();
        self.send(Command::Publish { message, delivered })?;
        response.await.map_err(|_| LiveReloadError::Closed)
    }

    /// Tell every connected browser to refresh.
    pub async fn reload(&self) -> Result<usize> {
        self.publish(Message::Reload).await
    }

    /// Number of registered subscribers.
    pub async fn subscriber_count(&self) -> Result<usize> {
        let (reply, response) = oneshot::channel();
        self.send(Command::Count { reply })?;
        response.await.map_err(|_| LiveReloadError::Closed)
    }

    /// Stop the actor. Every open subscription stream ends.
    pub fn shutdown(&self) {
        let _ = self.send(Command::Shutdown);
    }

    /// Whether the actor has stopped.
    pub fn is_closed(&self) -> bool {
        self.commands.is_closed()
    }

    fn send(&self, command: Command) -> Result<()> {
        self.commands
            .send(command)
            .map_err(|_| LiveReloadError::Closed)
    }
}

async fn run_actor(mut inbox: mpsc::UnboundedReceiver<Command>, capacity: usize) {
    let mut subscribers: HashMap<SubscriberId, mpsc::Sender<Message>> = HashMap::new();
    let mut next_id: SubscriberId = 0;

    while let Some(command) = inbox.recv().await {
        match command {
            Command::Subscribe { reply } => {
                let id = next_id;
                next_id += 1;

                let (tx, rx) = mpsc::channel(capacity);
                if reply.send((id, rx)).is_ok() {
                    subscribers.insert(id, tx);
                    tracing::debug!(id, total = subscribers.len(), "live-reload client subscribed");
                }
            }
            Command::Unsubscribe { id } => {
                if subscribers.remove(&id).is_some() {
                    tracing::debug!(id, total = subscribers.len(), "live-reload client unsubscribed");
                }
            }
            Command::Publish { message, delivered } => {
                let count = fan_out(&mut subscribers, message);
                let _ = delivered.send(count);
            }
            Command::Count { reply } => {
                let _ = reply.send(subscribers.len());
            }
            Command::Shutdown => break,
        }
    }

    tracing::debug!(
        remaining = subscribers.len(),
        "live-reload broadcaster stopped"
    );
}

fn fan_out(subscribers: &mut HashMap<SubscriberId, mpsc::Sender<Message>>, message: Message) -> usize {
    let mut delivered = 0;

    subscribers.retain(|id, tx| match tx.try_send(message) {
        Ok(()) => {
            delivered += 1;
            true
        }
        Err(TrySendError::Full(_)) => {
            tracing::warn!(id, %message, "live-reload client is not keeping up, disconnecting it");
            false
        }
        Err(TrySendError::Closed(_)) => {
            tracing::debug!(id, "dropping closed live-reload client");
            false
        }
    });

    tracing::debug!(%message, delivered, "published live-reload message");
    delivered
}

async fn run_heartbeat(commands: mpsc::WeakUnboundedSender<Command>, period: Duration) {
    let Some(first) = Instant::now().checked_add(period) else {
        tracing::warn!(?period, "heartbeat period out of range, heartbeat disabled");
        return;
    };
    let mut ticker = time::interval_at(first, period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        ticker.tick().await;

        let Some(commands) = commands.upgrade() else {
            break;
        };
        if (Broadcaster { commands }).publish(Message::Waiting).await.is_err() {
            break;
        }
    }
}
