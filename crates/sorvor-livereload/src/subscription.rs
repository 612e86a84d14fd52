//! Per-connection subscription handle.

use crate::broadcaster::{Broadcaster, SubscriberId};
use crate::message::Message;
use tokio::sync::mpsc;

/// One subscriber's view of the broadcast.
///
/// The handle carries a take-once close token. Whichever side ends the
/// subscription first consumes it: the broadcaster closing the channel
/// (observed in [`recv`](Subscription::recv)) or the owner calling
/// [`unsubscribe`](Subscription::unsubscribe) / dropping the handle.
/// `Unsubscribe` therefore reaches the actor at most once per subscriber.
#[derive(Debug)]
pub struct Subscription {
    id: SubscriberId,
    receiver: mpsc::Receiver<Message>,
    close: Option<Broadcaster>,
}

impl Subscription {
    pub(crate) fn new(
        id: SubscriberId,
        receiver: mpsc::Receiver<Message>,
        broadcaster: Broadcaster,
    ) -> Self {
        Self {
            id,
            receiver,
            close: Some(broadcaster),
        }
    }

    /// Subscriber id assigned by the broadcaster.
    pub fn id(&self) -> SubscriberId {
        self.id
    }

    /// Wait for the next message.
    ///
    /// Returns `None` once the stream has ended, either because the
    /// subscriber was removed or because the broadcaster shut down.
    pub async fn recv(&mut self) -> Option<Message> {
        let message = self.receiver.recv().await;
        if message.is_none() {
            // already gone from the set
            self.close = None;
        }
        message
    }

    /// Leave the broadcast. Later calls do nothing.
    pub fn unsubscribe(&mut self) {
        if let Some(broadcaster) = self.close.take() {
            broadcaster.unsubscribe(self.id);
        }
    }

    /// Whether this subscription has been closed from either side.
    pub fn is_closed(&self) -> bool {
        self.close.is_none()
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.unsubscribe();
    }
}

#[cfg(test)]
mod tests {
    use crate::{Broadcaster, BroadcasterOptions, Message};

    fn quiet() -> BroadcasterOptions {
        BroadcasterOptions {
            heartbeat: None,
            ..BroadcasterOptions::default()
        }
    }

    #[tokio::test]
    async fn test_unsubscribe_consumes_token() {
        let broadcaster = Broadcaster::start(quiet());
        let mut sub = broadcaster.subscribe().await.unwrap();

        assert!(!sub.is_closed());
        sub.unsubscribe();
        assert!(sub.is_closed());
        sub.unsubscribe();

        assert_eq!(broadcaster.subscriber_count().await.unwrap(), 0);
        assert_eq!(sub.recv().await, None);
    }

    #[tokio::test]
    async fn test_drop_unsubscribes() {
        let broadcaster = Broadcaster::start(quiet());
        let sub = broadcaster.subscribe().await.unwrap();
        assert_eq!(broadcaster.subscriber_count().await.unwrap(), 1);

        drop(sub);
        assert_eq!(broadcaster.subscriber_count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_broadcaster_close_disarms_token() {
        let broadcaster = Broadcaster::start(quiet());
        let mut sub = broadcaster.subscribe().await.unwrap();

        broadcaster.unsubscribe(sub.id());
        assert_eq!(sub.recv().await, None);
        assert!(sub.is_closed());
    }

    #[tokio::test]
    async fn test_buffered_messages_survive_unsubscribe() {
        let broadcaster = Broadcaster::start(quiet());
        let mut sub = broadcaster.subscribe().await.unwrap();

        broadcaster.reload().await.unwrap();
        sub.unsubscribe();
        let _ = broadcaster.subscriber_count().await.unwrap();

        assert_eq!(sub.recv().await, Some(Message::Reload));
        assert_eq!(sub.recv().await, None);
    }
}
