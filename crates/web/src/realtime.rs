//! In-memory fan-out of server events to connected WebSocket clients.
//!
//! Each online user owns one broadcast channel; every socket the user opens
//! subscribes to it. Delivery is best-effort: events for offline users are
//! dropped and slow sockets may lag.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use storage::dto::message::MessageResponse;
use storage::models::Notification;
use tokio::sync::broadcast;
use uuid::Uuid;

const CHANNEL_CAPACITY: usize = 64;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SignalKind {
    Offer,
    Answer,
    Ice,
    Hangup,
}

/// Call signaling payload relayed between two users.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Signal {
    pub from: Uuid,
    pub kind: SignalKind,
    pub payload: Value,
}

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerEvent {
    Notification(Notification),
    Message(MessageResponse),
    Signal(Signal),
}

#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientEvent {
    Signal {
        to: Uuid,
        kind: SignalKind,
        #[serde(default)]
        payload: Value,
    },
}

#[derive(Clone, Default)]
pub struct RealtimeHub {
    channels: Arc<RwLock<HashMap<Uuid, broadcast::Sender<ServerEvent>>>>,
}

impl RealtimeHub {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers one socket for `user_id`.
    pub fn subscribe(&self, user_id: Uuid) -> Subscription {
        let mut channels = self.channels.write();
        let receiver = channels
            .entry(user_id)
            .or_insert_with(|| broadcast::channel(CHANNEL_CAPACITY).0)
            .subscribe();

        Subscription {
            hub: self.clone(),
            user_id,
            receiver: Some(receiver),
        }
    }

    /// Pushes an event to every socket of `user_id`. Returns how many
    /// sockets received it; zero when the user is offline.
    pub fn send(&self, user_id: Uuid, event: ServerEvent) -> usize {
        let channels = self.channels.read();
        match channels.get(&user_id) {
            Some(sender) => sender.send(event).unwrap_or(0),
            None => 0,
        }
    }

    pub fn online_users(&self) -> usize {
        self.channels.read().len()
    }

    fn release(&self, user_id: Uuid) {
        let mut channels = self.channels.write();
        if channels
            .get(&user_id)
            .is_some_and(|sender| sender.receiver_count() == 0)
        {
            channels.remove(&user_id);
        }
    }
}

/// A socket's view of its user's channel. Dropping the last one for a user
/// removes the channel.
pub struct Subscription {
    hub: RealtimeHub,
    user_id: Uuid,
    receiver: Option<broadcast::Receiver<ServerEvent>>,
}

impl Subscription {
    pub async fn recv(&mut self) -> Result<ServerEvent, broadcast::error::RecvError> {
        match self.receiver.as_mut() {
            Some(receiver) => receiver.recv().await,
            None => Err(broadcast::error::RecvError::Closed),
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.receiver.take();
        self.hub.release(self.user_id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn signal(from: Uuid) -> ServerEvent {
        ServerEvent::Signal(Signal {
            from,
            kind: SignalKind::Offer,
            payload: json!({"sdp": "v=0"}),
        })
    }

    #[tokio::test]
    async fn fans_out_to_every_socket_of_a_user() {
        let hub = RealtimeHub::new();
        let user = Uuid::new_v4();
        let caller = Uuid::new_v4();

        let mut phone = hub.subscribe(user);
        let mut laptop = hub.subscribe(user);

        assert_eq!(hub.send(user, signal(caller)), 2);

        for subscription in [&mut phone, &mut laptop] {
            match subscription.recv().await.unwrap() {
                ServerEvent::Signal(signal) => assert_eq!(signal.from, caller),
                other => panic!("unexpected event {:?}", other),
            }
        }
    }

    #[tokio::test]
    async fn sending_to_offline_user_is_a_no_op() {
        let hub = RealtimeHub::new();
        assert_eq!(hub.send(Uuid::new_v4(), signal(Uuid::new_v4())), 0);
    }

    #[tokio::test]
    async fn channel_dropped_with_last_socket() {
        let hub = RealtimeHub::new();
        let user = Uuid::new_v4();

        let first = hub.subscribe(user);
        let second = hub.subscribe(user);
        let _other = hub.subscribe(Uuid::new_v4());
        assert_eq!(hub.online_users(), 2);

        drop(first);
        assert_eq!(hub.online_users(), 2);

        drop(second);
        assert_eq!(hub.online_users(), 1);
        assert_eq!(hub.send(user, signal(Uuid::new_v4())), 0);
    }

    #[test]
    fn events_are_tagged_by_type() {
        let value = serde_json::to_value(signal(Uuid::nil())).unwrap();
        assert_eq!(value["type"], "signal");
        assert_eq!(value["kind"], "offer");
        assert_eq!(value["payload"]["sdp"], "v=0");
    }

    #[test]
    fn parses_client_signals() {
        let to = Uuid::new_v4();
        let raw = format!(r#"{{"type":"signal","to":"{}","kind":"ice","payload":{{"candidate":"a"}}}}"#, to);
        let ClientEvent::Signal { to: parsed, kind, .. } = serde_json::from_str(&raw).unwrap();
        assert_eq!(parsed, to);
        assert_eq!(kind, SignalKind::Ice);
    }
}
