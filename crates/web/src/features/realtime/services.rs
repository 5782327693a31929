use axum::extract::ws::{Message, WebSocket};
use tracing::{debug, warn};
use uuid::Uuid;

use crate::realtime::{ClientEvent, RealtimeHub, ServerEvent, Signal};

/// Pumps hub events out to the socket and relays the client's call
/// signaling to its peer until either side goes away.
pub async fn run_socket(mut socket: WebSocket, hub: RealtimeHub, user_id: Uuid) {
    let mut subscription = hub.subscribe(user_id);
    debug!(%user_id, online = hub.online_users(), "Realtime socket opened");

    loop {
        tokio::select! {
            event = subscription.recv() => {
                let event = match event {
                    Ok(event) => event,
                    Err(tokio::sync::broadcast::error::RecvError::Lagged(skipped)) => {
                        warn!(%user_id, skipped, "Realtime socket lagged");
                        continue;
                    }
                    Err(_) => break,
                };

                let Ok(text) = serde_json::to_string(&event) else {
                    continue;
                };
                if socket.send(Message::Text(text)).await.is_err() {
                    break;
                }
            }
            incoming = socket.recv() => {
                match incoming {
                    Some(Ok(Message::Text(text))) => {
                        relay(&hub, user_id, &text);
                    }
                    Some(Ok(Message::Close(_))) | None => break,
                    Some(Ok(_)) => {}
                    Some(Err(e)) => {
                        debug!(%user_id, error = %e, "Realtime socket error");
                        break;
                    }
                }
            }
        }
    }

    debug!(%user_id, "Realtime socket closed");
}

/// Forwards one client frame. Unknown frames are ignored.
pub fn relay(hub: &RealtimeHub, from: Uuid, text: &str) -> usize {
    match serde_json::from_str::<ClientEvent>(text) {
        Ok(ClientEvent::Signal { to, kind, payload }) => {
            hub.send(to, ServerEvent::Signal(Signal { from, kind, payload }))
        }
        Err(e) => {
            debug!(%from, error = %e, "Ignoring malformed realtime frame");
            0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::realtime::SignalKind;

    #[tokio::test]
    async fn relays_signals_with_sender_stamped() {
        let hub = RealtimeHub::new();
        let caller = Uuid::new_v4();
        let callee = Uuid::new_v4();
        let mut inbox = hub.subscribe(callee);

        let frame = format!(
            r#"{{"type":"signal","to":"{}","kind":"answer","payload":{{"sdp":"x"}}}}"#,
            callee
        );
        assert_eq!(relay(&hub, caller, &frame), 1);

        match inbox.recv().await.unwrap() {
            ServerEvent::Signal(signal) => {
                assert_eq!(signal.from, caller);
                assert_eq!(signal.kind, SignalKind::Answer);
                assert_eq!(signal.payload["sdp"], "x");
            }
            other => panic!("unexpected event {:?}", other),
        }
    }

    #[test]
    fn malformed_frames_are_dropped() {
        let hub = RealtimeHub::new();
        assert_eq!(relay(&hub, Uuid::new_v4(), "not json"), 0);
        assert_eq!(relay(&hub, Uuid::new_v4(), r#"{"type":"presence"}"#), 0);
    }
}
