use super::feed::Backoff;
use super::feed::Delivery;
use super::feed::Feed;
use crate::protocol::ClientMessage;
use crate::protocol::Event;
use crate::table::Snapshot;
use async_trait::async_trait;
use futures::SinkExt;
use futures::StreamExt;
use tokio::net::TcpStream;
use tokio_tungstenite::connect_async;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::MaybeTlsStream;
use tokio_tungstenite::WebSocketStream;

type Wire = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// Push adapter over a WebSocket. Announces its scope after every
/// connect: one origin's slice when scoped, the whole aggregate
/// otherwise. Reconnects on its own with shared backoff pacing.
pub struct Socket {
    url: String,
    scope: Option<String>,
    conn: Option<Wire>,
    backoff: Backoff,
    down: bool,
}

impl Socket {
    pub fn new(base: &str, scope: Option<&str>) -> Self {
        let base = base
            .trim_end_matches('/')
            .replacen("http://", "ws://", 1)
            .replacen("https://", "wss://", 1);
        Self {
            url: format!("{}/ws", base),
            scope: scope.map(str::to_string),
            conn: None,
            backoff: Backoff::new(),
            down: false,
        }
    }

    async fn open(&mut self) -> Result<(), String> {
        if self.down {
            tokio::time::sleep(self.backoff.wait()).await;
        }
        let (mut conn, _) = connect_async(&self.url).await.map_err(|e| e.to_string())?;
        let hello = ClientMessage::subscribe(self.scope.as_deref()).to_json();
        conn.send(Message::Text(hello))
            .await
            .map_err(|e| e.to_string())?;
        self.conn = Some(conn);
        self.backoff.reset();
        self.down = false;
        Ok(())
    }

    /// Filter hub fanout down to this subscriber's deliveries.
    fn accept(&self, event: Event) -> Option<Delivery> {
        match (event, &self.scope) {
            (Event::DetectionUpdate(snapshot), None) => Some(Delivery::Snapshot(snapshot)),
            (Event::DetectionUpdate(_), Some(_)) => None,
            (
                Event::ClientDetectionUpdate {
                    client_id,
                    detections,
                    last_update,
                },
                Some(scope),
            ) if client_id == *scope => Some(Delivery::Snapshot(Snapshot {
                detections,
                last_update,
            })),
            (Event::Heartbeat, _) => Some(Delivery::Unchanged),
            (Event::Connected { client_id }, _) => {
                log::info!("socket open as subscriber {}", client_id);
                None
            }
            (other, _) => {
                log::debug!("socket frame ignored: {:?}", other);
                None
            }
        }
    }
}

#[async_trait]
impl Feed for Socket {
    async fn next(&mut self) -> Delivery {
        loop {
            if self.conn.is_none() {
                if let Err(reason) = self.open().await {
                    self.down = true;
                    return Delivery::Down(reason);
                }
            }
            let conn = self.conn.as_mut().expect("socket connection");
            match conn.next().await {
                Some(Ok(Message::Text(text))) => match text.parse::<Event>() {
                    Ok(event) => {
                        if let Some(delivery) = self.accept(event) {
                            return delivery;
                        }
                    }
                    Err(e) => log::warn!("unreadable socket frame: {}", e),
                },
                Some(Ok(Message::Ping(payload))) => {
                    conn.send(Message::Pong(payload)).await.ok();
                }
                Some(Ok(Message::Close(_))) | None => {
                    self.conn = None;
                    self.down = true;
                    return Delivery::Down("socket closed".to_string());
                }
                Some(Ok(_)) => {}
                Some(Err(e)) => {
                    self.conn = None;
                    self.down = true;
                    return Delivery::Down(e.to_string());
                }
            }
        }
    }

    fn describe(&self) -> String {
        match &self.scope {
            Some(scope) => format!("socket {} scoped to {}", self.url, scope),
            None => format!("socket {}", self.url),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::Table;

    fn socket(scope: Option<&str>) -> Socket {
        Socket::new("http://127.0.0.1:8080", scope)
    }

    #[test]
    fn url_scheme_swaps_to_ws() {
        assert_eq!(socket(None).url, "ws://127.0.0.1:8080/ws");
    }

    #[test]
    fn unscoped_sockets_take_the_aggregate() {
        let sub = socket(None);
        let snapshot = Snapshot::new(vec![Table::sighted("rig-a", "win")]);
        match sub.accept(Event::update(snapshot.clone())) {
            Some(Delivery::Snapshot(got)) => assert_eq!(got, snapshot),
            other => panic!("wrong delivery: {:?}", other),
        }
        assert!(sub.accept(Event::scoped("rig-a", snapshot)).is_none());
    }

    #[test]
    fn scoped_sockets_take_only_their_origin() {
        let sub = socket(Some("rig-a"));
        let snapshot = Snapshot::new(vec![Table::sighted("rig-a", "win")]);
        assert!(sub.accept(Event::update(snapshot.clone())).is_none());
        assert!(sub.accept(Event::scoped("rig-b", snapshot.clone())).is_none());
        match sub.accept(Event::scoped("rig-a", snapshot)) {
            Some(Delivery::Snapshot(got)) => assert_eq!(got.total(), 1),
            other => panic!("wrong delivery: {:?}", other),
        }
    }

    #[test]
    fn heartbeats_count_as_unchanged() {
        assert_eq!(
            socket(None).accept(Event::heartbeat()),
            Some(Delivery::Unchanged)
        );
    }
}
