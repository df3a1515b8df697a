use crate::protocol::ClientMessage;
use crate::protocol::Event;
use crate::protocol::Sighting;
use crate::table::Snapshot;
use crate::table::Table;
use chrono::DateTime;
use chrono::Utc;
use indexmap::IndexMap;
use tokio::sync::broadcast;
use tokio::sync::RwLock;

/// One detector's standing report: its open windows in arrival order
/// and the cadence it promised when it registered.
struct Rig {
    windows: IndexMap<String, Table>,
    interval: u64,
    connected: DateTime<Utc>,
}

impl Rig {
    fn new(interval: u64) -> Self {
        Self {
            windows: IndexMap::new(),
            interval,
            connected: Utc::now(),
        }
    }
}

/// Aggregate detection state across every connected origin. Wire
/// messages mutate it through apply(); every mutation fans typed
/// events out on the broadcast channel, one global and one scoped
/// to the origin that moved.
pub struct Floor {
    rigs: RwLock<IndexMap<String, Rig>>,
    events: broadcast::Sender<Event>,
    started: DateTime<Utc>,
}

impl Default for Floor {
    fn default() -> Self {
        Self {
            rigs: RwLock::new(IndexMap::new()),
            events: broadcast::channel(64).0,
            started: Utc::now(),
        }
    }
}

impl Floor {
    pub fn subscribe(&self) -> broadcast::Receiver<Event> {
        self.events.subscribe()
    }

    pub fn listeners(&self) -> usize {
        self.events.receiver_count()
    }

    pub fn started(&self) -> DateTime<Utc> {
        self.started
    }

    /// Route one wire message and produce the acknowledgement the
    /// sender gets back. Subscription commands are session state, not
    /// floor state; they land here only when a sender misroutes them.
    pub async fn apply(&self, message: ClientMessage) -> Event {
        match message {
            ClientMessage::ClientRegister {
                client_id,
                detection_interval,
                ..
            } => {
                self.register(&client_id, detection_interval).await;
                Event::success(&format!("client {} registered successfully", client_id))
            }
            ClientMessage::GameUpdate {
                client_id,
                window_name,
                game_data,
                ..
            } => {
                self.update(&client_id, &window_name, game_data).await;
                Event::success("game state updated")
            }
            ClientMessage::TableRemoval {
                client_id,
                removed_windows,
                ..
            } => {
                let dropped = self.remove(&client_id, &removed_windows).await;
                Event::success(&format!("removed {} tables", dropped))
            }
            ClientMessage::SubscribeClient { .. } | ClientMessage::UnsubscribeClient { .. } => {
                Event::error("subscription commands belong to the session")
            }
        }
    }

    pub async fn register(&self, origin: &str, interval: u64) {
        let mut rigs = self.rigs.write().await;
        let rig = rigs
            .entry(origin.to_string())
            .or_insert_with(|| Rig::new(interval));
        rig.interval = interval;
        rig.connected = Utc::now();
        log::info!("origin {} registered at {}s cadence", origin, interval);
    }

    pub async fn update(&self, origin: &str, window: &str, sighting: Sighting) {
        let table = Table::from((origin, window, sighting));
        {
            let mut rigs = self.rigs.write().await;
            let rig = rigs
                .entry(origin.to_string())
                .or_insert_with(|| Rig::new(crate::DEFAULT_CLIENT_INTERVAL));
            rig.windows.insert(window.to_string(), table);
        }
        log::debug!("origin {} reported window {:?}", origin, window);
        self.publish(origin).await;
    }

    pub async fn remove(&self, origin: &str, windows: &[String]) -> usize {
        let dropped = {
            let mut rigs = self.rigs.write().await;
            match rigs.get_mut(origin) {
                Some(rig) => windows
                    .iter()
                    .filter(|window| rig.windows.shift_remove(window.as_str()).is_some())
                    .count(),
                None => 0,
            }
        };
        log::info!(
            "origin {} dropped {}/{} windows",
            origin,
            dropped,
            windows.len()
        );
        self.publish(origin).await;
        dropped
    }

    /// Forget an origin wholesale, windows and all.
    pub async fn disconnect(&self, origin: &str) {
        let known = self.rigs.write().await.shift_remove(origin).is_some();
        if known {
            log::info!("origin {} disconnected", origin);
            self.publish(origin).await;
        }
    }

    async fn publish(&self, origin: &str) {
        self.events.send(Event::update(self.snapshot().await)).ok();
        self.events
            .send(Event::scoped(origin, self.scoped(origin).await))
            .ok();
    }

    /// Every window across every origin, flattened in registration
    /// then arrival order. This is what /api/cards serves and what the
    /// digest token is computed over.
    pub async fn snapshot(&self) -> Snapshot {
        let rigs = self.rigs.read().await;
        Snapshot::gathered(
            rigs.values()
                .flat_map(|rig| rig.windows.values().cloned())
                .collect(),
        )
    }

    /// One origin's slice of the floor. Unknown origins read as empty.
    pub async fn scoped(&self, origin: &str) -> Snapshot {
        let rigs = self.rigs.read().await;
        Snapshot::gathered(
            rigs.get(origin)
                .map(|rig| rig.windows.values().cloned().collect())
                .unwrap_or_default(),
        )
    }

    pub async fn origins(&self) -> Vec<String> {
        self.rigs.read().await.keys().cloned().collect()
    }

    pub async fn knows(&self, origin: &str) -> bool {
        self.rigs.read().await.contains_key(origin)
    }

    pub async fn interval(&self, origin: &str) -> Option<u64> {
        self.rigs.read().await.get(origin).map(|rig| rig.interval)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sighting(card: &str) -> Sighting {
        let mut sighting = Sighting::default();
        sighting.player_cards = vec![crate::table::Card::new(card)];
        sighting
    }

    #[tokio::test]
    async fn updates_accumulate_per_window() {
        let floor = Floor::default();
        floor.update("rig-a", "Table 1", sighting("AS")).await;
        floor.update("rig-a", "Table 2", sighting("KD")).await;
        floor.update("rig-a", "Table 1", sighting("QH")).await;
        let snapshot = floor.snapshot().await;
        assert_eq!(snapshot.total(), 2);
        assert_eq!(snapshot.detections[0].player_cards[0].name, "QH");
    }

    #[tokio::test]
    async fn scoped_reads_are_one_origin() {
        let floor = Floor::default();
        floor.update("rig-a", "Table 1", sighting("AS")).await;
        floor.update("rig-b", "Table 1", sighting("KD")).await;
        assert_eq!(floor.snapshot().await.total(), 2);
        assert_eq!(floor.scoped("rig-a").await.total(), 1);
        assert_eq!(floor.scoped("rig-c").await.total(), 0);
    }

    #[tokio::test]
    async fn removal_counts_only_known_windows() {
        let floor = Floor::default();
        floor.update("rig-a", "Table 1", sighting("AS")).await;
        let windows = vec!["Table 1".to_string(), "Table 9".to_string()];
        assert_eq!(floor.remove("rig-a", &windows).await, 1);
        assert_eq!(floor.snapshot().await.total(), 0);
    }

    #[tokio::test]
    async fn disconnect_drops_the_whole_origin() {
        let floor = Floor::default();
        floor.register("rig-a", 3).await;
        floor.update("rig-a", "Table 1", sighting("AS")).await;
        floor.update("rig-a", "Table 2", sighting("KD")).await;
        floor.disconnect("rig-a").await;
        assert!(!floor.knows("rig-a").await);
        assert_eq!(floor.snapshot().await.total(), 0);
    }

    #[tokio::test]
    async fn mutations_fan_out_globally_and_scoped() {
        let floor = Floor::default();
        let mut rx = floor.subscribe();
        floor.update("rig-a", "Table 1", sighting("AS")).await;
        match rx.recv().await {
            Ok(Event::DetectionUpdate(snapshot)) => assert_eq!(snapshot.total(), 1),
            other => panic!("wrong first event: {:?}", other),
        }
        match rx.recv().await {
            Ok(Event::ClientDetectionUpdate { client_id, .. }) => assert_eq!(client_id, "rig-a"),
            other => panic!("wrong second event: {:?}", other),
        }
    }

    #[tokio::test]
    async fn registration_acknowledges_and_records_cadence() {
        let floor = Floor::default();
        let ack = floor.apply(ClientMessage::register("rig-a", 5)).await;
        assert!(ack.to_json().contains(r#""status":"success""#));
        assert_eq!(floor.interval("rig-a").await, Some(5));
        assert_eq!(floor.origins().await, vec!["rig-a".to_string()]);
    }
}
