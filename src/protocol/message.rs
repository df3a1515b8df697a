use crate::table::Card;
use crate::table::Move;
use crate::table::MoveRecord;
use crate::table::Position;
use crate::table::Seat;
use crate::table::Street;
use crate::table::Table;
use crate::Ordinal;
use chrono::DateTime;
use chrono::Utc;
use serde::Deserialize;
use serde::Serialize;
use std::collections::BTreeMap;

/// Per-seat payload inside a sighting. Detectors attach more fields
/// (match geometry, confidence) which the hub has no use for; they are
/// ignored on the way in.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct SeatName {
    #[serde(default)]
    pub name: String,
}

/// One action as the detector spelled it, before normalization folds
/// site shorthand ("or_35", "limps") into canonical moves.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MoveWire {
    pub street: Street,
    pub position: String,
    pub action: String,
}

/// The game_data payload of an update: everything one pass read off
/// one window. Every field is optional so a partial read still lands.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Sighting {
    #[serde(default)]
    pub player_cards: Vec<Card>,
    #[serde(default)]
    pub table_cards: Vec<Card>,
    #[serde(default)]
    pub street: Option<Street>,
    #[serde(default)]
    pub positions: BTreeMap<String, SeatName>,
    #[serde(default)]
    pub moves: Vec<MoveWire>,
    #[serde(default)]
    pub solver_link: Option<String>,
}

/// Fold a raw sighting into the canonical table record. Seat keys that
/// are not player numbers and moves that do not normalize are dropped
/// with a warning rather than poisoning the whole update.
impl From<(&str, &str, Sighting)> for Table {
    fn from((origin, window, data): (&str, &str, Sighting)) -> Self {
        let mut table = Table::sighted(origin, window);
        table.player_cards = data.player_cards;
        table.table_cards = data.table_cards;
        table.street = data.street;
        for (player, seat) in data.positions {
            match player.parse::<Ordinal>() {
                Ok(player) => table.seats.push(Seat::new(player, &seat.name)),
                Err(_) => log::warn!("ignoring seat with player key {:?}", player),
            }
        }
        table.seats.sort_by_key(|seat| seat.player);
        for wire in data.moves {
            match (
                Position::normalize(&wire.position),
                Move::normalize(&wire.action),
            ) {
                (Some(position), Some(action)) => {
                    table.moves.push(MoveRecord::new(wire.street, position, action))
                }
                _ => log::warn!(
                    "ignoring unreadable move {:?} by {:?}",
                    wire.action,
                    wire.position
                ),
            }
        }
        table.solver_link = data.solver_link;
        table
    }
}

fn default_interval() -> u64 {
    crate::DEFAULT_CLIENT_INTERVAL
}

/// Messages a detector or viewer sends the hub, over WebSocket or as
/// HTTP bodies. The type tag on the wire discriminates.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientMessage {
    /// A detector announcing itself and its reporting cadence.
    ClientRegister {
        client_id: String,
        #[serde(default = "Utc::now")]
        timestamp: DateTime<Utc>,
        #[serde(default = "default_interval")]
        detection_interval: u64,
    },
    /// A fresh read of one window.
    GameUpdate {
        client_id: String,
        window_name: String,
        #[serde(default = "Utc::now")]
        timestamp: DateTime<Utc>,
        game_data: Sighting,
    },
    /// Windows that closed since the last report.
    TableRemoval {
        client_id: String,
        removed_windows: Vec<String>,
        #[serde(default = "Utc::now")]
        timestamp: DateTime<Utc>,
    },
    /// A viewer narrowing its push feed to one origin, or back to all
    /// origins when no id is given.
    SubscribeClient {
        #[serde(default)]
        client_id: Option<String>,
    },
    UnsubscribeClient {
        #[serde(default)]
        client_id: Option<String>,
    },
}

impl ClientMessage {
    pub fn register(client_id: &str, detection_interval: u64) -> Self {
        Self::ClientRegister {
            client_id: client_id.to_string(),
            timestamp: Utc::now(),
            detection_interval,
        }
    }
    pub fn update(client_id: &str, window_name: &str, game_data: Sighting) -> Self {
        Self::GameUpdate {
            client_id: client_id.to_string(),
            window_name: window_name.to_string(),
            timestamp: Utc::now(),
            game_data,
        }
    }
    pub fn removal(client_id: &str, removed_windows: Vec<String>) -> Self {
        Self::TableRemoval {
            client_id: client_id.to_string(),
            removed_windows,
            timestamp: Utc::now(),
        }
    }
    pub fn subscribe(client_id: Option<&str>) -> Self {
        Self::SubscribeClient {
            client_id: client_id.map(str::to_string),
        }
    }
    /// The origin a detector message speaks for. Subscription messages
    /// name origins to watch, not to own, so they answer None.
    pub fn origin(&self) -> Option<&str> {
        match self {
            Self::ClientRegister { client_id, .. }
            | Self::GameUpdate { client_id, .. }
            | Self::TableRemoval { client_id, .. } => Some(client_id),
            Self::SubscribeClient { .. } | Self::UnsubscribeClient { .. } => None,
        }
    }
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).expect("serialize client message")
    }
}

impl std::str::FromStr for ClientMessage {
    type Err = serde_json::Error;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        serde_json::from_str(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn registration_defaults_the_interval() {
        let msg: ClientMessage =
            r#"{"type":"client_register","client_id":"rig-a"}"#.parse().unwrap();
        match msg {
            ClientMessage::ClientRegister {
                client_id,
                detection_interval,
                ..
            } => {
                assert_eq!(client_id, "rig-a");
                assert_eq!(detection_interval, 3);
            }
            other => panic!("wrong variant: {:?}", other),
        }
    }

    #[test]
    fn update_round_trips() {
        let mut sighting = Sighting::default();
        sighting.player_cards = vec![Card::new("AS")];
        sighting
            .positions
            .insert("1".to_string(), SeatName { name: "BTN".to_string() });
        let msg = ClientMessage::update("rig-a", "Table 1", sighting);
        let json = msg.to_json();
        assert!(json.contains(r#""type":"game_update""#));
        let back: ClientMessage = json.parse().unwrap();
        assert_eq!(back, msg);
    }

    #[test]
    fn sighting_folds_into_a_table() {
        let mut sighting = Sighting::default();
        sighting.table_cards = vec![Card::new("AS"), Card::new("KD"), Card::new("2C")];
        sighting
            .positions
            .insert("2".to_string(), SeatName { name: "SB".to_string() });
        sighting
            .positions
            .insert("1".to_string(), SeatName { name: "BTN".to_string() });
        sighting
            .positions
            .insert("x".to_string(), SeatName { name: "??".to_string() });
        sighting.moves = vec![
            MoveWire {
                street: Street::Preflop,
                position: "UTG".to_string(),
                action: "or_35".to_string(),
            },
            MoveWire {
                street: Street::Preflop,
                position: "??".to_string(),
                action: "jam".to_string(),
            },
        ];
        let table = Table::from(("rig-a", "Table 1", sighting));
        assert_eq!(table.key().to_string(), "rig-a::Table 1");
        assert_eq!(table.street(), Some(Street::Flop));
        assert_eq!(table.seats.len(), 2);
        assert_eq!(table.seats[0].player, 1);
        assert_eq!(table.moves.len(), 1);
        assert_eq!(table.moves[0].position, Position::Early);
        assert_eq!(table.moves[0].action, Move::Raise);
    }

    #[test]
    fn removal_names_windows() {
        let msg = ClientMessage::removal("rig-a", vec!["Table 1".to_string()]);
        let json = msg.to_json();
        assert!(json.contains(r#""type":"table_removal""#));
        assert!(json.contains("removed_windows"));
    }

    #[test]
    fn subscribe_scope_is_optional() {
        let scoped: ClientMessage =
            r#"{"type":"subscribe_client","client_id":"rig-a"}"#.parse().unwrap();
        assert_eq!(scoped, ClientMessage::subscribe(Some("rig-a")));
        let global: ClientMessage = r#"{"type":"subscribe_client"}"#.parse().unwrap();
        assert_eq!(global, ClientMessage::subscribe(None));
    }

    #[test]
    fn detector_messages_name_their_origin() {
        assert_eq!(ClientMessage::register("rig-a", 3).origin(), Some("rig-a"));
        assert_eq!(ClientMessage::subscribe(Some("rig-a")).origin(), None);
    }
}
