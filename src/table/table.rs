use super::card::Card;
use super::key::TableKey;
use super::moves::MoveRecord;
use super::seat::Seat;
use super::street::Street;
use chrono::DateTime;
use chrono::Utc;
use serde::Deserialize;
use serde::Serialize;

/// Everything one detection pass knew about one table. Missing fields
/// deserialize to their empty forms so a sparse sighting still lands.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Table {
    pub origin: String,
    pub window: String,
    #[serde(default)]
    pub player_cards: Vec<Card>,
    #[serde(default)]
    pub table_cards: Vec<Card>,
    #[serde(default)]
    pub street: Option<Street>,
    #[serde(default)]
    pub seats: Vec<Seat>,
    #[serde(default)]
    pub moves: Vec<MoveRecord>,
    #[serde(default)]
    pub solver_link: Option<String>,
    #[serde(default = "Utc::now")]
    pub last_update: DateTime<Utc>,
}

impl Table {
    pub fn sighted(origin: &str, window: &str) -> Self {
        Self {
            origin: origin.to_string(),
            window: window.to_string(),
            player_cards: Vec::new(),
            table_cards: Vec::new(),
            street: None,
            seats: Vec::new(),
            moves: Vec::new(),
            solver_link: None,
            last_update: Utc::now(),
        }
    }
    pub fn key(&self) -> TableKey {
        TableKey::new(&self.origin, &self.window)
    }
    /// Street as reported, or read off the board when the detector
    /// did not say.
    pub fn street(&self) -> Option<Street> {
        self.street.or_else(|| Street::infer(self.table_cards.len()))
    }
    /// Seats still in the hand. Drives the player count a solver link
    /// is built for.
    pub fn active_seats(&self) -> usize {
        self.seats.iter().filter(|s| s.is_active()).count()
    }
    /// Hand history grouped by street in play order. Streets without
    /// moves are skipped.
    pub fn moves_by_street(&self) -> Vec<(Street, Vec<&MoveRecord>)> {
        Street::all()
            .iter()
            .map(|street| {
                (
                    *street,
                    self.moves.iter().filter(|m| m.street == *street).collect(),
                )
            })
            .filter(|(_, moves): &(Street, Vec<&MoveRecord>)| !moves.is_empty())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::Move;
    use crate::table::Position;

    #[test]
    fn street_inferred_from_board_when_unreported() {
        let mut table = Table::sighted("rig", "win");
        assert_eq!(table.street(), Some(Street::Preflop));
        table.table_cards = vec![Card::new("AS"), Card::new("KD"), Card::new("2C")];
        assert_eq!(table.street(), Some(Street::Flop));
        table.street = Some(Street::Turn);
        assert_eq!(table.street(), Some(Street::Turn));
    }

    #[test]
    fn moves_group_in_street_order() {
        let mut table = Table::sighted("rig", "win");
        table.moves = vec![
            MoveRecord::new(Street::Flop, Position::Small, Move::Check),
            MoveRecord::new(Street::Preflop, Position::Early, Move::Raise),
            MoveRecord::new(Street::Preflop, Position::Big, Move::Call),
        ];
        let grouped = table.moves_by_street();
        assert_eq!(grouped.len(), 2);
        assert_eq!(grouped[0].0, Street::Preflop);
        assert_eq!(grouped[0].1.len(), 2);
        assert_eq!(grouped[1].0, Street::Flop);
    }

    #[test]
    fn sparse_json_still_lands() {
        let table: Table =
            serde_json::from_str(r#"{"origin":"rig","window":"Table 1"}"#).unwrap();
        assert_eq!(table.key().to_string(), "rig::Table 1");
        assert!(table.player_cards.is_empty());
        assert_eq!(table.street, None);
    }
}
