use crate::Ordinal;
use serde::Deserialize;
use serde::Serialize;

/// Named position at a six-handed table.
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Position {
    #[serde(rename = "EP")]
    Early,
    #[serde(rename = "MP")]
    Middle,
    #[serde(rename = "CO")]
    Cutoff,
    #[serde(rename = "BTN")]
    Button,
    #[serde(rename = "SB")]
    Small,
    #[serde(rename = "BB")]
    Big,
}

impl Position {
    pub const fn all() -> &'static [Self] {
        &[
            Self::Early,
            Self::Middle,
            Self::Cutoff,
            Self::Button,
            Self::Small,
            Self::Big,
        ]
    }
    pub const fn code(&self) -> &'static str {
        match self {
            Self::Early => "EP",
            Self::Middle => "MP",
            Self::Cutoff => "CO",
            Self::Button => "BTN",
            Self::Small => "SB",
            Self::Big => "BB",
        }
    }
    /// Seat number the viewer paints this position at. Seat 1 is the
    /// hero seat and holds the button.
    pub const fn seat(&self) -> Ordinal {
        match self {
            Self::Button => 1,
            Self::Small => 2,
            Self::Big => 3,
            Self::Early => 4,
            Self::Middle => 5,
            Self::Cutoff => 6,
        }
    }
    /// Voluntary action order before the flop.
    pub const fn preflop_order() -> &'static [Self] {
        &[
            Self::Early,
            Self::Middle,
            Self::Cutoff,
            Self::Button,
            Self::Small,
            Self::Big,
        ]
    }
    /// Action order once a flop is out. Blinds act first.
    pub const fn postflop_order() -> &'static [Self] {
        &[
            Self::Small,
            Self::Big,
            Self::Early,
            Self::Middle,
            Self::Cutoff,
            Self::Button,
        ]
    }
    /// Detectors label positions loosely. Fold the common variants down
    /// to one spelling each.
    pub fn normalize(label: &str) -> Option<Self> {
        match label.trim().to_uppercase().as_str() {
            "EP" | "UTG" | "EARLY" | "EARLY_POSITION" => Some(Self::Early),
            "MP" | "MIDDLE" | "MIDDLE_POSITION" => Some(Self::Middle),
            "CO" | "CUT" | "CUTOFF" => Some(Self::Cutoff),
            "BTN" | "BU" | "BUTTON" | "DEALER" => Some(Self::Button),
            "SB" | "SMALL" | "SMALL_BLIND" => Some(Self::Small),
            "BB" | "BIG" | "BIG_BLIND" => Some(Self::Big),
            _ => None,
        }
    }
}

impl std::fmt::Display for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}", self.code())
    }
}

impl crate::Arbitrary for Position {
    fn random() -> Self {
        use rand::seq::IndexedRandom;
        *Self::all().choose(&mut rand::rng()).unwrap()
    }
}

/// One occupied seat in a sighting: who sits where. The label is kept
/// as detected so the viewer shows what the screen showed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Seat {
    pub player: Ordinal,
    pub name: String,
}

impl Seat {
    pub fn new(player: Ordinal, name: &str) -> Self {
        Self {
            player,
            name: name.to_string(),
        }
    }
    pub fn position(&self) -> Option<Position> {
        Position::normalize(&self.name)
    }
    /// Seat 1 follows the hero across window layouts.
    pub fn is_hero(&self) -> bool {
        self.player == 1
    }
    pub fn label(&self) -> String {
        format!("Player {}", self.player)
    }
    /// Seats with no recognized position are dealt out of the hand.
    pub fn is_active(&self) -> bool {
        self.position().is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalizes_common_variants() {
        assert_eq!(Position::normalize("UTG"), Some(Position::Early));
        assert_eq!(Position::normalize("dealer"), Some(Position::Button));
        assert_eq!(Position::normalize(" bu "), Some(Position::Button));
        assert_eq!(Position::normalize("small_blind"), Some(Position::Small));
        assert_eq!(Position::normalize("NO"), None);
        assert_eq!(Position::normalize(""), None);
    }

    #[test]
    fn button_sits_in_the_hero_seat() {
        assert_eq!(Position::Button.seat(), 1);
        assert_eq!(Position::Small.seat(), 2);
        assert_eq!(Position::Big.seat(), 3);
        assert_eq!(Position::Cutoff.seat(), 6);
    }

    #[test]
    fn hero_is_player_one() {
        assert!(Seat::new(1, "BTN").is_hero());
        assert!(!Seat::new(4, "EP").is_hero());
        assert_eq!(Seat::new(3, "BB").label(), "Player 3");
    }

    #[test]
    fn codes_round_trip_through_serde() {
        assert_eq!(serde_json::to_string(&Position::Button).unwrap(), r#""BTN""#);
        let back: Position = serde_json::from_str(r#""EP""#).unwrap();
        assert_eq!(back, Position::Early);
    }
}
