use super::seat::Position;
use super::street::Street;
use serde::Deserialize;
use serde::Serialize;

/// Kinds of action a detector can read off the table.
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Move {
    Fold,
    Check,
    Call,
    Bet,
    Raise,
    AllIn,
    Muck,
    Show,
    Complete,
}

impl Move {
    /// Detectors emit shorthand that varies by site skin. Fold the
    /// variants down to one kind each; sizes are dropped since solver
    /// links only care about the action shape.
    pub fn normalize(label: &str) -> Option<Self> {
        match label.trim().to_lowercase().as_str() {
            "fold" | "f" => Some(Self::Fold),
            "check" | "k" | "x" => Some(Self::Check),
            "call" | "c" | "call_35" | "limp" | "limps" => Some(Self::Call),
            "bet" | "b" | "cb" => Some(Self::Bet),
            "raise" | "r" | "or_35" | "or_2" => Some(Self::Raise),
            "all_in" | "allin" | "all-in" => Some(Self::AllIn),
            "muck" => Some(Self::Muck),
            "show" => Some(Self::Show),
            "complete" | "comp" => Some(Self::Complete),
            _ => None,
        }
    }
    /// Shorthand a solver link encodes this move as. Moves the solver
    /// has no notion of contribute nothing to the link.
    pub const fn link_code(&self) -> Option<&'static str> {
        match self {
            Self::Fold => Some("f"),
            Self::Check | Self::Call => Some("c"),
            Self::Bet => Some("b"),
            Self::Raise => Some("r35"),
            Self::AllIn => Some("a"),
            Self::Muck | Self::Show | Self::Complete => None,
        }
    }
}

impl std::fmt::Display for Move {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Self::Fold => write!(f, "fold"),
            Self::Check => write!(f, "check"),
            Self::Call => write!(f, "call"),
            Self::Bet => write!(f, "bet"),
            Self::Raise => write!(f, "raise"),
            Self::AllIn => write!(f, "all_in"),
            Self::Muck => write!(f, "muck"),
            Self::Show => write!(f, "show"),
            Self::Complete => write!(f, "complete"),
        }
    }
}

impl crate::Arbitrary for Move {
    fn random() -> Self {
        use rand::seq::IndexedRandom;
        *[
            Self::Fold,
            Self::Check,
            Self::Call,
            Self::Bet,
            Self::Raise,
            Self::AllIn,
        ]
        .choose(&mut rand::rng())
        .unwrap()
    }
}

/// One action in a hand's history: who did what on which street.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MoveRecord {
    pub street: Street,
    pub position: Position,
    pub action: Move,
}

impl MoveRecord {
    pub fn new(street: Street, position: Position, action: Move) -> Self {
        Self {
            street,
            position,
            action,
        }
    }
}

impl std::fmt::Display for MoveRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{} {} {}", self.street, self.position, self.action)
    }
}
