use serde::Deserialize;
use serde::Serialize;

#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Street {
    Preflop = 0,
    Flop = 1,
    Turn = 2,
    River = 3,
}

impl Street {
    pub const fn all() -> &'static [Self] {
        &[Self::Preflop, Self::Flop, Self::Turn, Self::River]
    }
    pub const fn next(&self) -> Self {
        match self {
            Self::Preflop => Self::Flop,
            Self::Flop => Self::Turn,
            Self::Turn => Self::River,
            Self::River => panic!("terminal"),
        }
    }
    /// Board size on this street.
    pub const fn n_board(&self) -> usize {
        match self {
            Self::Preflop => 0,
            Self::Flop => 3,
            Self::Turn => 4,
            Self::River => 5,
        }
    }
    /// Streets are not observed directly; they follow from how many
    /// community cards the detector saw. Partial boards stay unknown.
    pub const fn infer(board: usize) -> Option<Self> {
        match board {
            0 => Some(Self::Preflop),
            3 => Some(Self::Flop),
            4 => Some(Self::Turn),
            5 => Some(Self::River),
            _ => None,
        }
    }
    /// Query parameter carrying this street's actions in a solver link.
    pub const fn link_param(&self) -> &'static str {
        match self {
            Self::Preflop => "preflopActions",
            Self::Flop => "flopActions",
            Self::Turn => "turnActions",
            Self::River => "riverActions",
        }
    }
}

impl std::fmt::Display for Street {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Self::Preflop => write!(f, "preflop"),
            Self::Flop => write!(f, "flop"),
            Self::Turn => write!(f, "turn"),
            Self::River => write!(f, "river"),
        }
    }
}

impl crate::Arbitrary for Street {
    fn random() -> Self {
        use rand::Rng;
        match rand::rng().random_range(0..4) {
            0 => Self::Preflop,
            1 => Self::Flop,
            2 => Self::Turn,
            _ => Self::River,
        }
    }
}
